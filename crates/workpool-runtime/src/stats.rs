//! Introspection snapshot (§10.6).
//!
//! `threadPoolAliveNum`/`threadPoolBusyNum` (and `thpool_num_threads_working`
//! in the sibling source) are separate accessors in `original_source/`;
//! `qjazz_pool::pool` packages the equivalent numbers into one struct instead
//! of loose getters, and this follows that shape.

/// A point-in-time snapshot of pool load.
///
/// Each field is read under its own brief lock acquisition rather than one
/// combined transaction, so — like `num_working()` — this is a hint for
/// monitoring/backoff decisions, not a value a caller should act on as if it
/// were consistent across fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub alive: usize,
    pub working: usize,
    pub queued: usize,
}
