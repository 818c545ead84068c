//! A one-bit wake gate.
//!
//! Grounded on the teacher's `gvthread_runtime::parking::fallback::FallbackParking`
//! (a mutex+bool+condvar "wake one / wake all" gate for platforms without a
//! futex) — the same shape, trimmed to exactly the contract §4.A of the
//! design doc asks for: `wait`, `post` (wake one), `post_all` (wake all), and
//! `reset`.
//!
//! Unlike the teacher's parking primitive this is not an optimization over a
//! futex; it exists so `JobQueue` can implement the cascading-wake pattern
//! (§4.B: re-`post` on every non-empty `pull`) without a counting semaphore,
//! matching the source thread pool's `has_jobs` latch precisely.

use std::sync::{Condvar, Mutex};

/// A binary (one-bit) latch: `v ∈ {0, 1}`.
///
/// Rust's `bool` is already a two-valued type, so the spec's "any initial
/// value outside `{0,1}` is a programmer error and aborts" has no runtime
/// counterpart here — the type system rules it out at compile time. See
/// DESIGN.md.
pub struct BinaryLatch {
    v: Mutex<bool>,
    cond: Condvar,
}

impl BinaryLatch {
    pub fn new(initial: bool) -> Self {
        Self {
            v: Mutex::new(initial),
            cond: Condvar::new(),
        }
    }

    /// Block until `v == true`, then atomically reset it to `false`.
    ///
    /// Spurious wake-ups are filtered by re-checking `v` under the mutex
    /// (`Condvar::wait_while`), as the contract requires.
    pub fn wait(&self) {
        let guard = self.v.lock().unwrap();
        let mut guard = self.cond.wait_while(guard, |v| !*v).unwrap();
        *guard = false;
    }

    /// Set `v = true` and wake at most one waiter.
    pub fn post(&self) {
        let mut guard = self.v.lock().unwrap();
        *guard = true;
        self.cond.notify_one();
    }

    /// Set `v = true` and wake every waiter.
    ///
    /// Because `wait()` consumes the bit it woke on, only the first waiter
    /// to reacquire the mutex is guaranteed to proceed from a single call;
    /// the rest observe `v` already reset to false and go back to sleep.
    /// Callers that need to drain every waiter (`destroy`, §4.D) call this
    /// again on each subsequent wake rather than relying on one broadcast.
    pub fn post_all(&self) {
        let mut guard = self.v.lock().unwrap();
        *guard = true;
        self.cond.notify_all();
    }

    /// Force `v = false`, equivalent to re-initializing with `false`.
    pub fn reset(&self) {
        *self.v.lock().unwrap() = false;
    }
}
