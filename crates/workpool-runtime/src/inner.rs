//! Shared pool state, owned jointly by the `Pool` handle, every worker
//! thread, and (for elastic pools) the manager thread.
//!
//! This is the Rust answer to the design notes' "back-references" point:
//! the source has workers hold a raw pointer back to the pool with ambient
//! lifetime. Here workers and the manager hold an `Arc<PoolInner>` clone
//! instead, so the pool state outlives whichever of {handle, worker,
//! manager} drops it last; the owning `Pool` handle's `Drop` impl is what
//! actually *starts* the shutdown protocol (see `pool.rs`).

use crate::queue::JobQueue;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};
use std::thread::JoinHandle;
use workpool_core::PoolConfig;

/// `num_alive` / `num_working`, bundled under one mutex per §5's "shared
/// resource discipline" (the source's separate `count_mutex`/`busy_mutex`
/// collapse into a single lock here — see DESIGN.md).
#[derive(Default)]
pub(crate) struct Counts {
    pub num_alive: usize,
    pub num_working: usize,
}

pub(crate) struct PoolInner {
    pub queue: JobQueue,
    pub counts: Mutex<Counts>,
    /// Signalled exactly when `num_working` transitions to zero.
    pub all_idle: Condvar,
    /// Signalled on every `num_alive` change, so `Pool::new` and `destroy`
    /// can wait on a condition instead of busy-spinning (§9's redesign note).
    pub alive_changed: Condvar,
    /// Single-writer, multi-reader flags, polled rather than waited on (§5).
    pub keep_alive: AtomicBool,
    pub on_hold: AtomicBool,
    pub paused_lock: Mutex<()>,
    pub paused_cond: Condvar,
    pub manager_shutdown: AtomicBool,
    pub exit_count: AtomicUsize,
    pub destroyed: AtomicBool,
    /// Worker table: slot index is worker id; `None` means the slot is free
    /// for the manager to reuse on the next growth tick.
    pub workers: Mutex<Vec<Option<JoinHandle<()>>>>,
    pub config: PoolConfig,
}

impl PoolInner {
    pub fn new(config: PoolConfig) -> Self {
        let workers = std::iter::repeat_with(|| None).take(config.max_workers).collect();
        Self {
            queue: JobQueue::new(config.queue_capacity),
            counts: Mutex::new(Counts::default()),
            all_idle: Condvar::new(),
            alive_changed: Condvar::new(),
            keep_alive: AtomicBool::new(true),
            on_hold: AtomicBool::new(false),
            paused_lock: Mutex::new(()),
            paused_cond: Condvar::new(),
            manager_shutdown: AtomicBool::new(false),
            exit_count: AtomicUsize::new(0),
            destroyed: AtomicBool::new(false),
            workers: Mutex::new(workers),
            config,
        }
    }

    /// Block the calling thread (the worker itself) while `on_hold` is set.
    pub fn wait_while_paused(&self) {
        if !self.on_hold.load(Ordering::Acquire) {
            return;
        }
        let guard = self.paused_lock.lock().unwrap();
        let _guard = self
            .paused_cond
            .wait_while(guard, |_| self.on_hold.load(Ordering::Acquire))
            .unwrap();
    }

    pub fn alive_count(&self) -> usize {
        self.counts.lock().unwrap().num_alive
    }

    pub fn working_count(&self) -> usize {
        self.counts.lock().unwrap().num_working
    }

    /// `(queued, alive, working)` snapshot for the manager's load check (§4.E).
    pub fn snapshot(&self) -> (usize, usize, usize) {
        let counts = self.counts.lock().unwrap();
        (self.queue.len(), counts.num_alive, counts.num_working)
    }

    pub fn mark_alive(&self) {
        let mut counts = self.counts.lock().unwrap();
        counts.num_alive += 1;
        drop(counts);
        self.alive_changed.notify_all();
    }

    /// Returns `true` if this worker should exit via the elastic shrink path.
    ///
    /// A pending `exit_count` token is consumed unconditionally, even when
    /// `num_alive` is already at `min_workers` — matching
    /// `original_source/threadpool.c`'s `worker()`, which decrements
    /// `exitNum` before checking `liveNum > minNum`. Consuming the token
    /// regardless of the floor check keeps a shrink request from a tick that
    /// overshot `min_workers` from lingering on `exit_count` and retiring an
    /// unrelated worker spawned by a later growth tick.
    pub fn try_claim_elastic_exit(&self) -> bool {
        loop {
            let pending = self.exit_count.load(Ordering::Acquire);
            if pending == 0 {
                return false;
            }
            if self
                .exit_count
                .compare_exchange(pending, pending - 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
        }

        let mut counts = self.counts.lock().unwrap();
        if counts.num_alive <= self.config.min_workers {
            return false;
        }
        counts.num_alive -= 1;
        drop(counts);
        self.alive_changed.notify_all();
        true
    }

    /// Decrement `num_alive` on ordinary (non-elastic) exit and wake anyone
    /// polling `alive_changed` (e.g. `destroy`'s grace-window check).
    pub fn mark_exited(&self) {
        let mut counts = self.counts.lock().unwrap();
        counts.num_alive -= 1;
        drop(counts);
        self.alive_changed.notify_all();
    }

    pub fn begin_job(&self) {
        let mut counts = self.counts.lock().unwrap();
        counts.num_working += 1;
    }

    pub fn end_job(&self) {
        let mut counts = self.counts.lock().unwrap();
        counts.num_working -= 1;
        if counts.num_working == 0 {
            self.all_idle.notify_all();
        }
    }
}
