//! The pool's internal FIFO job queue (§4.B).
//!
//! Not a general-purpose container — the generic singly-linked list and
//! queue wrapper in `original_source/` are explicitly out of scope (§1); this
//! is the pool's private work buffer and nothing else uses it.

use crate::latch::BinaryLatch;
use std::collections::VecDeque;
use std::sync::Mutex;
use workpool_core::{Job, PoolError, PoolResult};

pub struct JobQueue {
    inner: Mutex<VecDeque<Job>>,
    has_jobs: BinaryLatch,
    capacity: Option<usize>,
}

impl JobQueue {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
            has_jobs: BinaryLatch::new(false),
            capacity,
        }
    }

    /// Append to the tail and post `has_jobs`. Rejected with
    /// [`PoolError::QueueFull`] without mutating the queue if a capacity is
    /// configured and already reached.
    pub fn push(&self, job: Job) -> PoolResult<()> {
        let mut guard = self.inner.lock().unwrap();
        if let Some(capacity) = self.capacity {
            if guard.len() >= capacity {
                return Err(PoolError::QueueFull { capacity });
            }
        }
        guard.push_back(job);
        drop(guard);
        self.has_jobs.post();
        Ok(())
    }

    /// Detach the head job, if any. If the queue is still non-empty after
    /// the detach, `has_jobs` is posted again — the cascading wake that keeps
    /// a burst of pushes from stalling behind a single latch set (§4.A, §4.B).
    pub fn pull(&self) -> Option<Job> {
        let mut guard = self.inner.lock().unwrap();
        let job = guard.pop_front();
        let remaining = guard.len();
        drop(guard);
        if remaining > 0 {
            self.has_jobs.post();
        }
        job
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block the calling worker until a job is (or was already) available.
    pub fn wait_for_jobs(&self) {
        self.has_jobs.wait();
    }

    /// Wake a single idle worker without waiting for one to be present.
    /// Used by the elastic manager's shrink path (§4.E) to ask exactly one
    /// worker per shrink slot to reconsider its exit condition.
    pub fn wake_one(&self) {
        self.has_jobs.post();
    }

    /// Wake every idle worker. Used by `destroy` (§4.D) so that every worker
    /// currently parked in `has_jobs.wait()` re-checks `keep_alive`.
    pub fn wake_all(&self) {
        self.has_jobs.post_all();
    }

    /// Drop every queued job (never their captured state's external effects,
    /// only the closures themselves — matching "freeing each job's memory,
    /// never its `arg`") and reset the latch.
    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
        self.has_jobs.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn fifo_order_is_preserved() {
        let queue = JobQueue::new(None);
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let order = order.clone();
            queue.push(Box::new(move || order.lock().unwrap().push(i))).unwrap();
        }
        while let Some(job) = queue.pull() {
            job();
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn pull_on_empty_queue_returns_none() {
        let queue = JobQueue::new(None);
        assert!(queue.pull().is_none());
    }

    #[test]
    fn capacity_rejects_once_full_without_mutating_state() {
        let queue = JobQueue::new(Some(1));
        queue.push(Box::new(|| {})).unwrap();
        let err = queue.push(Box::new(|| {})).unwrap_err();
        assert!(matches!(err, PoolError::QueueFull { capacity: 1 }));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn cascading_wake_lets_pull_drain_all_without_extra_posts() {
        let queue = JobQueue::new(None);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            queue.push(Box::new(|| {})).unwrap();
        }
        // One wait() call per pull suffices even though only the push()
        // calls posted the latch; the cascading re-post inside pull() keeps
        // later pulls from blocking.
        for _ in 0..3 {
            queue.wait_for_jobs();
            if queue.pull().is_some() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn clear_empties_queue_and_resets_latch() {
        let queue = JobQueue::new(None);
        queue.push(Box::new(|| {})).unwrap();
        queue.clear();
        assert_eq!(queue.len(), 0);
    }
}
