//! The pool state machine and its public API (§4.D).

use crate::inner::PoolInner;
use crate::manager::manager_loop;
use crate::stats::PoolStats;
use crate::worker::spawn_worker;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use workpool_core::{kinfo, kwarn, Job, PoolConfig, PoolError, PoolResult};

/// A general-purpose worker thread pool.
///
/// Construct with [`Pool::new`] (or the fixed/elastic convenience
/// constructors), submit fire-and-forget work with [`Pool::add_work`], and
/// either call [`Pool::wait`] to block until the queue drains and every
/// worker is idle, or simply drop the pool / call [`Pool::destroy`] to shut
/// it down.
pub struct Pool {
    inner: Arc<PoolInner>,
    manager: Mutex<Option<JoinHandle<()>>>,
}

impl Pool {
    /// `init(num_threads)`: clamp to `>= 0` (unsigned in Rust, so this is
    /// automatic), spawn `config.min_workers` workers, and block until every
    /// one of them has completed its alive-increment — so that a submission
    /// made immediately after `new` returns is guaranteed to reach a live
    /// worker (§4.D, testable property 5).
    pub fn new(config: PoolConfig) -> PoolResult<Self> {
        config.validate()?;
        let inner = Arc::new(PoolInner::new(config));

        if let Err(err) = spawn_initial_workers(&inner) {
            // Unwind: ask whatever did start to exit, then surface the failure.
            inner.keep_alive.store(false, Ordering::Release);
            inner.queue.wake_all();
            let mut workers = inner.workers.lock().unwrap();
            for slot in workers.iter_mut() {
                if let Some(handle) = slot.take() {
                    let _ = handle.join();
                }
            }
            return Err(err);
        }

        let manager = if inner.config.is_elastic() {
            let manager_inner = inner.clone();
            Some(
                thread::Builder::new()
                    .name("workpool-manager".to_string())
                    .spawn(move || manager_loop(manager_inner))
                    .map_err(PoolError::SpawnFailed)?,
            )
        } else {
            None
        };

        Ok(Self {
            inner,
            manager: Mutex::new(manager),
        })
    }

    /// A fixed-size pool with `n` workers and no manager thread.
    pub fn fixed(n: usize) -> PoolResult<Self> {
        Self::new(PoolConfig::fixed(n))
    }

    /// An elastic pool that grows and shrinks the worker set between `min` and `max`.
    pub fn elastic(min: usize, max: usize) -> PoolResult<Self> {
        Self::new(PoolConfig::elastic(min, max))
    }

    /// `add_work`: enqueue a fire-and-forget unit of work.
    ///
    /// Rejected with [`PoolError::Shutdown`] once `destroy` has begun, or
    /// with [`PoolError::QueueFull`] if a bounded queue is already full.
    pub fn add_work<F>(&self, job: F) -> PoolResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.inner.destroyed.load(Ordering::Acquire) {
            return Err(PoolError::Shutdown);
        }
        let job: Job = Box::new(job);
        self.inner.queue.push(job)
    }

    /// `wait`: block until the queue is empty and no worker is executing a job.
    pub fn wait(&self) {
        let mut counts = self.inner.counts.lock().unwrap();
        while self.inner.queue.len() > 0 || counts.num_working > 0 {
            counts = self.inner.all_idle.wait(counts).unwrap();
        }
    }

    /// `pause`: every worker suspends before starting its next job.
    pub fn pause(&self) {
        self.inner.on_hold.store(true, Ordering::Release);
    }

    /// `resume`: unblock every paused worker.
    pub fn resume(&self) {
        self.inner.on_hold.store(false, Ordering::Release);
        self.inner.paused_cond.notify_all();
    }

    /// `num_working`: advisory snapshot, not synchronized with `add_work` or `wait`.
    pub fn num_working(&self) -> usize {
        self.inner.working_count()
    }

    /// `num_alive`: advisory snapshot of the current live worker count.
    pub fn num_alive(&self) -> usize {
        self.inner.alive_count()
    }

    /// A combined snapshot of queue/alive/working counts (§10.6).
    pub fn stats(&self) -> PoolStats {
        let (queued, alive, working) = self.inner.snapshot();
        PoolStats {
            alive,
            working,
            queued,
        }
    }

    /// `destroy`: clear `keep_alive`, drain idle and busy workers, then free
    /// the queue. Safe to call more than once, and safe to call after
    /// `wait()`. Best-effort: never fails (§7's propagation policy).
    pub fn destroy(&self) {
        shutdown(&self.inner, &self.manager);
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        shutdown(&self.inner, &self.manager);
    }
}

fn spawn_initial_workers(inner: &Arc<PoolInner>) -> PoolResult<()> {
    let n = inner.config.min_workers;
    if n == 0 {
        return Ok(());
    }

    {
        let mut workers = inner.workers.lock().unwrap();
        for id in 0..n {
            let handle = spawn_worker(inner.clone(), id).map_err(PoolError::SpawnFailed)?;
            workers[id] = Some(handle);
        }
    }

    let counts = inner.counts.lock().unwrap();
    inner
        .alive_changed
        .wait_while(counts, |c| c.num_alive < n)
        .unwrap();
    Ok(())
}

/// Shared by `destroy()` and `Drop`; idempotent via `destroyed`.
fn shutdown(inner: &Arc<PoolInner>, manager: &Mutex<Option<JoinHandle<()>>>) {
    if inner.destroyed.swap(true, Ordering::AcqRel) {
        return;
    }

    inner.manager_shutdown.store(true, Ordering::Release);
    if let Some(handle) = manager.lock().unwrap().take() {
        let _ = handle.join();
    }

    inner.keep_alive.store(false, Ordering::Release);
    // Release anyone parked on pause so they can observe keep_alive == false.
    inner.on_hold.store(false, Ordering::Release);
    inner.paused_cond.notify_all();

    // Keep waking idle workers so they notice the cleared `keep_alive`, pull
    // whatever is left in the queue (workers only exit once the queue is
    // empty — see `worker::worker_loop`), and retry until either everything
    // has drained or the grace window elapses. A zero-worker pool has
    // nothing to drain it and falls through once the grace window passes
    // (see the `alive_count() > 0` check below, not gated on queue state).
    let grace = inner.config.destroy_grace_period;
    let start = Instant::now();
    loop {
        inner.queue.wake_all();
        if inner.alive_count() == 0 && inner.queue.is_empty() {
            break;
        }
        if start.elapsed() >= grace {
            break;
        }
        thread::sleep(std::time::Duration::from_millis(20));
    }

    if inner.alive_count() > 0 {
        kwarn!("destroy: workers still alive after grace period, draining unbounded");
    }
    while inner.alive_count() > 0 {
        inner.queue.wake_all();
        thread::sleep(std::time::Duration::from_secs(1));
    }

    inner.queue.clear();
    kinfo!("destroy complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use workpool_core::PoolConfig;

    #[test]
    fn init_returns_only_after_num_alive_equals_n() {
        let pool = Pool::new(PoolConfig::fixed(4)).unwrap();
        assert_eq!(pool.num_alive(), 4);
    }

    #[test]
    fn zero_worker_pool_is_inert_but_constructs() {
        let pool = Pool::new(PoolConfig::fixed(0)).unwrap();
        assert_eq!(pool.num_alive(), 0);
        assert!(pool.add_work(|| {}).is_ok());
        pool.destroy(); // must not hang: no workers ever run, nothing to drain
    }

    #[test]
    fn wait_returns_only_once_queue_and_workers_are_idle() {
        let pool = Pool::new(PoolConfig::fixed(4)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..20 {
            let counter = counter.clone();
            pool.add_work(move || {
                thread::sleep(Duration::from_millis(20));
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 20);
        assert_eq!(pool.num_working(), 0);
        assert_eq!(pool.stats().queued, 0);
    }

    #[test]
    fn fifo_single_worker() {
        let pool = Pool::new(PoolConfig::fixed(1)).unwrap();
        let order = Arc::new(StdMutex::new(Vec::new()));
        for i in 0..10 {
            let order = order.clone();
            pool.add_work(move || order.lock().unwrap().push(i)).unwrap();
        }
        pool.wait();
        assert_eq!(*order.lock().unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn pause_before_work_delays_start_until_resume() {
        let pool = Pool::new(PoolConfig::fixed(2)).unwrap();
        pool.pause();

        let started = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let started = started.clone();
            pool.add_work(move || {
                started.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }

        thread::sleep(Duration::from_millis(100));
        assert_eq!(started.load(Ordering::SeqCst), 0, "job ran before resume");

        pool.resume();
        pool.wait();
        assert_eq!(started.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn destroy_drains_in_flight_work_before_returning() {
        let pool = Pool::new(PoolConfig::fixed(4)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..8 {
            let counter = counter.clone();
            pool.add_work(move || {
                thread::sleep(Duration::from_millis(30));
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.destroy();
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn destroy_after_wait_does_not_hang() {
        let pool = Pool::new(PoolConfig::fixed(2)).unwrap();
        pool.add_work(|| {}).unwrap();
        pool.wait();
        pool.destroy();
        pool.destroy(); // idempotent
    }

    #[test]
    fn add_work_after_destroy_is_rejected() {
        let pool = Pool::new(PoolConfig::fixed(1)).unwrap();
        pool.destroy();
        assert!(matches!(pool.add_work(|| {}), Err(PoolError::Shutdown)));
    }

    #[test]
    fn wake_one_cascade_executes_all_instant_jobs() {
        let pool = Pool::new(PoolConfig::fixed(1)).unwrap();
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let counter = counter.clone();
            pool.add_work(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
        pool.wait();
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
