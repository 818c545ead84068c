//! The worker loop (§4.C): Starting → Idle → Running → Idle → … → Exiting.

use crate::inner::PoolInner;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use workpool_core::{kdebug, kerror, kinfo, kprint};

/// Spawn worker `id` against shared pool state `inner`.
///
/// No OS pause signal is installed (§9's redesign note, applied in §10.7):
/// pause/resume is a condvar-backed flag checked at loop boundaries instead
/// of a signal handler busy-sleeping on `on_hold`.
pub fn spawn_worker(inner: Arc<PoolInner>, id: usize) -> std::io::Result<JoinHandle<()>> {
    let mut builder = thread::Builder::new();
    if let Some(prefix) = &inner.config.thread_name_prefix {
        builder = builder.name(format!("{prefix}-{id}"));
    }
    builder.spawn(move || worker_loop(inner, id))
}

fn worker_loop(inner: Arc<PoolInner>, id: usize) {
    kprint::set_worker_id(id as u32);
    inner.mark_alive();
    kinfo!("started");

    let mut exited_via_shrink = false;

    loop {
        // Respect a pause requested before this worker reached the job wait
        // (the "pause before work" scenario: no sleep may start before resume).
        inner.wait_while_paused();

        inner.queue.wait_for_jobs();

        // `keep_alive` clearing starts shutdown, but queued-but-not-started
        // jobs must still drain (§4.D's documented "drain them" decision) —
        // so a cleared `keep_alive` alone is not enough to exit; the queue
        // must also be empty.
        if !inner.keep_alive.load(Ordering::Acquire) && inner.queue.is_empty() {
            break;
        }

        // Elastic shrink request observed on this wake.
        if inner.try_claim_elastic_exit() {
            kinfo!("exiting via elastic shrink");
            exited_via_shrink = true;
            break;
        }

        // Pause may have been requested between the wake and here; a job
        // already queued stays queued until resume.
        inner.wait_while_paused();
        if !inner.keep_alive.load(Ordering::Acquire) && inner.queue.is_empty() {
            break;
        }

        inner.begin_job();
        if let Some(job) = inner.queue.pull() {
            kdebug!("running job");
            if let Err(panic) = catch_unwind(AssertUnwindSafe(job)) {
                let msg = panic_message(&panic);
                kerror!("job panicked: {msg}");
            }
        }
        inner.end_job();
    }

    if exited_via_shrink {
        let mut workers = inner.workers.lock().unwrap();
        if let Some(slot) = workers.get_mut(id) {
            *slot = None;
        }
    } else {
        inner.mark_exited();
    }

    kinfo!("exiting");
    kprint::clear_worker_id();
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inner::PoolInner;
    use std::sync::atomic::{AtomicUsize, Ordering as AOrdering};
    use std::time::Duration;
    use workpool_core::PoolConfig;

    #[test]
    fn worker_executes_jobs_and_decrements_on_shutdown() {
        let inner = Arc::new(PoolInner::new(PoolConfig::fixed(1)));
        let handle = spawn_worker(inner.clone(), 0).unwrap();

        while inner.alive_count() == 0 {
            thread::sleep(Duration::from_millis(5));
        }

        let ran = Arc::new(AtomicUsize::new(0));
        let ran2 = ran.clone();
        inner.queue.push(Box::new(move || {
            ran2.fetch_add(1, AOrdering::SeqCst);
        })).unwrap();

        for _ in 0..200 {
            if ran.load(AOrdering::SeqCst) == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(ran.load(AOrdering::SeqCst), 1);

        inner.keep_alive.store(false, AOrdering::Release);
        inner.queue.wake_all();
        handle.join().unwrap();
        assert_eq!(inner.alive_count(), 0);
    }

    #[test]
    fn panicking_job_does_not_kill_the_worker() {
        let inner = Arc::new(PoolInner::new(PoolConfig::fixed(1)));
        let handle = spawn_worker(inner.clone(), 0).unwrap();
        while inner.alive_count() == 0 {
            thread::sleep(Duration::from_millis(5));
        }

        inner.queue.push(Box::new(|| panic!("boom"))).unwrap();

        let ran = Arc::new(AtomicUsize::new(0));
        let ran2 = ran.clone();
        inner.queue.push(Box::new(move || {
            ran2.fetch_add(1, AOrdering::SeqCst);
        })).unwrap();

        for _ in 0..200 {
            if ran.load(AOrdering::SeqCst) == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(ran.load(AOrdering::SeqCst), 1, "worker must survive a panicking job");
        assert_eq!(inner.alive_count(), 1);

        inner.keep_alive.store(false, AOrdering::Release);
        inner.queue.wake_all();
        handle.join().unwrap();
    }

    #[test]
    fn worker_drains_queued_jobs_after_keep_alive_clears() {
        let inner = Arc::new(PoolInner::new(PoolConfig::fixed(1)));
        let handle = spawn_worker(inner.clone(), 0).unwrap();
        while inner.alive_count() == 0 {
            thread::sleep(Duration::from_millis(5));
        }

        let ran = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let ran = ran.clone();
            inner
                .queue
                .push(Box::new(move || {
                    thread::sleep(Duration::from_millis(10));
                    ran.fetch_add(1, AOrdering::SeqCst);
                }))
                .unwrap();
        }

        // Clear keep_alive immediately, before the worker has had a chance
        // to pull any of the five queued jobs: they must still all run.
        inner.keep_alive.store(false, AOrdering::Release);
        inner.queue.wake_all();
        handle.join().unwrap();

        assert_eq!(ran.load(AOrdering::SeqCst), 5);
        assert_eq!(inner.queue.len(), 0);
    }
}
