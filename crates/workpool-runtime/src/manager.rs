//! The elastic manager loop (§4.E), grounded directly on `threadpool.c`'s
//! `manager()` thread: wake every `manager_tick` (default 3s, matching the
//! source's `sleep(3)`), inspect backlog vs. live/busy counts, and grow or
//! shrink the worker set. Growth and shrink predicates are disjoint under a
//! single snapshot, so no further tie-break is needed (§4.E).

use crate::inner::PoolInner;
use crate::worker::spawn_worker;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use workpool_core::{kdebug, kinfo, kwarn};

pub fn manager_loop(inner: Arc<PoolInner>) {
    kinfo!("manager started, tick={:?}", inner.config.manager_tick);

    while !inner.manager_shutdown.load(Ordering::Acquire) {
        std::thread::sleep(inner.config.manager_tick);
        if inner.manager_shutdown.load(Ordering::Acquire) {
            break;
        }

        let (queued, alive, working) = inner.snapshot();
        kdebug!("tick: queued={queued} alive={alive} working={working}");

        if queued > alive && alive < inner.config.max_workers {
            grow(&inner, alive);
        } else if working * 2 < alive && alive > inner.config.min_workers {
            shrink(&inner);
        }
    }

    kinfo!("manager stopping");
}

fn grow(inner: &Arc<PoolInner>, alive: usize) {
    let room = inner.config.max_workers - alive;
    let batch = inner.config.grow_batch.min(room);
    let mut workers = inner.workers.lock().unwrap();
    let mut spawned = 0;
    for id in 0..workers.len() {
        if spawned >= batch {
            break;
        }
        if workers[id].is_some() {
            continue;
        }
        match spawn_worker(inner.clone(), id) {
            Ok(handle) => {
                workers[id] = Some(handle);
                spawned += 1;
            }
            Err(err) => {
                kwarn!("failed to spawn worker {id} during growth: {err}");
                break;
            }
        }
    }
    if spawned > 0 {
        kinfo!("grew by {spawned} worker(s)");
    }
}

fn shrink(inner: &Arc<PoolInner>) {
    let batch = inner.config.grow_batch;
    // Assignment, not accumulation: a tick's shrink request fully replaces
    // any still-pending one rather than stacking on top of it.
    inner.exit_count.store(batch, Ordering::Release);
    for _ in 0..batch {
        inner.queue.wake_one();
    }
    kinfo!("requested shrink of up to {batch} worker(s)");
}
