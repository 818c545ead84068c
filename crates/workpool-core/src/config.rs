//! Pool configuration.

use crate::env::env_get;
use crate::error::PoolError;
use std::time::Duration;

/// Tunables for a [`Pool`](../../workpool_runtime/struct.Pool.html).
///
/// A fixed-size pool is `min_workers == max_workers`; an elastic pool sets
/// `max_workers` above `min_workers` and spawns a manager thread that grows
/// and shrinks the live worker count between the two bounds (§4.E of the
/// design doc).
///
/// Defaults for the tick/batch/grace knobs come straight from the C
/// `threadpool.c` this crate is modeled on: a 3 second manager tick, a
/// growth/shrink batch of 2 (`const int NUMBER = 2`), and a 1 second destroy
/// grace window.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Minimum number of live workers. An elastic manager never shrinks below this.
    pub min_workers: usize,
    /// Maximum number of live workers. An elastic manager never grows above this.
    pub max_workers: usize,
    /// Bound on queued-but-not-started jobs. `None` means unbounded, matching
    /// the spec's "unbounded FIFO"; `Some(n)` rejects `add_work` once `n` jobs
    /// are queued, modeling `threadPoolCreate`'s `queueSize`.
    pub queue_capacity: Option<usize>,
    /// How often the elastic manager wakes to re-evaluate load.
    pub manager_tick: Duration,
    /// How many workers the manager grows or shrinks by in a single tick.
    pub grow_batch: usize,
    /// How long `destroy` waits for idle workers to notice shutdown before
    /// falling back to unbounded polling for workers stuck in long jobs.
    pub destroy_grace_period: Duration,
    /// Best-effort OS thread name prefix (`"{prefix}-{id}"`); `None` skips naming.
    pub thread_name_prefix: Option<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self {
            min_workers: cpus,
            max_workers: cpus,
            queue_capacity: None,
            manager_tick: Duration::from_secs(env_get("WORKPOOL_MANAGER_TICK_SECS", 3)),
            grow_batch: env_get("WORKPOOL_GROW_BATCH", 2),
            destroy_grace_period: Duration::from_secs(env_get(
                "WORKPOOL_DESTROY_GRACE_SECS",
                1,
            )),
            thread_name_prefix: Some("workpool-worker".to_string()),
        }
    }
}

impl PoolConfig {
    /// A fixed-size pool with `n` workers (`min_workers == max_workers == n`,
    /// no manager thread is spawned).
    pub fn fixed(n: usize) -> Self {
        Self {
            min_workers: n,
            max_workers: n,
            ..Self::default()
        }
    }

    /// An elastic pool that grows and shrinks the worker set between `min` and `max`.
    pub fn elastic(min: usize, max: usize) -> Self {
        Self {
            min_workers: min,
            max_workers: max,
            ..Self::default()
        }
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = Some(capacity);
        self
    }

    pub fn manager_tick(mut self, tick: Duration) -> Self {
        self.manager_tick = tick;
        self
    }

    pub fn grow_batch(mut self, batch: usize) -> Self {
        self.grow_batch = batch;
        self
    }

    pub fn destroy_grace_period(mut self, grace: Duration) -> Self {
        self.destroy_grace_period = grace;
        self
    }

    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = Some(prefix.into());
        self
    }

    /// Whether this configuration describes an elastic pool (manager thread
    /// spawned) as opposed to a fixed-size one.
    pub fn is_elastic(&self) -> bool {
        self.max_workers > self.min_workers
    }

    /// Validate the configuration, the "programmer error" boundary of §7.2.
    ///
    /// `init(0)` is accepted per the design notes' decision to document
    /// zero-worker pools as inert rather than reject them outright (see
    /// DESIGN.md); `min_workers > max_workers` and a zero `grow_batch` on an
    /// elastic pool are rejected as contract violations.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.min_workers > self.max_workers {
            return Err(PoolError::InvalidConfig(format!(
                "min_workers ({}) must not exceed max_workers ({})",
                self.min_workers, self.max_workers
            )));
        }
        if self.is_elastic() && self.grow_batch == 0 {
            return Err(PoolError::InvalidConfig(
                "grow_batch must be non-zero for an elastic pool".to_string(),
            ));
        }
        if let Some(0) = self.queue_capacity {
            return Err(PoolError::InvalidConfig(
                "queue_capacity must be non-zero when bounded".to_string(),
            ));
        }
        Ok(())
    }
}
