//! Error type for the workpool crate family.

/// Errors a pool can report to a caller.
///
/// The fourth error kind in the design notes — a panicking job — is not a
/// variant here: it cannot be observed by the `add_work` call that submitted
/// the job, since dispatch is fire-and-forget. The worker loop catches and
/// logs it instead (see `workpool_runtime::worker`).
#[derive(thiserror::Error, Debug)]
pub enum PoolError {
    #[error("failed to spawn worker thread: {0}")]
    SpawnFailed(#[from] std::io::Error),

    #[error("submission rejected: pool is shutting down")]
    Shutdown,

    #[error("submission rejected: queue is full ({capacity} jobs queued)")]
    QueueFull { capacity: usize },

    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),
}

pub type PoolResult<T> = std::result::Result<T, PoolError>;
