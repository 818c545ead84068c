//! # workpool — a general-purpose worker thread pool
//!
//! ```ignore
//! use workpool::{Pool, PoolConfig};
//!
//! let pool = Pool::fixed(4).unwrap();
//! for i in 0..16 {
//!     pool.add_work(move || println!("job {i} on some worker thread")).unwrap();
//! }
//! pool.wait(); // blocks until every job above has run
//! ```
//!
//! An elastic pool grows and shrinks its worker count between `min` and
//! `max` based on backlog, via a manager thread that wakes periodically:
//!
//! ```ignore
//! use workpool::PoolConfig;
//!
//! let config = PoolConfig::elastic(2, 8).queue_capacity(256);
//! let pool = workpool::Pool::new(config).unwrap();
//! ```
//!
//! Submitted work is fire-and-forget (see [`Pool::add_work`]'s docs on the
//! crate's non-goals); a caller that needs a result back should capture a
//! reply channel in the closure it submits.

pub use workpool_core::{init_logging, set_log_level, Job, LogLevel, PoolConfig, PoolError, PoolResult};
pub use workpool_runtime::{pool::Pool, stats::PoolStats};
