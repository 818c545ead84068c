//! # workpool-core — platform-agnostic types for the workpool thread pool
//!
//! This crate carries the bits of `workpool` that don't depend on spawning
//! threads or synchronizing them: the [`Job`] type, [`PoolConfig`], the
//! [`PoolError`] surface, and the `kprint`-style diagnostic macros. The
//! actual worker loop and pool state machine live in `workpool-runtime`.

pub mod config;
pub mod env;
pub mod error;
pub mod job;
pub mod kprint;

pub use config::PoolConfig;
pub use env::{env_get, env_get_bool};
pub use error::{PoolError, PoolResult};
pub use job::Job;
pub use kprint::{init as init_logging, set_log_level, LogLevel};
