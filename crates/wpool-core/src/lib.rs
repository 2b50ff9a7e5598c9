//! # wpool-core
//!
//! Core types for the `wpool` worker thread pool — platform-agnostic.
//!
//! This crate is pure Rust with no OS-specific code: the ring queue, the
//! work item type, the error taxonomy, and the logging facade. Worker
//! threads, parking, and the pool controller live in `wpool-runtime`.
//!
//! ## Modules
//!
//! - `work_item` — the opaque [`Job`] closure type
//! - `queue` — the per-worker bounded ring queue
//! - `error` — [`PoolError`] and [`PoolResult`]
//! - `log` — leveled, dependency-free logging macros
//! - `env` — environment variable parsing helpers
//! - `constants` — compile-time defaults

pub mod constants;
pub mod env;
pub mod error;
pub mod log;
pub mod queue;
pub mod work_item;

pub use constants::{CACHE_LINE_SIZE, DEFAULT_QUEUE_CAPACITY};
pub use error::{PoolError, PoolResult};
pub use queue::WorkQueue;
pub use work_item::Job;
