//! # wpool - fixed-capacity worker thread pool
//!
//! A small, dependency-light library for running opaque units of work on a
//! bounded, resizable set of long-lived threads.
//!
//! ## Quick start
//!
//! ```no_run
//! use wpool::{Pool, PoolConfig};
//!
//! let mut pool: Pool<1024> = Pool::init(4, PoolConfig::default()).unwrap();
//!
//! pool.submit(|| {
//!     println!("hello from a worker");
//! }).unwrap();
//!
//! pool.destroy(wpool::DestroyMode::Drain);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Caller                                │
//! │                 pool.submit(job), resize                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Pool (controller)                         │
//! │        round-robin / least-load dispatch, resize, drain      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//!    ┌───────────┐      ┌───────────┐      ┌───────────┐
//!    │  Worker   │      │  Worker   │      │  Worker   │
//!    │  + queue  │      │  + queue  │      │  + queue  │
//!    └───────────┘      └───────────┘      └───────────┘
//! ```
//!
//! The bounded ring queue, the `Job` type, the error taxonomy, and the
//! logging facade live in `wpool-core`. Worker threads, parking, dispatch,
//! and the controller live in `wpool-runtime`. This crate re-exports the
//! public surface of both.

// Re-export core types
pub use wpool_core::{wdebug, werror, winfo, wtrace, wwarn};
pub use wpool_core::{
    Job, PoolError, PoolResult, CACHE_LINE_SIZE, DEFAULT_QUEUE_CAPACITY,
};
pub use wpool_core::log::{self, set_level, LogLevel};

// Re-export runtime types
pub use wpool_runtime::{DestroyMode, DispatchPolicy, Pool, PoolConfig};
