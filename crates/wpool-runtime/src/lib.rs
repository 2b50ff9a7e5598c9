//! # wpool-runtime
//!
//! OS-facing half of the pool: parking primitives, worker threads, the
//! dispatch policies, and the controller that ties them together.
//!
//! - `parking` — platform park/wake (futex on Linux, condvar elsewhere)
//! - `config` — [`PoolConfig`], compile-time defaults with env overrides
//! - `dispatch` — [`DispatchPolicy`] and its selection logic
//! - `worker` — a single worker thread's queue, state, and run loop
//! - `controller` — [`Pool`], the public-facing controller type

pub mod config;
pub mod controller;
pub mod dispatch;
pub mod parking;
pub mod worker;

pub use config::PoolConfig;
pub use controller::{DestroyMode, Pool};
pub use dispatch::DispatchPolicy;
pub use worker::{Worker, WorkerHandle};
