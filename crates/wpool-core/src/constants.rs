//! Compile-time defaults for the pool.

/// Default per-worker queue capacity. Must be a power of two.
///
/// Callers that need a different capacity pick it by instantiating
/// [`crate::queue::WorkQueue`] with a different const generic; this is
/// simply the value `Pool::init` uses when none is specified.
pub const DEFAULT_QUEUE_CAPACITY: usize = 65536;

/// Cache line size used to pad hot atomics against false sharing.
pub const CACHE_LINE_SIZE: usize = 64;
