//! The unit of work the pool executes.

/// An opaque unit of work: a boxed closure that takes no arguments and
/// returns nothing.
///
/// A routine-plus-argument pair folds naturally into a closure's
/// environment in Rust. The pool never inspects, copies, or schedules by
/// a job's contents — it is consumed exactly once by whichever worker
/// dequeues it.
pub type Job = Box<dyn FnOnce() + Send + 'static>;
