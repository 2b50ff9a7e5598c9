//! Error types for pool operations.

use core::fmt;

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors that can occur while operating a [`crate::Pool`]-like controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// A thread count argument was out of range (e.g. zero workers
    /// requested, or a shrink that would remove the last worker).
    InvalidArgument,

    /// The OS refused to create a worker thread.
    ResourceExhausted,

    /// `submit` targeted a worker whose queue was full.
    SubmitRejected,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolError::InvalidArgument => write!(f, "invalid argument"),
            PoolError::ResourceExhausted => write!(f, "failed to spawn worker thread"),
            PoolError::SubmitRejected => write!(f, "worker queue is full"),
        }
    }
}

impl std::error::Error for PoolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", PoolError::InvalidArgument), "invalid argument");
        assert_eq!(
            format!("{}", PoolError::SubmitRejected),
            "worker queue is full"
        );
    }
}
