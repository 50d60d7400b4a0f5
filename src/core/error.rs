//! Error types for the affinity pool.

use thiserror::Error;

/// Why a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The pool is not in the `Running` state.
    PoolNotRunning,
    /// The target queue is at `affinity_group_size` capacity.
    QueueFull,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PoolNotRunning => write!(f, "pool is not running"),
            Self::QueueFull => write!(f, "target queue is full"),
        }
    }
}

/// Errors produced by the pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Construction or submission received an invalid argument: a
    /// non-positive parallelism, an unrecognized config token, or a null
    /// task handle.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The task was rejected: the pool was not running, or its routed
    /// queue was full.
    #[error("task {task} rejected by pool {pool}: {reason}")]
    Rejected {
        /// Textual identity of the pool that rejected the task.
        pool: String,
        /// Textual identity of the rejected task.
        task: String,
        /// Why the task was rejected.
        reason: RejectReason,
    },
}
