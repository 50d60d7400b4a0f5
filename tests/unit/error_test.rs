//! Tests for error types

use prometheus_affinity_pool::core::{PoolError, RejectReason};

#[test]
fn test_invalid_argument_display() {
    let err = PoolError::InvalidArgument("affinity_group_size must be at least 1".to_string());
    assert_eq!(
        format!("{err}"),
        "invalid argument: affinity_group_size must be at least 1"
    );
}

#[test]
fn test_rejected_pool_not_running_display() {
    let err = PoolError::Rejected {
        pool: "affinity-pool-0".to_string(),
        task: "00000000000002a".to_string(),
        reason: RejectReason::PoolNotRunning,
    };
    assert_eq!(
        format!("{err}"),
        "task 00000000000002a rejected by pool affinity-pool-0: pool is not running"
    );
}

#[test]
fn test_rejected_queue_full_display() {
    let err = PoolError::Rejected {
        pool: "affinity-pool-0".to_string(),
        task: "cafef00d".to_string(),
        reason: RejectReason::QueueFull,
    };
    assert_eq!(
        format!("{err}"),
        "task cafef00d rejected by pool affinity-pool-0: target queue is full"
    );
}

#[test]
fn test_reject_reason_equality() {
    assert_eq!(RejectReason::PoolNotRunning, RejectReason::PoolNotRunning);
    assert_ne!(RejectReason::PoolNotRunning, RejectReason::QueueFull);
}
