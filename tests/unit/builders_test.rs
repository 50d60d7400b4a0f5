//! Tests for builder modules

use prometheus_affinity_pool::builders::build_pool;
use prometheus_affinity_pool::config::AffinityPoolConfig;
use prometheus_affinity_pool::core::PoolError;
use prometheus_affinity_pool::runtime::NativeThreadFactory;
use std::time::Duration;

#[test]
fn test_build_pool_honors_fixed_parallelism() {
    let config = AffinityPoolConfig::new()
        .with_parallelism(2, 1.0, 2)
        .with_affinity_group_size(4);

    let pool = build_pool(config, NativeThreadFactory::default()).unwrap();
    assert_eq!(pool.parallelism(), 2);
    assert_eq!(pool.affinity_group_size(), 4);

    pool.shutdown();
    assert!(pool.await_termination(Duration::from_secs(5)));
}

#[test]
fn test_build_pool_rejects_invalid_config() {
    let config = AffinityPoolConfig::new().with_parallelism(0, 1.0, 4);
    let err = build_pool(config, NativeThreadFactory::default()).unwrap_err();
    assert!(matches!(err, PoolError::InvalidArgument(_)));
}
