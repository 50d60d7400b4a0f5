//! Tests for configuration validation

use prometheus_affinity_pool::config::{AffinityPoolConfig, CpuAffinityStrategy, WaitStrategyKind};

#[test]
fn test_default_config_validates() {
    assert!(AffinityPoolConfig::new().validate().is_ok());
}

#[test]
fn test_invalid_min_parallelism_rejected() {
    let invalid = AffinityPoolConfig::new().with_parallelism(0, 1.0, 4);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_inverted_bounds_rejected() {
    let invalid = AffinityPoolConfig::new().with_parallelism(10, 1.0, 2);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_zero_affinity_group_size_rejected() {
    let invalid = AffinityPoolConfig::new().with_affinity_group_size(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_nonpositive_factor_rejected() {
    let invalid = AffinityPoolConfig::new().with_parallelism(1, 0.0, 4);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_builder_methods_round_trip() {
    let config = AffinityPoolConfig::new()
        .with_parallelism(2, 1.5, 16)
        .with_affinity_group_size(128)
        .with_cpu_affinity_strategies(vec![CpuAffinityStrategy::SameSocket])
        .with_wait_strategy(WaitStrategyKind::BusySpin)
        .with_name("test-pool");

    assert_eq!(config.parallelism_min, 2);
    assert_eq!(config.affinity_group_size, 128);
    assert_eq!(config.cpu_affinity_strategies, vec![CpuAffinityStrategy::SameSocket]);
    assert_eq!(config.worker_waiting_strategy, WaitStrategyKind::BusySpin);
    assert_eq!(config.name.as_deref(), Some("test-pool"));
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "parallelism-min": 2,
        "parallelism-factor": 2.0,
        "parallelism-max": 32,
        "affinity-group-size": 512,
        "cpu-affinity-strategies": ["same-core", "any"],
        "worker-waiting-strategy": "sleep"
    }"#;

    let config = AffinityPoolConfig::from_json_str(json).unwrap();
    assert_eq!(config.affinity_group_size, 512);
    assert_eq!(config.worker_waiting_strategy, WaitStrategyKind::Sleep);
}

#[test]
fn test_config_from_json_rejects_malformed_input() {
    assert!(AffinityPoolConfig::from_json_str("not json").is_err());
}
