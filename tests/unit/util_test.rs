//! Tests for utility functions

use prometheus_affinity_pool::util::{Clock, SystemClock};
use std::time::Duration;

#[test]
fn test_system_clock_advances() {
    let clock = SystemClock;
    let start = clock.now();
    std::thread::sleep(Duration::from_millis(5));
    assert!(clock.now() >= start);
}

#[test]
fn test_init_tracing_is_idempotent() {
    prometheus_affinity_pool::util::init_tracing();
    prometheus_affinity_pool::util::init_tracing();
}
