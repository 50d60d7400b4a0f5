//! # Prometheus Affinity Pool
//!
//! A fixed-parallelism, affinity-routed task executor for CPU-bound work.
//!
//! The pool maintains `N` single-consumer queues, each drained by one
//! dedicated worker thread. Every submitted task carries an affinity key;
//! the pool routes all tasks sharing a key to the same queue for the life
//! of the pool, so a given logical task identity always runs on the same
//! worker thread. Paired with OS-level CPU pinning (supplied by the
//! caller's [`runtime::ThreadFactory`]), this maximizes cache locality and
//! avoids cross-core migration for short, repeated CPU-bound work.
//!
//! ## Core Problem Solved
//!
//! Generic work-stealing pools optimize for load balance at the cost of
//! cache locality: a task that runs repeatedly (e.g. per-connection or
//! per-shard logic) can bounce between cores on every submission. This pool
//! instead pins each task identity to one worker deterministically, trading
//! perfect load balance for predictable cache behavior.
//!
//! ## Key Features
//!
//! - **Deterministic affinity**: the same task identity always lands on the
//!   same queue once the router has converged on it.
//! - **Bounded, lock-free submission**: enqueue never blocks; it fails fast
//!   when a queue is full or the pool is not running.
//! - **Pluggable idle back-off**: busy-spin, yield, or park between empty
//!   polls.
//! - **Worker-death compensation**: a worker that dies from an unhandled
//!   task panic is transparently replaced while the pool is still running.
//!
//! ## Quick Example
//!
//! ```rust
//! use prometheus_affinity_pool::config::AffinityPoolConfig;
//! use prometheus_affinity_pool::core::Pool;
//! use prometheus_affinity_pool::runtime::NativeThreadFactory;
//! use std::time::Duration;
//!
//! let config = AffinityPoolConfig::new()
//!     .with_parallelism(4, 1.0, 4)
//!     .with_affinity_group_size(64);
//!
//! let pool = Pool::new(config, NativeThreadFactory::default()).unwrap();
//!
//! pool.execute(42u64, || {
//!     // runs on the worker owning affinity key 42's queue
//! }).unwrap();
//!
//! pool.shutdown();
//! assert!(pool.await_termination(Duration::from_secs(5)));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core scheduling abstractions: queues, wait strategies, router, workers,
/// and the pool lifecycle itself.
pub mod core;
/// Configuration models for pool sizing and strategy selection.
pub mod config;
/// Builders to construct a running pool from configuration.
pub mod builders;
/// Thread-creation adapters (the external collaborator behind the spec's
/// "thread factory" interface).
pub mod runtime;
/// Shared utilities: clock and tracing bootstrap helpers.
pub mod util;

/// High-performance mutex, re-exported from `parking_lot`.
pub mod mutex;
/// Condition variable for thread coordination.
pub mod condvar;
/// One-time initialization primitives.
pub mod once;
/// High-performance reader-writer lock, re-exported from `parking_lot`.
pub mod rwlock;

pub use condvar::Condvar;
pub use mutex::{MappedMutexGuard, Mutex, MutexGuard};
pub use once::{Once, OnceCell};
pub use rwlock::{
    MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard,
    RwLockUpgradableReadGuard, RwLockWriteGuard,
};
