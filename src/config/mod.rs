//! Configuration for building an affinity pool.

pub mod pool;

pub use pool::{AffinityPoolConfig, CpuAffinityStrategy, WaitStrategyKind};
