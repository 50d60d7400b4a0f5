//! Affinity pool configuration.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::wait_strategy::{BusySpin, Park, WaitStrategy, Yield};

/// A hint about where a worker thread should run relative to other workers.
///
/// No strategy here actually pins a thread to a CPU: the pool treats this
/// purely as a token forwarded to the configured
/// [`ThreadFactory`](crate::runtime::ThreadFactory), which is the layer
/// with enough platform knowledge to act on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CpuAffinityStrategy {
    /// No placement preference.
    Any,
    /// Prefer the same physical core as other pool workers.
    SameCore,
    /// Prefer the same socket as other pool workers.
    SameSocket,
    /// Prefer a distinct physical core from other pool workers.
    DifferentCore,
    /// Prefer a distinct socket from other pool workers.
    DifferentSocket,
}

/// Selects the back-off a worker uses between empty polls of its queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitStrategyKind {
    /// Sleep for the shortest interval the platform supports.
    Sleep,
    /// Yield the scheduler.
    Yield,
    /// Spin without yielding.
    BusySpin,
}

impl WaitStrategyKind {
    /// Build the concrete strategy object this kind names.
    #[must_use]
    pub fn build(self) -> Arc<dyn WaitStrategy> {
        match self {
            Self::Sleep => Arc::new(Park),
            Self::Yield => Arc::new(Yield),
            Self::BusySpin => Arc::new(BusySpin),
        }
    }
}

/// Configuration for an [`AffinityPoolConfig`]-built pool.
///
/// `parallelism_min`/`parallelism_factor`/`parallelism_max` describe how the
/// number of workers `N` is derived from the visible CPU count at build
/// time: `N = clamp(ceil(cores * parallelism_factor), parallelism_min,
/// parallelism_max)`, rounded up to the next power of two.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AffinityPoolConfig {
    /// Optional identity used in error messages and log lines. Defaults to
    /// an auto-generated `affinity-pool-<n>` if unset.
    #[serde(default)]
    pub name: Option<String>,
    /// Lower bound on the resolved worker count.
    pub parallelism_min: usize,
    /// Multiplier applied to the visible CPU count.
    pub parallelism_factor: f64,
    /// Upper bound on the resolved worker count.
    pub parallelism_max: usize,
    /// Capacity of each worker's queue.
    pub affinity_group_size: usize,
    /// Placement hints forwarded to the thread factory for every worker.
    #[serde(default)]
    pub cpu_affinity_strategies: Vec<CpuAffinityStrategy>,
    /// Back-off a worker uses between empty polls.
    #[serde(default = "default_wait_strategy")]
    pub worker_waiting_strategy: WaitStrategyKind,
}

fn default_wait_strategy() -> WaitStrategyKind {
    WaitStrategyKind::Yield
}

impl Default for AffinityPoolConfig {
    fn default() -> Self {
        Self {
            name: None,
            parallelism_min: 1,
            parallelism_factor: 1.0,
            parallelism_max: usize::MAX,
            affinity_group_size: 256,
            cpu_affinity_strategies: vec![CpuAffinityStrategy::Any],
            worker_waiting_strategy: default_wait_strategy(),
        }
    }
}

impl AffinityPoolConfig {
    /// Start from defaults: unbounded parallelism at `1x` cores, a single
    /// `Any` affinity hint, `Yield` back-off, and a 256-slot queue per
    /// worker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parallelism bounds and CPU multiplier used to derive `N`.
    #[must_use]
    pub fn with_parallelism(mut self, min: usize, factor: f64, max: usize) -> Self {
        self.parallelism_min = min;
        self.parallelism_factor = factor;
        self.parallelism_max = max;
        self
    }

    /// Set the per-worker queue capacity.
    #[must_use]
    pub fn with_affinity_group_size(mut self, size: usize) -> Self {
        self.affinity_group_size = size;
        self
    }

    /// Set the CPU placement hints forwarded to the thread factory.
    #[must_use]
    pub fn with_cpu_affinity_strategies(mut self, strategies: Vec<CpuAffinityStrategy>) -> Self {
        self.cpu_affinity_strategies = strategies;
        self
    }

    /// Set the worker idle back-off.
    #[must_use]
    pub fn with_wait_strategy(mut self, kind: WaitStrategyKind) -> Self {
        self.worker_waiting_strategy = kind;
        self
    }

    /// Set the pool's identity, used in log lines and rejection errors.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns a descriptive error if any bound is non-positive, the bounds
    /// are out of order, or the queue capacity is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.parallelism_min == 0 {
            return Err("parallelism_min must be at least 1".into());
        }
        if self.parallelism_max < self.parallelism_min {
            return Err("parallelism_max must be >= parallelism_min".into());
        }
        if !(self.parallelism_factor.is_finite() && self.parallelism_factor > 0.0) {
            return Err("parallelism_factor must be a positive finite number".into());
        }
        if self.affinity_group_size == 0 {
            return Err("affinity_group_size must be at least 1".into());
        }
        Ok(())
    }

    /// Resolve the number of workers this configuration builds, from the
    /// visible CPU count, clamped to `[parallelism_min, parallelism_max]`
    /// and rounded up to the next power of two.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration has not been validated, or the
    /// resolved value would not fit in a `usize`.
    pub fn resolved_parallelism(&self) -> Result<usize, String> {
        self.validate()?;
        let cores = num_cpus::get().max(1);
        #[allow(clippy::cast_precision_loss)]
        let raw = (cores as f64 * self.parallelism_factor).ceil();
        if !raw.is_finite() || raw < 0.0 {
            return Err(format!("resolved parallelism is not representable: {raw}"));
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let clamped = (raw as usize).clamp(self.parallelism_min, self.parallelism_max);
        Ok(clamped.next_power_of_two())
    }

    /// Parse and validate a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be deserialized, or fails
    /// [`validate`](Self::validate).
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        config.validate()?;
        Ok(config)
    }
}
