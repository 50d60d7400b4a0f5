//! Turns a worker body into a running OS thread.

use std::io;
use std::thread::{Builder, JoinHandle};

use crate::config::CpuAffinityStrategy;

/// Creates the OS thread backing each pool worker.
///
/// Implementors decide how (or whether) to act on `affinity`; the pool
/// itself has no platform-specific pinning logic and only forwards the
/// configured hints.
pub trait ThreadFactory: Send + Sync {
    /// Spawn `body` as a named thread, passing along the requested
    /// placement hints.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`io::Error`] if the OS thread could not be
    /// created.
    fn spawn(
        &self,
        name: String,
        affinity: &[CpuAffinityStrategy],
        body: Box<dyn FnOnce() + Send + 'static>,
    ) -> io::Result<JoinHandle<()>>;
}

/// A plain [`std::thread::Builder`]-backed factory.
///
/// It never pins threads to specific cores or sockets: `cpu_affinity_strategies`
/// is accepted and ignored. Real CPU pinning is platform-specific enough
/// (cgroups, `sched_setaffinity`, macOS QoS classes) that it is left to a
/// caller-supplied implementation of this trait.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeThreadFactory {
    stack_size: Option<usize>,
}

impl NativeThreadFactory {
    /// A factory using the platform's default stack size.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that sets an explicit stack size on every spawned thread.
    #[must_use]
    pub fn with_stack_size(stack_size: usize) -> Self {
        Self {
            stack_size: Some(stack_size),
        }
    }
}

impl ThreadFactory for NativeThreadFactory {
    fn spawn(
        &self,
        name: String,
        _affinity: &[CpuAffinityStrategy],
        body: Box<dyn FnOnce() + Send + 'static>,
    ) -> io::Result<JoinHandle<()>> {
        let mut builder = Builder::new().name(name);
        if let Some(stack_size) = self.stack_size {
            builder = builder.stack_size(stack_size);
        }
        builder.spawn(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn spawns_and_runs_body() {
        let factory = NativeThreadFactory::new();
        let ran = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&ran);
        let handle = factory
            .spawn(
                "test-worker".into(),
                &[CpuAffinityStrategy::Any],
                Box::new(move || flag.store(true, Ordering::SeqCst)),
            )
            .unwrap();
        handle.join().unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn with_stack_size_sets_custom_stack() {
        let factory = NativeThreadFactory::with_stack_size(64 * 1024);
        let handle = factory
            .spawn("stacked".into(), &[], Box::new(|| {}))
            .unwrap();
        handle.join().unwrap();
    }
}
