//! Convenience entry point for building a [`Pool`] from configuration.

use crate::config::AffinityPoolConfig;
use crate::core::error::PoolError;
use crate::core::pool::Pool;
use crate::runtime::ThreadFactory;

/// Validate `config` and start a pool backed by `thread_factory`.
///
/// This is a thin wrapper over [`Pool::new`]; it exists so call sites that
/// only ever build one pool can `use` a function instead of the type.
///
/// # Errors
///
/// Returns [`PoolError::InvalidArgument`] if `config` fails validation or a
/// worker thread could not be spawned.
pub fn build_pool(
    config: AffinityPoolConfig,
    thread_factory: impl ThreadFactory + 'static,
) -> Result<Pool, PoolError> {
    Pool::new(config, thread_factory)
}
