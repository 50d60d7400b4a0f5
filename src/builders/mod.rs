//! Construction helpers that turn configuration into a running [`Pool`](crate::core::pool::Pool).

pub mod pool_builder;

pub use pool_builder::build_pool;
