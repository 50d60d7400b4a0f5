//! Thread creation for pool workers.

pub mod thread_factory;

pub use thread_factory::{NativeThreadFactory, ThreadFactory};
