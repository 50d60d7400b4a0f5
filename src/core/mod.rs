//! Core scheduling abstractions: queues, routing, workers, and the pool.

pub mod error;
pub mod pool;
pub mod queue;
pub mod router;
pub mod task;
pub mod wait_strategy;
pub mod worker;

pub use error::{PoolError, RejectReason};
pub use pool::{Pool, PoolState};
pub use queue::BoundedQueue;
pub use router::AffinityRouter;
pub use task::{BoxedTask, TaskKey};
pub use wait_strategy::{BusySpin, Park, WaitStrategy, Yield};
pub use worker::Worker;
