//! The affinity pool: a fixed number of workers, each draining its own
//! queue, with tasks routed sticky-per-key by an [`AffinityRouter`].

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU8, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::config::AffinityPoolConfig;
use crate::core::error::{PoolError, RejectReason};
use crate::core::queue::BoundedQueue;
use crate::core::router::AffinityRouter;
use crate::core::task::{BoxedTask, TaskKey};
use crate::core::worker::{ExitCallback, PoolStateProvider, Worker};
use crate::runtime::ThreadFactory;
use crate::{Condvar, Mutex};

static POOL_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// The pool's lifecycle, totally ordered and monotonically non-decreasing.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PoolState {
    /// Accepting and running submissions.
    Running = 0,
    /// No longer accepting submissions; draining queued work.
    ShuttingDown = 1,
    /// No longer accepting submissions; workers interrupted, draining may
    /// still be in progress for the task each was running when stopped.
    ShutDown = 2,
    /// All workers have exited. Terminal.
    Terminated = 3,
}

impl PoolState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Running,
            1 => Self::ShuttingDown,
            2 => Self::ShutDown,
            3 => Self::Terminated,
            other => unreachable!("invalid pool state byte {other}"),
        }
    }
}

struct Bookkeeping {
    workers: HashMap<usize, Arc<Worker>>,
}

struct PoolInner {
    id: String,
    affinity_group_size: usize,
    state: AtomicU8,
    queues: Vec<Arc<BoundedQueue>>,
    router: AffinityRouter,
    wait_strategy: Arc<dyn crate::core::wait_strategy::WaitStrategy>,
    thread_factory: Box<dyn ThreadFactory>,
    cpu_affinity: Vec<crate::config::CpuAffinityStrategy>,
    bookkeeping: Mutex<Bookkeeping>,
    termination: Condvar,
    /// Count of live `Pool` handles, distinct from `Arc::strong_count`: each
    /// worker thread also holds an `Arc<PoolInner>` clone (captured by
    /// `pool_state`/`on_exit` in `start_worker`), so `PoolInner` itself is
    /// never dropped while a worker is alive. This counter tracks handles
    /// the caller holds, so the last one going out of scope can force a
    /// shutdown instead of leaking busy-spinning worker threads forever.
    handle_count: AtomicUsize,
}

impl PoolInner {
    fn state(&self) -> PoolState {
        PoolState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Moves the pool's state forward to at least `target`, never backward.
    /// Returns whether this call performed the transition.
    fn advance_state_at_least(&self, target: PoolState) -> bool {
        let mut current = self.state.load(Ordering::Acquire);
        while current < target as u8 {
            match self.state.compare_exchange_weak(
                current,
                target as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
        false
    }

    fn execute(&self, key: TaskKey, task: BoxedTask) -> Result<(), PoolError> {
        if self.state() != PoolState::Running {
            return Err(PoolError::Rejected {
                pool: self.id.clone(),
                task: key.to_string(),
                reason: RejectReason::PoolNotRunning,
            });
        }

        let idx = self.router.route_key(key);
        match self.queues[idx].add(task) {
            Ok(()) => Ok(()),
            Err(_dropped) => {
                warn!(pool = %self.id, queue = idx, "submission rejected: queue full");
                Err(PoolError::Rejected {
                    pool: self.id.clone(),
                    task: key.to_string(),
                    reason: RejectReason::QueueFull,
                })
            }
        }
    }

    fn shutdown(&self) {
        let mut bk = self.bookkeeping.lock();
        if self.advance_state_at_least(PoolState::ShuttingDown) {
            info!(pool = %self.id, "pool shutting down gracefully");
        }
        for worker in bk.workers.values() {
            worker.stop_if_idle();
        }
        self.attempt_termination(&mut bk);
    }

    fn shutdown_now(&self) -> Vec<BoxedTask> {
        let mut bk = self.bookkeeping.lock();
        if self.advance_state_at_least(PoolState::ShutDown) {
            warn!(pool = %self.id, "pool hard stopping");
        }
        for worker in bk.workers.values() {
            worker.stop();
        }
        self.attempt_termination(&mut bk);
        Vec::new()
    }

    fn attempt_termination(&self, bk: &mut Bookkeeping) {
        if bk.workers.is_empty() && self.state.load(Ordering::Acquire) == PoolState::ShutDown as u8
        {
            self.state.store(PoolState::Terminated as u8, Ordering::Release);
            info!(pool = %self.id, "pool terminated");
            self.termination.notify_all();
        }
    }

    fn await_termination(&self, timeout: Duration) -> bool {
        let mut bk = self.bookkeeping.lock();
        let deadline = Instant::now() + timeout;
        loop {
            if self.state() == PoolState::Terminated {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            self.termination.wait_for(&mut bk, deadline - now);
        }
    }

    fn start_worker(pool: &Arc<PoolInner>, id: usize) -> std::io::Result<Arc<Worker>> {
        let worker = Arc::new(Worker::new(id));
        let queue = Arc::clone(&pool.queues[id]);
        let wait_strategy = Arc::clone(&pool.wait_strategy);

        let state_pool = Arc::clone(pool);
        let pool_state: PoolStateProvider = Arc::new(move || state_pool.state.load(Ordering::Acquire));

        let exit_pool = Arc::clone(pool);
        let on_exit: ExitCallback = Arc::new(move |worker_id, abrupt| {
            PoolInner::on_worker_exit(&exit_pool, worker_id, abrupt);
        });

        worker.start(
            queue,
            wait_strategy,
            pool_state,
            pool.thread_factory.as_ref(),
            pool.cpu_affinity.clone(),
            on_exit,
        )?;
        Ok(worker)
    }

    fn on_worker_exit(pool: &Arc<PoolInner>, id: usize, abrupt: bool) {
        let mut bk = pool.bookkeeping.lock();
        bk.workers.remove(&id);
        debug!(pool = %pool.id, worker = id, abrupt, "worker exited");

        let state = pool.state();

        if bk.workers.is_empty() && !abrupt && state >= PoolState::ShuttingDown {
            pool.advance_state_at_least(PoolState::ShutDown);
            pool.attempt_termination(&mut bk);
        }

        if abrupt && state == PoolState::Running {
            warn!(pool = %pool.id, worker = id, "worker died abruptly; spawning replacement");
            match PoolInner::start_worker(pool, id) {
                Ok(worker) => {
                    bk.workers.insert(id, worker);
                }
                Err(err) => {
                    error!(pool = %pool.id, worker = id, error = %err, "failed to spawn replacement worker");
                }
            }
        }
    }
}

/// A fixed-parallelism, affinity-routed task executor.
///
/// Cheaply `Clone`-able; every clone shares the same underlying workers and
/// queues. Dropping the last handle forces a hard stop if the caller never
/// called [`Pool::shutdown`] or [`Pool::shutdown_now`], so workers don't
/// spin forever with nobody left to stop them.
pub struct Pool {
    inner: Arc<PoolInner>,
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("id", &self.inner.id)
            .field("state", &self.inner.state())
            .finish()
    }
}

impl Clone for Pool {
    fn clone(&self) -> Self {
        self.inner.handle_count.fetch_add(1, Ordering::Relaxed);
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Drop for Pool {
    fn drop(&mut self) {
        if self.inner.handle_count.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }
        if self.inner.state() < PoolState::ShutDown {
            warn!(pool = %self.inner.id, "last pool handle dropped without explicit shutdown; forcing a hard stop");
            self.inner.shutdown_now();
        }
    }
}

impl Pool {
    /// Construct and start a pool from `config`, using `thread_factory` to
    /// create each worker's OS thread.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidArgument`] if `config` fails validation
    /// or a worker thread could not be spawned.
    pub fn new(
        config: AffinityPoolConfig,
        thread_factory: impl ThreadFactory + 'static,
    ) -> Result<Self, PoolError> {
        config.validate().map_err(PoolError::InvalidArgument)?;
        let parallelism = config
            .resolved_parallelism()
            .map_err(PoolError::InvalidArgument)?;

        let queues: Vec<Arc<BoundedQueue>> = (0..parallelism)
            .map(|_| Arc::new(BoundedQueue::new(config.affinity_group_size)))
            .collect();
        let wait_strategy = config.worker_waiting_strategy.build();
        let id = config.name.clone().unwrap_or_else(|| {
            format!(
                "affinity-pool-{}",
                POOL_SEQUENCE.fetch_add(1, Ordering::Relaxed)
            )
        });

        let inner = Arc::new(PoolInner {
            id,
            affinity_group_size: config.affinity_group_size,
            state: AtomicU8::new(PoolState::Running as u8),
            queues,
            router: AffinityRouter::new(parallelism),
            wait_strategy,
            thread_factory: Box::new(thread_factory),
            cpu_affinity: config.cpu_affinity_strategies.clone(),
            bookkeeping: Mutex::new(Bookkeeping {
                workers: HashMap::with_capacity(parallelism),
            }),
            termination: Condvar::new(),
            handle_count: AtomicUsize::new(1),
        });

        {
            let mut bk = inner.bookkeeping.lock();
            for id in 0..parallelism {
                let worker = PoolInner::start_worker(&inner, id).map_err(|e| {
                    PoolError::InvalidArgument(format!("failed to spawn worker {id}: {e}"))
                })?;
                bk.workers.insert(id, worker);
            }
        }

        info!(pool = %inner.id, parallelism, "affinity pool started");
        Ok(Self { inner })
    }

    /// Submit `task` for execution on the queue bound to `affinity`.
    ///
    /// Every submission sharing an equal `affinity` value runs on the same
    /// worker, in submission order relative to each other.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Rejected`] if the pool is not `Running` or the
    /// routed queue is at capacity.
    pub fn execute<K, F>(&self, affinity: K, task: F) -> Result<(), PoolError>
    where
        K: Hash,
        F: FnOnce() + Send + 'static,
    {
        let key = TaskKey::from_affinity(&affinity);
        self.inner.execute(key, Box::new(task))
    }

    /// Stop accepting new submissions and let already-queued and
    /// in-progress work drain. Idempotent; calling it after
    /// [`shutdown_now`](Self::shutdown_now) is a no-op.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }

    /// Stop accepting new submissions and interrupt every worker as soon as
    /// its current task (if any) finishes, discarding anything still
    /// queued. Always returns an empty list: queued tasks are not surfaced.
    /// Idempotent.
    pub fn shutdown_now(&self) -> Vec<BoxedTask> {
        self.inner.shutdown_now()
    }

    /// Block the calling thread until the pool reaches `Terminated`, or
    /// `timeout` elapses. Returns whether termination was observed.
    pub fn await_termination(&self, timeout: Duration) -> bool {
        self.inner.await_termination(timeout)
    }

    /// `true` exactly while the pool is in the `ShutDown` state: no longer
    /// accepting submissions and every worker has been interrupted, but not
    /// necessarily all exited yet. `false` both while merely `ShuttingDown`
    /// and once `Terminated` — this is the literal reading of `state ==
    /// ShutDown`, not `state >= ShuttingDown`.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.inner.state() == PoolState::ShutDown
    }

    /// `true` once every worker has exited.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.inner.state() == PoolState::Terminated
    }

    /// The fixed number of workers/queues this pool was built with.
    #[must_use]
    pub fn parallelism(&self) -> usize {
        self.inner.queues.len()
    }

    /// The per-queue capacity each worker's queue was built with.
    #[must_use]
    pub fn affinity_group_size(&self) -> usize {
        self.inner.affinity_group_size
    }
}
