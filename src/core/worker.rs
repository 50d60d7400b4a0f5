//! A single worker thread draining one [`BoundedQueue`](crate::core::queue::BoundedQueue).

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::CpuAffinityStrategy;
use crate::core::queue::BoundedQueue;
use crate::core::wait_strategy::WaitStrategy;
use crate::runtime::ThreadFactory;
use crate::Mutex;

/// Callback invoked with the current pool lifecycle rank, decoupling the
/// worker loop from the concrete `Pool` type it runs inside of.
pub type PoolStateProvider = Arc<dyn Fn() -> u8 + Send + Sync>;

/// Callback invoked exactly once when a worker's loop exits, with the
/// worker's id and whether the exit was abrupt (a task panicked).
pub type ExitCallback = Arc<dyn Fn(usize, bool) + Send + Sync>;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    NotStarted = 0,
    Idle = 1,
    InExecution = 2,
}

/// The thread-of-control owning one queue's consumer end.
///
/// A `Worker` is constructed, then handed to [`Worker::start`] which spawns
/// its OS thread. After that, other threads only ever call [`Worker::stop`]
/// or [`Worker::stop_if_idle`] on it; the worker's own thread is the only
/// one that touches its queue's consumer side.
pub struct Worker {
    id: usize,
    state: AtomicU8,
    interrupted: AtomicBool,
    started: AtomicBool,
    thread_handle: Mutex<Option<std::thread::JoinHandle<()>>>,
}

impl Worker {
    /// Create a worker for queue `id`, not yet started.
    #[must_use]
    pub fn new(id: usize) -> Self {
        Self {
            id,
            state: AtomicU8::new(WorkerState::NotStarted as u8),
            interrupted: AtomicBool::new(false),
            started: AtomicBool::new(false),
            thread_handle: Mutex::new(None),
        }
    }

    /// This worker's queue index.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Spawn the worker's OS thread and begin draining `queue`.
    ///
    /// `pool_state` is polled once per loop iteration to decide whether the
    /// worker should keep running; `on_exit` fires exactly once, after the
    /// loop returns normally or a task panic unwinds out of it.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        self: &Arc<Self>,
        queue: Arc<BoundedQueue>,
        wait_strategy: Arc<dyn WaitStrategy>,
        pool_state: PoolStateProvider,
        thread_factory: &dyn ThreadFactory,
        cpu_affinity: Vec<CpuAffinityStrategy>,
        on_exit: ExitCallback,
    ) -> std::io::Result<()> {
        self.state.store(WorkerState::Idle as u8, Ordering::Release);
        let worker = Arc::clone(self);
        let id = self.id;
        let name = format!("affinity-worker-{id}");

        let body: Box<dyn FnOnce() + Send> = Box::new(move || {
            debug!(worker_id = id, "worker started");
            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                worker.run_loop(queue.as_ref(), wait_strategy.as_ref(), pool_state.as_ref());
            }));
            let abrupt = outcome.is_err();
            if abrupt {
                warn!(worker_id = id, "worker exiting abruptly after task panic");
            } else {
                debug!(worker_id = id, "worker exiting normally");
            }
            on_exit(id, abrupt);
        });

        let handle = thread_factory.spawn(name, &cpu_affinity, body)?;
        *self.thread_handle.lock() = Some(handle);
        self.started.store(true, Ordering::Release);
        Ok(())
    }

    fn run_loop(&self, queue: &BoundedQueue, wait: &dyn WaitStrategy, pool_state: &(dyn Fn() -> u8 + Send + Sync)) {
        while self.should_keep_running(queue, pool_state()) {
            match queue.poll() {
                Some(task) => {
                    let _guard = ExecutionGuard::new(&self.state);
                    task();
                }
                None => wait.wait(),
            }
        }
    }

    /// `pool_state` is the pool's lifecycle rank (`PoolState as u8`); kept
    /// generic over the concrete enum to avoid a dependency cycle with
    /// [`crate::core::pool`].
    fn should_keep_running(&self, queue: &BoundedQueue, pool_state: u8) -> bool {
        const SHUTTING_DOWN: u8 = 1;
        const SHUT_DOWN: u8 = 2;

        let has_pending_or_running = pool_state < SHUTTING_DOWN || !queue.is_empty();
        let not_interrupted = !self.interrupted.swap(false, Ordering::AcqRel);
        let not_fully_shut_down = pool_state != SHUT_DOWN;

        has_pending_or_running && not_interrupted && not_fully_shut_down
    }

    /// Request that this worker stop, regardless of what it is doing. A
    /// worker currently running a task finishes that task, then observes
    /// the interrupt on its next loop check.
    pub fn stop(&self) {
        if self.started.load(Ordering::Acquire) {
            self.interrupted.store(true, Ordering::Release);
        }
    }

    /// Request that this worker stop only if it is currently idle. Used
    /// during graceful shutdown so in-flight tasks are never interrupted.
    pub fn stop_if_idle(&self) {
        if self.started.load(Ordering::Acquire)
            && self.state.load(Ordering::Acquire) == WorkerState::Idle as u8
        {
            self.interrupted.store(true, Ordering::Release);
        }
    }
}

/// Sets the worker to `InExecution` on construction and back to `Idle` on
/// drop, including when the task panics and the guard drops during unwind.
struct ExecutionGuard<'a> {
    state: &'a AtomicU8,
}

impl<'a> ExecutionGuard<'a> {
    fn new(state: &'a AtomicU8) -> Self {
        state.store(WorkerState::InExecution as u8, Ordering::Release);
        Self { state }
    }
}

impl Drop for ExecutionGuard<'_> {
    fn drop(&mut self) {
        self.state.store(WorkerState::Idle as u8, Ordering::Release);
    }
}
