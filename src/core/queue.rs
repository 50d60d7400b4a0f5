//! Fixed-capacity, single-consumer task queue.
//!
//! Each [`Worker`](crate::core::worker::Worker) owns the consumer end of one
//! `BoundedQueue`; any number of submitter threads may hold the producer
//! end. Built on `crossbeam_channel::bounded`, which already gives the
//! lock-free, linearizable `add`/`poll` the spec requires.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError, TrySendError};

use crate::core::task::BoxedTask;

/// A fixed-capacity FIFO of boxed tasks with many producers and one
/// consumer.
///
/// `add` never blocks: it fails once `affinity_group_size` tasks are
/// outstanding. `poll` never blocks: it returns `None` when empty. Only the
/// owning worker may call `poll`; `add` and `is_empty` may be called from
/// any thread.
pub struct BoundedQueue {
    tx: Sender<BoxedTask>,
    rx: Receiver<BoxedTask>,
}

impl BoundedQueue {
    /// Create a queue with the given capacity (the affinity group size).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx }
    }

    /// Enqueue a task at the tail. Returns `false` if the queue is at
    /// capacity; the task is handed back via the `Err` payload in that case
    /// so the caller can decide what to do with it.
    pub fn add(&self, task: BoxedTask) -> Result<(), BoxedTask> {
        match self.tx.try_send(task) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(task)) => Err(task),
            Err(TrySendError::Disconnected(task)) => Err(task),
        }
    }

    /// Dequeue from the head, or `None` if empty. Must only be called by
    /// the single owning consumer.
    pub fn poll(&self) -> Option<BoxedTask> {
        match self.rx.try_recv() {
            Ok(task) => Some(task),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// A snapshot of emptiness; may go stale immediately after returning.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Number of tasks currently queued. Like `is_empty`, a snapshot only.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }
}
