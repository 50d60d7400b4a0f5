//! Maps task identity to a sticky queue index.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::core::task::TaskKey;

/// Routes task identities to one of `N` queue indices, converging on the
/// same index for every submission of a given affinity key.
///
/// The mapping is append-only: once a key is seen, its index never changes
/// for the remaining lifetime of the pool. Insertion order for fresh keys
/// cycles round-robin modulo `N` (or via a mask when `N` is a power of
/// two), so steady-state load spreads evenly across queues.
pub struct AffinityRouter {
    mapping: DashMap<TaskKey, usize>,
    counter: AtomicU64,
    num_queues: usize,
    mask: Option<u64>,
}

impl AffinityRouter {
    /// Create a router over `num_queues` queues (`num_queues >= 1`).
    ///
    /// When `num_queues` is a power of two the router uses the fast
    /// `counter & (N - 1)` path from spec §4.3; otherwise it falls back to
    /// `counter % N`, per the spec's explicit allowance for non-power-of-two
    /// `N` at the cost of a divide.
    #[must_use]
    pub fn new(num_queues: usize) -> Self {
        let mask = num_queues.is_power_of_two().then(|| (num_queues as u64) - 1);
        Self {
            mapping: DashMap::new(),
            counter: AtomicU64::new(0),
            num_queues,
            mask,
        }
    }

    /// Route an affinity key to a queue index, inserting a fresh routing
    /// entry if this is the first time the key has been seen.
    ///
    /// Two concurrent first-time submissions of the same key may each
    /// compute a different candidate index; only one persists; the
    /// non-winner's caller runs once on the "wrong" queue. This is the
    /// deliberate race documented in spec §4.3 — avoiding it would require
    /// a lock on the hot submission path.
    pub fn route<K: Hash>(&self, affinity: &K) -> usize {
        let key = TaskKey::from_affinity(affinity);
        self.route_key(key)
    }

    /// Route an already-computed [`TaskKey`].
    pub fn route_key(&self, key: TaskKey) -> usize {
        if let Some(existing) = self.mapping.get(&key) {
            return *existing;
        }

        let candidate = self.next_index();
        // `entry().or_insert` returns the occupied value on a race rather
        // than the caller's own candidate, which is exactly the
        // "primitive that returns the current value on collision"
        // the spec's routing map requires.
        *self.mapping.entry(key).or_insert(candidate)
    }

    fn next_index(&self) -> usize {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        match self.mask {
            Some(mask) => (n & mask) as usize,
            None => (n % self.num_queues as u64) as usize,
        }
    }

    /// Number of distinct keys routed so far.
    #[must_use]
    pub fn routed_key_count(&self) -> usize {
        self.mapping.len()
    }
}
