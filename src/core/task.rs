//! Task identity and the boxed-closure task representation.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// The unit of work a worker runs. Any `FnOnce() + Send + 'static` closure
/// qualifies; a panic escaping the closure is treated by the
/// [`Worker`](crate::core::worker::Worker) as the task failing abruptly.
pub type BoxedTask = Box<dyn FnOnce() + Send + 'static>;

/// A stable integer identity for "the same logical task" as seen by the
/// [`AffinityRouter`](crate::core::router::AffinityRouter).
///
/// The spec defines this as "the language-native content-independent
/// identity hash of the handle" — a concept that does not transfer directly
/// to Rust closures, which carry no object identity. Here the caller
/// supplies an explicit affinity key (anything `Hash`) alongside the task
/// closure at submission time, and `TaskKey` is derived by hashing it. Two
/// submissions with equal affinity keys always yield equal `TaskKey`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskKey(pub u64);

impl TaskKey {
    /// Derive a `TaskKey` from any hashable affinity key.
    pub fn from_affinity<K: Hash>(key: &K) -> Self {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        Self(hasher.finish())
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_keys_hash_equal() {
        assert_eq!(TaskKey::from_affinity(&"conn-42"), TaskKey::from_affinity(&"conn-42"));
    }

    #[test]
    fn different_keys_usually_differ() {
        assert_ne!(TaskKey::from_affinity(&1u64), TaskKey::from_affinity(&2u64));
    }
}
