//! Time-bounded memory of finished jobs and destroyed actors.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::time::{Duration, Instant};

/// How long a terminated job or destroyed actor is remembered.
///
/// A registration reaching the tracker within this window after its job
/// ended (or its actor died) is evicted at once. Past it, the tombstone is
/// gone and a straggling Owned registration is no longer caught.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(600);

/// A set whose entries expire `retention` after insertion.
///
/// Entries are kept in insertion order, so pruning pops from the front and
/// stops at the first live one.
#[derive(Debug)]
pub struct Tombstones<K> {
    retention: Duration,
    order: VecDeque<(Instant, K)>,
    index: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Tombstones<K> {
    pub fn new(retention: Duration) -> Self {
        Self {
            retention,
            order: VecDeque::new(),
            index: HashSet::new(),
        }
    }

    /// Returns `false` if `key` was already present.
    pub fn insert(&mut self, key: K, now: Instant) -> bool {
        if !self.index.insert(key.clone()) {
            return false;
        }
        self.order.push_back((now, key));
        true
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains(key)
    }

    /// Drops every entry older than the retention window.
    pub fn prune(&mut self, now: Instant) {
        while let Some(&(at, _)) = self.order.front() {
            if now.duration_since(at) < self.retention {
                break;
            }
            if let Some((_, key)) = self.order.pop_front() {
                self.index.remove(&key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
