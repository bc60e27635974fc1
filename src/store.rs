//! Cache Store Module
//!
//! Maps keys to entries with capacity and TTL enforcement, combining the
//! hash index with the recency ring. Every method here runs under the
//! cache's structural lock and does pointer/map bookkeeping only — the
//! backend is never invoked while that lock is held.
//!
//! Bijection invariant: every key in the index maps to exactly one live
//! ring slot and every ring slot's key is in the index, so the index size,
//! the ring length and the entry count are always the same number.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::entry::Entry;
use crate::ring::RecencyRing;
use crate::stats::CacheStats;

// == Cache Store ==
#[derive(Debug)]
pub(crate) struct Store<K, V, E> {
    /// Key to ring-slot handle; the lookup fast path.
    index: AHashMap<K, usize>,
    /// Recency order over the live entries.
    ring: RecencyRing<Arc<Entry<K, V, E>>>,
    /// Performance counters, updated under the structural lock.
    stats: CacheStats,
    /// Maximum number of entries; immutable after construction.
    capacity: usize,
    /// Entry lifetime; immutable after construction.
    ttl: Duration,
}

impl<K, V, E> Store<K, V, E>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            index: AHashMap::with_capacity(capacity),
            ring: RecencyRing::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            ttl,
        }
    }

    // == Resolve Or Create ==
    /// Returns the live entry for `key`, creating one on a miss.
    ///
    /// A fresh hit is promoted to most recently used. An expired hit is
    /// detached and discarded, then handled as a miss: the returned entry
    /// is always unexpired at the moment of return. On a miss with the
    /// store at capacity, the ring's victim is evicted before insertion so
    /// the capacity bound never overshoots.
    pub fn resolve_or_create(&mut self, key: &K) -> Arc<Entry<K, V, E>> {
        if let Some(&slot) = self.index.get(key) {
            let entry = Arc::clone(self.ring.get(slot));

            if !entry.is_expired(self.ttl) {
                self.ring.touch(slot);
                self.stats.record_hit();
                return entry;
            }

            // Stale entry: discard it and fall through to the miss path,
            // allocating a fresh entry for the same key.
            self.ring.remove(slot);
            self.index.remove(key);
            self.stats.record_expiration();
            trace!("expired entry discarded on access");
        } else if self.index.len() == self.capacity {
            if let Some(victim) = self.ring.victim() {
                let evicted = self.ring.remove(victim);
                self.index.remove(evicted.key());
                self.stats.record_eviction();
                debug!(capacity = self.capacity, "evicted least recently used entry");
            }
        }

        self.stats.record_miss();
        let entry = Arc::new(Entry::new(key.clone()));
        let slot = self.ring.insert_new(Arc::clone(&entry));
        self.index.insert(key.clone(), slot);
        entry
    }

    // == Delete ==
    /// Detaches `key` from the index and ring. Returns whether anything
    /// was removed; deleting an absent key is a no-op.
    pub fn delete(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(slot) => {
                self.ring.remove(slot);
                trace!("entry deleted");
                true
            }
            None => false,
        }
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Stats ==
    /// Returns a snapshot of the counters with the current entry count.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_entries(self.index.len());
        stats
    }

    // == Test Support ==
    /// Keys in recency order, oldest (next victim) first.
    #[cfg(test)]
    pub fn keys_oldest_first(&self) -> Vec<K> {
        self.ring.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Asserts ring closure plus the index/ring bijection.
    #[cfg(test)]
    pub fn assert_consistent(&self) {
        self.ring.assert_closed();
        assert_eq!(self.index.len(), self.ring.len(), "index/ring size split");
        assert!(self.index.len() <= self.capacity, "capacity bound violated");

        for entry in self.ring.iter() {
            let slot = self
                .index
                .get(entry.key())
                .expect("ring entry missing from index");
            assert!(
                Arc::ptr_eq(self.ring.get(*slot), entry),
                "index points at a different entry than the ring"
            );
        }
    }
}
