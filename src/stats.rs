//! Cache Statistics Module
//!
//! Tracks cache performance counters: hits, backend loads, evictions and
//! TTL expirations. Counters are updated under the structural lock, so a
//! snapshot is always internally consistent.

// == Cache Stats ==
/// Point-in-time cache statistics snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from an existing entry (including coalesced
    /// lookups that waited on an in-flight backend call)
    pub hits: u64,
    /// Lookups that triggered a backend load (cold misses and TTL refetches)
    pub misses: u64,
    /// Entries discarded by LRU capacity pressure
    pub evictions: u64,
    /// Entries discarded because their TTL had elapsed on access
    pub expirations: u64,
    /// Current number of live entries
    pub entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Recorders ==
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub(crate) fn set_entries(&mut self, count: usize) {
        self.entries = count;
    }
}
