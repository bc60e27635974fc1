//! Cache Facade Module
//!
//! The public surface: construction with (capacity, ttl, backend), `get`
//! and `delete`. Orchestrates the store for structural bookkeeping and the
//! entry's single-flight gate for the actual backend call, which always
//! runs with the structural lock released.

use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;

use crate::error::FetchResult;
use crate::stats::CacheStats;
use crate::store::Store;

// == Capacity Bounds ==
/// Smallest usable capacity. A one-entry cache degenerates into a
/// fetch-through with no recency order worth keeping.
pub const MIN_CAPACITY: usize = 2;

/// Upper sanity bound on capacity (16M entries).
pub const MAX_CAPACITY: usize = 16 * 1024 * 1024;

// == Cache ==
/// A bounded, concurrent, memoizing cache over a fetch backend.
///
/// `get` returns the previously computed result for a key or computes one
/// exactly once via `backend`, coalescing concurrent misses for the same
/// key into a single backend call. Entries are evicted least recently used
/// first once `capacity` is reached, and expire lazily after `ttl`.
///
/// Backend errors are memoized exactly like values: a failing key returns
/// the same cached error instantly until its entry expires, is evicted or
/// is deleted. There is no retry policy.
#[derive(Debug)]
pub struct Cache<K, V, E, F> {
    /// Structural state; held only for pointer/map bookkeeping.
    store: Mutex<Store<K, V, E>>,
    /// Caller-supplied fetch function, invoked outside the lock.
    backend: F,
}

impl<K, V, E, F> Cache<K, V, E, F>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: Clone,
    F: Fn(&K) -> Result<V, E>,
{
    // == Constructor ==
    /// Creates a cache holding at most `capacity` entries, each expiring
    /// `ttl` after creation.
    ///
    /// # Panics
    /// Panics if `capacity` is outside [`MIN_CAPACITY`]..=[`MAX_CAPACITY`].
    /// An invalid capacity is a programmer error, not an operational one.
    pub fn new(capacity: usize, ttl: Duration, backend: F) -> Self {
        assert!(
            (MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity),
            "attempted to create a cache with invalid capacity of {capacity} items"
        );

        Self {
            store: Mutex::new(Store::new(capacity, ttl)),
            backend,
        }
    }

    // == Get ==
    /// Returns the cached result for `key`, fetching it via the backend if
    /// no live entry exists.
    ///
    /// The structural lock covers only entry resolution; the backend call
    /// happens unlocked, so a slow fetch for one key never blocks `get` or
    /// `delete` on other keys. Callers racing on the same cold key block
    /// until the single in-flight fetch publishes, then all observe the
    /// identical result.
    pub fn get(&self, key: &K) -> FetchResult<V, E> {
        let entry = self.store.lock().resolve_or_create(key);
        entry.resolve(&self.backend)
    }

    // == Delete ==
    /// Removes `key` from the cache. No observable effect if the key is
    /// absent or already expired away.
    pub fn delete(&self, key: &K) {
        self.store.lock().delete(key);
    }

    // == Length ==
    /// Returns the current number of entries (live or expired-but-unseen).
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns a consistent snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.store.lock().stats()
    }
}

// == Memoize ==
/// Wraps `backend` in a fresh cache and returns it as a plain function:
/// same signature shape, transparent memoization.
///
/// # Panics
/// Panics under the same conditions as [`Cache::new`].
pub fn memoize<K, V, E, F>(
    capacity: usize,
    ttl: Duration,
    backend: F,
) -> impl Fn(&K) -> FetchResult<V, E>
where
    K: Eq + Hash + Clone,
    V: Clone,
    E: Clone,
    F: Fn(&K) -> Result<V, E>,
{
    let cache = Cache::new(capacity, ttl, backend);
    move |key| cache.get(key)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::cell::Cell;
    use std::thread::sleep;

    /// Backend mirroring the classic exercise: negates keys below 100,
    /// fails on anything else.
    fn int_backend(key: &i32) -> Result<i32, String> {
        if (0..100).contains(key) {
            Ok(-key)
        } else {
            Err(format!("key not found: {key}"))
        }
    }

    #[test]
    fn test_get_and_delete_round_trip() {
        let cache = Cache::new(5, Duration::from_secs(3600), int_backend);

        assert!(cache.is_empty());
        assert_eq!(cache.get(&5), Ok(-5));
        assert_eq!(cache.len(), 1);

        cache.delete(&5);
        assert!(cache.is_empty());

        // Deleting an absent key never errors.
        cache.delete(&5);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_backend_called_once_per_key() {
        let calls = Cell::new(0);
        let cache = Cache::new(5, Duration::from_secs(3600), |key: &i32| {
            calls.set(calls.get() + 1);
            Ok::<i32, String>(-key)
        });

        for _ in 0..10 {
            assert_eq!(cache.get(&3), Ok(-3));
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_error_memoized_without_reattempt() {
        let calls = Cell::new(0);
        let cache = Cache::new(5, Duration::from_secs(3600), |key: &i32| {
            calls.set(calls.get() + 1);
            int_backend(key)
        });

        let expected = Err(FetchError::Backend("key not found: 1000".to_string()));
        assert_eq!(cache.get(&1000), expected);
        assert_eq!(cache.get(&1000), expected);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_ttl_triggers_exactly_one_refetch() {
        let calls = Cell::new(0);
        let cache = Cache::new(5, Duration::from_millis(30), |key: &i32| {
            calls.set(calls.get() + 1);
            Ok::<i32, String>(-key)
        });

        assert_eq!(cache.get(&1), Ok(-1));
        assert_eq!(cache.get(&1), Ok(-1));
        assert_eq!(calls.get(), 1);

        sleep(Duration::from_millis(60));

        assert_eq!(cache.get(&1), Ok(-1));
        assert_eq!(cache.get(&1), Ok(-1));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_capacity_eviction_through_facade() {
        let cache = Cache::new(2, Duration::from_secs(3600), int_backend);

        cache.get(&1).unwrap();
        cache.get(&2).unwrap();
        cache.get(&3).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    #[should_panic(expected = "invalid capacity")]
    fn test_capacity_below_minimum_panics() {
        let _ = Cache::new(1, Duration::from_secs(1), int_backend);
    }

    #[test]
    #[should_panic(expected = "invalid capacity")]
    fn test_capacity_above_maximum_panics() {
        let _ = Cache::new(MAX_CAPACITY + 1, Duration::from_secs(1), int_backend);
    }

    #[test]
    fn test_memoize_wrapper() {
        let get = memoize(5, Duration::from_secs(3600), int_backend);

        assert_eq!(get(&4), Ok(-4));
        assert_eq!(get(&4), Ok(-4));
        assert!(get(&500).is_err());
    }
}
