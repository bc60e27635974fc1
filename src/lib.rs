//! memocache - a bounded, memoizing fetch-through cache
//!
//! Wraps a fallible fetch function with LRU eviction, lazy TTL expiry and
//! single-flight coalescing: concurrent lookups for the same cold key share
//! one backend call, and both values and errors are memoized until the
//! entry expires, is evicted or is deleted.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use memocache::Cache;
//!
//! let cache = Cache::new(64, Duration::from_secs(60), |key: &u32| {
//!     if *key < 100 {
//!         Ok(format!("value-{key}"))
//!     } else {
//!         Err(format!("key not found: {key}"))
//!     }
//! });
//!
//! assert_eq!(cache.get(&7).unwrap(), "value-7");
//! assert!(cache.get(&500).is_err());
//! cache.delete(&7);
//! ```

mod cache;
mod entry;
mod error;
mod ring;
mod stats;
mod store;


// Re-export public types
pub use cache::{memoize, Cache, MAX_CAPACITY, MIN_CAPACITY};
pub use error::{FetchError, FetchResult};
pub use stats::CacheStats;
