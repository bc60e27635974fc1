//! Cache Entry Module
//!
//! One cached (key, result) record with its single-flight gate.
//!
//! The gate is a `OnceLock`: the first caller to reach it runs the backend
//! and publishes the outcome; concurrent callers block until publication
//! and later callers pay a single atomic check. Once published, the result
//! is immutable for the entry's lifetime — a TTL refetch allocates a fresh
//! entry instead of mutating this one.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use crate::error::{FetchError, FetchResult};

// == Cache Entry ==
#[derive(Debug)]
pub(crate) struct Entry<K, V, E> {
    /// The key this entry caches; immutable once created.
    key: K,
    /// Allocation timestamp, compared against the store's TTL.
    created_at: Instant,
    /// Execute-once barrier holding the published result.
    gate: OnceLock<FetchResult<V, E>>,
}

impl<K, V, E> Entry<K, V, E> {
    // == Constructor ==
    pub fn new(key: K) -> Self {
        Self {
            key,
            created_at: Instant::now(),
            gate: OnceLock::new(),
        }
    }

    // == Key Accessor ==
    pub fn key(&self) -> &K {
        &self.key
    }

    // == Is Expired ==
    /// Checks whether the entry's age strictly exceeds `ttl`.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() > ttl
    }

    // == Resolve ==
    /// Passes through the single-flight gate, invoking the backend at most
    /// once over this entry's lifetime.
    ///
    /// A panic inside the backend is captured and published as
    /// [`FetchError::Panicked`] so that waiters and later callers observe
    /// an ordinary cached error; the panic itself is then re-raised on the
    /// triggering caller's stack only.
    pub fn resolve<F>(&self, backend: &F) -> FetchResult<V, E>
    where
        F: Fn(&K) -> Result<V, E>,
        V: Clone,
        E: Clone,
    {
        let mut unwind: Option<Box<dyn Any + Send>> = None;

        let result = self
            .gate
            .get_or_init(|| match panic::catch_unwind(AssertUnwindSafe(|| backend(&self.key))) {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(err)) => Err(FetchError::Backend(err)),
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    unwind = Some(payload);
                    Err(FetchError::Panicked(message))
                }
            })
            .clone();

        if let Some(payload) = unwind {
            panic::resume_unwind(payload);
        }

        result
    }
}

// == Panic Message Extraction ==
/// Renders a panic payload as text. Panics raised via `panic!` carry a
/// `&str` or `String`; anything else gets a placeholder.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
