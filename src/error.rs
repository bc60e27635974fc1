//! Error types for the memoizing cache
//!
//! Provides unified error handling using thiserror.
//!
//! The cache invents no operational errors of its own: everything a `get`
//! can return was produced by the caller-supplied backend, either as an
//! ordinary error value or as a panic captured on the fetching thread.

use thiserror::Error;

// == Fetch Error Enum ==
/// Error returned by [`Cache::get`](crate::Cache::get).
///
/// Both variants are memoized exactly like successful values: every caller
/// of the same key observes the identical error until the entry expires, is
/// evicted, or is deleted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError<E> {
    /// Error returned by the backend, passed through verbatim.
    #[error("{0}")]
    Backend(E),

    /// The backend panicked while computing this key.
    ///
    /// Holds the captured panic message. The caller that triggered the
    /// backend observes the panic itself; every other caller observes this
    /// variant instead.
    #[error("backend panicked: {0}")]
    Panicked(String),
}

impl<E> FetchError<E> {
    // == Backend Accessor ==
    /// Returns the underlying backend error, if that is what this is.
    pub fn backend(&self) -> Option<&E> {
        match self {
            FetchError::Backend(err) => Some(err),
            FetchError::Panicked(_) => None,
        }
    }

    /// Consumes the error, returning the backend error if present.
    pub fn into_backend(self) -> Option<E> {
        match self {
            FetchError::Backend(err) => Some(err),
            FetchError::Panicked(_) => None,
        }
    }

    // == Panic Check ==
    /// Returns true if the backend panicked instead of returning an error.
    pub fn is_panic(&self) -> bool {
        matches!(self, FetchError::Panicked(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache lookups.
pub type FetchResult<V, E> = std::result::Result<V, FetchError<E>>;
