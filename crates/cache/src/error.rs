//! Cache Error Types
//!
//! Structured errors built on `exn`, which records where each error was raised
//! and lets callers walk the resulting error tree.
//!
//! Most cache problems never surface as errors at all: an unreadable or
//! malformed index is simply a cache miss. What's left is failing to write
//! the index, and failing to rebuild it because the library root is unusable.

use derive_more::{Display, Error};

/// A cache error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for cache operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Reading, writing or removing the index file failed.
    #[display("cache I/O error")]
    Io,
    /// The index could not be rebuilt because the library could not be
    /// scanned (the root is missing or unreadable).
    #[display("library scan failed")]
    Scan,
    /// Serialization/deserialization error.
    #[display("invalid cache data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }
}
