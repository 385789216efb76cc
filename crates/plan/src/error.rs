//! Plan Error Types
//!
//! Structured errors built on `exn`, which records where each error was raised
//! and lets callers walk the resulting error tree.

use derive_more::{Display, Error};

/// A planning error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for planning operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Both are user input problems: ask again with a corrected value.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A time value was not `SS`, `MM:SS` or `HH:MM:SS`.
    #[display("invalid time {_0:?}: expected seconds, MM:SS or HH:MM:SS")]
    InvalidTimestamp(#[error(not(source))] String),
    /// The requested clip is empty, or ends past what can be represented.
    #[display("invalid clip range: {_0}")]
    InvalidRange(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    ///
    /// Never, for planning: the same input always fails the same way.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
