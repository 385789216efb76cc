//! Config Error Types
//!
//! Structured errors built on `exn`, which records where each error was raised
//! and lets callers walk the resulting error tree.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Every variant means the configuration has to be fixed before anything can
/// run; none of them are retryable.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// An explicitly requested configuration file does not exist.
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// A configuration source could not be read or parsed.
    #[display("could not load configuration")]
    Load,
    /// The movies directory is missing or not a directory.
    #[display("movies directory is not usable: {}", _0.display())]
    MoviesDirectory(#[error(not(source))] PathBuf),
    /// A setting has a value that can never work.
    #[display("invalid setting `{_0}`: {_1}")]
    Invalid(#[error(not(source))] &'static str, #[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
