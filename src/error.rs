//! CLI Error Types
//!
//! Each variant names the step of a run that failed; the error from the crate
//! doing the actual work hangs underneath it in the `exn` tree.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A CLI error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("movie index is unavailable")]
    Index,
    #[display("ffmpeg is not usable")]
    Tools,
    #[display("a movie title or path is required")]
    MissingMovie,
    #[display("no movie files found in {}", _0.display())]
    EmptyLibrary(#[error(not(source))] PathBuf),
    #[display("no movies found matching '{_0}'")]
    NoMatch(#[error(not(source))] String),
    #[display("could not read input")]
    Prompt,
    #[display("invalid clip")]
    Plan,
    #[display("failed to create clip")]
    Transcode,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Index | Self::Transcode)
    }
}
