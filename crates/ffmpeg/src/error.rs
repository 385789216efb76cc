//! FFmpeg Error Types
//!
//! Structured errors built on `exn`, which records where each error was raised
//! and lets callers walk the resulting error tree.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A media tool error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for media tool operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The tool isn't configured and isn't on `PATH`.
    #[display("{_0} not found; install it or configure its path")]
    ToolNotFound(#[error(not(source))] &'static str),
    /// A configured tool path doesn't point at a file.
    #[display("configured {_0} does not exist: {}", _1.display())]
    InvalidToolPath(#[error(not(source))] &'static str, #[error(not(source))] PathBuf),
    /// A configured tool path is a file, but not one that can be run.
    #[display("configured {_0} is not executable: {}", _1.display())]
    NotExecutable(#[error(not(source))] &'static str, #[error(not(source))] PathBuf),
    /// The tool exists but `-version` failed; it's probably broken or not ffmpeg.
    #[display("{_0} failed to run")]
    ToolBroken(#[error(not(source))] &'static str),
    /// ffmpeg ran and reported failure. Retrying the same plan fails the same way.
    #[display(
        "ffmpeg failed ({}): {stderr}",
        code.map_or_else(|| "terminated".to_string(), |code| format!("exit code {code}"))
    )]
    TranscodeFailed { code: Option<i32>, stderr: String },
    /// Filesystem work around the transcode (output directory, temporary
    /// file, final rename) failed.
    #[display("I/O error")]
    Io,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcode_failure_carries_diagnostics() {
        let kind = ErrorKind::TranscodeFailed { code: Some(1), stderr: "Invalid data found".to_string() };
        assert_eq!(kind.to_string(), "ffmpeg failed (exit code 1): Invalid data found");
        assert!(!kind.is_retryable());
        let kind = ErrorKind::TranscodeFailed { code: None, stderr: String::new() };
        assert!(kind.to_string().starts_with("ffmpeg failed (terminated)"));
    }
}
