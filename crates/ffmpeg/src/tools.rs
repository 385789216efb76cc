use crate::error::{ErrorKind, Result};
use std::env::consts::EXE_SUFFIX;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub(crate) const FFMPEG: &str = "ffmpeg";
pub(crate) const FFPROBE: &str = "ffprobe";

/// Located ffmpeg executables.
///
/// ffmpeg is required. ffprobe is optional: without it, audio streams can't
/// be inspected and selection falls back to the first stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    ffmpeg: PathBuf,
    ffprobe: Option<PathBuf>,
}
impl Tools {
    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: Option<PathBuf>) -> Self {
        Self { ffmpeg: ffmpeg.into(), ffprobe }
    }

    /// Find the tools, preferring explicitly configured paths.
    ///
    /// A configured path must be an executable file. Otherwise each tool is looked up on
    /// `PATH`, and ffprobe is additionally looked for next to ffmpeg.
    pub fn discover(ffmpeg: Option<&Path>, ffprobe: Option<&Path>) -> Result<Self> {
        let ffmpeg = match ffmpeg {
            Some(path) => explicit(FFMPEG, path)?,
            None => which::which(FFMPEG).map_err(|_| ErrorKind::ToolNotFound(FFMPEG))?,
        };
        let ffprobe = match ffprobe {
            Some(path) => Some(explicit(FFPROBE, path)?),
            None => which::which(FFPROBE).ok().or_else(|| sibling(&ffmpeg, FFPROBE)),
        };
        match &ffprobe {
            Some(path) => tracing::debug!(ffmpeg = %ffmpeg.display(), ffprobe = %path.display(), "Discovered tools"),
            None => tracing::warn!(ffmpeg = %ffmpeg.display(), "ffprobe not found; audio streams can't be inspected"),
        }
        Ok(Self { ffmpeg, ffprobe })
    }

    pub fn ffmpeg(&self) -> &Path {
        &self.ffmpeg
    }

    pub fn ffprobe(&self) -> Option<&Path> {
        self.ffprobe.as_deref()
    }

    /// Run `-version` on each discovered tool.
    pub fn verify(&self) -> Result<()> {
        run_version(FFMPEG, &self.ffmpeg)?;
        if let Some(ffprobe) = &self.ffprobe {
            run_version(FFPROBE, ffprobe)?;
        }
        Ok(())
    }
}

fn explicit(tool: &'static str, path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        exn::bail!(ErrorKind::InvalidToolPath(tool, path.to_path_buf()));
    }
    if !is_executable(path) {
        exn::bail!(ErrorKind::NotExecutable(tool, path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().is_ok_and(|metadata| metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}

fn sibling(ffmpeg: &Path, tool: &str) -> Option<PathBuf> {
    let candidate = ffmpeg.with_file_name(format!("{tool}{EXE_SUFFIX}"));
    candidate.is_file().then_some(candidate)
}

fn run_version(tool: &'static str, path: &Path) -> Result<()> {
    let succeeded = Command::new(path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success());
    if !succeeded {
        tracing::debug!(path = %path.display(), "Tool failed version check");
        exn::bail!(ErrorKind::ToolBroken(tool));
    }
    Ok(())
}
