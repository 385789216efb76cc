use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Handle to the single file an index is persisted in.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a concurrent reader sees either the previous index or
/// the new one, never half of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFile {
    path: PathBuf,
}
impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Contents of the file, or `None` if it doesn't exist.
    pub(crate) fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).or_raise(|| ErrorKind::Io),
        }
    }

    pub(crate) fn write_atomic(&self, bytes: &[u8]) -> Result<()> {
        let directory = self.directory();
        fs::create_dir_all(directory).or_raise(|| ErrorKind::Io)?;
        let mut staged = tempfile::Builder::new()
            .prefix(".movie_index")
            .suffix(".tmp")
            .tempfile_in(directory)
            .or_raise(|| ErrorKind::Io)?;
        staged.write_all(bytes).or_raise(|| ErrorKind::Io)?;
        staged.as_file().sync_all().or_raise(|| ErrorKind::Io)?;
        staged.persist(&self.path).or_raise(|| ErrorKind::Io)?;
        Ok(())
    }

    /// Remove the file. Returns `false` if there was nothing to remove.
    pub(crate) fn remove(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).or_raise(|| ErrorKind::Io),
        }
    }

    pub(crate) fn size(&self) -> Option<u64> {
        fs::metadata(&self.path).ok().map(|metadata| metadata.len())
    }
}
