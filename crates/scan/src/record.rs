//! Movie file records.
//!
//! A [`MovieRecord`] is the unit stored in the library index: where the file
//! lives, how big it is, and when it was last modified. The human-readable
//! title is always derived from the path, never stored alongside it.

use crate::error::{ErrorKind, Result};
use std::borrow::Cow;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use time::UtcDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieRecord {
    /// Path as discovered during the scan; unique within an index.
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modified timestamp, at whole-second precision.
    pub modified: UtcDateTime,
}
impl MovieRecord {
    /// Create a record, dropping any sub-second component of `modified`.
    ///
    /// The persisted index stores timestamps as Unix seconds, so truncating
    /// here keeps a record identical after a store/load cycle.
    pub fn new(path: impl Into<PathBuf>, size: u64, modified: UtcDateTime) -> Self {
        Self {
            path: path.into(),
            size,
            modified: modified.replace_nanosecond(0).unwrap_or(modified),
        }
    }

    /// Stat a single file into a record, following symlinks.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| ErrorKind::from_io(e, path))?;
        if !metadata.is_file() {
            exn::bail!(ErrorKind::NotAFile(path.to_path_buf()));
        }
        Self::from_metadata(path, &metadata)
    }

    pub(crate) fn from_metadata(path: impl Into<PathBuf>, metadata: &Metadata) -> Result<Self> {
        let path = path.into();
        let modified = metadata.modified().map_err(|e| ErrorKind::from_io(e, &path))?;
        Ok(Self::new(path, metadata.len(), UtcDateTime::from(modified)))
    }

    /// File name without its final extension.
    pub fn stem(&self) -> Cow<'_, str> {
        self.path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default()
    }

    /// Name of the directory containing the file, if it has one.
    pub fn parent_name(&self) -> Option<Cow<'_, str>> {
        self.path.parent()?.file_name().map(|s| s.to_string_lossy())
    }

    /// Name of the directory above [`parent_name`](Self::parent_name).
    pub fn grandparent_name(&self) -> Option<Cow<'_, str>> {
        self.path.parent()?.parent()?.file_name().map(|s| s.to_string_lossy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn new_truncates_to_whole_seconds() {
        let now = UtcDateTime::now().replace_nanosecond(123_456_789).unwrap();
        let record = MovieRecord::new("/movies/Heat.1995.mkv", 10, now);
        assert_eq!(record.modified.nanosecond(), 0);
        assert_eq!(record.modified.unix_timestamp(), now.unix_timestamp());
    }

    #[test]
    fn path_components() {
        let record = MovieRecord::new("/movies/Heat (1995)/Heat.1995.1080p.mkv", 0, UtcDateTime::UNIX_EPOCH);
        assert_eq!(record.stem(), "Heat.1995.1080p");
        assert_eq!(record.parent_name().as_deref(), Some("Heat (1995)"));
        assert_eq!(record.grandparent_name().as_deref(), Some("movies"));
    }

    #[test]
    fn from_path_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Ronin.1998.mkv");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"not really a movie").unwrap();
        let record = MovieRecord::from_path(&path).unwrap();
        assert_eq!(record.path, path);
        assert_eq!(record.size, 18);
    }

    #[test]
    fn from_path_rejects_directories_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = MovieRecord::from_path(dir.path()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotAFile(_)));
        let err = MovieRecord::from_path(dir.path().join("missing.mkv")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }
}
