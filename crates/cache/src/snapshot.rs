//! Index snapshots and their on-disk representation.

use crate::error::{Error, ErrorKind};
use exn::{OptionExt, ResultExt};
use reel_scan::{ExtensionSet, MovieRecord, ScanOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use time::{Duration, UtcDateTime};

/// A complete, point-in-time index of one library root.
///
/// Snapshots are replaced wholesale when the library is rescanned; nothing
/// ever edits the movie list of an existing snapshot. The configuration it
/// was built with (`source_root`, `follow_symlinks`, `extensions`) is its
/// identity when deciding whether it can be reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSnapshot {
    /// Whole-second precision, matching the persisted form.
    pub created_at: UtcDateTime,
    pub source_root: PathBuf,
    pub follow_symlinks: bool,
    pub extensions: ExtensionSet,
    pub movies: Vec<MovieRecord>,
}
impl CacheSnapshot {
    pub fn new(
        source_root: impl Into<PathBuf>,
        options: &ScanOptions,
        movies: Vec<MovieRecord>,
        created_at: UtcDateTime,
    ) -> Self {
        Self {
            created_at: created_at.replace_nanosecond(0).unwrap_or(created_at),
            source_root: source_root.into(),
            follow_symlinks: options.follow_symlinks,
            extensions: options.extensions.clone(),
            movies,
        }
    }

    /// Time elapsed between creation and `now`.
    pub fn age_at(&self, now: UtcDateTime) -> Duration {
        now - self.created_at
    }

    pub(crate) fn to_json(&self) -> Result<Vec<u8>, Error> {
        let blob = SnapshotBlob::try_from(self)?;
        serde_json::to_vec_pretty(&blob).or_raise(|| ErrorKind::InvalidData("snapshot"))
    }

    pub(crate) fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        let blob: SnapshotBlob = serde_json::from_slice(bytes).or_raise(|| ErrorKind::InvalidData("snapshot"))?;
        Self::try_from(blob)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotBlob {
    created_at: i64,
    source_root: String,
    follow_symlinks: bool,
    extensions: Vec<String>,
    movies: Vec<MovieEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MovieEntry {
    path: String,
    size: u64,
    modified_time: i64,
}

impl TryFrom<&CacheSnapshot> for SnapshotBlob {
    type Error = Error;
    fn try_from(snapshot: &CacheSnapshot) -> Result<Self, Self::Error> {
        let movies = snapshot
            .movies
            .iter()
            .map(|movie| -> Result<MovieEntry, Error> {
                Ok(MovieEntry {
                    path: movie.path.to_str().ok_or_raise(|| ErrorKind::InvalidData("movie path"))?.to_string(),
                    size: movie.size,
                    modified_time: movie.modified.unix_timestamp(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self {
            created_at: snapshot.created_at.unix_timestamp(),
            source_root: snapshot
                .source_root
                .to_str()
                .ok_or_raise(|| ErrorKind::InvalidData("source root"))?
                .to_string(),
            follow_symlinks: snapshot.follow_symlinks,
            extensions: snapshot.extensions.iter().map(str::to_string).collect(),
            movies,
        })
    }
}

impl TryFrom<SnapshotBlob> for CacheSnapshot {
    type Error = Error;
    fn try_from(blob: SnapshotBlob) -> Result<Self, Self::Error> {
        let movies = blob
            .movies
            .into_iter()
            .map(|entry| -> Result<MovieRecord, Error> {
                let modified = UtcDateTime::from_unix_timestamp(entry.modified_time)
                    .or_raise(|| ErrorKind::InvalidData("modification time"))?;
                Ok(MovieRecord::new(entry.path, entry.size, modified))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        Ok(Self {
            created_at: UtcDateTime::from_unix_timestamp(blob.created_at)
                .or_raise(|| ErrorKind::InvalidData("creation time"))?,
            source_root: PathBuf::from(blob.source_root),
            follow_symlinks: blob.follow_symlinks,
            extensions: ExtensionSet::new(blob.extensions),
            movies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> CacheSnapshot {
        let modified = UtcDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        CacheSnapshot::new(
            "/srv/movies",
            &ScanOptions::default(),
            vec![
                MovieRecord::new("/srv/movies/Heat.1995.mkv", 1024, modified),
                MovieRecord::new("/srv/movies/Action/Ronin.1998.mp4", 2048, modified),
            ],
            UtcDateTime::from_unix_timestamp(1_700_000_500).unwrap(),
        )
    }

    #[test]
    fn persisted_shape() {
        let json: serde_json::Value = serde_json::from_slice(&snapshot().to_json().unwrap()).unwrap();
        assert_eq!(json["created_at"], 1_700_000_500);
        assert_eq!(json["source_root"], "/srv/movies");
        assert_eq!(json["follow_symlinks"], true);
        assert_eq!(json["extensions"][0], "avi");
        assert_eq!(json["movies"][0]["path"], "/srv/movies/Heat.1995.mkv");
        assert_eq!(json["movies"][0]["size"], 1024);
        assert_eq!(json["movies"][0]["modified_time"], 1_700_000_000);
    }

    #[test]
    fn json_is_lossless() {
        let original = snapshot();
        let restored = CacheSnapshot::from_json(&original.to_json().unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = CacheSnapshot::from_json(b"{\"created_at\": \"yesterday\"}").unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidData(_)));
        assert!(CacheSnapshot::from_json(b"").is_err());
    }

    #[test]
    fn age_is_measured_from_creation() {
        let snapshot = snapshot();
        let later = snapshot.created_at + Duration::hours(2);
        assert_eq!(snapshot.age_at(later), Duration::hours(2));
    }
}
