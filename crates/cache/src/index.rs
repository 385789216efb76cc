use crate::error::{ErrorKind, Result};
use crate::{CacheFile, CacheSnapshot};
use exn::ResultExt;
use reel_scan::{DirectoryScanner, MovieRecord, ScanOptions};
use std::path::PathBuf;
use time::{Duration, UtcDateTime};
use tracing::instrument;

/// How long a snapshot may be reused before the library is rescanned.
pub const DEFAULT_TTL: Duration = Duration::hours(24);

/// The configuration a snapshot is built from, and checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub root: PathBuf,
    pub scan: ScanOptions,
    pub ttl: Duration,
}
impl IndexConfig {
    pub fn new(root: impl Into<PathBuf>, scan: ScanOptions) -> Self {
        Self { root: root.into(), scan, ttl: DEFAULT_TTL }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Where the snapshot in a [`Lookup`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A fresh snapshot was read from the index file.
    Cached,
    /// The library was rescanned, because the index file was missing,
    /// unreadable, stale, or built with a different configuration.
    Rebuilt,
}

/// A usable snapshot, and how it was obtained.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub snapshot: CacheSnapshot,
    pub origin: Origin,
}
impl Lookup {
    /// Records whose files still exist.
    ///
    /// A cached snapshot can be up to a TTL old; files deleted since then are
    /// filtered out here. The snapshot itself is left as it was.
    pub fn available(&self) -> Vec<MovieRecord> {
        self.snapshot.movies.iter().filter(|movie| movie.path.exists()).cloned().collect()
    }
}

/// Summary of the persisted index, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheInfo {
    pub path: PathBuf,
    pub movie_count: usize,
    pub age: Duration,
    pub source_root: PathBuf,
    pub size_bytes: u64,
}

/// The persisted library index.
///
/// ```text
/// absent --rebuild--> built --store--> fresh --ttl--> stale --rebuild--> fresh
///                                        |              |
///                                        +----clear-----+-----> absent
/// ```
///
/// Freshness is decided purely by configuration and age: a snapshot built
/// for the same root, symlink policy and extension set is reused until its
/// TTL runs out, even if files were added in the meantime.
#[derive(Debug, Clone)]
pub struct IndexCache {
    file: CacheFile,
}
impl IndexCache {
    pub fn new(file: CacheFile) -> Self {
        Self { file }
    }

    pub fn file(&self) -> &CacheFile {
        &self.file
    }

    /// Read the persisted snapshot.
    ///
    /// A missing file is `None`. So is a file that can't be read or doesn't
    /// parse: a corrupt index is a cache miss, and is logged rather than
    /// returned as an error.
    pub fn load(&self) -> Option<CacheSnapshot> {
        let bytes = match self.file.read() {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(path = %self.file.path().display(), error = ?err, "Could not read movie index");
                return None;
            },
        };
        match CacheSnapshot::from_json(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(path = %self.file.path().display(), error = ?err, "Ignoring corrupt movie index");
                None
            },
        }
    }

    pub fn is_fresh(snapshot: &CacheSnapshot, config: &IndexConfig) -> bool {
        Self::is_fresh_at(snapshot, config, UtcDateTime::now())
    }

    /// Whether `snapshot` can stand in for a scan under `config` at `now`.
    pub fn is_fresh_at(snapshot: &CacheSnapshot, config: &IndexConfig, now: UtcDateTime) -> bool {
        snapshot.source_root == config.root
            && snapshot.follow_symlinks == config.scan.follow_symlinks
            && snapshot.extensions == config.scan.extensions
            && snapshot.age_at(now) < config.ttl
    }

    /// Scan the library into a new snapshot. Nothing is persisted.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::Scan`] if the library root is unusable. Unreadable
    /// subdirectories are logged by the scanner and skipped.
    #[instrument(skip_all, fields(root = %config.root.display()))]
    pub fn rebuild(config: &IndexConfig) -> Result<CacheSnapshot> {
        let scanner = DirectoryScanner::new(&config.root, config.scan.clone()).or_raise(|| ErrorKind::Scan)?;
        let report = scanner.scan();
        Ok(CacheSnapshot::new(&config.root, &config.scan, report.movies, UtcDateTime::now()))
    }

    pub fn store(&self, snapshot: &CacheSnapshot) -> Result<()> {
        let bytes = snapshot.to_json()?;
        self.file.write_atomic(&bytes)?;
        tracing::debug!(path = %self.file.path().display(), movies = snapshot.movies.len(), "Movie index saved");
        Ok(())
    }

    /// Delete the persisted snapshot. Returns `false` if there was none.
    pub fn clear(&self) -> Result<bool> {
        self.file.remove()
    }

    pub fn info(&self) -> Option<CacheInfo> {
        self.info_at(UtcDateTime::now())
    }

    pub fn info_at(&self, now: UtcDateTime) -> Option<CacheInfo> {
        let snapshot = self.load()?;
        Some(CacheInfo {
            path: self.file.path().to_path_buf(),
            movie_count: snapshot.movies.len(),
            age: snapshot.age_at(now),
            source_root: snapshot.source_root,
            size_bytes: self.file.size().unwrap_or_default(),
        })
    }

    /// Return a fresh snapshot for `config`, rescanning (and persisting the
    /// result) when the stored one can't be used.
    ///
    /// Failing to persist a rebuilt snapshot is only a warning: the scan
    /// result is still returned, and the next run will simply scan again.
    #[instrument(skip_all, fields(root = %config.root.display()))]
    pub fn resolve(&self, config: &IndexConfig) -> Result<Lookup> {
        if let Some(snapshot) = self.load() {
            if Self::is_fresh(&snapshot, config) {
                tracing::info!(movies = snapshot.movies.len(), "Using cached movie index");
                return Ok(Lookup { snapshot, origin: Origin::Cached });
            }
            tracing::info!("Movie index is stale; rebuilding");
        } else {
            tracing::info!("No usable movie index; building");
        }
        let snapshot = Self::rebuild(config)?;
        if let Err(err) = self.store(&snapshot) {
            tracing::warn!(path = %self.file.path().display(), error = ?err, "Could not save movie index");
        }
        Ok(Lookup { snapshot, origin: Origin::Rebuilt })
    }
}
