//! Directory walking.
//!
//! The walk is iterative (an explicit stack of directories) rather than
//! recursive, and tolerant: a directory or file that can't be read is recorded
//! as a [`ScanWarning`] and skipped, so one bad mount doesn't cost the whole
//! library.

use crate::error::{ErrorKind, Result};
use crate::{ExtensionSet, MovieRecord};
use exn::ResultExt;
use std::collections::HashSet;
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// What to look for while walking a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub extensions: ExtensionSet,
    /// Descend into symlinked directories and include symlinked files.
    pub follow_symlinks: bool,
}
impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: ExtensionSet::video(),
            follow_symlinks: true,
        }
    }
}

/// A path the scanner had to skip, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

/// Everything a single walk produced.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Matching files, deduplicated by canonical path and sorted by path.
    pub movies: Vec<MovieRecord>,
    pub warnings: Vec<ScanWarning>,
}
impl ScanReport {
    fn warn(&mut self, path: &Path, message: impl ToString) {
        let message = message.to_string();
        tracing::warn!(path = %path.display(), error = %message, "Skipping unreadable path during scan");
        self.warnings.push(ScanWarning { path: path.to_path_buf(), message });
    }
}

enum WalkEntry {
    File(MovieRecord),
    Descend(PathBuf),
    Skip,
}

/// Walks a library root and collects movie files.
///
/// # Examples
///
/// ```no_run
/// use reel_scan::{DirectoryScanner, ScanOptions};
///
/// # fn example() -> reel_scan::error::Result<()> {
/// let scanner = DirectoryScanner::new("/srv/movies", ScanOptions::default())?;
/// let report = scanner.scan();
/// println!("{} movies, {} warnings", report.movies.len(), report.warnings.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    root: PathBuf,
    options: ScanOptions,
}
impl DirectoryScanner {
    /// Create a scanner for `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidRoot`] if the root does not exist, is not a
    /// directory, or cannot be listed.
    pub fn new(root: impl Into<PathBuf>, options: ScanOptions) -> Result<Self> {
        let root = root.into();
        let metadata = fs::metadata(&root).or_raise(|| ErrorKind::InvalidRoot(root.clone()))?;
        if !metadata.is_dir() {
            exn::bail!(ErrorKind::InvalidRoot(root));
        }
        fs::read_dir(&root).or_raise(|| ErrorKind::InvalidRoot(root.clone()))?;
        Ok(Self { root, options })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    #[instrument(skip(self), fields(root = %self.root.display(), follow_symlinks = self.options.follow_symlinks))]
    pub fn scan(&self) -> ScanReport {
        let mut report = ScanReport::default();
        let mut visited_dirs: HashSet<PathBuf> = HashSet::new();
        let mut seen_files: HashSet<PathBuf> = HashSet::new();
        let mut stack = vec![self.root.clone()];

        'dirs: while let Some(current) = stack.pop() {
            // Resolve before listing, so a directory reachable through several
            // symlinks (or a symlink back up the tree) is only walked once.
            match fs::canonicalize(&current) {
                Ok(canonical) => {
                    if !visited_dirs.insert(canonical) {
                        tracing::debug!(path = %current.display(), "Directory already visited; skipping");
                        continue 'dirs;
                    }
                },
                Err(err) => {
                    report.warn(&current, ErrorKind::from_io(err, &current));
                    continue 'dirs;
                },
            }
            let listing = match fs::read_dir(&current) {
                Ok(listing) => listing,
                Err(err) => {
                    report.warn(&current, ErrorKind::from_io(err, &current));
                    continue 'dirs;
                },
            };
            let mut entries = Vec::new();
            for entry in listing {
                match entry {
                    Ok(entry) => entries.push(entry),
                    Err(err) => report.warn(&current, ErrorKind::from_io(err, &current)),
                }
            }
            entries.sort_by_key(DirEntry::file_name);

            let mut subdirectories = Vec::new();
            for entry in entries {
                match self.process_entry(&entry) {
                    Ok(WalkEntry::File(record)) => {
                        let identity = fs::canonicalize(&record.path).unwrap_or_else(|_| record.path.clone());
                        if seen_files.insert(identity) {
                            report.movies.push(record);
                        } else {
                            tracing::debug!(path = %record.path.display(), "Duplicate of an already indexed file");
                        }
                    },
                    Ok(WalkEntry::Descend(dir)) => subdirectories.push(dir),
                    Ok(WalkEntry::Skip) => {},
                    Err(err) => report.warn(&entry.path(), &*err),
                }
            }
            // Reversed, so that the stack pops sibling directories in name order.
            stack.extend(subdirectories.into_iter().rev());
        }

        report.movies.sort_by(|a, b| a.path.cmp(&b.path));
        tracing::info!(
            movies = report.movies.len(),
            warnings = report.warnings.len(),
            "Library scan complete"
        );
        report
    }

    fn process_entry(&self, entry: &DirEntry) -> Result<WalkEntry> {
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| ErrorKind::from_io(e, &path))?;
        let metadata = if file_type.is_symlink() {
            if !self.options.follow_symlinks {
                tracing::trace!(path = %path.display(), "Not following symlink");
                return Ok(WalkEntry::Skip);
            }
            match fs::metadata(&path) {
                Ok(metadata) => metadata,
                // Note: silently drop what is most likely a broken symlink.
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "Dangling symlink");
                    return Ok(WalkEntry::Skip);
                },
                Err(err) => exn::bail!(ErrorKind::from_io(err, &path)),
            }
        } else {
            entry.metadata().map_err(|e| ErrorKind::from_io(e, &path))?
        };
        if metadata.is_dir() {
            return Ok(WalkEntry::Descend(path));
        }
        if metadata.is_file() && self.options.extensions.matches(&path) {
            return Ok(WalkEntry::File(MovieRecord::from_metadata(path, &metadata)?));
        }
        Ok(WalkEntry::Skip)
    }
}
