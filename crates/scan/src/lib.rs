//! Movie file discovery.
//!
//! Walks a library root and produces [`MovieRecord`]s for every file whose
//! extension is in the configured [`ExtensionSet`]. Files reachable through
//! more than one path (symlink aliases, symlinked directories, cycles) are
//! only reported once, keyed by their canonical path.
//!
//! Scanning is a partial-failure operation: unreadable directories end up as
//! [`ScanWarning`]s on the [`ScanReport`] rather than aborting the walk. Only
//! an unusable root is an error, and that is reported when constructing the
//! [`DirectoryScanner`].

pub mod error;
mod extension;
mod record;
mod walk;

pub use crate::extension::{ExtensionSet, VIDEO_EXTENSIONS};
pub use crate::record::MovieRecord;
pub use crate::walk::{DirectoryScanner, ScanOptions, ScanReport, ScanWarning};
