//! Persisted movie index.
//!
//! Scanning a large library on every invocation is slow, so the result of a
//! scan is kept as a [`CacheSnapshot`] in a single JSON file. The file is not
//! the source of truth (the library directory is), and if it goes missing or
//! gets corrupted it is rebuilt by scanning again.
//!
//! # Persisted format
//!
//! ```json
//! {
//!   "created_at": 1700000000,
//!   "source_root": "/srv/movies",
//!   "follow_symlinks": true,
//!   "extensions": ["mkv", "mp4"],
//!   "movies": [{ "path": "/srv/movies/Heat.1995.mkv", "size": 1024, "modified_time": 1690000000 }]
//! }
//! ```
//!
//! Timestamps are Unix seconds.

pub mod error;
mod file;
mod index;
mod snapshot;

pub use crate::file::CacheFile;
pub use crate::index::{CacheInfo, DEFAULT_TTL, IndexCache, IndexConfig, Lookup, Origin};
pub use crate::snapshot::CacheSnapshot;
