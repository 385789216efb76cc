//! Configuration for reel.
//!
//! Settings are layered with `figment` (see [`source`]) into a [`ConfigFile`],
//! then [resolved](Config::resolve) against the machine's directories into a
//! validated [`Config`]. The other crates never see the on-disk format, only
//! the typed options derived from a [`Config`].

mod config;
pub mod error;
mod file;
pub mod source;

pub use crate::config::{Config, PathContext};
pub use crate::file::{ConfigFile, DirectoriesSection, SettingsSection, ToolsSection};
pub use crate::source::{CONFIG_FILE_NAME, ENV_PREFIX, default_config_path};
