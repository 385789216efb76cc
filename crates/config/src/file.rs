//! The configuration as written by the user, before paths are resolved.

use reel_scan::VIDEO_EXTENSIONS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete layered configuration.
///
/// ```toml
/// [directories]
/// movies = "~/Movies"
/// clips = "~/Movies/clips"
///
/// [settings]
/// audio_language = "eng"
/// cache_ttl_hours = 24
///
/// [tools]
/// ffmpeg = "/opt/ffmpeg/bin/ffmpeg"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub directories: DirectoriesSection,
    pub settings: SettingsSection,
    pub tools: ToolsSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoriesSection {
    /// Library root. Defaults to `~/Videos` or `~/Movies`, whichever exists.
    pub movies: Option<PathBuf>,
    /// Where clips are written. Defaults to `clips` inside the library root.
    pub clips: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsSection {
    pub audio_codec: String,
    pub sample_rate: u32,
    pub audio_channels: u8,
    pub audio_language: String,
    pub preserve_all_audio: bool,
    pub follow_symlinks: bool,
    pub video_extensions: Vec<String>,
    pub cache_enabled: bool,
    pub cache_ttl_hours: u64,
    pub cache_location: Option<PathBuf>,
}
impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            audio_codec: "pcm_s16le".to_string(),
            sample_rate: 48_000,
            audio_channels: 2,
            audio_language: "eng".to_string(),
            preserve_all_audio: false,
            follow_symlinks: true,
            video_extensions: VIDEO_EXTENSIONS.iter().map(|ext| format!(".{ext}")).collect(),
            cache_enabled: true,
            cache_ttl_hours: 24,
            cache_location: None,
        }
    }
}

/// Explicit tool locations; when unset, tools are looked up on `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
}
