use crate::ConfigFile;
use crate::error::{ErrorKind, Result};
use crate::source::{self, project_dirs};
use directories::BaseDirs;
use reel_cache::{CacheFile, IndexConfig};
use reel_plan::{AudioEncoding, AudioPreferences};
use reel_scan::{ExtensionSet, ScanOptions};
use std::path::{Path, PathBuf};
use time::Duration;

const CACHE_FILE_NAME: &str = "movie_index.json";

/// Machine-specific locations that defaults are derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathContext {
    pub home: Option<PathBuf>,
    pub current_dir: PathBuf,
    pub cache_dir: Option<PathBuf>,
}
impl PathContext {
    pub fn detect() -> Self {
        Self {
            home: BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
            current_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            cache_dir: project_dirs().map(|dirs| dirs.cache_dir().to_path_buf()),
        }
    }

    /// Expand a leading `~` to the home directory.
    fn expand(&self, path: &Path) -> PathBuf {
        match (path.strip_prefix("~"), &self.home) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => path.to_path_buf(),
        }
    }

    fn default_movies_dir(&self) -> PathBuf {
        self.home
            .iter()
            .flat_map(|home| [home.join("Videos"), home.join("Movies")])
            .find(|candidate| candidate.is_dir())
            .unwrap_or_else(|| self.current_dir.clone())
    }

    fn default_cache_location(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => dir.join(CACHE_FILE_NAME),
            None => self.current_dir.join(".reel").join(CACHE_FILE_NAME),
        }
    }
}

/// Validated, fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub movies_dir: PathBuf,
    pub clips_dir: PathBuf,
    pub audio: AudioEncoding,
    pub audio_language: String,
    pub preserve_all_audio: bool,
    pub follow_symlinks: bool,
    pub extensions: ExtensionSet,
    /// `None` when caching is disabled.
    pub cache_location: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub ffmpeg: Option<PathBuf>,
    pub ffprobe: Option<PathBuf>,
}
impl Config {
    /// Load from the default sources, or `path` instead of the default file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = source::extract(&source::figment(path)?)?;
        Self::resolve(file, &PathContext::detect())
    }

    /// Fill in defaults and validate.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::MoviesDirectory`] if the library root doesn't exist, and
    /// [`ErrorKind::Invalid`] for settings that can't work.
    pub fn resolve(file: ConfigFile, context: &PathContext) -> Result<Self> {
        let ConfigFile { directories, settings, tools } = file;
        let movies_dir = match directories.movies {
            Some(movies) => context.expand(&movies),
            None => context.default_movies_dir(),
        };
        if !movies_dir.is_dir() {
            exn::bail!(ErrorKind::MoviesDirectory(movies_dir));
        }
        let clips_dir = match directories.clips {
            Some(clips) => context.expand(&clips),
            None => movies_dir.join("clips"),
        };
        let extensions = ExtensionSet::new(&settings.video_extensions);
        if extensions.is_empty() {
            exn::bail!(ErrorKind::Invalid("video_extensions", "at least one extension is required"));
        }
        if settings.sample_rate == 0 {
            exn::bail!(ErrorKind::Invalid("sample_rate", "must be greater than zero"));
        }
        if settings.audio_channels == 0 {
            exn::bail!(ErrorKind::Invalid("audio_channels", "must be greater than zero"));
        }
        if settings.audio_codec.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("audio_codec", "must not be empty"));
        }
        let cache_ttl = i64::try_from(settings.cache_ttl_hours)
            .ok()
            .filter(|hours| *hours > 0 && *hours <= i64::MAX / 3600)
            .map(Duration::hours)
            .ok_or(ErrorKind::Invalid("cache_ttl_hours", "must be a positive number of hours"))?;
        let cache_location = settings.cache_enabled.then(|| match settings.cache_location {
            Some(location) => context.expand(&location),
            None => context.default_cache_location(),
        });
        Ok(Self {
            movies_dir,
            clips_dir,
            audio: AudioEncoding {
                codec: settings.audio_codec,
                sample_rate: settings.sample_rate,
                stereo_channels: settings.audio_channels,
            },
            audio_language: settings.audio_language,
            preserve_all_audio: settings.preserve_all_audio,
            follow_symlinks: settings.follow_symlinks,
            extensions,
            cache_location,
            cache_ttl,
            ffmpeg: tools.ffmpeg.map(|path| context.expand(&path)),
            ffprobe: tools.ffprobe.map(|path| context.expand(&path)),
        })
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions { extensions: self.extensions.clone(), follow_symlinks: self.follow_symlinks }
    }

    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::new(&self.movies_dir, self.scan_options()).with_ttl(self.cache_ttl)
    }

    pub fn cache_file(&self) -> Option<CacheFile> {
        self.cache_location.as_ref().map(CacheFile::new)
    }

    /// Preferences for audio selection; `stereo` comes from the command line.
    pub fn audio_preferences(&self, stereo: bool) -> AudioPreferences {
        AudioPreferences {
            language: self.audio_language.clone(),
            preserve_all: self.preserve_all_audio,
            stereo,
        }
    }
}
