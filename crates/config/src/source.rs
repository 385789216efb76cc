//! Layered configuration sources.
//!
//! Later layers override earlier ones:
//!
//! 1. built-in defaults,
//! 2. the configuration file (TOML, or YAML/JSON by extension),
//! 3. `REEL_`-prefixed environment variables, with `__` between section and
//!    key: `REEL_SETTINGS__CACHE_TTL_HOURS=48`.

use crate::ConfigFile;
use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "REEL_";
pub const CONFIG_FILE_NAME: &str = "reel.toml";

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "reel")
}

/// Where the configuration file lives when none is given explicitly, such as
/// `~/.config/reel/reel.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Defaults, then `path`, then nothing else.
fn file_layers(path: &Path) -> Figment {
    let defaults = Figment::from(Serialized::defaults(ConfigFile::default()));
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
    let format = match extension.as_deref() {
        Some("yaml" | "yml") => "yaml",
        Some("json") => "json",
        _ => "toml",
    };
    tracing::debug!(path = %path.display(), format, present = path.is_file(), "configuration file layer");
    match format {
        "yaml" => defaults.merge(Yaml::file_exact(path)),
        "json" => defaults.merge(Json::file_exact(path)),
        _ => defaults.merge(Toml::file_exact(path)),
    }
}

/// Build the full set of layers.
///
/// An explicit `path` must exist. The default file is optional: without it,
/// defaults and the environment still apply.
pub fn figment(path: Option<&Path>) -> Result<Figment> {
    let layers = match path {
        Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
        Some(path) => file_layers(path),
        None => match default_config_path() {
            Some(path) => file_layers(&path),
            None => {
                tracing::debug!("no configuration directory, using defaults and environment only");
                Figment::from(Serialized::defaults(ConfigFile::default()))
            },
        },
    };
    Ok(layers.merge(Env::prefixed(ENV_PREFIX).split("__")))
}

/// Extract the user's configuration from already-assembled layers.
pub fn extract(figment: &Figment) -> Result<ConfigFile> {
    figment.extract().or_raise(|| ErrorKind::Load)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[rstest]
    #[case("reel.toml", "[settings]\naudio_language = \"fre\"\ncache_ttl_hours = 6\n")]
    #[case("reel.yaml", "settings:\n  audio_language: fre\n  cache_ttl_hours: 6\n")]
    #[case("reel.json", r#"{"settings": {"audio_language": "fre", "cache_ttl_hours": 6}}"#)]
    fn reads_any_supported_format(#[case] name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        let file = extract(&file_layers(&path)).unwrap();
        assert_eq!(file.settings.audio_language, "fre");
        assert_eq!(file.settings.cache_ttl_hours, 6);
        // Untouched keys keep their defaults.
        assert_eq!(file.settings.sample_rate, 48_000);
        assert!(file.settings.follow_symlinks);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = figment(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));
    }

    #[test]
    fn malformed_file_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reel.toml");
        fs::write(&path, "[settings]\nsample_rate = \"fast\"\n").unwrap();
        let err = extract(&file_layers(&path)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load));
    }

    #[test]
    fn defaults_alone_are_complete() {
        let file = extract(&Figment::from(Serialized::defaults(ConfigFile::default()))).unwrap();
        assert_eq!(file, ConfigFile::default());
    }
}
