use crate::cli::Cli;
use crate::error::{ErrorKind, Result};
use crate::prompt::{self, MAX_CHOICES};
use exn::ResultExt;
use reel_cache::{IndexCache, Origin};
use reel_config::{Config, default_config_path};
use reel_ffmpeg::Tools;
use reel_match::{MatchEngine, Verdict};
use reel_plan::{AudioDecision, AudioPreferences, AudioSelection, AudioStreamSelector, ClipPlan, ClipPlanner, Timestamp};
use reel_scan::MovieRecord;
use std::path::{Path, PathBuf};

const DEFAULT_START: Timestamp = Timestamp::ZERO;
const DEFAULT_DURATION: Timestamp = Timestamp::from_secs(20);
const TEST_DIR_NAME: &str = "clips_testing";

pub fn run(cli: &Cli) -> Result<()> {
    if cli.check {
        return check(cli);
    }
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if cli.clear_cache {
        return clear_cache(&config);
    }
    if cli.cache_info {
        cache_info(&config);
        return Ok(());
    }
    let Some(query) = cli.movie.as_deref() else {
        exn::bail!(ErrorKind::MissingMovie);
    };

    let tools = discover(cli, &config)?;
    let movie = select_movie(query, &config, cli.yes)?;
    println!("Selected movie: {}", file_name(&movie.path));

    let start = match cli.start {
        Some(start) => start,
        None => prompt::timestamp("Start time", DEFAULT_START, cli.yes)?,
    };
    let duration = match cli.duration {
        Some(duration) => duration,
        None => prompt::timestamp("Duration", DEFAULT_DURATION, cli.yes)?,
    };

    let decision = AudioStreamSelector::new(audio_preferences(cli, &config)).select(&tools.probe(&movie.path));
    let plan = ClipPlanner::new(output_dir(&config.clips_dir, cli.test), config.audio.clone())
        .plan(&movie.path, start, duration, &decision)
        .or_raise(|| ErrorKind::Plan)?;
    print_summary(&plan, &decision);

    if !prompt::confirm("Proceed with clipping?", cli.yes)? {
        println!("Cancelled.");
        return Ok(());
    }
    let output = tools.transcode(&plan).or_raise(|| ErrorKind::Transcode)?;
    println!("Clip created: {}", output.display());
    Ok(())
}

fn check(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let tools = discover(cli, &config)?;
    tools.verify().or_raise(|| ErrorKind::Tools)?;
    println!("ffmpeg: {}", tools.ffmpeg().display());
    match tools.ffprobe() {
        Some(ffprobe) => println!("ffprobe: {}", ffprobe.display()),
        None => println!("ffprobe: not found"),
    }
    match cli.config.clone().or_else(default_config_path) {
        Some(path) if path.is_file() => println!("Config file: {}", path.display()),
        Some(path) => println!("Config file: {} (not present; using defaults)", path.display()),
        None => println!("Config file: none (using defaults)"),
    }
    println!("Movies directory: {}", config.movies_dir.display());
    println!("Clips directory: {}", config.clips_dir.display());
    Ok(())
}

fn clear_cache(config: &Config) -> Result<()> {
    let Some(file) = config.cache_file() else {
        println!("Movie index caching is disabled");
        return Ok(());
    };
    if IndexCache::new(file).clear().or_raise(|| ErrorKind::Index)? {
        println!("Movie index cache cleared");
    } else {
        println!("No cache file found");
    }
    Ok(())
}

fn cache_info(config: &Config) {
    let Some(file) = config.cache_file() else {
        println!("Movie index caching is disabled");
        return;
    };
    match IndexCache::new(file).info() {
        Some(info) => {
            println!("Cache information:");
            println!("  Path: {}", info.path.display());
            println!("  Movies: {}", info.movie_count);
            println!("  Age: {:.1} hours", info.age.as_seconds_f64() / 3600.0);
            println!("  Size: {:.1} KB", info.size_bytes as f64 / 1024.0);
            println!("  Movies directory: {}", info.source_root.display());
        },
        None => println!("No cache found"),
    }
}

/// Command-line tool paths win over configured ones.
fn discover(cli: &Cli, config: &Config) -> Result<Tools> {
    let ffmpeg = cli.ffmpeg_path.as_deref().or(config.ffmpeg.as_deref());
    let ffprobe = cli.ffprobe_path.as_deref().or(config.ffprobe.as_deref());
    Tools::discover(ffmpeg, ffprobe).or_raise(|| ErrorKind::Tools)
}

/// Every movie in the library, through the index cache unless it's disabled.
fn library(config: &Config) -> Result<Vec<MovieRecord>> {
    let index = config.index_config();
    let Some(file) = config.cache_file() else {
        return Ok(IndexCache::rebuild(&index).or_raise(|| ErrorKind::Index)?.movies);
    };
    let lookup = IndexCache::new(file).resolve(&index).or_raise(|| ErrorKind::Index)?;
    match lookup.origin {
        Origin::Cached => tracing::info!("Using cached movie index"),
        Origin::Rebuilt => tracing::info!(movies = lookup.snapshot.movies.len(), "Built movie index"),
    }
    Ok(lookup.available())
}

fn select_movie(query: &str, config: &Config, assume_yes: bool) -> Result<MovieRecord> {
    let engine = MatchEngine::default();
    if let Some(ranking) = engine.find_direct(query)
        && let Some(direct) = ranking.selected()
    {
        return Ok(direct.record.clone());
    }

    let movies = library(config)?;
    if movies.is_empty() {
        exn::bail!(ErrorKind::EmptyLibrary(config.movies_dir.clone()));
    }
    let ranking = engine.find(query, &movies);
    let chosen = match ranking.verdict() {
        Verdict::Direct | Verdict::AutoSelected => ranking.selected(),
        Verdict::Ambiguous => {
            let index = prompt::choose(query, ranking.candidates(), &config.movies_dir, assume_yes)?;
            ranking.choose(index)
        },
        Verdict::NoMatch => {
            println!("Available movies:");
            for movie in movies.iter().take(MAX_CHOICES) {
                println!("  - {}", movie.stem());
            }
            None
        },
    };
    match chosen {
        Some(candidate) => Ok(candidate.record.clone()),
        None => exn::bail!(ErrorKind::NoMatch(query.to_string())),
    }
}

/// Configured preferences, overridden by whatever was given on the command line.
fn audio_preferences(cli: &Cli, config: &Config) -> AudioPreferences {
    let mut preferences = config.audio_preferences(!cli.no_stereo);
    if let Some(language) = &cli.audio_lang {
        preferences.language = language.clone();
    }
    preferences.preserve_all |= cli.preserve_audio;
    preferences
}

fn output_dir(clips_dir: &Path, test: bool) -> PathBuf {
    if !test {
        return clips_dir.to_path_buf();
    }
    clips_dir.parent().unwrap_or(clips_dir).join(TEST_DIR_NAME)
}

fn print_summary(plan: &ClipPlan, decision: &AudioDecision) {
    println!("Creating clip: {}", file_name(plan.output_path()));
    println!("From: {} to {}", plan.start(), plan.end());
    println!("Duration: {}", plan.duration());
    println!("Audio: {}", describe_audio(decision));
}

fn describe_audio(decision: &AudioDecision) -> String {
    let selection = match decision.selection {
        AudioSelection::All => "all streams".to_string(),
        AudioSelection::Stream(index) => format!("stream {index}"),
        AudioSelection::Silent => return format!("none ({})", decision.reason),
    };
    let mix = if decision.downmix_to_stereo { ", stereo" } else { "" };
    format!("{selection}{mix} ({})", decision.reason)
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use reel_config::{ConfigFile, DirectoriesSection, PathContext};
    use reel_plan::SelectionReason;
    use std::fs;
    use tempfile::TempDir;

    fn config(home: &TempDir, cache: bool) -> Config {
        let movies = home.path().join("movies");
        fs::create_dir_all(&movies).unwrap();
        let mut file = ConfigFile {
            directories: DirectoriesSection { movies: Some(movies), clips: None },
            ..ConfigFile::default()
        };
        file.settings.cache_enabled = cache;
        let context = PathContext {
            home: Some(home.path().to_path_buf()),
            current_dir: home.path().to_path_buf(),
            cache_dir: Some(home.path().join("cache")),
        };
        Config::resolve(file, &context).unwrap()
    }

    fn add_movie(config: &Config, relative: &str) -> PathBuf {
        let path = config.movies_dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"movie").unwrap();
        path
    }

    #[test]
    fn library_is_cached_between_runs() {
        let home = tempfile::tempdir().unwrap();
        let config = config(&home, true);
        let heat = add_movie(&config, "Heat.1995.720p.BluRay.mkv");
        assert_eq!(library(&config).unwrap().len(), 1);
        assert!(config.cache_location.as_ref().unwrap().is_file());

        // Found through the cache; new files only show up after the TTL.
        add_movie(&config, "Alien.1979.mkv");
        let movies = library(&config).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].path, heat);

        // Deleted files are dropped straight away.
        fs::remove_file(&heat).unwrap();
        assert!(library(&config).unwrap().is_empty());
    }

    #[test]
    fn library_without_cache_always_scans() {
        let home = tempfile::tempdir().unwrap();
        let config = config(&home, false);
        add_movie(&config, "Heat.1995.mkv");
        assert_eq!(library(&config).unwrap().len(), 1);
        add_movie(&config, "Alien.1979.mkv");
        assert_eq!(library(&config).unwrap().len(), 2);
        assert!(!home.path().join("cache").exists());
    }

    #[test]
    fn selects_clear_winner() {
        let home = tempfile::tempdir().unwrap();
        let config = config(&home, true);
        add_movie(&config, "Heat.1995.720p.BluRay.mkv");
        let alien = add_movie(&config, "Alien (1979)/movie.mkv");
        assert_eq!(select_movie("alien", &config, false).unwrap().path, alien);
    }

    #[test]
    fn ambiguous_match_takes_the_best_when_not_asking() {
        let home = tempfile::tempdir().unwrap();
        let config = config(&home, true);
        let first = add_movie(&config, "Iron.Man.2008.1080p.BluRay.x264.mkv");
        add_movie(&config, "Iron.Man.2.2010.1080p.BluRay.x264.mkv");
        assert_eq!(select_movie("iron man", &config, true).unwrap().path, first);
    }

    #[test]
    fn direct_path_skips_the_library() {
        let home = tempfile::tempdir().unwrap();
        let config = config(&home, true);
        let elsewhere = home.path().join("Home.Video.mp4");
        fs::write(&elsewhere, b"video").unwrap();
        let movie = select_movie(elsewhere.to_str().unwrap(), &config, false).unwrap();
        assert_eq!(movie.path, elsewhere);
        assert!(!config.cache_location.as_ref().unwrap().exists());
    }

    #[test]
    fn unmatched_and_empty_libraries_fail() {
        let home = tempfile::tempdir().unwrap();
        let config = config(&home, false);
        let err = select_movie("heat", &config, true).unwrap_err();
        assert!(matches!(&*err, ErrorKind::EmptyLibrary(_)));
        add_movie(&config, "Heat.1995.mkv");
        let err = select_movie("the godfather", &config, true).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NoMatch(query) if query == "the godfather"));
    }

    #[test]
    fn command_line_overrides_audio_settings() {
        let home = tempfile::tempdir().unwrap();
        let config = config(&home, false);
        let cli = Cli::parse_from(["reel", "heat"]);
        assert_eq!(audio_preferences(&cli, &config), AudioPreferences::default());
        let cli = Cli::parse_from(["reel", "heat", "--audio-lang", "fre", "--preserve-audio", "--no-stereo"]);
        let preferences = audio_preferences(&cli, &config);
        assert_eq!(preferences.language, "fre");
        assert!(preferences.preserve_all);
        assert!(!preferences.stereo);
    }

    #[test]
    fn test_clips_go_next_to_clips_directory() {
        assert_eq!(output_dir(Path::new("/movies/clips"), false), Path::new("/movies/clips"));
        assert_eq!(output_dir(Path::new("/movies/clips"), true), Path::new("/movies/clips_testing"));
    }

    #[test]
    fn audio_summary() {
        let decision = |selection, downmix_to_stereo, reason| AudioDecision { selection, downmix_to_stereo, reason };
        assert_eq!(
            describe_audio(&decision(AudioSelection::Stream(1), true, SelectionReason::ExactLanguage)),
            "stream 1, stereo (language matched)"
        );
        assert_eq!(
            describe_audio(&decision(AudioSelection::All, false, SelectionReason::PreserveAll)),
            "all streams (all streams kept)"
        );
        assert_eq!(
            describe_audio(&decision(AudioSelection::Silent, false, SelectionReason::NoStreams)),
            "none (no audio streams)"
        );
    }
}
