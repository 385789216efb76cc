use clap::{ArgAction, Parser};
use reel_plan::Timestamp;
use std::path::PathBuf;

const TIME_HELP: &str = "HH:MM:SS, MM:SS, or seconds";

#[derive(Debug, Parser)]
#[command(name = "reel", author, version, about = "Cut clips out of a movie library, finding movies by fuzzy title")]
pub struct Cli {
    /// Title to search for, or the path of a movie file.
    pub movie: Option<String>,

    /// Where the clip starts (HH:MM:SS, MM:SS, or seconds). Prompted for when omitted.
    #[arg(short, long, value_parser = parse_timestamp)]
    pub start: Option<Timestamp>,

    /// How long the clip runs (HH:MM:SS, MM:SS, or seconds). Prompted for when omitted.
    #[arg(short, long, value_parser = parse_timestamp)]
    pub duration: Option<Timestamp>,

    /// Write into `clips_testing`, next to the clips directory.
    #[arg(long)]
    pub test: bool,

    /// Check that ffmpeg and the configuration are usable, then exit.
    #[arg(long, conflicts_with_all = ["clear_cache", "cache_info"])]
    pub check: bool,

    #[arg(long, value_name = "PATH")]
    pub ffmpeg_path: Option<PathBuf>,

    #[arg(long, value_name = "PATH")]
    pub ffprobe_path: Option<PathBuf>,

    /// Keep every audio track instead of picking one by language.
    #[arg(long)]
    pub preserve_audio: bool,

    /// Preferred audio language, e.g. eng, fre, spa.
    #[arg(long, value_name = "LANG")]
    pub audio_lang: Option<String>,

    /// Keep the source channel layout instead of mixing down to stereo.
    #[arg(long)]
    pub no_stereo: bool,

    /// Delete the movie index, then exit.
    #[arg(long, conflicts_with = "cache_info")]
    pub clear_cache: bool,

    /// Show details of the movie index, then exit.
    #[arg(long)]
    pub cache_info: bool,

    /// Never prompt: take the best match, default times, and proceed.
    #[arg(short, long)]
    pub yes: bool,

    /// Read configuration from this file instead of the default location.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More logging; repeat for even more.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn parse_timestamp(value: &str) -> Result<Timestamp, String> {
    value.parse().map_err(|_| format!("expected {TIME_HELP}"))
}
