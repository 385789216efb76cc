//! Audio stream inspection with ffprobe.

use crate::Tools;
use reel_plan::{AudioStreamInfo, ProbeOutcome};
use serde::Deserialize;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::instrument;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    channels: Option<u32>,
    #[serde(default)]
    tags: ProbeTags,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeTags {
    #[serde(alias = "LANGUAGE")]
    language: Option<String>,
}

// Assumed when ffprobe doesn't report a channel count.
const DEFAULT_CHANNELS: u32 = 2;

/// Parse `ffprobe -print_format json -show_streams` output into audio
/// streams, numbered by their position among the audio streams.
pub fn parse_streams(json: &[u8]) -> Result<Vec<AudioStreamInfo>, serde_json::Error> {
    let output: ProbeOutput = serde_json::from_slice(json)?;
    Ok(output
        .streams
        .into_iter()
        .filter(|stream| stream.codec_type.as_deref().is_none_or(|kind| kind == "audio"))
        .enumerate()
        .map(|(index, stream)| AudioStreamInfo {
            index,
            language: stream.tags.language,
            channels: stream.channels.unwrap_or(DEFAULT_CHANNELS),
            codec: stream.codec_name,
        })
        .collect())
}

impl Tools {
    /// List the audio streams of `file`.
    ///
    /// Never fails: a missing ffprobe, a failed run, or unreadable output all
    /// become [`ProbeOutcome::Unavailable`] with the reason.
    #[instrument(skip(self), fields(file = %file.display()))]
    pub fn probe(&self, file: &Path) -> ProbeOutcome {
        let Some(ffprobe) = self.ffprobe() else {
            return ProbeOutcome::Unavailable("ffprobe not found".to_string());
        };
        let output = Command::new(ffprobe)
            .args(["-v", "quiet", "-print_format", "json", "-show_streams", "-select_streams", "a"])
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output();
        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(output) => return ProbeOutcome::Unavailable(format!("ffprobe exited with {}", output.status)),
            Err(err) => return ProbeOutcome::Unavailable(format!("ffprobe could not be run: {err}")),
        };
        match parse_streams(&output.stdout) {
            Ok(streams) => {
                tracing::debug!(streams = streams.len(), "Probed audio streams");
                ProbeOutcome::Streams(streams)
            },
            Err(err) => ProbeOutcome::Unavailable(format!("unreadable ffprobe output: {err}")),
        }
    }
}
