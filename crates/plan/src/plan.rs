use crate::audio::{AudioDecision, AudioSelection};
use crate::consts::{BRACKETED_REGEX, MARKER_REGEX, SEPARATOR_REGEX};
use crate::error::{ErrorKind, Result};
use crate::timestamp::Timestamp;
use std::path::{Path, PathBuf};

const OUTPUT_EXTENSION: &str = "mp4";

/// How audio is encoded in a clip. Video is always stream-copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioEncoding {
    pub codec: String,
    pub sample_rate: u32,
    /// Channel count used when a decision asks for a downmix.
    pub stereo_channels: u8,
}
impl Default for AudioEncoding {
    fn default() -> Self {
        Self { codec: "pcm_s16le".to_string(), sample_rate: 48_000, stereo_channels: 2 }
    }
}

/// Everything needed to cut one clip. Built by [`ClipPlanner::plan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipPlan {
    source_path: PathBuf,
    start: Timestamp,
    duration: Timestamp,
    audio: AudioSelection,
    downmix_to_stereo: bool,
    encoding: AudioEncoding,
    output_path: PathBuf,
}
impl ClipPlan {
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn duration(&self) -> Timestamp {
        self.duration
    }

    pub fn end(&self) -> Timestamp {
        // Checked when the plan was built.
        Timestamp::from_secs(self.start.as_secs() + self.duration.as_secs())
    }

    pub fn audio(&self) -> AudioSelection {
        self.audio
    }

    pub fn selected_audio_index(&self) -> Option<usize> {
        match self.audio {
            AudioSelection::Stream(index) => Some(index),
            AudioSelection::All | AudioSelection::Silent => None,
        }
    }

    pub fn downmix_to_stereo(&self) -> bool {
        self.downmix_to_stereo
    }

    pub fn encoding(&self) -> &AudioEncoding {
        &self.encoding
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

/// Turns a chosen movie, a time range and an audio decision into a [`ClipPlan`].
///
/// Planning is pure: nothing is read from or written to disk, so the output
/// directory doesn't need to exist yet.
#[derive(Debug, Clone)]
pub struct ClipPlanner {
    output_dir: PathBuf,
    encoding: AudioEncoding,
}
impl ClipPlanner {
    pub fn new(output_dir: impl Into<PathBuf>, encoding: AudioEncoding) -> Self {
        Self { output_dir: output_dir.into(), encoding }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// # Errors
    ///
    /// [`ErrorKind::InvalidRange`] if `duration` is zero or the clip would end
    /// beyond `u64::MAX` seconds.
    pub fn plan(
        &self,
        source: impl Into<PathBuf>,
        start: Timestamp,
        duration: Timestamp,
        audio: &AudioDecision,
    ) -> Result<ClipPlan> {
        if duration == Timestamp::ZERO {
            exn::bail!(ErrorKind::InvalidRange("duration must be greater than zero"));
        }
        let end = start
            .checked_add(duration)
            .ok_or(ErrorKind::InvalidRange("clip ends too far into the movie"))?;
        let source_path = source.into();
        let stem = source_path.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
        let output_path = self.output_dir.join(output_file_name(&stem, start, end));
        Ok(ClipPlan {
            source_path,
            start,
            duration,
            audio: audio.selection,
            downmix_to_stereo: audio.downmix_to_stereo,
            encoding: self.encoding.clone(),
            output_path,
        })
    }
}

/// Name a clip after its movie and time range, such as
/// `IronMan_00h01m00s_to_00h02m00s.mp4`.
pub fn output_file_name(stem: &str, start: Timestamp, end: Timestamp) -> String {
    format!("{}_{}_to_{}.{OUTPUT_EXTENSION}", clean_title(stem), start.label(), end.label())
}

/// Reduce a release name to a compact title: bracketed parts removed, cut at
/// the first year or quality marker, alphanumerics only.
pub fn clean_title(stem: &str) -> String {
    let unbracketed = BRACKETED_REGEX.replace_all(stem, " ");
    let title: String = SEPARATOR_REGEX
        .split(&unbracketed)
        .filter(|token| !token.is_empty())
        .enumerate()
        .take_while(|(position, token)| *position == 0 || !MARKER_REGEX.is_match(token))
        .flat_map(|(_, token)| token.chars())
        .filter(|c| c.is_alphanumeric())
        .collect();
    if title.is_empty() { "clip".to_string() } else { title }
}
