//! Audio stream selection.
//!
//! Given what a probe found in a movie file and what the user asked for,
//! decide which audio ends up in the clip and whether it has to be mixed
//! down to stereo.

use derive_more::Display;

/// One audio stream, as reported by a media probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioStreamInfo {
    /// Position among the file's audio streams (what `0:a:N` refers to), not
    /// the container-wide stream index.
    pub index: usize,
    /// Language tag, if the stream has one. `None` and `Some("")` are
    /// different things to a probe, and are kept apart here.
    pub language: Option<String>,
    pub channels: u32,
    pub codec: Option<String>,
}
impl AudioStreamInfo {
    pub fn new(index: usize, language: Option<&str>, channels: u32) -> Self {
        Self { index, language: language.map(str::to_string), channels, codec: None }
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec = Some(codec.into());
        self
    }
}

/// What a probe of a movie file produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The audio streams in source order. May be empty.
    Streams(Vec<AudioStreamInfo>),
    /// The probe could not be run or its output not understood.
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSelection {
    /// Keep every audio stream.
    All,
    /// Keep only the audio stream at this position.
    Stream(usize),
    /// There is no audio to keep; the clip is video only.
    Silent,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    #[display("all streams kept")]
    PreserveAll,
    #[display("language matched")]
    ExactLanguage,
    #[display("language matched by prefix")]
    LanguagePrefix,
    #[display("no language match; first stream")]
    FirstStream,
    #[display("no audio streams")]
    NoStreams,
    #[display("probe unavailable; first stream")]
    ProbeUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioDecision {
    pub selection: AudioSelection,
    pub downmix_to_stereo: bool,
    pub reason: SelectionReason,
}
impl AudioDecision {
    /// The single selected stream, if exactly one was selected.
    pub fn stream_index(&self) -> Option<usize> {
        match self.selection {
            AudioSelection::Stream(index) => Some(index),
            AudioSelection::All | AudioSelection::Silent => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPreferences {
    /// Preferred language tag, usually ISO 639-2 (`eng`, `fre`).
    pub language: String,
    pub preserve_all: bool,
    /// Mix anything with more than two channels down to stereo.
    pub stereo: bool,
}
impl Default for AudioPreferences {
    fn default() -> Self {
        Self { language: "eng".to_string(), preserve_all: false, stereo: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AudioStreamSelector {
    preferences: AudioPreferences,
}
impl AudioStreamSelector {
    pub fn new(preferences: AudioPreferences) -> Self {
        Self { preferences }
    }

    pub fn preferences(&self) -> &AudioPreferences {
        &self.preferences
    }

    /// Decide which audio to keep.
    ///
    /// With `preserve_all`, every stream is kept and the language preference
    /// is ignored. Otherwise the first stream tagged with the preferred
    /// language wins, then the first whose tag starts with the same two
    /// letters (so `en` and `eng` find each other), then the first stream.
    ///
    /// An unavailable probe is not an error: the first audio stream is used,
    /// if there turns out to be one.
    pub fn select(&self, probe: &ProbeOutcome) -> AudioDecision {
        let stereo = self.preferences.stereo;
        let streams = match probe {
            ProbeOutcome::Streams(streams) => streams,
            ProbeOutcome::Unavailable(reason) => {
                tracing::warn!(%reason, "Audio streams unknown; using the first one");
                // Channel counts are unknown, so a requested stereo mix always applies.
                let selection =
                    if self.preferences.preserve_all { AudioSelection::All } else { AudioSelection::Stream(0) };
                let reason = SelectionReason::ProbeUnavailable;
                return AudioDecision { selection, downmix_to_stereo: stereo, reason };
            },
        };
        if self.preferences.preserve_all {
            return AudioDecision {
                selection: AudioSelection::All,
                downmix_to_stereo: stereo && streams.iter().any(|stream| stream.channels > 2),
                reason: SelectionReason::PreserveAll,
            };
        }
        let Some((stream, reason)) = self.pick(streams) else {
            return AudioDecision {
                selection: AudioSelection::Silent,
                downmix_to_stereo: false,
                reason: SelectionReason::NoStreams,
            };
        };
        tracing::debug!(
            index = stream.index,
            language = stream.language.as_deref().unwrap_or("unknown"),
            channels = stream.channels,
            %reason,
            "Selected audio stream"
        );
        AudioDecision {
            selection: AudioSelection::Stream(stream.index),
            downmix_to_stereo: stereo && stream.channels > 2,
            reason,
        }
    }

    fn pick<'a>(&self, streams: &'a [AudioStreamInfo]) -> Option<(&'a AudioStreamInfo, SelectionReason)> {
        let first = streams.first()?;
        let wanted = self.preferences.language.trim().to_lowercase();
        if wanted.is_empty() {
            return Some((first, SelectionReason::FirstStream));
        }
        let tagged = || {
            streams
                .iter()
                .filter_map(|stream| Some((stream, stream.language.as_deref()?.trim().to_lowercase())))
        };
        if let Some((stream, _)) = tagged().find(|(_, language)| *language == wanted) {
            return Some((stream, SelectionReason::ExactLanguage));
        }
        let prefix: String = wanted.chars().take(2).collect();
        if let Some((stream, _)) = tagged().find(|(_, language)| language.starts_with(&prefix)) {
            return Some((stream, SelectionReason::LanguagePrefix));
        }
        Some((first, SelectionReason::FirstStream))
    }
}
