//! Clip planning.
//!
//! The last pure step before anything is run: an [`AudioStreamSelector`]
//! turns probe results and preferences into an [`AudioDecision`], and a
//! [`ClipPlanner`] combines that with the chosen movie and time range into a
//! [`ClipPlan`]. A plan describes the clip completely; whatever executes it
//! needs no other state.

mod audio;
mod consts;
pub mod error;
mod plan;
mod timestamp;

pub use crate::audio::{
    AudioDecision, AudioPreferences, AudioSelection, AudioStreamInfo, AudioStreamSelector, ProbeOutcome,
    SelectionReason,
};
pub use crate::plan::{AudioEncoding, ClipPlan, ClipPlanner, clean_title, output_file_name};
pub use crate::timestamp::Timestamp;
