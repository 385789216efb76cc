//! ffmpeg and ffprobe, as used by reel.
//!
//! [`Tools`] locates the executables, [probes](Tools::probe) a movie's audio
//! streams, and [transcodes](Tools::transcode) a finished [`ClipPlan`]. All
//! process handling lives here; the planning crates only ever see plain data.
//!
//! [`ClipPlan`]: reel_plan::ClipPlan

pub mod error;
mod probe;
mod tools;
mod transcode;

pub use crate::probe::parse_streams;
pub use crate::tools::Tools;
pub use crate::transcode::transcode_args;
