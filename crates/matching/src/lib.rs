//! Fuzzy title matching.
//!
//! Queries are loose ("iron man", "blade runer"), file names are noisy
//! (`Iron.Man.2008.MULTi.VF.1080p.BluRay.x264-BDHD.mkv`). Both are
//! [normalized](Normalizer) into plain lowercase words before being
//! [scored](fn@score), and the [`MatchEngine`] turns those scores into a
//! [`Ranking`] with a [`Verdict`] on whether a clear winner exists.
//!
//! The engine never prompts; resolving an ambiguous ranking is the caller's
//! job, via [`Ranking::choose`].

mod consts;
mod engine;
mod normalize;
mod score;

pub use crate::consts::IGNORED_TOKENS;
pub use crate::engine::{MatchCandidate, MatchEngine, MatchOptions, Ranking, Verdict};
pub use crate::normalize::{NormalizedTitle, Normalizer, normalize};
pub use crate::score::score;
