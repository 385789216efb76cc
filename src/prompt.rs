//! Interactive questions. Every prompt has an answer to fall back on when
//! the user passed `--yes`.

use crate::cli::parse_timestamp;
use crate::error::{ErrorKind, Result};
use dialoguer::{Confirm, Input, Select};
use exn::ResultExt;
use reel_match::MatchCandidate;
use reel_plan::Timestamp;
use std::path::Path;

/// Most candidates ever offered for disambiguation.
pub const MAX_CHOICES: usize = 10;

pub fn timestamp(question: &str, default: Timestamp, assume_yes: bool) -> Result<Timestamp> {
    if assume_yes {
        return Ok(default);
    }
    let answer: String = Input::new()
        .with_prompt(format!("{question} (HH:MM:SS, MM:SS, or seconds)"))
        .default(default.as_secs().to_string())
        .validate_with(|input: &String| parse_timestamp(input).map(|_| ()))
        .interact_text()
        .or_raise(|| ErrorKind::Prompt)?;
    Ok(parse_timestamp(&answer).map_err(|_| ErrorKind::Prompt)?)
}

/// Ask which candidate was meant; returns a zero-based index.
pub fn choose(query: &str, candidates: &[MatchCandidate], root: &Path, assume_yes: bool) -> Result<usize> {
    if assume_yes {
        return Ok(0);
    }
    let items: Vec<String> = candidates.iter().take(MAX_CHOICES).map(|c| describe(c, root)).collect();
    Select::new()
        .with_prompt(format!("Multiple movies found for '{query}'"))
        .items(&items)
        .default(0)
        .interact()
        .or_raise(|| ErrorKind::Prompt)
}

pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Confirm::new().with_prompt(question).default(true).interact().or_raise(|| ErrorKind::Prompt)
}

/// One line per candidate: score, file name, and folder relative to the library.
pub fn describe(candidate: &MatchCandidate, root: &Path) -> String {
    let path = &candidate.record.path;
    let location = path.parent().map(|parent| parent.strip_prefix(root).unwrap_or(parent)).unwrap_or(Path::new(""));
    let location = if location.as_os_str().is_empty() { ".".into() } else { location.display().to_string() };
    format!("{:>3.0}%  {}  ({location})", candidate.score, candidate.record.stem())
}
