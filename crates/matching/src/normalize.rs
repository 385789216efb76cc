//! Title normalization.
//!
//! File names carry a lot of noise around the actual title: years, release
//! groups, codecs, resolutions. Normalizing strips that noise down to a
//! lowercase, space-separated list of words that can be compared fuzzily.
//!
//! ```text
//! Iron.Man.2008.MULTi.VF.1080p.BluRay.x264-BDHD  →  iron man bdhd
//! [Group] Heat (1995) h.264                      →  heat
//! Blade.Runner.2049.2017.1080p                   →  blade runner 2049
//! 2001.A.Space.Odyssey.1968.720p                 →  2001 a space odyssey
//! ```
//!
//! Years need care since plenty of titles contain one. A year-shaped word is
//! only taken for the release year when it isn't the first word and release
//! tags follow it, or when it trails another year (`2049.2017`). Anything
//! else stays part of the title, which keeps normalization idempotent.

use crate::consts::{
    BRACKETED_REGEX, DOTTED_CODEC_REGEX, IGNORED_TOKENS, RESOLUTION_REGEX, SEPARATOR_REGEX, STRAY_BRACKET_REGEX,
    YEAR_REGEX,
};
use derive_more::Display;
use std::collections::HashSet;

/// A title after normalization. Never persisted; recomputed on demand.
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NormalizedTitle(String);
impl NormalizedTitle {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ').filter(|token| !token.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters, used to prefer tighter matches when scores tie.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }
}
impl AsRef<str> for NormalizedTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    ignored: HashSet<String>,
}
impl Default for Normalizer {
    fn default() -> Self {
        Self::with_tokens(IGNORED_TOKENS.iter().copied())
    }
}
impl Normalizer {
    /// Use a custom ignore list instead of [`IGNORED_TOKENS`].
    ///
    /// Resolutions (`1080p`) and the release year are always ignored.
    pub fn with_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ignored: tokens.into_iter().map(|token| token.as_ref().trim().to_lowercase()).collect(),
        }
    }

    fn is_noise(&self, token: &str) -> bool {
        self.ignored.contains(token) || RESOLUTION_REGEX.is_match(token)
    }

    /// Drop release tags, then the release year out of whatever years are left.
    fn strip_noise<'a>(&self, tokens: &[&'a str]) -> Vec<&'a str> {
        // Each remaining word, flagged when release tags came right after it.
        let mut words: Vec<(&'a str, bool)> = Vec::with_capacity(tokens.len());
        for &token in tokens {
            if self.is_noise(token) {
                if let Some(last) = words.last_mut() {
                    last.1 = true;
                }
            } else {
                words.push((token, false));
            }
        }
        let mut kept = Vec::with_capacity(words.len());
        let mut index = 0;
        while index < words.len() {
            let (word, before_noise) = words[index];
            if index == 0 || !is_year(word) {
                kept.push(word);
                index += 1;
                continue;
            }
            let run = words[index..].iter().take_while(|(word, _)| is_year(word)).count();
            // In a run of years only the first belongs to the title.
            if run > 1 || !before_noise {
                kept.push(word);
            }
            index += run;
        }
        kept
    }

    pub fn normalize(&self, title: &str) -> NormalizedTitle {
        let lowered = title.to_lowercase();
        let lowered = DOTTED_CODEC_REGEX.replace_all(&lowered, "$1$2");
        let unbracketed = BRACKETED_REGEX.replace_all(&lowered, " ");
        let unbracketed = STRAY_BRACKET_REGEX.replace_all(&unbracketed, " ").into_owned();
        let debracketed;
        let mut tokens = split(&unbracketed);
        if tokens.is_empty() {
            // Everything was inside brackets; keep the contents instead.
            debracketed = STRAY_BRACKET_REGEX.replace_all(&lowered, " ").into_owned();
            tokens = split(&debracketed);
        }
        let kept = self.strip_noise(&tokens);
        // A title made entirely of "noise" (such as "1080p.BluRay") is still a title.
        let words = if kept.is_empty() { tokens } else { kept };
        NormalizedTitle(words.join(" "))
    }
}

fn is_year(token: &str) -> bool {
    YEAR_REGEX.is_match(token)
}

fn split(value: &str) -> Vec<&str> {
    SEPARATOR_REGEX.split(value).filter(|token| !token.is_empty()).collect()
}

/// Normalize with the default ignore list.
pub fn normalize(title: &str) -> NormalizedTitle {
    Normalizer::default().normalize(title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Iron.Man.2008.MULTi.VF.1080p.BluRay.x264-BDHD", "iron man bdhd")]
    #[case("Iron.Man.2.2010.1080p.BluRay.x264-SECTOR7", "iron man 2 sector7")]
    #[case("The_Thing (1982) [Remastered] h.264", "the thing")]
    #[case("Heat - Director's Cut", "heat director's cut")]
    #[case("  Blade   Runner  ", "blade runner")]
    #[case("2012", "2012")]
    #[case("2012.1080p", "2012")]
    #[case("1080p.BluRay", "1080p bluray")]
    #[case("[Alien]", "alien")]
    #[case("1917.2019.720p", "1917")]
    #[case("Movie.{Extended}.576i.DVDRip", "movie")]
    #[case("Blade.Runner.2049.2017", "blade runner 2049")]
    #[case("Blade.Runner.2049.2017.1080p.BluRay", "blade runner 2049")]
    #[case("Blade.Runner.1982.1080p.BluRay", "blade runner")]
    #[case("blade runner 2049", "blade runner 2049")]
    #[case("2001.A.Space.Odyssey.1968.720p", "2001 a space odyssey")]
    #[case("2001.A.Space.Odyssey.1968", "2001 a space odyssey 1968")]
    #[case("2001", "2001")]
    #[case("", "")]
    fn normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input).as_str(), expected);
    }

    #[rstest]
    #[case("Iron.Man.2008.MULTi.VF.1080p.BluRay.x264-BDHD")]
    #[case("The_Thing (1982) [Remastered] h.264")]
    #[case("[Alien]")]
    #[case("[a [nested] title]")]
    #[case("2012.1080p")]
    #[case("(2019) ( ) ..__--")]
    #[case("Amélie.2001.FRENCH.DVDRip")]
    #[case("Blade.Runner.2049.2017.1080p")]
    #[case("Some.Movie.1999.2000.2001.720p")]
    #[case("1080p.2010.BluRay")]
    #[case("2001.A.Space.Odyssey.1968")]
    fn is_idempotent(#[case] input: &str) {
        let once = normalize(input);
        assert_eq!(normalize(once.as_str()), once);
    }

    #[test]
    fn custom_tokens_replace_defaults() {
        let normalizer = Normalizer::with_tokens(["Director's", "CUT"]);
        assert_eq!(normalizer.normalize("Heat.Director's.Cut.BluRay.1995.1080p").as_str(), "heat bluray");
    }

    #[test]
    fn title_tokens() {
        let title = normalize("Blade.Runner.1982.720p");
        assert_eq!(title.tokens().collect::<Vec<_>>(), ["blade", "runner"]);
        assert_eq!(title.len(), 12);
    }
}
