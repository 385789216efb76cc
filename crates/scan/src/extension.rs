use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

/// Extensions recognized as movie files when nothing else is configured.
pub const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi", "mov", "wmv", "flv", "webm", "m2ts"];

/// A normalized set of file extensions.
///
/// Entries are lowercased, stripped of any leading dot, sorted and
/// deduplicated, so `[".MKV", "mp4"]` and `["mp4", "mkv"]` compare equal. The
/// cache relies on this when deciding whether a snapshot was built with the
/// same configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ExtensionSet(Vec<String>);
impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut extensions: Vec<String> = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        extensions.sort();
        extensions.dedup();
        Self(extensions)
    }

    /// The default set of video container extensions.
    pub fn video() -> Self {
        Self::new(VIDEO_EXTENSIONS)
    }

    /// Case-insensitive check of the path's final extension.
    pub fn matches(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.0.binary_search(&ext.to_lowercase()).is_ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl<S: AsRef<str>> FromIterator<S> for ExtensionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
impl Display for ExtensionSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let dotted: Vec<String> = self.0.iter().map(|ext| format!(".{ext}")).collect();
        write!(f, "{}", dotted.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn normalizes_spelling_and_order() {
        let a = ExtensionSet::new([".MKV", "mp4", " .Mp4 "]);
        let b = ExtensionSet::new(["mp4", "mkv"]);
        assert_eq!(a, b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec!["mkv", "mp4"]);
    }

    #[test]
    fn blank_entries_are_dropped() {
        assert!(ExtensionSet::new(["", ".", "  "]).is_empty());
    }

    #[rstest]
    #[case("Alien.1979.mkv", true)]
    #[case("ALIEN.1979.MKV", true)]
    #[case("movies/Heat (1995)/heat.m2ts", true)]
    #[case("subs/Alien.1979.srt", false)]
    #[case("mkv", false)]
    #[case("archive.mkv.part", false)]
    fn matches_final_extension(#[case] path: &str, #[case] expected: bool) {
        assert_eq!(ExtensionSet::video().matches(path), expected);
    }

    #[test]
    fn display_lists_dotted_extensions() {
        assert_eq!(ExtensionSet::new(["mp4", "mkv"]).to_string(), ".mkv, .mp4");
    }
}
