use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(BRACKETED_REGEX, r"\[[^\[\]]*\]|\([^()]*\)|\{[^{}]*\}");
regex!(SEPARATOR_REGEX, r"[._\s-]+");
// Where a release name stops describing the movie.
regex!(
    MARKER_REGEX,
    concat!(
        r"(?i)^(?:(?:19|20)\d{2}|\d{3,4}[pi]",
        r"|bluray|bdrip|brrip|web|webrip|webdl|hdtv|hdrip|dvdrip|remux",
        r"|[xh]26[45]|hevc|xvid)$",
    )
);
