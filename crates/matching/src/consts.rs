use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// "h.264", "x.265" and friends, so the dot isn't treated as a separator.
regex!(DOTTED_CODEC_REGEX, r"\b([hx])\.(26[45])\b");
regex!(BRACKETED_REGEX, r"\[[^\[\]]*\]|\([^()]*\)|\{[^{}]*\}");
regex!(STRAY_BRACKET_REGEX, r"[\[\](){}]");
regex!(SEPARATOR_REGEX, r"[._\-\s]+");
regex!(YEAR_REGEX, r"^(?:19|20)\d{2}$");
regex!(RESOLUTION_REGEX, r"^\d{3,4}[pi]$");

/// Tokens that describe a release rather than the movie in it.
pub const IGNORED_TOKENS: &[&str] = &[
    // Source
    "bluray", "bdrip", "brrip", "bdremux", "remux", "webrip", "web", "dl", "webdl", "hdrip", "dvdrip", "dvd",
    "dvdscr", "hdtv", "hdcam", "cam", "uhd", "4k",
    // Video
    "x264", "x265", "h264", "h265", "hevc", "avc", "xvid", "divx", "10bit", "8bit", "hdr", "hdr10", "sdr",
    // Audio
    "aac", "ac3", "eac3", "dts", "dtshd", "truehd", "atmos", "flac", "mp3", "ddp5", "dd5",
    // Language
    "multi", "vf", "vff", "vfq", "vo", "vost", "vostfr", "french", "truefrench", "english", "subbed", "dubbed",
    // Release
    "proper", "repack", "extended", "unrated", "remastered", "limited", "internal", "imax", "yify", "yts",
    "rarbg", "sparks", "fgt", "axxo", "etrg", "evo",
];
