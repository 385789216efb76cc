use crate::error::{Error, ErrorKind};
use std::fmt;
use std::str::FromStr;

/// A point in (or length of) a movie, in whole seconds.
///
/// Parses from `SS`, `MM:SS` or `HH:MM:SS`. The leading component is
/// unbounded (`"90:00"` is an hour and a half); the ones after it must be
/// below 60. Displays as `HH:MM:SS`, which is also what ffmpeg accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);
impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const fn from_secs(seconds: u64) -> Self {
        Self(seconds)
    }

    pub const fn as_secs(&self) -> u64 {
        self.0
    }

    pub const fn hours(&self) -> u64 {
        self.0 / 3600
    }

    pub const fn minutes(&self) -> u64 {
        self.0 % 3600 / 60
    }

    pub const fn seconds(&self) -> u64 {
        self.0 % 60
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// File-name friendly form, such as `01h23m45s`.
    pub fn label(&self) -> String {
        format!("{:02}h{:02}m{:02}s", self.hours(), self.minutes(), self.seconds())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours(), self.minutes(), self.seconds())
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ErrorKind::InvalidTimestamp(value.to_string());
        let parts = value
            .trim()
            .split(':')
            .map(|part| part.bytes().all(|b| b.is_ascii_digit()).then(|| part.parse::<u64>().ok()).flatten())
            .collect::<Option<Vec<u64>>>()
            .ok_or_else(invalid)?;
        let total = match *parts.as_slice() {
            [seconds] => Some(seconds),
            [minutes, seconds] if seconds < 60 => minutes.checked_mul(60).and_then(|m| m.checked_add(seconds)),
            [hours, minutes, seconds] if minutes < 60 && seconds < 60 => {
                hours.checked_mul(3600).and_then(|h| h.checked_add(minutes * 60 + seconds))
            },
            _ => None,
        };
        total.map(Self).ok_or_else(|| invalid().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", 0)]
    #[case("90", 90)]
    #[case("1:30", 90)]
    #[case("01:02:03", 3723)]
    #[case(" 1:23:45 ", 5025)]
    #[case("90:00", 5400)]
    #[case("100:00:00", 360_000)]
    #[case("00:00", 0)]
    fn parses(#[case] input: &str, #[case] seconds: u64) {
        assert_eq!(input.parse::<Timestamp>().unwrap().as_secs(), seconds);
    }

    #[rstest]
    #[case("")]
    #[case("1:2:3:4")]
    #[case("1:")]
    #[case(":30")]
    #[case("-5")]
    #[case("+5")]
    #[case("1.5")]
    #[case("1:60")]
    #[case("1:60:00")]
    #[case("ten")]
    #[case("99999999999999999999")]
    fn rejects(#[case] input: &str) {
        let err = input.parse::<Timestamp>().unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidTimestamp(raw) if raw == input));
    }

    #[rstest]
    #[case(0, "00:00:00", "00h00m00s")]
    #[case(5025, "01:23:45", "01h23m45s")]
    #[case(5055, "01:24:15", "01h24m15s")]
    #[case(360_000, "100:00:00", "100h00m00s")]
    fn formats(#[case] seconds: u64, #[case] display: &str, #[case] label: &str) {
        let timestamp = Timestamp::from_secs(seconds);
        assert_eq!(timestamp.to_string(), display);
        assert_eq!(timestamp.label(), label);
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert_eq!(Timestamp::from_secs(1).checked_add(Timestamp::from_secs(2)), Some(Timestamp::from_secs(3)));
        assert_eq!(Timestamp::from_secs(u64::MAX).checked_add(Timestamp::from_secs(1)), None);
    }
}
