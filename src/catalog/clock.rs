use chrono::NaiveTime;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Width of the canonical token, "09:30a".
pub const TOKEN_WIDTH: usize = 6;
/// Width of the colon-less token some rows still use, "0930a".
pub const SHORT_TOKEN_WIDTH: usize = 5;

/// Meeting time as read from the catalog. Unparseable cells stay `Invalid` so the
/// grouper can drop the block explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTime {
    Valid(NaiveTime),
    Invalid,
}

impl ClockTime {
    pub fn is_valid(&self) -> bool {
        match self {
            ClockTime::Valid(_) => true,
            ClockTime::Invalid => false,
        }
    }
}

impl Serialize for ClockTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer {
            match self {
                ClockTime::Valid(t) => serializer.collect_str(&t.format("%H:%M")),
                ClockTime::Invalid => serializer.serialize_none(),
            }
        }
}

/// Normalizes a catalog time token such as "09:30a", "0930a" or "0145p" to a 24-hour time.
///
/// Anything other than 'a'/'A' as the trailing letter is read as PM. An hour of "12" is
/// never shifted: "1200p" is noon and "1200a" is also taken as 12:00, since the catalog
/// has no way to write midnight. A PM shift that runs past the end of the day is invalid.
pub fn normalize_time(token: &str) -> ClockTime {
    lazy_static! {
        static ref RE_CLOCK_TOKEN: Regex = Regex::new(r"^(?P<hour>[0-9]{2}):?(?P<minute>[0-9]{2})(?P<meridiem>.)$").unwrap();
    }

    let width = token.chars().count();
    if width != TOKEN_WIDTH && width != SHORT_TOKEN_WIDTH {
        return ClockTime::Invalid;
    }

    let captures = match RE_CLOCK_TOKEN.captures(token) {
        Some(x) => x,
        None => return ClockTime::Invalid,
    };

    let hour_text = &captures["hour"];
    let is_morning = captures["meridiem"].eq_ignore_ascii_case("a");

    // both groups are exactly two ascii digits, so these parses cannot fail
    let mut hour = hour_text.parse::<u32>().unwrap_or(0);
    let minute = captures["minute"].parse::<u32>().unwrap_or(0);

    if !is_morning && hour_text != "12" {
        hour += 12;
    }

    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(t) => ClockTime::Valid(t),
        None => ClockTime::Invalid,
    }
}

#[cfg(test)]
fn hm(hour: u32, minute: u32) -> ClockTime {
    ClockTime::Valid(NaiveTime::from_hms_opt(hour, minute, 0).unwrap())
}

#[test]
fn test_normalize_short_tokens() {
    assert_eq!(normalize_time("0900a"), hm(9, 0));
    assert_eq!(normalize_time("0950a"), hm(9, 50));
    assert_eq!(normalize_time("0100p"), hm(13, 0));
    assert_eq!(normalize_time("0250P"), hm(14, 50));
    assert_eq!(normalize_time("1145A"), hm(11, 45));
}

#[test]
fn test_normalize_canonical_tokens() {
    assert_eq!(normalize_time("09:30a"), hm(9, 30));
    assert_eq!(normalize_time("04:10p"), hm(16, 10));
    assert_eq!(normalize_time("12:15p"), hm(12, 15));
}

#[test]
fn test_twelve_oclock_edge() {
    assert_eq!(normalize_time("1200p"), hm(12, 0));
    assert_eq!(normalize_time("1230p"), hm(12, 30));
    // midnight cannot be expressed, "12xxa" is taken literally
    assert_eq!(normalize_time("1200a"), hm(12, 0));
    assert_eq!(normalize_time("12:00a"), hm(12, 0));
}

#[test]
fn test_any_other_letter_is_pm() {
    assert_eq!(normalize_time("0300x"), hm(15, 0));
    assert_eq!(normalize_time("0300m"), hm(15, 0));
}

#[test]
fn test_bad_widths_are_invalid() {
    assert_eq!(normalize_time("0900"), ClockTime::Invalid);
    assert_eq!(normalize_time("09:00am"), ClockTime::Invalid);
    assert_eq!(normalize_time(""), ClockTime::Invalid);
    assert_eq!(normalize_time("TBA"), ClockTime::Invalid);
}

#[test]
fn test_bad_contents_are_invalid() {
    assert_eq!(normalize_time("09-00a"), ClockTime::Invalid);
    assert_eq!(normalize_time("ab:cda"), ClockTime::Invalid);
    assert_eq!(normalize_time("0965a"), ClockTime::Invalid);
    assert_eq!(normalize_time("1300p"), ClockTime::Invalid);
    assert_eq!(normalize_time("2500a"), ClockTime::Invalid);
}
