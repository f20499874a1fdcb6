use std::fmt;
use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

pub static ALL_WEEKDAYS: [Weekday; 5] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
];

impl Weekday {
    pub fn bit(self) -> u8 {
        match self {
            Weekday::Monday => 0b00001,
            Weekday::Tuesday => 0b00010,
            Weekday::Wednesday => 0b00100,
            Weekday::Thursday => 0b01000,
            Weekday::Friday => 0b10000,
        }
    }

    /// Catalog day letter. Thursday is "R" so it doesn't collide with Tuesday.
    pub fn letter(self) -> char {
        match self {
            Weekday::Monday => 'M',
            Weekday::Tuesday => 'T',
            Weekday::Wednesday => 'W',
            Weekday::Thursday => 'R',
            Weekday::Friday => 'F',
        }
    }

    pub fn from_letter(letter: char) -> Option<Weekday> {
        match letter {
            'M' => Some(Weekday::Monday),
            'T' => Some(Weekday::Tuesday),
            'W' => Some(Weekday::Wednesday),
            'R' => Some(Weekday::Thursday),
            'F' => Some(Weekday::Friday),
            _ => None,
        }
    }
}

/// Set of weekdays a block meets on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Weekdays(u8);

impl Weekdays {
    pub fn empty() -> Weekdays {
        Weekdays(0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn with(self, day: Weekday) -> Weekdays {
        Weekdays(self.0 | day.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        ALL_WEEKDAYS.iter().cloned().filter(move |day| self.contains(*day))
    }
}

/// Builds a weekday set from catalog day letters, e.g. "MWF" or "TR".
/// Unknown characters are ignored and repeated letters count once.
pub fn parse_weekdays(text: &str) -> Weekdays {
    text.chars()
        .filter_map(Weekday::from_letter)
        .fold(Weekdays::empty(), Weekdays::with)
}

impl Display for Weekdays {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        for day in self.iter() {
            write!(f, "{}", day.letter())?;
        }
        Ok(())
    }
}

impl Serialize for Weekdays {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer {
            serializer.collect_str(self)
        }
}

#[test]
fn test_parse_weekdays() {
    let mwf = parse_weekdays("MWF");
    assert!(mwf.contains(Weekday::Monday));
    assert!(mwf.contains(Weekday::Wednesday));
    assert!(mwf.contains(Weekday::Friday));
    assert!(!mwf.contains(Weekday::Tuesday));
    assert!(!mwf.contains(Weekday::Thursday));
    assert_eq!(mwf, Weekdays(0b10101));

    let tr = parse_weekdays("TR");
    assert_eq!(tr, Weekdays(0b01010));
    assert_eq!(tr.to_string(), "TR");
}

#[test]
fn test_repeated_letters_are_idempotent() {
    assert_eq!(parse_weekdays("MWF"), parse_weekdays("MMWWFF"));
    assert_eq!(parse_weekdays("T"), parse_weekdays("TTTTTTTT"));
    assert_eq!(parse_weekdays("RRRR"), Weekdays(Weekday::Thursday.bit()));
}

#[test]
fn test_unrecognized_letters_ignored() {
    assert_eq!(parse_weekdays("M-W F"), parse_weekdays("MWF"));
    assert_eq!(parse_weekdays("xMyRz"), parse_weekdays("MR"));
    assert!(parse_weekdays("").is_empty());
    assert!(parse_weekdays("SU").is_empty());
}

#[test]
fn test_weekdays_display_order() {
    assert_eq!(parse_weekdays("FWM").to_string(), "MWF");
    assert_eq!(Weekdays::empty().to_string(), "");
}
