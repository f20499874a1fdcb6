use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

use serde::Serialize;

pub mod clock;
pub mod grouping;
pub mod page;
pub mod rows;
pub mod sessions;
pub mod weekdays;

pub use clock::ClockTime;
pub use weekdays::Weekdays;

/// Activity label the catalog uses for waitlist placeholder rows. These never carry real meetings.
pub const WAITING_LIST_ACTIVITY: &str = "Waiting List";

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Available,
    Full,
    Unknown,
}

impl Status {
    /// Reads the leading token of a status cell, e.g. "Open (3 seats)" or "Closed".
    pub fn from_cell(cell: &str) -> Status {
        let token = cell.trim().split(' ').next().unwrap_or("");

        match token.to_lowercase().as_ref() {
            "open" | "available" => Status::Available,
            "closed" | "full" => Status::Full,
            _ => Status::Unknown,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Status::Available => write!(f, "Available"),
            Status::Full => write!(f, "Full"),
            Status::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One weekly recurring meeting interval.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimeBlock {
    pub days: Weekdays,
    pub begin_time: ClockTime,
    pub end_time: ClockTime,
}

impl TimeBlock {
    pub fn new(days: Weekdays, begin_time: ClockTime, end_time: ClockTime) -> TimeBlock {
        TimeBlock { days, begin_time, end_time }
    }

    /// A block is usable when it meets on at least one day and both ends parsed.
    pub fn is_valid(&self) -> bool {
        !self.days.is_empty() && self.begin_time.is_valid() && self.end_time.is_valid()
    }
}

/// Subactivity sections keyed by activity name ("Laboratory", "Tutorial", ...).
///
/// This is a shared handle: the grouper's backfill step hands the same map to several
/// sections, so a change made through one section is seen by all of them. Keep that in
/// mind before mutating a map after grouping.
pub type Subactivities = Rc<RefCell<HashMap<String, Vec<Section>>>>;

pub fn new_subactivities() -> Subactivities {
    Rc::new(RefCell::new(HashMap::new()))
}

/// One scheduled offering of a course.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Section {
    pub status: Status,
    pub section_name: String,
    pub activity: String,
    pub length: String,
    pub instructor: String,
    pub times: Vec<TimeBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subactivities: Option<Subactivities>,
}

impl Section {
    /// The first meeting block decides whether the whole section is usable.
    pub fn has_valid_first_block(&self) -> bool {
        match self.times.first() {
            Some(block) => block.is_valid(),
            None => false,
        }
    }

    pub fn has_subactivities(&self) -> bool {
        match &self.subactivities {
            Some(map) => !map.borrow().is_empty(),
            None => false,
        }
    }
}

/// Sections read from one result block of a page.
#[derive(Serialize, Debug)]
pub struct CourseListing {
    pub label: String,
    pub sections: Vec<Section>,
    pub skipped_rows: usize,
}

#[test]
fn test_status_from_cell() {
    assert_eq!(Status::from_cell("Open"), Status::Available);
    assert_eq!(Status::from_cell("Available 12 seats"), Status::Available);
    assert_eq!(Status::from_cell("  Closed (waitlist)"), Status::Full);
    assert_eq!(Status::from_cell("FULL"), Status::Full);
    assert_eq!(Status::from_cell("Cancelled"), Status::Unknown);
    assert_eq!(Status::from_cell(""), Status::Unknown);
}
