use std::fmt;
use std::fmt::{Display, Formatter};

use super::clock::{normalize_time, ClockTime};
use super::weekdays::parse_weekdays;
use super::{Section, Status, TimeBlock};

// column layout of a result row
pub const COLUMN_SUFFIX: usize = 0;
pub const COLUMN_LENGTH: usize = 1;
pub const COLUMN_ACTIVITY: usize = 2;
pub const COLUMN_STATUS: usize = 3;
pub const COLUMN_DAYS: usize = 4;
pub const COLUMN_TIME: usize = 5;
pub const COLUMN_INSTRUCTOR: usize = 7;
pub const COLUMN_COUNT: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    MalformedRow { found: usize, expected: usize },
    OrphanContinuation,
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            RowError::MalformedRow { found, expected } => {
                write!(f, "Malformed row: found {} cells, expected at least {}", found, expected)
            },
            RowError::OrphanContinuation => {
                write!(f, "Continuation row appears before any section")
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MappedRow {
    NewSection(Section),
    Continuation(TimeBlock),
}

/// Splits a time-range cell into begin/end tokens.
///
/// The cell holds two equal-width tokens joined by a single separator, "09:00a-09:50a" or
/// "0900a-0950a", so the offsets follow from the cell width alone.
pub fn split_time_range(cell: &str) -> Option<(&str, &str)> {
    let cell = cell.trim();
    if !cell.is_ascii() || cell.len() < 3 || cell.len() % 2 == 0 {
        return None;
    }

    let width = (cell.len() - 1) / 2;
    Some((&cell[..width], &cell[width + 1..]))
}

fn time_block(days_cell: &str, time_cell: &str) -> TimeBlock {
    let days = parse_weekdays(days_cell);

    match split_time_range(time_cell) {
        Some((begin, end)) => TimeBlock::new(days, normalize_time(begin), normalize_time(end)),
        None => TimeBlock::new(days, ClockTime::Invalid, ClockTime::Invalid),
    }
}

fn cell<S: AsRef<str>>(cells: &[S], index: usize) -> &str {
    cells[index].as_ref().trim()
}

/// Maps the cell texts of one result row. `label` is the subject/course prefix of the
/// section name, e.g. "CS 101".
pub fn map_row<S: AsRef<str>>(cells: &[S], label: &str) -> Result<MappedRow, RowError> {
    if cells.len() < COLUMN_COUNT {
        return Err(RowError::MalformedRow { found: cells.len(), expected: COLUMN_COUNT });
    }

    let block = time_block(cell(cells, COLUMN_DAYS), cell(cells, COLUMN_TIME));

    let suffix = cell(cells, COLUMN_SUFFIX);
    if suffix.is_empty() {
        return Ok(MappedRow::Continuation(block));
    }

    let section_name = if label.is_empty() {
        suffix.to_owned()
    } else {
        format!("{}-{}", label, suffix)
    };

    Ok(MappedRow::NewSection(Section {
        status: Status::from_cell(cell(cells, COLUMN_STATUS)),
        section_name,
        activity: cell(cells, COLUMN_ACTIVITY).to_owned(),
        length: cell(cells, COLUMN_LENGTH).to_owned(),
        instructor: cell(cells, COLUMN_INSTRUCTOR).to_owned(),
        times: vec![block],
        subactivities: None,
    }))
}

/// Flat, document-ordered sections of one result block, built row by row.
#[derive(Debug)]
pub struct RowAccumulator {
    label: String,
    sections: Vec<Section>,
    skipped_rows: usize,
}

impl RowAccumulator {
    pub fn new(label: &str) -> RowAccumulator {
        RowAccumulator {
            label: label.to_owned(),
            sections: Vec::new(),
            skipped_rows: 0,
        }
    }

    /// Applies one row. A continuation block only lands on the previous section when it is
    /// usable; the section itself is kept either way.
    pub fn push_row<S: AsRef<str>>(&mut self, cells: &[S]) -> Result<(), RowError> {
        match map_row(cells, &self.label)? {
            MappedRow::NewSection(section) => {
                self.sections.push(section);
            },
            MappedRow::Continuation(block) => {
                let previous = match self.sections.last_mut() {
                    Some(s) => s,
                    None => return Err(RowError::OrphanContinuation),
                };

                if block.is_valid() {
                    previous.times.push(block);
                } else {
                    debug!("{}: dropping unusable continuation block {:?}", previous.section_name, block);
                }
            },
        }

        Ok(())
    }

    /// Same as `push_row`, but malformed rows are logged and counted instead of returned.
    pub fn push_row_or_skip<S: AsRef<str>>(&mut self, cells: &[S]) {
        if let Err(e) = self.push_row(cells) {
            self.skipped_rows += 1;
            warn!("label={} skipping row: {}", self.label, e);
        }
    }

    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}

#[cfg(test)]
pub fn row(suffix: &str, activity: &str, days: &str, time: &str) -> Vec<String> {
    vec![suffix, "Full Term", activity, "Open (4)", days, time, "", "Staff"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn test_split_time_range() {
    assert_eq!(split_time_range("0900a-0950a"), Some(("0900a", "0950a")));
    assert_eq!(split_time_range("09:00a-09:50a"), Some(("09:00a", "09:50a")));
    assert_eq!(split_time_range(" 0100p-0250p "), Some(("0100p", "0250p")));
    assert_eq!(split_time_range("TBA"), Some(("T", "A")));
    assert_eq!(split_time_range("0900a-0950"), None);
    assert_eq!(split_time_range(""), None);
}

#[test]
fn test_map_new_section() {
    let mapped = map_row(&row("01", "Lecture", "MWF", "0900a-0950a"), "CS 101").unwrap();

    match mapped {
        MappedRow::NewSection(section) => {
            assert_eq!(section.section_name, "CS 101-01");
            assert_eq!(section.activity, "Lecture");
            assert_eq!(section.status, Status::Available);
            assert_eq!(section.length, "Full Term");
            assert_eq!(section.instructor, "Staff");
            assert_eq!(section.times.len(), 1);
            assert_eq!(section.times[0].days, parse_weekdays("MWF"));
            assert_eq!(section.times[0].begin_time, normalize_time("0900a"));
            assert_eq!(section.times[0].end_time, normalize_time("0950a"));
            assert!(section.subactivities.is_none());
        },
        other => panic!("expected a new section, got {:?}", other),
    }
}

#[test]
fn test_map_continuation() {
    let mapped = map_row(&row("", "Lecture", "F", "1000a-1050a"), "CS 101").unwrap();
    assert_eq!(
        mapped,
        MappedRow::Continuation(TimeBlock::new(parse_weekdays("F"), normalize_time("1000a"), normalize_time("1050a")))
    );
}

#[test]
fn test_map_short_row() {
    let cells = vec!["01", "Full Term", "Lecture"];
    assert_eq!(map_row(&cells, "CS 101"), Err(RowError::MalformedRow { found: 3, expected: COLUMN_COUNT }));
}

#[test]
fn test_unparseable_time_cell_is_invalid_not_error() {
    let mapped = map_row(&row("02", "Lecture", "TR", "TBA"), "").unwrap();
    match mapped {
        MappedRow::NewSection(section) => {
            assert_eq!(section.section_name, "02");
            assert!(!section.has_valid_first_block());
        },
        other => panic!("expected a new section, got {:?}", other),
    }
}

#[test]
fn test_accumulate_continuation_rows() {
    let mut rows = RowAccumulator::new("CS101");
    rows.push_row(&row("01", "Lecture", "MWF", "0900a-0950a")).unwrap();
    rows.push_row(&row("", "Lecture", "F", "1000a-1050a")).unwrap();
    rows.push_row(&row("01L", "Laboratory", "T", "0100p-0250p")).unwrap();

    let sections = rows.into_sections();
    assert_eq!(sections.len(), 2);

    assert_eq!(sections[0].section_name, "CS101-01");
    assert_eq!(sections[0].activity, "Lecture");
    assert_eq!(sections[0].times.len(), 2);
    assert_eq!(sections[0].times[1].days, parse_weekdays("F"));

    assert_eq!(sections[1].section_name, "CS101-01L");
    assert_eq!(sections[1].activity, "Laboratory");
    assert_eq!(sections[1].times.len(), 1);
    assert_eq!(sections[1].times[0].begin_time, normalize_time("0100p"));
}

#[test]
fn test_orphan_continuation() {
    let mut rows = RowAccumulator::new("CS101");
    assert_eq!(rows.push_row(&row("", "Lecture", "F", "1000a-1050a")), Err(RowError::OrphanContinuation));
    assert!(rows.into_sections().is_empty());
}

#[test]
fn test_invalid_continuation_block_is_dropped() {
    let mut rows = RowAccumulator::new("CS101");
    rows.push_row(&row("01", "Lecture", "MWF", "0900a-0950a")).unwrap();
    rows.push_row(&row("", "Lecture", "", "1000a-1050a")).unwrap();
    rows.push_row(&row("", "Lecture", "R", "TBA")).unwrap();

    let sections = rows.into_sections();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].times.len(), 1);
}

#[test]
fn test_skip_and_count() {
    let mut rows = RowAccumulator::new("CS101");
    rows.push_row_or_skip(&row("", "Lecture", "F", "1000a-1050a"));
    rows.push_row_or_skip(&vec!["only", "two"]);
    rows.push_row_or_skip(&row("01", "Lecture", "MWF", "0900a-0950a"));

    assert_eq!(rows.skipped_rows(), 2);
    assert_eq!(rows.into_sections().len(), 1);
}
