use std::fmt;
use std::fmt::{Display, Formatter};

use scraper::{ElementRef, Html, Selector};

use super::grouping::group_sections;
use super::rows::RowAccumulator;
use super::CourseListing;
use crate::config::LayoutConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    EmptyDocument,
    Selector(String),
}

impl Display for PageError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PageError::EmptyDocument => write!(f, "Result page is empty, there is no markup to read"),
            PageError::Selector(e) => write!(f, "Invalid selector in page layout: {}", e),
        }
    }
}

struct Selectors {
    block: Selector,
    label: Selector,
    row: Selector,
    cell: Selector,
}

fn compile(pattern: &str) -> Result<Selector, PageError> {
    Selector::parse(pattern).map_err(|e| PageError::Selector(format!("`{}`: {:?}", pattern, e)))
}

impl Selectors {
    fn from_layout(layout: &LayoutConfig) -> Result<Selectors, PageError> {
        Ok(Selectors {
            block: compile(&layout.block)?,
            label: compile(&layout.label)?,
            row: compile(&layout.row)?,
            cell: compile(&layout.cell)?,
        })
    }
}

/// Collapses runs of whitespace, including the non-breaking spaces the catalog pads cells with.
fn element_text(element: ElementRef) -> String {
    element.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn read_block(block: ElementRef, selectors: &Selectors, label_override: Option<&str>) -> CourseListing {
    let label = match label_override {
        Some(l) => l.to_owned(),
        None => block.select(&selectors.label).next().map(element_text).unwrap_or_default(),
    };

    if label.is_empty() {
        debug!("result block has no course label, section names will be bare suffixes");
    }

    let mut rows = RowAccumulator::new(&label);

    for row in block.select(&selectors.row) {
        let cells: Vec<String> = row.select(&selectors.cell).map(element_text).collect();

        // header and spacer rows
        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        rows.push_row_or_skip(&cells);
    }

    let skipped_rows = rows.skipped_rows();
    let sections = group_sections(rows.into_sections());

    if sections.is_empty() {
        debug!("label={} no displayable sections in block", label);
    }

    CourseListing { label, sections, skipped_rows }
}

/// Reads every result block of a catalog search page.
///
/// A page without result blocks is not an error and gives an empty list; a blank document
/// is, since it means there was nothing to search in at all.
pub fn read_results(html: &str, layout: &LayoutConfig, label_override: Option<&str>) -> Result<Vec<CourseListing>, PageError> {
    if html.trim().is_empty() {
        return Err(PageError::EmptyDocument);
    }

    let selectors = Selectors::from_layout(layout)?;
    let document = Html::parse_document(html);

    let listings: Vec<CourseListing> = document.select(&selectors.block)
        .map(|block| read_block(block, &selectors, label_override))
        .collect();

    info!(
        "Read {} result blocks, {} sections, {} skipped rows.",
        listings.len(),
        listings.iter().map(|l| l.sections.len()).sum::<usize>(),
        listings.iter().map(|l| l.skipped_rows).sum::<usize>()
    );

    Ok(listings)
}

#[cfg(test)]
const TEST_PAGE: &str = r#"<html><body>
<div class="results">
<table class="classTable">
  <caption>CS 101</caption>
  <tr><th>Section</th><th>Length</th><th>Type</th><th>Status</th><th>Days</th><th>Time</th><th>Room</th><th>Instructor</th></tr>
  <tr><td>01</td><td>Full Term</td><td>Lecture</td><td>Open (12)</td><td>MWF</td><td>09:00a-09:50a</td><td>FGH 100</td><td>Ada Lovelace</td></tr>
  <tr><td></td><td></td><td>Lecture</td><td></td><td>F</td><td>10:00a-10:50a</td><td>FGH 100</td><td></td></tr>
  <tr><td>01L</td><td>Full Term</td><td>Laboratory</td><td>Closed</td><td>T</td><td>01:00p-02:50p</td><td>FGH 201</td><td>Staff</td></tr>
  <tr><td>broken</td><td>row</td></tr>
  <tr><td>WL</td><td>Full Term</td><td>Waiting List</td><td>Open</td><td></td><td></td><td></td><td></td></tr>
</table>
<table class="classTable">
  <caption>  MATH
     2300 </caption>
  <tr><td>01</td><td>Full Term</td><td>Lecture</td><td>Open&nbsp;(3)</td><td>TR</td><td>0100p-0215p</td><td></td><td>Staff</td></tr>
</table>
<table class="classTable">
  <caption>PHIL 100</caption>
  <tr><td>01</td><td>Full Term</td><td>Lecture</td><td>Open</td><td>TBA</td><td>TBA</td><td></td><td>Staff</td></tr>
</table>
</div>
</body></html>"#;

#[cfg(test)]
use super::clock::normalize_time;
#[cfg(test)]
use super::weekdays::parse_weekdays;
#[cfg(test)]
use super::{ClockTime, Status};

#[test]
fn test_read_results() {
    let listings = read_results(TEST_PAGE, &LayoutConfig::default(), None).unwrap();
    assert_eq!(listings.len(), 3);

    let cs = &listings[0];
    assert_eq!(cs.label, "CS 101");
    assert_eq!(cs.skipped_rows, 1);
    assert_eq!(cs.sections.len(), 1);

    let lecture = &cs.sections[0];
    assert_eq!(lecture.section_name, "CS 101-01");
    assert_eq!(lecture.status, Status::Available);
    assert_eq!(lecture.instructor, "Ada Lovelace");
    assert_eq!(lecture.times.len(), 2);
    assert_eq!(lecture.times[1].days, parse_weekdays("F"));

    let children = lecture.subactivities.as_ref().unwrap().borrow();
    let lab = &children["Laboratory"][0];
    assert_eq!(lab.section_name, "CS 101-01L");
    assert_eq!(lab.status, Status::Full);
    assert!(lab.times[0].begin_time.is_valid());
    assert!(!children.contains_key("Waiting List"));

    let math = &listings[1];
    assert_eq!(math.label, "MATH 2300");
    assert_eq!(math.sections[0].section_name, "MATH 2300-01");
    assert_eq!(math.sections[0].status, Status::Available);

    // every row filtered, the block is still reported
    let phil = &listings[2];
    assert_eq!(phil.label, "PHIL 100");
    assert!(phil.sections.is_empty());
}

#[test]
fn test_label_override() {
    let listings = read_results(TEST_PAGE, &LayoutConfig::default(), Some("CS 101A")).unwrap();
    assert_eq!(listings[1].sections[0].section_name, "CS 101A-01");
}

#[test]
fn test_no_blocks_is_empty() {
    let listings = read_results("<html><body><p>No classes found.</p></body></html>", &LayoutConfig::default(), None).unwrap();
    assert!(listings.is_empty());
}

#[test]
fn test_blank_document_is_error() {
    assert_eq!(read_results("  \n ", &LayoutConfig::default(), None).unwrap_err(), PageError::EmptyDocument);
}

#[test]
fn test_bad_selector() {
    let mut layout = LayoutConfig::default();
    layout.block = "table[".to_owned();

    match read_results(TEST_PAGE, &layout, None) {
        Err(PageError::Selector(_)) => {},
        other => panic!("expected selector error, got {:?}", other),
    }
}

#[test]
fn test_twelve_am_is_literal() {
    let page = r#"<table class="classTable"><tr><td>01</td><td></td><td>Lecture</td><td>Open</td><td>MW</td><td>12:00a-12:50a</td><td></td><td></td></tr></table>"#;
    let listings = read_results(page, &LayoutConfig::default(), None).unwrap();

    let block = &listings[0].sections[0].times[0];
    assert_eq!(block.begin_time, normalize_time("1200p"));
    assert_ne!(block.end_time, ClockTime::Invalid);
}
