use std::rc::Rc;

use super::{new_subactivities, Section, Subactivities, WAITING_LIST_ACTIVITY};

/// A section is worth showing when it meets at a real time and isn't a waitlist placeholder.
fn is_displayable(section: &Section) -> bool {
    section.activity != WAITING_LIST_ACTIVITY && section.has_valid_first_block()
}

/// Fold state for the anchor scan: the top-level output and the map of the most recent
/// main-activity section.
struct Grouping {
    main_activity: String,
    output: Vec<Section>,
    anchor: Option<Subactivities>,
}

impl Grouping {
    fn new(main_activity: String) -> Grouping {
        Grouping {
            main_activity,
            output: Vec::new(),
            anchor: None,
        }
    }

    fn absorb(mut self, mut section: Section) -> Grouping {
        if section.activity == self.main_activity {
            let children = new_subactivities();
            section.subactivities = Some(Rc::clone(&children));
            self.anchor = Some(children);
            self.output.push(section);
            return self;
        }

        match &self.anchor {
            Some(children) => {
                children.borrow_mut()
                    .entry(section.activity.clone())
                    .or_insert_with(Vec::new)
                    .push(section);
            },
            None => {
                warn!("{} ({}) has no {} section to attach to, skipping", section.section_name, section.activity, self.main_activity);
            }
        }

        self
    }
}

/// Points every anchor without children of its own at the last anchor's map.
///
/// Course blocks often list the shared labs/tutorials only under the final lecture, so the
/// earlier lectures borrow that map. The handle is shared, not copied.
fn backfill(sections: &mut [Section]) {
    let last = match sections.last().and_then(|s| s.subactivities.as_ref()) {
        Some(map) => Rc::clone(map),
        None => return,
    };

    for section in sections.iter_mut() {
        if !section.has_subactivities() {
            section.subactivities = Some(Rc::clone(&last));
        }
    }
}

/// Groups the flat section list of one block into main-activity sections with their
/// subactivities. The activity of the first displayable section is the main activity.
pub fn group_sections(sections: Vec<Section>) -> Vec<Section> {
    let total = sections.len();
    let sections: Vec<Section> = sections.into_iter().filter(is_displayable).collect();

    if sections.len() < total {
        debug!("dropped {} of {} sections without usable meeting times", total - sections.len(), total);
    }

    let main_activity = match sections.first() {
        Some(s) => s.activity.clone(),
        None => return Vec::new(),
    };

    let mut output = sections.into_iter()
        .fold(Grouping::new(main_activity), Grouping::absorb)
        .output;

    backfill(&mut output);

    output
}

#[cfg(test)]
use super::rows::{row, RowAccumulator};

#[cfg(test)]
fn sections_from_rows(rows: &[Vec<String>]) -> Vec<Section> {
    let mut accumulator = RowAccumulator::new("CS101");
    for r in rows {
        accumulator.push_row(r).unwrap();
    }
    accumulator.into_sections()
}

#[test]
fn test_lab_absorbed_into_lecture() {
    let sections = sections_from_rows(&[
        row("01", "Lecture", "MWF", "0900a-0950a"),
        row("", "Lecture", "F", "1000a-1050a"),
        row("01L", "Laboratory", "T", "0100p-0250p"),
    ]);

    let grouped = group_sections(sections);
    assert_eq!(grouped.len(), 1);

    let lecture = &grouped[0];
    assert_eq!(lecture.activity, "Lecture");
    assert_eq!(lecture.times.len(), 2);

    let children = lecture.subactivities.as_ref().unwrap().borrow();
    assert_eq!(children.len(), 1);
    assert_eq!(children["Laboratory"].len(), 1);
    assert_eq!(children["Laboratory"][0].section_name, "CS101-01L");
    assert!(children["Laboratory"][0].subactivities.is_none());
}

#[test]
fn test_waiting_list_only_is_empty() {
    let sections = sections_from_rows(&[row("WL", "Waiting List", "MWF", "0900a-0950a")]);
    assert!(group_sections(sections).is_empty());
}

#[test]
fn test_empty_input() {
    assert!(group_sections(Vec::new()).is_empty());
}

#[test]
fn test_filter_invalid_first_blocks() {
    let sections = sections_from_rows(&[
        row("01", "Lecture", "", "0900a-0950a"),
        row("02", "Lecture", "TR", "TBA"),
        row("03", "Seminar", "W", "0300p-0450p"),
        row("04", "Lecture", "MW", "1100a-1150a"),
    ]);

    let grouped = group_sections(sections);

    // the first displayable section decides the main activity
    assert_eq!(grouped.len(), 1);
    assert_eq!(grouped[0].section_name, "CS101-03");
    assert_eq!(grouped[0].activity, "Seminar");
    assert_eq!(grouped[0].subactivities.as_ref().unwrap().borrow()["Lecture"].len(), 1);
}

#[test]
fn test_subactivities_attach_to_nearest_anchor() {
    let sections = sections_from_rows(&[
        row("01", "Lecture", "MWF", "0900a-0950a"),
        row("01A", "Laboratory", "T", "0100p-0250p"),
        row("01B", "Tutorial", "R", "0100p-0150p"),
        row("02", "Lecture", "MWF", "1000a-1050a"),
        row("02A", "Laboratory", "R", "0300p-0450p"),
        row("02B", "Laboratory", "F", "0300p-0450p"),
    ]);

    let grouped = group_sections(sections);
    assert_eq!(grouped.len(), 2);

    let first = grouped[0].subactivities.as_ref().unwrap();
    let second = grouped[1].subactivities.as_ref().unwrap();
    assert!(!Rc::ptr_eq(first, second));

    assert_eq!(first.borrow()["Laboratory"].len(), 1);
    assert_eq!(first.borrow()["Tutorial"].len(), 1);
    assert_eq!(second.borrow()["Laboratory"].len(), 2);
    assert!(!second.borrow().contains_key("Tutorial"));
}

#[test]
fn test_backfill_shares_last_map() {
    let sections = sections_from_rows(&[
        row("01", "Lecture", "MWF", "0900a-0950a"),
        row("02", "Lecture", "MWF", "1000a-1050a"),
        row("02L", "Laboratory", "T", "0100p-0250p"),
    ]);

    let grouped = group_sections(sections);
    assert_eq!(grouped.len(), 2);

    let a = grouped[0].subactivities.as_ref().unwrap();
    let b = grouped[1].subactivities.as_ref().unwrap();
    assert!(Rc::ptr_eq(a, b));
    assert_eq!(a.borrow()["Laboratory"][0].section_name, "CS101-02L");

    // a change through one section shows up in the other
    let extra = sections_from_rows(&[row("99T", "Tutorial", "F", "0200p-0250p")]);
    a.borrow_mut().insert("Tutorial".to_owned(), extra);
    assert!(b.borrow().contains_key("Tutorial"));
}

#[test]
fn test_backfill_keeps_own_children() {
    let sections = sections_from_rows(&[
        row("01", "Lecture", "MWF", "0900a-0950a"),
        row("01L", "Laboratory", "T", "0100p-0250p"),
        row("02", "Lecture", "MWF", "1000a-1050a"),
        row("03", "Lecture", "MWF", "1100a-1150a"),
        row("03T", "Tutorial", "R", "0100p-0150p"),
    ]);

    let grouped = group_sections(sections);
    assert_eq!(grouped.len(), 3);

    let own = grouped[0].subactivities.as_ref().unwrap();
    let borrowed = grouped[1].subactivities.as_ref().unwrap();
    let last = grouped[2].subactivities.as_ref().unwrap();

    assert!(!Rc::ptr_eq(own, last));
    assert!(Rc::ptr_eq(borrowed, last));
    assert!(own.borrow().contains_key("Laboratory"));
    assert!(borrowed.borrow().contains_key("Tutorial"));
}

#[test]
fn test_anchors_without_any_children() {
    let sections = sections_from_rows(&[
        row("01", "Lecture", "MWF", "0900a-0950a"),
        row("02", "Lecture", "TR", "1000a-1115a"),
    ]);

    let grouped = group_sections(sections);
    assert_eq!(grouped.len(), 2);
    for section in &grouped {
        assert!(section.subactivities.as_ref().unwrap().borrow().is_empty());
    }
}
