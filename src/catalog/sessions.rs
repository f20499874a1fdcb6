use regex::Regex;

/// Reads the selectable session labels ("2019 Fall", "2020 Spring", ...) from the class
/// search input page, in page order, keeping at most `limit` of them.
pub fn read_sessions(html: &str, limit: usize) -> Vec<String> {
    lazy_static! {
        // option value is the 4 digit session code, the visible text is "<year> <term>"
        static ref RE_SESSION_OPTION: Regex = Regex::new(r#""([0-9]{4})".*>([0-9]{4} \w+)"#).unwrap();
    }

    let sessions: Vec<String> = RE_SESSION_OPTION.captures_iter(html)
        .filter_map(|x| x.get(2))
        .map(|label| label.as_str().to_owned())
        .take(limit)
        .collect();

    if sessions.is_empty() {
        warn!("No session labels found in search input page.");
    }

    sessions
}

#[cfg(test)]
const TEST_INPUT_PAGE: &str = r#"<select name="searchCriteria.term" id="term">
<option value="0985">2019 Fall</option>
<option value="0990" selected="selected">2020 Spring</option>
<option value="0995">2020 Summer</option>
<option value="1000">2020 Fall</option>
<option value="1005">2021 Spring</option>
<option value="1010">2021 Summer</option>
</select>"#;

#[test]
fn test_read_sessions() {
    let sessions = read_sessions(TEST_INPUT_PAGE, 5);
    assert_eq!(sessions, vec!["2019 Fall", "2020 Spring", "2020 Summer", "2020 Fall", "2021 Spring"]);
}

#[test]
fn test_read_sessions_under_limit() {
    assert_eq!(read_sessions(TEST_INPUT_PAGE, 2), vec!["2019 Fall", "2020 Spring"]);
    assert_eq!(read_sessions(TEST_INPUT_PAGE, 10).len(), 6);
}

#[test]
fn test_read_sessions_none() {
    assert!(read_sessions("<html><body>maintenance</body></html>", 5).is_empty());
    assert!(read_sessions(r#"<option value="12">2019 Fall</option>"#, 5).is_empty());
}
