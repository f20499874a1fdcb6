use std::fmt;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;

const DEFAULT_RELAY: &str = "https://cors-anywhere.herokuapp.com/";
const DEFAULT_SEARCH_URL: &str = "https://acad.app.vanderbilt.edu/more/SearchClassesExecute!search.action";
const DEFAULT_SESSIONS_URL: &str = "https://acad.app.vanderbilt.edu/more/SearchClasses!input.action";
const DEFAULT_SESSION_LIMIT: usize = 5;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    pub relay: String,        // prefixed to every url, may be empty
    pub search_url: String,
    pub sessions_url: String,
    pub session_limit: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            relay: DEFAULT_RELAY.to_owned(),
            search_url: DEFAULT_SEARCH_URL.to_owned(),
            sessions_url: DEFAULT_SESSIONS_URL.to_owned(),
            session_limit: DEFAULT_SESSION_LIMIT,
        }
    }
}

impl CatalogConfig {
    /// Search url for one course, e.g. subject "CS" and course "1101".
    pub fn course_search_url(&self, subject: &str, course: &str) -> String {
        format!(
            "{relay}{base}?keywords={subject}%20{course}",
            relay=self.relay,
            base=self.search_url,
            subject=utf8_percent_encode(subject.trim(), NON_ALPHANUMERIC),
            course=utf8_percent_encode(course.trim(), NON_ALPHANUMERIC)
        )
    }

    pub fn sessions_url(&self) -> String {
        format!("{}{}", self.relay, self.sessions_url)
    }
}

/// CSS selectors locating result blocks and their rows on the search page.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    pub block: String,
    pub label: String,    // looked up inside a block
    pub row: String,
    pub cell: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            block: "table.classTable".to_owned(),
            label: "caption".to_owned(),
            row: "tr".to_owned(),
            cell: "td".to_owned(),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug)]
pub enum ConfigError {
    Read(String, std::io::Error),
    Parse(String, toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ConfigError::Read(path, e) => write!(f, "Failed to read configuration `{}`: {}", path, e),
            ConfigError::Parse(path, e) => write!(f, "Failed to parse configuration TOML `{}`: {}", path, e),
        }
    }
}

pub fn parse_config(text: &str, path: &str) -> Result<Config, ConfigError> {
    toml::from_str(text).map_err(|e| ConfigError::Parse(path.to_owned(), e))
}

/// Loads the configuration file. A missing file is fine and gives the built-in defaults;
/// a file that exists but can't be read or parsed is an error.
pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => parse_config(&text, path),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No configuration at {}, using defaults.", path);
            Ok(Config::default())
        },
        Err(e) => Err(ConfigError::Read(path.to_owned(), e)),
    }
}

#[test]
fn test_course_search_url() {
    let config = CatalogConfig::default();
    assert_eq!(
        config.course_search_url("CS", "1101"),
        "https://cors-anywhere.herokuapp.com/https://acad.app.vanderbilt.edu/more/SearchClassesExecute!search.action?keywords=CS%201101"
    );

    let direct = CatalogConfig { relay: String::new(), ..CatalogConfig::default() };
    assert_eq!(
        direct.course_search_url(" MATH ", "2300&x"),
        "https://acad.app.vanderbilt.edu/more/SearchClassesExecute!search.action?keywords=MATH%202300%26x"
    );
}

#[test]
fn test_sessions_url() {
    assert_eq!(
        CatalogConfig::default().sessions_url(),
        "https://cors-anywhere.herokuapp.com/https://acad.app.vanderbilt.edu/more/SearchClasses!input.action"
    );
}

#[test]
fn test_partial_config() {
    let config = parse_config(r#"
        [catalog]
        relay = ""
        session_limit = 3

        [layout]
        block = "div.classTable table"
    "#, "inline").unwrap();

    assert_eq!(config.catalog.relay, "");
    assert_eq!(config.catalog.session_limit, 3);
    assert_eq!(config.catalog.search_url, DEFAULT_SEARCH_URL);
    assert_eq!(config.layout.block, "div.classTable table");
    assert_eq!(config.layout.cell, "td");
}

#[test]
fn test_empty_config_is_default() {
    assert_eq!(parse_config("", "inline").unwrap(), Config::default());
}

#[test]
fn test_bad_config() {
    match parse_config("[catalog]\nsession_limit = \"five\"", "inline") {
        Err(ConfigError::Parse(path, _)) => assert_eq!(path, "inline"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_missing_config_file() {
    assert_eq!(load_config("config/does-not-exist.toml").unwrap(), Config::default());
}

#[test]
fn test_shipped_config() {
    assert_eq!(load_config("config/catalog.toml").unwrap(), Config::default());
}
