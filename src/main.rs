use std::fs;
use std::process;

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

use clap::{Arg, App, ArgMatches};

mod catalog;
use catalog::page::read_results;
use catalog::sessions::read_sessions;

mod config;
use config::{load_config, Config};

mod logger;

fn command_usage<'a, 'b>() -> App<'a, 'b> {
    const DEFAULT_CONFIG: &str = "config/catalog.toml";

    App::new("class-search")
    .author("Matthew Scheffel <matt@dataheck.com>")
    .about("Reads class sections and sessions from saved course catalog search pages")
    .arg(
        Arg::with_name("config")
            .takes_value(true)
            .help("Location of catalog configuration (endpoints and page layout)")
            .default_value(DEFAULT_CONFIG)
    )
    .arg(
        Arg::with_name("results")
            .short("r")
            .long("results")
            .takes_value(true)
            .help("A saved class search result page to read sections from")
    )
    .arg(
        Arg::with_name("label")
            .short("l")
            .long("label")
            .takes_value(true)
            .requires("results")
            .help("Course label used in section names (e.g. \"CS 1101\") instead of the one found in each result block")
    )
    .arg(
        Arg::with_name("sessions")
            .short("s")
            .long("sessions")
            .takes_value(true)
            .help("A saved class search input page to read available sessions from")
    )
    .arg(
        Arg::with_name("url")
            .long("url")
            .takes_value(true)
            .number_of_values(2)
            .value_names(&["SUBJECT", "COURSE"])
            .help("Print the search url for a course, and the session listing url")
    )
    .arg(
        Arg::with_name("verbose")
            .short("v")
            .long("verbose")
            .help("Log row and section level decisions")
    )
}

fn read_page(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read page {} from filesystem: {}", path, e))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| format!("Failed to render output as JSON: {}", e))?;
    println!("{}", text);
    Ok(())
}

fn run(matches: &ArgMatches, config: &Config) -> Result<(), String> {
    if let Some(mut values) = matches.values_of("url") {
        // clap enforces exactly two values
        let subject = values.next().unwrap_or_default();
        let course = values.next().unwrap_or_default();

        println!("{}", config.catalog.course_search_url(subject, course));
        println!("{}", config.catalog.sessions_url());
    }

    if let Some(path) = matches.value_of("sessions") {
        let page = read_page(path)?;
        let sessions = read_sessions(&page, config.catalog.session_limit);
        print_json(&sessions)?;
    }

    if let Some(path) = matches.value_of("results") {
        let page = read_page(path)?;
        let listings = read_results(&page, &config.layout, matches.value_of("label")).map_err(|e| format!("{}: {}", path, e))?;
        print_json(&listings)?;
    }

    Ok(())
}

fn main() {
    let matches = command_usage().get_matches();

    logger::init(if matches.is_present("verbose") { "debug" } else { "info" });

    // clap supplies a default for config
    let config_path = matches.value_of("config").unwrap_or_default();
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            process::exit(2);
        }
    };

    if !(matches.is_present("results") || matches.is_present("sessions") || matches.is_present("url")) {
        eprintln!("Nothing to do: give --results, --sessions or --url. See --help.");
        process::exit(2);
    }

    if let Err(e) = run(&matches, &config) {
        error!("{}", e);
        process::exit(1);
    }
}
