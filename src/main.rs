//! Line-oriented terminal driver.
//!
//! Reads commands from stdin, maps them to [`Event`]s, and prints views and
//! notices. Backend completions and debounce firings are processed while the
//! prompt waits, so filtered results appear once typing pauses.
//!
//! ```text
//! homescout [--config <PATH>] [--api-url <URL>] [--trace-level <DIRECTIVE>]
//!
//! list | all | favs             show filtered, all, or favorite listings
//! filter <key> <value>          set a bound, e.g. `filter min_price 200000`
//! unset <key>                   remove a bound
//! clear                         remove every bound
//! filters                       show the current bounds
//! fav <id>                      toggle a listing's favorite flag
//! settings                      show scraper settings
//! save <hours> <miles> <days>   save scraper settings
//! reload | scrape               reload listings, or scrape then reload
//! quit
//! ```

#![allow(clippy::multiple_crate_versions)]

use std::process::ExitCode;

use chrono::{Local, NaiveDateTime};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use homescout::api::HttpBackend;
use homescout::observability::init_tracing;
use homescout::runtime::Runtime;
use homescout::{initialize, Cli, Event, HomescoutError, PredicateKey, Property, Result, Settings};

const HELP: &str = "commands: list, all, favs, filter <key> <value>, unset <key>, clear, filters, \
fav <id>, settings, save <hours> <miles> <days>, reload, scrape, help, quit";

/// What the user asked for on one input line.
#[derive(Debug, PartialEq)]
enum Command {
    Dispatch(Event),
    Show(View),
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Filtered,
    All,
    Favorites,
    Filters,
    Settings,
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (name, args) {
        ("list", []) => Command::Show(View::Filtered),
        ("all", []) => Command::Show(View::All),
        ("favs", []) => Command::Show(View::Favorites),
        ("filters", []) => Command::Show(View::Filters),
        ("settings", []) => Command::Show(View::Settings),
        ("filter", [key, raw]) => Command::Dispatch(Event::SetFilter {
            key: key.parse::<PredicateKey>()?,
            raw: (*raw).to_string(),
        }),
        ("unset", [key]) => Command::Dispatch(Event::SetFilter {
            key: key.parse::<PredicateKey>()?,
            raw: String::new(),
        }),
        ("clear", []) => Command::Dispatch(Event::ClearFilters),
        ("fav", [id]) => Command::Dispatch(Event::ToggleFavorite { id: (*id).to_string() }),
        ("save", [hours, miles, days]) => Command::Dispatch(Event::SaveSettings {
            settings: Settings {
                update_interval_hours: parse_setting("hours", hours)?,
                search_radius_miles: parse_setting("miles", miles)?,
                search_time_range_days: parse_setting("days", days)?,
            },
        }),
        ("reload", []) => Command::Dispatch(Event::ReloadProperties),
        ("scrape", []) => Command::Dispatch(Event::ManualRefresh),
        ("help", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        _ => {
            return Err(HomescoutError::Validation(format!(
                "unrecognized command '{}'",
                line.trim()
            )))
        }
    };
    Ok(Some(command))
}

fn parse_setting(name: &str, raw: &str) -> Result<u32> {
    raw.parse()
        .map_err(|_| HomescoutError::Validation(format!("{name}: expected a whole number, got '{raw}'")))
}

fn format_property(property: &Property, now: NaiveDateTime) -> String {
    let number = |value: Option<f64>| value.map_or_else(|| "?".to_string(), |v| format!("{v}"));
    let price = property
        .list_price
        .map_or_else(|| "$?".to_string(), |price| format!("${price:.0}"));
    let location = [property.address.as_deref(), property.city.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");

    let mut line = format!(
        "{:<14} {:>10}  {}bd/{}ba  {} sqft  {}",
        property.id,
        price,
        number(property.beds),
        number(property.baths),
        number(property.sqft),
        location
    );
    if property.favorited {
        line.push_str("  [fav]");
    }
    if property.is_stale(now) {
        line.push_str("  [stale]");
    }
    line
}

fn show(runtime: &Runtime<HttpBackend>, view: View) {
    let state = runtime.state();
    let now = Local::now().naive_local();
    let print_all = |properties: &[Property]| {
        for property in properties {
            println!("{}", format_property(property, now));
        }
        println!("({} listings)", properties.len());
    };

    match view {
        View::Filtered => {
            if let Some(error) = state.error() {
                println!("error: {error}");
            }
            if state.is_loading() {
                println!("(loading)");
            }
            print_all(state.filtered());
        }
        View::All => print_all(state.all()),
        View::Favorites => print_all(state.favorites()),
        View::Filters => {
            if state.filters().is_empty() {
                println!("no filters");
            }
            for (key, value) in state.filters().iter() {
                println!("{key} = {value}");
            }
            if state.engine().pending_token().is_some() {
                println!("(update pending)");
            }
        }
        View::Settings => {
            let settings = state.settings();
            println!(
                "update every {}h, radius {} mi, last {} days ({:?})",
                settings.update_interval_hours,
                settings.search_radius_miles,
                settings.search_time_range_days,
                state.settings_source()
            );
        }
    }
}

async fn run() -> Result<()> {
    let config = Cli::parse().load_config()?;
    init_tracing(&config);
    tracing::debug!(api = %config.api_base_url, "session started");

    let mut runtime = Runtime::new(initialize(&config), config.backend()?);
    runtime.dispatch(&Event::Init)?;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(Command::Help)) => println!("{HELP}"),
                    Ok(Some(Command::Show(view))) => show(&runtime, view),
                    Ok(Some(Command::Dispatch(event))) => {
                        if let Err(e) = runtime.dispatch(&event) {
                            println!("error: {e}");
                        }
                    }
                    Err(e) => println!("error: {e}"),
                }
            }
            Some(event) = runtime.next_event(), if runtime.is_busy() => {
                if runtime.dispatch(&event)? && matches!(event, Event::RecomputeDue { .. }) {
                    println!("({} listings match)", runtime.state().filtered().len());
                }
            }
        }

        for notice in runtime.take_notices() {
            println!("{notice}");
        }
    }

    runtime.dispatch(&Event::Shutdown)?;
    tracing::debug!(in_flight = runtime.in_flight(), "session ended");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("homescout: {e}");
            ExitCode::FAILURE
        }
    }
}
