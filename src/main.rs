//! Line-oriented driver for the search runtime.
//!
//! Reads commands from stdin, turns them into orchestrator events, and prints
//! the view model whenever it changes. Responses are consumed as they arrive,
//! so a new search can be typed while an older one is still in flight.
//!
//! ```text
//! ┌──────────────┐  commands   ┌───────────────┐  requests  ┌──────────────┐
//! │ stdin lines  │ ──────────▶ │ SearchRuntime │ ─────────▶ │ HTTP client  │
//! └──────────────┘             └───────────────┘ ◀───────── └──────────────┘
//!                                     │           responses
//!                                     ▼
//!                               stdout summary
//! ```
//!
//! # Usage
//!
//! ```text
//! reelsearch [CONFIG.toml] [key=value ...]
//! ```
//!
//! The config path may also come from `REELSEARCH_CONFIG`. Without one the
//! defaults apply. `key=value` arguments (`api_url=...`, `trace_level=debug`)
//! come next, then `REELSEARCH_API_URL` and `REELSEARCH_TRACE_LEVEL`.
//!
//! # Commands
//!
//! - `search <text>`: new search, refinements cleared
//! - `type [value]`, `year [value]`: set or clear a refinement
//! - `clear`: clear both refinements
//! - `page <n>`: move to page `n`
//! - `?q=...` or any `key=value` text: navigate to that location
//! - `details <imdb id>`: fetch one title
//! - `popular`: list the service's popular titles
//! - `show`: print the current view
//! - `quit`: exit

use reelsearch::domain::{CanonicalMovieDetails, CanonicalMovieSummary};
use reelsearch::infrastructure::expand_tilde;
use reelsearch::observability::init_tracing;
use reelsearch::worker::WorkerResponse;
use reelsearch::{initialize, Config, Event, Result, SearchRuntime, SearchViewModel};
use std::collections::BTreeMap;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "REELSEARCH_CONFIG";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Event(Event),
    Details(String),
    Popular,
    Show,
    Help,
    Quit,
    Unknown(String),
}

enum Input {
    Line(Option<String>),
    Response(Option<WorkerResponse>),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = load_config()?;
    let _guard = init_tracing(&config);
    tracing::debug!(api_url = %config.api_url, "configuration resolved");

    let mut runtime = initialize(&config)?;
    runtime.dispatch(Event::navigate(""))?;
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let input = tokio::select! {
            line = lines.next_line() => Input::Line(line?),
            response = runtime.next_response(), if runtime.in_flight() > 0 => Input::Response(response?),
        };

        match input {
            Input::Line(None) => break,
            Input::Line(Some(line)) => {
                let Some(command) = parse_command(&line) else {
                    continue;
                };
                if !run_command(&mut runtime, command)? {
                    break;
                }
            }
            Input::Response(Some(WorkerResponse::DetailsLoaded { details, .. })) => {
                print_details(&details);
            }
            Input::Response(Some(WorkerResponse::PopularLoaded { movies })) => {
                println!("== Popular movies");
                print_movies(&movies);
            }
            Input::Response(Some(WorkerResponse::Error { message })) => {
                println!("Error: {message}");
            }
            Input::Response(Some(WorkerResponse::SearchCompleted { .. })) => {
                print_view(&runtime.viewmodel());
            }
            Input::Response(None) => {}
        }
    }

    let state = runtime.shutdown();
    tracing::debug!(location = %state.location, "exiting");
    Ok(())
}

fn load_config() -> Result<Config> {
    let (path, overrides) = split_args(std::env::args().skip(1));
    let path = path
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .filter(|p| !p.trim().is_empty());

    let config = match path {
        Some(path) => Config::from_file(expand_tilde(path.trim()))?.with_map_overrides(&overrides),
        None => Config::from_map(&overrides),
    };
    config.with_env_overrides().validate()
}

/// Splits arguments into an optional config path and `key=value` overrides.
/// The first argument without `=` is the path; later bare arguments are ignored.
fn split_args(args: impl IntoIterator<Item = String>) -> (Option<String>, BTreeMap<String, String>) {
    let mut path = None;
    let mut overrides = BTreeMap::new();

    for arg in args {
        match arg.split_once('=') {
            Some((key, value)) => {
                overrides.insert(key.trim().to_string(), value.trim().to_string());
            }
            None if path.is_none() => path = Some(arg),
            None => eprintln!("reelsearch: ignoring extra argument {arg:?}"),
        }
    }
    (path, overrides)
}

/// Executes one command. Returns `false` when the driver should exit.
fn run_command(runtime: &mut SearchRuntime, command: Command) -> Result<bool> {
    match command {
        Command::Event(event) => {
            if runtime.dispatch(event)? {
                print_view(&runtime.viewmodel());
            }
        }
        Command::Details(imdb_id) => runtime.request_details(imdb_id),
        Command::Popular => runtime.request_popular(),
        Command::Show => print_view(&runtime.viewmodel()),
        Command::Help => print_help(),
        Command::Quit => return Ok(false),
        Command::Unknown(word) => println!("Unknown command: {word} (try `help`)"),
    }
    Ok(true)
}

/// Parses one input line. Blank lines yield `None`.
fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line.starts_with('?') || line.contains('=') {
        return Some(Command::Event(Event::navigate(line)));
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word {
        "search" | "s" => Command::Event(Event::SubmitQuery(rest.to_string())),
        "type" | "t" => Command::Event(Event::SetTypeFilter(rest.to_string())),
        "year" | "y" => Command::Event(Event::SetYearFilter(rest.to_string())),
        "clear" => Command::Event(Event::ClearFilters),
        "page" | "p" => match rest.parse::<u32>() {
            Ok(page) if page >= 1 => Command::Event(Event::SetPage(page)),
            _ => Command::Unknown(line.to_string()),
        },
        "details" | "d" if !rest.is_empty() => Command::Details(rest.to_string()),
        "popular" => Command::Popular,
        "show" => Command::Show,
        "help" | "h" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(word.to_string()),
    };
    Some(command)
}

fn print_view(view: &SearchViewModel) {
    println!("== {} [{}]", view.heading, view.status);
    if let Some(summary) = &view.summary {
        println!("{summary}");
    }
    print_movies(&view.items);
}

fn print_movies(movies: &[CanonicalMovieSummary]) {
    for movie in movies {
        println!(
            "  {:<40} {:<6} {:<8} {}",
            movie.title.as_deref().unwrap_or("Untitled"),
            movie.year.as_deref().unwrap_or("-"),
            movie.kind.as_deref().unwrap_or("-"),
            movie.imdb_id.as_deref().unwrap_or("-"),
        );
    }
}

fn print_details(details: &CanonicalMovieDetails) {
    let summary = &details.summary;
    println!(
        "== {} ({})",
        summary.title.as_deref().unwrap_or("Untitled"),
        summary.year.as_deref().unwrap_or("-")
    );
    let fields = [
        ("Rated", &details.rated),
        ("Runtime", &details.runtime),
        ("Genre", &details.genre),
        ("Director", &details.director),
        ("Actors", &details.actors),
        ("Plot", &details.plot),
        ("Rating", &summary.imdb_rating),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {label:<9} {value}");
        }
    }
}

fn print_help() {
    println!("Commands: search <text> | type [v] | year [v] | clear | page <n> | ?q=... | details <id> | popular | show | quit");
}
