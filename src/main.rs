mod app;
mod calendar;
mod config;
mod format;
mod help;
mod selection;
mod theme;
use crate::app::App;
use crate::calendar::is_weekday;
use crate::config::Config;
use crate::format::DateFormat;
use crate::selection::{DateRange, Outcome, RangeError};
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use serde::Serialize;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{Date, OffsetDateTime};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
static LOG_ENV: &str = "WDPICKER_LOG";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    opts.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('f') | Arg::Long("format") => {
                    opts.date_format = Some(parser.value()?.parse()?);
                }
                Arg::Long("json") => opts.json = true,
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Long("no-mouse") => opts.no_mouse = true,
                Arg::Value(value) if opts.start.is_none() => opts.start = Some(parse_date(value)?),
                Arg::Value(value) if opts.end.is_none() => opts.end = Some(parse_date(value)?),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => opts.run(),
            Command::Help => {
                println!("Usage: wdpicker [<options>] [START [END]]");
                println!();
                println!("Pick a range of weekdays in the terminal and list the weekend dates it");
                println!("spans.  START and END are given as YYYY-MM-DD.");
                println!();
                println!("Options:");
                println!("  -c, --config <FILE>   Read configuration from the given file");
                println!("  -f, --format <FMT>    Date format for output: YYYY-MM-DD (default),");
                println!("                        DD/MM/YYYY, or MM/DD/YYYY");
                println!("      --json            Output the chosen range as JSON");
                println!("      --log-file <FILE> Write logs to the given file");
                println!("      --no-mouse        Do not capture the mouse");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    config: Option<PathBuf>,
    date_format: Option<DateFormat>,
    json: bool,
    log_file: Option<PathBuf>,
    no_mouse: bool,
    start: Option<Date>,
    end: Option<Date>,
}

impl RunOptions {
    fn run(self) -> anyhow::Result<()> {
        let today = OffsetDateTime::now_local()
            .context("failed to determine local date")?
            .date();
        let (mut config, source) = Config::find_and_load(self.config.as_deref())
            .context("failed to load configuration")?;
        if let Some(date_format) = self.date_format {
            config.date_format = date_format;
        }
        if self.log_file.is_some() {
            config.log_file = self.log_file;
        }
        if self.no_mouse {
            config.mouse = false;
        }
        init_logging(config.log_file.as_deref())?;
        if let Some(path) = source {
            tracing::info!(path = %path.display(), "loaded configuration");
        } else {
            tracing::info!("no config file found; using defaults");
        }
        let mut app = App::new(today, config.date_format, config.presets);
        match (self.start, self.end) {
            (Some(start), Some(end)) => app = app.with_range(DateRange::new(start, end)?),
            (Some(start), None) => {
                if !is_weekday(start) {
                    return Err(RangeError::NotAWeekday(start).into());
                }
                app = app.with_pending_start(start);
            }
            _ => (),
        }
        let outcome = with_terminal(config.mouse, |terminal| {
            app.run(terminal).context("error running picker")
        })?;
        if let Some(outcome) = outcome {
            let report = Report::new(&outcome, config.date_format);
            if self.json {
                println!(
                    "{}",
                    serde_json::to_string(&report).context("failed to serialize result")?
                );
            } else {
                print!("{report}");
            }
        }
        Ok(())
    }
}

/// The chosen range as printed once the terminal has been restored
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
struct Report {
    start: String,
    end: String,
    weekends: Vec<String>,
}

impl Report {
    fn new(outcome: &Outcome, date_format: DateFormat) -> Report {
        Report {
            start: date_format.format(outcome.range.start()),
            end: date_format.format(outcome.range.end()),
            weekends: outcome
                .weekends
                .iter()
                .map(|&d| date_format.format(d))
                .collect(),
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} to {}", self.start, self.end)?;
        for d in &self.weekends {
            writeln!(f, "{d}")?;
        }
        Ok(())
    }
}

fn parse_date(value: OsString) -> Result<Date, lexopt::Error> {
    let value = value.string()?;
    DateFormat::YearMonthDay
        .parse(&value)
        .map_err(|e| lexopt::Error::ParsingFailed {
            value,
            error: Box::new(e),
        })
}

/// The terminal belongs to the UI, so logs only go to a file, and only when
/// one is configured
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(mouse: bool, func: F) -> anyhow::Result<T>
where
    F: FnOnce(&mut DefaultTerminal) -> anyhow::Result<T>,
{
    let mut terminal = ratatui::init();
    let r = setup_terminal(&mut terminal, mouse).and_then(|()| func(&mut terminal));
    if mouse {
        // Restore the terminal even if this fails
        if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
            tracing::warn!("failed to disable mouse capture: {e}");
        }
    }
    ratatui::restore();
    r
}

fn setup_terminal(terminal: &mut DefaultTerminal, mouse: bool) -> anyhow::Result<()> {
    terminal.hide_cursor().context("failed to hide cursor")?;
    if mouse {
        execute!(io::stdout(), EnableMouseCapture).context("failed to enable mouse capture")?;
    }
    Ok(())
}
