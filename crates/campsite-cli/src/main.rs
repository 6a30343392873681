//! `campsite` CLI — plan buffer bookings and export calendar reminders.
//!
//! ## Usage
//!
//! ```sh
//! # List the platforms in the bundled rules
//! campsite platforms
//!
//! # Plan a 3-night stay checking out 2025-07-15
//! campsite plan -p recreation_gov -c 2025-07-15 -n 3
//!
//! # Book the platform's maximum stay up front and cancel the extra nights later
//! campsite plan -p recreation_gov -c 2025-07-15 -n 3 --strategy full-buffer
//!
//! # Machine-readable plan
//! campsite plan -p recreation_gov -c 2025-07-15 -n 3 --json
//!
//! # Write the booking reminder as an all-day event
//! campsite ics -p recreation_gov -c 2025-07-15 -n 3 -r booking -o book.ics
//!
//! # Timed cancel reminder at the platform's open time, into a directory
//! campsite ics -p recreation_gov -c 2025-07-15 -n 3 -r cancel \
//!     --timezone America/New_York --out-dir ~/Downloads
//!
//! # Use a custom rules file (or set CAMPSITE_RULES)
//! campsite --rules platforms.json platforms
//! ```

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use campsite_core::{
    default_file_name, render_plan, BufferStrategy, CalculationInput, IcsOptions, ReminderKind,
    RulesSource, Session,
};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "campsite",
    version,
    about = "Plan campsite buffer bookings around platform booking windows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Platform rules JSON file (uses the bundled rules if omitted)
    #[arg(long, global = true, env = "CAMPSITE_RULES")]
    rules: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the platforms available in the rules
    Platforms {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compute the booking and cancel dates for a stay
    Plan {
        #[command(flatten)]
        trip: TripArgs,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Export one reminder as an iCalendar (.ics) file
    Ics {
        #[command(flatten)]
        trip: TripArgs,
        /// Which reminder to export
        #[arg(short, long, value_enum)]
        reminder: Reminder,
        /// IANA timezone for a timed reminder at the platform's open time
        /// (all-day event if omitted)
        #[arg(long)]
        timezone: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long, conflicts_with = "out_dir")]
        output: Option<PathBuf>,
        /// Directory to write campsite-<reminder>-reminder.ics into
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

#[derive(Args)]
struct TripArgs {
    /// Platform key (see `campsite platforms`)
    #[arg(short, long)]
    platform: String,
    /// Checkout date (YYYY-MM-DD)
    #[arg(short, long)]
    checkout: String,
    /// Number of nights
    #[arg(short, long, allow_hyphen_values = true)]
    nights: String,
    /// How to lay out the buffer block
    #[arg(long, value_enum, default_value_t = Strategy::Coincident)]
    strategy: Strategy,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Book from the arrival date; both reminders fall on the same day
    Coincident,
    /// Book the platform's maximum stay ending at checkout, cancel the lead nights later
    FullBuffer,
}

impl From<Strategy> for BufferStrategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Coincident => BufferStrategy::Coincident,
            Strategy::FullBuffer => BufferStrategy::FullBuffer,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Reminder {
    Booking,
    Cancel,
}

impl From<Reminder> for ReminderKind {
    fn from(r: Reminder) -> Self {
        match r {
            Reminder::Booking => ReminderKind::Booking,
            Reminder::Cancel => ReminderKind::Cancel,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let session = match cli.rules.as_deref() {
        Some(path) => Session::load(RulesSource::File(path)),
        None => Session::load(RulesSource::Builtin),
    };

    match cli.command {
        Commands::Platforms { json } => list_platforms(&session, json)?,
        Commands::Plan { trip, json } => {
            let mut session = session.with_strategy(trip.strategy.into());
            let input = trip_input(&trip)?;
            let result = session
                .calculate(&input)
                .with_context(|| format!("Failed to plan a stay on '{}'", input.platform_key))?;

            let text = if json {
                let mut s = serde_json::to_string_pretty(result)?;
                s.push('\n');
                s
            } else {
                render_plan(result)
            };
            write_output(None, &text)?;
        }
        Commands::Ics {
            trip,
            reminder,
            timezone,
            output,
            out_dir,
        } => {
            let mut session = session.with_strategy(trip.strategy.into());
            let input = trip_input(&trip)?;
            session
                .calculate(&input)
                .with_context(|| format!("Failed to plan a stay on '{}'", input.platform_key))?;

            let kind = ReminderKind::from(reminder);
            let options = match timezone {
                Some(zone) => IcsOptions::timed(Utc::now(), zone),
                None => IcsOptions::all_day(Utc::now()),
            };
            let ics = session
                .export(kind, &options)
                .with_context(|| format!("Failed to export the {} reminder", kind))?;

            let path = match (output, out_dir) {
                (Some(path), _) => Some(path),
                (None, Some(dir)) => Some(dir.join(default_file_name(kind))),
                (None, None) => None,
            };
            write_output(path.as_deref(), &ics)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

fn trip_input(trip: &TripArgs) -> Result<CalculationInput> {
    CalculationInput::parse(&trip.platform, &trip.checkout, &trip.nights)
        .context("Invalid trip details")
}

fn list_platforms(session: &Session, json: bool) -> Result<()> {
    let rules = session.rules();

    if json {
        let entries: Vec<serde_json::Value> = session
            .platforms()
            .into_iter()
            .map(|(key, name)| match rules.get(key) {
                Ok(rule) => serde_json::json!({ "key": key, "name": name, "rule": rule }),
                Err(e) => serde_json::json!({ "key": key, "name": name, "error": e.to_string() }),
            })
            .collect();
        let mut text = serde_json::to_string_pretty(&entries)?;
        text.push('\n');
        return write_output(None, &text);
    }

    let mut text = String::new();
    for (key, name) in session.platforms() {
        let detail = match rules.get(key) {
            Ok(rule) => format!(
                "{} window, opens {}, max {} nights",
                rule.booking_window,
                if rule.open_time.is_empty() { "-" } else { rule.open_time.as_str() },
                rule.max_stay_days
            ),
            Err(e) => format!("unusable: {}", e),
        };
        text.push_str(&format!("{:<24} {} ({})\n", key, name, detail));
    }
    write_output(None, &text)
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote reminder");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
