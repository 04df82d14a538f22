//! Replay dashboard for recorded RAN telemetry.
//!
//! `run` opens the dashboard window (headless without the `gpui` feature),
//! `headless` replays for a fixed time and logs the board, and `ingest-log`
//! stores a classified xApp log file for the classifier panel.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use ran_liveboard::datasource::{LOG_COLLECTION, logfile};
use ran_liveboard::logging::{LogFormat, init_logging};
use ran_liveboard::{Dashboard, DashboardConfig, Dataset, JsonDirStore};

/// Replay recorded RAN KPIs and xApp decisions as a live dashboard
#[derive(Parser, Debug)]
#[command(name = "ran-liveboard", version)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "RAN_LIVEBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Document store directory, overrides the configured one
    #[arg(long, global = true, env = "RAN_LIVEBOARD_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v warn, -vv info, -vvv debug; headless runs start at info)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the dashboard
    Run,
    /// Replay without a window and log the board state
    Headless {
        /// How long to replay
        #[arg(long, default_value = "10")]
        duration_secs: u64,
    },
    /// Parse a classified xApp log file into the document store
    IngestLog {
        /// Log file to read
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let verbosity = effective_verbosity(args.command.as_ref(), args.verbose);
    init_logging(verbosity, args.log_file.as_deref(), args.log_format)
        .context("failed to initialize logging")?;

    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }
    let store = JsonDirStore::new(&config.data_dir);

    match args.command.unwrap_or(Command::Run) {
        Command::Run => {
            let dataset = Arc::new(Dataset::load(&store));
            open(config, dataset)
        }
        Command::Headless { duration_secs } => {
            let dataset = Arc::new(Dataset::load(&store));
            headless(&config, dataset, Duration::from_secs(duration_secs));
            Ok(())
        }
        Command::IngestLog { file } => {
            let document = logfile::ingest(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let entries = document.entries.len();
            store
                .upsert(LOG_COLLECTION, document)
                .with_context(|| format!("failed to write {}", store.root().display()))?;
            info!(entries, store = %store.root().display(), "log stored");
            Ok(())
        }
    }
}

/// Headless replays report through info logs, so they never run below info.
fn effective_verbosity(command: Option<&Command>, verbose: u8) -> u8 {
    let headless = match command {
        Some(Command::Headless { .. }) => true,
        Some(Command::Run) | None => !cfg!(feature = "gpui"),
        Some(Command::IngestLog { .. }) => false,
    };
    if headless { verbose.max(2) } else { verbose }
}

#[cfg(feature = "gpui")]
fn open(config: DashboardConfig, dataset: Arc<Dataset>) -> anyhow::Result<()> {
    ran_liveboard::gpui_backend::run(config, dataset);
    Ok(())
}

#[cfg(not(feature = "gpui"))]
fn open(config: DashboardConfig, dataset: Arc<Dataset>) -> anyhow::Result<()> {
    info!("built without the gpui feature, replaying headless");
    headless(&config, dataset, Duration::MAX);
    Ok(())
}

fn headless(config: &DashboardConfig, dataset: Arc<Dataset>, duration: Duration) {
    let mut dashboard = Dashboard::new(config, dataset);
    let start = Instant::now();
    let mut next_report = Duration::ZERO;

    loop {
        let now = start.elapsed();
        if now >= duration {
            break;
        }
        dashboard.advance(now);
        if now >= next_report {
            for line in dashboard.board().summary() {
                info!("{line}");
            }
            next_report = now + Duration::from_secs(1);
        }
        let wake = dashboard
            .session()
            .next_deadline()
            .unwrap_or(now + Duration::from_millis(100))
            .min(duration);
        std::thread::sleep(wake.saturating_sub(start.elapsed()));
    }

    for stats in dashboard.session().stats() {
        info!(panel = %stats.id, ticks = stats.ticks, failures = stats.failures, "panel stats");
    }
}
