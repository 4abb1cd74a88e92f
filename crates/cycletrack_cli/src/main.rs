//! Command-line entry point.
//!
//! # Responsibility
//! - Resolve file locations and logging, then dispatch one subcommand.
//! - Keep all record/analysis rules in `cycletrack_core`.

mod render;

use clap::{Parser, Subcommand};
use cycletrack_core::{
    dashboard, default_log_level, init_logging, predict_next, statistics, KeyMaterial,
    RecordStore, StorePaths,
};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

const APP_DIR_NAME: &str = "cycletrack";

#[derive(Debug, Parser)]
#[command(name = "cycletrack", version, about = "Encrypted personal cycle tracker")]
struct Cli {
    /// Directory holding the encrypted data file and its key.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add a period entry.
    Add {
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD).
        #[arg(long)]
        end: String,
        /// Light, Medium or Heavy.
        #[arg(long, default_value = "Medium")]
        flow: String,
        /// Comma separated symptoms.
        #[arg(long, default_value = "")]
        symptoms: String,
    },
    /// Show all records.
    View,
    /// Show cycle statistics and anomaly alerts.
    Stats,
    /// Predict the next period start.
    Predict,
    /// Print the dashboard series.
    Dashboard,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let data_dir = resolve_data_dir(cli.data_dir)?;
    let paths = StorePaths::in_dir(&data_dir);

    let log_dir = cli.log_dir.unwrap_or_else(|| paths.log_dir());
    let log_level = cli
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    // Logging problems are reported but never block tracker use.
    if let Err(err) = init_logging(&log_level, &log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok core_version={}",
        cycletrack_core::core_version()
    );

    let key = KeyMaterial::load_or_generate(&paths.key_file).map_err(|err| err.to_string())?;
    let mut store = RecordStore::open(&paths.data_file, &key).map_err(|err| {
        error!("event=cli_open module=cli status=error error_code={}", err.code());
        format!("{err}\nrefusing to continue so existing data is not overwritten")
    })?;

    match cli.command {
        Command::Add {
            start,
            end,
            flow,
            symptoms,
        } => {
            store
                .add_record(&start, &end, &flow, &symptoms)
                .map_err(|err| err.to_string())?;
            println!("Period entry added and securely saved.");
        }
        Command::View => render::print_records(store.records()),
        Command::Stats => match statistics(store.records()) {
            Some(stats) => render::print_statistics(&stats),
            None => render::print_insufficient("statistics"),
        },
        Command::Predict => match predict_next(store.records()) {
            Some(prediction) => render::print_prediction(&prediction),
            None => render::print_insufficient("prediction"),
        },
        Command::Dashboard => match dashboard(store.records()) {
            Some(board) => render::print_dashboard(&board),
            None => render::print_insufficient("charts"),
        },
    }
    Ok(())
}

fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, String> {
    if let Some(dir) = flag {
        return std::path::absolute(&dir)
            .map_err(|err| format!("cannot resolve data dir `{}`: {err}", dir.display()));
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| "no platform data directory; pass --data-dir".to_string())
}
