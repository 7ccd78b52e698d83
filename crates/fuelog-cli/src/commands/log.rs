//! Log command - append one receipt to the fuel log.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use fuelog_core::{FuelLogger, LogOutcome};

use crate::sink::CsvSink;

/// Arguments for the log command.
#[derive(Args)]
pub struct LogArgs {
    /// Receipt text file, or `-` to read from stdin
    #[arg(required = true)]
    input: String,

    /// CSV log file (default: from configuration)
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Show the row without appending it
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: LogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(log_file) = args.log_file {
        config.log.path = log_file;
    }

    let text = super::read_input(&args.input).await?;

    let sink = CsvSink::from_config(&config.log);
    info!("Logging {} to {}", args.input, sink.path().display());

    let mut logger = FuelLogger::from_config(sink, &config).with_dry_run(args.dry_run);
    let outcome = logger.log(&text)?;

    print_outcome(&outcome, logger.sink().path().display());

    Ok(())
}

fn print_outcome(outcome: &LogOutcome, destination: impl std::fmt::Display) {
    for (column, value) in outcome.row.entries() {
        if let Some(value) = value {
            println!("  {:<16} {}", format!("{}:", column), value);
        }
    }

    if let Some(warning) = outcome.warning() {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    if outcome.appended {
        println!("{} Appended row to {}", style("✓").green(), destination);
    } else {
        println!("{} Dry run, nothing written", style("ℹ").blue());
    }
}
