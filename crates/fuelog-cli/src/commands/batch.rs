//! Batch command - log multiple receipt files in order.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use fuelog_core::{FuelLogger, LogOutcome, RowSink};

use crate::sink::CsvSink;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching receipt text files
    #[arg(required = true)]
    input: String,

    /// CSV log file (default: from configuration)
    #[arg(short, long)]
    log_file: Option<PathBuf>,

    /// Odometer reading before the first receipt (default: last logged reading)
    #[arg(short, long)]
    previous_odometer: Option<u64>,

    /// Show rows without appending them
    #[arg(long)]
    dry_run: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of logging a single file.
struct FileResult {
    path: PathBuf,
    outcome: Option<LogOutcome>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if let Some(log_file) = args.log_file.clone() {
        config.log.path = log_file;
    }

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} receipts to log",
        style("ℹ").blue(),
        files.len()
    );

    let sink = CsvSink::from_config(&config.log);
    let mut previous = match args.previous_odometer {
        Some(reading) => Some(reading),
        None => sink.last_odometer()?,
    };
    let mut logger = FuelLogger::from_config(sink, &config).with_dry_run(args.dry_run);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} receipts")?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let result = match super::read_input(&path.to_string_lossy()).await {
            Ok(text) => logger
                .log_with_previous(&text, previous)
                .map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                debug!("Logged {}", path.display());
                if let Some(warning) = outcome.warning() {
                    pb.println(format!(
                        "{} {}: {}",
                        style("⚠").yellow(),
                        path.display(),
                        warning
                    ));
                }
                if let Some(reading) = outcome.enriched.record.odometer {
                    previous = Some(reading);
                }
                results.push(FileResult {
                    path,
                    outcome: Some(outcome),
                    error: None,
                });
            }
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to log {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        outcome: None,
                        error: Some(error_msg),
                    });
                } else {
                    error!("Failed to log {}: {}", path.display(), error_msg);
                    pb.abandon();
                    anyhow::bail!("Logging failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let successful: Vec<_> = results.iter().filter(|r| r.outcome.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();
    let warnings = successful
        .iter()
        .filter_map(|r| r.outcome.as_ref())
        .filter(|o| o.enriched.metrics.has_warning())
        .count();

    println!(
        "{} Processed {} receipts in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} logged, {} failed, {} with warnings",
        style(successful.len()).green(),
        style(failed.len()).red(),
        style(warnings).yellow()
    );

    if args.dry_run {
        println!("{} Dry run, nothing written", style("ℹ").blue());
    } else if !successful.is_empty() {
        println!(
            "{} Log file: {}",
            style("ℹ").blue(),
            logger.sink().path().display()
        );
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}
