//! Parse command - extract fields from a single receipt.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use fuelog_core::{
    enrich, EnrichedRecord, Field, MileageCalculator, ReceiptParser, RuleBasedParser, SheetRow,
    COLUMNS,
};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Receipt text file, or `-` to read from stdin
    #[arg(required = true)]
    input: String,

    /// Odometer reading from the previous fill-up
    #[arg(short, long)]
    previous_odometer: Option<u64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence scores
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output with the log's columns
    Csv,
    /// Plain text summary
    Text,
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    #[serde(flatten)]
    enriched: &'a EnrichedRecord,
    missing_fields: &'a [Field],
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let text = super::read_input(&args.input).await?;

    info!("Parsing receipt from {}", args.input);

    let parser = RuleBasedParser::from_config(&config.extraction);
    let calculator = MileageCalculator::from_config(&config.mileage);

    let result = parser.parse(&text)?;
    let enriched = enrich(&calculator, result.record, args.previous_odometer);

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&ParseOutput {
            enriched: &enriched,
            missing_fields: &result.missing_fields,
        })?,
        OutputFormat::Csv => format_csv(&SheetRow::from(&enriched))?,
        OutputFormat::Text => format_text(&enriched, &result.missing_fields),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(warning) = enriched.metrics.warning {
        eprintln!("{} {}", style("⚠").yellow(), warning);
    }

    if args.show_confidence {
        println!();
        for (field, confidence) in &result.field_confidence {
            println!(
                "{} {}: {:.0}%",
                style("ℹ").blue(),
                field,
                confidence * 100.0
            );
        }
    }

    debug!("Extraction took {}ms", result.processing_time_ms);

    Ok(())
}

fn format_csv(row: &SheetRow) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(COLUMNS)?;
    wtr.write_record(row.to_record())?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(enriched: &EnrichedRecord, missing: &[Field]) -> String {
    let mut output = String::new();
    let row = SheetRow::from(enriched);

    for (column, value) in row.entries() {
        if column == "Warning" {
            continue;
        }
        output.push_str(&format!("{:<17} {}\n", format!("{}:", column), value.unwrap_or("-")));
    }

    let prices = &enriched.prices;
    if prices.price_per_gallon_derived {
        output.push_str("\nPrice per gallon derived from total and gallons.\n");
    }
    if prices.total_price_derived {
        output.push_str("\nTotal derived from price per gallon and gallons.\n");
    }

    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(Field::name).collect();
        output.push_str(&format!("\nNot found: {}\n", names.join(", ")));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuelog_core::FuelRecord;

    #[test]
    fn test_text_lists_missing_fields() {
        let record = FuelRecord {
            odometer: Some(55230),
            ..FuelRecord::new()
        };
        let missing = record.missing_fields();
        let enriched = enrich(&MileageCalculator::new(), record, Some(55000));

        let text = format_text(&enriched, &missing);
        assert!(text.contains("Odometer:         55230"));
        assert!(text.contains("Miles Driven:     230"));
        assert!(text.contains("Not found: "));
        assert!(!text.contains("odometer"));
    }

    #[test]
    fn test_csv_has_header_and_row() {
        let enriched = enrich(&MileageCalculator::new(), FuelRecord::new(), None);
        let csv = format_csv(&SheetRow::from(&enriched)).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], ",,,,,,,,,,");
    }
}
