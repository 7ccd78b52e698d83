//! Row sinks and the extract-compute-append logging pipeline.

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::config::FuelogConfig;
use crate::models::record::{DataQualityWarning, EnrichedRecord, Field};
use crate::models::row::SheetRow;
use crate::receipt::{ReceiptParser, RuleBasedParser};
use crate::trip::{enrich, MileageCalculator};

/// Persistence collaborator that accepts rows and owns the odometer history.
pub trait RowSink {
    /// The most recently logged odometer reading, if any row carries one.
    fn last_odometer(&self) -> Result<Option<u64>>;

    /// Append one row.
    fn append(&mut self, row: &SheetRow) -> Result<()>;
}

/// Sink keeping rows in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    rows: Vec<SheetRow>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[SheetRow] {
        &self.rows
    }
}

impl RowSink for MemorySink {
    fn last_odometer(&self) -> Result<Option<u64>> {
        Ok(self.rows.iter().rev().find_map(SheetRow::odometer))
    }

    fn append(&mut self, row: &SheetRow) -> Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn last_odometer(&self) -> Result<Option<u64>> {
        (**self).last_odometer()
    }

    fn append(&mut self, row: &SheetRow) -> Result<()> {
        (**self).append(row)
    }
}

/// What happened when a receipt was logged.
#[derive(Debug, Clone)]
pub struct LogOutcome {
    /// Record with metrics and effective prices.
    pub enriched: EnrichedRecord,
    /// Row handed to the sink.
    pub row: SheetRow,
    /// Odometer reading the metrics were computed against.
    pub previous_odometer: Option<u64>,
    /// Fields the extractor could not fill.
    pub missing_fields: Vec<Field>,
    /// Whether the row was written to the sink.
    pub appended: bool,
}

impl LogOutcome {
    pub fn warning(&self) -> Option<DataQualityWarning> {
        self.enriched.metrics.warning
    }
}

/// Extracts a receipt, computes trip metrics and appends the row to a sink.
pub struct FuelLogger<S> {
    parser: RuleBasedParser,
    calculator: MileageCalculator,
    sink: S,
    dry_run: bool,
}

impl<S: RowSink> FuelLogger<S> {
    /// Create a logger with default settings.
    pub fn new(sink: S) -> Self {
        Self {
            parser: RuleBasedParser::new(),
            calculator: MileageCalculator::new(),
            sink,
            dry_run: false,
        }
    }

    /// Create a logger from configuration.
    pub fn from_config(sink: S, config: &FuelogConfig) -> Self {
        Self {
            parser: RuleBasedParser::from_config(&config.extraction),
            calculator: MileageCalculator::from_config(&config.mileage),
            sink,
            dry_run: false,
        }
    }

    /// Compute rows without writing them.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Log a receipt against the sink's last odometer reading.
    pub fn log(&mut self, text: &str) -> Result<LogOutcome> {
        let previous = self.sink.last_odometer()?;
        self.log_with_previous(text, previous)
    }

    /// Log a receipt against an explicit previous odometer reading.
    pub fn log_with_previous(
        &mut self,
        text: &str,
        previous_odometer: Option<u64>,
    ) -> Result<LogOutcome> {
        let extraction = self.parser.parse(text)?;
        let missing_fields = extraction.missing_fields;

        let enriched = enrich(&self.calculator, extraction.record, previous_odometer);
        if let Some(warning) = enriched.metrics.warning {
            warn!("Logging receipt with data-quality warning: {}", warning);
        }

        let row = SheetRow::from(&enriched);

        if self.dry_run {
            debug!("Dry run, row not appended");
        } else {
            self.sink.append(&row)?;
            info!(
                "Appended row (odometer {:?}, miles driven {:?})",
                enriched.record.odometer, enriched.metrics.miles_driven
            );
        }

        Ok(LogOutcome {
            enriched,
            row,
            previous_odometer,
            missing_fields,
            appended: !self.dry_run,
        })
    }
}
