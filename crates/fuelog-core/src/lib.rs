//! Core library for fuel receipt logging.
//!
//! This crate provides:
//! - Rule-based field extraction from plain receipt text (date, time,
//!   invoice number, gallons, prices, address, odometer)
//! - Trip metrics (miles driven, miles per gallon) and price derivation
//! - Spreadsheet row rendering and a sink abstraction for persistence

pub mod error;
pub mod models;
pub mod receipt;
pub mod sink;
pub mod trip;

pub use error::{ExtractionError, FuelogError, Result, SinkError};
pub use models::config::{DateOrder, FuelogConfig};
pub use models::record::{
    DataQualityWarning, DerivedPrices, EnrichedRecord, Field, FuelRecord, TripMetrics,
};
pub use models::row::{SheetRow, COLUMNS};
pub use receipt::{extract, ExtractionResult, ReceiptExtractor, ReceiptParser, RuleBasedParser};
pub use sink::{FuelLogger, LogOutcome, MemorySink, RowSink};
pub use trip::{compute_metrics, derive_prices, enrich, MileageCalculator};
