//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionResult, ReceiptParser, RuleBasedParser};

use crate::error::ExtractionError;
use crate::models::record::FuelRecord;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for receipt field extractors.
pub trait ReceiptExtractor {
    /// Extract a fuel record from plain receipt text.
    fn extract_from_text(&self, text: &str) -> Result<FuelRecord>;
}

/// Extract a fuel record with the default rule set.
pub fn extract(text: &str) -> Result<FuelRecord> {
    RuleBasedParser::new().extract_from_text(text)
}
