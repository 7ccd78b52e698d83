//! Rule-based receipt parser running independent field matchers.

use std::collections::BTreeMap;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::{DateOrder, ExtractionConfig};
use crate::models::record::{Field, FuelRecord};

use super::rules::{
    AddressExtractor, DateExtractor, FieldMatcher, GallonsExtractor, InvoiceNumberExtractor,
    MatchPolicy, OdometerExtractor, TimeExtractor, TotalPriceExtractor, UnitPriceExtractor,
};
use super::{ReceiptExtractor, Result};

/// Result of receipt extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted record.
    pub record: FuelRecord,
    /// Fields that could not be extracted.
    pub missing_fields: Vec<Field>,
    /// Confidence of each extracted field.
    pub field_confidence: BTreeMap<Field, f32>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for receipt parsing.
pub trait ReceiptParser {
    /// Parse a receipt from text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Receipt parser built from an ordered list of field matchers.
pub struct RuleBasedParser {
    matchers: Vec<Box<dyn FieldMatcher>>,
    policy: MatchPolicy,
}

impl RuleBasedParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self::with_date_order(DateOrder::default())
    }

    /// Create a parser from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::with_date_order(config.date_order)
            .with_min_confidence(config.min_field_confidence)
            .with_unlabeled(config.allow_unlabeled)
    }

    fn with_date_order(order: DateOrder) -> Self {
        let matchers: Vec<Box<dyn FieldMatcher>> = vec![
            Box::new(DateExtractor::new().with_order(order)),
            Box::new(TimeExtractor::new()),
            Box::new(InvoiceNumberExtractor::new()),
            Box::new(GallonsExtractor::new()),
            Box::new(UnitPriceExtractor::new()),
            Box::new(TotalPriceExtractor::new()),
            Box::new(AddressExtractor::new()),
            Box::new(OdometerExtractor::new()),
        ];

        Self {
            matchers,
            policy: MatchPolicy::default(),
        }
    }

    /// Set minimum confidence threshold.
    pub fn with_min_confidence(mut self, confidence: f32) -> Self {
        self.policy.min_confidence = confidence;
        self
    }

    /// Accept or reject matches that no field keyword anchors.
    pub fn with_unlabeled(mut self, allow: bool) -> Self {
        self.policy.allow_unlabeled = allow;
        self
    }
}

impl Default for RuleBasedParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ReceiptParser for RuleBasedParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyInput);
        }

        info!("Parsing receipt from {} characters of text", text.len());

        let mut record = FuelRecord::new();
        let mut field_confidence = BTreeMap::new();

        for matcher in &self.matchers {
            match matcher.attempt(text, &self.policy) {
                Some(found) => {
                    debug!(
                        "Matched {} from {:?} (confidence {:.2})",
                        matcher.field(),
                        found.source,
                        found.confidence
                    );
                    field_confidence.insert(matcher.field(), found.confidence);
                    found.value.apply(&mut record);
                }
                None => debug!("No match for {}", matcher.field()),
            }
        }

        let missing_fields = record.missing_fields();
        debug!(
            "Extracted {} of {} fields",
            Field::ALL.len() - missing_fields.len(),
            Field::ALL.len()
        );

        Ok(ExtractionResult {
            record,
            missing_fields,
            field_confidence,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl ReceiptExtractor for RuleBasedParser {
    fn extract_from_text(&self, text: &str) -> Result<FuelRecord> {
        self.parse(text).map(|r| r.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SCENARIO_A: &str = "Gallons: 12.500 G  Total: $45.00  Odometer: 55230  04/12/2024 14:32  123 Main St, Springfield";

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_single_line_receipt() {
        let parser = RuleBasedParser::new();
        let result = parser.parse(SCENARIO_A).unwrap();

        assert_eq!(
            result.record,
            FuelRecord {
                date: NaiveDate::from_ymd_opt(2024, 4, 12),
                time: NaiveTime::from_hms_opt(14, 32, 0),
                invoice_number: None,
                gallons: Some(dec("12.5")),
                price_per_gallon: None,
                total_price: Some(dec("45.00")),
                address: Some("123 Main St, Springfield".to_string()),
                odometer: Some(55230),
            }
        );
        assert_eq!(
            result.missing_fields,
            vec![Field::InvoiceNumber, Field::PricePerGallon]
        );
    }

    #[test]
    fn test_parse_multi_line_receipt() {
        let text = r#"
            SUNOCO #0412
            4410 W Oak Avenue, Austin, TX 78701

            Invoice #88231
            Date: 09/03/2023   Time: 7:45 AM

            Pump  Gallons   Price/Gal
            04    10.214    $3.459

            Fuel Sale     $35.33
            Odometer: 61,002
        "#;

        let record = RuleBasedParser::new().extract_from_text(text).unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 9, 3));
        assert_eq!(record.time, NaiveTime::from_hms_opt(7, 45, 0));
        assert_eq!(record.invoice_number.as_deref(), Some("88231"));
        assert_eq!(record.price_per_gallon, Some(dec("3.459")));
        assert_eq!(record.total_price, Some(dec("35.33")));
        assert_eq!(
            record.address.as_deref(),
            Some("4410 W Oak Avenue, Austin, TX 78701")
        );
        assert_eq!(record.odometer, Some(61002));
        // Column layout separates the label from the number
        assert_eq!(record.gallons, None);
    }

    #[test]
    fn test_no_gallons_unit() {
        let record = RuleBasedParser::new().extract_from_text("12.5 items").unwrap();
        assert_eq!(record.gallons, None);
    }

    #[test]
    fn test_unrecognizable_text_is_all_absent() {
        let record = RuleBasedParser::new()
            .extract_from_text("thank you, come again")
            .unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let parser = RuleBasedParser::new();
        assert_eq!(parser.parse("").unwrap_err(), ExtractionError::EmptyInput);
        assert_eq!(parser.parse("  \n\t ").unwrap_err(), ExtractionError::EmptyInput);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = RuleBasedParser::new();
        let first = parser.parse(SCENARIO_A).unwrap();
        let second = parser.parse(SCENARIO_A).unwrap();
        assert_eq!(first.record, second.record);
        assert_eq!(first.field_confidence, second.field_confidence);
    }

    #[test]
    fn test_labeled_only_mode() {
        let parser = RuleBasedParser::new().with_unlabeled(false);
        let record = parser.extract_from_text(SCENARIO_A).unwrap();

        assert_eq!(record.gallons, Some(dec("12.5")));
        assert_eq!(record.odometer, Some(55230));
        assert_eq!(record.date, None);
        assert_eq!(record.address, None);
    }

    #[test]
    fn test_from_config_date_order() {
        let config = ExtractionConfig {
            date_order: DateOrder::DayFirst,
            ..ExtractionConfig::default()
        };
        let record = RuleBasedParser::from_config(&config)
            .extract_from_text("Date: 04/12/2024")
            .unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 12, 4));
    }
}
