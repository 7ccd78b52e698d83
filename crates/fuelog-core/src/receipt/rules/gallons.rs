//! Fuel volume extraction.
//!
//! A number only counts as gallons when a unit token sits right next to it.
//! Per-gallon price notations such as `Price/Gal` or `3.599/gal` are skipped.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::record::Field;

use super::patterns::{GALLONS_UNIT_AFTER, GALLONS_UNIT_BEFORE};
use super::{char_before, word_before, ExtractionMatch, FieldExtractor, FieldMatcher, FieldValue};

/// Gallons field extractor.
#[derive(Default)]
pub struct GallonsExtractor;

impl GallonsExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for GallonsExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        super::select_best(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // "Gallons: 12.500"
        for caps in GALLONS_UNIT_BEFORE.captures_iter(text) {
            let full_match = caps.get(0).unwrap();
            if is_per_gallon_unit(text, full_match.start()) {
                continue;
            }

            let number = caps.get(1).unwrap();
            if let Some(gallons) = parse_gallons(number.as_str()) {
                results.push(
                    ExtractionMatch::anchored(gallons, full_match.as_str())
                        .with_position(number.start(), number.end()),
                );
            }
        }

        // "12.500 G"
        for caps in GALLONS_UNIT_AFTER.captures_iter(text) {
            let full_match = caps.get(0).unwrap();
            let number = caps.get(1).unwrap();

            // A currency-marked number is a price
            if matches!(char_before(text, number.start()), Some('$' | '.' | ',')) {
                continue;
            }
            if results.iter().any(|r| r.position == Some((number.start(), number.end()))) {
                continue;
            }

            if let Some(gallons) = parse_gallons(number.as_str()) {
                results.push(
                    ExtractionMatch::anchored(gallons, full_match.as_str())
                        .with_position(number.start(), number.end()),
                );
            }
        }

        results.sort_by_key(|m| m.position.map(|(start, _)| start));
        results
    }
}

impl FieldMatcher for GallonsExtractor {
    fn field(&self) -> Field {
        Field::Gallons
    }

    fn candidates(&self, text: &str) -> Vec<ExtractionMatch<FieldValue>> {
        self.extract_all(text)
            .into_iter()
            .map(|m| m.map(FieldValue::Gallons))
            .collect()
    }
}

/// `/gal` and `per gallon` introduce a unit price, not a volume.
fn is_per_gallon_unit(text: &str, unit_start: usize) -> bool {
    if matches!(char_before(text, unit_start), Some('/')) {
        return true;
    }
    matches!(word_before(text, unit_start).as_deref(), Some("per" | "price"))
}

fn parse_gallons(s: &str) -> Option<Decimal> {
    Decimal::from_str(s).ok().map(|g| g.normalize())
}
