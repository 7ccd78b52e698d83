//! Odometer reading extraction.

use crate::models::record::Field;

use super::patterns::{ODOMETER_KEYWORD_AFTER, ODOMETER_KEYWORD_BEFORE};
use super::{is_standalone_number, ExtractionMatch, FieldExtractor, FieldMatcher, FieldValue};

/// Odometer field extractor. Integers need an odometer keyword next to them.
#[derive(Default)]
pub struct OdometerExtractor;

impl OdometerExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for OdometerExtractor {
    type Output = ExtractionMatch<u64>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        super::select_best(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for regex in [&*ODOMETER_KEYWORD_BEFORE, &*ODOMETER_KEYWORD_AFTER] {
            for caps in regex.captures_iter(text) {
                let full_match = caps.get(0).unwrap();
                let number = caps.get(1).unwrap();

                if !is_standalone_number(text, number.start(), number.end()) {
                    continue;
                }
                if results.iter().any(|r| r.position == Some((number.start(), number.end()))) {
                    continue;
                }

                if let Some(reading) = parse_reading(number.as_str()) {
                    results.push(
                        ExtractionMatch::anchored(reading, full_match.as_str().trim())
                            .with_position(number.start(), number.end()),
                    );
                }
            }
        }

        results.sort_by_key(|m| m.position.map(|(start, _)| start));
        results
    }
}

impl FieldMatcher for OdometerExtractor {
    fn field(&self) -> Field {
        Field::Odometer
    }

    fn candidates(&self, text: &str) -> Vec<ExtractionMatch<FieldValue>> {
        self.extract_all(text)
            .into_iter()
            .map(|m| m.map(FieldValue::Odometer))
            .collect()
    }
}

fn parse_reading(s: &str) -> Option<u64> {
    s.replace(',', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_before() {
        let extractor = OdometerExtractor::new();
        assert_eq!(extractor.extract("Odometer: 55230").unwrap().value, 55230);
        assert_eq!(extractor.extract("ODO 55,230").unwrap().value, 55230);
        assert_eq!(extractor.extract("Mileage reading: 120004").unwrap().value, 120004);
    }

    #[test]
    fn test_keyword_after() {
        let extractor = OdometerExtractor::new();
        assert_eq!(extractor.extract("55230 mi").unwrap().value, 55230);
        assert_eq!(extractor.extract("at 61,002 miles").unwrap().value, 61002);
    }

    #[test]
    fn test_rejects_bare_integers() {
        let extractor = OdometerExtractor::new();
        assert!(extractor.extract("Pump 4  55230").is_none());
    }

    #[test]
    fn test_rejects_decimals() {
        let extractor = OdometerExtractor::new();
        assert!(extractor.extract("12.5 miles").is_none());
        assert!(extractor.extract("Miles: 12.5").is_none());
    }

    #[test]
    fn test_first_reading_wins() {
        let extractor = OdometerExtractor::new();
        let text = "Odometer: 55230\nlast service at 50000 mi";
        assert_eq!(extractor.extract(text).unwrap().value, 55230);
    }
}
