//! Station address extraction.

use crate::models::record::Field;

use super::patterns::{ADDRESS_LABEL, STREET_ADDRESS};
use super::{until_column_gap, ExtractionMatch, FieldExtractor, FieldMatcher, FieldValue, MatchPolicy};

/// Address field extractor.
#[derive(Default)]
pub struct AddressExtractor;

impl AddressExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Pick the best address: anchored first, then the candidate with the
    /// most comma-separated segments, then reading order.
    fn best<T>(candidates: impl IntoIterator<Item = ExtractionMatch<T>>) -> Option<ExtractionMatch<T>> {
        candidates.into_iter().min_by_key(|m| {
            (
                !m.anchored,
                std::cmp::Reverse(segment_count(&m.source)),
                m.position.map_or(usize::MAX, |(start, _)| start),
            )
        })
    }
}

impl FieldExtractor for AddressExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        Self::best(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // "Address: 123 Main St, Springfield"
        for caps in ADDRESS_LABEL.captures_iter(text) {
            let value = caps.get(1).unwrap();
            let address = clean(until_column_gap(value.as_str()));
            if !address.is_empty() {
                results.push(
                    ExtractionMatch::anchored(address.clone(), address)
                        .with_position(value.start(), value.end()),
                );
            }
        }

        for m in STREET_ADDRESS.find_iter(text) {
            let address = clean(m.as_str());
            results.push(
                ExtractionMatch::bare(address.clone(), address).with_position(m.start(), m.end()),
            );
        }

        results
    }
}

impl FieldMatcher for AddressExtractor {
    fn field(&self) -> Field {
        Field::Address
    }

    fn candidates(&self, text: &str) -> Vec<ExtractionMatch<FieldValue>> {
        self.extract_all(text)
            .into_iter()
            .map(|m| m.map(FieldValue::Address))
            .collect()
    }

    fn attempt(&self, text: &str, policy: &MatchPolicy) -> Option<ExtractionMatch<FieldValue>> {
        Self::best(self.candidates(text).into_iter().filter(|c| policy.admits(c)))
    }
}

fn segment_count(address: &str) -> usize {
    address.split(',').filter(|s| !s.trim().is_empty()).count()
}

/// Collapse internal whitespace and drop trailing punctuation.
fn clean(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches([',', ';'])
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_with_city() {
        let extractor = AddressExtractor::new();
        let text = "04/12/2024 14:32  123 Main St, Springfield";

        assert_eq!(extractor.extract(text).unwrap().value, "123 Main St, Springfield");
    }

    #[test]
    fn test_street_with_state_and_zip() {
        let extractor = AddressExtractor::new();
        let text = "SHELL\n4410 W Oak Avenue, Austin, TX 78701\nPump 3";

        assert_eq!(
            extractor.extract(text).unwrap().value,
            "4410 W Oak Avenue, Austin, TX 78701"
        );
    }

    #[test]
    fn test_more_segments_wins() {
        let extractor = AddressExtractor::new();
        let text = "Corporate: 1 Shell Plaza Rd\nStation: 77 Elm St, Dayton, OH 45402";

        assert_eq!(
            extractor.extract(text).unwrap().value,
            "77 Elm St, Dayton, OH 45402"
        );
    }

    #[test]
    fn test_street_name_that_is_a_suffix_word() {
        let extractor = AddressExtractor::new();

        assert_eq!(
            extractor.extract("12 Court St, Dayton, OH 45402").unwrap().value,
            "12 Court St, Dayton, OH 45402"
        );
        assert_eq!(
            extractor.extract("5 Circle Dr, Akron").unwrap().value,
            "5 Circle Dr, Akron"
        );
        assert_eq!(
            extractor.extract("Sunoco 300 Park Place Way, Tulsa").unwrap().value,
            "300 Park Place Way, Tulsa"
        );
    }

    #[test]
    fn test_labeled_address_wins() {
        let extractor = AddressExtractor::new();
        let text = "Address: 9 Harbor Way  Pump 2\n500 Market St, Denver, CO";

        let result = extractor.extract(text).unwrap();
        assert!(result.anchored);
        assert_eq!(result.value, "9 Harbor Way");
    }

    #[test]
    fn test_no_street_suffix() {
        let extractor = AddressExtractor::new();
        assert!(extractor.extract("Pump 12 Regular Unleaded").is_none());
    }
}
