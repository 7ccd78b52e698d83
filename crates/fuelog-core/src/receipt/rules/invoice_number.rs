//! Invoice / receipt number extraction.

use crate::models::record::Field;

use super::patterns::INVOICE_NUMBER;
use super::{ExtractionMatch, FieldExtractor, FieldMatcher, FieldValue};

/// Invoice number extractor. Only labeled numbers are recognized.
#[derive(Default)]
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        super::select_best(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        INVOICE_NUMBER
            .captures_iter(text)
            .map(|caps| {
                let full_match = caps.get(0).unwrap();
                let number = caps.get(1).unwrap();
                let value = number.as_str().trim_end_matches('-').to_string();
                ExtractionMatch::anchored(value, full_match.as_str())
                    .with_position(number.start(), number.end())
            })
            .collect()
    }
}

impl FieldMatcher for InvoiceNumberExtractor {
    fn field(&self) -> Field {
        Field::InvoiceNumber
    }

    fn candidates(&self, text: &str) -> Vec<ExtractionMatch<FieldValue>> {
        self.extract_all(text)
            .into_iter()
            .map(|m| m.map(FieldValue::InvoiceNumber))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_invoice_number() {
        let extractor = InvoiceNumberExtractor::new();

        assert_eq!(extractor.extract("Invoice #10023").unwrap().value, "10023");
        assert_eq!(extractor.extract("Receipt No. 4471-A").unwrap().value, "4471-A");
        assert_eq!(extractor.extract("INV: 000981").unwrap().value, "000981");
    }

    #[test]
    fn test_label_without_number() {
        let extractor = InvoiceNumberExtractor::new();
        assert!(extractor.extract("Invoice Date: 04/12/2024").is_none());
        assert!(extractor.extract("Thank you for your receipt").is_none());
    }
}
