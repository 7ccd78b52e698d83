//! Rule-based field extractors for fuel receipts.

pub mod address;
pub mod dates;
pub mod gallons;
pub mod invoice_number;
pub mod odometer;
pub mod patterns;
pub mod prices;
pub mod times;

pub use address::AddressExtractor;
pub use dates::DateExtractor;
pub use gallons::GallonsExtractor;
pub use invoice_number::InvoiceNumberExtractor;
pub use odometer::OdometerExtractor;
pub use prices::{TotalPriceExtractor, UnitPriceExtractor};
pub use times::TimeExtractor;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::models::record::{Field, FuelRecord};

/// Confidence of a match anchored by a field keyword.
pub const ANCHORED_CONFIDENCE: f32 = 0.95;

/// Confidence of a bare pattern match.
pub const BARE_CONFIDENCE: f32 = 0.7;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// Extraction context with confidence scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Whether an explicit field keyword anchored the match.
    pub anchored: bool,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            anchored: false,
            position: None,
            source: source.into(),
        }
    }

    /// A keyword-anchored match.
    pub fn anchored(value: T, source: impl Into<String>) -> Self {
        Self {
            anchored: true,
            ..Self::new(value, ANCHORED_CONFIDENCE, source)
        }
    }

    /// A bare pattern match.
    pub fn bare(value: T, source: impl Into<String>) -> Self {
        Self::new(value, BARE_CONFIDENCE, source)
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionMatch<U> {
        ExtractionMatch {
            value: f(self.value),
            confidence: self.confidence,
            anchored: self.anchored,
            position: self.position,
            source: self.source,
        }
    }

    fn start(&self) -> usize {
        self.position.map_or(usize::MAX, |(start, _)| start)
    }

    fn overlaps(&self, other: &ExtractionMatch<impl Sized>) -> bool {
        match (self.position, other.position) {
            (Some((a_start, a_end)), Some((b_start, b_end))) => a_start < b_end && b_start < a_end,
            _ => false,
        }
    }
}

/// Pick the winning candidate: keyword-anchored first, then reading order.
pub fn select_best<T>(candidates: Vec<ExtractionMatch<T>>) -> Option<ExtractionMatch<T>> {
    candidates
        .into_iter()
        .min_by_key(|m| (!m.anchored, m.start()))
}

/// Which candidates the parser accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// Minimum confidence to accept a candidate.
    pub min_confidence: f32,
    /// Accept candidates with no keyword anchor.
    pub allow_unlabeled: bool,
}

impl MatchPolicy {
    pub fn admits<T>(&self, candidate: &ExtractionMatch<T>) -> bool {
        candidate.confidence >= self.min_confidence && (self.allow_unlabeled || candidate.anchored)
    }

    /// Drop inadmissible candidates and apply the tie-break rule.
    pub fn select<T>(&self, candidates: Vec<ExtractionMatch<T>>) -> Option<ExtractionMatch<T>> {
        select_best(candidates.into_iter().filter(|c| self.admits(c)).collect())
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            allow_unlabeled: true,
        }
    }
}

/// A typed value for one record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Date(NaiveDate),
    Time(NaiveTime),
    InvoiceNumber(String),
    Gallons(Decimal),
    PricePerGallon(Decimal),
    TotalPrice(Decimal),
    Address(String),
    Odometer(u64),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Date(_) => Field::Date,
            FieldValue::Time(_) => Field::Time,
            FieldValue::InvoiceNumber(_) => Field::InvoiceNumber,
            FieldValue::Gallons(_) => Field::Gallons,
            FieldValue::PricePerGallon(_) => Field::PricePerGallon,
            FieldValue::TotalPrice(_) => Field::TotalPrice,
            FieldValue::Address(_) => Field::Address,
            FieldValue::Odometer(_) => Field::Odometer,
        }
    }

    /// Store the value on its field of `record`.
    pub fn apply(self, record: &mut FuelRecord) {
        match self {
            FieldValue::Date(v) => record.date = Some(v),
            FieldValue::Time(v) => record.time = Some(v),
            FieldValue::InvoiceNumber(v) => record.invoice_number = Some(v),
            FieldValue::Gallons(v) => record.gallons = Some(v),
            FieldValue::PricePerGallon(v) => record.price_per_gallon = Some(v),
            FieldValue::TotalPrice(v) => record.total_price = Some(v),
            FieldValue::Address(v) => record.address = Some(v),
            FieldValue::Odometer(v) => record.odometer = Some(v),
        }
    }
}

/// A field-matching strategy the parser can run without knowing its type.
pub trait FieldMatcher: Send + Sync {
    /// The field this matcher fills.
    fn field(&self) -> Field;

    /// Every candidate found in the text.
    fn candidates(&self, text: &str) -> Vec<ExtractionMatch<FieldValue>>;

    /// The winning candidate under `policy`, if any.
    fn attempt(&self, text: &str, policy: &MatchPolicy) -> Option<ExtractionMatch<FieldValue>> {
        policy.select(self.candidates(text))
    }
}

pub(crate) fn char_before(text: &str, pos: usize) -> Option<char> {
    text[..pos].chars().next_back()
}

/// Whether the number at `start..end` is not part of a longer number.
pub(crate) fn is_standalone_number(text: &str, start: usize, end: usize) -> bool {
    if let Some(c) = char_before(text, start) {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            return false;
        }
    }

    let mut after = text[end..].chars();
    match (after.next(), after.next()) {
        (Some(c), _) if c.is_ascii_digit() => false,
        (Some('.' | ','), Some(d)) if d.is_ascii_digit() => false,
        _ => true,
    }
}

/// The alphabetic word right before `pos`, lowercased.
pub(crate) fn word_before(text: &str, pos: usize) -> Option<String> {
    let head = text[..pos].trim_end_matches(|c: char| c == ' ' || c == '\t' || c == ':');
    let word: String = head
        .chars()
        .rev()
        .take_while(|c| c.is_alphabetic())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    (!word.is_empty()).then(|| word.to_lowercase())
}

/// Cut a labeled value at the first column gap (tab or run of spaces).
pub(crate) fn until_column_gap(value: &str) -> &str {
    let end = value
        .find("  ")
        .into_iter()
        .chain(value.find('\t'))
        .min()
        .unwrap_or(value.len());
    value[..end].trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_prefers_anchored_then_first() {
        let candidates = vec![
            ExtractionMatch::bare(1, "1").with_position(0, 1),
            ExtractionMatch::anchored(2, "2").with_position(10, 11),
            ExtractionMatch::anchored(3, "3").with_position(20, 21),
        ];
        assert_eq!(select_best(candidates).map(|m| m.value), Some(2));

        let candidates = vec![
            ExtractionMatch::bare(4, "4").with_position(5, 6),
            ExtractionMatch::bare(5, "5").with_position(1, 2),
        ];
        assert_eq!(select_best(candidates).map(|m| m.value), Some(5));
    }

    #[test]
    fn test_policy_filters_unlabeled() {
        let policy = MatchPolicy {
            min_confidence: 0.5,
            allow_unlabeled: false,
        };
        let candidates = vec![ExtractionMatch::bare(1, "1").with_position(0, 1)];
        assert!(policy.select(candidates).is_none());
    }

    #[test]
    fn test_standalone_number() {
        let text = "12.5 miles";
        assert!(!is_standalone_number(text, 3, 4));
        assert!(!is_standalone_number(text, 0, 2));

        let text = "odo 55230 mi";
        assert!(is_standalone_number(text, 4, 9));
    }

    #[test]
    fn test_word_before() {
        assert_eq!(word_before("Total Price: ", 6), Some("total".to_string()));
        assert_eq!(word_before("  ", 2), None);
    }

    #[test]
    fn test_until_column_gap() {
        assert_eq!(until_column_gap("123 Main St  Odometer: 5"), "123 Main St");
        assert_eq!(until_column_gap("123 Main St"), "123 Main St");
    }
}
