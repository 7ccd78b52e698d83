//! Price extraction: unit price per gallon and sale total.
//!
//! Both extractors read from the same candidate scan so that a number claimed
//! by a labeled price of one kind is never reused as a bare price of the other.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::models::record::Field;

use super::patterns::{
    CURRENCY_PREFIXED, CURRENCY_SUFFIXED, TOTAL_LABELED, UNIT_PRICE_LABELED, UNIT_PRICE_SUFFIX,
};
use super::{ExtractionMatch, FieldExtractor, FieldMatcher, FieldValue};

/// Which price a candidate represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceKind {
    PerGallon,
    Total,
}

/// A price found in receipt text.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceCandidate {
    pub kind: PriceKind,
    pub amount: ExtractionMatch<Decimal>,
}

/// Scan text for every price candidate, labeled ones first.
pub fn price_candidates(text: &str) -> Vec<PriceCandidate> {
    let mut labeled = Vec::new();

    for caps in TOTAL_LABELED.captures_iter(text) {
        let full_match = caps.get(0).unwrap();
        let number = caps.get(1).unwrap();
        if let Some(amount) = parse_amount(number.as_str()) {
            labeled.push(PriceCandidate {
                kind: PriceKind::Total,
                amount: ExtractionMatch::anchored(amount, full_match.as_str().trim())
                    .with_position(number.start(), number.end()),
            });
        }
    }
    let totals = labeled.len();

    for caps in UNIT_PRICE_LABELED.captures_iter(text) {
        let full_match = caps.get(0).unwrap();
        let number = caps.get(1).unwrap();
        let Some(amount) = parse_amount(number.as_str()) else {
            continue;
        };
        let candidate = ExtractionMatch::anchored(amount, full_match.as_str().trim())
            .with_position(number.start(), number.end());
        // "Total Price", "Total Sale Price" label a total
        if labeled[..totals].iter().any(|t| t.amount.overlaps(&candidate)) {
            continue;
        }
        labeled.push(PriceCandidate {
            kind: PriceKind::PerGallon,
            amount: candidate,
        });
    }

    for caps in UNIT_PRICE_SUFFIX.captures_iter(text) {
        let full_match = caps.get(0).unwrap();
        let number = caps.get(1).unwrap();
        if let Some(amount) = parse_amount(number.as_str()) {
            labeled.push(PriceCandidate {
                kind: PriceKind::PerGallon,
                amount: ExtractionMatch::anchored(amount, full_match.as_str().trim())
                    .with_position(number.start(), number.end()),
            });
        }
    }

    let mut bare = Vec::new();
    for regex in [&*CURRENCY_PREFIXED, &*CURRENCY_SUFFIXED] {
        for caps in regex.captures_iter(text) {
            let full_match = caps.get(0).unwrap();
            let number = caps.get(1).unwrap();
            let Some(amount) = parse_amount(number.as_str()) else {
                continue;
            };

            let candidate = ExtractionMatch::bare(amount, full_match.as_str().trim())
                .with_position(number.start(), number.end());
            if labeled.iter().any(|l| l.amount.overlaps(&candidate))
                || bare.iter().any(|b: &PriceCandidate| b.amount.overlaps(&candidate))
            {
                continue;
            }

            // Fuel prices are quoted to a tenth of a cent
            let kind = if fraction_digits(number.as_str()) == 3 {
                PriceKind::PerGallon
            } else {
                PriceKind::Total
            };
            bare.push(PriceCandidate {
                kind,
                amount: candidate,
            });
        }
    }

    labeled.extend(bare);
    labeled.sort_by_key(|c| c.amount.position.map(|(start, _)| start));
    labeled
}

fn candidates_of(text: &str, kind: PriceKind) -> Vec<ExtractionMatch<Decimal>> {
    price_candidates(text)
        .into_iter()
        .filter(|c| c.kind == kind)
        .map(|c| c.amount)
        .collect()
}

/// Unit price per gallon extractor.
#[derive(Default)]
pub struct UnitPriceExtractor;

impl UnitPriceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for UnitPriceExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        super::select_best(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        candidates_of(text, PriceKind::PerGallon)
    }
}

impl FieldMatcher for UnitPriceExtractor {
    fn field(&self) -> Field {
        Field::PricePerGallon
    }

    fn candidates(&self, text: &str) -> Vec<ExtractionMatch<FieldValue>> {
        self.extract_all(text)
            .into_iter()
            .map(|m| m.map(FieldValue::PricePerGallon))
            .collect()
    }
}

/// Sale total extractor.
#[derive(Default)]
pub struct TotalPriceExtractor;

impl TotalPriceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for TotalPriceExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        super::select_best(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        candidates_of(text, PriceKind::Total)
    }
}

impl FieldMatcher for TotalPriceExtractor {
    fn field(&self) -> Field {
        Field::TotalPrice
    }

    fn candidates(&self, text: &str) -> Vec<ExtractionMatch<FieldValue>> {
        self.extract_all(text)
            .into_iter()
            .map(|m| m.map(FieldValue::TotalPrice))
            .collect()
    }
}

/// Parse a US-formatted amount (e.g., "1,234.56").
pub fn parse_amount(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.replace(',', "")).ok()
}

fn fraction_digits(s: &str) -> usize {
    s.rsplit_once('.').map_or(0, |(_, frac)| frac.len())
}
