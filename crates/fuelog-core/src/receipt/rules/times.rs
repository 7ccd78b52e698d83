//! Time-of-day extraction.

use chrono::NaiveTime;

use crate::models::record::Field;

use super::patterns::{TIME, TIME_LABEL};
use super::{char_before, ExtractionMatch, FieldExtractor, FieldMatcher, FieldValue};

/// Time field extractor for `HH:MM[:SS] [AM/PM]`.
#[derive(Default)]
pub struct TimeExtractor;

impl TimeExtractor {
    pub fn new() -> Self {
        Self
    }

    fn scan(&self, text: &str) -> Vec<ExtractionMatch<NaiveTime>> {
        let mut results = Vec::new();

        for caps in TIME.captures_iter(text) {
            let full_match = caps.get(0).unwrap();

            // Part of a longer number or a longer time
            if matches!(char_before(text, full_match.start()), Some(c) if c.is_ascii_digit() || c == ':')
            {
                continue;
            }
            let digits_end = caps.get(3).or_else(|| caps.get(2)).map_or(0, |m| m.end());
            if text[digits_end..].starts_with(|c: char| c.is_ascii_digit() || c == ':') {
                continue;
            }

            let hour: u32 = caps[1].parse().unwrap_or(99);
            let minute: u32 = caps[2].parse().unwrap_or(99);
            let second: u32 = caps.get(3).map_or(0, |s| s.as_str().parse().unwrap_or(99));
            let meridiem = caps.get(4).map(|m| m.as_str().to_ascii_lowercase());

            if let Some(time) = to_time(hour, minute, second, meridiem.as_deref()) {
                results.push(
                    ExtractionMatch::bare(time, full_match.as_str().trim())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

impl FieldExtractor for TimeExtractor {
    type Output = ExtractionMatch<NaiveTime>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        super::select_best(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in TIME_LABEL.captures_iter(text) {
            let value = caps.get(1).unwrap();
            if let Some(first) = self.scan(value.as_str()).into_iter().next() {
                let (start, end) = first.position.unwrap_or((0, 0));
                results.push(
                    ExtractionMatch::anchored(first.value, first.source)
                        .with_position(value.start() + start, value.start() + end),
                );
            }
        }

        results.extend(self.scan(text));
        results
    }
}

impl FieldMatcher for TimeExtractor {
    fn field(&self) -> Field {
        Field::Time
    }

    fn candidates(&self, text: &str) -> Vec<ExtractionMatch<FieldValue>> {
        self.extract_all(text)
            .into_iter()
            .map(|m| m.map(FieldValue::Time))
            .collect()
    }
}

fn to_time(hour: u32, minute: u32, second: u32, meridiem: Option<&str>) -> Option<NaiveTime> {
    let hour = match meridiem {
        Some(m) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (m, hour) {
                ("a", 12) => 0,
                ("a", h) => h,
                (_, 12) => 12,
                (_, h) => h + 12,
            }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, second)
}
