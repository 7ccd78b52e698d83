//! Date extraction for fuel receipts.

use chrono::NaiveDate;

use crate::models::config::DateOrder;
use crate::models::record::Field;

use super::patterns::{DATE_DAY_MONTH_NAME, DATE_LABEL, DATE_MONTH_NAME, DATE_NUMERIC, DATE_YMD};
use super::{ExtractionMatch, FieldExtractor, FieldMatcher, FieldValue};

/// Date field extractor.
pub struct DateExtractor {
    order: DateOrder,
}

impl DateExtractor {
    pub fn new() -> Self {
        Self {
            order: DateOrder::MonthFirst,
        }
    }

    /// Set the preferred order for ambiguous numeric dates.
    pub fn with_order(mut self, order: DateOrder) -> Self {
        self.order = order;
        self
    }

    /// Unlabeled dates in reading order.
    fn scan(&self, text: &str) -> Vec<ExtractionMatch<NaiveDate>> {
        let mut results: Vec<ExtractionMatch<NaiveDate>> = Vec::new();

        // MM/DD/YYYY or DD/MM/YYYY, resolved by the configured order
        for caps in DATE_NUMERIC.captures_iter(text) {
            let first: u32 = caps[1].parse().unwrap_or(0);
            let second: u32 = caps[2].parse().unwrap_or(0);
            let year = parse_year(&caps[3]);

            let (preferred, fallback) = match self.order {
                DateOrder::MonthFirst => ((first, second), (second, first)),
                DateOrder::DayFirst => ((second, first), (first, second)),
            };

            let date = NaiveDate::from_ymd_opt(year, preferred.0, preferred.1)
                .or_else(|| NaiveDate::from_ymd_opt(year, fallback.0, fallback.1));

            if let Some(date) = date {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::bare(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // YYYY-MM-DD or YYYY/MM/DD
        for caps in DATE_YMD.captures_iter(text) {
            let year: i32 = caps[1].parse().unwrap_or(0);
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::bare(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // "Apr 12, 2024"
        for caps in DATE_MONTH_NAME.captures_iter(text) {
            let month = month_to_number(&caps[1]);
            let day: u32 = caps[2].parse().unwrap_or(0);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::bare(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        // "12 April 2024"
        for caps in DATE_DAY_MONTH_NAME.captures_iter(text) {
            let day: u32 = caps[1].parse().unwrap_or(0);
            let month = month_to_number(&caps[2]);
            let year: i32 = caps[3].parse().unwrap_or(0);

            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                let full_match = caps.get(0).unwrap();
                results.push(
                    ExtractionMatch::bare(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results.sort_by_key(|m| m.position.map(|(start, _)| start));
        results
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        super::select_best(self.extract_all(text))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        // "Date: 04/12/2024" - the first date on a labeled line is anchored
        for caps in DATE_LABEL.captures_iter(text) {
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

impl FieldMatcher for DateExtractor {
    fn field(&self) -> Field {
        Field::Date
    }

    fn candidates(&self, text: &str) -> Vec<ExtractionMatch<FieldValue>> {
        self.extract_all(text)
            .into_iter()
            .map(|m| m.map(FieldValue::Date))
            .collect()
    }
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_to_number(month: &str) -> u32 {
    match month.to_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_date_mdy() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("04/12/2024");
        assert_eq!(result.unwrap().value, date(2024, 4, 12));
    }

    #[test]
    fn test_extract_date_ymd() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("2024-04-12");
        assert_eq!(result.unwrap().value, date(2024, 4, 12));
    }

    #[test]
    fn test_extract_date_month_name() {
        let extractor = DateExtractor::new();

        assert_eq!(extractor.extract("Apr 12, 2024").unwrap().value, date(2024, 4, 12));
        assert_eq!(extractor.extract("12 April 2024").unwrap().value, date(2024, 4, 12));
        assert_eq!(extractor.extract("September 3rd 2023").unwrap().value, date(2023, 9, 3));
    }

    #[test]
    fn test_ambiguous_date_uses_fixed_order() {
        let month_first = DateExtractor::new();
        let day_first = DateExtractor::new().with_order(DateOrder::DayFirst);

        assert_eq!(month_first.extract("04/05/2024").unwrap().value, date(2024, 4, 5));
        assert_eq!(day_first.extract("04/05/2024").unwrap().value, date(2024, 5, 4));
    }

    #[test]
    fn test_invalid_preferred_order_falls_back() {
        let extractor = DateExtractor::new();

        // 13 cannot be a month
        assert_eq!(extractor.extract("13/04/2024").unwrap().value, date(2024, 4, 13));
        assert!(extractor.extract("13/14/2024").is_none());
    }

    #[test]
    fn test_two_digit_year() {
        let extractor = DateExtractor::new();

        let result = extractor.extract("04/12/24");
        assert_eq!(result.unwrap().value, date(2024, 4, 12));
    }

    #[test]
    fn test_labeled_date_wins() {
        let extractor = DateExtractor::new();
        let text = "Printed 01/02/2024\nDate: 04/12/2024\n";

        let result = extractor.extract(text).unwrap();
        assert!(result.anchored);
        assert_eq!(result.value, date(2024, 4, 12));
    }

    #[test]
    fn test_first_date_wins_without_label() {
        let extractor = DateExtractor::new();
        let text = "2024-03-01 then 04/12/2024";

        assert_eq!(extractor.extract(text).unwrap().value, date(2024, 3, 1));
    }
}
