//! Flat, fixed-width rows handed to the persistence sink.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::EnrichedRecord;
use crate::error::SinkError;

/// Column headers, one per cell, in sheet order.
pub const COLUMNS: [&str; 11] = [
    "Date",
    "Time",
    "Invoice Number",
    "Gallons",
    "Price per Gallon",
    "Total",
    "Address",
    "Odometer",
    "Miles Driven",
    "MPG",
    "Warning",
];

/// Index of the odometer column in [`COLUMNS`].
pub const ODOMETER_COLUMN: usize = 7;

/// One spreadsheet row. Every column is present; absent values are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<String>>", into = "Vec<Option<String>>")]
pub struct SheetRow {
    cells: Vec<Option<String>>,
}

impl SheetRow {
    /// Build a row from cells in [`COLUMNS`] order.
    ///
    /// Returns `None` when the cell count does not match the column count.
    pub fn from_cells(cells: Vec<Option<String>>) -> Option<Self> {
        (cells.len() == COLUMNS.len()).then_some(Self { cells })
    }

    /// Cell values in column order.
    pub fn cells(&self) -> &[Option<String>] {
        &self.cells
    }

    /// Look up a cell by column header.
    pub fn get(&self, column: &str) -> Option<&str> {
        COLUMNS
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.cells.get(i))
            .and_then(|cell| cell.as_deref())
    }

    /// Odometer reading stored in this row, if any.
    pub fn odometer(&self) -> Option<u64> {
        self.cells
            .get(ODOMETER_COLUMN)
            .and_then(|cell| cell.as_deref())
            .and_then(|s| s.trim().parse().ok())
    }

    /// Column/value pairs in column order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        COLUMNS
            .iter()
            .copied()
            .zip(self.cells.iter().map(|c| c.as_deref()))
    }

    /// Cells as plain strings, absent values rendered empty.
    pub fn to_record(&self) -> Vec<String> {
        self.cells
            .iter()
            .map(|c| c.clone().unwrap_or_default())
            .collect()
    }

    /// Flat JSON object keyed by column header; absent values are `null`.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (column, value) in self.entries() {
            let value = value.map_or(Value::Null, |v| Value::String(v.to_string()));
            map.insert(column.to_string(), value);
        }
        Value::Object(map)
    }
}

impl TryFrom<Vec<Option<String>>> for SheetRow {
    type Error = SinkError;

    fn try_from(cells: Vec<Option<String>>) -> Result<Self, Self::Error> {
        let found = cells.len();
        Self::from_cells(cells).ok_or(SinkError::ColumnMismatch {
            expected: COLUMNS.len(),
            found,
        })
    }
}

impl From<SheetRow> for Vec<Option<String>> {
    fn from(row: SheetRow) -> Self {
        row.cells
    }
}

impl From<&EnrichedRecord> for SheetRow {
    fn from(enriched: &EnrichedRecord) -> Self {
        let record = &enriched.record;
        let metrics = &enriched.metrics;
        let prices = &enriched.prices;

        let cells = vec![
            record.date.map(|d| d.format("%Y-%m-%d").to_string()),
            record.time.map(|t| t.format("%H:%M").to_string()),
            record.invoice_number.clone(),
            record.gallons.map(|g| g.normalize().to_string()),
            prices.price_per_gallon.map(|p| p.to_string()),
            prices.total_price.map(|p| p.to_string()),
            record.address.clone(),
            record.odometer.map(|o| o.to_string()),
            metrics.miles_driven.map(|m| m.to_string()),
            metrics.miles_per_gallon.map(|m| m.normalize().to_string()),
            metrics.warning.map(|w| w.to_string()),
        ];

        Self { cells }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{DerivedPrices, FuelRecord, TripMetrics};
    use chrono::{NaiveDate, NaiveTime};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn enriched() -> EnrichedRecord {
        EnrichedRecord {
            record: FuelRecord {
                date: NaiveDate::from_ymd_opt(2024, 4, 12),
                time: NaiveTime::from_hms_opt(14, 32, 0),
                gallons: Some(Decimal::new(12500, 3)),
                total_price: Some(Decimal::new(4500, 2)),
                odometer: Some(55230),
                ..FuelRecord::new()
            },
            metrics: TripMetrics {
                miles_driven: Some(230),
                miles_per_gallon: Some(Decimal::new(1840, 2)),
                warning: None,
            },
            prices: DerivedPrices {
                total_price: Some(Decimal::new(4500, 2)),
                ..DerivedPrices::default()
            },
        }
    }

    #[test]
    fn test_row_has_every_column() {
        let row = SheetRow::from(&enriched());

        assert_eq!(row.cells().len(), COLUMNS.len());
        assert_eq!(row.get("Date"), Some("2024-04-12"));
        assert_eq!(row.get("Time"), Some("14:32"));
        assert_eq!(row.get("Gallons"), Some("12.5"));
        assert_eq!(row.get("Total"), Some("45.00"));
        assert_eq!(row.get("Miles Driven"), Some("230"));
        assert_eq!(row.get("MPG"), Some("18.4"));
        assert_eq!(row.get("Address"), None);
        assert_eq!(row.odometer(), Some(55230));
    }

    #[test]
    fn test_absent_cells_are_explicit() {
        let row = SheetRow::from(&enriched());
        let json = row.to_json();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), COLUMNS.len());
        assert!(obj["Address"].is_null());
        assert!(obj["Warning"].is_null());

        let record = row.to_record();
        assert_eq!(record[6], "");
    }

    #[test]
    fn test_deserialize_checks_width() {
        assert!(serde_json::from_str::<SheetRow>("[]").is_err());
        assert!(serde_json::from_str::<SheetRow>(r#"{"cells":[]}"#).is_err());

        let row = SheetRow::from(&enriched());
        let json = serde_json::to_string(&row).unwrap();
        let restored: SheetRow = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.odometer(), Some(55230));
    }

    #[test]
    fn test_from_cells_checks_width() {
        assert!(SheetRow::from_cells(vec![None; 3]).is_none());
        assert!(SheetRow::from_cells(vec![None; COLUMNS.len()]).is_some());
    }
}
