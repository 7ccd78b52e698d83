//! Fuel purchase records and the metrics derived from them.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured fields extracted from a single fuel receipt.
///
/// Every field is optional. An absent field is `None` and serializes as
/// `null`; it is never replaced by a zero or empty placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelRecord {
    /// Purchase date.
    pub date: Option<NaiveDate>,

    /// Purchase time of day.
    pub time: Option<NaiveTime>,

    /// Invoice, receipt or ticket number.
    pub invoice_number: Option<String>,

    /// Fuel volume in gallons.
    pub gallons: Option<Decimal>,

    /// Unit price per gallon.
    pub price_per_gallon: Option<Decimal>,

    /// Total amount of the sale.
    pub total_price: Option<Decimal>,

    /// Station address.
    pub address: Option<String>,

    /// Odometer reading at the time of purchase.
    pub odometer: Option<u64>,
}

impl FuelRecord {
    /// Create a record with every field absent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given field holds a value.
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Date => self.date.is_some(),
            Field::Time => self.time.is_some(),
            Field::InvoiceNumber => self.invoice_number.is_some(),
            Field::Gallons => self.gallons.is_some(),
            Field::PricePerGallon => self.price_per_gallon.is_some(),
            Field::TotalPrice => self.total_price.is_some(),
            Field::Address => self.address.is_some(),
            Field::Odometer => self.odometer.is_some(),
        }
    }

    /// Fields that could not be extracted, in column order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL.iter().copied().filter(|f| !self.has(*f)).collect()
    }

    /// True when no field at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.missing_fields().len() == Field::ALL.len()
    }
}

/// A named unit of information extracted from receipt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Time,
    InvoiceNumber,
    Gallons,
    PricePerGallon,
    TotalPrice,
    Address,
    Odometer,
}

impl Field {
    /// All fields in record order.
    pub const ALL: [Field; 8] = [
        Field::Date,
        Field::Time,
        Field::InvoiceNumber,
        Field::Gallons,
        Field::PricePerGallon,
        Field::TotalPrice,
        Field::Address,
        Field::Odometer,
    ];

    /// Snake-case field name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Time => "time",
            Field::InvoiceNumber => "invoice_number",
            Field::Gallons => "gallons",
            Field::PricePerGallon => "price_per_gallon",
            Field::TotalPrice => "total_price",
            Field::Address => "address",
            Field::Odometer => "odometer",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A data-quality condition detected while computing trip metrics.
///
/// Warnings are attached to the output instead of failing the computation,
/// so the caller decides whether to log, correct or skip the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// The new odometer reading is lower than the previous one.
    OdometerRegression { current: u64, previous: u64 },
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataQualityWarning::OdometerRegression { current, previous } => write!(
                f,
                "odometer regression: current reading {} is below previous reading {}",
                current, previous
            ),
        }
    }
}

/// Distance and efficiency derived from a record and the previous odometer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripMetrics {
    /// Miles since the previous reading.
    pub miles_driven: Option<u64>,

    /// Miles driven per gallon purchased.
    pub miles_per_gallon: Option<Decimal>,

    /// Data-quality condition found while computing, if any.
    pub warning: Option<DataQualityWarning>,
}

impl TripMetrics {
    /// Metrics with nothing derived and no warning.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn has_warning(&self) -> bool {
        self.warning.is_some()
    }
}

/// Prices filled in from the other price and the gallons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedPrices {
    /// Effective price per gallon (extracted or derived).
    pub price_per_gallon: Option<Decimal>,

    /// Whether `price_per_gallon` was derived rather than extracted.
    pub price_per_gallon_derived: bool,

    /// Effective total (extracted or derived).
    pub total_price: Option<Decimal>,

    /// Whether `total_price` was derived rather than extracted.
    pub total_price_derived: bool,
}

/// A record together with everything computed from it, ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub record: FuelRecord,
    pub metrics: TripMetrics,
    pub prices: DerivedPrices,
}
