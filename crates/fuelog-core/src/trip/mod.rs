//! Trip metrics derived from fuel records.

pub mod mileage;
pub mod pricing;

pub use mileage::{compute_metrics, MileageCalculator};
pub use pricing::derive_prices;

use crate::models::record::{EnrichedRecord, FuelRecord};

/// Attach trip metrics and effective prices to a record.
pub fn enrich(
    calculator: &MileageCalculator,
    record: FuelRecord,
    previous_odometer: Option<u64>,
) -> EnrichedRecord {
    let metrics = calculator.compute(&record, previous_odometer);
    let prices = derive_prices(&record);

    EnrichedRecord {
        record,
        metrics,
        prices,
    }
}
