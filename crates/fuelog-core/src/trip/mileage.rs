//! Trip mileage and fuel efficiency.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::models::config::MileageConfig;
use crate::models::record::{DataQualityWarning, FuelRecord, TripMetrics};

/// Computes trip metrics from a record and the previous odometer reading.
///
/// The calculator holds no state between calls; the previous reading is
/// always supplied by the caller.
#[derive(Debug, Clone, Copy)]
pub struct MileageCalculator {
    mpg_precision: u32,
}

impl MileageCalculator {
    pub fn new() -> Self {
        Self { mpg_precision: 2 }
    }

    pub fn from_config(config: &MileageConfig) -> Self {
        Self::new().with_precision(config.mpg_precision)
    }

    /// Set the number of decimal places kept for miles per gallon.
    pub fn with_precision(mut self, places: u32) -> Self {
        self.mpg_precision = places;
        self
    }

    pub fn compute(&self, record: &FuelRecord, previous_odometer: Option<u64>) -> TripMetrics {
        let (Some(current), Some(previous)) = (record.odometer, previous_odometer) else {
            return TripMetrics::absent();
        };

        if current < previous {
            warn!(
                "Odometer regression: current reading {} is below previous reading {}",
                current, previous
            );
            return TripMetrics {
                warning: Some(DataQualityWarning::OdometerRegression { current, previous }),
                ..TripMetrics::absent()
            };
        }

        let miles_driven = current - previous;
        let miles_per_gallon = record.gallons.and_then(|gallons| {
            if gallons <= Decimal::ZERO {
                return None;
            }
            Decimal::from(miles_driven)
                .checked_div(gallons)
                .map(|mpg| {
                    mpg.round_dp_with_strategy(
                        self.mpg_precision,
                        RoundingStrategy::MidpointAwayFromZero,
                    )
                    .normalize()
                })
        });

        TripMetrics {
            miles_driven: Some(miles_driven),
            miles_per_gallon,
            warning: None,
        }
    }
}

impl Default for MileageCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute trip metrics with default precision.
pub fn compute_metrics(record: &FuelRecord, previous_odometer: Option<u64>) -> TripMetrics {
    MileageCalculator::new().compute(record, previous_odometer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn record(odometer: Option<u64>, gallons: Option<&str>) -> FuelRecord {
        FuelRecord {
            odometer,
            gallons: gallons.map(|g| Decimal::from_str(g).unwrap()),
            ..FuelRecord::new()
        }
    }

    #[test]
    fn test_miles_and_mpg() {
        let metrics = compute_metrics(&record(Some(55230), Some("12.500")), Some(55000));

        assert_eq!(metrics.miles_driven, Some(230));
        assert_eq!(metrics.miles_per_gallon, Some(Decimal::from_str("18.4").unwrap()));
        assert_eq!(metrics.warning, None);
    }

    #[test]
    fn test_miles_are_exact() {
        for (previous, current) in [(0, 0), (0, 1), (99_999, 100_000), (10, u64::MAX)] {
            let metrics = compute_metrics(&record(Some(current), None), Some(previous));
            assert_eq!(metrics.miles_driven, Some(current - previous));
        }
    }

    #[test]
    fn test_odometer_regression() {
        let metrics = compute_metrics(&record(Some(54000), Some("10")), Some(55000));

        assert_eq!(metrics.miles_driven, None);
        assert_eq!(metrics.miles_per_gallon, None);
        assert_eq!(
            metrics.warning,
            Some(DataQualityWarning::OdometerRegression {
                current: 54000,
                previous: 55000
            })
        );
    }

    #[test]
    fn test_first_entry_has_no_metrics() {
        let metrics = compute_metrics(&record(Some(55230), Some("12.5")), None);
        assert_eq!(metrics, TripMetrics::absent());
    }

    #[test]
    fn test_missing_current_odometer() {
        let metrics = compute_metrics(&record(None, Some("12.5")), Some(55000));
        assert_eq!(metrics, TripMetrics::absent());
    }

    #[test]
    fn test_no_mpg_without_gallons() {
        let metrics = compute_metrics(&record(Some(55230), None), Some(55000));
        assert_eq!(metrics.miles_driven, Some(230));
        assert_eq!(metrics.miles_per_gallon, None);

        let metrics = compute_metrics(&record(Some(55230), Some("0.000")), Some(55000));
        assert_eq!(metrics.miles_driven, Some(230));
        assert_eq!(metrics.miles_per_gallon, None);
    }

    #[test]
    fn test_mpg_precision() {
        let calculator = MileageCalculator::new().with_precision(3);
        let metrics = calculator.compute(&record(Some(100), Some("3")), Some(0));
        assert_eq!(metrics.miles_per_gallon, Some(Decimal::from_str("33.333").unwrap()));

        let metrics = compute_metrics(&record(Some(200), Some("3")), Some(0));
        assert_eq!(metrics.miles_per_gallon, Some(Decimal::from_str("66.67").unwrap()));
    }

    #[test]
    fn test_compute_is_idempotent() {
        let input = record(Some(55230), Some("12.5"));
        assert_eq!(
            compute_metrics(&input, Some(55000)),
            compute_metrics(&input, Some(55000))
        );
    }
}
