//! Filling in a missing price from the other price and the gallons.
//!
//! The extractor never computes one price from another; callers that want
//! both prices on the logged row use [`derive_prices`].

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::record::{DerivedPrices, FuelRecord};

/// Decimal places for a derived per-gallon price.
pub const UNIT_PRICE_PRECISION: u32 = 3;

/// Decimal places for a derived total.
pub const TOTAL_PRECISION: u32 = 2;

/// Effective prices for a record, deriving whichever one is missing.
pub fn derive_prices(record: &FuelRecord) -> DerivedPrices {
    let gallons = record.gallons.filter(|g| *g > Decimal::ZERO);

    let mut prices = DerivedPrices {
        price_per_gallon: record.price_per_gallon,
        total_price: record.total_price,
        ..DerivedPrices::default()
    };

    if prices.price_per_gallon.is_none() {
        if let (Some(total), Some(gallons)) = (record.total_price, gallons) {
            prices.price_per_gallon = total
                .checked_div(gallons)
                .map(|p| round(p, UNIT_PRICE_PRECISION));
            prices.price_per_gallon_derived = prices.price_per_gallon.is_some();
        }
    }

    if prices.total_price.is_none() {
        if let (Some(unit), Some(gallons)) = (record.price_per_gallon, record.gallons) {
            prices.total_price = unit
                .checked_mul(gallons)
                .map(|t| round(t, TOTAL_PRECISION));
            prices.total_price_derived = prices.total_price.is_some();
        }
    }

    prices
}

fn round(value: Decimal, places: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_derive_unit_price_from_total() {
        let record = FuelRecord {
            gallons: Some(dec("12.5")),
            total_price: Some(dec("45.00")),
            ..FuelRecord::new()
        };

        let prices = derive_prices(&record);
        assert_eq!(prices.price_per_gallon, Some(dec("3.600")));
        assert_eq!(prices.price_per_gallon.unwrap().to_string(), "3.600");
        assert!(prices.price_per_gallon_derived);
        assert_eq!(prices.total_price, Some(dec("45.00")));
        assert!(!prices.total_price_derived);
    }

    #[test]
    fn test_derive_total_from_unit_price() {
        let record = FuelRecord {
            gallons: Some(dec("10.214")),
            price_per_gallon: Some(dec("3.459")),
            ..FuelRecord::new()
        };

        let prices = derive_prices(&record);
        assert_eq!(prices.total_price, Some(dec("35.33")));
        assert!(prices.total_price_derived);
    }

    #[test]
    fn test_extracted_prices_are_kept() {
        let record = FuelRecord {
            gallons: Some(dec("10")),
            price_per_gallon: Some(dec("3.499")),
            total_price: Some(dec("30.00")),
            ..FuelRecord::new()
        };

        let prices = derive_prices(&record);
        assert_eq!(prices.price_per_gallon, Some(dec("3.499")));
        assert_eq!(prices.total_price, Some(dec("30.00")));
        assert!(!prices.price_per_gallon_derived && !prices.total_price_derived);
    }

    #[test]
    fn test_nothing_derived_without_gallons() {
        let record = FuelRecord {
            total_price: Some(dec("45.00")),
            ..FuelRecord::new()
        };
        assert_eq!(derive_prices(&record).price_per_gallon, None);

        let record = FuelRecord {
            gallons: Some(Decimal::ZERO),
            total_price: Some(dec("45.00")),
            ..FuelRecord::new()
        };
        assert_eq!(derive_prices(&record).price_per_gallon, None);
    }
}
