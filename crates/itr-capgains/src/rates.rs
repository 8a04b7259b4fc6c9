//! # Exchange-Rate Lookup
//!
//! Foreign-currency amounts are converted at the rate effective on a
//! transaction date. The engine only reads rates; the caller owns the
//! source and may share it across concurrent conversions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ConversionError;

/// Maps a date to a foreign-to-rupee conversion rate.
pub trait ExchangeRateSource {
    /// The rate effective on `date`, or `None` when the source has no rate.
    fn rate_on(&self, date: NaiveDate) -> Option<Decimal>;
}

impl<F> ExchangeRateSource for F
where
    F: Fn(NaiveDate) -> Option<Decimal>,
{
    fn rate_on(&self, date: NaiveDate) -> Option<Decimal> {
        self(date)
    }
}

/// An in-memory table of daily rates.
///
/// Deserializes from a JSON object keyed by ISO date:
///
/// ```json
/// { "2023-06-01": "82.45", "2022-01-03": "74.30" }
/// ```
///
/// Lookups are exact; there is no carry-forward from the previous
/// business day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<NaiveDate, Decimal>,
}

impl RateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the rate for `date`.
    pub fn insert(&mut self, date: NaiveDate, rate: Decimal) -> Option<Decimal> {
        self.rates.insert(date, rate)
    }

    /// Builder: add a rate.
    pub fn with_rate(mut self, date: NaiveDate, rate: Decimal) -> Self {
        self.rates.insert(date, rate);
        self
    }

    /// Number of dates covered.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Whether the table holds no rates.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Parse a JSON rate table.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl ExchangeRateSource for RateTable {
    fn rate_on(&self, date: NaiveDate) -> Option<Decimal> {
        self.rates.get(&date).copied()
    }
}

impl FromIterator<(NaiveDate, Decimal)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Decimal)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

/// Look up a rate that the conversion cannot proceed without.
pub(crate) fn required_rate(
    source: &dyn ExchangeRateSource,
    date: NaiveDate,
    instrument: &str,
) -> Result<Decimal, ConversionError> {
    match source.rate_on(date) {
        None => Err(ConversionError::MissingExchangeRate {
            date,
            instrument: instrument.to_string(),
        }),
        Some(rate) if rate <= Decimal::ZERO => Err(ConversionError::ZeroExchangeRate {
            date,
            instrument: instrument.to_string(),
        }),
        Some(rate) => Ok(rate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn table_lookup_is_exact() {
        let table = RateTable::new().with_rate(d(2023, 6, 1), dec!(82.45));
        assert_eq!(table.rate_on(d(2023, 6, 1)), Some(dec!(82.45)));
        assert_eq!(table.rate_on(d(2023, 6, 2)), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn table_parses_from_json() {
        let table =
            RateTable::from_json_str(r#"{"2023-06-01": "82.45", "2022-01-03": 74}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rate_on(d(2022, 1, 3)), Some(dec!(74)));
    }

    #[test]
    fn closures_are_rate_sources() {
        let flat = |_: NaiveDate| Some(dec!(80));
        assert_eq!(flat.rate_on(d(2020, 1, 1)), Some(dec!(80)));
    }

    #[test]
    fn required_rate_rejects_missing_and_zero() {
        let table = RateTable::new().with_rate(d(2023, 6, 1), Decimal::ZERO);
        let err = required_rate(&table, d(2023, 6, 1), "ACME").unwrap_err();
        assert!(matches!(err, ConversionError::ZeroExchangeRate { .. }));
        let err = required_rate(&table, d(2023, 6, 2), "ACME").unwrap_err();
        assert_eq!(
            err,
            ConversionError::MissingExchangeRate {
                date: d(2023, 6, 2),
                instrument: "ACME".to_string()
            }
        );
    }
}
