//! # Conversion Entry Points
//!
//! [`compute`] runs classify, aggregate and synthesize over a mixed
//! transaction list. [`convert`] wraps it in a tagged outcome so that a
//! failed conversion is a reportable value rather than a fault.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use itr_core::{EngineConfig, TaxYear};

use crate::aggregate::{aggregate_domestic, aggregate_foreign, AggregatedSource};
use crate::classify::classify;
use crate::error::ConversionError;
use crate::rates::ExchangeRateSource;
use crate::schedule::ScheduleCapitalGains;
use crate::synthesize::synthesize;
use crate::transaction::Transaction;

/// Everything produced by one conversion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsReport {
    /// Reporting period.
    pub tax_year: TaxYear,
    /// The synthesized schedule.
    pub schedule: ScheduleCapitalGains,
    /// Domestic fund aggregates.
    pub domestic: AggregatedSource,
    /// Foreign equity aggregates, including the conversion trail.
    pub foreign: AggregatedSource,
}

impl CapitalGainsReport {
    /// Transactions skipped for missing dates, across sources.
    pub fn skipped_transactions(&self) -> usize {
        self.domestic.skipped + self.foreign.skipped
    }

    /// Transactions disposed outside the period, across sources.
    pub fn out_of_period_transactions(&self) -> usize {
        self.domestic.out_of_period + self.foreign.out_of_period
    }

    /// Transactions that contributed to the schedule.
    pub fn included_transactions(&self) -> usize {
        self.domestic.transaction_count() + self.foreign.transaction_count()
    }
}

/// Tagged result of [`convert`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Whether a schedule was produced.
    pub success: bool,
    /// Summary on success, the failure reason otherwise.
    pub message: String,
    /// The report, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<CapitalGainsReport>,
}

/// Run the full conversion.
///
/// `rates` is required only when a foreign transaction falls inside the
/// period.
///
/// # Errors
///
/// - [`ConversionError::NoTransactions`] for an empty list.
/// - [`ConversionError::InvalidTaxYear`] for a malformed period.
/// - [`ConversionError::MissingRateSource`] when foreign disposals need
///   conversion and no source was given.
/// - [`ConversionError::MissingExchangeRate`] / [`ConversionError::ZeroExchangeRate`]
///   when the source cannot cover a required date.
pub fn compute(
    transactions: &[Transaction],
    tax_year: &str,
    rates: Option<&dyn ExchangeRateSource>,
    config: &EngineConfig,
) -> Result<CapitalGainsReport, ConversionError> {
    if transactions.is_empty() {
        return Err(ConversionError::NoTransactions);
    }
    let year = TaxYear::parse(tax_year)?;

    let domestic_classified = classify(
        transactions.iter().filter_map(|t| match t {
            Transaction::DomesticFund(tx) => Some(tx),
            Transaction::ForeignEquity(_) => None,
        }),
        &year,
        config,
    );
    let foreign_classified = classify(
        transactions.iter().filter_map(|t| match t {
            Transaction::ForeignEquity(tx) => Some(tx),
            Transaction::DomesticFund(_) => None,
        }),
        &year,
        config,
    );

    let no_rates = |_: NaiveDate| -> Option<Decimal> { None };
    let rates: &dyn ExchangeRateSource = match rates {
        Some(source) => source,
        None if foreign_classified.classified_count() > 0 => {
            return Err(ConversionError::MissingRateSource);
        }
        None => &no_rates,
    };

    let domestic = aggregate_domestic(&domestic_classified, &year);
    let foreign = aggregate_foreign(&foreign_classified, &year, rates)?;
    let schedule = synthesize(&[&domestic, &foreign], &year, config);

    Ok(CapitalGainsReport {
        tax_year: year,
        schedule,
        domestic,
        foreign,
    })
}

/// Run the full conversion and report the result as a tagged outcome.
pub fn convert(
    transactions: &[Transaction],
    tax_year: &str,
    rates: Option<&dyn ExchangeRateSource>,
    config: &EngineConfig,
) -> ConversionOutcome {
    match compute(transactions, tax_year, rates, config) {
        Ok(report) => {
            let message = format!(
                "converted {} of {} transactions for {} ({} skipped, {} outside period)",
                report.included_transactions(),
                transactions.len(),
                report.tax_year,
                report.skipped_transactions(),
                report.out_of_period_transactions(),
            );
            tracing::info!(
                tax_year = %report.tax_year,
                included = report.included_transactions(),
                skipped = report.skipped_transactions(),
                out_of_period = report.out_of_period_transactions(),
                total_capital_gains = report.schedule.total_capital_gains,
                "conversion succeeded"
            );
            ConversionOutcome {
                success: true,
                message,
                report: Some(report),
            }
        }
        Err(e) => {
            tracing::warn!(tax_year, error = %e, "conversion failed");
            ConversionOutcome {
                success: false,
                message: e.to_string(),
                report: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RateTable;
    use crate::transaction::{AssetCategory, ForeignTransaction, FundTransaction, GainType};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn empty_list_is_a_failure_outcome() {
        let out = convert(&[], "2023-24", None, &EngineConfig::default());
        assert!(!out.success);
        assert_eq!(out.message, "no transactions found");
        assert!(out.report.is_none());
    }

    #[test]
    fn malformed_tax_year_fails() {
        let txs = vec![Transaction::from(ForeignTransaction::new("A"))];
        let err = compute(&txs, "2023-25", None, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, ConversionError::InvalidTaxYear(_)));
    }

    #[test]
    fn nothing_in_period_succeeds_zero_filled() {
        let txs = vec![Transaction::from(
            FundTransaction::new("Old", AssetCategory::Equity, GainType::LongTerm)
                .with_dates(d(2019, 1, 1), d(2021, 1, 1))
                .with_gain(dec!(500)),
        )];
        let report = compute(&txs, "2023-24", None, &EngineConfig::default()).unwrap();
        assert_eq!(report.schedule, ScheduleCapitalGains::zeroed());
        assert_eq!(report.out_of_period_transactions(), 1);
    }

    #[test]
    fn foreign_in_period_without_rates_fails() {
        let txs = vec![Transaction::from(
            ForeignTransaction::new("ACME").with_dates(d(2022, 1, 1), d(2023, 6, 1)),
        )];
        let err = compute(&txs, "2023-24", None, &EngineConfig::default()).unwrap_err();
        assert_eq!(err, ConversionError::MissingRateSource);
    }

    #[test]
    fn mixed_sources_combine() {
        let txs = vec![
            Transaction::from(
                FundTransaction::new("Eq", AssetCategory::Equity, GainType::LongTerm)
                    .with_dates(d(2022, 4, 1), d(2023, 6, 1))
                    .with_gain(dec!(10000)),
            ),
            Transaction::from(
                ForeignTransaction::new("ACME")
                    .with_dates(d(2022, 1, 1), d(2023, 6, 1))
                    .with_amounts(dec!(1), dec!(100), dec!(110)),
            ),
            Transaction::from(FundTransaction::new(
                "Undated",
                AssetCategory::Debt,
                GainType::ShortTerm,
            )),
        ];
        let rates = RateTable::new()
            .with_rate(d(2022, 1, 1), dec!(80))
            .with_rate(d(2023, 6, 1), dec!(80));
        let out = convert(&txs, "2023-24", Some(&rates), &EngineConfig::default());
        assert!(out.success, "{}", out.message);
        let report = out.report.unwrap();
        assert_eq!(report.schedule.long_term.equity_112a.capital_gain, 10000);
        assert_eq!(report.schedule.short_term.foreign_assets.capital_gain, 800);
        assert_eq!(report.schedule.total_capital_gains, 10800);
        assert_eq!(report.skipped_transactions(), 1);
        assert_eq!(report.included_transactions(), 2);
    }

    #[test]
    fn missing_rate_aborts_whole_call() {
        let txs = vec![
            Transaction::from(
                FundTransaction::new("Eq", AssetCategory::Equity, GainType::ShortTerm)
                    .with_dates(d(2023, 4, 1), d(2023, 6, 1))
                    .with_gain(dec!(100)),
            ),
            Transaction::from(
                ForeignTransaction::new("ACME").with_dates(d(2022, 1, 1), d(2023, 6, 1)),
            ),
        ];
        let rates = RateTable::new().with_rate(d(2023, 6, 1), dec!(80));
        let out = convert(&txs, "2023-24", Some(&rates), &EngineConfig::default());
        assert!(!out.success);
        assert!(out.message.contains("2022-01-01"));
        assert!(out.report.is_none());
    }
}
