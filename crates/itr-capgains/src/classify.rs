//! # Transaction Classifier
//!
//! Partitions one source's transactions into the four gain buckets
//! (equity/debt x short/long) after dropping disposals outside the
//! reporting period.
//!
//! ## Rules
//!
//! - **Domestic funds**: the statement's gain-type tag is authoritative.
//!   It is cross-checked against the holding period implied by the asset
//!   category and a disagreement is logged, never corrected. Hybrid
//!   schemes land in the debt buckets.
//! - **Foreign equity**: whole months between acquisition and disposal;
//!   up to the configured threshold (24 months) is short-term.
//!
//! A transaction missing either date is skipped and logged.

use serde::{Deserialize, Serialize};

use itr_core::tax_year::months_between;
use itr_core::{EngineConfig, TaxYear};

use crate::transaction::{AssetCategory, Disposal, ForeignTransaction, FundTransaction, GainType};

/// Asset class of a gain bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Equity shares and equity-oriented funds.
    Equity,
    /// Everything else (debt and hybrid funds).
    Debt,
}

impl From<AssetCategory> for AssetClass {
    fn from(category: AssetCategory) -> Self {
        match category {
            AssetCategory::Equity => Self::Equity,
            AssetCategory::Debt | AssetCategory::Hybrid => Self::Debt,
        }
    }
}

/// The (asset class x term) grouping key produced by classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GainBucket {
    /// Asset class.
    pub asset: AssetClass,
    /// Holding-period term.
    pub term: GainType,
}

impl GainBucket {
    /// Equity held short-term.
    pub const EQUITY_SHORT: Self = Self::new(AssetClass::Equity, GainType::ShortTerm);
    /// Equity held long-term.
    pub const EQUITY_LONG: Self = Self::new(AssetClass::Equity, GainType::LongTerm);
    /// Debt held short-term.
    pub const DEBT_SHORT: Self = Self::new(AssetClass::Debt, GainType::ShortTerm);
    /// Debt held long-term.
    pub const DEBT_LONG: Self = Self::new(AssetClass::Debt, GainType::LongTerm);

    /// Every bucket, in schedule order.
    pub const ALL: [Self; 4] = [
        Self::EQUITY_SHORT,
        Self::EQUITY_LONG,
        Self::DEBT_SHORT,
        Self::DEBT_LONG,
    ];

    /// Build a bucket key.
    pub const fn new(asset: AssetClass, term: GainType) -> Self {
        Self { asset, term }
    }
}

/// How a record of one source variant is assigned to a bucket.
pub trait Classify: Disposal {
    /// Choose the bucket given validated acquisition and disposal dates.
    fn gain_bucket(&self, holding_months: i32, config: &EngineConfig) -> GainBucket;
}

impl Classify for FundTransaction {
    fn gain_bucket(&self, holding_months: i32, config: &EngineConfig) -> GainBucket {
        let asset = AssetClass::from(self.asset_category);
        let threshold = match asset {
            AssetClass::Equity => config.equity_long_term_months,
            AssetClass::Debt => config.debt_long_term_months,
        };
        let implied = if holding_months > threshold {
            GainType::LongTerm
        } else {
            GainType::ShortTerm
        };
        if implied != self.gain_type {
            tracing::warn!(
                instrument = %self.instrument(),
                category = %self.asset_category,
                tagged = %self.gain_type,
                implied = %implied,
                holding_months,
                "statement gain type disagrees with holding period, keeping statement tag"
            );
        }
        GainBucket::new(asset, self.gain_type)
    }
}

impl Classify for ForeignTransaction {
    fn gain_bucket(&self, holding_months: i32, config: &EngineConfig) -> GainBucket {
        let term = if holding_months <= config.foreign_long_term_months {
            GainType::ShortTerm
        } else {
            GainType::LongTerm
        };
        GainBucket::new(AssetClass::Equity, term)
    }
}

/// Four disjoint sub-lists of one source's in-period transactions.
#[derive(Debug)]
pub struct Classified<'a, T> {
    /// Equity, short-term.
    pub equity_short: Vec<&'a T>,
    /// Equity, long-term.
    pub equity_long: Vec<&'a T>,
    /// Debt, short-term.
    pub debt_short: Vec<&'a T>,
    /// Debt, long-term.
    pub debt_long: Vec<&'a T>,
    /// Transactions dropped for a missing acquisition or disposal date.
    pub skipped: usize,
    /// Transactions dropped because the disposal falls outside the period.
    pub out_of_period: usize,
}

impl<'a, T> Classified<'a, T> {
    pub(crate) fn empty() -> Self {
        Self {
            equity_short: Vec::new(),
            equity_long: Vec::new(),
            debt_short: Vec::new(),
            debt_long: Vec::new(),
            skipped: 0,
            out_of_period: 0,
        }
    }

    /// The transactions assigned to `bucket`.
    pub fn bucket(&self, bucket: GainBucket) -> &[&'a T] {
        match (bucket.asset, bucket.term) {
            (AssetClass::Equity, GainType::ShortTerm) => &self.equity_short,
            (AssetClass::Equity, GainType::LongTerm) => &self.equity_long,
            (AssetClass::Debt, GainType::ShortTerm) => &self.debt_short,
            (AssetClass::Debt, GainType::LongTerm) => &self.debt_long,
        }
    }

    fn push(&mut self, bucket: GainBucket, tx: &'a T) {
        let list = match (bucket.asset, bucket.term) {
            (AssetClass::Equity, GainType::ShortTerm) => &mut self.equity_short,
            (AssetClass::Equity, GainType::LongTerm) => &mut self.equity_long,
            (AssetClass::Debt, GainType::ShortTerm) => &mut self.debt_short,
            (AssetClass::Debt, GainType::LongTerm) => &mut self.debt_long,
        };
        list.push(tx);
    }

    /// Number of transactions placed in any bucket.
    pub fn classified_count(&self) -> usize {
        GainBucket::ALL.iter().map(|b| self.bucket(*b).len()).sum()
    }
}

/// Partition `transactions` into gain buckets for `year`.
pub fn classify<'a, T, I>(
    transactions: I,
    year: &TaxYear,
    config: &EngineConfig,
) -> Classified<'a, T>
where
    T: Classify + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut out = Classified::empty();

    for tx in transactions {
        let (acquired, disposed) = match (tx.acquisition_date(), tx.disposal_date()) {
            (Some(a), Some(d)) => (a, d),
            (acquired, disposed) => {
                tracing::warn!(
                    instrument = %tx.instrument(),
                    has_acquisition_date = acquired.is_some(),
                    has_disposal_date = disposed.is_some(),
                    "skipping transaction without acquisition or disposal date"
                );
                out.skipped += 1;
                continue;
            }
        };

        if !year.contains(disposed) {
            tracing::debug!(
                instrument = %tx.instrument(),
                disposal_date = %disposed,
                tax_year = %year,
                "disposal outside reporting period"
            );
            out.out_of_period += 1;
            continue;
        }

        let months = months_between(acquired, disposed);
        let bucket = tx.gain_bucket(months, config);
        out.push(bucket, tx);
    }

    tracing::debug!(
        classified = out.classified_count(),
        skipped = out.skipped,
        out_of_period = out.out_of_period,
        tax_year = %year,
        "classified transactions"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fy() -> TaxYear {
        TaxYear::parse("2023-24").unwrap()
    }

    #[test]
    fn fund_tag_decides_bucket() {
        let txs = vec![
            FundTransaction::new("Eq", AssetCategory::Equity, GainType::LongTerm)
                .with_dates(d(2022, 5, 1), d(2023, 6, 5)),
            FundTransaction::new("Debt", AssetCategory::Debt, GainType::ShortTerm)
                .with_dates(d(2023, 1, 1), d(2023, 7, 1)),
            FundTransaction::new("Hyb", AssetCategory::Hybrid, GainType::LongTerm)
                .with_dates(d(2019, 1, 1), d(2023, 7, 1)),
        ];
        let cfg = EngineConfig::default();
        let out = classify(&txs, &fy(), &cfg);
        assert_eq!(out.equity_long.len(), 1);
        assert_eq!(out.debt_short.len(), 1);
        assert_eq!(out.debt_long.len(), 1);
        assert!(out.equity_short.is_empty());
    }

    #[test]
    fn fund_tag_kept_when_holding_period_disagrees() {
        // Held three months but tagged long-term: the tag wins.
        let txs = vec![FundTransaction::new("Eq", AssetCategory::Equity, GainType::LongTerm)
            .with_dates(d(2023, 4, 1), d(2023, 7, 1))];
        let out = classify(&txs, &fy(), &EngineConfig::default());
        assert_eq!(out.equity_long.len(), 1);
    }

    #[test]
    fn foreign_threshold_is_inclusive_of_24_months() {
        let txs = vec![
            ForeignTransaction::new("A").with_dates(d(2022, 1, 1), d(2023, 6, 1)),
            ForeignTransaction::new("B").with_dates(d(2021, 6, 1), d(2023, 6, 1)),
            ForeignTransaction::new("C").with_dates(d(2021, 5, 31), d(2023, 6, 1)),
        ];
        let out = classify(&txs, &fy(), &EngineConfig::default());
        // 17 and 24 months are short-term, 24 months + 1 day is still 24 whole months.
        assert_eq!(out.equity_short.len(), 3);
        assert!(out.equity_long.is_empty());

        let later = vec![ForeignTransaction::new("D").with_dates(d(2021, 5, 1), d(2023, 6, 1))];
        let out = classify(&later, &fy(), &EngineConfig::default());
        assert_eq!(out.equity_long.len(), 1);
    }

    #[test]
    fn foreign_never_lands_in_debt() {
        let txs = vec![ForeignTransaction::new("A").with_dates(d(2010, 1, 1), d(2023, 6, 1))];
        let out = classify(&txs, &fy(), &EngineConfig::default());
        assert!(out.debt_short.is_empty() && out.debt_long.is_empty());
    }

    #[test]
    fn missing_dates_are_skipped() {
        let mut no_acq = ForeignTransaction::new("A").with_amounts(dec!(1), dec!(1), dec!(2));
        no_acq.disposal_date = Some(d(2023, 6, 1));
        let no_disp = FundTransaction::new("B", AssetCategory::Debt, GainType::ShortTerm);
        let out = classify(std::slice::from_ref(&no_acq), &fy(), &EngineConfig::default());
        assert_eq!(out.skipped, 1);
        assert_eq!(out.classified_count(), 0);
        let out = classify(std::slice::from_ref(&no_disp), &fy(), &EngineConfig::default());
        assert_eq!(out.skipped, 1);
    }

    #[test]
    fn disposals_outside_period_are_dropped() {
        let txs = vec![
            ForeignTransaction::new("before").with_dates(d(2022, 1, 1), d(2023, 3, 31)),
            ForeignTransaction::new("first").with_dates(d(2022, 1, 1), d(2023, 4, 1)),
            ForeignTransaction::new("last").with_dates(d(2022, 1, 1), d(2024, 3, 31)),
            ForeignTransaction::new("after").with_dates(d(2022, 1, 1), d(2024, 4, 1)),
        ];
        let out = classify(&txs, &fy(), &EngineConfig::default());
        assert_eq!(out.out_of_period, 2);
        assert_eq!(out.classified_count(), 2);
    }

    #[test]
    fn bucket_accessor_matches_fields() {
        let txs = vec![FundTransaction::new("Eq", AssetCategory::Equity, GainType::ShortTerm)
            .with_dates(d(2023, 4, 1), d(2023, 5, 1))];
        let out = classify(&txs, &fy(), &EngineConfig::default());
        assert_eq!(out.bucket(GainBucket::EQUITY_SHORT).len(), 1);
        for b in [GainBucket::EQUITY_LONG, GainBucket::DEBT_SHORT, GainBucket::DEBT_LONG] {
            assert!(out.bucket(b).is_empty());
        }
    }
}
