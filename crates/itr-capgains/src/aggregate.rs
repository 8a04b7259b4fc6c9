//! # Aggregator
//!
//! Sums proceeds, cost basis and gain per gain bucket for one statement
//! source. All four buckets are always present in the output; a bucket
//! with no contributing transactions is exactly zero.
//!
//! ## Currency
//!
//! Domestic fund amounts are already in rupees. Foreign amounts are
//! converted per transaction:
//!
//! - proceeds at the disposal-date rate,
//! - cost basis at the acquisition-date rate,
//! - the broker-reported foreign gain once more at the disposal-date rate,
//!   giving a *constant-currency* gain.
//!
//! The rupee gain (`proceeds - cost_basis`) and the constant-currency gain
//! differ whenever the rate moved during the holding period. Both are kept.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use itr_core::{AccrualQuarter, TaxYear};

use crate::classify::{AssetClass, Classified, GainBucket};
use crate::error::ConversionError;
use crate::rates::{required_rate, ExchangeRateSource};
use crate::transaction::{Disposal, ForeignTransaction, FundTransaction, GainType, SourceKind};

// ---------------------------------------------------------------------------
// Aggregate types
// ---------------------------------------------------------------------------

/// Totals for one gain bucket, in rupees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedGain {
    /// Sale consideration.
    pub proceeds: Decimal,
    /// Cost of acquisition.
    pub cost_basis: Decimal,
    /// Net gain (negative for a net loss).
    pub gain: Decimal,
    /// Foreign gain converted at the disposal-date rate. Equal to `gain`
    /// for domestic sources.
    pub constant_currency_gain: Decimal,
    /// Tax withheld abroad, converted at the disposal-date rate.
    pub foreign_tax_paid: Decimal,
    /// Number of contributing transactions.
    pub transaction_count: usize,
    /// `gain` split across the five accrual periods of the year.
    pub quarterly_gain: [Decimal; AccrualQuarter::COUNT],
}

impl AggregatedGain {
    /// A bucket with no contributions.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether nothing contributed to this bucket.
    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }

    fn add(&mut self, amounts: &DisposalAmounts, quarter: Option<AccrualQuarter>) {
        self.proceeds = self.proceeds.saturating_add(amounts.proceeds);
        self.cost_basis = self.cost_basis.saturating_add(amounts.cost_basis);
        self.gain = self.gain.saturating_add(amounts.gain);
        self.constant_currency_gain = self
            .constant_currency_gain
            .saturating_add(amounts.constant_currency_gain);
        self.foreign_tax_paid = self.foreign_tax_paid.saturating_add(amounts.foreign_tax_paid);
        self.transaction_count += 1;
        if let Some(q) = quarter {
            let slot = &mut self.quarterly_gain[q.index()];
            *slot = slot.saturating_add(amounts.gain);
        }
    }
}

/// The four buckets of one source, always zero-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketTotals {
    /// Equity, short-term.
    pub equity_short: AggregatedGain,
    /// Equity, long-term.
    pub equity_long: AggregatedGain,
    /// Debt, short-term.
    pub debt_short: AggregatedGain,
    /// Debt, long-term.
    pub debt_long: AggregatedGain,
}

impl BucketTotals {
    /// Four zero buckets.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The totals for `bucket`.
    pub fn get(&self, bucket: GainBucket) -> &AggregatedGain {
        match (bucket.asset, bucket.term) {
            (AssetClass::Equity, GainType::ShortTerm) => &self.equity_short,
            (AssetClass::Equity, GainType::LongTerm) => &self.equity_long,
            (AssetClass::Debt, GainType::ShortTerm) => &self.debt_short,
            (AssetClass::Debt, GainType::LongTerm) => &self.debt_long,
        }
    }

    /// Mutable totals for `bucket`.
    pub fn get_mut(&mut self, bucket: GainBucket) -> &mut AggregatedGain {
        match (bucket.asset, bucket.term) {
            (AssetClass::Equity, GainType::ShortTerm) => &mut self.equity_short,
            (AssetClass::Equity, GainType::LongTerm) => &mut self.equity_long,
            (AssetClass::Debt, GainType::ShortTerm) => &mut self.debt_short,
            (AssetClass::Debt, GainType::LongTerm) => &mut self.debt_long,
        }
    }

    /// Buckets paired with their keys, in schedule order.
    pub fn iter(&self) -> impl Iterator<Item = (GainBucket, &AggregatedGain)> {
        GainBucket::ALL.into_iter().map(move |b| (b, self.get(b)))
    }
}

/// A long-term domestic equity disposal, kept for the grandfathering schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityDisposal {
    /// ISIN, if known.
    pub isin: Option<String>,
    /// Scheme or share name.
    pub name: String,
    /// Units sold.
    pub units: Decimal,
    /// Purchase date.
    pub acquisition_date: NaiveDate,
    /// Sale date.
    pub disposal_date: NaiveDate,
    /// Sale consideration.
    pub sale_value: Decimal,
    /// Actual cost of acquisition.
    pub actual_cost: Decimal,
}

/// Per-transaction record of a foreign currency conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedDisposal {
    /// ISIN or security name.
    pub instrument: String,
    /// Bucket the disposal was placed in.
    pub bucket: GainBucket,
    /// Rate applied to the cost basis.
    pub acquisition_rate: Decimal,
    /// Rate applied to proceeds, gain and foreign tax.
    pub disposal_rate: Decimal,
    /// Proceeds in rupees.
    pub proceeds: Decimal,
    /// Cost basis in rupees.
    pub cost_basis: Decimal,
    /// `proceeds - cost_basis`.
    pub gain: Decimal,
    /// Foreign gain at the disposal-date rate.
    pub constant_currency_gain: Decimal,
    /// Foreign tax paid in rupees.
    pub foreign_tax_paid: Decimal,
}

/// Aggregation output for one statement source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedSource {
    /// Statement family.
    pub source: SourceKind,
    /// Bucket totals.
    pub buckets: BucketTotals,
    /// Long-term equity disposals in disposal order (domestic only).
    pub equity_long_detail: Vec<EquityDisposal>,
    /// Conversion trail (foreign only).
    pub conversions: Vec<ConvertedDisposal>,
    /// Transactions skipped for missing dates.
    pub skipped: usize,
    /// Transactions disposed outside the reporting period.
    pub out_of_period: usize,
}

impl AggregatedSource {
    /// A source with four zero buckets.
    pub fn empty(source: SourceKind) -> Self {
        Self {
            source,
            buckets: BucketTotals::zero(),
            equity_long_detail: Vec::new(),
            conversions: Vec::new(),
            skipped: 0,
            out_of_period: 0,
        }
    }

    fn with_counts<T>(source: SourceKind, classified: &Classified<'_, T>) -> Self {
        let mut out = Self::empty(source);
        out.skipped = classified.skipped;
        out.out_of_period = classified.out_of_period;
        out
    }

    /// Total transactions aggregated across buckets.
    pub fn transaction_count(&self) -> usize {
        self.buckets.iter().map(|(_, g)| g.transaction_count).sum()
    }
}

struct DisposalAmounts {
    proceeds: Decimal,
    cost_basis: Decimal,
    gain: Decimal,
    constant_currency_gain: Decimal,
    foreign_tax_paid: Decimal,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Aggregate classified domestic fund transactions.
pub fn aggregate_domestic(
    classified: &Classified<'_, FundTransaction>,
    year: &TaxYear,
) -> AggregatedSource {
    let mut out = AggregatedSource::with_counts(SourceKind::DomesticFund, classified);

    for bucket in GainBucket::ALL {
        for tx in classified.bucket(bucket) {
            let amounts = DisposalAmounts {
                proceeds: tx.disposal_value,
                cost_basis: tx.acquisition_value,
                gain: tx.gain_loss,
                constant_currency_gain: tx.gain_loss,
                foreign_tax_paid: Decimal::ZERO,
            };
            let quarter = tx.disposal_date.and_then(|d| year.quarter_of(d));
            out.buckets.get_mut(bucket).add(&amounts, quarter);

            if bucket == GainBucket::EQUITY_LONG {
                // classify() only admits transactions carrying both dates.
                if let (Some(acquired), Some(disposed)) = (tx.acquisition_date, tx.disposal_date) {
                    out.equity_long_detail.push(EquityDisposal {
                        isin: tx.isin.clone(),
                        name: tx.scheme_name.clone(),
                        units: tx.units,
                        acquisition_date: acquired,
                        disposal_date: disposed,
                        sale_value: tx.disposal_value,
                        actual_cost: tx.acquisition_value,
                    });
                }
            }
        }
    }
    out.equity_long_detail.sort_by_key(|d| d.disposal_date);

    log_summary(&out);
    out
}

/// Aggregate classified foreign equity transactions, converting to rupees.
///
/// # Errors
///
/// Returns [`ConversionError::MissingExchangeRate`] or
/// [`ConversionError::ZeroExchangeRate`] for the first transaction whose
/// acquisition or disposal date has no usable rate. Nothing is returned
/// for the other buckets in that case.
pub fn aggregate_foreign(
    classified: &Classified<'_, ForeignTransaction>,
    year: &TaxYear,
    rates: &dyn ExchangeRateSource,
) -> Result<AggregatedSource, ConversionError> {
    let mut out = AggregatedSource::with_counts(SourceKind::ForeignEquity, classified);

    for bucket in GainBucket::ALL {
        for tx in classified.bucket(bucket) {
            let (Some(acquired), Some(disposed)) = (tx.acquisition_date, tx.disposal_date) else {
                continue;
            };
            let instrument = tx.instrument();
            let disposal_rate = required_rate(rates, disposed, instrument)?;
            let acquisition_rate = required_rate(rates, acquired, instrument)?;

            let proceeds = tx.disposal_value.saturating_mul(disposal_rate);
            let cost_basis = tx.acquisition_value.saturating_mul(acquisition_rate);
            let amounts = DisposalAmounts {
                proceeds,
                cost_basis,
                gain: proceeds.saturating_sub(cost_basis),
                constant_currency_gain: tx.gain_loss.saturating_mul(disposal_rate),
                foreign_tax_paid: tx.foreign_tax_paid.saturating_mul(disposal_rate),
            };
            out.buckets
                .get_mut(bucket)
                .add(&amounts, year.quarter_of(disposed));
            out.conversions.push(ConvertedDisposal {
                instrument: instrument.to_string(),
                bucket,
                acquisition_rate,
                disposal_rate,
                proceeds: amounts.proceeds,
                cost_basis: amounts.cost_basis,
                gain: amounts.gain,
                constant_currency_gain: amounts.constant_currency_gain,
                foreign_tax_paid: amounts.foreign_tax_paid,
            });
        }
    }

    log_summary(&out);
    Ok(out)
}

fn log_summary(source: &AggregatedSource) {
    for (bucket, totals) in source.buckets.iter() {
        tracing::debug!(
            source = %source.source,
            asset = ?bucket.asset,
            term = %bucket.term,
            transactions = totals.transaction_count,
            proceeds = %totals.proceeds,
            cost_basis = %totals.cost_basis,
            gain = %totals.gain,
            "aggregated bucket"
        );
    }
}
