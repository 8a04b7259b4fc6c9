//! # Capital-Gains Schedule
//!
//! The nested capital-gains section of a return, in whole rupees. Every
//! sub-structure has a `zeroed()` constructor. The synthesizer always
//! starts from [`ScheduleCapitalGains::zeroed`] and overwrites what the
//! aggregates provide, so structurally required blocks are present even
//! when there is nothing to report.
//!
//! ## Totals
//!
//! Every "sum of" field is recomputed by [`ScheduleCapitalGains::recompute_totals`]
//! from already-rounded constituents. Nothing is carried over from a
//! previous synthesis.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use itr_core::amount::{positive, sum_rupees};
use itr_core::{to_rupees, AccrualQuarter};

use crate::aggregate::{AggregatedGain, EquityDisposal};

// ---------------------------------------------------------------------------
// Statutory codes
// ---------------------------------------------------------------------------

/// Statutory section under which a gain is taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionCode {
    /// Short-term gain on listed equity (preferential rate).
    #[serde(rename = "111A")]
    Sec111A,
    /// Long-term gain on listed equity (preferential rate, exemption applies).
    #[serde(rename = "112A")]
    Sec112A,
    /// Long-term gain on other assets (flat rate).
    #[serde(rename = "112")]
    Sec112,
    /// Taxed with other income at slab rates.
    #[serde(rename = "NORMAL")]
    NormalRate,
}

impl SectionCode {
    /// Return the statutory code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sec111A => "111A",
            Self::Sec112A => "112A",
            Self::Sec112 => "112",
            Self::NormalRate => "NORMAL",
        }
    }
}

impl std::fmt::Display for SectionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tax-rate bucket a gain is reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RateBucket {
    /// Short-term, preferential 15% (section 111A).
    #[serde(rename = "STCG15")]
    StcgPreferential15,
    /// Short-term, at applicable slab rates.
    #[serde(rename = "STCGAPPRATE")]
    StcgSlab,
    /// Long-term, preferential 10% (section 112A).
    #[serde(rename = "LTCG10")]
    LtcgPreferential10,
    /// Long-term, flat 20% (section 112).
    #[serde(rename = "LTCG20")]
    LtcgFlat20,
}

impl RateBucket {
    /// Order in which current-year losses are set off: highest rate first.
    pub const SET_OFF_ORDER: [Self; 4] = [
        Self::StcgSlab,
        Self::StcgPreferential15,
        Self::LtcgFlat20,
        Self::LtcgPreferential10,
    ];

    /// Return the schedule code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StcgPreferential15 => "STCG15",
            Self::StcgSlab => "STCGAPPRATE",
            Self::LtcgPreferential10 => "LTCG10",
            Self::LtcgFlat20 => "LTCG20",
        }
    }

    /// The section a bucket's gains are taxed under.
    pub fn section(&self) -> SectionCode {
        match self {
            Self::StcgPreferential15 => SectionCode::Sec111A,
            Self::StcgSlab => SectionCode::NormalRate,
            Self::LtcgPreferential10 => SectionCode::Sec112A,
            Self::LtcgFlat20 => SectionCode::Sec112,
        }
    }

    /// Whether the bucket holds long-term gains.
    pub fn is_long_term(&self) -> bool {
        match self {
            Self::StcgPreferential15 | Self::StcgSlab => false,
            Self::LtcgPreferential10 | Self::LtcgFlat20 => true,
        }
    }
}

impl std::fmt::Display for RateBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gain entries
// ---------------------------------------------------------------------------

/// One reported gain line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CapGainEntry {
    /// Sale consideration.
    pub full_value_of_consideration: i64,
    /// Cost of acquisition.
    pub cost_of_acquisition: i64,
    /// Gain (negative for a loss).
    pub capital_gain: i64,
    /// Statutory section.
    pub section: SectionCode,
    /// Rate bucket.
    pub rate_bucket: RateBucket,
}

impl CapGainEntry {
    /// A zero line for `rate_bucket`.
    pub fn zeroed(rate_bucket: RateBucket) -> Self {
        Self {
            full_value_of_consideration: 0,
            cost_of_acquisition: 0,
            capital_gain: 0,
            section: rate_bucket.section(),
            rate_bucket,
        }
    }

    /// Add an aggregated bucket, rounding each figure to rupees first.
    pub fn absorb(&mut self, gain: &AggregatedGain) {
        self.full_value_of_consideration = self
            .full_value_of_consideration
            .saturating_add(to_rupees(gain.proceeds));
        self.cost_of_acquisition = self
            .cost_of_acquisition
            .saturating_add(to_rupees(gain.cost_basis));
        self.capital_gain = self.capital_gain.saturating_add(to_rupees(gain.gain));
    }
}

/// Short-term gains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShortTermGains {
    /// Listed equity and equity funds (111A).
    #[serde(rename = "Equity111A")]
    pub equity_111a: CapGainEntry,
    /// Other domestic assets (slab rate).
    pub other_domestic: CapGainEntry,
    /// Foreign assets (slab rate).
    pub foreign_assets: CapGainEntry,
    /// Sum of gains at the preferential rate.
    pub total_at_preferential_rate: i64,
    /// Sum of gains at slab rates.
    pub total_at_slab_rate: i64,
    /// Preferential plus slab.
    pub total_short_term: i64,
}

impl ShortTermGains {
    /// All lines zero.
    pub fn zeroed() -> Self {
        Self {
            equity_111a: CapGainEntry::zeroed(RateBucket::StcgPreferential15),
            other_domestic: CapGainEntry::zeroed(RateBucket::StcgSlab),
            foreign_assets: CapGainEntry::zeroed(RateBucket::StcgSlab),
            total_at_preferential_rate: 0,
            total_at_slab_rate: 0,
            total_short_term: 0,
        }
    }

    /// Every gain line.
    pub fn entries(&self) -> [&CapGainEntry; 3] {
        [&self.equity_111a, &self.other_domestic, &self.foreign_assets]
    }

    fn recompute_totals(&mut self) {
        self.total_at_preferential_rate = self.equity_111a.capital_gain;
        self.total_at_slab_rate = sum_rupees([
            self.other_domestic.capital_gain,
            self.foreign_assets.capital_gain,
        ]);
        self.total_short_term =
            sum_rupees([self.total_at_preferential_rate, self.total_at_slab_rate]);
    }
}

/// Long-term gains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LongTermGains {
    /// Listed equity and equity funds (112A), before the exemption.
    #[serde(rename = "Equity112A")]
    pub equity_112a: CapGainEntry,
    /// Other domestic assets (112).
    pub other_domestic: CapGainEntry,
    /// Foreign assets (112).
    pub foreign_assets: CapGainEntry,
    /// Sum of gains at the preferential rate.
    pub total_at_preferential_rate: i64,
    /// Sum of gains at the flat rate.
    pub total_at_flat_rate: i64,
    /// Preferential plus flat.
    pub total_long_term: i64,
}

impl LongTermGains {
    /// All lines zero.
    pub fn zeroed() -> Self {
        Self {
            equity_112a: CapGainEntry::zeroed(RateBucket::LtcgPreferential10),
            other_domestic: CapGainEntry::zeroed(RateBucket::LtcgFlat20),
            foreign_assets: CapGainEntry::zeroed(RateBucket::LtcgFlat20),
            total_at_preferential_rate: 0,
            total_at_flat_rate: 0,
            total_long_term: 0,
        }
    }

    /// Every gain line.
    pub fn entries(&self) -> [&CapGainEntry; 3] {
        [&self.equity_112a, &self.other_domestic, &self.foreign_assets]
    }

    fn recompute_totals(&mut self) {
        self.total_at_preferential_rate = self.equity_112a.capital_gain;
        self.total_at_flat_rate = sum_rupees([
            self.other_domestic.capital_gain,
            self.foreign_assets.capital_gain,
        ]);
        self.total_long_term =
            sum_rupees([self.total_at_preferential_rate, self.total_at_flat_rate]);
    }
}

// ---------------------------------------------------------------------------
// Loss set-off
// ---------------------------------------------------------------------------

/// Set-off of current-year losses against one rate bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetOffRow {
    /// Bucket the row reports.
    pub rate_bucket: RateBucket,
    /// Positive gains in the bucket.
    pub gain_before_set_off: i64,
    /// Short-term losses absorbed.
    pub short_term_loss_set_off: i64,
    /// Long-term losses absorbed.
    pub long_term_loss_set_off: i64,
    /// Gain remaining after set-off.
    pub gain_after_set_off: i64,
}

impl SetOffRow {
    fn zeroed(rate_bucket: RateBucket) -> Self {
        Self {
            rate_bucket,
            gain_before_set_off: 0,
            short_term_loss_set_off: 0,
            long_term_loss_set_off: 0,
            gain_after_set_off: 0,
        }
    }
}

/// Current-year loss set-off table.
///
/// Short-term losses may be set off against any gain; long-term losses
/// only against long-term gains. Rows are consumed in
/// [`RateBucket::SET_OFF_ORDER`], and long-term rows absorb long-term
/// losses before short-term ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LossSetOffTable {
    /// One row per rate bucket, in set-off order.
    pub rows: Vec<SetOffRow>,
    /// Short-term losses available for set-off.
    pub short_term_loss: i64,
    /// Long-term losses available for set-off.
    pub long_term_loss: i64,
    /// Sum of losses absorbed across rows.
    pub total_loss_set_off: i64,
    /// Short-term loss left to carry forward.
    pub unabsorbed_short_term_loss: i64,
    /// Long-term loss left to carry forward.
    pub unabsorbed_long_term_loss: i64,
}

impl LossSetOffTable {
    /// Four zero rows.
    pub fn zeroed() -> Self {
        Self {
            rows: RateBucket::SET_OFF_ORDER
                .into_iter()
                .map(SetOffRow::zeroed)
                .collect(),
            short_term_loss: 0,
            long_term_loss: 0,
            total_loss_set_off: 0,
            unabsorbed_short_term_loss: 0,
            unabsorbed_long_term_loss: 0,
        }
    }

    /// Build the table from the schedule's gain lines.
    pub fn compute(short_term: &ShortTermGains, long_term: &LongTermGains) -> Self {
        let lines = short_term.entries().into_iter().chain(long_term.entries());
        let mut table = Self::zeroed();
        let mut st_pool = 0i64;
        let mut lt_pool = 0i64;

        for entry in lines {
            let bucket = entry.rate_bucket;
            if entry.capital_gain >= 0 {
                if let Some(row) = table.rows.iter_mut().find(|r| r.rate_bucket == bucket) {
                    row.gain_before_set_off =
                        row.gain_before_set_off.saturating_add(entry.capital_gain);
                }
            } else if bucket.is_long_term() {
                lt_pool = lt_pool.saturating_sub(entry.capital_gain);
            } else {
                st_pool = st_pool.saturating_sub(entry.capital_gain);
            }
        }
        table.short_term_loss = st_pool;
        table.long_term_loss = lt_pool;

        for row in &mut table.rows {
            let mut remaining = row.gain_before_set_off;
            if row.rate_bucket.is_long_term() {
                let used = remaining.min(lt_pool);
                row.long_term_loss_set_off = used;
                lt_pool -= used;
                remaining -= used;
            }
            let used = remaining.min(st_pool);
            row.short_term_loss_set_off = used;
            st_pool -= used;
            remaining -= used;
            row.gain_after_set_off = remaining;
        }

        table.total_loss_set_off = sum_rupees(
            table
                .rows
                .iter()
                .map(|r| r.short_term_loss_set_off.saturating_add(r.long_term_loss_set_off)),
        );
        table.unabsorbed_short_term_loss = st_pool;
        table.unabsorbed_long_term_loss = lt_pool;
        table
    }
}

// ---------------------------------------------------------------------------
// Accrual / receipt
// ---------------------------------------------------------------------------

/// Gains of one rate bucket split by accrual period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccrualRow {
    /// Bucket the row reports.
    pub rate_bucket: RateBucket,
    /// 1 April to 15 June.
    pub up_to_15_jun: i64,
    /// 16 June to 15 September.
    pub from_16_jun_to_15_sep: i64,
    /// 16 September to 15 December.
    pub from_16_sep_to_15_dec: i64,
    /// 16 December to 15 March.
    pub from_16_dec_to_15_mar: i64,
    /// 16 March to 31 March.
    pub from_16_mar_to_31_mar: i64,
    /// Sum of the five periods.
    pub total: i64,
}

impl AccrualRow {
    fn zeroed(rate_bucket: RateBucket) -> Self {
        Self {
            rate_bucket,
            up_to_15_jun: 0,
            from_16_jun_to_15_sep: 0,
            from_16_sep_to_15_dec: 0,
            from_16_dec_to_15_mar: 0,
            from_16_mar_to_31_mar: 0,
            total: 0,
        }
    }

    fn periods_mut(&mut self) -> [&mut i64; 5] {
        [
            &mut self.up_to_15_jun,
            &mut self.from_16_jun_to_15_sep,
            &mut self.from_16_sep_to_15_dec,
            &mut self.from_16_dec_to_15_mar,
            &mut self.from_16_mar_to_31_mar,
        ]
    }

    /// The five period amounts in chronological order.
    pub fn periods(&self) -> [i64; 5] {
        [
            self.up_to_15_jun,
            self.from_16_jun_to_15_sep,
            self.from_16_sep_to_15_dec,
            self.from_16_dec_to_15_mar,
            self.from_16_mar_to_31_mar,
        ]
    }
}

/// Accrual/receipt table: one row per rate bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccrualReceiptTable {
    /// Rows in [`RateBucket::SET_OFF_ORDER`].
    pub rows: Vec<AccrualRow>,
}

impl AccrualReceiptTable {
    /// Four zero rows.
    pub fn zeroed() -> Self {
        Self {
            rows: RateBucket::SET_OFF_ORDER
                .into_iter()
                .map(AccrualRow::zeroed)
                .collect(),
        }
    }

    /// Add an aggregated bucket's quarterly split to the row for `rate_bucket`.
    ///
    /// The split always sums to `to_rupees(gain.gain)`, the figure
    /// [`CapGainEntry::absorb`] puts on the gain line.
    pub fn absorb(&mut self, rate_bucket: RateBucket, gain: &AggregatedGain) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.rate_bucket == rate_bucket) {
            for (slot, amount) in row.periods_mut().into_iter().zip(split_rupees(gain)) {
                *slot = slot.saturating_add(amount);
            }
        }
    }

    fn recompute_totals(&mut self) {
        for row in &mut self.rows {
            row.total = sum_rupees(row.periods());
        }
    }
}

/// Round each period, then move the rounding residue onto the last
/// non-zero period so the periods add up to the rounded bucket gain.
fn split_rupees(gain: &AggregatedGain) -> [i64; AccrualQuarter::COUNT] {
    let mut periods = gain.quarterly_gain.map(to_rupees);
    let residue = to_rupees(gain.gain).saturating_sub(sum_rupees(periods));
    if residue != 0 {
        let last = gain
            .quarterly_gain
            .iter()
            .rposition(|q| !q.is_zero())
            .unwrap_or(AccrualQuarter::COUNT - 1);
        periods[last] = periods[last].saturating_add(residue);
    }
    periods
}

// ---------------------------------------------------------------------------
// Schedule 112A (grandfathering detail)
// ---------------------------------------------------------------------------

/// Whether a share was acquired on or before the grandfathering cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcquisitionPeriod {
    /// Acquired on or before the cutoff.
    #[serde(rename = "BE")]
    OnOrBeforeCutoff,
    /// Acquired after the cutoff.
    #[serde(rename = "AE")]
    AfterCutoff,
}

impl AcquisitionPeriod {
    /// Classify an acquisition date against `cutoff`.
    pub fn of(acquired: NaiveDate, cutoff: NaiveDate) -> Self {
        if acquired <= cutoff {
            Self::OnOrBeforeCutoff
        } else {
            Self::AfterCutoff
        }
    }
}

/// ISIN placeholder the schedule accepts when the statement has none.
pub const ISIN_NOT_REQUIRED: &str = "INNOTREQUIRD";

/// One disposal in the grandfathering schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schedule112ARow {
    /// Acquisition period relative to the cutoff.
    pub share_acquired: AcquisitionPeriod,
    /// ISIN, or [`ISIN_NOT_REQUIRED`].
    pub isin_code: String,
    /// Scheme or share name.
    pub share_name: String,
    /// Units sold.
    pub units: Decimal,
    /// Sale consideration.
    pub full_value_of_consideration: i64,
    /// Actual cost of acquisition.
    pub actual_cost: i64,
    /// Fair market value per unit on the cutoff date.
    pub fmv_per_unit_on_cutoff: i64,
    /// Total fair market value on the cutoff date.
    pub total_fmv_on_cutoff: i64,
    /// Cost used for the gain.
    pub cost_without_indexation: i64,
    /// Consideration less cost.
    pub balance: i64,
}

impl Schedule112ARow {
    /// Build a row from an equity disposal.
    pub fn from_disposal(disposal: &EquityDisposal, cutoff: NaiveDate) -> Self {
        let consideration = to_rupees(disposal.sale_value);
        let actual_cost = to_rupees(disposal.actual_cost);
        // TODO: source fair market value on the cutoff date per ISIN and
        // derive cost_without_indexation from it; until then FMV is zero.
        let cost_without_indexation = actual_cost;
        Self {
            share_acquired: AcquisitionPeriod::of(disposal.acquisition_date, cutoff),
            isin_code: disposal
                .isin
                .clone()
                .unwrap_or_else(|| ISIN_NOT_REQUIRED.to_string()),
            share_name: disposal.name.clone(),
            units: disposal.units,
            full_value_of_consideration: consideration,
            actual_cost,
            fmv_per_unit_on_cutoff: 0,
            total_fmv_on_cutoff: 0,
            cost_without_indexation,
            balance: consideration.saturating_sub(cost_without_indexation),
        }
    }
}

/// Grandfathering detail for long-term equity disposals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schedule112A {
    /// One row per disposal.
    pub rows: Vec<Schedule112ARow>,
    /// Sum of consideration.
    pub total_full_value_of_consideration: i64,
    /// Sum of actual cost.
    pub total_actual_cost: i64,
    /// Sum of FMV on the cutoff date.
    pub total_fmv_on_cutoff: i64,
    /// Sum of cost without indexation.
    pub total_cost_without_indexation: i64,
    /// Sum of balances.
    pub total_balance: i64,
    /// Set when a row acquired on or before the cutoff reports a zero FMV
    /// placeholder, so its cost basis is understated.
    pub fmv_placeholder: bool,
}

impl Schedule112A {
    /// No rows.
    pub fn zeroed() -> Self {
        Self {
            rows: Vec::new(),
            total_full_value_of_consideration: 0,
            total_actual_cost: 0,
            total_fmv_on_cutoff: 0,
            total_cost_without_indexation: 0,
            total_balance: 0,
            fmv_placeholder: false,
        }
    }

    /// Build rows for every disposal and flag grandfathered ones.
    pub fn from_disposals(disposals: &[EquityDisposal], cutoff: NaiveDate) -> Self {
        let mut schedule = Self::zeroed();
        schedule.rows = disposals
            .iter()
            .map(|d| Schedule112ARow::from_disposal(d, cutoff))
            .collect();

        let grandfathered = schedule
            .rows
            .iter()
            .filter(|r| r.share_acquired == AcquisitionPeriod::OnOrBeforeCutoff)
            .count();
        if grandfathered > 0 {
            tracing::warn!(
                rows = grandfathered,
                cutoff = %cutoff,
                "fair market value on cutoff not available, reporting zero; \
                 grandfathered cost basis is understated"
            );
            schedule.fmv_placeholder = true;
        }
        schedule.recompute_totals();
        schedule
    }

    fn recompute_totals(&mut self) {
        self.total_full_value_of_consideration =
            sum_rupees(self.rows.iter().map(|r| r.full_value_of_consideration));
        self.total_actual_cost = sum_rupees(self.rows.iter().map(|r| r.actual_cost));
        self.total_fmv_on_cutoff = sum_rupees(self.rows.iter().map(|r| r.total_fmv_on_cutoff));
        self.total_cost_without_indexation =
            sum_rupees(self.rows.iter().map(|r| r.cost_without_indexation));
        self.total_balance = sum_rupees(self.rows.iter().map(|r| r.balance));
    }
}

// ---------------------------------------------------------------------------
// Foreign gains summary
// ---------------------------------------------------------------------------

/// Foreign gains of one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForeignGainLine {
    /// Rupee proceeds less rupee cost.
    pub gain_in_rupees: i64,
    /// Foreign gain at the disposal-date rate.
    pub constant_currency_gain: i64,
    /// Tax paid abroad, eligible for credit.
    pub foreign_tax_paid: i64,
}

impl ForeignGainLine {
    /// A zero line.
    pub fn zeroed() -> Self {
        Self {
            gain_in_rupees: 0,
            constant_currency_gain: 0,
            foreign_tax_paid: 0,
        }
    }

    /// Add an aggregated foreign bucket.
    pub fn absorb(&mut self, gain: &AggregatedGain) {
        self.gain_in_rupees = self.gain_in_rupees.saturating_add(to_rupees(gain.gain));
        self.constant_currency_gain = self
            .constant_currency_gain
            .saturating_add(to_rupees(gain.constant_currency_gain));
        self.foreign_tax_paid = self
            .foreign_tax_paid
            .saturating_add(to_rupees(gain.foreign_tax_paid));
    }
}

/// Foreign gains for informational reporting and tax credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForeignGainSummary {
    /// Short-term foreign gains.
    pub short_term: ForeignGainLine,
    /// Long-term foreign gains.
    pub long_term: ForeignGainLine,
    /// Total tax paid abroad.
    pub total_foreign_tax_paid: i64,
}

impl ForeignGainSummary {
    /// Both lines zero.
    pub fn zeroed() -> Self {
        Self {
            short_term: ForeignGainLine::zeroed(),
            long_term: ForeignGainLine::zeroed(),
            total_foreign_tax_paid: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// The capital-gains schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleCapitalGains {
    /// Short-term gains.
    pub short_term: ShortTermGains,
    /// Long-term gains.
    pub long_term: LongTermGains,
    /// Short-term plus long-term.
    pub total_capital_gains: i64,
    /// Current-year loss set-off.
    pub loss_set_off: LossSetOffTable,
    /// Accrual/receipt split.
    pub accrual_receipt: AccrualReceiptTable,
    /// Grandfathering detail.
    #[serde(rename = "Schedule112A")]
    pub schedule_112a: Schedule112A,
    /// Foreign gains and foreign tax paid.
    pub foreign_gains: ForeignGainSummary,
}

impl Default for ScheduleCapitalGains {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl ScheduleCapitalGains {
    /// Every block present, every figure zero.
    pub fn zeroed() -> Self {
        Self {
            short_term: ShortTermGains::zeroed(),
            long_term: LongTermGains::zeroed(),
            total_capital_gains: 0,
            loss_set_off: LossSetOffTable::zeroed(),
            accrual_receipt: AccrualReceiptTable::zeroed(),
            schedule_112a: Schedule112A::zeroed(),
            foreign_gains: ForeignGainSummary::zeroed(),
        }
    }

    /// Recompute every derived figure from the gain lines.
    pub fn recompute_totals(&mut self) {
        self.short_term.recompute_totals();
        self.long_term.recompute_totals();
        self.total_capital_gains =
            sum_rupees([self.short_term.total_short_term, self.long_term.total_long_term]);
        self.loss_set_off = LossSetOffTable::compute(&self.short_term, &self.long_term);
        self.accrual_receipt.recompute_totals();
        self.schedule_112a.recompute_totals();
        self.foreign_gains.total_foreign_tax_paid = sum_rupees([
            self.foreign_gains.short_term.foreign_tax_paid,
            self.foreign_gains.long_term.foreign_tax_paid,
        ]);
    }

    /// Every gain line, short-term first.
    pub fn entries(&self) -> impl Iterator<Item = &CapGainEntry> {
        self.short_term
            .entries()
            .into_iter()
            .chain(self.long_term.entries())
    }

    /// Whether any line reports a positive gain.
    pub fn has_positive_gain(&self) -> bool {
        self.entries().any(|e| e.capital_gain > 0)
    }

    /// Sum of positive gains after current-year set-off.
    pub fn income_after_set_off(&self) -> i64 {
        sum_rupees(
            self.loss_set_off
                .rows
                .iter()
                .map(|r| positive(r.gain_after_set_off)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn with_gains(st: [i64; 3], lt: [i64; 3]) -> ScheduleCapitalGains {
        let mut s = ScheduleCapitalGains::zeroed();
        s.short_term.equity_111a.capital_gain = st[0];
        s.short_term.other_domestic.capital_gain = st[1];
        s.short_term.foreign_assets.capital_gain = st[2];
        s.long_term.equity_112a.capital_gain = lt[0];
        s.long_term.other_domestic.capital_gain = lt[1];
        s.long_term.foreign_assets.capital_gain = lt[2];
        s.recompute_totals();
        s
    }

    #[test]
    fn zeroed_schedule_has_every_block() {
        let s = ScheduleCapitalGains::zeroed();
        assert_eq!(s.loss_set_off.rows.len(), 4);
        assert_eq!(s.accrual_receipt.rows.len(), 4);
        assert_eq!(s.total_capital_gains, 0);
        assert!(!s.has_positive_gain());
        let json = serde_json::to_value(&s).unwrap();
        assert!(json["ShortTerm"]["Equity111A"].is_object());
        assert_eq!(json["LongTerm"]["Equity112A"]["Section"], "112A");
        assert!(json["Schedule112A"]["Rows"].as_array().unwrap().is_empty());
        assert_eq!(json["AccrualReceipt"]["Rows"][0]["UpTo15Jun"], 0);
    }

    #[test]
    fn totals_sum_constituents() {
        let s = with_gains([100, 20, 30], [1000, 200, 300]);
        assert_eq!(s.short_term.total_at_preferential_rate, 100);
        assert_eq!(s.short_term.total_at_slab_rate, 50);
        assert_eq!(s.short_term.total_short_term, 150);
        assert_eq!(s.long_term.total_at_flat_rate, 500);
        assert_eq!(s.long_term.total_long_term, 1500);
        assert_eq!(s.total_capital_gains, 1650);
    }

    #[test]
    fn short_term_loss_reaches_long_term_rows() {
        let s = with_gains([0, -500, 0], [300, 100, 0]);
        let t = &s.loss_set_off;
        assert_eq!(t.short_term_loss, 500);
        // Order: slab, 111A, 112, 112A.
        assert_eq!(t.rows[2].rate_bucket, RateBucket::LtcgFlat20);
        assert_eq!(t.rows[2].short_term_loss_set_off, 100);
        assert_eq!(t.rows[3].short_term_loss_set_off, 300);
        assert_eq!(t.unabsorbed_short_term_loss, 100);
        assert_eq!(t.total_loss_set_off, 400);
        assert_eq!(s.income_after_set_off(), 0);
    }

    #[test]
    fn long_term_loss_never_touches_short_term_rows() {
        let s = with_gains([400, 0, 0], [-1000, 250, 0]);
        let t = &s.loss_set_off;
        assert_eq!(t.rows[1].rate_bucket, RateBucket::StcgPreferential15);
        assert_eq!(t.rows[1].gain_after_set_off, 400);
        assert_eq!(t.rows[2].long_term_loss_set_off, 250);
        assert_eq!(t.unabsorbed_long_term_loss, 750);
        for row in &t.rows {
            assert_eq!(
                row.gain_before_set_off,
                row.short_term_loss_set_off + row.long_term_loss_set_off + row.gain_after_set_off
            );
        }
    }

    #[test]
    fn accrual_totals_sum_periods() {
        let mut table = AccrualReceiptTable::zeroed();
        let mut gain = AggregatedGain::zero();
        gain.gain = dec!(13.9);
        gain.quarterly_gain = [dec!(10.4), dec!(0), dec!(5.5), dec!(0), dec!(-2)];
        table.absorb(RateBucket::StcgSlab, &gain);
        table.recompute_totals();
        let row = &table.rows[0];
        assert_eq!(row.periods(), [10, 0, 6, 0, -2]);
        assert_eq!(row.total, 14);
    }

    #[test]
    fn accrual_split_matches_rounded_line_gain() {
        // Two half-rupee gains in different periods round to 1 on the
        // gain line; the periods must not report 2.
        let mut gain = AggregatedGain::zero();
        gain.gain = dec!(1.0);
        gain.quarterly_gain = [dec!(0.5), dec!(0.5), dec!(0), dec!(0), dec!(0)];

        let mut line = CapGainEntry::zeroed(RateBucket::StcgSlab);
        line.absorb(&gain);
        let mut table = AccrualReceiptTable::zeroed();
        table.absorb(RateBucket::StcgSlab, &gain);
        table.recompute_totals();

        let row = &table.rows[0];
        assert_eq!(line.capital_gain, 1);
        assert_eq!(row.periods(), [1, 0, 0, 0, 0]);
        assert_eq!(row.total, line.capital_gain);
    }

    #[test]
    fn accrual_residue_lands_on_last_active_period() {
        let mut gain = AggregatedGain::zero();
        gain.gain = dec!(-1.5);
        gain.quarterly_gain = [dec!(0), dec!(-0.5), dec!(0), dec!(-0.5), dec!(-0.5)];
        let mut table = AccrualReceiptTable::zeroed();
        table.absorb(RateBucket::LtcgFlat20, &gain);
        table.recompute_totals();

        let row = table
            .rows
            .iter()
            .find(|r| r.rate_bucket == RateBucket::LtcgFlat20)
            .unwrap();
        assert_eq!(row.periods(), [0, -1, 0, -1, 0]);
        assert_eq!(row.total, -2);
    }

    #[test]
    fn schedule_112a_flags_grandfathered_rows() {
        let disposals = vec![
            EquityDisposal {
                isin: None,
                name: "Old Fund".to_string(),
                units: dec!(12.5),
                acquisition_date: d(2017, 6, 1),
                disposal_date: d(2023, 6, 1),
                sale_value: dec!(25000),
                actual_cost: dec!(10000),
            },
            EquityDisposal {
                isin: Some("INF000000001".to_string()),
                name: "New Fund".to_string(),
                units: dec!(1),
                acquisition_date: d(2020, 6, 1),
                disposal_date: d(2023, 7, 1),
                sale_value: dec!(500),
                actual_cost: dec!(600),
            },
        ];
        let s = Schedule112A::from_disposals(&disposals, d(2018, 1, 31));
        assert!(s.fmv_placeholder);
        assert_eq!(s.rows[0].share_acquired, AcquisitionPeriod::OnOrBeforeCutoff);
        assert_eq!(s.rows[0].isin_code, ISIN_NOT_REQUIRED);
        assert_eq!(s.rows[0].total_fmv_on_cutoff, 0);
        assert_eq!(s.rows[0].cost_without_indexation, 10000);
        assert_eq!(s.rows[1].share_acquired, AcquisitionPeriod::AfterCutoff);
        assert_eq!(s.total_balance, 15000 - 100);
        assert_eq!(s.total_full_value_of_consideration, 25500);
    }

    #[test]
    fn schedule_112a_without_grandfathered_rows_is_not_flagged() {
        let disposals = vec![EquityDisposal {
            isin: None,
            name: "New".to_string(),
            units: dec!(1),
            acquisition_date: d(2018, 2, 1),
            disposal_date: d(2023, 6, 1),
            sale_value: dec!(1),
            actual_cost: dec!(1),
        }];
        let s = Schedule112A::from_disposals(&disposals, d(2018, 1, 31));
        assert!(!s.fmv_placeholder);
    }
}
