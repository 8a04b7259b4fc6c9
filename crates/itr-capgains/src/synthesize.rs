//! # Section Synthesizer
//!
//! Places aggregated buckets into the capital-gains schedule.
//!
//! | Source   | Bucket       | Line                        | Rate bucket   |
//! |----------|--------------|-----------------------------|---------------|
//! | domestic | equity short | `ShortTerm.Equity111A`      | 15% (111A)    |
//! | domestic | debt short   | `ShortTerm.OtherDomestic`   | slab          |
//! | foreign  | any short    | `ShortTerm.ForeignAssets`   | slab          |
//! | domestic | equity long  | `LongTerm.Equity112A`       | 10% (112A)    |
//! | domestic | debt long    | `LongTerm.OtherDomestic`    | 20% (112)     |
//! | foreign  | any long     | `LongTerm.ForeignAssets`    | 20% (112)     |
//!
//! The 112A line reports the gain before the long-term equity exemption.

use itr_core::{EngineConfig, TaxYear};

use crate::aggregate::AggregatedSource;
use crate::classify::{AssetClass, GainBucket};
use crate::schedule::{
    CapGainEntry, ForeignGainLine, RateBucket, Schedule112A, ScheduleCapitalGains,
};
use crate::transaction::{GainType, SourceKind};

/// Build a fresh schedule from the aggregated sources.
///
/// Sources may be passed in any order and any number; each is placed by
/// its [`SourceKind`]. All totals are recomputed before returning.
pub fn synthesize(
    sources: &[&AggregatedSource],
    year: &TaxYear,
    config: &EngineConfig,
) -> ScheduleCapitalGains {
    let mut schedule = ScheduleCapitalGains::zeroed();
    let mut long_equity_detail = Vec::new();

    for source in sources {
        for (bucket, totals) in source.buckets.iter() {
            if totals.is_empty() {
                continue;
            }
            let (line, rate_bucket) = placement(&mut schedule, source.source, bucket);
            line.absorb(totals);
            schedule.accrual_receipt.absorb(rate_bucket, totals);

            if source.source == SourceKind::ForeignEquity {
                foreign_line(&mut schedule, bucket.term).absorb(totals);
            }
        }
        long_equity_detail.extend(source.equity_long_detail.iter().cloned());
    }

    long_equity_detail.sort_by_key(|d| d.disposal_date);
    schedule.schedule_112a =
        Schedule112A::from_disposals(&long_equity_detail, config.grandfathering_cutoff);
    schedule.recompute_totals();

    tracing::debug!(
        tax_year = %year,
        short_term = schedule.short_term.total_short_term,
        long_term = schedule.long_term.total_long_term,
        total = schedule.total_capital_gains,
        "synthesized capital gains schedule"
    );
    if config.equity_ltcg_exemption > 0 && schedule.long_term.total_at_preferential_rate > 0 {
        tracing::info!(
            gain = schedule.long_term.total_at_preferential_rate,
            exemption = config.equity_ltcg_exemption,
            "112A gain reported before exemption"
        );
    }
    schedule
}

fn placement(
    schedule: &mut ScheduleCapitalGains,
    source: SourceKind,
    bucket: GainBucket,
) -> (&mut CapGainEntry, RateBucket) {
    let st = &mut schedule.short_term;
    let lt = &mut schedule.long_term;
    match (source, bucket.asset, bucket.term) {
        (SourceKind::DomesticFund, AssetClass::Equity, GainType::ShortTerm) => {
            (&mut st.equity_111a, RateBucket::StcgPreferential15)
        }
        (SourceKind::DomesticFund, AssetClass::Debt, GainType::ShortTerm) => {
            (&mut st.other_domestic, RateBucket::StcgSlab)
        }
        (SourceKind::ForeignEquity, _, GainType::ShortTerm) => {
            (&mut st.foreign_assets, RateBucket::StcgSlab)
        }
        (SourceKind::DomesticFund, AssetClass::Equity, GainType::LongTerm) => {
            (&mut lt.equity_112a, RateBucket::LtcgPreferential10)
        }
        (SourceKind::DomesticFund, AssetClass::Debt, GainType::LongTerm) => {
            (&mut lt.other_domestic, RateBucket::LtcgFlat20)
        }
        (SourceKind::ForeignEquity, _, GainType::LongTerm) => {
            (&mut lt.foreign_assets, RateBucket::LtcgFlat20)
        }
    }
}

fn foreign_line(schedule: &mut ScheduleCapitalGains, term: GainType) -> &mut ForeignGainLine {
    match term {
        GainType::ShortTerm => &mut schedule.foreign_gains.short_term,
        GainType::LongTerm => &mut schedule.foreign_gains.long_term,
    }
}
