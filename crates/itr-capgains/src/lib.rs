//! # itr-capgains — Capital-Gains Engine
//!
//! Turns typed disposal records extracted from fund and broker statements
//! into the capital-gains schedule of a return.
//!
//! ## Pipeline
//!
//! ```text
//! &[Transaction]
//!   -> classify()   -> Classified (equity/debt x short/long, per source)
//!   -> aggregate_*() -> AggregatedSource (four zero-filled buckets)
//!   -> synthesize() -> ScheduleCapitalGains
//! ```
//!
//! [`convert`] runs the whole pipeline and wraps the result in a tagged
//! [`ConversionOutcome`]; [`compute`] is the same pipeline returning a
//! `Result` for callers that want to match on [`ConversionError`].
//!
//! ## Statelessness
//!
//! Nothing is cached between calls. The only shared inputs are the
//! caller's [`EngineConfig`](itr_core::EngineConfig) and exchange-rate
//! source, both read-only, so independent conversions can run in parallel.

pub mod aggregate;
pub mod classify;
pub mod error;
pub mod pipeline;
pub mod rates;
pub mod schedule;
pub mod synthesize;
pub mod transaction;

pub use aggregate::{
    aggregate_domestic, aggregate_foreign, AggregatedGain, AggregatedSource, BucketTotals,
    ConvertedDisposal, EquityDisposal,
};
pub use classify::{classify, AssetClass, Classified, Classify, GainBucket};
pub use error::ConversionError;
pub use pipeline::{compute, convert, CapitalGainsReport, ConversionOutcome};
pub use rates::{ExchangeRateSource, RateTable};
pub use schedule::{
    AccrualReceiptTable, CapGainEntry, LossSetOffTable, RateBucket, ScheduleCapitalGains,
    SectionCode,
};
pub use synthesize::synthesize;
pub use transaction::{
    AssetCategory, Disposal, ForeignTransaction, FundTransaction, GainType, SourceKind,
    Transaction,
};
