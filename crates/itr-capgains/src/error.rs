//! Errors that abort a conversion call.
//!
//! Missing dates on a single transaction are not errors (the transaction
//! is skipped); everything here fails the whole call.

use chrono::NaiveDate;
use thiserror::Error;

use itr_core::ValidationError;

/// A conversion call that could not produce a schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The caller supplied an empty transaction list.
    #[error("no transactions found")]
    NoTransactions,

    /// The reporting period identifier is malformed.
    #[error("invalid reporting period: {0}")]
    InvalidTaxYear(#[from] ValidationError),

    /// Foreign transactions were supplied without an exchange-rate source.
    #[error("foreign transactions require an exchange-rate source")]
    MissingRateSource,

    /// The rate source has no rate for a required date.
    #[error("no exchange rate for {date} (required by {instrument})")]
    MissingExchangeRate {
        /// Date the rate was requested for.
        date: NaiveDate,
        /// Instrument whose conversion needed it.
        instrument: String,
    },

    /// The rate source returned zero (or a negative rate) for a required date.
    #[error("exchange rate for {date} is not positive (required by {instrument})")]
    ZeroExchangeRate {
        /// Date the rate was requested for.
        date: NaiveDate,
        /// Instrument whose conversion needed it.
        instrument: String,
    },
}
