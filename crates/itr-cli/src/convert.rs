//! # Convert Subcommand
//!
//! Runs the capital-gains conversion over a JSON transaction ledger and
//! prints the tagged outcome. With `--into`, the resulting schedule is
//! installed into a detailed return and the whole return is printed
//! instead.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use itr_capgains::{convert, ExchangeRateSource, RateTable, Transaction};
use itr_return::ComplexReturn;

/// Arguments for the `itr convert` subcommand.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Reporting period, e.g. `2023-24`.
    #[arg(long)]
    pub tax_year: String,

    /// JSON array of transactions.
    #[arg(long, value_name = "PATH")]
    pub transactions: PathBuf,

    /// JSON object mapping `YYYY-MM-DD` to a rupee exchange rate.
    #[arg(long, value_name = "PATH")]
    pub rates: Option<PathBuf>,

    /// Detailed return (JSON) to install the schedule into.
    #[arg(long, value_name = "PATH")]
    pub into: Option<PathBuf>,
}

/// Execute the convert subcommand.
///
/// Returns exit code: 0 on success, 1 when the conversion failed.
pub fn run_convert(args: &ConvertArgs, config: Option<&Path>) -> Result<u8> {
    let config = crate::load_config(config)?;
    let transactions: Vec<Transaction> = crate::read_json(&args.transactions)?;
    let rates = args.rates.as_deref().map(load_rates).transpose()?;
    let target = args
        .into
        .as_deref()
        .map(crate::read_json::<ComplexReturn>)
        .transpose()?;

    tracing::info!(
        transactions = transactions.len(),
        rates = rates.as_ref().map_or(0, RateTable::len),
        tax_year = %args.tax_year,
        "running conversion"
    );

    let source = rates.as_ref().map(|r| r as &dyn ExchangeRateSource);
    let outcome = convert(&transactions, &args.tax_year, source, &config);

    match (target, &outcome.report) {
        (Some(ret), Some(report)) => {
            crate::print_json(&ret.with_capital_gains(report))?;
            Ok(0)
        }
        (Some(_), None) | (None, _) => {
            crate::print_json(&outcome)?;
            Ok(if outcome.success { 0 } else { 1 })
        }
    }
}

fn load_rates(path: &Path) -> Result<RateTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    RateTable::from_json_str(&content)
        .with_context(|| format!("cannot parse rate table {}", path.display()))
}
