//! # itr-cli — CLI Tool for the ITR Stack
//!
//! Provides the `itr` command-line interface over JSON files.
//!
//! ## Subcommands
//!
//! - `itr convert`: transaction ledger to capital-gains schedule.
//! - `itr eligibility`: simplified-return eligibility of a detailed return.
//! - `itr downgrade`: detailed return to simplified return.
//! - `itr validate`: document or sub-section against a return schema.
//!
//! ## Exit codes
//!
//! Handlers return `0` on success and `1` when the data itself is the
//! problem (failed conversion, ineligible return, schema violations).
//! Operational errors propagate as `anyhow::Error` and the binary exits
//! with `2`.
//!
//! ```bash
//! itr convert --tax-year 2023-24 --transactions tx.json --rates usd.json
//! itr validate return.json --schema schemas/itr2.schema.json --section PartBTI
//! ```

pub mod convert;
pub mod returns;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use itr_core::{EngineConfig, ItrError};

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    decode_json_file(path).map_err(|err| {
        let action = match err {
            ItrError::Io(_) => "read",
            _ => "parse",
        };
        anyhow::Error::new(err).context(format!("cannot {action} {}", path.display()))
    })
}

fn decode_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ItrError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load the engine configuration, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_path(p)
            .map_err(ItrError::from)
            .with_context(|| format!("cannot load config {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("cannot serialize output")?;
    println!("{out}");
    Ok(())
}
