//! # Error Hierarchy
//!
//! Structured error types shared across the ITR stack, built with
//! `thiserror`. Each variant carries the offending input so that a caller
//! can tell the user exactly which value was rejected.

use thiserror::Error;

/// Top-level error type for the ITR stack.
#[derive(Error, Debug)]
pub enum ItrError {
    /// Domain primitive validation failure.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Engine configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for domain primitive newtypes.
///
/// Each type enforces its format at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// PAN does not match the five-letter, four-digit, one-letter pattern.
    #[error("invalid PAN format: \"{0}\" (expected AAAAA9999A)")]
    InvalidPan(String),

    /// Tax year string is not of the form `YYYY-YY` with consecutive years.
    #[error("invalid tax year: \"{value}\" ({reason})")]
    InvalidTaxYear {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Errors raised while loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {path}: {source}")]
    Read {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The YAML document did not match the configuration shape.
    #[error("invalid config YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value parsed but is not usable (e.g. a zero holding threshold).
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// The offending configuration key.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}
