//! # Engine Configuration
//!
//! Statutory constants used by classification, synthesis and the
//! eligibility gate. A config value is built once by the caller (from
//! [`Default`] or a YAML override file) and passed by reference into each
//! entry point.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Statutory thresholds and limits.
///
/// Every field has a default, so an override file only needs the keys it
/// changes:
///
/// ```yaml
/// simplified_income_threshold: 5000000
/// grandfathering_cutoff: 2018-01-31
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Holding period (months) above which domestic equity is long-term.
    pub equity_long_term_months: i32,
    /// Holding period (months) above which domestic debt is long-term.
    pub debt_long_term_months: i32,
    /// Holding period (months) above which foreign equity is long-term.
    pub foreign_long_term_months: i32,
    /// Acquisition cutoff for the grandfathering schedule.
    pub grandfathering_cutoff: NaiveDate,
    /// Long-term equity exemption amount. Reported for reference only;
    /// the engine always reports the pre-exemption gain.
    pub equity_ltcg_exemption: i64,
    /// Aggregate income above which the simplified return is unavailable.
    pub simplified_income_threshold: i64,
    /// Maximum number of house properties allowed on the simplified return.
    pub simplified_max_house_properties: usize,
    /// Agricultural income above which the simplified return is unavailable.
    pub agricultural_income_limit: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            equity_long_term_months: 12,
            debt_long_term_months: 36,
            foreign_long_term_months: 24,
            grandfathering_cutoff: NaiveDate::from_ymd_opt(2018, 1, 31).unwrap_or_default(),
            equity_ltcg_exemption: 100_000,
            simplified_income_threshold: 5_000_000,
            simplified_max_house_properties: 1,
            agricultural_income_limit: 5_000,
        }
    }
}

impl EngineConfig {
    /// Parse a YAML override document, filling absent keys from defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::InvalidValue`] for values that fail [`validate`](Self::validate).
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML override file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// the same errors as [`from_yaml_str`](Self::from_yaml_str).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded engine config");
        Ok(config)
    }

    /// Reject configurations that would make classification meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let months = [
            ("equity_long_term_months", self.equity_long_term_months),
            ("debt_long_term_months", self.debt_long_term_months),
            ("foreign_long_term_months", self.foreign_long_term_months),
        ];
        for (field, value) in months {
            if value <= 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a positive number of months, got {value}"),
                });
            }
        }
        if self.simplified_income_threshold < 0 {
            return Err(ConfigError::InvalidValue {
                field: "simplified_income_threshold",
                reason: "must not be negative".to_string(),
            });
        }
        Ok(())
    }
}
