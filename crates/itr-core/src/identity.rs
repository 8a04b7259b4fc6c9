//! # Identity Newtypes
//!
//! The Permanent Account Number (PAN) is the taxpayer identifier carried
//! by every return document. It is validated at construction and on
//! deserialization, so a [`Pan`] inside a document is always well-formed.
//!
//! Format: five uppercase letters, four digits, one uppercase letter
//! (e.g. `ABCPE1234F`).

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Permanent Account Number.
///
/// # Validation
///
/// - Exactly 10 ASCII characters
/// - Positions 1-5 and 10 are uppercase letters, positions 6-9 digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pan(String);

impl Pan {
    /// Create a PAN from a string value, validating the format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPan`] if the string does not match
    /// `AAAAA9999A`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !Self::is_valid(&s) {
            return Err(ValidationError::InvalidPan(s));
        }
        Ok(Self(s))
    }

    /// Check the PAN pattern without constructing.
    ///
    /// Also used as the `pan` format checker by the schema validator.
    pub fn is_valid(s: &str) -> bool {
        let bytes = s.as_bytes();
        bytes.len() == 10
            && bytes[..5].iter().all(u8::is_ascii_uppercase)
            && bytes[5..9].iter().all(u8::is_ascii_digit)
            && bytes[9].is_ascii_uppercase()
    }

    /// Access the PAN string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Pan {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Pan> for String {
    fn from(pan: Pan) -> Self {
        pan.0
    }
}

impl std::fmt::Display for Pan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
