//! # itr-schema — Return Schema Validation
//!
//! Structural conformance checks for return documents against the formal
//! schemas in `schemas/`. The schema is supplied from outside; this crate
//! never authors it.
//!
//! ## Outcomes
//!
//! A document that does not conform is not an error. [`ReturnValidator`]
//! reports it as [`ValidationResult::Invalid`] carrying every violation
//! found, so a caller can show all problems at once. Errors
//! ([`SchemaValidationError`]) mean the schema itself is unusable.
//!
//! The validator checks shape and types only. Arithmetic consistency of
//! totals is the responsibility of the code that builds the document.

pub mod validate;

pub use validate::{
    ReturnValidator, SchemaValidationError, ValidationResult, Violation, PAN_FORMAT,
};
