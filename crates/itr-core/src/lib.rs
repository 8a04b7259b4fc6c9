#![deny(missing_docs)]

//! # itr-core — Foundational Types for the ITR Stack
//!
//! Identifiers, the reporting period, rupee rounding and the engine
//! configuration shared by every other crate in the workspace. Nothing
//! here depends on another workspace crate.
//!
//! ## Design Principles
//!
//! 1. **Validated newtypes for statutory identifiers.** A [`Pan`] or a
//!    [`TaxYear`] can only be constructed from well-formed input.
//!
//! 2. **Explicit configuration.** Every statutory constant lives in
//!    [`EngineConfig`], which callers pass into each entry point. There is
//!    no process-wide default instance.
//!
//! 3. **Whole-rupee documents.** Aggregation works in exact decimals;
//!    return documents carry whole rupees produced by [`amount::to_rupees`].
//!
//! 4. **[`ItrError`] hierarchy.** `thiserror` enums with structured
//!    context; callers match on variants instead of strings.

pub mod amount;
pub mod config;
pub mod error;
pub mod identity;
pub mod tax_year;

// Re-export primary types at crate root for ergonomic imports.
pub use amount::{sum_rupees, to_rupees};
pub use config::EngineConfig;
pub use error::{ConfigError, ItrError, ValidationError};
pub use identity::Pan;
pub use tax_year::{AccrualQuarter, TaxYear};
