//! # itr-return — Return Documents
//!
//! The two return variants and the path between them:
//!
//! - [`ComplexReturn`]: the detailed (ITR-2 shaped) return, carrying every
//!   income schedule including capital gains.
//! - [`SimplifiedReturn`]: the single-page (ITR-1 shaped) return.
//! - [`EligibilityGate`]: pure predicate deciding whether a detailed return
//!   may be filed in the simplified shape.
//! - [`downgrade`]: re-maps an eligible detailed return into the simplified
//!   shape, recomputing combined totals.
//!
//! ## Totals invariant
//!
//! Every "sum of" field equals its constituents whenever a document is
//! handed out by this crate. Callers that edit inputs call
//! `recompute_totals()` before validating or persisting.

pub mod codes;
pub mod complex;
pub mod downgrade;
pub mod eligibility;
pub mod error;
pub mod simplified;

pub use codes::{
    FilingSection, FormHeader, PropertyType, ResidentialStatus, ReturnForm, SimplifiedCapacity,
    SimplifiedFilingSection, VerificationCapacity,
};
pub use complex::{ComplexReturn, HouseProperty, PartAGeneral, Verification};
pub use downgrade::downgrade;
pub use eligibility::{Disqualification, EligibilityGate};
pub use error::DowngradeError;
pub use simplified::SimplifiedReturn;
