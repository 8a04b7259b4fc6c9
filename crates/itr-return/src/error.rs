//! Errors raised when a detailed return cannot be re-expressed in the
//! simplified shape.

use thiserror::Error;

use crate::codes::FilingSection;

/// A field of the detailed return has no simplified equivalent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DowngradeError {
    /// The simplified form does not accept this filing section.
    #[error("filing section {section} cannot be used on the simplified return")]
    UnsupportedFilingSection {
        /// Section on the detailed return.
        section: FilingSection,
    },

    /// The simplified form has room for a single house property.
    #[error("simplified return holds at most one house property, found {count}")]
    TooManyHouseProperties {
        /// Properties on the detailed return.
        count: usize,
    },
}
