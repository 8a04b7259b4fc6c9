//! # Statutory Codes
//!
//! Closed code sets shared by both return variants. Each enum carries its
//! schema code through `#[serde(rename)]` and exposes it via `as_str()`.
//! Where the simplified form uses a smaller symbol set, the simplified
//! enum lives next to its detailed counterpart and the remap is an
//! exhaustive `match` in [`crate::downgrade`].

use serde::{Deserialize, Serialize};

/// Which return form a document is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnForm {
    /// Simplified return.
    #[serde(rename = "ITR1")]
    Itr1,
    /// Detailed return.
    #[serde(rename = "ITR2")]
    Itr2,
}

impl ReturnForm {
    /// Return the form code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Itr1 => "ITR1",
            Self::Itr2 => "ITR2",
        }
    }
}

impl std::fmt::Display for ReturnForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form identification block present on every return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FormHeader {
    /// Form code.
    pub form_name: ReturnForm,
    /// Assessment year, e.g. `"2024-25"`.
    pub assessment_year: String,
    /// Version of the schema the document targets.
    pub schema_version: String,
}

/// Residential status for the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResidentialStatus {
    /// Resident and ordinarily resident.
    #[serde(rename = "RES")]
    Resident,
    /// Resident but not ordinarily resident.
    #[serde(rename = "NOR")]
    NotOrdinarilyResident,
    /// Non-resident.
    #[serde(rename = "NRI")]
    NonResident,
}

impl ResidentialStatus {
    /// Return the status code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "RES",
            Self::NotOrdinarilyResident => "NOR",
            Self::NonResident => "NRI",
        }
    }
}

/// Section of the Act under which the detailed return is filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilingSection {
    /// 139(1), on or before the due date.
    #[serde(rename = "11")]
    OnOrBeforeDueDate,
    /// 139(4), belated.
    #[serde(rename = "12")]
    Belated,
    /// 139(5), revised.
    #[serde(rename = "13")]
    Revised,
    /// 139(9), in response to a defect notice.
    #[serde(rename = "14")]
    Defective,
    /// 92CD, modified after an advance pricing agreement.
    #[serde(rename = "16")]
    ModifiedAfterApa,
    /// 119(2)(b), after condonation of delay.
    #[serde(rename = "17")]
    CondonationOfDelay,
    /// 139(8A), updated return.
    #[serde(rename = "21")]
    Updated,
}

impl FilingSection {
    /// Return the filing section code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnOrBeforeDueDate => "11",
            Self::Belated => "12",
            Self::Revised => "13",
            Self::Defective => "14",
            Self::ModifiedAfterApa => "16",
            Self::CondonationOfDelay => "17",
            Self::Updated => "21",
        }
    }
}

impl std::fmt::Display for FilingSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filing sections the simplified return accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimplifiedFilingSection {
    /// 139(1).
    #[serde(rename = "11")]
    OnOrBeforeDueDate,
    /// 139(4).
    #[serde(rename = "12")]
    Belated,
    /// 139(5).
    #[serde(rename = "13")]
    Revised,
    /// 139(9).
    #[serde(rename = "14")]
    Defective,
    /// 119(2)(b).
    #[serde(rename = "17")]
    CondonationOfDelay,
    /// 139(8A).
    #[serde(rename = "21")]
    Updated,
}

/// Capacity in which the verification is signed on the detailed return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationCapacity {
    /// The assessee.
    #[serde(rename = "S")]
    SelfAssessee,
    /// Representative assessee.
    #[serde(rename = "R")]
    RepresentativeAssessee,
    /// Legal heir or representative of a deceased assessee.
    #[serde(rename = "L")]
    LegalRepresentative,
}

/// Capacity codes on the simplified return, where both representative
/// kinds share one code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimplifiedCapacity {
    /// The assessee.
    #[serde(rename = "S")]
    SelfAssessee,
    /// Any representative.
    #[serde(rename = "R")]
    Representative,
}

/// How a house property is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    /// Self-occupied.
    #[serde(rename = "S")]
    SelfOccupied,
    /// Let out.
    #[serde(rename = "L")]
    LetOut,
    /// Deemed let out.
    #[serde(rename = "D")]
    DeemedLetOut,
}

impl PropertyType {
    /// Whether the 30% standard deduction applies.
    pub fn is_let_out(&self) -> bool {
        match self {
            Self::SelfOccupied => false,
            Self::LetOut | Self::DeemedLetOut => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_as_schema_symbols() {
        assert_eq!(serde_json::to_value(FilingSection::ModifiedAfterApa).unwrap(), "16");
        assert_eq!(serde_json::to_value(ResidentialStatus::NonResident).unwrap(), "NRI");
        assert_eq!(serde_json::to_value(ReturnForm::Itr2).unwrap(), "ITR2");
        assert_eq!(
            serde_json::to_value(VerificationCapacity::LegalRepresentative).unwrap(),
            "L"
        );
    }

    #[test]
    fn as_str_matches_serde() {
        for s in [
            FilingSection::OnOrBeforeDueDate,
            FilingSection::Belated,
            FilingSection::Revised,
            FilingSection::Defective,
            FilingSection::ModifiedAfterApa,
            FilingSection::CondonationOfDelay,
            FilingSection::Updated,
        ] {
            assert_eq!(serde_json::to_value(s).unwrap(), s.as_str());
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert!(serde_json::from_str::<FilingSection>("\"99\"").is_err());
    }
}
