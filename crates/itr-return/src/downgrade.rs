//! # Return Downgrade
//!
//! Re-expresses a detailed return as the simplified variant.
//!
//! The caller is expected to have consulted the
//! [`EligibilityGate`](crate::EligibilityGate) first; [`downgrade`] does not
//! re-evaluate eligibility. It fails only where the detailed return holds
//! a value the simplified shape has no room for.
//!
//! ## Mapping
//!
//! - Identity, filing status and verification are copied, with code sets
//!   remapped where the simplified form is narrower (both representative
//!   signatory capacities collapse into one).
//! - TDS from the three deduction schedules is summed into the single
//!   simplified TDS figure.
//! - Fields the simplified form requires but the detailed return does not
//!   model (entertainment allowance) are zero.
//! - Every total is recomputed on the result.

use itr_core::amount::positive;

use crate::codes::{
    FilingSection, FormHeader, ReturnForm, SimplifiedCapacity, SimplifiedFilingSection,
    VerificationCapacity,
};
use crate::complex::ComplexReturn;
use crate::error::DowngradeError;
use crate::simplified::{
    FilingStatus, IncomeDeductions, PersonalInfo, SimplifiedReturn, SimplifiedTaxComputation,
    SimplifiedTaxesPaid, SimplifiedVerification, ITR1_SCHEMA_VERSION,
};

/// Remap a detailed-return filing section.
///
/// # Errors
///
/// [`DowngradeError::UnsupportedFilingSection`] for sections the simplified
/// form does not accept.
pub fn remap_filing_section(
    section: FilingSection,
) -> Result<SimplifiedFilingSection, DowngradeError> {
    match section {
        FilingSection::OnOrBeforeDueDate => Ok(SimplifiedFilingSection::OnOrBeforeDueDate),
        FilingSection::Belated => Ok(SimplifiedFilingSection::Belated),
        FilingSection::Revised => Ok(SimplifiedFilingSection::Revised),
        FilingSection::Defective => Ok(SimplifiedFilingSection::Defective),
        FilingSection::CondonationOfDelay => Ok(SimplifiedFilingSection::CondonationOfDelay),
        FilingSection::Updated => Ok(SimplifiedFilingSection::Updated),
        FilingSection::ModifiedAfterApa => {
            Err(DowngradeError::UnsupportedFilingSection { section })
        }
    }
}

/// Remap a signatory capacity; both representative kinds become one code.
pub fn remap_capacity(capacity: VerificationCapacity) -> SimplifiedCapacity {
    match capacity {
        VerificationCapacity::SelfAssessee => SimplifiedCapacity::SelfAssessee,
        VerificationCapacity::RepresentativeAssessee
        | VerificationCapacity::LegalRepresentative => SimplifiedCapacity::Representative,
    }
}

/// Build the simplified return from a detailed one.
///
/// # Errors
///
/// - [`DowngradeError::UnsupportedFilingSection`] when the filing section
///   has no simplified code.
/// - [`DowngradeError::TooManyHouseProperties`] when more than one house
///   property is reported.
pub fn downgrade(ret: &ComplexReturn) -> Result<SimplifiedReturn, DowngradeError> {
    let general = &ret.part_a_general;
    let filing_section = remap_filing_section(general.filing_section)?;

    let properties = &ret.schedule_house_property.properties;
    if properties.len() > 1 {
        return Err(DowngradeError::TooManyHouseProperties {
            count: properties.len(),
        });
    }
    let property = properties.first();

    let salary = &ret.schedule_salary;
    let other = &ret.schedule_other_sources;
    let deductions = &ret.schedule_deductions;
    let income_deductions = IncomeDeductions {
        gross_salary: salary.gross_salary,
        exempt_allowances: salary.exempt_allowances,
        standard_deduction: salary.standard_deduction,
        entertainment_allowance: 0,
        professional_tax: salary.professional_tax,
        house_property_type: property.map(|p| p.property_type),
        annual_value: property.map_or(0, |p| p.annual_value),
        municipal_tax_paid: property.map_or(0, |p| p.municipal_tax_paid),
        interest_on_borrowed_capital: property.map_or(0, |p| p.interest_on_borrowed_capital),
        income_from_other_sources: other.total_income,
        family_pension_deduction: other.family_pension_deduction,
        section_80c: deductions.section_80c,
        section_80d: deductions.section_80d,
        section_80tta: deductions.section_80tta,
        other_deductions: deductions.other_deductions,
        exempt_agricultural_income: positive(ret.schedule_exempt_income.agricultural_income),
        ..IncomeDeductions::default()
    };

    let tax = &ret.tax_computation;
    let tax_computation = SimplifiedTaxComputation {
        tax_on_total_income: tax.tax_on_total_income,
        rebate_87a: tax.rebate_87a,
        surcharge: tax.surcharge,
        education_cess: tax.education_cess,
        relief_89: tax.relief_89,
        interest_and_fee: tax.interest_and_fee,
        ..SimplifiedTaxComputation::default()
    };

    let paid = &ret.taxes_paid;
    let taxes_paid = SimplifiedTaxesPaid {
        total_tds: paid.combined_tds(),
        tcs: paid.tcs,
        advance_tax: paid.advance_tax,
        self_assessment_tax: paid.self_assessment_tax,
        total_taxes_paid: 0,
    };

    let mut simplified = SimplifiedReturn {
        form: FormHeader {
            form_name: ReturnForm::Itr1,
            assessment_year: ret.form.assessment_year.clone(),
            schema_version: ITR1_SCHEMA_VERSION.to_string(),
        },
        personal_info: PersonalInfo {
            pan: general.pan.clone(),
            name: general.name.clone(),
            date_of_birth: general.date_of_birth,
        },
        filing_status: FilingStatus { filing_section },
        income_deductions,
        tax_computation,
        taxes_paid,
        verification: SimplifiedVerification {
            name: ret.verification.name.clone(),
            capacity: remap_capacity(ret.verification.capacity),
            place: ret.verification.place.clone(),
            date: ret.verification.date,
        },
    };
    simplified.recompute_totals();

    tracing::info!(
        pan = %general.pan,
        assessment_year = %simplified.form.assessment_year,
        total_income = simplified.income_deductions.total_income,
        "downgraded return to simplified form"
    );
    if simplified.income_deductions.total_income != ret.total_income.total_income {
        tracing::warn!(
            detailed = ret.total_income.total_income,
            simplified = simplified.income_deductions.total_income,
            "total income differs between detailed and simplified returns"
        );
    }
    Ok(simplified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::PropertyType;
    use crate::complex::tests::sample;
    use crate::complex::HouseProperty;

    #[test]
    fn copies_identity_and_recomputes_income() {
        let ret = sample();
        let s = downgrade(&ret).unwrap();
        assert_eq!(s.form.form_name, ReturnForm::Itr1);
        assert_eq!(s.form.assessment_year, "2024-25");
        assert_eq!(s.personal_info.pan, ret.part_a_general.pan);
        assert_eq!(s.income_deductions.income_from_salary, 1_097_500);
        assert_eq!(s.income_deductions.income_from_house_property, -150_000);
        assert_eq!(s.income_deductions.total_income, ret.total_income.total_income);
        assert_eq!(s.income_deductions.entertainment_allowance, 0);
    }

    #[test]
    fn combines_three_tds_schedules() {
        let mut ret = sample();
        ret.taxes_paid.tds_on_salary = 1_000;
        ret.taxes_paid.tds_on_other_income = 200;
        ret.taxes_paid.tds_on_property_sale = 30;
        ret.taxes_paid.tcs = 4;
        ret.recompute_totals();
        let s = downgrade(&ret).unwrap();
        assert_eq!(s.taxes_paid.total_tds, 1_230);
        assert_eq!(s.taxes_paid.total_taxes_paid, 1_234);
        assert_eq!(s.taxes_paid.total_taxes_paid, ret.taxes_paid.total_taxes_paid);
    }

    #[test]
    fn balance_matches_detailed_return() {
        let ret = sample();
        let s = downgrade(&ret).unwrap();
        assert_eq!(
            s.tax_computation.balance_payable,
            ret.tax_computation.balance_payable
        );
        assert_eq!(s.tax_computation.refund, ret.tax_computation.refund);
    }

    #[test]
    fn representative_capacities_collapse() {
        assert_eq!(
            remap_capacity(VerificationCapacity::RepresentativeAssessee),
            SimplifiedCapacity::Representative
        );
        assert_eq!(
            remap_capacity(VerificationCapacity::LegalRepresentative),
            SimplifiedCapacity::Representative
        );
        assert_eq!(
            remap_capacity(VerificationCapacity::SelfAssessee),
            SimplifiedCapacity::SelfAssessee
        );
    }

    #[test]
    fn unsupported_filing_section_fails() {
        let mut ret = sample();
        ret.part_a_general.filing_section = FilingSection::ModifiedAfterApa;
        assert_eq!(
            downgrade(&ret).unwrap_err(),
            DowngradeError::UnsupportedFilingSection {
                section: FilingSection::ModifiedAfterApa
            }
        );
    }

    #[test]
    fn second_property_cannot_be_expressed() {
        let mut ret = sample();
        ret.schedule_house_property
            .properties
            .push(HouseProperty::new(PropertyType::LetOut));
        assert!(matches!(
            downgrade(&ret),
            Err(DowngradeError::TooManyHouseProperties { count: 2 })
        ));
    }

    #[test]
    fn extreme_let_out_value_downgrades_without_overflow() {
        let mut ret = sample();
        let mut rented = HouseProperty::new(PropertyType::LetOut);
        rented.annual_value = i64::MAX;
        ret.schedule_house_property.properties = vec![rented];
        ret.recompute_totals();
        let s = downgrade(&ret).unwrap();
        assert_eq!(s.income_deductions.house_property_standard_deduction, i64::MAX / 10);
        assert_eq!(
            s.income_deductions.income_from_house_property,
            ret.schedule_house_property.total_income
        );
    }

    #[test]
    fn no_property_leaves_type_absent() {
        let mut ret = sample();
        ret.schedule_house_property.properties.clear();
        ret.recompute_totals();
        let s = downgrade(&ret).unwrap();
        assert!(s.income_deductions.house_property_type.is_none());
        assert_eq!(s.income_deductions.income_from_house_property, 0);
        let json = serde_json::to_value(&s).unwrap();
        assert!(json["IncomeDeductions"].get("HousePropertyType").is_none());
    }
}
