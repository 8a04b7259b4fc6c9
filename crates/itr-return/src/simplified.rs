//! # Simplified Return (ITR-1 shaped)
//!
//! A flat, single-page return for resident individuals with salary, at
//! most one house property and other-sources income. Keys follow
//! `schemas/itr1.schema.json`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use itr_core::amount::{positive, sum_rupees};
use itr_core::Pan;

use crate::codes::{FormHeader, PropertyType, SimplifiedCapacity, SimplifiedFilingSection};

/// Schema version the simplified return targets.
pub const ITR1_SCHEMA_VERSION: &str = "1.2";

/// Taxpayer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonalInfo {
    /// Permanent account number.
    pub pan: Pan,
    /// Full name.
    pub name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
}

/// Filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FilingStatus {
    /// Section the return is filed under.
    pub filing_section: SimplifiedFilingSection,
}

/// Income heads and deductions on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IncomeDeductions {
    /// Gross salary.
    pub gross_salary: i64,
    /// Allowances exempt under section 10.
    pub exempt_allowances: i64,
    /// Gross salary less exempt allowances.
    pub net_salary: i64,
    /// Standard deduction under 16(ia).
    pub standard_deduction: i64,
    /// Entertainment allowance under 16(ii).
    pub entertainment_allowance: i64,
    /// Professional tax under 16(iii).
    pub professional_tax: i64,
    /// Net salary less deductions under section 16, floored at zero.
    pub income_from_salary: i64,
    /// Use of the house property, if one is reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house_property_type: Option<PropertyType>,
    /// Gross annual value.
    pub annual_value: i64,
    /// Municipal taxes paid.
    pub municipal_tax_paid: i64,
    /// Annual value less municipal taxes.
    pub net_annual_value: i64,
    /// 30% of net annual value for let-out property.
    pub house_property_standard_deduction: i64,
    /// Interest on borrowed capital.
    pub interest_on_borrowed_capital: i64,
    /// Income from house property; negative for a loss.
    pub income_from_house_property: i64,
    /// Income from other sources, net of the family pension deduction.
    pub income_from_other_sources: i64,
    /// Deduction under 57(iia), already netted above.
    pub family_pension_deduction: i64,
    /// Sum of the three heads, floored at zero.
    pub gross_total_income: i64,
    /// 80C.
    #[serde(rename = "Section80C")]
    pub section_80c: i64,
    /// 80D.
    #[serde(rename = "Section80D")]
    pub section_80d: i64,
    /// 80TTA.
    #[serde(rename = "Section80TTA")]
    pub section_80tta: i64,
    /// Any other section.
    pub other_deductions: i64,
    /// Deductions allowed, capped at gross total income.
    pub total_deductions: i64,
    /// Gross total income less deductions.
    pub total_income: i64,
    /// Exempt agricultural income.
    pub exempt_agricultural_income: i64,
}

impl IncomeDeductions {
    fn recompute_totals(&mut self) {
        self.net_salary = self.gross_salary.saturating_sub(self.exempt_allowances);
        self.income_from_salary = positive(self.net_salary.saturating_sub(sum_rupees([
            self.standard_deduction,
            self.entertainment_allowance,
            self.professional_tax,
        ])));

        self.net_annual_value = self.annual_value.saturating_sub(self.municipal_tax_paid);
        self.house_property_standard_deduction = match self.house_property_type {
            Some(t) if t.is_let_out() => positive(self.net_annual_value).saturating_mul(3) / 10,
            Some(_) | None => 0,
        };
        self.income_from_house_property = self.net_annual_value.saturating_sub(sum_rupees([
            self.house_property_standard_deduction,
            self.interest_on_borrowed_capital,
        ]));

        self.gross_total_income = positive(sum_rupees([
            self.income_from_salary,
            self.income_from_house_property,
            self.income_from_other_sources,
        ]));
        self.total_deductions = sum_rupees([
            self.section_80c,
            self.section_80d,
            self.section_80tta,
            self.other_deductions,
        ])
        .min(self.gross_total_income);
        self.total_income = positive(self.gross_total_income.saturating_sub(self.total_deductions));
    }
}

/// Tax liability and settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimplifiedTaxComputation {
    /// Tax on total income.
    pub tax_on_total_income: i64,
    /// Rebate under 87A.
    pub rebate_87a: i64,
    /// Surcharge.
    pub surcharge: i64,
    /// Health and education cess.
    pub education_cess: i64,
    /// Tax less rebate plus surcharge and cess, floored at zero.
    pub gross_tax_liability: i64,
    /// Relief under 89.
    pub relief_89: i64,
    /// Gross liability less relief, floored at zero.
    pub net_tax_liability: i64,
    /// Interest under 234A/B/C and fee under 234F.
    pub interest_and_fee: i64,
    /// Net liability plus interest and fee.
    pub aggregate_liability: i64,
    /// Aggregate liability less taxes paid, when positive.
    pub balance_payable: i64,
    /// Taxes paid less aggregate liability, when positive.
    pub refund: i64,
}

/// Taxes paid, with the three TDS schedules combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimplifiedTaxesPaid {
    /// TDS on salary, other income and property sale.
    pub total_tds: i64,
    /// Tax collected at source.
    pub tcs: i64,
    /// Advance tax.
    pub advance_tax: i64,
    /// Self-assessment tax.
    pub self_assessment_tax: i64,
    /// Sum of every payment.
    pub total_taxes_paid: i64,
}

/// Verification block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimplifiedVerification {
    /// Name of the signatory.
    pub name: String,
    /// Capacity in which the return is signed.
    pub capacity: SimplifiedCapacity,
    /// Place of signing.
    pub place: String,
    /// Date of signing.
    pub date: NaiveDate,
}

/// The simplified return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimplifiedReturn {
    /// Form identification.
    pub form: FormHeader,
    /// Identity.
    pub personal_info: PersonalInfo,
    /// Filing status.
    pub filing_status: FilingStatus,
    /// Income and deductions.
    pub income_deductions: IncomeDeductions,
    /// Tax computation.
    pub tax_computation: SimplifiedTaxComputation,
    /// Taxes paid.
    pub taxes_paid: SimplifiedTaxesPaid,
    /// Verification.
    pub verification: SimplifiedVerification,
}

impl SimplifiedReturn {
    /// Recompute every "sum of" field from its constituents.
    pub fn recompute_totals(&mut self) {
        self.income_deductions.recompute_totals();

        let paid = &mut self.taxes_paid;
        paid.total_taxes_paid = sum_rupees([
            paid.total_tds,
            paid.tcs,
            paid.advance_tax,
            paid.self_assessment_tax,
        ]);

        let tax = &mut self.tax_computation;
        tax.gross_tax_liability = positive(
            sum_rupees([tax.tax_on_total_income, tax.surcharge, tax.education_cess])
                .saturating_sub(tax.rebate_87a),
        );
        tax.net_tax_liability = positive(tax.gross_tax_liability.saturating_sub(tax.relief_89));
        tax.aggregate_liability = sum_rupees([tax.net_tax_liability, tax.interest_and_fee]);
        let balance = tax
            .aggregate_liability
            .saturating_sub(self.taxes_paid.total_taxes_paid);
        tax.balance_payable = positive(balance);
        tax.refund = positive(balance.saturating_neg());
    }
}
