//! # Detailed Return (ITR-2 shaped)
//!
//! Every section of the detailed return, in whole rupees, serialized with
//! the PascalCase keys of `schemas/itr2.schema.json`.
//!
//! Sections that the schema requires are always present and start zeroed.
//! Foreign-asset and foreign-income schedules are optional: their mere
//! presence is meaningful to the eligibility gate.
//!
//! [`ComplexReturn::recompute_totals`] restores every "sum of" field
//! after inputs change. The schema validator does not check arithmetic,
//! so callers must recompute before validating or persisting.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use itr_capgains::{CapitalGainsReport, ScheduleCapitalGains};
use itr_core::amount::{positive, sum_rupees};
use itr_core::{Pan, TaxYear};

use crate::codes::{
    FilingSection, FormHeader, PropertyType, ResidentialStatus, ReturnForm, VerificationCapacity,
};

/// Schema version the detailed return targets.
pub const ITR2_SCHEMA_VERSION: &str = "1.1";

// ---------------------------------------------------------------------------
// Part A: general information
// ---------------------------------------------------------------------------

/// Taxpayer identity and filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartAGeneral {
    /// Permanent account number.
    pub pan: Pan,
    /// Full name.
    pub name: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Residential status for the year.
    pub residential_status: ResidentialStatus,
    /// Section the return is filed under.
    pub filing_section: FilingSection,
    /// Held a directorship in a company during the year.
    pub is_director: bool,
    /// Held unlisted equity shares at any time during the year.
    pub held_unlisted_equity: bool,
}

impl PartAGeneral {
    /// A resident filing on time with no directorship or unlisted holdings.
    pub fn new(pan: Pan, name: impl Into<String>, date_of_birth: NaiveDate) -> Self {
        Self {
            pan,
            name: name.into(),
            date_of_birth,
            residential_status: ResidentialStatus::Resident,
            filing_section: FilingSection::OnOrBeforeDueDate,
            is_director: false,
            held_unlisted_equity: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Income schedules
// ---------------------------------------------------------------------------

/// Salary income.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleSalary {
    /// Gross salary.
    pub gross_salary: i64,
    /// Allowances exempt under section 10.
    pub exempt_allowances: i64,
    /// Gross salary less exempt allowances.
    pub net_salary: i64,
    /// Standard deduction under 16(ia).
    pub standard_deduction: i64,
    /// Professional tax under 16(iii).
    pub professional_tax: i64,
    /// Net salary less deductions under section 16, floored at zero.
    pub income_from_salary: i64,
}

impl ScheduleSalary {
    fn recompute_totals(&mut self) {
        self.net_salary = self.gross_salary.saturating_sub(self.exempt_allowances);
        self.income_from_salary = positive(
            self.net_salary
                .saturating_sub(sum_rupees([self.standard_deduction, self.professional_tax])),
        );
    }
}

/// One house property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HouseProperty {
    /// Use of the property.
    pub property_type: PropertyType,
    /// Gross annual value (zero when self-occupied).
    pub annual_value: i64,
    /// Municipal taxes paid.
    pub municipal_tax_paid: i64,
    /// Annual value less municipal taxes.
    pub net_annual_value: i64,
    /// 30% of net annual value for let-out property.
    pub standard_deduction: i64,
    /// Interest on borrowed capital.
    pub interest_on_borrowed_capital: i64,
    /// Net annual value less deductions; negative for a loss.
    pub income: i64,
}

impl HouseProperty {
    /// A property with no figures.
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            annual_value: 0,
            municipal_tax_paid: 0,
            net_annual_value: 0,
            standard_deduction: 0,
            interest_on_borrowed_capital: 0,
            income: 0,
        }
    }

    fn recompute_totals(&mut self) {
        self.net_annual_value = self.annual_value.saturating_sub(self.municipal_tax_paid);
        self.standard_deduction = if self.property_type.is_let_out() {
            positive(self.net_annual_value).saturating_mul(3) / 10
        } else {
            0
        };
        self.income = self.net_annual_value.saturating_sub(sum_rupees([
            self.standard_deduction,
            self.interest_on_borrowed_capital,
        ]));
    }
}

/// Income from house property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleHouseProperty {
    /// Reported properties.
    pub properties: Vec<HouseProperty>,
    /// Sum of property incomes.
    pub total_income: i64,
}

impl ScheduleHouseProperty {
    fn recompute_totals(&mut self) {
        for p in &mut self.properties {
            p.recompute_totals();
        }
        self.total_income = sum_rupees(self.properties.iter().map(|p| p.income));
    }
}

/// Income from other sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleOtherSources {
    /// Savings account interest.
    pub savings_interest: i64,
    /// Deposit interest.
    pub deposit_interest: i64,
    /// Dividends.
    pub dividends: i64,
    /// Family pension received.
    pub family_pension: i64,
    /// Deduction under 57(iia) on family pension.
    pub family_pension_deduction: i64,
    /// Any other income.
    pub other_income: i64,
    /// Sum of receipts less the family pension deduction.
    pub total_income: i64,
}

impl ScheduleOtherSources {
    fn recompute_totals(&mut self) {
        self.total_income = sum_rupees([
            self.savings_interest,
            self.deposit_interest,
            self.dividends,
            self.family_pension,
            self.other_income,
        ])
        .saturating_sub(self.family_pension_deduction);
    }
}

/// One virtual digital asset transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VdaTransfer {
    /// Acquisition date.
    pub acquisition_date: NaiveDate,
    /// Transfer date.
    pub transfer_date: NaiveDate,
    /// Cost of acquisition.
    pub cost_of_acquisition: i64,
    /// Consideration received.
    pub consideration: i64,
    /// Consideration less cost.
    pub income: i64,
}

/// Income from transfer of virtual digital assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleVda {
    /// Transfers in the year.
    pub transfers: Vec<VdaTransfer>,
    /// Sum of transfer incomes.
    pub total_income: i64,
}

impl ScheduleVda {
    fn recompute_totals(&mut self) {
        for t in &mut self.transfers {
            t.income = t.consideration.saturating_sub(t.cost_of_acquisition);
        }
        self.total_income = sum_rupees(self.transfers.iter().map(|t| t.income));
    }

    /// Whether any transfer produced a positive income.
    pub fn has_positive_income(&self) -> bool {
        self.transfers.iter().any(|t| t.income > 0)
    }
}

/// Losses brought forward from earlier years.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleCarryForwardLoss {
    /// House property loss.
    pub house_property_loss: i64,
    /// Short-term capital loss.
    pub short_term_capital_loss: i64,
    /// Long-term capital loss.
    pub long_term_capital_loss: i64,
    /// Loss from owning and maintaining race horses.
    pub race_horse_loss: i64,
    /// Sum of all categories.
    pub total_loss: i64,
}

impl ScheduleCarryForwardLoss {
    fn categories(&self) -> [i64; 4] {
        [
            self.house_property_loss,
            self.short_term_capital_loss,
            self.long_term_capital_loss,
            self.race_horse_loss,
        ]
    }

    fn recompute_totals(&mut self) {
        self.total_loss = sum_rupees(self.categories());
    }

    /// Whether any category is non-zero.
    pub fn has_loss(&self) -> bool {
        self.categories().iter().any(|l| *l != 0)
    }
}

/// An asset held outside India.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForeignAsset {
    /// ISO country code.
    pub country_code: String,
    /// Nature of the asset.
    pub description: String,
    /// Peak value during the year.
    pub peak_value: i64,
    /// Closing value.
    pub closing_value: i64,
}

/// Foreign assets held during the year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleForeignAssets {
    /// Reported assets.
    pub assets: Vec<ForeignAsset>,
}

/// Income from one foreign country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ForeignIncome {
    /// ISO country code.
    pub country_code: String,
    /// Income included in total income.
    pub income: i64,
    /// Tax paid in that country.
    pub tax_paid: i64,
}

/// Income accruing outside India.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleForeignIncome {
    /// Per-country rows.
    pub rows: Vec<ForeignIncome>,
    /// Sum of incomes.
    pub total_income: i64,
    /// Sum of tax paid.
    pub total_tax_paid: i64,
}

impl ScheduleForeignIncome {
    fn recompute_totals(&mut self) {
        self.total_income = sum_rupees(self.rows.iter().map(|r| r.income));
        self.total_tax_paid = sum_rupees(self.rows.iter().map(|r| r.tax_paid));
    }
}

/// Exempt income, reported for rate purposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleExemptIncome {
    /// Agricultural income.
    pub agricultural_income: i64,
    /// Other exempt income.
    pub other_exempt_income: i64,
    /// Sum of both.
    pub total: i64,
}

/// Chapter VI-A deductions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScheduleDeductions {
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
    /// Sum of all deductions.
    pub total_deductions: i64,
}

impl ScheduleDeductions {
    fn recompute_totals(&mut self) {
        self.total_deductions = sum_rupees([
            self.section_80c,
            self.section_80d,
            self.section_80tta,
            self.other_deductions,
        ]);
    }
}

// ---------------------------------------------------------------------------
// Part B: totals and tax
// ---------------------------------------------------------------------------

/// Part B-TI: computation of total income.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TotalIncome {
    /// From [`ScheduleSalary`].
    pub salaries: i64,
    /// From [`ScheduleHouseProperty`].
    pub house_property: i64,
    /// Capital gains after current-year set-off.
    pub capital_gains: i64,
    /// From [`ScheduleOtherSources`].
    pub other_sources: i64,
    /// Positive virtual digital asset income.
    pub virtual_digital_assets: i64,
    /// Sum of the heads above.
    pub gross_total_income: i64,
    /// Chapter VI-A deductions allowed.
    pub deductions: i64,
    /// Gross total income less deductions, floored at zero.
    pub total_income: i64,
}

/// Part B-TTI: tax liability and settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxComputation {
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

impl TaxComputation {
    fn recompute_totals(&mut self, taxes_paid: i64) {
        self.gross_tax_liability = positive(
            sum_rupees([self.tax_on_total_income, self.surcharge, self.education_cess])
                .saturating_sub(self.rebate_87a),
        );
        self.net_tax_liability = positive(self.gross_tax_liability.saturating_sub(self.relief_89));
        self.aggregate_liability = sum_rupees([self.net_tax_liability, self.interest_and_fee]);
        let balance = self.aggregate_liability.saturating_sub(taxes_paid);
        self.balance_payable = positive(balance);
        self.refund = positive(balance.saturating_neg());
    }
}

/// Taxes already paid, by schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxesPaid {
    /// Schedule TDS1: deducted from salary.
    pub tds_on_salary: i64,
    /// Schedule TDS2: deducted from other income.
    pub tds_on_other_income: i64,
    /// Schedule TDS3: deducted on sale of immovable property.
    pub tds_on_property_sale: i64,
    /// Tax collected at source.
    pub tcs: i64,
    /// Advance tax.
    pub advance_tax: i64,
    /// Self-assessment tax.
    pub self_assessment_tax: i64,
    /// Sum of every payment.
    pub total_taxes_paid: i64,
}

impl TaxesPaid {
    /// TDS across the three deduction schedules.
    pub fn combined_tds(&self) -> i64 {
        sum_rupees([
            self.tds_on_salary,
            self.tds_on_other_income,
            self.tds_on_property_sale,
        ])
    }

    fn recompute_totals(&mut self) {
        self.total_taxes_paid = sum_rupees([
            self.combined_tds(),
            self.tcs,
            self.advance_tax,
            self.self_assessment_tax,
        ]);
    }
}

/// Verification block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Verification {
    /// Name of the signatory.
    pub name: String,
    /// Capacity in which the return is signed.
    pub capacity: VerificationCapacity,
    /// Place of signing.
    pub place: String,
    /// Date of signing.
    pub date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The detailed return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ComplexReturn {
    /// Form identification.
    pub form: FormHeader,
    /// General information.
    pub part_a_general: PartAGeneral,
    /// Salary.
    pub schedule_salary: ScheduleSalary,
    /// House property.
    pub schedule_house_property: ScheduleHouseProperty,
    /// Other sources.
    pub schedule_other_sources: ScheduleOtherSources,
    /// Capital gains.
    pub schedule_capital_gains: ScheduleCapitalGains,
    /// Virtual digital assets.
    #[serde(rename = "ScheduleVDA")]
    pub schedule_vda: ScheduleVda,
    /// Brought-forward losses.
    #[serde(rename = "ScheduleCFL")]
    pub schedule_carry_forward_loss: ScheduleCarryForwardLoss,
    /// Foreign assets, when any are held.
    #[serde(rename = "ScheduleFA", default, skip_serializing_if = "Option::is_none")]
    pub schedule_foreign_assets: Option<ScheduleForeignAssets>,
    /// Foreign income, when any accrued.
    #[serde(rename = "ScheduleFSI", default, skip_serializing_if = "Option::is_none")]
    pub schedule_foreign_income: Option<ScheduleForeignIncome>,
    /// Exempt income.
    #[serde(rename = "ScheduleEI")]
    pub schedule_exempt_income: ScheduleExemptIncome,
    /// Chapter VI-A deductions.
    #[serde(rename = "ScheduleVIA")]
    pub schedule_deductions: ScheduleDeductions,
    /// Part B-TI.
    #[serde(rename = "PartBTI")]
    pub total_income: TotalIncome,
    /// Part B-TTI.
    #[serde(rename = "PartBTTI")]
    pub tax_computation: TaxComputation,
    /// Taxes paid.
    pub taxes_paid: TaxesPaid,
    /// Verification.
    pub verification: Verification,
}

impl ComplexReturn {
    /// A return for `year` with every schedule zeroed, totals consistent.
    pub fn new(year: &TaxYear, part_a_general: PartAGeneral, verification: Verification) -> Self {
        let mut ret = Self {
            form: FormHeader {
                form_name: ReturnForm::Itr2,
                assessment_year: year.assessment_year(),
                schema_version: ITR2_SCHEMA_VERSION.to_string(),
            },
            part_a_general,
            schedule_salary: ScheduleSalary::default(),
            schedule_house_property: ScheduleHouseProperty::default(),
            schedule_other_sources: ScheduleOtherSources::default(),
            schedule_capital_gains: ScheduleCapitalGains::zeroed(),
            schedule_vda: ScheduleVda::default(),
            schedule_carry_forward_loss: ScheduleCarryForwardLoss::default(),
            schedule_foreign_assets: None,
            schedule_foreign_income: None,
            schedule_exempt_income: ScheduleExemptIncome::default(),
            schedule_deductions: ScheduleDeductions::default(),
            total_income: TotalIncome::default(),
            tax_computation: TaxComputation::default(),
            taxes_paid: TaxesPaid::default(),
            verification,
        };
        ret.recompute_totals();
        ret
    }

    /// Builder: install the capital-gains schedule from a conversion.
    pub fn with_capital_gains(mut self, report: &CapitalGainsReport) -> Self {
        self.schedule_capital_gains = report.schedule.clone();
        self.recompute_totals();
        self
    }

    /// Recompute every "sum of" field from its constituents.
    pub fn recompute_totals(&mut self) {
        self.schedule_salary.recompute_totals();
        self.schedule_house_property.recompute_totals();
        self.schedule_other_sources.recompute_totals();
        self.schedule_capital_gains.recompute_totals();
        self.schedule_vda.recompute_totals();
        self.schedule_carry_forward_loss.recompute_totals();
        if let Some(fsi) = self.schedule_foreign_income.as_mut() {
            fsi.recompute_totals();
        }
        let ei = &mut self.schedule_exempt_income;
        ei.total = sum_rupees([ei.agricultural_income, ei.other_exempt_income]);
        self.schedule_deductions.recompute_totals();

        let ti = &mut self.total_income;
        ti.salaries = self.schedule_salary.income_from_salary;
        ti.house_property = self.schedule_house_property.total_income;
        ti.capital_gains = self.schedule_capital_gains.income_after_set_off();
        ti.other_sources = self.schedule_other_sources.total_income;
        ti.virtual_digital_assets = positive(self.schedule_vda.total_income);
        ti.gross_total_income = positive(sum_rupees([
            ti.salaries,
            ti.house_property,
            ti.capital_gains,
            ti.other_sources,
            ti.virtual_digital_assets,
        ]));
        ti.deductions = self
            .schedule_deductions
            .total_deductions
            .min(ti.gross_total_income);
        ti.total_income = positive(ti.gross_total_income.saturating_sub(ti.deductions));

        self.taxes_paid.recompute_totals();
        self.tax_computation
            .recompute_totals(self.taxes_paid.total_taxes_paid);
    }

    /// Number of house properties reported.
    pub fn house_property_count(&self) -> usize {
        self.schedule_house_property.properties.len()
    }
}
