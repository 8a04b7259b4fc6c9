//! # Eligibility Gate
//!
//! Decides whether a detailed return may be filed as the simplified
//! variant. The gate is a pure function of the return and the engine
//! configuration: no state, no caching, no side effects beyond debug
//! logging.
//!
//! Any one [`Disqualification`] makes the return ineligible.

use serde::{Deserialize, Serialize};

use itr_core::EngineConfig;

use crate::codes::ResidentialStatus;
use crate::complex::ComplexReturn;

/// A reason the simplified return is unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Disqualification {
    /// Total income exceeds the configured threshold.
    IncomeAboveThreshold {
        /// Total income on the return.
        total_income: i64,
        /// Configured threshold.
        threshold: i64,
    },
    /// A capital-gains line reports a positive gain.
    CapitalGains,
    /// A virtual digital asset transfer produced positive income.
    VirtualDigitalAssets,
    /// More house properties than the simplified form allows.
    MultipleHouseProperties {
        /// Properties reported.
        count: usize,
    },
    /// A brought-forward loss is reported.
    CarriedForwardLoss,
    /// The foreign-assets schedule is present.
    ForeignAssets,
    /// The foreign-income schedule is present.
    ForeignIncome,
    /// The taxpayer was a company director.
    Director,
    /// The taxpayer held unlisted equity shares.
    UnlistedEquity,
    /// The taxpayer is not resident.
    NonResident,
    /// Agricultural income exceeds the configured ceiling.
    AgriculturalIncomeAboveLimit {
        /// Agricultural income on the return.
        amount: i64,
        /// Configured ceiling.
        limit: i64,
    },
}

impl Disqualification {
    /// Short machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IncomeAboveThreshold { .. } => "income_above_threshold",
            Self::CapitalGains => "capital_gains",
            Self::VirtualDigitalAssets => "virtual_digital_assets",
            Self::MultipleHouseProperties { .. } => "multiple_house_properties",
            Self::CarriedForwardLoss => "carried_forward_loss",
            Self::ForeignAssets => "foreign_assets",
            Self::ForeignIncome => "foreign_income",
            Self::Director => "director",
            Self::UnlistedEquity => "unlisted_equity",
            Self::NonResident => "non_resident",
            Self::AgriculturalIncomeAboveLimit { .. } => "agricultural_income_above_limit",
        }
    }
}

impl std::fmt::Display for Disqualification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncomeAboveThreshold {
                total_income,
                threshold,
            } => write!(f, "total income {total_income} exceeds {threshold}"),
            Self::MultipleHouseProperties { count } => {
                write!(f, "{count} house properties reported")
            }
            Self::AgriculturalIncomeAboveLimit { amount, limit } => {
                write!(f, "agricultural income {amount} exceeds {limit}")
            }
            other => f.write_str(other.as_str()),
        }
    }
}

/// Evaluates simplified-return eligibility under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityGate<'a> {
    config: &'a EngineConfig,
}

impl<'a> EligibilityGate<'a> {
    /// Create a gate reading thresholds from `config`.
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Whether the return may be filed as the simplified variant.
    pub fn is_eligible(&self, ret: &ComplexReturn) -> bool {
        self.disqualifications(ret).is_empty()
    }

    /// Every predicate that fires for `ret`, in a fixed order.
    pub fn disqualifications(&self, ret: &ComplexReturn) -> Vec<Disqualification> {
        let cfg = self.config;
        let general = &ret.part_a_general;
        let mut out = Vec::new();

        let total_income = ret.total_income.total_income;
        if total_income > cfg.simplified_income_threshold {
            out.push(Disqualification::IncomeAboveThreshold {
                total_income,
                threshold: cfg.simplified_income_threshold,
            });
        }
        if ret.schedule_capital_gains.has_positive_gain() {
            out.push(Disqualification::CapitalGains);
        }
        if ret.schedule_vda.has_positive_income() {
            out.push(Disqualification::VirtualDigitalAssets);
        }
        let count = ret.house_property_count();
        if count > cfg.simplified_max_house_properties {
            out.push(Disqualification::MultipleHouseProperties { count });
        }
        if ret.schedule_carry_forward_loss.has_loss() {
            out.push(Disqualification::CarriedForwardLoss);
        }
        if ret.schedule_foreign_assets.is_some() {
            out.push(Disqualification::ForeignAssets);
        }
        if ret.schedule_foreign_income.is_some() {
            out.push(Disqualification::ForeignIncome);
        }
        if general.is_director {
            out.push(Disqualification::Director);
        }
        if general.held_unlisted_equity {
            out.push(Disqualification::UnlistedEquity);
        }
        match general.residential_status {
            ResidentialStatus::Resident => {}
            ResidentialStatus::NotOrdinarilyResident | ResidentialStatus::NonResident => {
                out.push(Disqualification::NonResident);
            }
        }
        let agri = ret.schedule_exempt_income.agricultural_income;
        if agri > cfg.agricultural_income_limit {
            out.push(Disqualification::AgriculturalIncomeAboveLimit {
                amount: agri,
                limit: cfg.agricultural_income_limit,
            });
        }

        tracing::debug!(
            pan = %general.pan,
            eligible = out.is_empty(),
            reasons = out.len(),
            "evaluated simplified-return eligibility"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complex::tests::sample;
    use crate::complex::{
        ForeignAsset, ForeignIncome, HouseProperty, ScheduleForeignAssets, ScheduleForeignIncome,
        VdaTransfer,
    };
    use crate::codes::PropertyType;
    use chrono::NaiveDate;

    fn gate_eval(ret: &ComplexReturn) -> (bool, Vec<Disqualification>) {
        let cfg = EngineConfig::default();
        let gate = EligibilityGate::new(&cfg);
        (gate.is_eligible(ret), gate.disqualifications(ret))
    }

    #[test]
    fn baseline_is_eligible() {
        let (eligible, reasons) = gate_eval(&sample());
        assert!(eligible, "{reasons:?}");
    }

    #[test]
    fn each_predicate_flips_the_result() {
        let flips: Vec<(&str, Box<dyn Fn(&mut ComplexReturn)>)> = vec![
            (
                "income_above_threshold",
                Box::new(|r: &mut ComplexReturn| r.schedule_salary.gross_salary = 9_000_000),
            ),
            (
                "capital_gains",
                Box::new(|r: &mut ComplexReturn| {
                    r.schedule_capital_gains.short_term.equity_111a.capital_gain = 1
                }),
            ),
            (
                "virtual_digital_assets",
                Box::new(|r: &mut ComplexReturn| {
                    r.schedule_vda.transfers.push(VdaTransfer {
                        acquisition_date: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
                        transfer_date: NaiveDate::from_ymd_opt(2023, 9, 1).unwrap(),
                        cost_of_acquisition: 100,
                        consideration: 150,
                        income: 0,
                    })
                }),
            ),
            (
                "multiple_house_properties",
                Box::new(|r: &mut ComplexReturn| {
                    r.schedule_house_property
                        .properties
                        .push(HouseProperty::new(PropertyType::LetOut))
                }),
            ),
            (
                "carried_forward_loss",
                Box::new(|r: &mut ComplexReturn| {
                    r.schedule_carry_forward_loss.long_term_capital_loss = 10
                }),
            ),
            (
                "foreign_assets",
                Box::new(|r: &mut ComplexReturn| {
                    r.schedule_foreign_assets = Some(ScheduleForeignAssets {
                        assets: vec![ForeignAsset {
                            country_code: "US".to_string(),
                            description: "Brokerage account".to_string(),
                            peak_value: 1,
                            closing_value: 1,
                        }],
                    })
                }),
            ),
            (
                "foreign_income",
                Box::new(|r: &mut ComplexReturn| {
                    r.schedule_foreign_income = Some(ScheduleForeignIncome {
                        rows: vec![ForeignIncome {
                            country_code: "US".to_string(),
                            income: 10,
                            tax_paid: 2,
                        }],
                        total_income: 0,
                        total_tax_paid: 0,
                    })
                }),
            ),
            (
                "director",
                Box::new(|r: &mut ComplexReturn| r.part_a_general.is_director = true),
            ),
            (
                "unlisted_equity",
                Box::new(|r: &mut ComplexReturn| {
                    r.part_a_general.held_unlisted_equity = true
                }),
            ),
            (
                "non_resident",
                Box::new(|r: &mut ComplexReturn| {
                    r.part_a_general.residential_status = ResidentialStatus::NonResident
                }),
            ),
            (
                "agricultural_income_above_limit",
                Box::new(|r: &mut ComplexReturn| {
                    r.schedule_exempt_income.agricultural_income = 5_001
                }),
            ),
        ];

        for (name, flip) in flips {
            let mut ret = sample();
            flip(&mut ret);
            ret.recompute_totals();
            let (eligible, reasons) = gate_eval(&ret);
            assert!(!eligible, "{name} should disqualify");
            assert_eq!(reasons.len(), 1, "{name}: {reasons:?}");
            assert_eq!(reasons[0].as_str(), name);
        }
    }

    #[test]
    fn capital_loss_alone_does_not_disqualify() {
        let mut ret = sample();
        ret.schedule_capital_gains.long_term.other_domestic.capital_gain = -500;
        ret.recompute_totals();
        assert!(gate_eval(&ret).0);
    }

    #[test]
    fn income_at_threshold_is_eligible() {
        let cfg = EngineConfig::default();
        let mut ret = sample();
        ret.total_income.total_income = cfg.simplified_income_threshold;
        assert!(EligibilityGate::new(&cfg).is_eligible(&ret));
    }

    #[test]
    fn gate_is_pure() {
        let ret = sample();
        let cfg = EngineConfig::default();
        let gate = EligibilityGate::new(&cfg);
        let first = gate.disqualifications(&ret);
        for _ in 0..3 {
            assert_eq!(gate.disqualifications(&ret), first);
        }
    }

    #[test]
    fn display_includes_amounts() {
        let d = Disqualification::IncomeAboveThreshold {
            total_income: 6_000_000,
            threshold: 5_000_000,
        };
        assert_eq!(d.to_string(), "total income 6000000 exceeds 5000000");
        assert_eq!(Disqualification::Director.to_string(), "director");
    }
}
