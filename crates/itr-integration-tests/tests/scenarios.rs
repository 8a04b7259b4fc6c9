//! # Reference Scenarios
//!
//! Fixed inputs with hand-checked outputs, run through the public entry
//! points of each crate.

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use itr_capgains::{
    classify, compute, convert, AssetCategory, ConversionError, ForeignTransaction,
    FundTransaction, GainBucket, GainType, RateBucket, Transaction,
};
use itr_core::{EngineConfig, Pan, TaxYear};
use itr_return::{
    ComplexReturn, Disqualification, EligibilityGate, HouseProperty, PartAGeneral, PropertyType,
    Verification, VerificationCapacity,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

// =========================================================================
// Scenario A: domestic long-term equity and debt
// =========================================================================

#[test]
fn scenario_a_domestic_long_term_split() {
    let disposed = d(2023, 9, 15);
    let ledger: Vec<Transaction> = vec![
        FundTransaction::new("Bluechip Equity", AssetCategory::Equity, GainType::LongTerm)
            .with_isin("INF200K01RJ1")
            .with_dates(disposed - chrono::Duration::days(400), disposed)
            .with_amounts(dec!(250), dec!(40000), dec!(50000))
            .into(),
        FundTransaction::new("Corporate Bond", AssetCategory::Debt, GainType::LongTerm)
            .with_dates(disposed - chrono::Duration::days(1_200), disposed)
            .with_amounts(dec!(900), dec!(20000), dec!(25000))
            .into(),
    ];

    let report = compute(&ledger, "2023-24", None, &EngineConfig::default()).unwrap();

    assert_eq!(report.domestic.buckets.equity_long.gain, dec!(10000));
    assert_eq!(report.domestic.buckets.debt_long.gain, dec!(5000));

    let s = &report.schedule;
    assert_eq!(s.long_term.equity_112a.capital_gain, 10_000);
    assert_eq!(s.long_term.other_domestic.capital_gain, 5_000);
    assert_eq!(s.long_term.total_long_term, 15_000);
    assert_eq!(s.short_term.total_short_term, 0);
    assert_eq!(s.short_term.equity_111a.capital_gain, 0);
    assert_eq!(s.total_capital_gains, 15_000);

    // Grandfathering detail lists the equity disposal only.
    assert_eq!(s.schedule_112a.rows.len(), 1);
    assert_eq!(s.schedule_112a.rows[0].isin_code, "INF200K01RJ1");
    assert_eq!(s.schedule_112a.total_balance, 10_000);
    assert!(!s.schedule_112a.fmv_placeholder);
}

#[test]
fn half_rupee_gains_in_separate_periods_stay_consistent() {
    let ledger: Vec<Transaction> = [d(2023, 5, 1), d(2023, 8, 1)]
        .into_iter()
        .map(|disposed| {
            FundTransaction::new("Liquid Fund", AssetCategory::Debt, GainType::ShortTerm)
                .with_dates(disposed - chrono::Duration::days(30), disposed)
                .with_amounts(dec!(1), dec!(100), dec!(100.5))
                .into()
        })
        .collect();

    let report = compute(&ledger, "2023-24", None, &EngineConfig::default()).unwrap();
    let s = &report.schedule;
    let slab = s
        .accrual_receipt
        .rows
        .iter()
        .find(|r| r.rate_bucket == RateBucket::StcgSlab)
        .unwrap();

    assert_eq!(s.short_term.other_domestic.capital_gain, 1);
    assert_eq!(slab.total, s.short_term.total_at_slab_rate);
    assert_eq!(slab.periods().iter().sum::<i64>(), 1);
}

// =========================================================================
// Scenario B: foreign holding period boundary
// =========================================================================

#[test]
fn scenario_b_foreign_holding_period() {
    let cfg = EngineConfig::default();

    let seventeen_months = [ForeignTransaction::new("ACME")
        .with_dates(d(2022, 1, 1), d(2023, 6, 1))
        .with_amounts(dec!(1), dec!(100), dec!(120))];
    let c = classify(&seventeen_months, &TaxYear::parse("2023-24").unwrap(), &cfg);
    assert_eq!(c.bucket(GainBucket::EQUITY_SHORT).len(), 1);
    assert!(c.bucket(GainBucket::EQUITY_LONG).is_empty());

    let twenty_nine_months = [ForeignTransaction::new("ACME")
        .with_dates(d(2022, 1, 1), d(2024, 6, 1))
        .with_amounts(dec!(1), dec!(100), dec!(120))];
    let c = classify(&twenty_nine_months, &TaxYear::parse("2024-25").unwrap(), &cfg);
    assert_eq!(c.bucket(GainBucket::EQUITY_LONG).len(), 1);
    assert!(c.bucket(GainBucket::EQUITY_SHORT).is_empty());
}

// =========================================================================
// Scenario C: empty ledger
// =========================================================================

#[test]
fn scenario_c_empty_ledger_fails() {
    let cfg = EngineConfig::default();
    assert_eq!(
        compute(&[], "2023-24", None, &cfg).unwrap_err(),
        ConversionError::NoTransactions
    );

    let outcome = convert(&[], "2023-24", None, &cfg);
    assert!(!outcome.success);
    assert_eq!(outcome.message, "no transactions found");
    assert!(outcome.report.is_none());
}

#[test]
fn ledger_entirely_outside_period_is_zero_filled_success() {
    let ledger: Vec<Transaction> = vec![FundTransaction::new(
        "Old Redemption",
        AssetCategory::Equity,
        GainType::ShortTerm,
    )
    .with_dates(d(2021, 5, 1), d(2021, 11, 1))
    .with_gain(dec!(900))
    .into()];

    let outcome = convert(&ledger, "2023-24", None, &EngineConfig::default());
    assert!(outcome.success, "{}", outcome.message);
    let report = outcome.report.unwrap();
    assert_eq!(report.out_of_period_transactions(), 1);
    assert_eq!(report.schedule.total_capital_gains, 0);
    assert_eq!(report.schedule.loss_set_off.rows.len(), 4);
    assert_eq!(report.schedule.accrual_receipt.rows.len(), 4);
}

// =========================================================================
// Scenario D: eligibility and a second house property
// =========================================================================

fn salaried_return() -> ComplexReturn {
    let mut ret = ComplexReturn::new(
        &TaxYear::parse("2023-24").unwrap(),
        PartAGeneral::new(Pan::new("AAAPL1234C").unwrap(), "Meera Nair", d(1990, 3, 3)),
        Verification {
            name: "Meera Nair".to_string(),
            capacity: VerificationCapacity::SelfAssessee,
            place: "Kochi".to_string(),
            date: d(2024, 7, 10),
        },
    );
    ret.schedule_salary.gross_salary = 1_500_000;
    ret.schedule_salary.standard_deduction = 50_000;
    let mut home = HouseProperty::new(PropertyType::SelfOccupied);
    home.interest_on_borrowed_capital = 200_000;
    ret.schedule_house_property.properties.push(home);
    ret.recompute_totals();
    ret
}

#[test]
fn scenario_d_second_house_property_disqualifies() {
    let cfg = EngineConfig::default();
    let gate = EligibilityGate::new(&cfg);

    let mut ret = salaried_return();
    assert_eq!(ret.schedule_capital_gains.total_capital_gains, 0);
    assert!(gate.is_eligible(&ret));

    let mut rented = HouseProperty::new(PropertyType::LetOut);
    rented.annual_value = 240_000;
    ret.schedule_house_property.properties.push(rented);
    ret.recompute_totals();

    assert!(!gate.is_eligible(&ret));
    assert_eq!(
        gate.disqualifications(&ret),
        vec![Disqualification::MultipleHouseProperties { count: 2 }]
    );
}
