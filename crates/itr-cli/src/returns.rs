//! # Eligibility and Downgrade Subcommands
//!
//! Both read a detailed return from JSON. `itr eligibility` reports the
//! gate's decision with every disqualification; `itr downgrade` prints the
//! simplified return when the gate allows it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use itr_return::{downgrade, ComplexReturn, EligibilityGate};

/// Arguments shared by `itr eligibility` and `itr downgrade`.
#[derive(Args, Debug)]
pub struct ReturnArgs {
    /// Detailed return (JSON).
    #[arg(value_name = "RETURN")]
    pub path: PathBuf,
}

fn load_return(path: &Path) -> Result<ComplexReturn> {
    let mut ret: ComplexReturn = crate::read_json(path)?;
    ret.recompute_totals();
    Ok(ret)
}

/// Execute the eligibility subcommand.
///
/// Returns exit code: 0 when eligible, 1 when not.
pub fn run_eligibility(args: &ReturnArgs, config: Option<&Path>) -> Result<u8> {
    let config = crate::load_config(config)?;
    let ret = load_return(&args.path)?;
    let reasons = EligibilityGate::new(&config).disqualifications(&ret);

    if reasons.is_empty() {
        println!("eligible");
        return Ok(0);
    }
    println!("ineligible");
    for reason in &reasons {
        println!("  - {reason}");
    }
    Ok(1)
}

/// Execute the downgrade subcommand.
///
/// Returns exit code: 0 with the simplified return on stdout, 1 when the
/// return is ineligible.
pub fn run_downgrade(args: &ReturnArgs, config: Option<&Path>) -> Result<u8> {
    let config = crate::load_config(config)?;
    let ret = load_return(&args.path)?;
    let reasons = EligibilityGate::new(&config).disqualifications(&ret);
    if !reasons.is_empty() {
        let list: Vec<String> = reasons.iter().map(ToString::to_string).collect();
        eprintln!("return is not eligible for the simplified form: {}", list.join(", "));
        return Ok(1);
    }

    let simplified = downgrade(&ret).context("cannot express return in simplified form")?;
    crate::print_json(&simplified)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itr_core::{Pan, TaxYear};
    use itr_return::{PartAGeneral, Verification, VerificationCapacity};

    fn write_return(dir: &Path, edit: impl FnOnce(&mut ComplexReturn)) -> ReturnArgs {
        let mut ret = ComplexReturn::new(
            &TaxYear::parse("2023-24").unwrap(),
            PartAGeneral::new(Pan::new("ABCDE1234F").unwrap(), "Ravi Iyer", date(1980, 1, 5)),
            Verification {
                name: "Ravi Iyer".to_string(),
                capacity: VerificationCapacity::SelfAssessee,
                place: "Chennai".to_string(),
                date: date(2024, 7, 1),
            },
        );
        ret.schedule_salary.gross_salary = 800_000;
        edit(&mut ret);
        let path = dir.join("return.json");
        std::fs::write(&path, serde_json::to_string(&ret).unwrap()).unwrap();
        ReturnArgs { path }
    }

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn salaried_return_is_eligible_and_downgrades() {
        let dir = tempfile::tempdir().unwrap();
        let args = write_return(dir.path(), |_| {});
        assert_eq!(run_eligibility(&args, None).unwrap(), 0);
        assert_eq!(run_downgrade(&args, None).unwrap(), 0);
    }

    #[test]
    fn director_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let args = write_return(dir.path(), |r| r.part_a_general.is_director = true);
        assert_eq!(run_eligibility(&args, None).unwrap(), 1);
        assert_eq!(run_downgrade(&args, None).unwrap(), 1);
    }

    #[test]
    fn config_threshold_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let args = write_return(dir.path(), |_| {});
        let cfg = dir.path().join("cfg.yaml");
        std::fs::write(&cfg, "simplified_income_threshold: 100000\n").unwrap();
        assert_eq!(run_eligibility(&args, Some(&cfg)).unwrap(), 1);
    }
}
