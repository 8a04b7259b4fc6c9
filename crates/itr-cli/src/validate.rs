//! # Validate Subcommand
//!
//! Checks a JSON document, or one named section of it, against a return
//! schema and prints every violation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use itr_schema::{ReturnValidator, ValidationResult};

/// Arguments for the `itr validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Document to validate (JSON).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Schema file.
    #[arg(long, value_name = "SCHEMA", default_value = "schemas/itr2.schema.json")]
    pub schema: PathBuf,

    /// Validate against this named definition instead of the whole schema.
    /// The document is taken to be the section itself.
    #[arg(long, value_name = "NAME")]
    pub section: Option<String>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the document conforms, 1 otherwise.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let validator = ReturnValidator::from_path(&args.schema)
        .with_context(|| format!("cannot load schema {}", args.schema.display()))?;
    let document: Value = crate::read_json(&args.path)?;

    let result = match &args.section {
        Some(name) => validator
            .validate_section(&document, name)
            .with_context(|| format!("cannot validate section {name}"))?,
        None => validator.validate(&document),
    };

    if args.json {
        crate::print_json(&result)?;
    } else {
        match &result {
            ValidationResult::Valid => println!("{}: OK", args.path.display()),
            ValidationResult::Invalid(violations) => {
                println!("{}: {} violation(s)", args.path.display(), violations.len());
                for v in violations {
                    println!("  FAIL: {v}");
                }
            }
        }
    }
    Ok(if result.is_valid() { 0 } else { 1 })
}
