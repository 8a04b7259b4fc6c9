//! # itr CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use itr_cli::convert::{run_convert, ConvertArgs};
use itr_cli::returns::{run_downgrade, run_eligibility, ReturnArgs};
use itr_cli::validate::{run_validate, ValidateArgs};

/// ITR stack CLI.
///
/// Builds the capital-gains schedule of an individual income-tax return
/// from transaction ledgers, decides whether the simplified return may be
/// filed, and validates return documents against their schemas.
#[derive(Parser, Debug)]
#[command(name = "itr", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Engine configuration (YAML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a transaction ledger into a capital-gains schedule.
    Convert(ConvertArgs),

    /// Report whether a detailed return may be filed in simplified form.
    Eligibility(ReturnArgs),

    /// Re-express an eligible detailed return as a simplified return.
    Downgrade(ReturnArgs),

    /// Validate a document or one of its sections against a schema.
    Validate(ValidateArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = cli.config.as_deref();
    let result = match cli.command {
        Commands::Convert(args) => run_convert(&args, config),
        Commands::Eligibility(args) => run_eligibility(&args, config),
        Commands::Downgrade(args) => run_downgrade(&args, config),
        Commands::Validate(args) => run_validate(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
