//! Command-line argument definitions for the SPED processor
//!
//! The CLI is a thin clap front end over the library: every flag maps onto a
//! [`Config`](crate::config::Config) field and overrides the file and
//! environment layers.

use crate::config::TableFormat;
use crate::constants::MAX_PARALLEL_WORKERS;
use crate::{Error, Result};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// CLI arguments for the SPED ledger processor
///
/// Parses, validates and consolidates Brazilian SPED fiscal ledger files
/// into flat CSV or Parquet tables.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sped-processor",
    version,
    about = "Parse, validate and consolidate Brazilian SPED ledger files into flat tables",
    long_about = "Reads pipe-delimited SPED fiscal ledger files, validates every field against \
                  the record layouts, links invoice items to their documents, cross-checks \
                  document totals and writes one consolidated row per document plus per-type \
                  detail tables as CSV or Parquet."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process SPED files into consolidated and detail tables
    Process(ProcessArgs),
    /// Validate SPED files and report findings without writing tables
    Validate(ValidateArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Input files or directories
    ///
    /// Directories are walked recursively for `.txt` and `.sped` files.
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for generated tables
    ///
    /// Created if it does not exist. Defaults to ./output
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory for generated tables"
    )]
    pub output_path: Option<PathBuf>,

    /// Table file format
    #[arg(
        long = "format",
        value_enum,
        value_name = "FORMAT",
        help = "Output table format (defaults to the configured format)"
    )]
    pub format: Option<TableFormat>,

    /// Write only consolidated tables
    #[arg(long = "no-details", help = "Skip the per-record detail tables")]
    pub no_details: bool,

    #[command(flatten)]
    pub validation: ValidationArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Input files or directories
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// List every finding in the human report instead of a per-kind summary
    #[arg(long = "findings", help = "List every finding in the report")]
    pub list_findings: bool,

    #[command(flatten)]
    pub validation: ValidationArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Validation policy flags shared by both commands
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct ValidationArgs {
    /// Abort a document's consolidation on its first fatal finding
    #[arg(long = "strict", help = "Enable strict mode")]
    pub strict: bool,

    #[arg(long = "no-validate-cnpj", help = "Skip CNPJ check digit validation")]
    pub no_validate_cnpj: bool,

    #[arg(long = "no-validate-dates", help = "Skip calendar date validation")]
    pub no_validate_dates: bool,

    /// Absolute tolerance for parent total cross-checks
    #[arg(
        long = "tolerance",
        value_name = "AMOUNT",
        help = "Tolerance for total cross-checks (e.g. 0.01)"
    )]
    pub tolerance: Option<Decimal>,

    #[arg(
        long = "delimiter",
        value_name = "CHAR",
        help = "Field delimiter (defaults to '|')"
    )]
    pub delimiter: Option<char>,
}

/// Run settings shared by both commands
#[derive(Debug, Clone, Default, ClapArgs)]
pub struct RunArgs {
    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/sped-processor/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Number of files processed concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel workers"
    )]
    pub workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[arg(
        long = "report",
        value_enum,
        default_value = "human",
        help = "Report format"
    )]
    pub report: ReportFormat,
}

/// Report output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Human,
    /// JSON for scripting
    Json,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<&Commands> {
        self.command.as_ref()
    }
}

impl RunArgs {
    /// Check the run settings for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(workers) = self.workers {
            if workers == 0 || workers > MAX_PARALLEL_WORKERS {
                return Err(Error::configuration(format!(
                    "Number of workers must be between 1 and {}",
                    MAX_PARALLEL_WORKERS
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Progress bars are hidden in quiet mode and for JSON reports
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.report == ReportFormat::Human
    }
}

impl ValidationArgs {
    pub fn validate(&self) -> Result<()> {
        if let Some(tolerance) = self.tolerance {
            if tolerance.is_sign_negative() {
                return Err(Error::configuration(format!(
                    "Tolerance must not be negative, got {}",
                    tolerance
                )));
            }
        }
        Ok(())
    }
}

impl ProcessArgs {
    /// Check the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        validate_inputs(&self.inputs)?;

        if let Some(output_path) = &self.output_path {
            if output_path.is_file() {
                return Err(Error::configuration(format!(
                    "Output path is a file: {}",
                    output_path.display()
                )));
            }
        }

        self.validation.validate()?;
        self.run.validate()
    }
}

impl ValidateArgs {
    pub fn validate(&self) -> Result<()> {
        validate_inputs(&self.inputs)?;
        self.validation.validate()?;
        self.run.validate()
    }
}

fn validate_inputs(inputs: &[PathBuf]) -> Result<()> {
    for input in inputs {
        if !input.exists() {
            return Err(Error::configuration(format!(
                "Input path does not exist: {}",
                input.display()
            )));
        }
    }
    Ok(())
}
