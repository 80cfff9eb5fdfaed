//! Command implementations for the SPED processor CLI
//!
//! Each subcommand lives in its own module and returns a [`CommandStatus`]
//! that `main` maps to the process exit code.

pub mod process;
pub mod shared;
pub mod validate;

pub use shared::{FileStatus, RunReport};

use crate::Result;
use crate::cli::args::Commands;

/// How a command finished, short of a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Every file was processed
    Success,
    /// At least one file could not be admitted or decoded
    FileFailures,
    /// At least one file ended with a strict mode fatal finding
    StrictViolation,
}

impl CommandStatus {
    /// Strict violations take precedence over file failures
    pub fn from_report(report: &RunReport) -> Self {
        if report.has_strict_violations() {
            Self::StrictViolation
        } else if report.has_failures() {
            Self::FileFailures
        } else {
            Self::Success
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::FileFailures => 1,
            Self::StrictViolation => 2,
        }
    }
}

/// Dispatch to the subcommand handler
pub async fn run(command: Commands) -> Result<CommandStatus> {
    match command {
        Commands::Process(process_args) => process::run_process(process_args).await,
        Commands::Validate(validate_args) => validate::run_validate(validate_args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CommandStatus::Success.exit_code(), 0);
        assert_eq!(CommandStatus::FileFailures.exit_code(), 1);
        assert_eq!(CommandStatus::StrictViolation.exit_code(), 2);
    }
}
