//! Validate command implementation
//!
//! Runs the full core over the inputs and reports findings without writing
//! any tables.

use super::CommandStatus;
use super::shared::{RunReport, load_configuration, run_batch, setup_logging};
use crate::Result;
use crate::cli::args::{ReportFormat, ValidateArgs};
use tracing::{debug, info};

pub async fn run_validate(args: ValidateArgs) -> Result<CommandStatus> {
    setup_logging(&args.run)?;

    info!("Starting SPED validation");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let config = load_configuration(&args.run, &args.validation)?;
    debug!("Loaded configuration: {:?}", config);

    let batch = run_batch(&config, &args.inputs, args.run.show_progress()).await?;
    batch.metrics.log_summary();

    // JSON reports always carry the full finding list
    let with_findings = args.list_findings || args.run.report == ReportFormat::Json;
    let report = RunReport::from_batch("validation", &batch, with_findings);
    report.print(args.run.report)?;

    Ok(CommandStatus::from_report(&report))
}
