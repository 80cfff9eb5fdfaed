//! Process command implementation
//!
//! Loads configuration, runs the batch over every input file, writes the
//! consolidated and detail tables and prints the run report.

use super::CommandStatus;
use super::shared::{
    RunReport, WrittenTable, file_size, load_configuration, run_batch, setup_logging,
};
use crate::app::services::tabular_export::{Table, sink_for, tables_from_batch};
use crate::cli::args::ProcessArgs;
use crate::config::Config;
use crate::{Error, Result};
use tracing::{debug, info, warn};

/// Process command runner
///
/// 1. Set up logging and configuration
/// 2. Discover input files and process them concurrently
/// 3. Write tables to the output directory
/// 4. Report metrics and per-file status
pub async fn run_process(args: ProcessArgs) -> Result<CommandStatus> {
    setup_logging(&args.run)?;

    info!("Starting SPED processor");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;

    let mut config = load_configuration(&args.run, &args.validation)?;
    apply_output_overrides(&mut config, &args);
    debug!("Loaded configuration: {:?}", config);

    config.ensure_output_directory()?;

    let batch = run_batch(&config, &args.inputs, args.run.show_progress()).await?;
    batch.metrics.log_summary();

    for (path, error) in batch.failures() {
        warn!("{} was not processed: {}", path.display(), error);
    }

    let tables = tables_from_batch(&batch, config.processing.write_detail_tables);
    let written = write_tables(&config, tables).await?;

    let mut report = RunReport::from_batch("process", &batch, false);
    report.tables = written;
    report.print(args.run.report)?;

    Ok(CommandStatus::from_report(&report))
}

/// Apply the process-only flags
fn apply_output_overrides(config: &mut Config, args: &ProcessArgs) {
    if let Some(output_path) = &args.output_path {
        config.processing.output_path = output_path.clone();
    }
    if let Some(format) = args.format {
        config.processing.output_format = format;
    }
    if args.no_details {
        config.processing.write_detail_tables = false;
    }
}

/// Write every table through the configured sink off the async runtime
async fn write_tables(config: &Config, tables: Vec<Table>) -> Result<Vec<WrittenTable>> {
    if tables.is_empty() {
        warn!("No tables to write");
        return Ok(Vec::new());
    }

    let output_path = config.processing.output_path.clone();
    let format = config.processing.output_format;
    info!(
        "Writing {} tables to {}",
        tables.len(),
        output_path.display()
    );

    tokio::task::spawn_blocking(move || {
        let sink = sink_for(format, &output_path);
        tables
            .iter()
            .map(|table| {
                let path = sink.write_table(table)?;
                Ok::<_, Error>(WrittenTable {
                    name: table.name.clone(),
                    size_bytes: file_size(&path),
                    rows: table.len(),
                    path,
                })
            })
            .collect::<Result<Vec<_>>>()
    })
    .await
    .map_err(|e| Error::processing_interrupted(format!("table writer failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{RunArgs, ValidationArgs};
    use crate::config::TableFormat;
    use std::path::PathBuf;

    fn process_args() -> ProcessArgs {
        ProcessArgs {
            inputs: vec![PathBuf::from("ledger.txt")],
            output_path: None,
            format: None,
            no_details: false,
            validation: ValidationArgs::default(),
            run: RunArgs::default(),
        }
    }

    #[test]
    fn test_output_overrides() {
        let mut config = Config::default();
        let mut args = process_args();
        apply_output_overrides(&mut config, &args);
        assert_eq!(config.processing.output_format, TableFormat::Csv);
        assert!(config.processing.write_detail_tables);

        args.output_path = Some(PathBuf::from("tables"));
        args.format = Some(TableFormat::Parquet);
        args.no_details = true;
        apply_output_overrides(&mut config, &args);
        assert_eq!(config.processing.output_path, PathBuf::from("tables"));
        assert_eq!(config.processing.output_format, TableFormat::Parquet);
        assert!(!config.processing.write_detail_tables);
    }

    #[tokio::test]
    async fn test_write_tables_reports_sizes() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = Config::new(dir.path().to_path_buf());
        let mut table = Table::new("X_DETALHE", vec!["LINE".to_string()]);
        table
            .rows
            .push(vec![crate::app::models::Cell::Integer(1)]);

        let written = write_tables(&config, vec![table]).await.unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].rows, 1);
        assert!(written[0].size_bytes > 0);
        assert!(written[0].path.ends_with("X_DETALHE.csv"));
    }
}
