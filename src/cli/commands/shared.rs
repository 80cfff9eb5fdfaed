//! Shared components for CLI commands
//!
//! Logging setup, layered configuration, progress bars and the run report
//! used by both the process and validate commands.

use crate::app::adapters::line_source::discover_input_files;
use crate::app::models::Finding;
use crate::app::services::metrics::Metrics;
use crate::app::services::pipeline::{BatchOutcome, BatchProcessor, FileProcessor};
use crate::cli::args::{ReportFormat, RunArgs, ValidationArgs};
use crate::config::Config;
use crate::{Error, Result};
use colored::*;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Set up structured logging on stderr
pub fn setup_logging(run: &RunArgs) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = run.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sped_processor={}", log_level)));

    if run.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
            .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (file -> env -> args)
pub fn load_configuration(run: &RunArgs, validation: &ValidationArgs) -> Result<Config> {
    info!("Loading configuration");

    let default_config_path = match &run.config_file {
        Some(_) => None,
        None => Config::default_config_path().ok(),
    };

    let config_file = match &run.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_deref()
            .filter(|path| path.exists()),
    };

    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file found, using defaults and environment variables"),
    }

    let mut config = Config::load_layered(config_file)?;
    apply_cli_overrides(&mut config, run, validation);
    config.validate()?;

    Ok(config)
}

/// Apply CLI flags on top of the file and environment layers
///
/// Boolean flags only ever switch a setting in the direction they name, so
/// an absent flag keeps the lower layer's value.
pub fn apply_cli_overrides(config: &mut Config, run: &RunArgs, validation: &ValidationArgs) {
    if validation.strict {
        config.validation.strict_mode = true;
    }
    if validation.no_validate_cnpj {
        config.validation.validate_cnpj = false;
    }
    if validation.no_validate_dates {
        config.validation.validate_dates = false;
    }
    if let Some(tolerance) = validation.tolerance {
        config.validation.validation_tolerance = tolerance;
    }
    if let Some(delimiter) = validation.delimiter {
        config.validation.field_delimiter = delimiter;
    }

    if let Some(workers) = run.workers {
        config.performance.parallel_workers = workers;
    }

    config.logging.level = run.get_log_level().to_string();
}

/// Expand the inputs and run the batch with an optional progress bar
pub async fn run_batch(config: &Config, inputs: &[PathBuf], show_progress: bool) -> Result<BatchOutcome> {
    let files = discover_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::configuration(
            "No .txt or .sped files found in the given inputs",
        ));
    }

    let processor = FileProcessor::from_config(&config.validation);
    let batch = BatchProcessor::new(
        processor,
        config.processing.max_file_size_mb,
        config.performance.parallel_workers,
    );

    let progress = show_progress
        .then(|| create_progress_bar(files.len() as u64, "Processing SPED files"));

    batch.run(&files, progress).await
}

/// Create a progress bar with the standard styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} [{per_sec}] ETA: {eta}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Format a byte count in human-readable units
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.2} {}", size, UNITS[unit_index])
    }
}

/// Outcome of one input file in the run report
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: PathBuf,
    pub status: FileStatus,
    pub records: usize,
    pub findings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub finding_list: Vec<Finding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Ok,
    StrictViolation,
    Failed,
}

/// A table written by the process command
#[derive(Debug, Clone, Serialize)]
pub struct WrittenTable {
    pub name: String,
    pub path: PathBuf,
    pub rows: usize,
    pub size_bytes: u64,
}

/// Serializable summary of a process or validate run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub command: &'static str,
    pub files: Vec<FileSummary>,
    pub metrics: Metrics,
    pub tables: Vec<WrittenTable>,
    pub elapsed_seconds: f64,
}

impl RunReport {
    /// Build the report from a batch outcome
    ///
    /// `with_findings` attaches every record and group finding per file.
    pub fn from_batch(command: &'static str, batch: &BatchOutcome, with_findings: bool) -> Self {
        let files = batch
            .files
            .iter()
            .map(|report| match &report.outcome {
                Ok(outcome) => FileSummary {
                    path: report.path.clone(),
                    status: if outcome.first_fatal.is_some() {
                        FileStatus::StrictViolation
                    } else {
                        FileStatus::Ok
                    },
                    records: outcome.metrics.records(),
                    findings: outcome.metrics.total_findings(),
                    error: outcome.strict_violation().map(|e| e.to_string()),
                    finding_list: if with_findings {
                        outcome.all_findings()
                    } else {
                        Vec::new()
                    },
                },
                Err(e) => FileSummary {
                    path: report.path.clone(),
                    status: FileStatus::Failed,
                    records: 0,
                    findings: 0,
                    error: Some(e.to_string()),
                    finding_list: Vec::new(),
                },
            })
            .collect();

        Self {
            command,
            files,
            metrics: batch.metrics.clone(),
            tables: Vec::new(),
            elapsed_seconds: batch.elapsed.as_secs_f64(),
        }
    }

    pub fn has_strict_violations(&self) -> bool {
        self.files
            .iter()
            .any(|file| file.status == FileStatus::StrictViolation)
    }

    pub fn has_failures(&self) -> bool {
        self.files.iter().any(|file| file.status == FileStatus::Failed)
    }

    pub fn total_output_size(&self) -> u64 {
        self.tables.iter().map(|table| table.size_bytes).sum()
    }

    /// Print the report to stdout in the chosen format
    pub fn print(&self, format: ReportFormat) -> Result<()> {
        match format {
            ReportFormat::Human => {
                self.print_human();
                Ok(())
            }
            ReportFormat::Json => {
                println!("{}", serde_json::to_string_pretty(self)?);
                Ok(())
            }
        }
    }

    fn print_human(&self) {
        let metrics = &self.metrics;
        let duration = HumanDuration(std::time::Duration::from_secs_f64(self.elapsed_seconds));

        println!();
        println!("{}", format!("SPED {} complete", self.command).bold());
        println!("{}", "-".repeat(50));
        println!("  Files:    {} processed", self.files.len());
        println!(
            "  Lines:    {} total, {} ok, {} with errors, {} skipped",
            metrics.lines_total, metrics.lines_ok, metrics.lines_error, metrics.lines_skipped
        );
        println!(
            "  Groups:   {} consolidated, {} aborted",
            metrics.groups_consolidated, metrics.groups_aborted
        );
        println!("  Elapsed:  {}", duration);

        if metrics.per_error_kind_counts.is_empty() {
            println!("\n  {}", "No findings".green());
        } else {
            println!("\n  Findings by kind:");
            for (kind, count) in &metrics.per_error_kind_counts {
                println!("    {:<22} {}", kind, count.to_string().yellow());
            }
        }

        println!("\n  Per file:");
        for file in &self.files {
            let status = match file.status {
                FileStatus::Ok => "ok".green(),
                FileStatus::StrictViolation => "strict".red(),
                FileStatus::Failed => "failed".red().bold(),
            };
            println!(
                "    [{}] {} ({} records, {} findings)",
                status,
                file.path.display(),
                file.records,
                file.findings
            );
            if let Some(error) = &file.error {
                println!("        {}", error.red());
            }
            for finding in &file.finding_list {
                println!(
                    "        line {:>6} {:<5} {:<22} {}",
                    finding.line_number,
                    finding.record_type,
                    finding.kind.as_str(),
                    finding.message
                );
            }
        }

        if !self.tables.is_empty() {
            println!(
                "\n  Tables written ({}):",
                format_size(self.total_output_size())
            );
            for table in &self.tables {
                println!(
                    "    {} ({} rows, {})",
                    table.path.display(),
                    table.rows,
                    format_size(table.size_bytes)
                );
            }
        }
        println!();
    }
}

/// Size of a written file, zero when it cannot be read
pub fn file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_cli_overrides_only_apply_given_flags() {
        let mut config = Config::default().with_strict_mode(true);
        let run = RunArgs::default();
        let validation = ValidationArgs::default();

        apply_cli_overrides(&mut config, &run, &validation);
        assert!(config.validation.strict_mode);
        assert!(config.validation.validate_cnpj);

        let run = RunArgs {
            workers: Some(3),
            ..Default::default()
        };
        let validation = ValidationArgs {
            no_validate_cnpj: true,
            tolerance: Some(Decimal::from_str("0.5").unwrap()),
            delimiter: Some(';'),
            ..Default::default()
        };
        apply_cli_overrides(&mut config, &run, &validation);
        assert!(!config.validation.validate_cnpj);
        assert!(config.validation.validate_dates);
        assert_eq!(
            config.validation.validation_tolerance,
            Decimal::from_str("0.5").unwrap()
        );
        assert_eq!(config.validation.field_delimiter, ';');
        assert_eq!(config.performance.parallel_workers, 3);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_report_statuses() {
        let batch = BatchOutcome::from_reports(
            vec![crate::app::services::pipeline::FileReport {
                path: PathBuf::from("missing.txt"),
                outcome: Err(Error::file_not_found("missing.txt")),
            }],
            std::time::Duration::ZERO,
        );

        let report = RunReport::from_batch("validate", &batch, true);
        assert_eq!(report.files[0].status, FileStatus::Failed);
        assert!(report.has_failures());
        assert!(!report.has_strict_violations());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files"][0]["status"], "failed");
        assert_eq!(json["command"], "validate");
    }
}
