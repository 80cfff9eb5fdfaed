//! Parallel processing of many files
//!
//! Each file runs on a blocking worker bounded by a semaphore; results come
//! back in input order and are merged into one batch outcome.

use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{info, warn};

use super::processor::{FileOutcome, FileProcessor};
use crate::app::models::{ConsolidatedRow, DetailRow};
use crate::app::services::metrics::Metrics;
use crate::{Error, Result};

/// Result of processing one file of a batch
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<FileOutcome>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Strict mode violation of a processed file
    pub fn strict_violation(&self) -> Option<Error> {
        self.outcome
            .as_ref()
            .ok()
            .and_then(FileOutcome::strict_violation)
    }
}

/// Merged results of a batch, in input order
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub files: Vec<FileReport>,

    /// Field-wise sum of the metrics of every processed file
    pub metrics: Metrics,

    /// Wall time of the whole batch
    pub elapsed: Duration,
}

impl BatchOutcome {
    /// Merge per-file reports, keeping their order
    pub fn from_reports(files: Vec<FileReport>, elapsed: Duration) -> Self {
        let mut metrics = Metrics::new();
        for outcome in files.iter().filter_map(|report| report.outcome.as_ref().ok()) {
            metrics.merge(&outcome.metrics);
        }
        Self {
            files,
            metrics,
            elapsed,
        }
    }

    /// Outcomes of files that were processed
    pub fn outcomes(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files
            .iter()
            .filter_map(|report| report.outcome.as_ref().ok())
    }

    /// Files that failed before processing, with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &Error)> {
        self.files
            .iter()
            .filter_map(|report| report.outcome.as_ref().err().map(|e| (&report.path, e)))
    }

    pub fn consolidated_rows(&self) -> impl Iterator<Item = &ConsolidatedRow> {
        self.outcomes().flat_map(|outcome| outcome.consolidated.iter())
    }

    pub fn detail_rows(&self) -> impl Iterator<Item = &DetailRow> {
        self.outcomes().flat_map(|outcome| outcome.details.iter())
    }

    /// Strict mode violations, one per affected file
    pub fn strict_violations(&self) -> Vec<Error> {
        self.files
            .iter()
            .filter_map(FileReport::strict_violation)
            .collect()
    }

    pub fn files_processed(&self) -> usize {
        self.outcomes().count()
    }

    pub fn files_failed(&self) -> usize {
        self.files.len() - self.files_processed()
    }
}

/// A worker that panicked or was cancelled fails only its own file
pub(super) fn worker_outcome(
    path: &Path,
    joined: std::result::Result<Result<FileOutcome>, JoinError>,
) -> Result<FileOutcome> {
    joined.unwrap_or_else(|e| {
        Err(Error::processing_interrupted(format!(
            "worker for {} failed: {}",
            path.display(),
            e
        )))
    })
}

/// Runs a file processor over many files concurrently
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    processor: FileProcessor,
    max_file_size_mb: u64,
    workers: usize,
}

impl BatchProcessor {
    pub fn new(processor: FileProcessor, max_file_size_mb: u64, workers: usize) -> Self {
        Self {
            processor,
            max_file_size_mb,
            workers: workers.max(1),
        }
    }

    /// Process every file, keeping input order in the result
    ///
    /// A file that fails admission or decoding is reported in its slot and
    /// does not affect the others.
    pub async fn run(&self, files: &[PathBuf], progress: Option<ProgressBar>) -> Result<BatchOutcome> {
        info!(
            "Processing {} files with {} workers",
            files.len(),
            self.workers
        );
        let start_time = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.workers));

        let reports: Vec<FileReport> = stream::iter(files.iter().cloned())
            .map(|path| {
                let semaphore = Arc::clone(&semaphore);
                let processor = self.processor;
                let max_file_size_mb = self.max_file_size_mb;
                let progress = progress.clone();

                async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| Error::processing_interrupted(e.to_string()))?;

                    let task_path = path.clone();
                    let joined = tokio::task::spawn_blocking(move || {
                        processor.process_file(&task_path, max_file_size_mb)
                    })
                    .await;
                    let outcome = worker_outcome(&path, joined);

                    if let Err(e) = &outcome {
                        warn!("Skipping {}: {}", path.display(), e);
                    }
                    if let Some(pb) = &progress {
                        pb.inc(1);
                    }

                    Ok::<FileReport, Error>(FileReport { path, outcome })
                }
            })
            .buffered(self.workers)
            .try_collect()
            .await?;

        let outcome = BatchOutcome::from_reports(reports, start_time.elapsed());

        if let Some(pb) = &progress {
            pb.finish_with_message(format!(
                "Completed: {} files processed, {} failed",
                outcome.files_processed(),
                outcome.files_failed()
            ));
        }

        info!(
            "Batch complete: {} files in {:.2}s ({} failed)",
            outcome.files.len(),
            outcome.elapsed.as_secs_f64(),
            outcome.files_failed()
        );

        Ok(outcome)
    }
}
