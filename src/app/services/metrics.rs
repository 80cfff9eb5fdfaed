//! Processing metrics
//!
//! An explicit accumulator returned per file and merged at batch boundaries.
//! Counts are exact; only `elapsed` varies between runs over the same input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;

use crate::app::models::{FindingKind, IntegrityFinding, ParsedRecord};

/// Line, record, finding and group counts for one file or a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Physical lines read, including skipped ones
    pub lines_total: usize,

    /// Records without parse or missing-field errors
    pub lines_ok: usize,

    /// Records with at least one parse or missing-field error
    pub lines_error: usize,

    /// Blank, non-record and post-terminator lines
    pub lines_skipped: usize,

    /// Records seen per record type code
    pub per_type_counts: BTreeMap<String, usize>,

    /// Findings seen per finding kind, including group-level findings
    pub per_error_kind_counts: BTreeMap<String, usize>,

    /// Groups that produced a consolidated row
    pub groups_consolidated: usize,

    /// Groups held back from consolidation by strict mode
    pub groups_aborted: usize,

    /// Wall time spent processing
    pub elapsed: Duration,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record and its findings
    pub fn record(&mut self, record: &ParsedRecord) {
        *self
            .per_type_counts
            .entry(record.type_code.clone())
            .or_insert(0) += 1;

        if record.has_errors() {
            self.lines_error += 1;
        } else {
            self.lines_ok += 1;
        }

        for finding in &record.findings {
            self.count_kind(finding.kind);
        }
    }

    /// Count one group-level finding
    pub fn record_integrity(&mut self, finding: &IntegrityFinding) {
        self.count_kind(finding.kind);
    }

    /// Count one group's consolidation result
    pub fn record_group(&mut self, aborted: bool) {
        if aborted {
            self.groups_aborted += 1;
        } else {
            self.groups_consolidated += 1;
        }
    }

    fn count_kind(&mut self, kind: FindingKind) {
        *self
            .per_error_kind_counts
            .entry(kind.as_str().to_string())
            .or_insert(0) += 1;
    }

    /// Add another accumulator field by field
    pub fn merge(&mut self, other: &Metrics) {
        self.lines_total += other.lines_total;
        self.lines_ok += other.lines_ok;
        self.lines_error += other.lines_error;
        self.lines_skipped += other.lines_skipped;
        for (code, count) in &other.per_type_counts {
            *self.per_type_counts.entry(code.clone()).or_insert(0) += count;
        }
        for (kind, count) in &other.per_error_kind_counts {
            *self.per_error_kind_counts.entry(kind.clone()).or_insert(0) += count;
        }
        self.groups_consolidated += other.groups_consolidated;
        self.groups_aborted += other.groups_aborted;
        self.elapsed += other.elapsed;
    }

    /// Number of parsed records
    pub fn records(&self) -> usize {
        self.lines_ok + self.lines_error
    }

    /// Count of findings of one kind
    pub fn kind_count(&self, kind: FindingKind) -> usize {
        self.per_error_kind_counts
            .get(kind.as_str())
            .copied()
            .unwrap_or(0)
    }

    pub fn type_count(&self, type_code: &str) -> usize {
        self.per_type_counts.get(type_code).copied().unwrap_or(0)
    }

    /// Total findings across all kinds
    pub fn total_findings(&self) -> usize {
        self.per_error_kind_counts.values().sum()
    }

    /// Calculate the clean record rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.records() == 0 {
            100.0
        } else {
            (self.lines_ok as f64 / self.records() as f64) * 100.0
        }
    }

    /// Check if processing was mostly successful (>90% clean records)
    pub fn is_successful(&self) -> bool {
        self.success_rate() > 90.0
    }

    /// Equality of every count, ignoring elapsed time
    pub fn same_counts(&self, other: &Metrics) -> bool {
        Metrics {
            elapsed: Duration::ZERO,
            ..self.clone()
        } == Metrics {
            elapsed: Duration::ZERO,
            ..other.clone()
        }
    }

    /// Get summary of processing statistics
    pub fn summary(&self) -> String {
        format!(
            "Lines: {} total, {} ok, {} error, {} skipped ({:.1}% clean) | \
             Groups: {} consolidated, {} aborted | Findings: {} | Elapsed: {:.2}s",
            self.lines_total,
            self.lines_ok,
            self.lines_error,
            self.lines_skipped,
            self.success_rate(),
            self.groups_consolidated,
            self.groups_aborted,
            self.total_findings(),
            self.elapsed.as_secs_f64()
        )
    }

    /// Log the summary and finding breakdown
    pub fn log_summary(&self) {
        info!("{}", self.summary());
        for (kind, count) in &self.per_error_kind_counts {
            info!("  {}: {}", kind, count);
        }
    }
}
