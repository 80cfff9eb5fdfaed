//! Single-file processing
//!
//! Runs parse, hierarchy, integrity and consolidation over one line stream.
//! The pass is synchronous and deterministic; only `metrics.elapsed` differs
//! between runs over the same input.

use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::app::adapters::line_source::LineSource;
use crate::app::models::{ConsolidatedRow, DetailRow, Finding, IntegrityFinding};
use crate::app::services::consolidator::{
    Consolidator, RuleTable, group_detail_rows, record_detail_row,
};
use crate::app::services::hierarchy;
use crate::app::services::integrity::IntegrityChecker;
use crate::app::services::metrics::Metrics;
use crate::app::services::policy::ValidationPolicy;
use crate::app::services::schema_registry::SchemaRegistry;
use crate::app::services::sped_parser::SpedParser;
use crate::config::ValidationConfig;
use crate::constants::DEFAULT_FIELD_DELIMITER;
use crate::{Error, Result};

/// Everything produced from one input file
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    /// Source name used in reports
    pub source: String,

    /// One row per consolidated group, in parent line order
    pub consolidated: Vec<ConsolidatedRow>,

    /// One row per parsed record, in line order
    pub details: Vec<DetailRow>,

    /// Record findings in line order
    pub findings: Vec<Finding>,

    /// Group-level findings in parent line order
    pub integrity_findings: Vec<IntegrityFinding>,

    pub metrics: Metrics,

    /// Earliest finding that is fatal under the policy (strict mode only)
    pub first_fatal: Option<Finding>,
}

impl FileOutcome {
    /// The first fatal finding as a strict mode error
    pub fn strict_violation(&self) -> Option<Error> {
        self.first_fatal.as_ref().map(|finding| {
            Error::strict_mode_violation(
                self.source.clone(),
                finding.line_number,
                format!("[{}] {}", finding.kind, finding.message),
            )
        })
    }

    /// All findings, record and group level, ordered by line
    pub fn all_findings(&self) -> Vec<Finding> {
        let mut all: Vec<Finding> = self
            .findings
            .iter()
            .cloned()
            .chain(self.integrity_findings.iter().map(IntegrityFinding::to_finding))
            .collect();
        all.sort_by_key(|finding| finding.line_number);
        all
    }
}

/// Processes files with one validation policy
#[derive(Debug, Clone, Copy)]
pub struct FileProcessor {
    registry: &'static SchemaRegistry,
    rules: &'static RuleTable,
    policy: ValidationPolicy,
    delimiter: char,
}

impl FileProcessor {
    /// Processor over the built-in registry with the default delimiter
    pub fn new(policy: ValidationPolicy) -> Self {
        Self {
            registry: SchemaRegistry::builtin(),
            rules: RuleTable::builtin(),
            policy,
            delimiter: DEFAULT_FIELD_DELIMITER,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(ValidationPolicy::from_config(config)).with_delimiter(config.field_delimiter)
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Admit, decode and process one file
    pub fn process_file(&self, path: &Path, max_file_size_mb: u64) -> Result<FileOutcome> {
        let source = LineSource::open(path, max_file_size_mb)?;
        Ok(self.process_lines(&path.display().to_string(), source.lines()))
    }

    /// Process an already-decoded line stream
    pub fn process_lines<I, S>(&self, source: &str, lines: I) -> FileOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start_time = Instant::now();
        let mut metrics = Metrics::new();

        let parsed = SpedParser::new(self.registry, self.policy, self.delimiter).parse_lines(lines);
        metrics.lines_total = parsed.lines_total;
        metrics.lines_skipped = parsed.lines_skipped;

        let mut hierarchy = hierarchy::build(parsed.records, self.registry);
        let checker = IntegrityChecker::new(self.registry, self.policy);
        let consolidator = Consolidator::new(self.rules);

        let mut consolidated = Vec::new();
        let mut details = Vec::with_capacity(hierarchy.record_count());
        let mut integrity_findings = Vec::new();
        let mut fatal: Vec<Finding> = Vec::new();

        for group in hierarchy.groups.iter_mut() {
            checker.check(group);
            integrity_findings.extend(group.integrity_findings.iter().cloned());

            match checker.first_fatal(group) {
                Some(finding) => {
                    debug!(
                        "Group at line {} held back: [{}] {}",
                        group.parent.line_number, finding.kind, finding.message
                    );
                    fatal.push(finding);
                    metrics.record_group(true);
                }
                None => match consolidator.consolidate(group) {
                    Some(row) => {
                        consolidated.push(row);
                        metrics.record_group(false);
                    }
                    None => warn!("No aggregation rule for {}", group.parent.type_code),
                },
            }

            details.extend(group_detail_rows(group));
        }

        for record in hierarchy
            .orphans
            .iter()
            .chain(hierarchy.standalone.iter().map(|record| record.as_ref()))
        {
            details.push(record_detail_row(record, None));
            fatal.extend(
                record
                    .findings
                    .iter()
                    .filter(|finding| self.policy.is_fatal(finding))
                    .cloned(),
            );
        }

        details.sort_by_key(|row| row.line_number);

        let mut findings = Vec::new();
        let records = hierarchy
            .groups
            .iter()
            .flat_map(|group| group.records())
            .chain(hierarchy.orphans.iter())
            .chain(hierarchy.standalone.iter().map(|record| record.as_ref()));
        for record in records {
            metrics.record(record);
            findings.extend(record.findings.iter().cloned());
        }
        findings.sort_by_key(|finding| finding.line_number);

        for finding in &integrity_findings {
            metrics.record_integrity(finding);
        }

        let first_fatal = fatal.into_iter().min_by_key(|finding| finding.line_number);
        metrics.elapsed = start_time.elapsed();

        info!(
            "{}: {} consolidated rows, {} detail rows, {} findings",
            source,
            consolidated.len(),
            details.len(),
            findings.len() + integrity_findings.len()
        );
        if let Some(finding) = &first_fatal {
            warn!(
                "{}: strict mode violation at line {}: {}",
                source, finding.line_number, finding.message
            );
        }

        FileOutcome {
            source: source.to_string(),
            consolidated,
            details,
            findings,
            integrity_findings,
            metrics,
            first_fatal,
        }
    }
}
