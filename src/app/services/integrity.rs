//! Group integrity checks
//!
//! Cross-checks parent-declared totals against the sum of their children and
//! checks that parents requiring children have some. Findings are attached to
//! the group; the validation policy decides whether they abort it.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::app::models::{Finding, FindingKind, IntegrityFinding, RecordGroup};
use crate::app::services::policy::ValidationPolicy;
use crate::app::services::schema_registry::{SchemaRegistry, TotalSpec};

/// Runs integrity checks on closed record groups
#[derive(Debug, Clone)]
pub struct IntegrityChecker<'a> {
    registry: &'a SchemaRegistry,
    policy: ValidationPolicy,
}

impl<'a> IntegrityChecker<'a> {
    pub fn new(registry: &'a SchemaRegistry, policy: ValidationPolicy) -> Self {
        Self { registry, policy }
    }

    /// Check one group and attach any findings to it
    ///
    /// Returns the number of findings added.
    pub fn check(&self, group: &mut RecordGroup) -> usize {
        let Some(schema) = self.registry.lookup(&group.parent.type_code) else {
            return 0;
        };

        let mut findings = Vec::new();

        if let Some(total) = schema.total {
            findings.extend(self.check_total(group, &total));
        }

        if schema.requires_children && group.children.is_empty() {
            findings.push(IntegrityFinding {
                kind: FindingKind::EmptyRequiredGroup,
                record_type: group.parent.type_code.clone(),
                parent_line: group.parent.line_number,
                child_lines: Vec::new(),
                expected: None,
                actual: None,
                tolerance: None,
                message: format!(
                    "{} at line {} requires at least one child record",
                    group.parent.type_code, group.parent.line_number
                ),
            });
        }

        for finding in &findings {
            warn!("Line {}: [{}] {}", finding.parent_line, finding.kind, finding.message);
        }

        let added = findings.len();
        group.integrity_findings.extend(findings);
        added
    }

    fn check_total(&self, group: &RecordGroup, total: &TotalSpec) -> Option<IntegrityFinding> {
        let Some(expected) = group.parent.decimal(total.parent_field) else {
            debug!(
                "Skipping total check at line {}: {} has no parsed value",
                group.parent.line_number, total.parent_field
            );
            return None;
        };

        let children: Vec<_> = group.children_of(total.child_type).collect();
        let actual = checked_sum(
            children
                .iter()
                .filter_map(|child| child.decimal(total.child_field)),
        );

        // An overflowing sum or difference can never be within tolerance
        let within_tolerance = actual
            .and_then(|actual| expected.checked_sub(actual))
            .is_some_and(|difference| difference.abs() <= self.policy.tolerance);
        if within_tolerance {
            return None;
        }

        let actual_text = match actual {
            Some(actual) => actual.to_string(),
            None => "beyond the decimal range".to_string(),
        };

        Some(IntegrityFinding {
            kind: FindingKind::TotalMismatch,
            record_type: group.parent.type_code.clone(),
            parent_line: group.parent.line_number,
            child_lines: children.iter().map(|child| child.line_number).collect(),
            expected: Some(expected),
            actual,
            tolerance: Some(self.policy.tolerance),
            message: format!(
                "{} {} is {} but the sum of {} {} is {} (tolerance {})",
                group.parent.type_code,
                total.parent_field,
                expected,
                total.child_type,
                total.child_field,
                actual_text,
                self.policy.tolerance
            ),
        })
    }

    /// First finding that aborts the group under the current policy
    ///
    /// Integrity findings take precedence over record findings.
    pub fn first_fatal(&self, group: &RecordGroup) -> Option<Finding> {
        if let Some(finding) = group
            .integrity_findings
            .iter()
            .find(|finding| self.policy.is_fatal_integrity(finding))
        {
            return Some(finding.to_finding());
        }

        group
            .records()
            .flat_map(|record| record.findings.iter())
            .find(|finding| self.policy.is_fatal(finding))
            .cloned()
    }

    /// True when the group must not be consolidated
    pub fn is_aborted(&self, group: &RecordGroup) -> bool {
        self.first_fatal(group).is_some()
    }
}

/// Sum of decimal values, `None` when it leaves the decimal range
///
/// An empty input sums to zero.
pub fn checked_sum<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |sum, value| sum.checked_add(value))
}
