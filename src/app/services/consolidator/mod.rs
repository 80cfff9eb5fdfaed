//! Group consolidation into flat rows
//!
//! Folds each record group into one [`ConsolidatedRow`] following its
//! family's [`AggregationRule`], and flattens records into [`DetailRow`]s.
//!
//! ## Architecture
//!
//! - [`rules`] - Per-family aggregation rules derived from the registry
//! - [`detail`] - One detail row per parsed record

pub mod detail;
pub mod rules;

#[cfg(test)]
pub mod tests;

pub use detail::{group_detail_rows, record_detail_row};
pub use rules::{AggregationRule, RuleTable};

use std::collections::BTreeSet;
use tracing::warn;

use crate::app::models::{Cell, ConsolidatedRow, FieldValue, ParsedRecord, RecordGroup};
use crate::app::services::integrity::checked_sum;
use crate::constants::{DISTINCT_JOIN_SEPARATOR, indicator_label};

/// Builds consolidated rows from record groups
#[derive(Debug, Clone, Copy)]
pub struct Consolidator<'a> {
    rules: &'a RuleTable,
}

impl Default for Consolidator<'static> {
    fn default() -> Self {
        Self::new(RuleTable::builtin())
    }
}

impl<'a> Consolidator<'a> {
    pub fn new(rules: &'a RuleTable) -> Self {
        Self { rules }
    }

    /// Consolidate one group; `None` when its parent type has no rule
    pub fn consolidate(&self, group: &RecordGroup) -> Option<ConsolidatedRow> {
        let rule = self.rules.rule_for(&group.parent.type_code)?;
        let mut columns: Vec<(String, Cell)> = Vec::new();

        columns.push(("FAMILY".to_string(), Cell::Text(rule.family.code.to_string())));
        columns.push((
            "PARENT_LINE".to_string(),
            Cell::Integer(group.parent.line_number as i64),
        ));

        for header in &rule.header_fields {
            let cell = group
                .header
                .as_deref()
                .filter(|record| Some(record.type_code.as_str()) == rule.header_type)
                .and_then(|record| record.get(header.field))
                .map(FieldValue::to_cell)
                .unwrap_or(Cell::Empty);
            columns.push((header.column.clone(), cell));
        }

        for field in &rule.parent_fields {
            columns.push((field.to_string(), field_cell(&group.parent, field)));
        }

        for indicator in &rule.indicators {
            let cell = match group.parent.text(indicator.field) {
                Some(code) => Cell::Text(indicator_label(indicator.labels, code).to_string()),
                None => Cell::Empty,
            };
            columns.push((indicator.column.clone(), cell));
        }

        columns.push((
            "CHILD_COUNT".to_string(),
            Cell::Integer(group.children.len() as i64),
        ));
        for (child_type, column) in &rule.child_counts {
            let count = group.children_of(child_type).count();
            columns.push((column.clone(), Cell::Integer(count as i64)));
        }

        for sum in &rule.sums {
            let total = checked_sum(
                group
                    .children_of(sum.child_type)
                    .filter_map(|child| child.decimal(sum.field)),
            );
            let cell = match total {
                Some(total) => Cell::Decimal(total),
                None => {
                    warn!(
                        "Line {}: {} overflows the decimal range, left empty",
                        group.parent.line_number, sum.column
                    );
                    Cell::Empty
                }
            };
            columns.push((sum.column.clone(), cell));
        }

        for list in &rule.distinct_lists {
            let values: BTreeSet<&str> = group
                .children_of(list.child_type)
                .filter_map(|child| child.text(list.field))
                .collect();
            let cell = if values.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(
                    values
                        .into_iter()
                        .collect::<Vec<_>>()
                        .join(DISTINCT_JOIN_SEPARATOR),
                )
            };
            columns.push((list.column.clone(), cell));
        }

        columns.push((
            "FINDINGS".to_string(),
            Cell::Integer(group.finding_count() as i64),
        ));

        Some(ConsolidatedRow {
            family: rule.family.code.to_string(),
            parent_line: group.parent.line_number,
            columns,
        })
    }

    /// Column names of a family's consolidated rows, by family code
    pub fn columns_for_family(&self, family_code: &str) -> Option<Vec<String>> {
        self.rules
            .rules()
            .find(|rule| rule.family.code == family_code)
            .map(AggregationRule::columns)
    }
}

fn field_cell(record: &ParsedRecord, field: &str) -> Cell {
    record.get(field).map(FieldValue::to_cell).unwrap_or(Cell::Empty)
}
