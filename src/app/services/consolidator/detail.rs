//! Detail rows, one per parsed record

use crate::app::models::{DetailRow, FieldValue, ParsedRecord, RecordGroup};

/// Flatten one record into a detail row
pub fn record_detail_row(record: &ParsedRecord, parent_line: Option<usize>) -> DetailRow {
    DetailRow {
        record_type: record.type_code.clone(),
        line_number: record.line_number,
        parent_line,
        columns: record
            .fields
            .iter()
            .map(|field| (field.name.clone(), FieldValue::to_cell(&field.value)))
            .collect(),
        findings: record.findings_summary(),
    }
}

/// Detail rows of a group: the parent, then its children linked to it
///
/// Group-level findings are appended to the parent's findings summary.
pub fn group_detail_rows(group: &RecordGroup) -> Vec<DetailRow> {
    let mut rows = Vec::with_capacity(1 + group.children.len());

    let mut parent = record_detail_row(&group.parent, None);
    for finding in &group.integrity_findings {
        if !parent.findings.is_empty() {
            parent.findings.push_str("; ");
        }
        parent.findings.push_str(finding.kind.as_str());
    }
    rows.push(parent);

    let parent_line = Some(group.parent.line_number);
    rows.extend(
        group
            .children
            .iter()
            .map(|child| record_detail_row(child, parent_line)),
    );
    rows
}
