//! Data models for SPED processing
//!
//! This module contains the core data structures flowing through the pipeline:
//! raw lines, parsed records and their findings, record groups, integrity
//! findings and the consolidated and detail output rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// Raw Input
// =============================================================================

/// One delimited input line split into its type code and raw values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// First delimited field of the line
    pub type_code: String,
    /// Remaining field values, in file order
    pub values: Vec<String>,
    /// 1-based physical line number
    pub line_number: usize,
}

// =============================================================================
// Parsed Values and Records
// =============================================================================

/// Typed value of one record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Free text or code value
    Text(String),
    /// Brazilian-format number converted to a fixed-precision decimal
    Decimal(Decimal),
    /// DDMMYYYY date converted to a calendar date
    Date(NaiveDate),
    /// Value kept as written because it failed to parse or has no layout
    Raw(String),
    /// Empty field
    Empty,
}

impl FieldValue {
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            FieldValue::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Text content of text and raw values
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) | FieldValue::Raw(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    /// Convert to an output cell
    pub fn to_cell(&self) -> Cell {
        match self {
            FieldValue::Text(value) | FieldValue::Raw(value) => Cell::Text(value.clone()),
            FieldValue::Decimal(value) => Cell::Decimal(*value),
            FieldValue::Date(value) => Cell::Text(value.format("%Y-%m-%d").to_string()),
            FieldValue::Empty => Cell::Empty,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(value) | FieldValue::Raw(value) => write!(f, "{}", value),
            FieldValue::Decimal(value) => write!(f, "{}", value),
            FieldValue::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            FieldValue::Empty => Ok(()),
        }
    }
}

/// One named field of a parsed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedField {
    pub name: String,
    pub value: FieldValue,
}

/// A typed record produced by the line parser
///
/// Fields keep the layout's declared order. A record is never dropped:
/// problems are attached as findings instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedRecord {
    pub type_code: String,
    pub fields: Vec<ParsedField>,
    pub line_number: usize,
    pub findings: Vec<Finding>,
}

impl ParsedRecord {
    pub fn new(type_code: impl Into<String>, line_number: usize) -> Self {
        Self {
            type_code: type_code.into(),
            fields: Vec::new(),
            line_number,
            findings: Vec::new(),
        }
    }

    /// Look up a field value by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| &field.value)
    }

    /// Decimal value of a field, if it parsed as one
    pub fn decimal(&self, name: &str) -> Option<Decimal> {
        self.get(name).and_then(FieldValue::as_decimal)
    }

    /// Text of a field, if it holds text or a raw value
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// True when any finding counts as a record error
    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.kind.is_record_error())
    }

    pub fn has_finding(&self, kind: FindingKind) -> bool {
        self.findings.iter().any(|f| f.kind == kind)
    }

    /// Compact summary of finding kinds for detail output
    pub fn findings_summary(&self) -> String {
        self.findings
            .iter()
            .map(|f| match &f.field {
                Some(field) => format!("{}({})", f.kind, field),
                None => f.kind.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// =============================================================================
// Findings
// =============================================================================

/// Kinds of diagnostics raised while parsing and checking records
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    /// Type code has no layout in the registry
    UnknownRecordType,
    /// A field value failed to parse for its declared kind
    FieldParseError,
    /// A required field is absent or empty
    MissingRequiredField,
    /// The line has more values than the layout declares
    UnexpectedExtraField,
    /// A child record appeared with no open parent group
    OrphanChildRecord,
    /// Sum of child values differs from the parent total beyond tolerance
    TotalMismatch,
    /// A parent that requires children has none
    EmptyRequiredGroup,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::UnknownRecordType => "UnknownRecordType",
            FindingKind::FieldParseError => "FieldParseError",
            FindingKind::MissingRequiredField => "MissingRequiredField",
            FindingKind::UnexpectedExtraField => "UnexpectedExtraField",
            FindingKind::OrphanChildRecord => "OrphanChildRecord",
            FindingKind::TotalMismatch => "TotalMismatch",
            FindingKind::EmptyRequiredGroup => "EmptyRequiredGroup",
        }
    }

    /// Kinds that make a line count as an error line
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            FindingKind::FieldParseError | FindingKind::MissingRequiredField
        )
    }

    /// Kinds produced by the integrity checker at group level
    pub fn is_group_level(&self) -> bool {
        matches!(
            self,
            FindingKind::TotalMismatch | FindingKind::EmptyRequiredGroup
        )
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FindingSeverity {
    /// Informational, does not affect output
    Info,
    /// May affect output quality
    Warning,
    /// Affects the record's data; fatal under strict mode
    Error,
    /// Group-level inconsistency; fatal under strict mode
    Critical,
}

/// A structured, non-throwing diagnostic attached to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: FindingSeverity,
    pub line_number: usize,
    pub record_type: String,
    pub field: Option<String>,
    pub raw_value: Option<String>,
    pub message: String,
}

impl Finding {
    pub fn unknown_record_type(line_number: usize, record_type: &str) -> Self {
        Self {
            kind: FindingKind::UnknownRecordType,
            severity: FindingSeverity::Warning,
            line_number,
            record_type: record_type.to_string(),
            field: None,
            raw_value: None,
            message: format!("Record type '{}' has no known layout", record_type),
        }
    }

    /// A parse failure; failures on required fields are errors, others warnings
    pub fn field_parse_error(
        line_number: usize,
        record_type: &str,
        field: &str,
        raw_value: &str,
        reason: &str,
        required: bool,
    ) -> Self {
        Self {
            kind: FindingKind::FieldParseError,
            severity: if required {
                FindingSeverity::Error
            } else {
                FindingSeverity::Warning
            },
            line_number,
            record_type: record_type.to_string(),
            field: Some(field.to_string()),
            raw_value: Some(raw_value.to_string()),
            message: format!("{}.{}: {}", record_type, field, reason),
        }
    }

    pub fn missing_required_field(line_number: usize, record_type: &str, field: &str) -> Self {
        Self {
            kind: FindingKind::MissingRequiredField,
            severity: FindingSeverity::Error,
            line_number,
            record_type: record_type.to_string(),
            field: Some(field.to_string()),
            raw_value: None,
            message: format!("{}.{} is required", record_type, field),
        }
    }

    pub fn unexpected_extra_field(
        line_number: usize,
        record_type: &str,
        declared: usize,
        found: usize,
    ) -> Self {
        Self {
            kind: FindingKind::UnexpectedExtraField,
            severity: FindingSeverity::Info,
            line_number,
            record_type: record_type.to_string(),
            field: None,
            raw_value: None,
            message: format!(
                "{} declares {} fields but the line has {}; extra values ignored",
                record_type, declared, found
            ),
        }
    }

    pub fn orphan_child_record(line_number: usize, record_type: &str, expected_parent: &str) -> Self {
        Self {
            kind: FindingKind::OrphanChildRecord,
            severity: FindingSeverity::Warning,
            line_number,
            record_type: record_type.to_string(),
            field: None,
            raw_value: None,
            message: format!(
                "{} appeared with no open {} group",
                record_type, expected_parent
            ),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: [{}] {}", self.line_number, self.kind, self.message)
    }
}

/// A group-level inconsistency found by the integrity checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityFinding {
    pub kind: FindingKind,
    /// Parent record type code
    pub record_type: String,
    pub parent_line: usize,
    /// Lines of the child records that took part in the check
    pub child_lines: Vec<usize>,
    pub expected: Option<Decimal>,
    pub actual: Option<Decimal>,
    pub tolerance: Option<Decimal>,
    pub message: String,
}

impl IntegrityFinding {
    pub fn severity(&self) -> FindingSeverity {
        FindingSeverity::Critical
    }

    /// View this finding as a record-level finding on the parent line
    pub fn to_finding(&self) -> Finding {
        Finding {
            kind: self.kind,
            severity: self.severity(),
            line_number: self.parent_line,
            record_type: self.record_type.clone(),
            field: None,
            raw_value: None,
            message: self.message.clone(),
        }
    }
}

// =============================================================================
// Groups
// =============================================================================

/// One parent record with its children, in file order
#[derive(Debug, Clone)]
pub struct RecordGroup {
    /// Document family code (e.g. "C", "C500")
    pub family: &'static str,
    /// Most recent header record of the family seen before the parent
    pub header: Option<Arc<ParsedRecord>>,
    pub parent: ParsedRecord,
    pub children: Vec<ParsedRecord>,
    pub integrity_findings: Vec<IntegrityFinding>,
}

impl RecordGroup {
    pub fn new(family: &'static str, header: Option<Arc<ParsedRecord>>, parent: ParsedRecord) -> Self {
        Self {
            family,
            header,
            parent,
            children: Vec::new(),
            integrity_findings: Vec::new(),
        }
    }

    /// Children of one record type, in file order
    pub fn children_of<'a>(&'a self, type_code: &'a str) -> impl Iterator<Item = &'a ParsedRecord> + 'a {
        self.children
            .iter()
            .filter(move |child| child.type_code == type_code)
    }

    /// All records of the group, parent first
    pub fn records(&self) -> impl Iterator<Item = &ParsedRecord> {
        std::iter::once(&self.parent).chain(self.children.iter())
    }

    /// Total number of findings attached to the group and its records
    pub fn finding_count(&self) -> usize {
        self.integrity_findings.len() + self.records().map(|r| r.findings.len()).sum::<usize>()
    }
}

// =============================================================================
// Output Rows
// =============================================================================

/// One output cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Decimal(Decimal),
    Integer(i64),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(value) => write!(f, "{}", value),
            Cell::Decimal(value) => write!(f, "{}", value),
            Cell::Integer(value) => write!(f, "{}", value),
            Cell::Empty => Ok(()),
        }
    }
}

/// One consolidated row per record group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedRow {
    pub family: String,
    pub parent_line: usize,
    /// Ordered (column, value) pairs; the order is fixed per family
    pub columns: Vec<(String, Cell)>,
}

impl ConsolidatedRow {
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, cell)| cell)
    }
}

/// One detail row per parsed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub record_type: String,
    pub line_number: usize,
    /// Line of the linked parent record, absent for parents, orphans and standalone records
    pub parent_line: Option<usize>,
    pub columns: Vec<(String, Cell)>,
    pub findings: String,
}
