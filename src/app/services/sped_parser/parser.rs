//! Core SPED line stream parser
//!
//! Drives line splitting and record parsing over a whole decoded file,
//! counting skipped lines and stopping at the `9999` terminator record.

use tracing::{debug, info};

use super::line::split_line;
use super::record_parser::RecordParser;
use crate::app::models::ParsedRecord;
use crate::app::services::policy::ValidationPolicy;
use crate::app::services::schema_registry::SchemaRegistry;
use crate::constants::{DEFAULT_FIELD_DELIMITER, FILE_TERMINATOR_RECORD};

/// Records parsed from one line stream with line counts
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// Parsed records in file order
    pub records: Vec<ParsedRecord>,

    /// Physical lines read, including skipped ones
    pub lines_total: usize,

    /// Blank, non-record and post-terminator lines
    pub lines_skipped: usize,

    /// Line of the `9999` terminator record, if one was seen
    pub terminator_line: Option<usize>,
}

impl ParseOutput {
    /// Number of records carrying at least one finding
    pub fn records_with_findings(&self) -> usize {
        self.records
            .iter()
            .filter(|record| !record.findings.is_empty())
            .count()
    }
}

/// SPED parser over already-decoded text lines
#[derive(Debug, Clone)]
pub struct SpedParser<'a> {
    record_parser: RecordParser<'a>,
    delimiter: char,
}

impl<'a> SpedParser<'a> {
    pub fn new(registry: &'a SchemaRegistry, policy: ValidationPolicy, delimiter: char) -> Self {
        Self {
            record_parser: RecordParser::new(registry, policy),
            delimiter,
        }
    }

    /// Parser over the built-in registry with the default delimiter
    pub fn with_policy(policy: ValidationPolicy) -> SpedParser<'static> {
        SpedParser::new(SchemaRegistry::builtin(), policy, DEFAULT_FIELD_DELIMITER)
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Parse every line of the stream into records
    ///
    /// Line numbers are 1-based physical positions. Lines after the
    /// terminator record are counted as skipped and not parsed.
    pub fn parse_lines<I, S>(&self, lines: I) -> ParseOutput
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut output = ParseOutput::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line_number = index + 1;
            output.lines_total += 1;

            if output.terminator_line.is_some() {
                output.lines_skipped += 1;
                continue;
            }

            let Some(raw) = split_line(line.as_ref(), line_number, self.delimiter) else {
                output.lines_skipped += 1;
                continue;
            };

            if raw.type_code == FILE_TERMINATOR_RECORD {
                output.terminator_line = Some(line_number);
            }

            let record = self.record_parser.parse(raw);
            if !record.findings.is_empty() {
                debug!(
                    "Line {} ({}): {} finding(s)",
                    line_number,
                    record.type_code,
                    record.findings.len()
                );
            }
            output.records.push(record);
        }

        if let Some(line) = output.terminator_line {
            let trailing = output.lines_total - line;
            if trailing > 0 {
                debug!("Skipped {} line(s) after terminator at line {}", trailing, line);
            }
        }

        info!(
            "Parsed {} records from {} lines ({} skipped, {} with findings)",
            output.records.len(),
            output.lines_total,
            output.lines_skipped,
            output.records_with_findings()
        );

        output
    }

    /// Parse a single line; `None` when the line would be skipped
    pub fn parse_line(&self, line: &str, line_number: usize) -> Option<ParsedRecord> {
        split_line(line, line_number, self.delimiter).map(|raw| self.record_parser.parse(raw))
    }
}
