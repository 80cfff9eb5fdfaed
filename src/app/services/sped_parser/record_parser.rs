//! Conversion of one raw line into a parsed record
//!
//! A bad field degrades to its raw value plus a finding; the record itself is
//! always produced.

use super::field_parsers::parse_field;
use crate::app::models::{FieldValue, Finding, ParsedField, ParsedRecord, RawLine};
use crate::app::services::policy::ValidationPolicy;
use crate::app::services::schema_registry::{RecordTypeSchema, SchemaRegistry};
use crate::constants::POSITIONAL_FIELD_PREFIX;

/// Parses raw lines against the schema registry
#[derive(Debug, Clone)]
pub struct RecordParser<'a> {
    registry: &'a SchemaRegistry,
    policy: ValidationPolicy,
}

impl<'a> RecordParser<'a> {
    pub fn new(registry: &'a SchemaRegistry, policy: ValidationPolicy) -> Self {
        Self { registry, policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Parse one raw line into a record
    pub fn parse(&self, raw: RawLine) -> ParsedRecord {
        match self.registry.lookup(&raw.type_code) {
            Some(schema) => self.parse_known(schema, raw),
            None => parse_unknown(raw),
        }
    }

    fn parse_known(&self, schema: &RecordTypeSchema, raw: RawLine) -> ParsedRecord {
        let mut record = ParsedRecord::new(raw.type_code, raw.line_number);
        record.fields.reserve(schema.fields.len());

        for (index, spec) in schema.fields.iter().enumerate() {
            let value = match raw.values.get(index).map(String::as_str) {
                Some("") | None => {
                    if spec.required {
                        record.findings.push(Finding::missing_required_field(
                            record.line_number,
                            schema.code,
                            spec.name,
                        ));
                    }
                    FieldValue::Empty
                }
                Some(value) => match parse_field(spec, value, &self.policy) {
                    Ok(parsed) => parsed,
                    Err(reason) => {
                        record.findings.push(Finding::field_parse_error(
                            record.line_number,
                            schema.code,
                            spec.name,
                            value,
                            &reason,
                            spec.required,
                        ));
                        FieldValue::Raw(value.to_string())
                    }
                },
            };

            record.fields.push(ParsedField {
                name: spec.name.to_string(),
                value,
            });
        }

        if raw.values.len() > schema.fields.len() {
            record.findings.push(Finding::unexpected_extra_field(
                record.line_number,
                schema.code,
                schema.fields.len(),
                raw.values.len(),
            ));
        }

        record
    }
}

/// Keep every value raw under positional names
fn parse_unknown(raw: RawLine) -> ParsedRecord {
    let mut record = ParsedRecord::new(raw.type_code, raw.line_number);
    record.findings.push(Finding::unknown_record_type(
        record.line_number,
        &record.type_code,
    ));

    record.fields = raw
        .values
        .into_iter()
        .enumerate()
        .map(|(index, value)| ParsedField {
            name: positional_name(index),
            value: if value.is_empty() {
                FieldValue::Empty
            } else {
                FieldValue::Raw(value)
            },
        })
        .collect();

    record
}

/// Positional field name for unknown layouts (`FIELD_01`, `FIELD_02`, ...)
pub fn positional_name(index: usize) -> String {
    format!("{}{:02}", POSITIONAL_FIELD_PREFIX, index + 1)
}
