//! Field parsing by declared field kind
//!
//! Each helper turns one raw value into a typed [`FieldValue`] or a failure
//! reason. The record parser keeps the raw value and records a finding when
//! parsing fails.

use crate::app::models::FieldValue;
use crate::app::services::policy::ValidationPolicy;
use crate::app::services::schema_registry::{FieldKind, FieldSpec};
use crate::app::services::validators::{
    ValidationOutcome, parse_brazilian_decimal, parse_sped_date, validate_cfop, validate_cnpj,
    validate_nfe_key,
};

/// Parse a non-empty raw value according to its field kind
pub fn parse_field(
    spec: &FieldSpec,
    raw: &str,
    policy: &ValidationPolicy,
) -> Result<FieldValue, String> {
    match spec.kind {
        FieldKind::Text => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Decimal => parse_brazilian_decimal(raw).map(FieldValue::Decimal),
        FieldKind::Date if policy.validate_dates => parse_sped_date(raw).map(FieldValue::Date),
        FieldKind::Date => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Cnpj if policy.validate_cnpj => checked_text(raw, validate_cnpj(raw)),
        FieldKind::Cnpj => Ok(FieldValue::Text(raw.to_string())),
        FieldKind::Cfop => checked_text(raw, validate_cfop(raw)),
        FieldKind::NfeKey => checked_text(raw, validate_nfe_key(raw)),
    }
}

fn checked_text(raw: &str, outcome: ValidationOutcome) -> Result<FieldValue, String> {
    match outcome {
        ValidationOutcome::Ok => Ok(FieldValue::Text(raw.to_string())),
        ValidationOutcome::Failed(reason) => Err(reason),
    }
}
