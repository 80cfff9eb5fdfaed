//! Application constants for the SPED processor
//!
//! This module contains the format constants, default values and code
//! mappings used throughout the SPED processor application.

use rust_decimal::Decimal;

// =============================================================================
// SPED Line Format
// =============================================================================

/// Default field delimiter used by SPED files
pub const DEFAULT_FIELD_DELIMITER: char = '|';

/// Record type code of the file terminator record
pub const FILE_TERMINATOR_RECORD: &str = "9999";

/// Prefix for positional field names of records with no known layout
pub const POSITIONAL_FIELD_PREFIX: &str = "FIELD_";

/// Date layout used by SPED date fields (DDMMYYYY)
pub const SPED_DATE_FORMAT: &str = "%d%m%Y";

/// Number of digits in a CNPJ
pub const CNPJ_LENGTH: usize = 14;

/// Number of digits in an NFe / CTe / DF-e access key
pub const NFE_KEY_LENGTH: usize = 44;

/// Number of digits in a CFOP code
pub const CFOP_LENGTH: usize = 4;

/// Valid first digits of a CFOP code (1-3 inbound, 5-7 outbound)
pub const CFOP_VALID_ORIGINS: &[char] = &['1', '2', '3', '5', '6', '7'];

/// CNPJ check digit weights for the first and second verifier digits
pub mod cnpj_weights {
    pub const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    pub const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
}

// =============================================================================
// Validation Defaults
// =============================================================================

/// Default absolute tolerance for parent/child total comparisons (0.01)
pub const DEFAULT_VALIDATION_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Default CNPJ check digit validation
pub const DEFAULT_VALIDATE_CNPJ: bool = true;

/// Default date validation
pub const DEFAULT_VALIDATE_DATES: bool = true;

/// Default strict mode
pub const DEFAULT_STRICT_MODE: bool = false;

// =============================================================================
// File Admission
// =============================================================================

/// Maximum accepted input file size in megabytes
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 100;

/// Extensions collected from input directories (compared case-insensitively)
///
/// Files named directly may carry any extension; other suffixes are logged.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "sped"];

// =============================================================================
// Performance
// =============================================================================

/// Default number of files processed concurrently
pub const DEFAULT_PARALLEL_WORKERS: usize = 4;

/// Upper bound on parallel workers
pub const MAX_PARALLEL_WORKERS: usize = 64;

// =============================================================================
// Output
// =============================================================================

/// Suffix of consolidated output table names
pub const CONSOLIDATED_TABLE_SUFFIX: &str = "_CONSOLIDADO";

/// Suffix of detail output table names
pub const DETAIL_TABLE_SUFFIX: &str = "_DETALHE";

/// Separator used when joining distinct values into one cell
pub const DISTINCT_JOIN_SEPARATOR: &str = "; ";

/// Default output directory when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

// =============================================================================
// Environment Variables
// =============================================================================

pub mod env_vars {
    pub const VALIDATE_CNPJ: &str = "SPED_VALIDATE_CNPJ";
    pub const VALIDATE_DATES: &str = "SPED_VALIDATE_DATES";
    pub const STRICT_MODE: &str = "SPED_STRICT_MODE";
    pub const VALIDATION_TOLERANCE: &str = "SPED_VALIDATION_TOLERANCE";
    pub const PARALLEL_WORKERS: &str = "SPED_PARALLEL_WORKERS";
}

// =============================================================================
// Indicator Code Labels
// =============================================================================

/// Operation indicator labels (IND_OPER)
pub const IND_OPER_LABELS: &[(&str, &str)] = &[("0", "Entrada"), ("1", "Saída")];

/// Issuer indicator labels (IND_EMIT)
pub const IND_EMIT_LABELS: &[(&str, &str)] = &[("0", "Emissão própria"), ("1", "Terceiros")];

/// Freight indicator labels (IND_FRT)
pub const IND_FRT_LABELS: &[(&str, &str)] = &[
    ("0", "Emitente"),
    ("1", "Destinatário/remetente"),
    ("2", "Terceiros"),
    ("9", "Sem cobrança de frete"),
];

/// Look up the label of an indicator code, passing unknown codes through
pub fn indicator_label<'a>(labels: &'a [(&'a str, &'a str)], code: &'a str) -> &'a str {
    labels
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_default_tolerance_is_one_cent() {
        assert_eq!(
            DEFAULT_VALIDATION_TOLERANCE,
            Decimal::from_str("0.01").unwrap()
        );
    }

    #[test]
    fn test_indicator_label_lookup() {
        assert_eq!(indicator_label(IND_OPER_LABELS, "0"), "Entrada");
        assert_eq!(indicator_label(IND_FRT_LABELS, "9"), "Sem cobrança de frete");
        assert_eq!(indicator_label(IND_EMIT_LABELS, "7"), "7");
    }
}
