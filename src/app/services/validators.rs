//! Field validators for SPED values
//!
//! Pure functions returning a [`ValidationOutcome`]. They never panic; the
//! line parser turns failed outcomes into findings. Parsing helpers that
//! produce typed values (`parse_brazilian_decimal`, `parse_sped_date`) share
//! the same rules as their validators.

use crate::constants::{
    CFOP_LENGTH, CFOP_VALID_ORIGINS, CNPJ_LENGTH, NFE_KEY_LENGTH, SPED_DATE_FORMAT, cnpj_weights,
};
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

/// Brazilian decimal: optional sign, digits with optional dot thousands groups,
/// optional comma fraction
static BRAZILIAN_DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?(?:\d{1,3}(?:\.\d{3})+|\d+)(?:,\d+)?$").expect("valid decimal pattern")
});

/// Result of validating one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ok,
    Failed(String),
}

impl ValidationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationOutcome::Ok)
    }

    /// Failure reason, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Ok => None,
            ValidationOutcome::Failed(reason) => Some(reason),
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        ValidationOutcome::Failed(reason.into())
    }
}

impl<T> From<Result<T, String>> for ValidationOutcome {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(_) => ValidationOutcome::Ok,
            Err(reason) => ValidationOutcome::Failed(reason),
        }
    }
}

/// Validate a CNPJ, with or without punctuation
pub fn validate_cnpj(value: &str) -> ValidationOutcome {
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != CNPJ_LENGTH {
        return ValidationOutcome::failed(format!(
            "CNPJ must have {} digits, found {}",
            CNPJ_LENGTH,
            digits.len()
        ));
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return ValidationOutcome::failed("CNPJ cannot repeat a single digit");
    }

    let first = cnpj_check_digit(&digits[..12], &cnpj_weights::FIRST);
    if digits[12] != first {
        return ValidationOutcome::failed(format!(
            "CNPJ first check digit should be {}, found {}",
            first, digits[12]
        ));
    }

    let second = cnpj_check_digit(&digits[..13], &cnpj_weights::SECOND);
    if digits[13] != second {
        return ValidationOutcome::failed(format!(
            "CNPJ second check digit should be {}, found {}",
            second, digits[13]
        ));
    }

    ValidationOutcome::Ok
}

/// Weighted modulo-11 check digit
pub fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        remainder if remainder < 2 => 0,
        remainder => 11 - remainder,
    }
}

/// Parse a DDMMYYYY date
pub fn parse_sped_date(value: &str) -> Result<NaiveDate, String> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("date '{}' is not in DDMMYYYY layout", value));
    }
    NaiveDate::parse_from_str(value, SPED_DATE_FORMAT)
        .map_err(|_| format!("'{}' is not a calendar date", value))
}

/// Validate a DDMMYYYY date
pub fn validate_date(value: &str) -> ValidationOutcome {
    parse_sped_date(value).into()
}

/// Validate a four-digit CFOP with a valid origin digit
pub fn validate_cfop(value: &str) -> ValidationOutcome {
    if value.len() != CFOP_LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
        return ValidationOutcome::failed(format!(
            "CFOP must be exactly {} digits",
            CFOP_LENGTH
        ));
    }
    match value.chars().next() {
        Some(origin) if CFOP_VALID_ORIGINS.contains(&origin) => ValidationOutcome::Ok,
        Some(origin) => ValidationOutcome::failed(format!("CFOP origin digit {} is not valid", origin)),
        None => ValidationOutcome::failed("CFOP is empty"),
    }
}

/// Validate a 44-digit electronic document access key
pub fn validate_nfe_key(value: &str) -> ValidationOutcome {
    if value.len() != NFE_KEY_LENGTH {
        return ValidationOutcome::failed(format!(
            "access key must have {} digits, found {} characters",
            NFE_KEY_LENGTH,
            value.len()
        ));
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return ValidationOutcome::failed("access key must be numeric");
    }
    ValidationOutcome::Ok
}

/// Parse a Brazilian-format decimal ("1.234,56") into an exact decimal
pub fn parse_brazilian_decimal(value: &str) -> Result<Decimal, String> {
    let trimmed = value.trim();
    if !BRAZILIAN_DECIMAL.is_match(trimmed) {
        return Err(format!("'{}' is not a Brazilian-format number", value));
    }
    let normalized = trimmed.replace('.', "").replace(',', ".");
    Decimal::from_str_exact(&normalized)
        .map_err(|e| format!("'{}' does not fit a fixed-precision decimal: {}", value, e))
}

/// Validate a Brazilian-format decimal
pub fn validate_numeric(value: &str) -> ValidationOutcome {
    parse_brazilian_decimal(value).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const VALID_CNPJS: &[&str] = &["11222333000181", "11444777000161", "12345678000195"];

    #[test]
    fn test_valid_cnpjs() {
        for cnpj in VALID_CNPJS {
            assert!(validate_cnpj(cnpj).is_ok(), "{} should be valid", cnpj);
        }
        assert!(validate_cnpj("11.222.333/0001-81").is_ok());
    }

    #[test]
    fn test_single_digit_mutations_fail() {
        for cnpj in VALID_CNPJS {
            for position in 0..cnpj.len() {
                let original = cnpj.as_bytes()[position] - b'0';
                for replacement in 0..10u8 {
                    if replacement == original {
                        continue;
                    }
                    let mut mutated = cnpj.as_bytes().to_vec();
                    mutated[position] = b'0' + replacement;
                    let mutated = String::from_utf8(mutated).unwrap();
                    assert!(
                        !validate_cnpj(&mutated).is_ok(),
                        "mutation {} of {} should fail",
                        mutated,
                        cnpj
                    );
                }
            }
        }
    }

    #[test]
    fn test_cnpj_structural_failures() {
        assert!(!validate_cnpj("").is_ok());
        assert!(!validate_cnpj("1122233300018").is_ok());
        assert!(!validate_cnpj("00000000000000").is_ok());
        assert!(!validate_cnpj("11111111111111").is_ok());
        let outcome = validate_cnpj("11222333000182");
        assert!(outcome.reason().unwrap().contains("second check digit"));
    }

    #[test]
    fn test_dates() {
        assert_eq!(
            parse_sped_date("25122023").unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()
        );
        assert!(validate_date("29022024").is_ok());
        assert!(!validate_date("29022023").is_ok());
        assert!(!validate_date("31042023").is_ok());
        assert!(!validate_date("2023-12-25").is_ok());
        assert!(!validate_date("2512202").is_ok());
    }

    #[test]
    fn test_cfop() {
        assert!(validate_cfop("5102").is_ok());
        assert!(validate_cfop("1102").is_ok());
        assert!(validate_cfop("7949").is_ok());
        assert!(!validate_cfop("4102").is_ok());
        assert!(!validate_cfop("8102").is_ok());
        assert!(!validate_cfop("510").is_ok());
        assert!(!validate_cfop("51a2").is_ok());
    }

    #[test]
    fn test_nfe_key() {
        let key = "35231234567890123456789012345678901234567890";
        assert_eq!(key.len(), 44);
        assert!(validate_nfe_key(key).is_ok());
        assert!(!validate_nfe_key(&key[..43]).is_ok());
        assert!(!validate_nfe_key(&format!("{}X", &key[..43])).is_ok());
    }

    #[test]
    fn test_brazilian_decimals() {
        let cases = [
            ("1.234,56", "1234.56"),
            ("1234,56", "1234.56"),
            ("150,00", "150.00"),
            ("-0,01", "-0.01"),
            ("42", "42"),
            ("1.000.000,5", "1000000.5"),
            ("0,123456", "0.123456"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                parse_brazilian_decimal(input).unwrap(),
                Decimal::from_str(expected).unwrap(),
                "parsing {}",
                input
            );
        }
    }

    #[test]
    fn test_rejected_decimals() {
        for input in ["abc", "1,2,3", "12.34", "1.2345,00", "", ",50", "1.234.56"] {
            assert!(!validate_numeric(input).is_ok(), "{} should fail", input);
        }
        // More significant digits than a fixed-precision decimal holds
        assert!(!validate_numeric("1234567890123456789012345678901234,00").is_ok());
    }

    #[test]
    fn test_check_digit_rule() {
        // Remainders 0 and 1 both map to zero
        assert_eq!(cnpj_check_digit(&[0; 12], &cnpj_weights::FIRST), 0);
        assert_eq!(cnpj_check_digit(&[1, 1, 2, 2, 2, 3, 3, 3, 0, 0, 0, 1], &cnpj_weights::FIRST), 8);
    }
}
