//! Strict/lenient validation policy
//!
//! One value carries the validation toggles and decides which findings are
//! fatal. The line parser and the integrity checker both consult it.

use crate::app::models::{Finding, FindingSeverity, IntegrityFinding};
use crate::config::ValidationConfig;
use crate::constants::{
    DEFAULT_STRICT_MODE, DEFAULT_VALIDATE_CNPJ, DEFAULT_VALIDATE_DATES,
    DEFAULT_VALIDATION_TOLERANCE,
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub validate_cnpj: bool,
    pub validate_dates: bool,
    pub strict_mode: bool,
    pub tolerance: Decimal,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            validate_cnpj: DEFAULT_VALIDATE_CNPJ,
            validate_dates: DEFAULT_VALIDATE_DATES,
            strict_mode: DEFAULT_STRICT_MODE,
            tolerance: DEFAULT_VALIDATION_TOLERANCE,
        }
    }
}

impl ValidationPolicy {
    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            validate_cnpj: config.validate_cnpj,
            validate_dates: config.validate_dates,
            strict_mode: config.strict_mode,
            tolerance: config.validation_tolerance,
        }
    }

    pub fn lenient() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            strict_mode: true,
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Record findings of error severity or above are fatal in strict mode
    pub fn is_fatal(&self, finding: &Finding) -> bool {
        self.strict_mode && finding.severity >= FindingSeverity::Error
    }

    /// Every integrity finding is fatal for its group in strict mode
    pub fn is_fatal_integrity(&self, _finding: &IntegrityFinding) -> bool {
        self.strict_mode
    }
}
