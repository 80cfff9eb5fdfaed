//! SPED Processor Library
//!
//! A Rust library for parsing, validating and consolidating Brazilian SPED
//! digital tax-ledger files into flat tables.
//!
//! This library provides tools for:
//! - Splitting pipe-delimited SPED lines into typed records using a static layout registry
//! - Validating CNPJ check digits, dates, CFOP codes, access keys and Brazilian decimals
//! - Linking child records to their parent documents per document family
//! - Cross-checking parent totals against the sum of their items
//! - Folding each document and its items into one consolidated row
//! - Writing consolidated and detail tables as CSV or Parquet

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod consolidator;
        pub mod hierarchy;
        pub mod integrity;
        pub mod metrics;
        pub mod pipeline;
        pub mod policy;
        pub mod schema_registry;
        pub mod sped_parser;
        pub mod tabular_export;
        pub mod validators;
    }
    pub mod adapters {
        pub mod line_source;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{
    ConsolidatedRow, DetailRow, FieldValue, Finding, FindingKind, FindingSeverity,
    IntegrityFinding, ParsedRecord, RecordGroup,
};
pub use config::Config;

/// Result type alias for the SPED processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SPED processing operations
///
/// Record and group level problems are reported as [`Finding`]s and never
/// surface here. These variants cover configuration, I/O and file level
/// failures.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Input file rejected by the admission policy
    #[error("File '{path}' rejected: {reason}")]
    FileAdmission { path: String, reason: String },

    /// Input bytes could not be decoded into text
    #[error("Encoding error in file '{path}': {message}")]
    Encoding { path: String, message: String },

    /// Tabular export failed
    #[error("Table export error: {message}")]
    TableExport {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Strict mode found a fatal finding in a file
    #[error("Strict mode violation in '{path}' at line {line}: {message}")]
    StrictModeViolation {
        path: String,
        line: usize,
        message: String,
    },

    /// Report serialization failed
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file admission error
    pub fn file_admission(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FileAdmission {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Encoding {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a table export error
    pub fn table_export(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::TableExport {
            message: message.into(),
            source,
        }
    }

    /// Create a strict mode violation error
    pub fn strict_mode_violation(
        path: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::StrictModeViolation {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<polars::prelude::PolarsError> for Error {
    fn from(error: polars::prelude::PolarsError) -> Self {
        Self::TableExport {
            message: "Polars operation failed".to_string(),
            source: Box::new(error),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid TOML configuration: {}", error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
