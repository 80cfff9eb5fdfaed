//! SPED line parser
//!
//! Turns decoded SPED text into typed [`ParsedRecord`]s. Parsing never aborts
//! on a bad line or field: problems become findings on the record.
//!
//! ## Architecture
//!
//! - [`parser`] - Line stream orchestration and line counts
//! - [`line`] - Delimited line splitting
//! - [`record_parser`] - Schema-driven record construction
//! - [`field_parsers`] - Per-kind field value parsing
//!
//! ## Usage
//!
//! ```rust
//! use sped_processor::app::services::policy::ValidationPolicy;
//! use sped_processor::app::services::sped_parser::SpedParser;
//!
//! let parser = SpedParser::with_policy(ValidationPolicy::lenient());
//! let output = parser.parse_lines(["|Z999|a|b|"]);
//!
//! assert_eq!(output.records.len(), 1);
//! assert_eq!(output.records[0].findings.len(), 1);
//! ```
//!
//! [`ParsedRecord`]: crate::app::models::ParsedRecord

pub mod field_parsers;
pub mod line;
pub mod parser;
pub mod record_parser;

#[cfg(test)]
pub mod tests;

pub use line::split_line;
pub use parser::{ParseOutput, SpedParser};
pub use record_parser::RecordParser;
