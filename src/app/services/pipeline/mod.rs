//! File and batch processing pipeline
//!
//! Connects the line source, parser, hierarchy builder, integrity checker,
//! consolidator and metrics into one pass per file, and runs many files in
//! parallel with an order-preserving merge.
//!
//! ## Architecture
//!
//! - [`processor`] - One sequential pass over one file
//! - [`batch`] - Bounded parallel runner and result merge
//!
//! ## Usage
//!
//! ```rust
//! use sped_processor::app::services::pipeline::FileProcessor;
//! use sped_processor::app::services::policy::ValidationPolicy;
//!
//! let processor = FileProcessor::new(ValidationPolicy::lenient());
//! let outcome = processor.process_lines("inline", ["|Z999|1|"]);
//!
//! assert_eq!(outcome.details.len(), 1);
//! assert!(outcome.consolidated.is_empty());
//! ```

pub mod batch;
pub mod processor;

#[cfg(test)]
pub mod tests;

pub use batch::{BatchOutcome, BatchProcessor, FileReport};
pub use processor::{FileOutcome, FileProcessor};
