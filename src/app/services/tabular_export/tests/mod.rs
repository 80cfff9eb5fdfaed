//! Test utilities for tabular export

use crate::app::services::pipeline::FileOutcome;
use crate::app::services::pipeline::tests::{process_lenient, sample_file_lines};

mod export_tests;

/// Outcome of the sample file plus an orphan and an unknown record
pub fn sample_outcome() -> FileOutcome {
    let mut lines = sample_file_lines("150,00");
    lines.insert(0, "|Z999|raw|".to_string());
    process_lenient(&lines)
}
