//! Test utilities for consolidation testing

use crate::app::models::ConsolidatedRow;
use crate::app::services::consolidator::Consolidator;
use crate::app::services::hierarchy::tests::build_from_lines;

mod consolidator_tests;

/// Consolidate every group built from the lines
pub fn consolidate_lines(lines: &[String]) -> Vec<ConsolidatedRow> {
    let consolidator = Consolidator::default();
    build_from_lines(lines)
        .groups
        .iter()
        .filter_map(|group| consolidator.consolidate(group))
        .collect()
}
