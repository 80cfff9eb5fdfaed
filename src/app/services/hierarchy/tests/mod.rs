//! Test utilities for hierarchy building

use crate::app::services::hierarchy::{Hierarchy, build};
use crate::app::services::schema_registry::SchemaRegistry;
use crate::app::services::sped_parser::tests::parse_lenient;

mod hierarchy_tests;

/// Parse lines leniently and arrange them with the built-in registry
pub fn build_from_lines(lines: &[String]) -> Hierarchy {
    build(parse_lenient(lines), SchemaRegistry::builtin())
}
