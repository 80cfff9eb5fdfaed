//! Parent/child hierarchy builder
//!
//! Links child records to the most recent open parent of their document
//! family in a single pass over records in file order. Each family keeps its
//! own open group; families advance independently.
//!
//! ## Rules
//!
//! - A parent record closes its family's open group and opens a new one
//! - A child record joins its family's open group, or becomes an orphan
//! - Any other known record closes the open group of every family it does
//!   not belong to; header records also replace the header slot of the
//!   families that use them
//! - Records of unknown type leave every family untouched
//! - End of input closes every open group

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::app::models::{Finding, ParsedRecord, RecordGroup};
use crate::app::services::schema_registry::{RecordRole, SchemaRegistry};

#[cfg(test)]
pub mod tests;

/// Records arranged into groups, orphans and standalone records
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    /// Closed groups in ascending parent line order
    pub groups: Vec<RecordGroup>,

    /// Child records that had no open parent, with an orphan finding attached
    pub orphans: Vec<ParsedRecord>,

    /// Records outside any family: headers, openings, terminators, unknown types
    pub standalone: Vec<Arc<ParsedRecord>>,
}

impl Hierarchy {
    /// Total number of records held
    pub fn record_count(&self) -> usize {
        self.groups
            .iter()
            .map(|group| 1 + group.children.len())
            .sum::<usize>()
            + self.orphans.len()
            + self.standalone.len()
    }
}

/// Incremental per-family state machine
#[derive(Debug)]
pub struct HierarchyBuilder<'a> {
    registry: &'a SchemaRegistry,
    open: Vec<Option<RecordGroup>>,
    headers: BTreeMap<String, Arc<ParsedRecord>>,
    hierarchy: Hierarchy,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self {
            registry,
            open: vec![None; registry.families().len()],
            headers: BTreeMap::new(),
            hierarchy: Hierarchy::default(),
        }
    }

    /// Feed the next record in file order
    pub fn push(&mut self, record: ParsedRecord) {
        match self.registry.role(&record.type_code) {
            None => self.hierarchy.standalone.push(Arc::new(record)),
            Some(RecordRole::Parent(family)) => {
                self.close_all();
                self.open_group(family, record);
            }
            Some(RecordRole::Child(family)) => {
                self.close_all_except(family);
                self.attach_child(family, record);
            }
            Some(RecordRole::Header) => {
                self.close_all();
                let header = Arc::new(record);
                self.headers
                    .insert(header.type_code.clone(), Arc::clone(&header));
                self.hierarchy.standalone.push(header);
            }
            Some(RecordRole::Standalone) => {
                self.close_all();
                self.hierarchy.standalone.push(Arc::new(record));
            }
        }
    }

    /// Close every open group and return the arranged records
    pub fn finish(mut self) -> Hierarchy {
        self.close_all();
        self.hierarchy
            .groups
            .sort_by_key(|group| group.parent.line_number);

        info!(
            "Built {} groups ({} orphans, {} standalone records)",
            self.hierarchy.groups.len(),
            self.hierarchy.orphans.len(),
            self.hierarchy.standalone.len()
        );

        self.hierarchy
    }

    fn open_group(&mut self, family_index: usize, parent: ParsedRecord) {
        let family = &self.registry.families()[family_index];
        let header = family
            .header
            .and_then(|code| self.headers.get(code))
            .map(Arc::clone);

        self.open[family_index] = Some(RecordGroup::new(family.code, header, parent));
    }

    fn attach_child(&mut self, family_index: usize, mut child: ParsedRecord) {
        match self.open[family_index].as_mut() {
            Some(group) => group.children.push(child),
            None => {
                let family = &self.registry.families()[family_index];
                debug!(
                    "Orphan {} at line {}: no open {} group",
                    child.type_code, child.line_number, family.parent
                );
                child.findings.push(Finding::orphan_child_record(
                    child.line_number,
                    &child.type_code,
                    family.parent,
                ));
                self.hierarchy.orphans.push(child);
            }
        }
    }

    fn close_all(&mut self) {
        for slot in self.open.iter_mut() {
            if let Some(group) = slot.take() {
                self.hierarchy.groups.push(group);
            }
        }
    }

    fn close_all_except(&mut self, keep: usize) {
        for (index, slot) in self.open.iter_mut().enumerate() {
            if index == keep {
                continue;
            }
            if let Some(group) = slot.take() {
                self.hierarchy.groups.push(group);
            }
        }
    }
}

/// Arrange parsed records into groups in one pass
pub fn build<I>(records: I, registry: &SchemaRegistry) -> Hierarchy
where
    I: IntoIterator<Item = ParsedRecord>,
{
    let mut builder = HierarchyBuilder::new(registry);
    for record in records {
        builder.push(record);
    }
    builder.finish()
}
