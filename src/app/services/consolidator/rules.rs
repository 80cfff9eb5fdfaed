//! Aggregation rules per document family
//!
//! Rules are derived from the schema registry so a new family or child type
//! only needs a registry entry. The column order of a rule is fixed, which
//! gives every consolidated row of a family the same shape.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::app::services::schema_registry::{
    DocumentFamily, FieldKind, RecordTypeSchema, SchemaRegistry,
};
use crate::constants::{IND_EMIT_LABELS, IND_FRT_LABELS, IND_OPER_LABELS};

/// Parent indicator fields decoded into label columns
const INDICATOR_FIELDS: &[(&str, &[(&str, &str)])] = &[
    ("IND_OPER", IND_OPER_LABELS),
    ("IND_EMIT", IND_EMIT_LABELS),
    ("IND_FRT", IND_FRT_LABELS),
];

/// A header field copied into consolidated rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderColumn {
    pub field: &'static str,
    pub column: String,
}

/// An indicator field decoded into a label column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorColumn {
    pub field: &'static str,
    pub labels: &'static [(&'static str, &'static str)],
    pub column: String,
}

/// A child field reduced over the group's children of one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildColumn {
    pub child_type: &'static str,
    pub field: &'static str,
    pub column: String,
}

/// How groups of one family fold into consolidated rows
#[derive(Debug, Clone)]
pub struct AggregationRule {
    pub family: &'static DocumentFamily,
    pub header_type: Option<&'static str>,
    pub header_fields: Vec<HeaderColumn>,
    pub parent_fields: Vec<&'static str>,
    pub indicators: Vec<IndicatorColumn>,
    pub child_counts: Vec<(&'static str, String)>,
    pub sums: Vec<ChildColumn>,
    pub distinct_lists: Vec<ChildColumn>,
}

impl AggregationRule {
    /// Derive the rule of one family from the registry
    pub fn for_family(family: &'static DocumentFamily, registry: &SchemaRegistry) -> Self {
        let header_type = family.header.filter(|code| registry.contains(code));
        let header_fields: Vec<HeaderColumn> = header_type
            .and_then(|code| registry.lookup(code))
            .map(|schema| {
                schema
                    .field_names()
                    .map(|field| HeaderColumn {
                        field,
                        column: format!("{}_{}", schema.code, field),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let parent_schema = registry.lookup(family.parent);
        let parent_fields: Vec<&'static str> = parent_schema
            .map(|schema| schema.field_names().collect())
            .unwrap_or_default();

        let indicators: Vec<IndicatorColumn> = INDICATOR_FIELDS
            .iter()
            .filter(|(field, _)| parent_fields.contains(field))
            .map(|&(field, labels)| IndicatorColumn {
                field,
                labels,
                column: format!("{}_DESC", field),
            })
            .collect();

        let child_schemas: Vec<&RecordTypeSchema> = family
            .children
            .iter()
            .filter_map(|code| registry.lookup(code))
            .collect();

        let child_counts: Vec<(&'static str, String)> = child_schemas
            .iter()
            .map(|schema| (schema.code, format!("{}_COUNT", schema.code)))
            .collect();

        let sums: Vec<ChildColumn> = child_schemas
            .iter()
            .copied()
            .flat_map(|schema| {
                schema.decimal_fields().map(move |field| ChildColumn {
                    child_type: schema.code,
                    field,
                    column: format!("{}_{}_SUM", schema.code, field),
                })
            })
            .collect();

        let distinct_lists: Vec<ChildColumn> = child_schemas
            .iter()
            .copied()
            .flat_map(|schema| {
                schema
                    .fields
                    .iter()
                    .filter(|spec| spec.kind == FieldKind::Cfop)
                    .map(move |spec| ChildColumn {
                        child_type: schema.code,
                        field: spec.name,
                        column: format!("{}_{}_LIST", schema.code, spec.name),
                    })
            })
            .collect();

        Self {
            family,
            header_type,
            header_fields,
            parent_fields,
            indicators,
            child_counts,
            sums,
            distinct_lists,
        }
    }

    /// Output column names in row order
    pub fn columns(&self) -> Vec<String> {
        let mut columns = vec!["FAMILY".to_string(), "PARENT_LINE".to_string()];
        columns.extend(self.header_fields.iter().map(|h| h.column.clone()));
        columns.extend(self.parent_fields.iter().map(|f| f.to_string()));
        columns.extend(self.indicators.iter().map(|i| i.column.clone()));
        columns.push("CHILD_COUNT".to_string());
        columns.extend(self.child_counts.iter().map(|(_, column)| column.clone()));
        columns.extend(self.sums.iter().map(|s| s.column.clone()));
        columns.extend(self.distinct_lists.iter().map(|d| d.column.clone()));
        columns.push("FINDINGS".to_string());
        columns
    }
}

static BUILTIN_RULES: LazyLock<RuleTable> =
    LazyLock::new(|| RuleTable::new(SchemaRegistry::builtin()));

/// Aggregation rules keyed by parent record type
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: BTreeMap<&'static str, AggregationRule>,
}

impl RuleTable {
    pub fn new(registry: &SchemaRegistry) -> Self {
        let rules = registry
            .families()
            .iter()
            .map(|family| (family.parent, AggregationRule::for_family(family, registry)))
            .collect();
        Self { rules }
    }

    /// Rules for the built-in registry
    pub fn builtin() -> &'static RuleTable {
        &BUILTIN_RULES
    }

    /// All rules in parent type order
    pub fn rules(&self) -> impl Iterator<Item = &AggregationRule> {
        self.rules.values()
    }

    /// Rule for a parent record type
    pub fn rule_for(&self, parent_type: &str) -> Option<&AggregationRule> {
        self.rules.get(parent_type)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
