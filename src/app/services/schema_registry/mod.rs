//! Record schema registry for SPED record types
//!
//! A closed table mapping each record type code to its field layout, field
//! kinds, required fields, parent type and total declaration, plus the table
//! of document families. The registry is built once and shared read-only.
//!
//! ## Architecture
//!
//! - [`layouts`] - Static field, decimal, required and total tables
//! - [`families`] - Document family table (parent, children, header)

pub mod families;
pub mod layouts;

#[cfg(test)]
pub mod tests;

pub use families::DocumentFamily;

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Validator attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    /// Brazilian-format decimal (comma separator, dot thousands)
    Decimal,
    /// DDMMYYYY date
    Date,
    /// Establishment CNPJ with check digits
    Cnpj,
    /// Four-digit fiscal operation code
    Cfop,
    /// 44-digit electronic document access key
    NfeKey,
}

/// One declared field of a record layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// A parent total checked against the sum of one child field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalSpec {
    pub parent_field: &'static str,
    pub child_type: &'static str,
    pub child_field: &'static str,
}

/// Role a record type plays in the family hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRole {
    /// Parent of the family at this index
    Parent(usize),
    /// Child of the family at this index
    Child(usize),
    /// Header record attached to the families that name it
    Header,
    /// Any other known record
    Standalone,
}

/// Immutable definition of one record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTypeSchema {
    pub code: &'static str,
    pub fields: Vec<FieldSpec>,
    /// Expected parent type for child records
    pub parent: Option<&'static str>,
    pub total: Option<TotalSpec>,
    pub requires_children: bool,
}

impl RecordTypeSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|field| field.name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.required)
    }

    /// Decimal fields in layout order
    pub fn decimal_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|field| field.kind == FieldKind::Decimal)
            .map(|field| field.name)
    }
}

static BUILTIN: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::build);

/// Lookup table of record schemas and document families
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<&'static str, RecordTypeSchema>,
    roles: BTreeMap<&'static str, RecordRole>,
    families: &'static [DocumentFamily],
}

impl SchemaRegistry {
    /// The shared built-in registry
    pub fn builtin() -> &'static SchemaRegistry {
        &BUILTIN
    }

    fn build() -> Self {
        let mut schemas = BTreeMap::new();
        let families = families::FAMILIES;

        for (code, names) in layouts::LAYOUTS {
            let decimals = table_entry(layouts::DECIMAL_FIELDS, code);
            let required = table_entry(layouts::REQUIRED_FIELDS, code);

            let fields = names
                .iter()
                .map(|name| FieldSpec {
                    name: *name,
                    kind: field_kind(name, decimals),
                    required: required.contains(name),
                })
                .collect();

            let parent = families
                .iter()
                .find(|family| family.children.contains(code))
                .map(|family| family.parent);

            let total = layouts::TOTAL_CHECKS
                .iter()
                .find(|(parent_code, _)| parent_code == code)
                .map(|(_, spec)| *spec);

            schemas.insert(
                *code,
                RecordTypeSchema {
                    code: *code,
                    fields,
                    parent,
                    total,
                    requires_children: layouts::REQUIRES_CHILDREN.contains(code),
                },
            );
        }

        let mut roles: BTreeMap<&'static str, RecordRole> = schemas
            .keys()
            .map(|code| (*code, RecordRole::Standalone))
            .collect();
        for (index, family) in families.iter().enumerate() {
            roles.insert(family.parent, RecordRole::Parent(index));
            for child in family.children {
                roles.insert(*child, RecordRole::Child(index));
            }
            if let Some(header) = family.header {
                roles.insert(header, RecordRole::Header);
            }
        }

        Self {
            schemas,
            roles,
            families,
        }
    }

    /// Find the schema of a record type
    pub fn lookup(&self, type_code: &str) -> Option<&RecordTypeSchema> {
        self.schemas.get(type_code)
    }

    pub fn contains(&self, type_code: &str) -> bool {
        self.schemas.contains_key(type_code)
    }

    /// Role of a known record type; `None` for unknown types
    pub fn role(&self, type_code: &str) -> Option<RecordRole> {
        self.roles.get(type_code).copied()
    }

    pub fn families(&self) -> &'static [DocumentFamily] {
        self.families
    }

    /// Find a family by its code
    pub fn family(&self, code: &str) -> Option<&'static DocumentFamily> {
        self.families.iter().find(|family| family.code == code)
    }

    /// Record type codes in sorted order
    pub fn record_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn table_entry(table: &'static [(&str, &'static [&'static str])], code: &str) -> &'static [&'static str] {
    table
        .iter()
        .find(|(entry, _)| *entry == code)
        .map(|(_, names)| *names)
        .unwrap_or(&[])
}

fn field_kind(name: &str, decimals: &[&str]) -> FieldKind {
    if decimals.contains(&name) {
        FieldKind::Decimal
    } else if name == "CNPJ" {
        FieldKind::Cnpj
    } else if name == "CFOP" {
        FieldKind::Cfop
    } else if layouts::ACCESS_KEY_FIELDS.contains(&name) {
        FieldKind::NfeKey
    } else if name.starts_with("DT_") {
        FieldKind::Date
    } else {
        FieldKind::Text
    }
}
