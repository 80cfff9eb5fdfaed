use crate::app::services::schema_registry::{
    FieldKind, RecordRole, SchemaRegistry, families::FAMILIES, layouts,
};

#[test]
fn test_lookup_known_and_unknown_types() {
    let registry = SchemaRegistry::builtin();

    let c100 = registry.lookup("C100").expect("C100 is registered");
    assert_eq!(c100.code, "C100");
    assert_eq!(c100.fields.len(), 28);
    assert_eq!(c100.fields[0].name, "IND_OPER");
    assert_eq!(c100.fields[14].name, "VL_MERC");

    assert!(registry.lookup("Z999").is_none());
    assert!(!registry.contains("Z999"));
    assert!(registry.contains("9999"));
}

#[test]
fn test_field_kinds_are_inferred() {
    let registry = SchemaRegistry::builtin();

    let c100 = registry.lookup("C100").unwrap();
    assert_eq!(c100.field("VL_DOC").unwrap().kind, FieldKind::Decimal);
    assert_eq!(c100.field("DT_DOC").unwrap().kind, FieldKind::Date);
    assert_eq!(c100.field("CHV_NFE").unwrap().kind, FieldKind::NfeKey);
    assert_eq!(c100.field("COD_PART").unwrap().kind, FieldKind::Text);

    let c170 = registry.lookup("C170").unwrap();
    assert_eq!(c170.field("CFOP").unwrap().kind, FieldKind::Cfop);

    let c010 = registry.lookup("C010").unwrap();
    assert_eq!(c010.field("CNPJ").unwrap().kind, FieldKind::Cnpj);

    // Reference keys are plain text, only the document's own key is validated
    let d700 = registry.lookup("D700").unwrap();
    assert_eq!(d700.field("CHV_DOCe").unwrap().kind, FieldKind::NfeKey);
    assert_eq!(d700.field("CHV_DOCe_REF").unwrap().kind, FieldKind::Text);
}

#[test]
fn test_required_fields() {
    let registry = SchemaRegistry::builtin();

    let required: Vec<&str> = registry
        .lookup("C170")
        .unwrap()
        .required_fields()
        .map(|f| f.name)
        .collect();
    assert_eq!(required, vec!["NUM_ITEM", "COD_ITEM", "QTD", "VL_ITEM"]);

    let f100 = registry.lookup("F100").unwrap();
    assert!(f100.field("DT_OPER").unwrap().required);
    assert!(!f100.field("VL_OPER").unwrap().required);
}

#[test]
fn test_parent_and_total_declarations() {
    let registry = SchemaRegistry::builtin();

    assert_eq!(registry.lookup("C170").unwrap().parent, Some("C100"));
    assert_eq!(registry.lookup("C501").unwrap().parent, Some("C500"));
    assert_eq!(registry.lookup("E116").unwrap().parent, Some("E110"));
    assert_eq!(registry.lookup("C100").unwrap().parent, None);

    let total = registry.lookup("C100").unwrap().total.unwrap();
    assert_eq!(total.parent_field, "VL_MERC");
    assert_eq!(total.child_type, "C170");
    assert_eq!(total.child_field, "VL_ITEM");

    assert!(registry.lookup("C500").unwrap().requires_children);
    assert!(!registry.lookup("C100").unwrap().requires_children);
}

#[test]
fn test_roles() {
    let registry = SchemaRegistry::builtin();

    assert!(matches!(registry.role("C100"), Some(RecordRole::Parent(_))));
    assert!(matches!(registry.role("C190"), Some(RecordRole::Child(_))));
    assert_eq!(registry.role("C010"), Some(RecordRole::Header));
    assert_eq!(registry.role("E100"), Some(RecordRole::Header));
    assert_eq!(registry.role("A001"), Some(RecordRole::Standalone));
    assert_eq!(registry.role("Z999"), None);

    if let Some(RecordRole::Child(index)) = registry.role("D105") {
        assert_eq!(registry.families()[index].code, "D");
    } else {
        panic!("D105 should be a child record");
    }
}

#[test]
fn test_every_table_entry_has_a_layout() {
    let registry = SchemaRegistry::builtin();

    for (code, names) in layouts::DECIMAL_FIELDS.iter().chain(layouts::REQUIRED_FIELDS) {
        let schema = registry
            .lookup(code)
            .unwrap_or_else(|| panic!("{} has no layout", code));
        for name in *names {
            assert!(schema.field(name).is_some(), "{}.{} not in layout", code, name);
        }
    }

    for family in FAMILIES {
        assert!(registry.contains(family.parent));
        for child in family.children {
            assert!(registry.contains(child), "{} not registered", child);
        }
        if let Some(header) = family.header {
            assert!(registry.contains(header));
        }
    }
}

#[test]
fn test_each_child_belongs_to_one_family() {
    let mut seen = std::collections::BTreeSet::new();
    for family in FAMILIES {
        for child in family.children {
            assert!(seen.insert(*child), "{} listed in two families", child);
        }
    }
}
