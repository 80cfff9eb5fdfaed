//! Document family table
//!
//! Each family is one parent record type, its child types and the header
//! record whose fields are attached to consolidated rows. Adding a family is
//! one more entry here.

/// A group of records consolidated under one rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFamily {
    /// Family code used to name output tables
    pub code: &'static str,
    pub parent: &'static str,
    pub children: &'static [&'static str],
    pub header: Option<&'static str>,
    pub description: &'static str,
}

impl DocumentFamily {
    /// True when the record type is this family's parent or one of its children
    pub fn includes(&self, type_code: &str) -> bool {
        self.parent == type_code || self.children.contains(&type_code)
    }
}

pub(super) const FAMILIES: &[DocumentFamily] = &[
    DocumentFamily {
        code: "C",
        parent: "C100",
        children: &["C170", "C190", "C195", "C197"],
        header: Some("C010"),
        description: "Goods invoices (NF-e and models 01/1B/04/55)",
    },
    DocumentFamily {
        code: "C500",
        parent: "C500",
        children: &["C501", "C505"],
        header: Some("C010"),
        description: "Electricity, water and gas invoices",
    },
    DocumentFamily {
        code: "D",
        parent: "D100",
        children: &["D170", "D190", "D101", "D105"],
        header: Some("D010"),
        description: "Transport documents (CT-e)",
    },
    DocumentFamily {
        code: "D500",
        parent: "D500",
        children: &["D501", "D505"],
        header: Some("D010"),
        description: "Communication and telecom service invoices",
    },
    DocumentFamily {
        code: "D700",
        parent: "D700",
        children: &[],
        header: Some("D010"),
        description: "Electronic communication service invoices (NFCom)",
    },
    DocumentFamily {
        code: "A",
        parent: "A100",
        children: &[],
        header: Some("A010"),
        description: "Service invoices (ISS)",
    },
    DocumentFamily {
        code: "F",
        parent: "F100",
        children: &["F111"],
        header: Some("F010"),
        description: "Other documents and operations",
    },
    DocumentFamily {
        code: "M",
        parent: "M100",
        children: &["M105", "M110", "M115"],
        header: None,
        description: "PIS credit assessment",
    },
    DocumentFamily {
        code: "E",
        parent: "E110",
        children: &["E111", "E112", "E113", "E115", "E116"],
        header: Some("E100"),
        description: "ICMS assessment",
    },
];
