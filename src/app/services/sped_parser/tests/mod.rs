//! Test utilities for SPED parser testing
//!
//! Line builders here are shared by the other service test modules so every
//! test works from the same realistic record layouts.

use crate::app::models::ParsedRecord;
use crate::app::services::policy::ValidationPolicy;
use crate::app::services::sped_parser::SpedParser;


/// Establishment CNPJ with valid check digits
pub const TEST_CNPJ: &str = "11222333000181";

/// 44-digit NF-e access key
pub const TEST_NFE_KEY: &str = "35240111222333000181550010000001231000001234";

/// Build one delimited line from a type code and its values
pub fn sped_line(type_code: &str, values: &[&str]) -> String {
    format!("|{}|{}|", type_code, values.join("|"))
}

pub fn c010_line(cnpj: &str) -> String {
    sped_line("C010", &[cnpj, "1"])
}

/// Goods invoice with the given document number and goods total
pub fn c100_line(num_doc: &str, vl_merc: &str) -> String {
    let mut values = vec![
        "0", "1", "P001", "55", "00", "1", num_doc, TEST_NFE_KEY, "01012024", "02012024",
        vl_merc, "0", "0,00", "0,00", vl_merc, "9",
    ];
    values.extend(["0,00"; 12]);
    sped_line("C100", &values)
}

/// Invoice item with the given item value and CFOP
pub fn c170_line(num_item: &str, vl_item: &str, cfop: &str) -> String {
    let mut values = vec![
        num_item, "ITEM01", "", "1,00", "UN", vl_item, "0,00", "0", "000", cfop,
    ];
    values.extend([""; 26]);
    sped_line("C170", &values)
}

/// Analytical summary line by CFOP
pub fn c190_line(cfop: &str, vl_opr: &str) -> String {
    sped_line(
        "C190",
        &["000", cfop, "18,00", vl_opr, vl_opr, "0,00", "", "", "", "", ""],
    )
}

/// Utility invoice with the given PIS total
pub fn c500_line(num_doc: &str, vl_pis: &str) -> String {
    sped_line(
        "C500",
        &[
            "P002", "06", "00", "1", "", num_doc, "05012024", "05012024", "100,00", "0,00", "",
            vl_pis, "0,00", "",
        ],
    )
}

pub fn c501_line(vl_pis: &str) -> String {
    sped_line("C501", &["50", "100,00", "04", "100,00", "1,65", vl_pis, ""])
}

pub fn terminator_line(count: usize) -> String {
    sped_line("9999", &[&count.to_string()])
}

/// Parse lines with a lenient parser over the built-in registry
pub fn parse_lenient(lines: &[String]) -> Vec<ParsedRecord> {
    SpedParser::with_policy(ValidationPolicy::lenient())
        .parse_lines(lines)
        .records
}
