//! Tests for consolidated row construction

use super::*;
use crate::app::models::Cell;
use crate::app::services::sped_parser::tests::*;
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(value: &str) -> Cell {
    Cell::Decimal(Decimal::from_str(value).unwrap())
}

fn text(value: &str) -> Cell {
    Cell::Text(value.to_string())
}

#[test]
fn test_goods_invoice_row() {
    let rows = consolidate_lines(&[
        c010_line(TEST_CNPJ),
        c100_line("123", "150,00"),
        c170_line("1", "100,00", "5102"),
        c170_line("2", "50,00", "6102"),
        c170_line("3", "0,00", "5102"),
        c190_line("5102", "150,00"),
    ]);

    assert_eq!(rows.len(), 1);
    let row = &rows[0];

    assert_eq!(row.family, "C");
    assert_eq!(row.parent_line, 2);
    assert_eq!(row.get("FAMILY"), Some(&text("C")));
    assert_eq!(row.get("PARENT_LINE"), Some(&Cell::Integer(2)));
    assert_eq!(row.get("C010_CNPJ"), Some(&text(TEST_CNPJ)));
    assert_eq!(row.get("NUM_DOC"), Some(&text("123")));
    assert_eq!(row.get("DT_DOC"), Some(&text("2024-01-01")));
    assert_eq!(row.get("VL_MERC"), Some(&dec("150.00")));

    assert_eq!(row.get("IND_OPER_DESC"), Some(&text("Entrada")));
    assert_eq!(row.get("IND_EMIT_DESC"), Some(&text("Terceiros")));
    assert_eq!(row.get("IND_FRT_DESC"), Some(&text("Sem cobrança de frete")));

    assert_eq!(row.get("CHILD_COUNT"), Some(&Cell::Integer(4)));
    assert_eq!(row.get("C170_COUNT"), Some(&Cell::Integer(3)));
    assert_eq!(row.get("C190_COUNT"), Some(&Cell::Integer(1)));
    assert_eq!(row.get("C197_COUNT"), Some(&Cell::Integer(0)));

    assert_eq!(row.get("C170_VL_ITEM_SUM"), Some(&dec("150.00")));
    assert_eq!(row.get("C190_VL_OPR_SUM"), Some(&dec("150.00")));
    assert_eq!(row.get("C197_VL_ICMS_SUM"), Some(&Cell::Decimal(Decimal::ZERO)));

    assert_eq!(row.get("C170_CFOP_LIST"), Some(&text("5102; 6102")));
    assert_eq!(row.get("C190_CFOP_LIST"), Some(&text("5102")));
    assert_eq!(row.get("FINDINGS"), Some(&Cell::Integer(0)));
}

#[test]
fn test_rows_of_a_family_share_shape() {
    let rows = consolidate_lines(&[
        c010_line(TEST_CNPJ),
        c100_line("1", "10,00"),
        c170_line("1", "10,00", "5102"),
        c100_line("2", "20,00"),
    ]);

    assert_eq!(rows.len(), 2);
    let names = |row: &crate::app::models::ConsolidatedRow| {
        row.columns.iter().map(|(n, _)| n.clone()).collect::<Vec<_>>()
    };
    assert_eq!(names(&rows[0]), names(&rows[1]));
    assert_eq!(rows[1].get("C170_CFOP_LIST"), Some(&Cell::Empty));
    assert_eq!(rows[1].get("C170_VL_ITEM_SUM"), Some(&Cell::Decimal(Decimal::ZERO)));

    let consolidator = Consolidator::default();
    assert_eq!(consolidator.columns_for_family("C"), Some(names(&rows[0])));
}

#[test]
fn test_missing_header_leaves_header_columns_empty() {
    let rows = consolidate_lines(&[c100_line("1", "10,00")]);
    assert_eq!(rows[0].get("C010_CNPJ"), Some(&Cell::Empty));
}

#[test]
fn test_unknown_indicator_code_passes_through() {
    let line = c100_line("1", "10,00").replacen("|C100|0|1|", "|C100|7|1|", 1);
    let rows = consolidate_lines(&[line]);
    assert_eq!(rows[0].get("IND_OPER_DESC"), Some(&text("7")));
}

#[test]
fn test_findings_are_counted() {
    let rows = consolidate_lines(&[
        c100_line("1", "10,00"),
        c170_line("1", "1x", "5102"),
    ]);
    assert_eq!(rows[0].get("FINDINGS"), Some(&Cell::Integer(1)));
    assert_eq!(rows[0].get("C170_VL_ITEM_SUM"), Some(&Cell::Decimal(Decimal::ZERO)));
}

#[test]
fn test_utility_invoice_row() {
    let rows = consolidate_lines(&[
        c010_line(TEST_CNPJ),
        c500_line("77", "3,30"),
        c501_line("1,65"),
        c501_line("1,65"),
    ]);

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.family, "C500");
    assert_eq!(row.get("C501_COUNT"), Some(&Cell::Integer(2)));
    assert_eq!(row.get("C501_VL_PIS_SUM"), Some(&dec("3.30")));
    assert_eq!(row.get("C505_COUNT"), Some(&Cell::Integer(0)));
    assert!(row.get("IND_OPER_DESC").is_none());
}

#[test]
fn test_overflowing_sum_leaves_cell_empty() {
    let huge = "79.228.162.514.264.337.593.543.950.335";
    let rows = consolidate_lines(&[
        c100_line("1", "150,00"),
        c170_line("1", huge, "5102"),
        c170_line("2", huge, "5102"),
    ]);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("C170_VL_ITEM_SUM"), Some(&Cell::Empty));
    assert_eq!(rows[0].get("C170_QTD_SUM"), Some(&dec("2.00")));
    assert_eq!(rows[0].get("C170_COUNT"), Some(&Cell::Integer(2)));
}
