//! Tests for the per-family hierarchy state machine

use super::*;
use crate::app::models::FindingKind;
use crate::app::services::sped_parser::tests::*;

#[test]
fn test_children_join_open_parent() {
    let hierarchy = build_from_lines(&[
        c010_line(TEST_CNPJ),
        c100_line("1", "150,00"),
        c170_line("1", "100,00", "5102"),
        c170_line("2", "50,00", "5102"),
        c190_line("5102", "150,00"),
    ]);

    assert_eq!(hierarchy.groups.len(), 1);
    let group = &hierarchy.groups[0];
    assert_eq!(group.family, "C");
    assert_eq!(group.parent.line_number, 2);
    assert_eq!(group.children.len(), 3);
    assert_eq!(group.children_of("C170").count(), 2);
    assert!(hierarchy.orphans.is_empty());
}

#[test]
fn test_header_is_attached_to_group() {
    let hierarchy = build_from_lines(&[
        c010_line(TEST_CNPJ),
        c100_line("1", "10,00"),
        c010_line("11444777000161"),
        c100_line("2", "20,00"),
    ]);

    assert_eq!(hierarchy.groups.len(), 2);
    let first = hierarchy.groups[0].header.as_ref().unwrap();
    let second = hierarchy.groups[1].header.as_ref().unwrap();
    assert_eq!(first.text("CNPJ"), Some(TEST_CNPJ));
    assert_eq!(second.text("CNPJ"), Some("11444777000161"));
    assert_eq!(hierarchy.standalone.len(), 2);
}

#[test]
fn test_group_without_header() {
    let hierarchy = build_from_lines(&[c100_line("1", "10,00")]);
    assert!(hierarchy.groups[0].header.is_none());
}

#[test]
fn test_child_before_parent_is_orphan() {
    let hierarchy = build_from_lines(&[
        c170_line("1", "100,00", "5102"),
        c100_line("1", "100,00"),
        c170_line("1", "100,00", "5102"),
    ]);

    assert_eq!(hierarchy.orphans.len(), 1);
    let orphan = &hierarchy.orphans[0];
    assert_eq!(orphan.line_number, 1);
    assert!(orphan.has_finding(FindingKind::OrphanChildRecord));

    assert_eq!(hierarchy.groups.len(), 1);
    assert_eq!(hierarchy.groups[0].children.len(), 1);
}

#[test]
fn test_unrelated_record_closes_group() {
    let hierarchy = build_from_lines(&[
        c100_line("1", "100,00"),
        c170_line("1", "100,00", "5102"),
        c500_line("9", "1,65"),
        c501_line("1,65"),
        c170_line("2", "10,00", "5102"),
    ]);

    assert_eq!(hierarchy.groups.len(), 2);
    assert_eq!(hierarchy.groups[0].family, "C");
    assert_eq!(hierarchy.groups[0].children.len(), 1);
    assert_eq!(hierarchy.groups[1].family, "C500");
    assert_eq!(hierarchy.groups[1].children.len(), 1);

    assert_eq!(hierarchy.orphans.len(), 1);
    assert_eq!(hierarchy.orphans[0].line_number, 5);
}

#[test]
fn test_standalone_record_closes_group() {
    let hierarchy = build_from_lines(&[
        c100_line("1", "100,00"),
        sped_line("A001", &["0"]),
        c170_line("1", "100,00", "5102"),
    ]);

    assert_eq!(hierarchy.groups[0].children.len(), 0);
    assert_eq!(hierarchy.orphans.len(), 1);
}

#[test]
fn test_unknown_record_does_not_close_group() {
    let hierarchy = build_from_lines(&[
        c100_line("1", "100,00"),
        "|Z999|x|".to_string(),
        c170_line("1", "100,00", "5102"),
    ]);

    assert_eq!(hierarchy.groups.len(), 1);
    assert_eq!(hierarchy.groups[0].children.len(), 1);
    assert!(hierarchy.orphans.is_empty());
    assert_eq!(hierarchy.standalone.len(), 1);
}

#[test]
fn test_groups_are_ordered_by_parent_line() {
    let hierarchy = build_from_lines(&[
        c100_line("1", "10,00"),
        c100_line("2", "20,00"),
        c500_line("3", "1,65"),
        c501_line("1,65"),
        c100_line("4", "40,00"),
    ]);

    let lines: Vec<usize> = hierarchy
        .groups
        .iter()
        .map(|g| g.parent.line_number)
        .collect();
    assert_eq!(lines, vec![1, 2, 3, 5]);
    assert_eq!(hierarchy.record_count(), 5);
}

#[test]
fn test_end_of_input_closes_open_group() {
    let hierarchy = build_from_lines(&[
        c500_line("1", "1,65"),
        c501_line("1,65"),
    ]);

    assert_eq!(hierarchy.groups.len(), 1);
    assert_eq!(hierarchy.groups[0].family, "C500");
}
