//! Test utilities for pipeline testing

use std::path::{Path, PathBuf};

use crate::app::services::pipeline::{FileOutcome, FileProcessor};
use crate::app::services::policy::ValidationPolicy;
use crate::app::services::sped_parser::tests::*;


/// A small file: one goods invoice with two items and a summary line
pub fn sample_file_lines(vl_merc: &str) -> Vec<String> {
    vec![
        sped_line("0000", &["017", "0", "01012024", "31012024", "EMPRESA TESTE"]),
        c010_line(TEST_CNPJ),
        c100_line("123", vl_merc),
        c170_line("1", "100,00", "5102"),
        c170_line("2", "50,00", "5102"),
        c190_line("5102", "150,00"),
        terminator_line(7),
    ]
}

pub fn process_lenient(lines: &[String]) -> FileOutcome {
    FileProcessor::new(ValidationPolicy::lenient()).process_lines("test", lines)
}

pub fn process_strict(lines: &[String]) -> FileOutcome {
    FileProcessor::new(ValidationPolicy::strict()).process_lines("test", lines)
}

/// Write lines to a named file in a directory
pub fn write_sped_file(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}
