//! Splitting of raw SPED lines

use crate::app::models::RawLine;

/// Split one delimited line into its type code and values
///
/// Returns `None` for lines the parser skips: blank lines, lines that do not
/// start with the delimiter and lines with an empty type code. The leading
/// delimiter and one trailing delimiter are stripped before splitting.
pub fn split_line(line: &str, line_number: usize, delimiter: char) -> Option<RawLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || !line.starts_with(delimiter) {
        return None;
    }

    let body = line.trim_end();
    let body = &body[delimiter.len_utf8()..];
    let body = body.strip_suffix(delimiter).unwrap_or(body);

    let mut parts = body.split(delimiter);
    let type_code = parts.next()?.trim();
    if type_code.is_empty() {
        return None;
    }

    Some(RawLine {
        type_code: type_code.to_string(),
        values: parts.map(|value| value.trim().to_string()).collect(),
        line_number,
    })
}
