//! # Issue rendering
//!
//! Formats an [`Issue`] against the original source text as an ariadne
//! report. The analyzers only see the tree, so the line number is mapped
//! back onto the source here, on the presentation side.

use ariadne::{Config, IndexType, Label, Report, Source};

use crate::Issue;

/// Build a formatted report for one issue.
pub fn build_issue_message(source: &str, issue: &Issue, with_color: bool) -> String {
    let span = line_byte_range(source, issue.line);
    let code: u32 = issue.code.into();

    let mut write_buffer = Vec::new();
    Report::build(issue.severity.into(), ((), span.clone()))
        .with_config(
            Config::new()
                .with_index_type(IndexType::Byte)
                .with_color(with_color),
        )
        .with_code(code)
        .with_message(&issue.message)
        .with_label(Label::new(((), span)).with_message(&issue.message))
        .with_help(issue.help())
        .finish()
        .write(Source::from(source), &mut write_buffer)
        .unwrap();
    String::from_utf8_lossy(&write_buffer).to_string()
}

/// Byte range of a 1-based line within `source`, clamped to the text.
fn line_byte_range(source: &str, line: u32) -> std::ops::Range<usize> {
    let mut start = 0usize;
    let mut current = 1u32;
    for (offset, byte) in source.bytes().enumerate() {
        if current == line {
            start = offset;
            break;
        }
        if byte == b'\n' {
            current += 1;
            start = offset + 1;
        }
    }
    if current < line {
        return source.len()..source.len();
    }
    let end = source[start..]
        .find('\n')
        .map_or(source.len(), |rel| start + rel);
    start..end
}
