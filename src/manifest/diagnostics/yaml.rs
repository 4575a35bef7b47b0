//! YAML parse diagnostics.
//!
//! Converts `serde_saphyr` errors into [`miette`] diagnostics with a source
//! span and, where a common mistake is recognised, a hint.

#![allow(clippy::allow_attributes, clippy::allow_attributes_without_reason)]

use super::{WirefileName, WirefileSource};
use crate::manifest::hints::YAML_HINTS;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde_saphyr::{Error as YamlError, Location};
use thiserror::Error;

/// Byte offset of a 1-based line and column, clamped to the line end.
///
/// `serde_saphyr` reports lines and columns only. Both `\n` and `\r\n` line
/// endings are accepted.
fn byte_index(src: &str, line: u64, column: u64) -> usize {
    let target_line = usize::try_from(line.saturating_sub(1)).unwrap_or(usize::MAX);
    let target_column = usize::try_from(column.saturating_sub(1)).unwrap_or(usize::MAX);
    let mut offset = 0usize;
    for (idx, segment) in src.split_inclusive('\n').enumerate() {
        if idx == target_line {
            let without_newline = segment.strip_suffix('\n').unwrap_or(segment);
            let cleaned = without_newline.strip_suffix('\r').unwrap_or(without_newline);
            let column_offset = cleaned
                .char_indices()
                .nth(target_column)
                .map_or(cleaned.len(), |(byte_idx, _)| byte_idx);
            return offset + column_offset;
        }
        offset += segment.len();
    }
    src.len()
}

fn to_span(src: &WirefileSource, loc: Location) -> SourceSpan {
    let at = byte_index(src.as_str(), loc.line(), loc.column());
    let bytes = src.as_str().as_bytes();
    let is_line_break = |b: u8| b == b'\n' || b == b'\r';
    let (start, end) = match bytes.get(at) {
        Some(&b) if !is_line_break(b) => (at, at + 1),
        _ => {
            let start = if at > 0 && bytes.get(at - 1).is_some_and(|p| !is_line_break(*p)) {
                at - 1
            } else {
                at
            };
            (start, at)
        }
    };
    SourceSpan::new(start.into(), end.saturating_sub(start))
}

#[allow(unused_assignments)]
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(stepwire::yaml::parse))]
struct YamlDiagnostic {
    #[source_code]
    src: NamedSource<String>,
    #[label("parse error here")]
    span: Option<SourceSpan>,
    #[help]
    help: Option<String>,
    #[source]
    source: YamlError,
    message: String,
}

fn has_tab_indent(src: &WirefileSource, location: Option<Location>) -> bool {
    let Some(loc) = location else {
        return false;
    };
    let line_idx = usize::try_from(loc.line().saturating_sub(1)).unwrap_or(usize::MAX);
    src.as_str()
        .lines()
        .nth(line_idx)
        .unwrap_or("")
        .chars()
        .take_while(|c| c.is_whitespace())
        .any(|c| c == '\t')
}

fn hint_for(err_str: &str, src: &WirefileSource, loc: Option<Location>) -> Option<String> {
    if has_tab_indent(src, loc) {
        return Some("Use spaces for indentation; tabs are invalid in YAML.".into());
    }
    let lower = err_str.to_lowercase();
    YAML_HINTS
        .iter()
        .find(|(needle, _)| lower.contains(*needle))
        .map(|(_, hint)| (*hint).into())
}

/// Map a `serde_saphyr` error into a [`miette`] diagnostic.
///
/// Schema violations (unknown keys, malformed type names) are reported by
/// the same parser and receive the same treatment as syntax errors.
#[must_use]
pub fn map_yaml_error(
    err: YamlError,
    src: &WirefileSource,
    name: &WirefileName,
) -> Box<dyn Diagnostic + Send + Sync + 'static> {
    let loc = err.location();
    let (line, col, span) = loc.map_or((1, 1, None), |l| {
        (l.line(), l.column(), Some(to_span(src, l)))
    });
    let err_str = err.to_string();
    let hint = hint_for(&err_str, src, loc);
    let message = format!("YAML error at line {line}, column {col}: {err_str}");

    Box::new(YamlDiagnostic {
        src: NamedSource::new(name.as_str(), src.as_str().to_owned()),
        span,
        help: hint,
        source: err,
        message,
    })
}
