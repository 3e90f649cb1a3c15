//! Text position utilities for byte offset and line:column conversions.
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count Unicode scalar values (chars), not bytes
//! - Line/column values of 0 are treated as 1
//!
//! These helpers are used to check the locations recorded while rendering
//! against the rendered text itself.

use crate::span::{Span, TextLocation, TextRange};

/// Convert a byte offset to a [`TextLocation`].
///
/// If `offset` exceeds the content length, returns the location at the end
/// of the content. Offsets inside a multi-byte char are rounded down.
pub fn location_of_offset(content: &str, offset: usize) -> TextLocation {
    let mut line = 1u32;
    let mut column = 1u32;
    let mut current = 0usize;

    for ch in content.chars() {
        if current + ch.len_utf8() > offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
        current += ch.len_utf8();
    }

    TextLocation::new(line, column, current)
}

/// Convert a 1-indexed line and column to a byte offset.
///
/// A column beyond the end of the line clamps to the line end; a line beyond
/// the end of the content returns the content length.
pub fn offset_of_position(content: &str, line: u32, column: u32) -> usize {
    let line = line.max(1);
    let column = column.max(1);

    let mut current_line = 1u32;
    let mut line_start = Some(0usize);

    for (i, ch) in content.char_indices() {
        if current_line == line {
            break;
        }
        if ch == '\n' {
            current_line += 1;
            line_start = Some(i + 1);
        }
    }

    let start = match line_start {
        Some(start) if current_line == line => start,
        _ => return content.len(),
    };

    let mut current_col = 1u32;
    for (j, c) in content[start..].char_indices() {
        if current_col == column || c == '\n' {
            return start + j;
        }
        current_col += 1;
    }
    content.len()
}

/// Extract the text covered by a span.
///
/// Returns `None` if the span extends beyond content bounds or splits a char.
pub fn extract_span<'a>(content: &'a str, span: &Span) -> Option<&'a str> {
    content.get(span.start..span.end)
}

/// Extract the text covered by a range.
pub fn extract_range<'a>(content: &'a str, range: &TextRange) -> Option<&'a str> {
    extract_span(content, &range.span())
}

/// Count the number of lines in the content.
///
/// An empty string has one (empty) line; a trailing newline starts a new line.
pub fn line_count(content: &str) -> u32 {
    1 + content.bytes().filter(|&b| b == b'\n').count() as u32
}
