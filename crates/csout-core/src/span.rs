//! Byte spans and line/column locations.
//!
//! Two coordinate systems are used throughout csout:
//!
//! - [`Span`]: half-open byte range into generated text
//! - [`TextLocation`]: 1-indexed line and column, plus the 0-indexed byte offset
//!   of the same position
//!
//! [`TextRange`] pairs two locations and converts to a [`Span`].

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Span
// ============================================================================

/// Byte offsets into generated text.
///
/// Spans are half-open intervals: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Create a new span.
    ///
    /// # Panics
    /// Panics if `start > end`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "Span start ({}) must be <= end ({})",
            start,
            end
        );
        Span { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check if this span overlaps with another.
    ///
    /// Adjacent spans (one ends where another starts) do NOT overlap.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check if this span contains another span entirely.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

// ============================================================================
// TextLocation
// ============================================================================

/// A position in generated text.
///
/// `line` and `column` are 1-indexed; `column` counts chars, not bytes.
/// `offset` is the 0-indexed byte offset of the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextLocation {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
}

impl TextLocation {
    /// The location of the first character of a document.
    pub const START: TextLocation = TextLocation {
        line: 1,
        column: 1,
        offset: 0,
    };

    pub fn new(line: u32, column: u32, offset: usize) -> Self {
        TextLocation {
            line,
            column,
            offset,
        }
    }
}

impl Default for TextLocation {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ============================================================================
// TextRange
// ============================================================================

/// A start/end pair of [`TextLocation`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextRange {
    pub start: TextLocation,
    pub end: TextLocation,
}

impl TextRange {
    /// Create a new range.
    ///
    /// # Panics
    /// Panics if `start` lies after `end`.
    pub fn new(start: TextLocation, end: TextLocation) -> Self {
        assert!(
            start.offset <= end.offset,
            "TextRange start ({}) must not follow end ({})",
            start,
            end
        );
        TextRange { start, end }
    }

    /// An empty range at a single location.
    pub fn empty(at: TextLocation) -> Self {
        TextRange { start: at, end: at }
    }

    /// The byte span covered by this range.
    pub fn span(&self) -> Span {
        Span::new(self.start.offset, self.end.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_overlap_and_contains() {
        let a = Span::new(0, 5);
        let b = Span::new(5, 8);
        let c = Span::new(2, 4);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(a.contains(&c));
        assert!(!c.contains(&a));
        assert_eq!(a.len(), 5);
    }

    #[test]
    #[should_panic]
    fn test_span_rejects_reversed_bounds() {
        let _ = Span::new(4, 2);
    }

    #[test]
    fn test_text_range_span() {
        let start = TextLocation::new(1, 3, 2);
        let end = TextLocation::new(2, 1, 9);
        let range = TextRange::new(start, end);
        assert_eq!(range.span(), Span::new(2, 9));
        assert_eq!(range.to_string(), "1:3-2:1");
        assert!(TextRange::empty(start).is_empty());
    }

    #[test]
    fn test_location_serde() {
        let loc = TextLocation::new(3, 7, 40);
        let json = serde_json::to_string(&loc).unwrap();
        let back: TextLocation = serde_json::from_str(&json).unwrap();
        assert_eq!(loc, back);
    }
}
