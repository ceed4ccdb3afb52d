//! Source position and span types.
//!
//! This module provides the types used to attach source locations to tokens,
//! AST nodes, and errors.

use serde::Serialize;

/// Represents a position in source code.
///
/// Used for error reporting and for the optional `loc` information on AST
/// nodes.
///
/// # Examples
///
/// ```
/// use core_types::SourcePosition;
///
/// let pos = SourcePosition {
///     line: 10,
///     column: 5,
///     offset: 150,
/// };
///
/// assert_eq!(pos.line, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcePosition {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (0-indexed)
    pub column: u32,
    /// Character offset from the start of the source
    pub offset: usize,
}

/// A half-open source range measured in character offsets.
///
/// Every AST node carries one. `start <= end` always holds for committed
/// nodes, and a node's children lie within its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Extract the text this span covers.
    ///
    /// Offsets are character indices, not byte indices, so this walks the
    /// source rather than slicing it.
    pub fn text_in(&self, source: &str) -> String {
        source
            .chars()
            .skip(self.start)
            .take(self.end.saturating_sub(self.start))
            .collect()
    }

    /// Returns true if `other` lies entirely within this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A start/end pair of full [`SourcePosition`]s.
///
/// Attached to AST nodes when the `locations` option is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    /// Position of the first character
    pub start: SourcePosition,
    /// Position one past the last character
    pub end: SourcePosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_position_creation() {
        let pos = SourcePosition {
            line: 10,
            column: 5,
            offset: 150,
        };
        assert_eq!(pos.line, 10);
        assert_eq!(pos.column, 5);
        assert_eq!(pos.offset, 150);
    }

    #[test]
    fn test_span_text_in() {
        let span = Span::new(4, 5);
        assert_eq!(span.text_in("let x = 1;"), "x");
    }

    #[test]
    fn test_span_text_in_multibyte() {
        // Offsets are character indices, so multibyte characters count as one.
        let span = Span::new(2, 3);
        assert_eq!(span.text_in("é é é"), "é");
    }

    #[test]
    fn test_span_containment() {
        let outer = Span::new(0, 10);
        let inner = Span::new(3, 7);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }
}
