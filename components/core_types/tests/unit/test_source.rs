//! Unit tests for SourcePosition, Span, and SourceSpan

use core_types::{SourcePosition, SourceSpan, Span};

#[cfg(test)]
mod source_position_tests {
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
    fn test_source_position_zero_values() {
        let pos = SourcePosition {
            line: 1,
            column: 0,
            offset: 0,
        };

        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 0);
        assert_eq!(pos.offset, 0);
    }

    #[test]
    fn test_source_position_clone() {
        let pos = SourcePosition {
            line: 3,
            column: 7,
            offset: 42,
        };
        let copy = pos.clone();
        assert_eq!(pos, copy);
    }
}

#[cfg(test)]
mod span_tests {
    use super::*;

    #[test]
    fn test_span_new() {
        let span = Span::new(3, 8);
        assert_eq!(span.start, 3);
        assert_eq!(span.end, 8);
    }

    #[test]
    fn test_span_text_in_ascii() {
        let source = "const answer = 42;";
        let span = Span::new(6, 12);
        assert_eq!(span.text_in(source), "answer");
    }

    #[test]
    fn test_span_text_in_empty() {
        let span = Span::new(5, 5);
        assert_eq!(span.text_in("whatever"), "");
    }

    #[test]
    fn test_span_contains() {
        let outer = Span::new(10, 20);
        assert!(outer.contains(&Span::new(10, 20)));
        assert!(outer.contains(&Span::new(12, 18)));
        assert!(!outer.contains(&Span::new(9, 15)));
        assert!(!outer.contains(&Span::new(15, 21)));
    }
}

#[cfg(test)]
mod source_span_tests {
    use super::*;

    #[test]
    fn test_source_span_creation() {
        let span = SourceSpan {
            start: SourcePosition {
                line: 1,
                column: 0,
                offset: 0,
            },
            end: SourcePosition {
                line: 1,
                column: 10,
                offset: 10,
            },
        };

        assert_eq!(span.start.line, 1);
        assert_eq!(span.end.column, 10);
    }
}
