//! Parser error types and helpers

use core_types::{ErrorKind, JsError, SourcePosition};

/// Create a fatal syntax error at a given position
pub fn syntax_error(message: impl Into<String>, position: Option<SourcePosition>) -> JsError {
    JsError {
        kind: ErrorKind::SyntaxError,
        message: message.into(),
        source_position: position,
        recoverable: false,
    }
}

/// Create a recoverable syntax error at a given position.
///
/// The recoverable channel carries violations of static rules in programs
/// that are otherwise well-formed: duplicate `__proto__`, duplicate exports,
/// mixed `??` with `||`/`&&`, accessor arity, strict-mode deletes, and the
/// like. This parser stops either way; the flag lets embedders tell the two
/// apart.
pub fn recoverable_error(message: impl Into<String>, position: Option<SourcePosition>) -> JsError {
    JsError {
        kind: ErrorKind::SyntaxError,
        message: message.into(),
        source_position: position,
        recoverable: true,
    }
}

/// Create an unexpected token error
pub fn unexpected_token(got: &str, position: Option<SourcePosition>) -> JsError {
    syntax_error(format!("Unexpected token {}", got), position)
}

/// Delayed errors for constructs whose role (expression vs. pattern) is not
/// yet known.
///
/// While parsing something like `({a = 1} ...`, the parser cannot tell
/// whether it has an object literal (where the shorthand default is an
/// error) or a destructuring pattern (where it is fine). Each field records
/// the earliest offending offset; when the construct's role is determined,
/// the pending offsets for the losing role are promoted to real errors.
#[derive(Debug, Clone, Default)]
pub struct DestructuringErrors {
    /// Offset of a `{a = 1}` shorthand default, illegal in expressions
    pub shorthand_assign: Option<usize>,
    /// Offset of a comma after a rest element, illegal in patterns
    pub trailing_comma: Option<usize>,
    /// Offset of a parenthesized construct later used as assignment target
    pub parenthesized_assign: Option<usize>,
    /// Offset of a parenthesized construct later used as binding pattern
    pub parenthesized_bind: Option<usize>,
    /// Offset of a second `__proto__` property, illegal in expressions
    pub double_proto: Option<usize>,
}

impl DestructuringErrors {
    /// A record with no pending errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every pending error
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when an expression-role error is pending
    pub fn has_expression_errors(&self) -> bool {
        self.shorthand_assign.is_some() || self.double_proto.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error() {
        let err = syntax_error("test", None);
        assert!(matches!(err.kind, ErrorKind::SyntaxError));
        assert!(!err.recoverable);
    }

    #[test]
    fn test_recoverable_error() {
        let err = recoverable_error("Duplicate export 'x'", None);
        assert!(matches!(err.kind, ErrorKind::SyntaxError));
        assert!(err.recoverable);
    }

    #[test]
    fn test_unexpected_token() {
        let err = unexpected_token("}", None);
        assert!(err.message.contains("Unexpected token"));
    }

    #[test]
    fn test_destructuring_errors_lifecycle() {
        let mut refs = DestructuringErrors::new();
        assert!(!refs.has_expression_errors());
        refs.shorthand_assign = Some(3);
        assert!(refs.has_expression_errors());
        refs.reset();
        assert!(!refs.has_expression_errors());
    }
}
