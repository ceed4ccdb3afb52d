//! JavaScript error types and error handling.
//!
//! This module provides the error type raised by the parser, corresponding
//! to JavaScript's built-in `SyntaxError` (plus an internal kind for
//! conditions that indicate a bug in the parser itself).

use crate::SourcePosition;
use serde::Serialize;
use thiserror::Error;

/// The kind of JavaScript error.
///
/// These correspond to JavaScript's built-in error constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Syntax error in JavaScript code
    SyntaxError,
    /// Internal parser error that should not occur in normal operation
    InternalError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::SyntaxError => write!(f, "SyntaxError"),
            ErrorKind::InternalError => write!(f, "InternalError"),
        }
    }
}

/// A JavaScript error with message and source position.
///
/// Parsing either produces a complete program or exactly one of these,
/// pointing at the offending position.
///
/// # Examples
///
/// ```
/// use core_types::{JsError, ErrorKind};
///
/// let error = JsError {
///     kind: ErrorKind::SyntaxError,
///     message: "Unexpected token".to_string(),
///     source_position: None,
///     recoverable: false,
/// };
///
/// assert_eq!(error.message, "Unexpected token");
/// ```
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{kind}: {message}")]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Source position where the error occurred
    pub source_position: Option<SourcePosition>,
    /// Whether the error came through the recoverable channel: the input
    /// violates a static rule but is otherwise well-formed, so a tolerant
    /// embedder may choose to collect it and continue
    pub recoverable: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_variants() {
        let _syntax = ErrorKind::SyntaxError;
        let _internal = ErrorKind::InternalError;
    }

    #[test]
    fn test_js_error_creation() {
        let error = JsError {
            kind: ErrorKind::SyntaxError,
            message: "test".to_string(),
            source_position: None,
            recoverable: false,
        };
        assert!(matches!(error.kind, ErrorKind::SyntaxError));
    }

    #[test]
    fn test_js_error_display() {
        let error = JsError {
            kind: ErrorKind::SyntaxError,
            message: "Unexpected token".to_string(),
            source_position: None,
            recoverable: true,
        };
        assert_eq!(error.to_string(), "SyntaxError: Unexpected token");
    }
}
