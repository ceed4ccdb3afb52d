//! Unit tests for JsError and ErrorKind

use core_types::{ErrorKind, JsError, SourcePosition};

#[cfg(test)]
mod error_kind_tests {
    use super::*;

    #[test]
    fn test_error_kind_syntax_error() {
        let kind = ErrorKind::SyntaxError;
        assert!(matches!(kind, ErrorKind::SyntaxError));
    }

    #[test]
    fn test_error_kind_internal_error() {
        let kind = ErrorKind::InternalError;
        assert!(matches!(kind, ErrorKind::InternalError));
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::SyntaxError.to_string(), "SyntaxError");
        assert_eq!(ErrorKind::InternalError.to_string(), "InternalError");
    }
}

#[cfg(test)]
mod js_error_tests {
    use super::*;

    #[test]
    fn test_js_error_with_position() {
        let error = JsError {
            kind: ErrorKind::SyntaxError,
            message: "Unexpected token".to_string(),
            source_position: Some(SourcePosition {
                line: 2,
                column: 4,
                offset: 15,
            }),
            recoverable: false,
        };

        assert_eq!(error.message, "Unexpected token");
        let pos = error.source_position.expect("position should be set");
        assert_eq!(pos.line, 2);
        assert_eq!(pos.offset, 15);
    }

    #[test]
    fn test_js_error_without_position() {
        let error = JsError {
            kind: ErrorKind::SyntaxError,
            message: "Unexpected end of input".to_string(),
            source_position: None,
            recoverable: false,
        };

        assert!(error.source_position.is_none());
    }

    #[test]
    fn test_js_error_recoverable_flag() {
        let error = JsError {
            kind: ErrorKind::SyntaxError,
            message: "Duplicate export 'x'".to_string(),
            source_position: None,
            recoverable: true,
        };

        assert!(error.recoverable);
    }

    #[test]
    fn test_js_error_implements_std_error() {
        fn assert_error<E: std::error::Error>(_e: &E) {}

        let error = JsError {
            kind: ErrorKind::SyntaxError,
            message: "test".to_string(),
            source_position: None,
            recoverable: false,
        };
        assert_error(&error);
    }
}
