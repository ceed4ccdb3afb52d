//! Error-position integration tests: the parser stops at the first error
//! and points at the offending offset.

use parser::{Options, Parser};

fn error_offset(source: &str) -> usize {
    let mut parser = Parser::new(source);
    let err = parser.parse().expect_err("expected parse error");
    err.source_position.expect("position attached").offset
}

/// Test: unexpected-token errors point at the token
#[test]
fn test_unexpected_token_offset() {
    assert_eq!(error_offset("let x = ;"), 8);
    assert_eq!(error_offset("a = * 2;"), 4);
}

/// Test: delayed destructuring errors point at the recorded offset
#[test]
fn test_delayed_error_offsets() {
    // The shorthand default's `=` is at offset 3
    let offset = error_offset("({a=1});");
    assert_eq!(offset, 3);
}

/// Test: undefined-export errors point at the specifier
#[test]
fn test_undefined_export_offset() {
    let source = "export { missing };";
    let mut parser = Parser::new_with_options(source, Options::module());
    let err = parser.parse().expect_err("undefined export");
    let pos = err.source_position.expect("position attached");
    assert_eq!(pos.offset, source.find("missing").unwrap());
}

/// Test: lexer errors surface through the parser with positions
#[test]
fn test_lexer_error_through_parser() {
    let source = "let s = 'unterminated";
    let mut parser = Parser::new(source);
    let err = parser.parse().expect_err("unterminated string");
    assert!(err.source_position.is_some());
    assert!(err.message.contains("Unterminated"));
}
