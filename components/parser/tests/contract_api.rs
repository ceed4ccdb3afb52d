//! Contract tests for parser API
//!
//! These tests verify the parser component implements its contract correctly.

use core_types::JsError;
use parser::{EcmaVersion, Lexer, Options, Parser, Program, SourceType, Token};

// =============================================================================
// Lexer Contract Tests
// =============================================================================

#[test]
fn test_lexer_new_creates_lexer() {
    let source = "let x = 42;";
    let _lexer = Lexer::new(source);
    // Should compile and create lexer
}

#[test]
fn test_lexer_next_token_returns_result() {
    let source = "let x = 42;";
    let mut lexer = Lexer::new(source);
    let result: Result<Token, JsError> = lexer.next_token();
    assert!(result.is_ok());
}

#[test]
fn test_lexer_peek_token_returns_ref() {
    let source = "let x = 42;";
    let mut lexer = Lexer::new(source);
    let result: Result<&Token, JsError> = lexer.peek_token();
    assert!(result.is_ok());
}

#[test]
fn test_token_identifier_variant() {
    let source = "myVar";
    let mut lexer = Lexer::new(source);
    let token = lexer.next_token().unwrap();
    assert!(matches!(token, Token::Identifier(name, false) if name == "myVar"));
}

#[test]
fn test_token_number_variant() {
    let source = "42.5";
    let mut lexer = Lexer::new(source);
    let token = lexer.next_token().unwrap();
    assert!(matches!(token, Token::Number(n) if n == 42.5));
}

#[test]
fn test_token_eof_variant() {
    let source = "";
    let mut lexer = Lexer::new(source);
    let token = lexer.next_token().unwrap();
    assert!(matches!(token, Token::EOF));
}

// =============================================================================
// Parser Contract Tests
// =============================================================================

#[test]
fn test_parser_new_creates_parser() {
    let source = "let x = 42;";
    let _parser = Parser::new(source);
    // Should compile and create parser
}

#[test]
fn test_parser_parse_returns_program_result() {
    let source = "let x = 42;";
    let mut parser = Parser::new(source);
    let result: Result<Program, JsError> = parser.parse();
    assert!(result.is_ok());
}

#[test]
fn test_program_has_source_type() {
    let mut parser = Parser::new("1;");
    let program = parser.parse().expect("Failed to parse");
    assert_eq!(program.source_type, SourceType::Script);

    let mut parser = Parser::new_with_options("export const x = 1;", Options::module());
    let program = parser.parse().expect("Failed to parse module");
    assert_eq!(program.source_type, SourceType::Module);
}

#[test]
fn test_program_span_covers_input() {
    let source = "let x = 42;";
    let mut parser = Parser::new(source);
    let program = parser.parse().expect("Failed to parse");
    assert_eq!(program.span.start, 0);
    assert_eq!(program.span.end, source.chars().count());
}

// =============================================================================
// Options Contract Tests
// =============================================================================

#[test]
fn test_options_default_is_latest_script() {
    let options = Options::default();
    assert_eq!(options.ecma_version, EcmaVersion::Latest);
    assert_eq!(options.source_type, SourceType::Script);
}

#[test]
fn test_option_allow_return_outside_function() {
    let mut parser = Parser::new("return 1;");
    assert!(parser.parse().is_err(), "return at top level is an error");

    let options = Options {
        allow_return_outside_function: true,
        ..Options::default()
    };
    let mut parser = Parser::new_with_options("return 1;", options);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_option_allow_await_outside_function() {
    // In a sloppy script `await` is only an identifier, so `await x` is
    // two identifiers in a row
    let mut parser = Parser::new("await x;");
    assert!(parser.parse().is_err());

    let options = Options {
        allow_await_outside_function: true,
        ..Options::default()
    };
    let mut parser = Parser::new_with_options("await x;", options);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_option_locations_attaches_loc() {
    let options = Options {
        locations: true,
        ..Options::default()
    };
    let mut parser = Parser::new_with_options("let x = 1;\nlet y = 2;", options);
    let program = parser.parse().expect("Failed to parse");
    let second = &program.body[1];
    let loc = second.loc.as_ref().expect("loc should be attached");
    assert_eq!(loc.start.line, 2);
    assert_eq!(loc.start.column, 0);
}

#[test]
fn test_option_locations_off_by_default() {
    let mut parser = Parser::new("let x = 1;");
    let program = parser.parse().expect("Failed to parse");
    assert!(program.body[0].loc.is_none());
}

#[test]
fn test_option_on_inserted_semicolon() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let insertions: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&insertions);
    let options = Options {
        on_inserted_semicolon: Some(Box::new(move |offset, _pos| {
            sink.borrow_mut().push(offset);
        })),
        ..Options::default()
    };
    let mut parser = Parser::new_with_options("let x = 1\nlet y = 2", options);
    parser.parse().expect("Failed to parse");
    assert_eq!(insertions.borrow().len(), 2);
    assert_eq!(insertions.borrow()[0], 9);
}

#[test]
fn test_option_on_trailing_comma() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let commas: Rc<RefCell<Vec<usize>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&commas);
    let options = Options {
        on_trailing_comma: Some(Box::new(move |offset, _pos| {
            sink.borrow_mut().push(offset);
        })),
        ..Options::default()
    };
    // One trailing comma in an array literal, one in a call argument list
    let mut parser = Parser::new_with_options("x = [1, 2,]; f(a,);", options);
    parser.parse().expect("Failed to parse");
    assert_eq!(commas.borrow().as_slice(), &[9, 16]);
}

#[test]
fn test_option_on_comment() {
    use std::cell::RefCell;
    use std::rc::Rc;

    let comments: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&comments);
    let options = Options {
        on_comment: Some(Box::new(move |comment| {
            sink.borrow_mut().push(comment.text.clone());
        })),
        ..Options::default()
    };
    let mut parser = Parser::new_with_options("// hi\nlet x = 1; /* there */", options);
    parser.parse().expect("Failed to parse");
    assert_eq!(comments.borrow().as_slice(), &[" hi", " there "]);
}

#[test]
fn test_option_hash_bang() {
    let mut parser = Parser::new("#!/usr/bin/env node\nlet x = 1;");
    assert!(parser.parse().is_ok());

    let options = Options {
        allow_hash_bang: false,
        ..Options::default()
    };
    let mut parser = Parser::new_with_options("#!/usr/bin/env node\nlet x = 1;", options);
    assert!(parser.parse().is_err());
}

// =============================================================================
// Error Handling Contract Tests
// =============================================================================

#[test]
fn test_lexer_reports_invalid_token_error() {
    let source = "@@@";
    let mut lexer = Lexer::new(source);
    let result = lexer.next_token();
    assert!(result.is_err());
    if let Err(err) = result {
        assert!(err.source_position.is_some());
    }
}

#[test]
fn test_parser_reports_syntax_error() {
    let source = "let = ;"; // Invalid syntax
    let mut parser = Parser::new(source);
    let result = parser.parse();
    assert!(result.is_err());
    if let Err(err) = result {
        assert!(err.source_position.is_some());
    }
}

#[test]
fn test_recoverable_errors_are_flagged() {
    // Duplicate lexical binding goes through the recoverable channel
    let mut parser = Parser::new("let x; let x;");
    let err = parser.parse().expect_err("duplicate let should fail");
    assert!(err.recoverable);
}

// =============================================================================
// ES2022 Feature Tests
// =============================================================================

#[test]
fn test_parse_arrow_function() {
    let source = "const add = (a, b) => a + b;";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_template_literal() {
    let source = r#"const msg = `hello ${name}`;"#;
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_destructuring() {
    let source = "const { a, b } = obj;";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_spread_operator() {
    let source = "const arr = [...other, 1];";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_async_function() {
    let source = "async function load() { await data; }";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_class_with_private_fields() {
    let source = "class Foo { #count = 0; increment() { this.#count++; } }";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_static_block() {
    let source = "class Foo { static { init(); } }";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_optional_chaining() {
    let source = "const x = obj?.prop?.value;";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_nullish_coalescing() {
    let source = "const x = a ?? b;";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_logical_assignment() {
    let source = "a ||= b; c &&= d; e ??= f;";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_bigint_literal() {
    let source = "const big = 9007199254740993n;";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_generators_and_yield() {
    let source = "function* gen() { yield 1; yield* other(); }";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

#[test]
fn test_parse_for_await_of() {
    let source = "async function drain(stream) { for await (const chunk of stream) use(chunk); }";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}
