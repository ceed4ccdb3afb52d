//! Source-position tests: spans reproduce the source text, children stay
//! inside their parents, and `loc` carries line/column data.

use parser::ast::*;
use parser::{Options, Parser};

fn parse(source: &str) -> Program {
    let mut parser = Parser::new(source);
    parser.parse().unwrap_or_else(|err| panic!("parse failed for {:?}: {}", source, err))
}

fn first_expression(program: &Program) -> &Expression {
    match &program.body[0].kind {
        StatementKind::Expression { expression, .. } => expression,
        other => panic!("expected expression statement, got {:?}", other),
    }
}

/// Test: statement spans reproduce their source text
#[test]
fn test_statement_span_round_trip() {
    let source = "let answer = 42;  if (a) { b(); }";
    let program = parse(source);
    assert_eq!(program.body[0].span.text_in(source), "let answer = 42;");
    assert_eq!(program.body[1].span.text_in(source), "if (a) { b(); }");
}

/// Test: expression spans reproduce their source text
#[test]
fn test_expression_span_round_trip() {
    let source = "total = base + extra * 2;";
    let program = parse(source);
    let ExpressionKind::Assignment { right, .. } = &first_expression(&program).kind else {
        panic!("expected assignment");
    };
    assert_eq!(right.span.text_in(source), "base + extra * 2");
    let ExpressionKind::Binary { right: product, .. } = &right.kind else {
        panic!("expected binary");
    };
    assert_eq!(product.span.text_in(source), "extra * 2");
}

/// Test: children lie within their parents
#[test]
fn test_span_containment() {
    let source = "function add(a, b) { return a + b; }";
    let program = parse(source);
    let StatementKind::FunctionDeclaration(function) = &program.body[0].kind else {
        panic!("expected function");
    };
    assert!(program.span.contains(&function.span));
    let id = function.id.as_ref().expect("named function");
    assert!(function.span.contains(&id.span));
    for param in &function.params {
        assert!(function.span.contains(&param.span));
    }
    assert!(function.span.contains(&function.body.span));
    assert_eq!(id.span.text_in(source), "add");
    assert_eq!(function.body.span.text_in(source), "{ return a + b; }");
}

/// Test: declarator spans exclude the following comma or semicolon
#[test]
fn test_declarator_spans() {
    let source = "let a = 1, b = 2;";
    let program = parse(source);
    let StatementKind::VariableDeclaration(decl) = &program.body[0].kind else {
        panic!("expected declaration");
    };
    assert_eq!(decl.declarations[0].span.text_in(source), "a = 1");
    assert_eq!(decl.declarations[1].span.text_in(source), "b = 2");
}

/// Test: ASI leaves the statement span at the expression end
#[test]
fn test_asi_span() {
    let source = "a = 1\nb = 2";
    let program = parse(source);
    assert_eq!(program.body[0].span.text_in(source), "a = 1");
    assert_eq!(program.body[1].span.text_in(source), "b = 2");
}

/// Test: template element spans exclude the delimiters
#[test]
fn test_template_element_spans() {
    let source = "`head${x}tail`;";
    let program = parse(source);
    let ExpressionKind::TemplateLiteral { quasis, .. } = &first_expression(&program).kind else {
        panic!("expected template");
    };
    assert_eq!(quasis[0].span.text_in(source), "head");
    assert_eq!(quasis[1].span.text_in(source), "tail");
}

/// Test: offsets count characters, not bytes
#[test]
fn test_multibyte_offsets() {
    let source = "é = 1; ß = 2;";
    let program = parse(source);
    assert_eq!(program.body[0].span.text_in(source), "é = 1;");
    assert_eq!(program.body[1].span.text_in(source), "ß = 2;");
}

/// Test: loc tracks lines and columns when enabled
#[test]
fn test_loc_lines_and_columns() {
    let source = "let a = 1;\n  let b = 2;";
    let options = Options {
        locations: true,
        ..Options::default()
    };
    let mut parser = Parser::new_with_options(source, options);
    let program = parser.parse().expect("parse failed");

    let first = program.body[0].loc.as_ref().expect("loc attached");
    assert_eq!(first.start.line, 1);
    assert_eq!(first.start.column, 0);
    assert_eq!(first.end.line, 1);

    let second = program.body[1].loc.as_ref().expect("loc attached");
    assert_eq!(second.start.line, 2);
    assert_eq!(second.start.column, 2);
}

/// Test: error positions point at the offending token
#[test]
fn test_error_positions() {
    let source = "let x = ;";
    let mut parser = Parser::new(source);
    let err = parser.parse().expect_err("missing initializer expression");
    let pos = err.source_position.expect("position attached");
    assert_eq!(pos.offset, 8);
    assert_eq!(pos.line, 1);

    let source = "a = 1;\nnew a?.b();";
    let mut parser = Parser::new(source);
    let err = parser.parse().expect_err("optional chain in new");
    let pos = err.source_position.expect("position attached");
    assert_eq!(pos.line, 2);
}

/// Test: preserve_parens wraps grouped expressions
#[test]
fn test_preserve_parens() {
    let source = "(a + b) * c;";
    let options = Options {
        preserve_parens: true,
        ..Options::default()
    };
    let mut parser = Parser::new_with_options(source, options);
    let program = parser.parse().expect("parse failed");
    let StatementKind::Expression { expression, .. } = &program.body[0].kind else {
        panic!("expected expression");
    };
    let ExpressionKind::Binary { left, .. } = &expression.kind else {
        panic!("expected binary");
    };
    assert!(matches!(&left.kind, ExpressionKind::Paren { .. }));
    assert_eq!(left.span.text_in(source), "(a + b)");

    // Without the option the parens vanish from the tree
    let mut parser = Parser::new(source);
    let program = parser.parse().expect("parse failed");
    let StatementKind::Expression { expression, .. } = &program.body[0].kind else {
        panic!("expected expression");
    };
    let ExpressionKind::Binary { left, .. } = &expression.kind else {
        panic!("expected binary");
    };
    assert!(matches!(&left.kind, ExpressionKind::Binary { .. }));
}
