//! End-to-End Parsing Tests
//!
//! Parse complete, realistic programs through the public API and verify the
//! resulting trees and error behavior across component boundaries.

use parser::ast::*;
use parser::{Options, Parser};

/// Test: a small realistic script parses end to end
#[test]
fn test_realistic_script() {
    let source = r#"
'use strict';

class Counter {
  #count = 0;

  static fromStart(start) {
    const counter = new Counter();
    counter.#count = start;
    return counter;
  }

  increment(by = 1) {
    this.#count += by;
    return this.#count;
  }
}

function* take(iter, n) {
  let i = 0;
  for (const item of iter) {
    if (i++ >= n) break;
    yield item;
  }
}

const counter = Counter.fromStart(10);
const values = [...take([1, 2, 3, 4], 2)].map((x) => x * counter.increment());
"#;
    let mut parser = Parser::new(source);
    let program = parser.parse().expect("Failed to parse realistic script");
    assert_eq!(program.body.len(), 5);
    assert!(matches!(program.body[1].kind, StatementKind::ClassDeclaration(_)));
    assert!(matches!(program.body[2].kind, StatementKind::FunctionDeclaration(_)));
}

/// Test: a small realistic module parses end to end
#[test]
fn test_realistic_module() {
    let source = r#"
import { fetchJson } from './net.js';
import * as log from './log.js';

export const CACHE = new Map();

export async function load(url) {
  if (CACHE.has(url)) {
    log.debug(`cache hit for ${url}`);
    return CACHE.get(url);
  }
  const data = await fetchJson(url);
  CACHE.set(url, data);
  return data;
}

export default load;
"#;
    let mut parser = Parser::new_with_options(source, Options::module());
    let program = parser.parse().expect("Failed to parse realistic module");
    assert_eq!(program.source_type, SourceType::Module);
    assert_eq!(program.body.len(), 5);
}

/// Test: deeply nested expressions parse without issue
#[test]
fn test_nested_expressions() {
    let source = "x = ((((a + b) * (c - d)) / ((e ?? f) || 1)) ** 2);";
    let mut parser = Parser::new(source);
    assert!(parser.parse().is_ok());
}

/// Test: parse errors carry positions usable for diagnostics
#[test]
fn test_error_reporting_pipeline() {
    let source = "let ok = 1;\nlet broken = ;\n";
    let mut parser = Parser::new(source);
    let err = parser.parse().expect_err("second statement is broken");
    let pos = err.source_position.clone().expect("error carries a position");
    assert_eq!(pos.line, 2);
    assert_eq!(err.to_string(), format!("SyntaxError: {}", err.message));
}

/// Test: the AST serializes to JSON through serde
#[test]
fn test_ast_json_pipeline() {
    let mut parser = Parser::new("let x = [1, 'two', null];");
    let program = parser.parse().expect("Failed to parse");
    let json = serde_json::to_string(&program).expect("Failed to serialize");
    assert!(json.contains("VariableDeclaration"));
    assert!(json.contains("\"two\""));
}

/// Test: spans from the parsed tree slice the original source
#[test]
fn test_span_slicing_pipeline() {
    let source = "function greet(name) { return `hi ${name}`; }";
    let mut parser = Parser::new(source);
    let program = parser.parse().expect("Failed to parse");
    let StatementKind::FunctionDeclaration(function) = &program.body[0].kind else {
        panic!("expected function");
    };
    assert_eq!(function.span.text_in(source), source);
    assert_eq!(
        function.id.as_ref().map(|id| id.span.text_in(source)),
        Some("greet".to_string())
    );
}

/// Test: one parser instance parses one program; fresh instances are
/// independent
#[test]
fn test_parser_instances_independent() {
    let mut strict_parser = Parser::new("'use strict'; let x = 1;");
    strict_parser.parse().expect("strict script parses");

    // A new parser starts sloppy again
    let mut sloppy_parser = Parser::new("with (o) { x; }");
    sloppy_parser.parse().expect("sloppy script parses");
}
