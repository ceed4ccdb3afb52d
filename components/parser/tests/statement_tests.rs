//! Statement-level parsing tests: dispatch, loops, labels, try/catch,
//! variable declarations, and ASI behavior.

use parser::ast::*;
use parser::Parser;

fn parse(source: &str) -> Program {
    let mut parser = Parser::new(source);
    parser.parse().unwrap_or_else(|err| panic!("parse failed for {:?}: {}", source, err))
}

fn parse_err(source: &str) -> core_types::JsError {
    let mut parser = Parser::new(source);
    match parser.parse() {
        Ok(_) => panic!("expected parse error for {:?}", source),
        Err(err) => err,
    }
}

/// Test: `let a = 1;` produces the expected declaration shape
#[test]
fn test_let_declaration_shape() {
    let program = parse("let a = 1;");
    assert_eq!(program.body.len(), 1);
    let StatementKind::VariableDeclaration(decl) = &program.body[0].kind else {
        panic!("expected variable declaration");
    };
    assert_eq!(decl.kind, VariableKind::Let);
    assert_eq!(decl.declarations.len(), 1);
    let declarator = &decl.declarations[0];
    assert!(matches!(&declarator.id.kind, PatternKind::Identifier { name } if name == "a"));
    let init = declarator.init.as_ref().expect("initializer");
    assert!(matches!(
        &init.kind,
        ExpressionKind::Literal { value: LiteralValue::Number(n), .. } if *n == 1.0
    ));
}

/// Test: `let` is an identifier when nothing binding-like follows
#[test]
fn test_let_as_identifier() {
    let program = parse("let = 1;");
    let StatementKind::Expression { expression, .. } = &program.body[0].kind else {
        panic!("expected expression statement");
    };
    assert!(matches!(&expression.kind, ExpressionKind::Assignment { .. }));

    // let [ always starts a declaration
    let program = parse("let [a] = [1];");
    assert!(matches!(
        &program.body[0].kind,
        StatementKind::VariableDeclaration(decl) if decl.kind == VariableKind::Let
    ));
}

/// Test: `let` never starts a declaration in single-statement position
#[test]
fn test_let_not_declaration_in_if_branch() {
    // `let` falls back to an identifier expression, which cannot be followed
    // by another identifier
    let _ = parse_err("if (x) let y = 1;");
}

/// Test: const requires an initializer outside for-in/of heads
#[test]
fn test_const_requires_initializer() {
    assert!(Parser::new("const x;").parse().is_err());
    parse("for (const x of xs) x;");
    parse("for (const x in o) x;");
}

/// Test: destructuring declarations require an initializer
#[test]
fn test_pattern_requires_initializer() {
    let err = parse_err("let [a];");
    assert!(
        err.message.contains("Complex binding patterns require an initialization value"),
        "got: {}",
        err.message
    );
}

/// Test: for-of with const and no initializer (spec scenario)
#[test]
fn test_for_of_const_head() {
    let program = parse("for (const x of xs) x++;");
    let StatementKind::ForOf { left, is_await, .. } = &program.body[0].kind else {
        panic!("expected for-of");
    };
    assert!(!is_await);
    let ForInOfLeft::VariableDeclaration(decl) = left else {
        panic!("expected declaration in for-of head");
    };
    assert_eq!(decl.kind, VariableKind::Const);
    assert_eq!(decl.declarations.len(), 1);
    assert!(decl.declarations[0].init.is_none());
}

/// Test: the legacy for-in initializer case is tolerated only for sloppy var
#[test]
fn test_for_in_initializer_legacy() {
    parse("for (var x = 1 in o) x;");
    let err = parse_err("for (let x = 1 in o) x;");
    assert!(err.message.contains("may not have an initializer"));
    let err = parse_err("for (var [a] = [] in o) a;");
    assert!(err.message.contains("may not have an initializer"));
    let err = parse_err("'use strict'; for (var x = 1 in o) x;");
    assert!(err.message.contains("may not have an initializer"));
}

/// Test: for-of left-hand side may not start with `let`
#[test]
fn test_for_of_let_lhs_rejected() {
    let err = parse_err("for (let.x of xs) x;");
    assert!(
        err.message.contains("may not start with 'let'"),
        "got: {}",
        err.message
    );
}

/// Test: destructuring assignment in a for-of head
#[test]
fn test_for_of_destructuring_assignment() {
    let program = parse("for ([a, b] of pairs) use(a, b);");
    let StatementKind::ForOf { left, .. } = &program.body[0].kind else {
        panic!("expected for-of");
    };
    assert!(matches!(
        left,
        ForInOfLeft::Pattern(pattern) if matches!(pattern.kind, PatternKind::Array { .. })
    ));
}

/// Test: `for await` only pairs with `of` and only where await is allowed
#[test]
fn test_for_await_restrictions() {
    parse("async function f() { for await (const x of xs) x; }");
    let err = parse_err("async function f() { for await (const x in o) x; }");
    assert!(err.message.contains("Unexpected"));
    let err = parse_err("function f() { for await (const x of xs) x; }");
    assert!(err.message.contains("Unexpected"));
}

/// Test: labels validate break and continue targets
#[test]
fn test_label_targets() {
    parse("outer: while (a) { break outer; }");
    parse("outer: while (a) { continue outer; }");
    parse("x: break x;");

    let err = parse_err("x: continue x;");
    assert!(err.message.contains("Unsyntactic continue"));
    let err = parse_err("break;");
    assert!(err.message.contains("Unsyntactic break"));
    let err = parse_err("while (a) b; continue;");
    assert!(err.message.contains("Unsyntactic continue"));
}

/// Test: stacked labels all become valid continue targets of the loop
#[test]
fn test_stacked_labels_adopt_loop_kind() {
    parse("L: M: while (a) { continue L; continue M; }");
}

/// Test: duplicate labels in a chain are rejected
#[test]
fn test_duplicate_label() {
    let err = parse_err("x: x: while (a) b;");
    assert!(err.message.contains("Label 'x' is already declared"));
}

/// Test: try requires catch or finally; optional catch binding works
#[test]
fn test_try_forms() {
    parse("try { f(); } catch (e) { g(e); }");
    parse("try { f(); } finally { g(); }");
    parse("try { f(); } catch { g(); }");
    let err = parse_err("try { f(); }");
    assert!(err.message.contains("Missing catch or finally clause"));
}

/// Test: a simple catch parameter may be shadowed by var, a pattern may not
#[test]
fn test_catch_parameter_scoping() {
    parse("try {} catch (e) { var e; }");
    let err = parse_err("try {} catch ([e]) { var e; }");
    assert!(err.message.contains("already been declared"));
}

/// Test: switch allows one default clause
#[test]
fn test_switch_single_default() {
    let program = parse("switch (x) { case 1: a(); break; default: b(); }");
    let StatementKind::Switch { cases, .. } = &program.body[0].kind else {
        panic!("expected switch");
    };
    assert_eq!(cases.len(), 2);
    assert!(cases[0].test.is_some());
    assert!(cases[1].test.is_none());

    let err = parse_err("switch (x) { default: a(); default: b(); }");
    assert!(err.message.contains("Multiple default clauses"));
}

/// Test: newline after throw is rejected
#[test]
fn test_throw_newline() {
    parse("throw err;");
    let err = parse_err("throw\nerr;");
    assert!(err.message.contains("Illegal newline after throw"));
}

/// Test: with is rejected in strict mode only
#[test]
fn test_with_statement() {
    parse("with (o) { x; }");
    let err = parse_err("'use strict'; with (o) { x; }");
    assert!(err.message.contains("'with' in strict mode"));
}

/// Test: return is only valid inside functions
#[test]
fn test_return_outside_function() {
    parse("function f() { return 1; }");
    let err = parse_err("return 1;");
    assert!(err.message.contains("'return' outside of function"));
}

/// Test: automatic semicolon insertion at newlines, `}` and EOF
#[test]
fn test_asi() {
    let program = parse("a = 1\nb = 2");
    assert_eq!(program.body.len(), 2);

    let program = parse("function f() { return\n1 }");
    let StatementKind::FunctionDeclaration(function) = &program.body[0].kind else {
        panic!("expected function");
    };
    let StatementKind::Block { body } = &function.body.kind else {
        panic!("expected block body");
    };
    // `return` takes no argument across the newline; `1` becomes its own
    // statement
    assert_eq!(body.len(), 2);
    assert!(matches!(&body[0].kind, StatementKind::Return { argument: None }));

    let err = parse_err("a = 1 b = 2");
    assert!(err.message.contains("Expected semicolon"));
}

/// Test: do-while accepts a missing semicolon without a newline
#[test]
fn test_do_while_asi() {
    let program = parse("do f(); while (x) g();");
    assert_eq!(program.body.len(), 2);
}

/// Test: directives are recognized at the top level and in function bodies
#[test]
fn test_directive_prologue() {
    let program = parse("'use strict';\n\"other directive\";\nreal();");
    let StatementKind::Expression { directive, .. } = &program.body[0].kind else {
        panic!("expected expression statement");
    };
    assert_eq!(directive.as_deref(), Some("use strict"));
    let StatementKind::Expression { directive, .. } = &program.body[1].kind else {
        panic!("expected expression statement");
    };
    assert_eq!(directive.as_deref(), Some("other directive"));
    let StatementKind::Expression { directive, .. } = &program.body[2].kind else {
        panic!("expected expression statement");
    };
    assert!(directive.is_none());
}

/// Test: a parenthesized string is not a directive
#[test]
fn test_parenthesized_string_is_not_directive() {
    let program = parse("('use strict'); 0755;");
    let StatementKind::Expression { directive, .. } = &program.body[0].kind else {
        panic!("expected expression statement");
    };
    assert!(directive.is_none(), "parenthesized strings are not directives");
}

/// Test: strict mode from a directive applies to the rest of the body
#[test]
fn test_use_strict_applies() {
    let err = parse_err("'use strict'; x = 0755;");
    assert!(err.message.contains("Invalid number"));
    let err = parse_err("function f() { 'use strict'; with (o) {} }");
    assert!(err.message.contains("'with' in strict mode"));
}

/// Test: var may redeclare, lexical may not, var may not cross let
#[test]
fn test_duplicate_binding_rules() {
    parse("var x = 1; var x = 2;");
    let err = parse_err("let x; let x;");
    assert!(err.message.contains("Identifier 'x' has already been declared"));
    let err = parse_err("let x; { var x; }");
    assert!(err.message.contains("Identifier 'x' has already been declared"));
    // A let in an inner block does not clash with an outer let
    parse("let x; { let x; }");
}

/// Test: sloppy-mode function declarations in if branches (Annex B)
#[test]
fn test_function_in_if_branch() {
    parse("if (x) function f() {} else function g() {}");
    let err = parse_err("'use strict'; if (x) function f() {}");
    assert!(err.message.contains("Unexpected"));
    let err = parse_err("while (x) function f() {}");
    assert!(err.message.contains("Unexpected"));
}

/// Test: empty statements and blocks
#[test]
fn test_empty_and_block() {
    let program = parse(";;{ }");
    assert!(matches!(program.body[0].kind, StatementKind::Empty));
    assert!(matches!(program.body[1].kind, StatementKind::Empty));
    assert!(matches!(&program.body[2].kind, StatementKind::Block { body } if body.is_empty()));
}

/// Test: debugger statement
#[test]
fn test_debugger() {
    let program = parse("debugger;");
    assert!(matches!(program.body[0].kind, StatementKind::Debugger));
}
