//! Declaration parsing: binding patterns, function declarations and
//! expressions, methods and their bodies, classes (with private-name
//! bookkeeping and static blocks), and the module grammar
//! (import/export forms with export bookkeeping).

use std::collections::HashSet;

use core_types::{JsError, Span};

use crate::ast::*;
use crate::lexer::{Keyword, Punctuator, Token};
use crate::scope::{
    function_flags, BindingKind, PrivateElementKind, ScopeFlags,
};

use super::{ForInitCtx, NodeStart, Parser, StatementContext};

impl<'a> Parser<'a> {
    // ------------------------------------------------------------------
    // Binding patterns
    // ------------------------------------------------------------------

    /// An identifier, array pattern, or object pattern in binding position.
    pub(crate) fn parse_binding_atom(&mut self) -> Result<Pattern, JsError> {
        match self.peek()? {
            Token::Punctuator(Punctuator::LBracket) => {
                let start = self.start()?;
                self.next()?;
                let elements = self.parse_binding_list(Punctuator::RBracket, true, true)?;
                Ok(self.pattern(&start, PatternKind::Array { elements }))
            }
            Token::Punctuator(Punctuator::LBrace) => self.parse_object_pattern(),
            _ => {
                let id = self.parse_ident(false)?;
                Ok(Pattern {
                    kind: PatternKind::Identifier { name: id.name },
                    span: id.span,
                    loc: id.loc,
                })
            }
        }
    }

    /// A comma-separated list of binding elements up to `close`. Used for
    /// parameter lists (no holes) and array patterns (holes allowed).
    pub(crate) fn parse_binding_list(
        &mut self,
        close: Punctuator,
        allow_empty: bool,
        allow_trailing_comma: bool,
    ) -> Result<Vec<Option<Pattern>>, JsError> {
        let mut elements = Vec::new();
        let mut first = true;
        while !self.eat_punctuator(close)? {
            if first {
                first = false;
            } else {
                self.expect_punctuator(Punctuator::Comma)?;
            }
            if allow_empty && self.check_punctuator(Punctuator::Comma)? {
                elements.push(None);
            } else if allow_trailing_comma && self.after_trailing_comma(close)? {
                break;
            } else if self.check_punctuator(Punctuator::Spread)? {
                let rest = self.parse_rest_binding()?;
                elements.push(Some(rest));
                if self.check_punctuator(Punctuator::Comma)? {
                    return self.raise_recoverable(
                        self.lexer.token_start,
                        "Comma is not permitted after the rest element",
                    );
                }
                self.expect_punctuator(close)?;
                break;
            } else {
                let start = self.start()?;
                let atom = self.parse_binding_atom()?;
                elements.push(Some(self.parse_maybe_default(start, atom)?));
            }
        }
        Ok(elements)
    }

    /// `...binding`; consumes the ellipsis.
    pub(crate) fn parse_rest_binding(&mut self) -> Result<Pattern, JsError> {
        let start = self.start()?;
        self.expect_punctuator(Punctuator::Spread)?;
        let argument = self.parse_binding_atom()?;
        Ok(self.pattern(
            &start,
            PatternKind::Rest {
                argument: Box::new(argument),
            },
        ))
    }

    /// Wrap a binding in a default-value pattern when `=` follows.
    pub(crate) fn parse_maybe_default(
        &mut self,
        start: NodeStart,
        left: Pattern,
    ) -> Result<Pattern, JsError> {
        if !self.eat_punctuator(Punctuator::Assign)? {
            return Ok(left);
        }
        let right = self.parse_maybe_assign(ForInitCtx::None, None)?;
        Ok(self.pattern(
            &start,
            PatternKind::Assignment {
                left: Box::new(left),
                right: Box::new(right),
            },
        ))
    }

    /// `{ a, b: c, [k]: d = 1, ...rest }` in binding position.
    fn parse_object_pattern(&mut self) -> Result<Pattern, JsError> {
        let start = self.start()?;
        self.next()?; // {
        let mut properties = Vec::new();
        let mut first = true;

        while !self.eat_punctuator(Punctuator::RBrace)? {
            if first {
                first = false;
            } else {
                self.expect_punctuator(Punctuator::Comma)?;
                if self.after_trailing_comma(Punctuator::RBrace)? {
                    break;
                }
            }

            if self.options.ecma_version.supports(2018)
                && self.check_punctuator(Punctuator::Spread)?
            {
                let rest_start = self.start()?;
                self.next()?; // ...
                // An object rest binding must be a plain identifier
                let id = self.parse_ident(false)?;
                let argument = Pattern {
                    kind: PatternKind::Identifier { name: id.name },
                    span: id.span,
                    loc: id.loc,
                };
                if self.check_punctuator(Punctuator::Comma)? {
                    return self.raise_recoverable(
                        self.lexer.token_start,
                        "Comma is not permitted after the rest element",
                    );
                }
                let (span, loc) = self.finish_span(&rest_start);
                properties.push(ObjectPatternProperty::Rest {
                    argument: Box::new(argument),
                    span,
                    loc,
                });
                continue;
            }

            let prop_start = self.start()?;
            let (key, computed) = self.parse_property_name()?;
            let property = if self.eat_punctuator(Punctuator::Colon)? {
                let value_start = self.start()?;
                let atom = self.parse_binding_atom()?;
                let value = self.parse_maybe_default(value_start, atom)?;
                let (span, loc) = self.finish_span(&prop_start);
                ObjectPatternProperty::Property {
                    key,
                    value,
                    shorthand: false,
                    computed,
                    span,
                    loc,
                }
            } else {
                // Shorthand: the key doubles as the bound name
                let ExpressionKind::Identifier { name } = &key.kind else {
                    return self.unexpected();
                };
                let name = name.clone();
                if computed {
                    return self.unexpected();
                }
                self.check_unreserved(&name, false, key.span.start)?;
                let id_pattern = Pattern {
                    kind: PatternKind::Identifier { name },
                    span: key.span,
                    loc: key.loc.clone(),
                };
                let value_start = self.start_at(key.span, key.loc.as_ref());
                let value = self.parse_maybe_default(value_start, id_pattern)?;
                let (span, loc) = self.finish_span(&prop_start);
                ObjectPatternProperty::Property {
                    key,
                    value,
                    shorthand: true,
                    computed: false,
                    span,
                    loc,
                }
            };
            properties.push(property);
        }
        Ok(self.pattern(&start, PatternKind::Object { properties }))
    }

    // ------------------------------------------------------------------
    // Functions
    // ------------------------------------------------------------------

    /// Parameters are all plain identifiers: duplicates stay legal in sloppy
    /// mode and `use strict` in the body stays legal.
    pub(crate) fn is_simple_param_list(params: &[Pattern]) -> bool {
        params
            .iter()
            .all(|param| matches!(param.kind, PatternKind::Identifier { .. }))
    }

    /// Validate a parameter list and declare its names in the current
    /// (function) scope.
    pub(crate) fn check_params(
        &mut self,
        params: &[Pattern],
        allow_duplicates: bool,
    ) -> Result<(), JsError> {
        let mut clashes: HashSet<String> = HashSet::new();
        for param in params {
            let clash_table = if allow_duplicates {
                None
            } else {
                Some(&mut clashes)
            };
            self.check_lval_inner_pattern(param, BindingKind::Var, clash_table)?;
        }
        Ok(())
    }

    /// `function` (already consumed) as a declaration. `hanging` marks the
    /// sloppy-mode single-statement position where the name is not bound;
    /// `nullable_id` allows the anonymous `export default function () {}`.
    pub(crate) fn parse_function_statement_rest(
        &mut self,
        start: NodeStart,
        is_async: bool,
        hanging: bool,
        nullable_id: bool,
    ) -> Result<Statement, JsError> {
        let is_generator = self.parse_generator_star(is_async)?;

        let id = if nullable_id && !Self::token_is_name_like(&self.peek()?) {
            None
        } else {
            Some(self.parse_ident(false)?)
        };
        if let Some(id) = &id {
            if !hanging {
                // Generators and async functions bind lexically; plain
                // functions follow Annex-B in sloppy mode
                let kind = if self.strict || is_generator || is_async {
                    if self.scope_stack.treat_functions_as_var(self.strict) {
                        BindingKind::Var
                    } else {
                        BindingKind::Lexical
                    }
                } else {
                    BindingKind::Function
                };
                let name = id.name.clone();
                self.check_lval_ident(&name, id.span.start, kind, None)?;
            }
        }

        let function = self.parse_function_rest(&start, id, is_async, is_generator)?;
        Ok(self.statement(&start, StatementKind::FunctionDeclaration(function)))
    }

    /// `function` (already consumed) as an expression.
    pub(crate) fn parse_function_expression_rest(
        &mut self,
        start: NodeStart,
        is_async: bool,
    ) -> Result<Expression, JsError> {
        let is_generator = self.parse_generator_star(is_async)?;

        let old_yield = self.yield_pos.take();
        let old_await = self.await_pos.take();
        let old_await_ident = self.await_ident_pos.take();
        self.scope_stack
            .enter(function_flags(is_async, is_generator));

        // The expression's own name is scoped to its body, so it is parsed
        // after entering the function scope
        let result = (|| {
            let id = if Self::token_is_name_like(&self.peek()?) {
                Some(self.parse_ident(false)?)
            } else {
                None
            };
            let params = self.parse_function_params()?;
            let allow_duplicates = !self.strict && Self::is_simple_param_list(&params);
            self.check_params(&params, allow_duplicates)?;
            let body =
                self.parse_function_block_body(&params, id.as_ref(), start.offset)?;
            Ok::<_, JsError>((id, params, body))
        })();

        self.scope_stack.exit();
        self.yield_pos = old_yield;
        self.await_pos = old_await;
        self.await_ident_pos = old_await_ident;

        let (id, params, body) = result?;
        let (span, loc) = self.finish_span(&start);
        Ok(self.expression(
            &start,
            ExpressionKind::Function(Function {
                id,
                params,
                body: Box::new(body),
                is_async,
                is_generator,
                span,
                loc,
            }),
        ))
    }

    fn parse_generator_star(&mut self, is_async: bool) -> Result<bool, JsError> {
        if !self.check_punctuator(Punctuator::Star)? {
            return Ok(false);
        }
        if is_async && !self.options.ecma_version.supports(2018) {
            return self.unexpected();
        }
        self.next()?;
        Ok(true)
    }

    /// Shared tail of function declarations: scope, parameters, body.
    fn parse_function_rest(
        &mut self,
        start: &NodeStart,
        id: Option<Identifier>,
        is_async: bool,
        is_generator: bool,
    ) -> Result<Function, JsError> {
        let old_yield = self.yield_pos.take();
        let old_await = self.await_pos.take();
        let old_await_ident = self.await_ident_pos.take();
        self.scope_stack
            .enter(function_flags(is_async, is_generator));

        let result = (|| {
            let params = self.parse_function_params()?;
            let allow_duplicates = !self.strict && Self::is_simple_param_list(&params);
            self.check_params(&params, allow_duplicates)?;
            let body =
                self.parse_function_block_body(&params, id.as_ref(), start.offset)?;
            Ok::<_, JsError>((params, body))
        })();

        self.scope_stack.exit();
        self.yield_pos = old_yield;
        self.await_pos = old_await;
        self.await_ident_pos = old_await_ident;

        let (params, body) = result?;
        let (span, loc) = self.finish_span(start);
        Ok(Function {
            id,
            params,
            body: Box::new(body),
            is_async,
            is_generator,
            span,
            loc,
        })
    }

    /// `( params )` of a function; validates delayed yield/await errors.
    pub(crate) fn parse_function_params(&mut self) -> Result<Vec<Pattern>, JsError> {
        self.expect_punctuator(Punctuator::LParen)?;
        let list = self.parse_binding_list(
            Punctuator::RParen,
            false,
            self.options.ecma_version.supports(2017),
        )?;
        self.check_yield_await_in_default_params()?;
        Ok(list.into_iter().flatten().collect())
    }

    /// A method value: parameter list and body inside a fresh function scope
    /// that permits `super.x` (and `super()` for derived constructors).
    pub(crate) fn parse_method(
        &mut self,
        is_generator: bool,
        is_async: bool,
        allow_direct_super: bool,
    ) -> Result<Function, JsError> {
        let start = self.start()?;
        let old_yield = self.yield_pos.take();
        let old_await = self.await_pos.take();
        let old_await_ident = self.await_ident_pos.take();

        let mut flags = function_flags(is_async, is_generator) | ScopeFlags::SUPER;
        if allow_direct_super {
            flags |= ScopeFlags::DIRECT_SUPER;
        }
        self.scope_stack.enter(flags);

        let result = (|| {
            let params = self.parse_function_params()?;
            self.check_params(&params, false)?;
            let body = self.parse_function_block_body(&params, None, start.offset)?;
            Ok::<_, JsError>((params, body))
        })();

        self.scope_stack.exit();
        self.yield_pos = old_yield;
        self.await_pos = old_await;
        self.await_ident_pos = old_await_ident;

        let (params, body) = result?;
        let (span, loc) = self.finish_span(&start);
        Ok(Function {
            id: None,
            params,
            body: Box::new(body),
            is_async,
            is_generator,
            span,
            loc,
        })
    }

    /// A function (or arrow) block body: the directive prologue may switch
    /// the parser to strict mode, in which case the already-parsed header is
    /// re-validated.
    pub(crate) fn parse_function_block_body(
        &mut self,
        params: &[Pattern],
        id: Option<&Identifier>,
        function_start: usize,
    ) -> Result<Statement, JsError> {
        let old_strict = self.strict;
        let old_labels = std::mem::take(&mut self.labels);
        let body = self.parse_directive_block();
        self.labels = old_labels;
        let body = match body {
            Ok(body) => body,
            Err(err) => {
                self.strict = old_strict;
                return Err(err);
            }
        };

        if self.strict && !old_strict {
            let validated = self.validate_strict_function_header(params, id, function_start);
            if let Err(err) = validated {
                self.strict = old_strict;
                return Err(err);
            }
        }
        self.strict = old_strict;
        Ok(body)
    }

    /// A `{ ... }` block whose leading string statements form a directive
    /// prologue; `"use strict"` switches the parser to strict mode for the
    /// rest of the block.
    fn parse_directive_block(&mut self) -> Result<Statement, JsError> {
        let start = self.start()?;
        self.expect_punctuator(Punctuator::LBrace)?;
        let mut body = Vec::new();
        let mut in_prologue = true;
        while !self.eat_punctuator(Punctuator::RBrace)? {
            if self.check_eof()? {
                return self.unexpected();
            }
            let mut stmt = self.parse_statement(StatementContext::None, false)?;
            if in_prologue {
                match self.directive_text(&stmt) {
                    Some(directive) => {
                        if directive == "use strict" {
                            self.strict = true;
                        }
                        if let StatementKind::Expression { directive: slot, .. } = &mut stmt.kind {
                            *slot = Some(directive);
                        }
                    }
                    None => in_prologue = false,
                }
            }
            body.push(stmt);
        }
        Ok(self.statement(&start, StatementKind::Block { body }))
    }

    /// After a `"use strict"` directive, the parameter list must be simple
    /// and the header names must satisfy the strict rules.
    fn validate_strict_function_header(
        &mut self,
        params: &[Pattern],
        id: Option<&Identifier>,
        function_start: usize,
    ) -> Result<(), JsError> {
        if !Self::is_simple_param_list(params) {
            return self.raise_recoverable(
                function_start,
                "Illegal 'use strict' directive in function with non-simple parameter list",
            );
        }
        if let Some(id) = id {
            if super::is_strict_bind_restricted(&id.name) {
                return self
                    .raise_recoverable(id.span.start, format!("Binding '{}' in strict mode", id.name));
            }
        }
        let mut names = Vec::new();
        for param in params {
            pattern_binding_names(param, &mut names);
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (name, offset) in &names {
            if super::is_strict_bind_restricted(name) {
                return self
                    .raise_recoverable(*offset, format!("Binding '{}' in strict mode", name));
            }
            if !seen.insert(name.as_str()) {
                return self.raise_recoverable(*offset, "Argument name clash");
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    /// `class` as an expression.
    pub(crate) fn parse_class_expression(&mut self) -> Result<Expression, JsError> {
        let start = self.start()?;
        let class = self.parse_class(false, false)?;
        Ok(self.expression(&start, ExpressionKind::Class(class)))
    }

    /// Parse a class declaration or expression. Class bodies are always
    /// strict.
    pub(crate) fn parse_class(
        &mut self,
        is_statement: bool,
        nullable_id: bool,
    ) -> Result<Class, JsError> {
        let start = self.start()?;
        self.expect_keyword(Keyword::Class)?;
        let old_strict = self.strict;
        self.strict = true;

        let result = self.parse_class_rest(&start, is_statement, nullable_id);
        self.strict = old_strict;
        result
    }

    fn parse_class_rest(
        &mut self,
        start: &NodeStart,
        is_statement: bool,
        nullable_id: bool,
    ) -> Result<Class, JsError> {
        let id = if Self::token_is_name_like(&self.peek()?) {
            let id = self.parse_ident(false)?;
            if is_statement {
                let name = id.name.clone();
                self.check_lval_ident(&name, id.span.start, BindingKind::Lexical, None)?;
            }
            Some(id)
        } else if is_statement && !nullable_id {
            return self.unexpected();
        } else {
            None
        };

        let super_class = if self.eat_keyword(Keyword::Extends)? {
            Some(Box::new(self.parse_expr_subscripts(None, ForInitCtx::None)?))
        } else {
            None
        };

        self.private_names.enter_class_body();
        let body = self.parse_class_body_elements(super_class.is_some());
        let resolution = self.private_names.exit_class_body();
        let body = body?;
        resolution?;

        let (span, loc) = self.finish_span(start);
        Ok(Class {
            id,
            super_class,
            body,
            span,
            loc,
        })
    }

    fn parse_class_body_elements(&mut self, has_super: bool) -> Result<ClassBody, JsError> {
        let start = self.start()?;
        self.expect_punctuator(Punctuator::LBrace)?;
        let mut body = Vec::new();
        let mut had_constructor = false;

        while !self.eat_punctuator(Punctuator::RBrace)? {
            if self.eat_punctuator(Punctuator::Semicolon)? {
                continue;
            }
            if self.check_eof()? {
                return self.unexpected();
            }
            let element = self.parse_class_element(has_super)?;
            if let ClassElement::Method(method) = &element {
                if method.kind == MethodKind::Constructor {
                    if had_constructor {
                        return self.raise_recoverable(
                            method.span.start,
                            "Duplicate constructor in the same class",
                        );
                    }
                    had_constructor = true;
                }
            }
            body.push(element);
        }

        let (span, loc) = self.finish_span(&start);
        Ok(ClassBody { body, span, loc })
    }

    fn parse_class_element(&mut self, constructor_allows_super: bool) -> Result<ClassElement, JsError> {
        let start = self.start()?;
        let mut key_name: Option<String> = None;
        let mut is_static = false;
        let mut is_async = false;
        let mut is_generator = false;
        let mut kind = MethodKind::Method;

        if self.eat_contextual("static")? {
            if self.options.ecma_version.supports(2022)
                && self.check_punctuator(Punctuator::LBrace)?
            {
                return self.parse_class_static_block(start);
            }
            if self.is_class_element_name_start()? || self.check_punctuator(Punctuator::Star)? {
                is_static = true;
            } else {
                key_name = Some("static".to_string());
            }
        }
        if key_name.is_none()
            && self.options.ecma_version.supports(2017)
            && self.eat_contextual("async")?
        {
            if (self.is_class_element_name_start()? || self.check_punctuator(Punctuator::Star)?)
                && !self.lexer.line_terminator_before_token
            {
                is_async = true;
            } else {
                key_name = Some("async".to_string());
            }
        }
        if key_name.is_none() {
            is_generator = self.parse_generator_star(is_async)?;
        }
        if key_name.is_none() && !is_async && !is_generator {
            for (word, accessor_kind) in [("get", MethodKind::Get), ("set", MethodKind::Set)] {
                if self.is_contextual(word)? {
                    self.next()?;
                    if self.is_class_element_name_start()? {
                        kind = accessor_kind;
                    } else {
                        key_name = Some(word.to_string());
                    }
                    break;
                }
            }
        }

        // A contextual modifier turned out to be the element name itself
        let (key, computed) = match key_name {
            Some(name) => {
                let span = Span::new(self.lexer.last_token_start, self.lexer.last_token_end);
                let loc = self.options.locations.then(|| core_types::SourceSpan {
                    start: self.lexer.last_token_start_pos.clone(),
                    end: self.lexer.last_token_end_pos.clone(),
                });
                (
                    Expression {
                        kind: ExpressionKind::Identifier { name },
                        span,
                        loc,
                    },
                    false,
                )
            }
            None => self.parse_class_element_name()?,
        };
        let is_private = matches!(key.kind, ExpressionKind::PrivateIdentifier { .. });

        let is_method_shape = self.check_punctuator(Punctuator::LParen)?
            || kind != MethodKind::Method
            || is_generator
            || is_async;

        if is_method_shape {
            let is_constructor =
                !is_static && !computed && !is_private && key_names(&key, "constructor");
            if is_constructor {
                if kind != MethodKind::Method {
                    return self.raise(key.span.start, "Constructor can't have get/set modifier");
                }
                if is_generator {
                    return self.raise(key.span.start, "Constructor can't be a generator");
                }
                if is_async {
                    return self.raise(key.span.start, "Constructor can't be an async method");
                }
            }
            if is_static && !computed && key_names(&key, "prototype") {
                return self.raise(
                    key.span.start,
                    "Classes may not have a static property named prototype",
                );
            }
            if is_private {
                self.declare_private_element(&key, kind, is_static)?;
            }

            let allow_direct_super = is_constructor && constructor_allows_super;
            let value = self.parse_method(is_generator, is_async, allow_direct_super)?;
            match kind {
                MethodKind::Get => {
                    self.check_accessor_arity(PropertyKind::Get, &value)?;
                }
                MethodKind::Set => {
                    self.check_accessor_arity(PropertyKind::Set, &value)?;
                }
                _ => {}
            }

            let method_kind = if is_constructor {
                MethodKind::Constructor
            } else {
                kind
            };
            let (span, loc) = self.finish_span(&start);
            return Ok(ClassElement::Method(MethodDefinition {
                key,
                kind: method_kind,
                value,
                is_static,
                computed,
                span,
                loc,
            }));
        }

        // A field
        if !self.options.ecma_version.supports(2022) {
            return self.unexpected();
        }
        if !computed && key_names(&key, "constructor") {
            return self.raise(key.span.start, "Classes can't have a field named 'constructor'");
        }
        if is_static && !computed && key_names(&key, "prototype") {
            return self.raise(
                key.span.start,
                "Classes can't have a static field named 'prototype'",
            );
        }
        if is_private {
            self.declare_private_element(&key, MethodKind::Method, is_static)?;
        }

        let value = if self.eat_punctuator(Punctuator::Assign)? {
            // Field initializers forbid `arguments` via the this-scope flag
            self.scope_stack.current_this_scope_mut().in_class_field_init = true;
            let value = self.parse_maybe_assign(ForInitCtx::None, None);
            self.scope_stack.current_this_scope_mut().in_class_field_init = false;
            Some(value?)
        } else {
            None
        };
        self.semicolon()?;

        let (span, loc) = self.finish_span(&start);
        Ok(ClassElement::Property(PropertyDefinition {
            key,
            value,
            is_static,
            computed,
            span,
            loc,
        }))
    }

    fn declare_private_element(
        &mut self,
        key: &Expression,
        kind: MethodKind,
        is_static: bool,
    ) -> Result<(), JsError> {
        let ExpressionKind::PrivateIdentifier { name } = &key.kind else {
            return Ok(());
        };
        let slot = match (kind, is_static) {
            (MethodKind::Get, false) => PrivateElementKind::InstanceGet,
            (MethodKind::Set, false) => PrivateElementKind::InstanceSet,
            (MethodKind::Get, true) => PrivateElementKind::StaticGet,
            (MethodKind::Set, true) => PrivateElementKind::StaticSet,
            _ => PrivateElementKind::Plain,
        };
        let pos = self.lexer.position_of_offset(key.span.start);
        self.private_names.declare(name, slot, Some(pos))
    }

    fn parse_class_element_name(&mut self) -> Result<(Expression, bool), JsError> {
        if let Token::PrivateIdentifier(name) = self.lexer.peek_token()? {
            if name == "constructor" {
                return self.raise(
                    self.lexer.token_start,
                    "Classes can't have an element named '#constructor'",
                );
            }
            let key = self.parse_private_ident()?;
            return Ok((key, false));
        }
        self.parse_property_name()
    }

    fn is_class_element_name_start(&mut self) -> Result<bool, JsError> {
        Ok(matches!(
            self.lexer.peek_token()?,
            Token::Identifier(..)
                | Token::Keyword(_)
                | Token::PrivateIdentifier(_)
                | Token::Number(_)
                | Token::BigIntLiteral(_)
                | Token::String(_)
                | Token::Punctuator(Punctuator::LBracket)
        ))
    }

    fn parse_class_static_block(&mut self, start: NodeStart) -> Result<ClassElement, JsError> {
        self.expect_punctuator(Punctuator::LBrace)?;
        let old_labels = std::mem::take(&mut self.labels);
        self.scope_stack
            .enter(ScopeFlags::CLASS_STATIC_BLOCK | ScopeFlags::SUPER);

        let result = (|| {
            let mut body = Vec::new();
            while !self.eat_punctuator(Punctuator::RBrace)? {
                if self.check_eof()? {
                    return self.unexpected();
                }
                body.push(self.parse_statement(StatementContext::None, false)?);
            }
            Ok::<_, JsError>(body)
        })();

        self.scope_stack.exit();
        self.labels = old_labels;
        let body = result?;

        let (span, loc) = self.finish_span(&start);
        Ok(ClassElement::StaticBlock(StaticBlock { body, span, loc }))
    }

    // ------------------------------------------------------------------
    // Modules
    // ------------------------------------------------------------------

    /// `import` declarations (the expression forms are routed elsewhere).
    pub(crate) fn parse_import_declaration(
        &mut self,
        start: NodeStart,
    ) -> Result<Statement, JsError> {
        self.next()?; // import

        let (specifiers, source) = if matches!(self.lexer.peek_token()?, Token::String(_)) {
            (Vec::new(), self.parse_module_source()?)
        } else {
            let specifiers = self.parse_import_specifiers()?;
            self.expect_contextual("from")?;
            (specifiers, self.parse_module_source()?)
        };
        self.semicolon()?;

        let (span, loc) = self.finish_span(&start);
        Ok(self.statement(
            &start,
            StatementKind::ImportDeclaration(ImportDeclaration {
                specifiers,
                source,
                span,
                loc,
            }),
        ))
    }

    fn parse_module_source(&mut self) -> Result<Expression, JsError> {
        if matches!(self.lexer.peek_token()?, Token::String(_)) {
            self.parse_literal_token()
        } else {
            self.unexpected()
        }
    }

    fn parse_import_specifiers(&mut self) -> Result<Vec<ImportSpecifier>, JsError> {
        let mut specifiers = Vec::new();

        if Self::token_is_name_like(&self.peek()?) {
            let spec_start = self.start()?;
            let local = self.parse_import_binding()?;
            let (span, loc) = self.finish_span(&spec_start);
            specifiers.push(ImportSpecifier::Default { local, span, loc });
            if !self.eat_punctuator(Punctuator::Comma)? {
                return Ok(specifiers);
            }
        }

        if self.check_punctuator(Punctuator::Star)? {
            let spec_start = self.start()?;
            self.next()?;
            self.expect_contextual("as")?;
            let local = self.parse_import_binding()?;
            let (span, loc) = self.finish_span(&spec_start);
            specifiers.push(ImportSpecifier::Namespace { local, span, loc });
            return Ok(specifiers);
        }

        self.expect_punctuator(Punctuator::LBrace)?;
        let mut first = true;
        while !self.eat_punctuator(Punctuator::RBrace)? {
            if first {
                first = false;
            } else {
                self.expect_punctuator(Punctuator::Comma)?;
                if self.after_trailing_comma(Punctuator::RBrace)? {
                    break;
                }
            }

            let spec_start = self.start()?;
            let imported = self.parse_module_export_name()?;
            let local = if self.eat_contextual("as")? {
                self.parse_import_binding()?
            } else {
                match &imported {
                    ModuleExportName::Identifier(id) => {
                        let local = id.clone();
                        self.check_unreserved(&local.name, false, local.span.start)?;
                        self.check_lval_ident(
                            &local.name,
                            local.span.start,
                            BindingKind::Lexical,
                            None,
                        )?;
                        local
                    }
                    ModuleExportName::String { span, .. } => {
                        return self.raise(
                            span.start,
                            "An import name that is a string must be followed by 'as'",
                        );
                    }
                }
            };
            let (span, loc) = self.finish_span(&spec_start);
            specifiers.push(ImportSpecifier::Named {
                imported,
                local,
                span,
                loc,
            });
        }
        Ok(specifiers)
    }

    fn parse_import_binding(&mut self) -> Result<Identifier, JsError> {
        let id = self.parse_ident(false)?;
        let name = id.name.clone();
        self.check_lval_ident(&name, id.span.start, BindingKind::Lexical, None)?;
        Ok(id)
    }

    /// An identifier or (ES2022) string-literal module export name.
    fn parse_module_export_name(&mut self) -> Result<ModuleExportName, JsError> {
        if self.options.ecma_version.supports(2022)
            && matches!(self.lexer.peek_token()?, Token::String(_))
        {
            let expr = self.parse_literal_token()?;
            if self.lexer.string_contains_lone_surrogate {
                return self.raise(
                    expr.span.start,
                    "An export name cannot include a lone surrogate.",
                );
            }
            let ExpressionKind::Literal {
                value: LiteralValue::String(value),
                raw,
            } = expr.kind
            else {
                return self.unexpected_at(expr.span.start);
            };
            return Ok(ModuleExportName::String {
                value,
                raw,
                span: expr.span,
                loc: expr.loc,
            });
        }
        Ok(ModuleExportName::Identifier(self.parse_ident(true)?))
    }

    /// Record an exported name, rejecting duplicates.
    fn check_export(&mut self, name: &str, offset: usize) -> Result<(), JsError> {
        if !self.exports.insert(name.to_string()) {
            return self.raise_recoverable(offset, format!("Duplicate export '{}'", name));
        }
        Ok(())
    }

    /// `export { x }` without `from` refers to a local binding that may not
    /// exist yet; remember it for the end-of-program check.
    fn check_local_export(&mut self, id: &Identifier) {
        if !self.scope_stack.top_level_declares(&id.name)
            && !self.undefined_exports.contains_key(&id.name)
        {
            self.undefined_exports.insert(
                id.name.clone(),
                self.lexer.position_of_offset(id.span.start),
            );
        }
    }

    pub(crate) fn parse_export_declaration(
        &mut self,
        start: NodeStart,
    ) -> Result<Statement, JsError> {
        self.next()?; // export

        // export * [as name] from 'source'
        if self.eat_punctuator(Punctuator::Star)? {
            let exported = if self.options.ecma_version.supports(2020)
                && self.eat_contextual("as")?
            {
                let name = self.parse_module_export_name()?;
                self.check_export(&name.as_str().to_string(), name.span().start)?;
                Some(name)
            } else {
                None
            };
            self.expect_contextual("from")?;
            let source = self.parse_module_source()?;
            self.semicolon()?;
            let (span, loc) = self.finish_span(&start);
            return Ok(self.statement(
                &start,
                StatementKind::ExportAllDeclaration(ExportAllDeclaration {
                    exported,
                    source,
                    span,
                    loc,
                }),
            ));
        }

        // export default ...
        if self.eat_keyword(Keyword::Default)? {
            self.check_export("default", self.lexer.last_token_start)?;
            let declaration = self.parse_export_default_declaration()?;
            let (span, loc) = self.finish_span(&start);
            return Ok(self.statement(
                &start,
                StatementKind::ExportDefaultDeclaration(ExportDefaultDeclaration {
                    declaration,
                    span,
                    loc,
                }),
            ));
        }

        // export <declaration>
        if self.should_parse_export_statement()? {
            let declaration = self.parse_statement(StatementContext::None, false)?;
            match &declaration.kind {
                StatementKind::VariableDeclaration(var_decl) => {
                    let mut names = Vec::new();
                    for declarator in &var_decl.declarations {
                        pattern_binding_names(&declarator.id, &mut names);
                    }
                    for (name, offset) in names {
                        self.check_export(&name, offset)?;
                    }
                }
                StatementKind::FunctionDeclaration(Function { id: Some(id), .. })
                | StatementKind::ClassDeclaration(Class { id: Some(id), .. }) => {
                    let name = id.name.clone();
                    let offset = id.span.start;
                    self.check_export(&name, offset)?;
                }
                _ => {}
            }
            let (span, loc) = self.finish_span(&start);
            return Ok(self.statement(
                &start,
                StatementKind::ExportNamedDeclaration(ExportNamedDeclaration {
                    declaration: Some(Box::new(declaration)),
                    specifiers: Vec::new(),
                    source: None,
                    span,
                    loc,
                }),
            ));
        }

        // export { ... } [from 'source']
        let specifiers = self.parse_export_specifiers()?;
        let source = if self.eat_contextual("from")? {
            Some(self.parse_module_source()?)
        } else {
            for specifier in &specifiers {
                match &specifier.local {
                    ModuleExportName::Identifier(id) => {
                        self.check_unreserved(&id.name, false, id.span.start)?;
                        self.check_local_export(id);
                    }
                    ModuleExportName::String { span, .. } => {
                        return self.raise(
                            span.start,
                            "A string literal cannot be used as an exported binding without `from`.",
                        );
                    }
                }
            }
            None
        };
        self.semicolon()?;
        let (span, loc) = self.finish_span(&start);
        Ok(self.statement(
            &start,
            StatementKind::ExportNamedDeclaration(ExportNamedDeclaration {
                declaration: None,
                specifiers,
                source,
                span,
                loc,
            }),
        ))
    }

    fn parse_export_default_declaration(&mut self) -> Result<ExportDefault, JsError> {
        if self.is_async_function()? {
            let fn_start = self.start()?;
            self.next()?; // async
            self.next()?; // function
            let stmt = self.parse_function_statement_rest(fn_start, true, false, true)?;
            return Ok(ExportDefault::Declaration(Box::new(stmt)));
        }
        if self.check_keyword(Keyword::Function)? {
            let fn_start = self.start()?;
            self.next()?;
            let stmt = self.parse_function_statement_rest(fn_start, false, false, true)?;
            return Ok(ExportDefault::Declaration(Box::new(stmt)));
        }
        if self.check_keyword(Keyword::Class)? {
            let class_start = self.start()?;
            let class = self.parse_class(true, true)?;
            let stmt = self.statement(&class_start, StatementKind::ClassDeclaration(class));
            return Ok(ExportDefault::Declaration(Box::new(stmt)));
        }
        let expr = self.parse_maybe_assign(ForInitCtx::None, None)?;
        self.semicolon()?;
        Ok(ExportDefault::Expression(expr))
    }

    fn should_parse_export_statement(&mut self) -> Result<bool, JsError> {
        Ok(matches!(
            self.lexer.peek_token()?,
            Token::Keyword(Keyword::Var)
                | Token::Keyword(Keyword::Const)
                | Token::Keyword(Keyword::Function)
                | Token::Keyword(Keyword::Class)
        ) || self.is_contextual("let")?
            || self.is_async_function()?)
    }

    fn parse_export_specifiers(&mut self) -> Result<Vec<ExportSpecifier>, JsError> {
        self.expect_punctuator(Punctuator::LBrace)?;
        let mut specifiers = Vec::new();
        let mut first = true;
        while !self.eat_punctuator(Punctuator::RBrace)? {
            if first {
                first = false;
            } else {
                self.expect_punctuator(Punctuator::Comma)?;
                if self.after_trailing_comma(Punctuator::RBrace)? {
                    break;
                }
            }

            let spec_start = self.start()?;
            let local = self.parse_module_export_name()?;
            let exported = if self.eat_contextual("as")? {
                self.parse_module_export_name()?
            } else {
                local.clone()
            };
            self.check_export(&exported.as_str().to_string(), exported.span().start)?;
            let (span, loc) = self.finish_span(&spec_start);
            specifiers.push(ExportSpecifier {
                local,
                exported,
                span,
                loc,
            });
        }
        Ok(specifiers)
    }
}

/// Collect the names (with offsets) bound by a pattern, in source order.
pub(crate) fn pattern_binding_names(pattern: &Pattern, out: &mut Vec<(String, usize)>) {
    match &pattern.kind {
        PatternKind::Identifier { name } => out.push((name.clone(), pattern.span.start)),
        PatternKind::Object { properties } => {
            for property in properties {
                match property {
                    ObjectPatternProperty::Property { value, .. } => {
                        pattern_binding_names(value, out)
                    }
                    ObjectPatternProperty::Rest { argument, .. } => {
                        pattern_binding_names(argument, out)
                    }
                }
            }
        }
        PatternKind::Array { elements } => {
            for element in elements.iter().flatten() {
                pattern_binding_names(element, out);
            }
        }
        PatternKind::Assignment { left, .. } => pattern_binding_names(left, out),
        PatternKind::Rest { argument } => pattern_binding_names(argument, out),
        PatternKind::Member(_) => {}
    }
}

/// True when a class-element key spells `name` as an identifier or string.
fn key_names(key: &Expression, name: &str) -> bool {
    match &key.kind {
        ExpressionKind::Identifier { name: n } => n == name,
        ExpressionKind::Literal {
            value: LiteralValue::String(s),
            ..
        } => s == name,
        _ => false,
    }
}
