//! Expression parsing: comma expressions down through assignment,
//! conditionals, precedence-climbing binary operators, unary/update
//! operators, subscript chains, and atoms.
//!
//! The precedence climb is data-driven: every binary token carries a
//! precedence in [`binop_prec`], `**` is handled right-associatively after
//! the unary layer, and `??` borrows the `&&` precedence while mixing with
//! `||`/`&&` without parentheses is rejected.

use core_types::{JsError, Span};
use num_bigint::BigInt;

use crate::ast::*;
use crate::error::{syntax_error, DestructuringErrors};
use crate::lexer::{Keyword, Punctuator, Token};
use crate::scope::{function_flags, BindingKind, ScopeFlags};

use super::{ForInitCtx, NodeStart, Parser};

/// An entry of a parenthesized list that may become arrow parameters:
/// ordinary entries are parsed as expressions, rest entries are already
/// patterns.
pub(crate) enum ParamExpr {
    Expr(Expression),
    Pattern(Pattern),
}

enum Subscript {
    /// One more member/call/template wrapped around the base; the flag is
    /// whether this element used `?.`
    Element(Expression, bool),
    /// No further subscript applies
    Done(Expression),
}

impl<'a> Parser<'a> {
    /// Parse a full (comma) expression.
    pub(crate) fn parse_expression(
        &mut self,
        for_init: ForInitCtx,
        mut refs: Option<&mut DestructuringErrors>,
    ) -> Result<Expression, JsError> {
        let start = self.start()?;
        let expr = self.parse_maybe_assign(for_init, refs.as_deref_mut())?;
        if self.check_punctuator(Punctuator::Comma)? {
            let mut expressions = vec![expr];
            while self.eat_punctuator(Punctuator::Comma)? {
                expressions.push(self.parse_maybe_assign(for_init, refs.as_deref_mut())?);
            }
            return Ok(self.expression(&start, ExpressionKind::Sequence { expressions }));
        }
        Ok(expr)
    }

    /// Parse an assignment expression, resolving the pattern-vs-expression
    /// ambiguity at the `=` when one appears.
    pub(crate) fn parse_maybe_assign(
        &mut self,
        for_init: ForInitCtx,
        mut refs: Option<&mut DestructuringErrors>,
    ) -> Result<Expression, JsError> {
        if self.is_contextual("yield")? && self.scope_stack.in_generator() {
            return self.parse_yield(for_init);
        }

        let mut own = DestructuringErrors::new();
        let own_errors = refs.is_none();
        let (old_paren_assign, old_trailing_comma, old_double_proto) = match refs.as_deref_mut() {
            Some(outer) => {
                let saved = (
                    outer.parenthesized_assign,
                    outer.trailing_comma,
                    outer.double_proto,
                );
                outer.parenthesized_assign = None;
                outer.trailing_comma = None;
                saved
            }
            None => (None, None, None),
        };

        {
            let token = self.peek()?;
            if matches!(token, Token::Punctuator(Punctuator::LParen))
                || Self::token_is_name_like(&token)
            {
                self.potential_arrow_at = Some(self.lexer.token_start);
                self.potential_arrow_in_for_await = for_init == ForInitCtx::AwaitInit;
            }
        }

        let start = self.start()?;
        let left = {
            let active = active_refs(&mut refs, &mut own);
            self.parse_maybe_conditional(for_init, Some(active))?
        };

        if let Some(operator) = self.check_assignment_operator()? {
            let left_start_offset = left.span.start;
            let target = if operator == AssignmentOperator::Assign {
                if is_simple_assign_target(&left) {
                    self.check_lval_simple(&left, BindingKind::None, None)?;
                    AssignmentTarget::Expression(Box::new(left))
                } else {
                    let pattern = {
                        let active = active_refs(&mut refs, &mut own);
                        self.to_assignable(left, false, Some(active))?
                    };
                    self.check_lval_pattern(&pattern, BindingKind::None, None)?;
                    AssignmentTarget::Pattern(Box::new(pattern))
                }
            } else {
                self.check_lval_simple(&left, BindingKind::None, None)?;
                AssignmentTarget::Expression(Box::new(left))
            };

            {
                let active = active_refs(&mut refs, &mut own);
                if !own_errors {
                    active.parenthesized_assign = None;
                    active.trailing_comma = None;
                    active.double_proto = None;
                }
                // A shorthand default inside the target is fine now that the
                // construct is committed to being a pattern
                if active
                    .shorthand_assign
                    .map_or(false, |offset| offset >= left_start_offset)
                {
                    active.shorthand_assign = None;
                }
            }

            self.next()?; // the assignment operator
            let right = self.parse_maybe_assign(for_init, None)?;

            if let Some(outer) = refs.as_deref_mut() {
                if old_double_proto.is_some() && outer.double_proto.is_none() {
                    outer.double_proto = old_double_proto;
                }
            }

            return Ok(self.expression(
                &start,
                ExpressionKind::Assignment {
                    operator,
                    left: target,
                    right: Box::new(right),
                },
            ));
        } else if own_errors {
            self.check_expression_errors(Some(&own))?;
        }

        if let Some(outer) = refs.as_deref_mut() {
            if old_paren_assign.is_some() {
                outer.parenthesized_assign = old_paren_assign;
            }
            if old_trailing_comma.is_some() {
                outer.trailing_comma = old_trailing_comma;
            }
        }
        Ok(left)
    }

    fn parse_maybe_conditional(
        &mut self,
        for_init: ForInitCtx,
        mut refs: Option<&mut DestructuringErrors>,
    ) -> Result<Expression, JsError> {
        let start = self.start()?;
        let expr = self.parse_expr_ops(for_init, refs.as_deref_mut())?;
        if Self::has_expression_errors(refs.as_deref()) {
            return Ok(expr);
        }
        if self.eat_punctuator(Punctuator::Question)? {
            let consequent = self.parse_maybe_assign(ForInitCtx::None, None)?;
            self.expect_punctuator(Punctuator::Colon)?;
            let alternate = self.parse_maybe_assign(for_init, None)?;
            return Ok(self.expression(
                &start,
                ExpressionKind::Conditional {
                    test: Box::new(expr),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                },
            ));
        }
        Ok(expr)
    }

    fn parse_expr_ops(
        &mut self,
        for_init: ForInitCtx,
        mut refs: Option<&mut DestructuringErrors>,
    ) -> Result<Expression, JsError> {
        let start = self.start()?;
        let expr = self.parse_maybe_unary(refs.as_deref_mut(), false, false, for_init)?;
        if Self::has_expression_errors(refs.as_deref()) {
            return Ok(expr);
        }
        if expr.span.start == start.offset && matches!(expr.kind, ExpressionKind::Arrow { .. }) {
            return Ok(expr);
        }
        self.parse_expr_op(expr, &start, -1, for_init)
    }

    /// Precedence climbing over the binary/logical operator table.
    fn parse_expr_op(
        &mut self,
        left: Expression,
        left_start: &NodeStart,
        min_prec: i32,
        for_init: ForInitCtx,
    ) -> Result<Expression, JsError> {
        let token = self.peek()?;
        let Some(prec) = binop_prec(&token) else {
            return Ok(left);
        };
        if for_init.forbids_in() && matches!(token, Token::Keyword(Keyword::In)) {
            return Ok(left);
        }
        if prec <= min_prec {
            return Ok(left);
        }

        let logical = matches!(
            token,
            Token::Punctuator(Punctuator::OrOr) | Token::Punctuator(Punctuator::AndAnd)
        );
        let coalesce = matches!(token, Token::Punctuator(Punctuator::NullishCoalesce));
        // `??` climbs at the `&&` precedence; unparenthesized mixing with
        // `||`/`&&` is rejected below
        let climb_prec = if coalesce { 2 } else { prec };

        self.next()?;
        let right_start = self.start()?;
        let unary = self.parse_maybe_unary(None, false, false, for_init)?;
        let right = self.parse_expr_op(unary, &right_start, climb_prec, for_init)?;
        let node = build_binary(left_start, self.lexer.last_token_end, &self.finish_loc_end(), self.options.locations, left, right, &token);

        if (logical && self.check_punctuator(Punctuator::NullishCoalesce)?)
            || (coalesce
                && (self.check_punctuator(Punctuator::OrOr)?
                    || self.check_punctuator(Punctuator::AndAnd)?))
        {
            return self.raise_recoverable(
                self.lexer.token_start,
                "Logical expressions and coalesce expressions cannot be mixed. Wrap either by parentheses",
            );
        }

        self.parse_expr_op(node, left_start, min_prec, for_init)
    }

    /// Parse unary/update expressions, `await`, `#x in obj` operands, and
    /// the right-associative `**` layer.
    pub(crate) fn parse_maybe_unary(
        &mut self,
        mut refs: Option<&mut DestructuringErrors>,
        mut saw_unary: bool,
        inc_dec: bool,
        for_init: ForInitCtx,
    ) -> Result<Expression, JsError> {
        let start = self.start()?;
        let can_await = self.scope_stack.can_await(self.top_level_await_allowed());
        let expr;

        if self.is_contextual("await")? && can_await {
            expr = self.parse_await(for_init)?;
            saw_unary = true;
        } else if let Some(prefix) = prefix_operator(&self.peek()?) {
            let update = matches!(prefix, PrefixOp::Update(_));
            self.next()?;
            let argument = self.parse_maybe_unary(None, true, update, for_init)?;
            self.check_expression_errors(refs.as_deref())?;
            match prefix {
                PrefixOp::Update(operator) => {
                    self.check_lval_simple(&argument, BindingKind::None, None)?;
                    expr = self.expression(
                        &start,
                        ExpressionKind::Update {
                            operator,
                            argument: Box::new(argument),
                            prefix: true,
                        },
                    );
                }
                PrefixOp::Unary(operator) => {
                    if operator == UnaryOperator::Delete {
                        if self.strict && is_local_variable_access(&argument) {
                            return self.raise_recoverable(
                                start.offset,
                                "Deleting local variable in strict mode",
                            );
                        }
                        if is_private_field_access(&argument) {
                            return self.raise_recoverable(
                                start.offset,
                                "Private fields can not be deleted",
                            );
                        }
                    }
                    saw_unary = true;
                    expr = self.expression(
                        &start,
                        ExpressionKind::Unary {
                            operator,
                            argument: Box::new(argument),
                        },
                    );
                }
            }
        } else if !saw_unary && matches!(self.lexer.peek_token()?, Token::PrivateIdentifier(_)) {
            // Only legal as the left operand of `in` inside a class body
            if for_init.forbids_in() || self.private_names.is_empty() {
                return self.unexpected();
            }
            expr = self.parse_private_ident()?;
            if !self.check_keyword(Keyword::In)? {
                return self.unexpected();
            }
        } else {
            expr = {
                let subscripted = self.parse_expr_subscripts(refs.as_deref_mut(), for_init)?;
                if Self::has_expression_errors(refs.as_deref()) {
                    return Ok(subscripted);
                }
                let mut result = subscripted;
                while let Some(operator) = postfix_operator(&self.peek()?) {
                    if self.can_insert_semicolon()? {
                        break;
                    }
                    self.check_lval_simple(&result, BindingKind::None, None)?;
                    self.next()?;
                    result = self.expression(
                        &start,
                        ExpressionKind::Update {
                            operator,
                            argument: Box::new(result),
                            prefix: false,
                        },
                    );
                }
                result
            };
        }

        if !inc_dec && self.check_punctuator(Punctuator::StarStar)? {
            if saw_unary {
                return self.unexpected_at(self.lexer.token_start);
            }
            self.next()?;
            let right = self.parse_maybe_unary(None, false, false, for_init)?;
            return Ok(self.expression(
                &start,
                ExpressionKind::Binary {
                    operator: BinaryOperator::Exp,
                    left: Box::new(expr),
                    right: Box::new(right),
                },
            ));
        }
        Ok(expr)
    }

    pub(crate) fn parse_expr_subscripts(
        &mut self,
        mut refs: Option<&mut DestructuringErrors>,
        for_init: ForInitCtx,
    ) -> Result<Expression, JsError> {
        let start = self.start()?;
        let atom = self.parse_expr_atom(refs.as_deref_mut(), for_init, false)?;

        // An arrow that wasn't produced from a parenthesized head has no
        // subscripts to take
        let skip_subscripts = matches!(atom.kind, ExpressionKind::Arrow { .. })
            && self
                .lexer
                .slice(Span::new(self.lexer.last_token_start, self.lexer.last_token_end))
                != ")";
        if Self::has_expression_errors(refs.as_deref()) || skip_subscripts {
            return Ok(atom);
        }

        let result = self.parse_subscripts(atom, start, false, for_init)?;
        if let Some(refs) = refs.as_deref_mut() {
            if matches!(result.kind, ExpressionKind::Member { .. }) {
                if refs
                    .parenthesized_assign
                    .map_or(false, |offset| offset >= result.span.start)
                {
                    refs.parenthesized_assign = None;
                }
                if refs
                    .parenthesized_bind
                    .map_or(false, |offset| offset >= result.span.start)
                {
                    refs.parenthesized_bind = None;
                }
                if refs
                    .trailing_comma
                    .map_or(false, |offset| offset >= result.span.start)
                {
                    refs.trailing_comma = None;
                }
            }
        }
        Ok(result)
    }

    pub(crate) fn parse_subscripts(
        &mut self,
        base: Expression,
        start: NodeStart,
        no_calls: bool,
        for_init: ForInitCtx,
    ) -> Result<Expression, JsError> {
        let base_is_async = self.options.ecma_version.supports(2017)
            && base.is_identifier_named("async")
            && self.lexer.last_token_end == base.span.end
            && base.span.end - base.span.start == 5
            && self.potential_arrow_at == Some(base.span.start);
        let maybe_async_arrow = base_is_async && !self.can_insert_semicolon()?;

        let mut base = base;
        let mut optional_chained = false;
        loop {
            match self.parse_subscript(
                base,
                &start,
                no_calls,
                maybe_async_arrow,
                optional_chained,
                for_init,
            )? {
                Subscript::Element(expr, optional) => {
                    if optional {
                        optional_chained = true;
                    }
                    base = expr;
                }
                Subscript::Done(expr) => {
                    let result = if optional_chained {
                        Expression {
                            span: expr.span,
                            loc: expr.loc.clone(),
                            kind: ExpressionKind::Chain {
                                expression: Box::new(expr),
                            },
                        }
                    } else {
                        expr
                    };
                    return Ok(result);
                }
            }
        }
    }

    fn parse_subscript(
        &mut self,
        base: Expression,
        start: &NodeStart,
        no_calls: bool,
        maybe_async_arrow: bool,
        optional_chained: bool,
        for_init: ForInitCtx,
    ) -> Result<Subscript, JsError> {
        let optional_supported = self.options.ecma_version.supports(2020);
        let optional = optional_supported && self.eat_punctuator(Punctuator::OptionalChain)?;
        if no_calls && optional {
            return self.raise(
                self.lexer.last_token_start,
                "Optional chaining cannot appear in the callee of new expressions",
            );
        }

        let computed = self.eat_punctuator(Punctuator::LBracket)?;
        let member_follows = computed
            || (optional
                && !self.check_punctuator(Punctuator::LParen)?
                && !self.check_punctuator(Punctuator::Backtick)?)
            || self.eat_punctuator(Punctuator::Dot)?;

        if member_follows {
            let property = if computed {
                let property = self.parse_expression(ForInitCtx::None, None)?;
                self.expect_punctuator(Punctuator::RBracket)?;
                property
            } else if matches!(self.lexer.peek_token()?, Token::PrivateIdentifier(_))
                && !matches!(base.kind, ExpressionKind::Super)
            {
                self.parse_private_ident()?
            } else {
                let id = self.parse_ident(true)?;
                ident_expr(id)
            };
            let expr = self.expression(
                start,
                ExpressionKind::Member {
                    object: Box::new(base),
                    property: Box::new(property),
                    computed,
                    optional,
                },
            );
            return Ok(Subscript::Element(expr, optional));
        }

        if !no_calls && self.check_punctuator(Punctuator::LParen)? {
            self.next()?; // (
            let old_yield = self.yield_pos.take();
            let old_await = self.await_pos.take();
            let old_await_ident = self.await_ident_pos.take();

            let mut refs = DestructuringErrors::new();
            let expr_list = self.parse_expr_list(
                Punctuator::RParen,
                self.options.ecma_version.supports(2017),
                false,
                Some(&mut refs),
            )?;

            if maybe_async_arrow && !optional && !self.can_insert_semicolon()? {
                if self.eat_punctuator(Punctuator::Arrow)? {
                    self.check_pattern_errors(Some(&refs), false)?;
                    self.check_yield_await_in_default_params()?;
                    if let Some(offset) = self.await_ident_pos {
                        return self.raise(
                            offset,
                            "Cannot use 'await' as identifier inside an async function",
                        );
                    }
                    self.yield_pos = old_yield;
                    self.await_pos = old_await;
                    self.await_ident_pos = old_await_ident;
                    let params = expr_list
                        .into_iter()
                        .flatten()
                        .map(ParamExpr::Expr)
                        .collect();
                    let arrow =
                        self.parse_arrow_expression(start.clone(), params, true, for_init)?;
                    return Ok(Subscript::Done(arrow));
                }
            }

            self.check_expression_errors(Some(&refs))?;
            self.yield_pos = old_yield.or(self.yield_pos);
            self.await_pos = old_await.or(self.await_pos);
            self.await_ident_pos = old_await_ident.or(self.await_ident_pos);

            let arguments = expr_list.into_iter().flatten().collect();
            let expr = self.expression(
                start,
                ExpressionKind::Call {
                    callee: Box::new(base),
                    arguments,
                    optional,
                },
            );
            return Ok(Subscript::Element(expr, optional));
        }

        if self.check_punctuator(Punctuator::Backtick)? {
            if optional || optional_chained {
                return self.raise(
                    self.lexer.token_start,
                    "Optional chaining cannot appear in the tag of tagged template expressions",
                );
            }
            let quasi = self.parse_template(true)?;
            let expr = self.expression(
                start,
                ExpressionKind::TaggedTemplate {
                    tag: Box::new(base),
                    quasi: Box::new(quasi),
                },
            );
            return Ok(Subscript::Element(expr, false));
        }

        Ok(Subscript::Done(base))
    }

    /// Terminal dispatch on the current token.
    fn parse_expr_atom(
        &mut self,
        mut refs: Option<&mut DestructuringErrors>,
        for_init: ForInitCtx,
        for_new: bool,
    ) -> Result<Expression, JsError> {
        let start = self.start()?;
        let can_be_arrow = self.potential_arrow_at == Some(start.offset);

        match self.peek()? {
            Token::Keyword(Keyword::Super) => {
                if !self.scope_stack.allow_super() && !self.options.allow_super_outside_method {
                    return self.raise(start.offset, "'super' keyword outside a method");
                }
                self.next()?;
                if self.check_punctuator(Punctuator::LParen)?
                    && !self.scope_stack.allow_direct_super()
                    && !self.options.allow_super_outside_method
                {
                    return self
                        .raise(start.offset, "super() call outside constructor of a subclass");
                }
                if !self.check_punctuator(Punctuator::Dot)?
                    && !self.check_punctuator(Punctuator::LBracket)?
                    && !self.check_punctuator(Punctuator::LParen)?
                {
                    return self.unexpected();
                }
                Ok(self.expression(&start, ExpressionKind::Super))
            }

            Token::Keyword(Keyword::This) => {
                self.next()?;
                Ok(self.expression(&start, ExpressionKind::This))
            }

            token if Self::token_is_name_like(&token) => {
                let contains_esc = self.peek_contains_esc()?;
                let id = self.parse_ident(false)?;

                // `async function` expression
                if self.options.ecma_version.supports(2017)
                    && id.name == "async"
                    && !contains_esc
                    && !self.can_insert_semicolon()?
                    && self.eat_keyword(Keyword::Function)?
                {
                    return self.parse_function_expression_rest(start, true);
                }

                if can_be_arrow {
                    if !self.can_insert_semicolon()? && self.check_punctuator(Punctuator::Arrow)? {
                        self.next()?;
                        return self.parse_arrow_expression(
                            start,
                            vec![ParamExpr::Expr(ident_expr(id))],
                            false,
                            for_init,
                        );
                    }
                    // `async x => ...`
                    if self.options.ecma_version.supports(2017)
                        && id.name == "async"
                        && !contains_esc
                        && Self::token_is_name_like(&self.peek()?)
                    {
                        let for_await_of_guard = self.potential_arrow_in_for_await
                            && self.is_contextual("of")?
                            && !self.peek_contains_esc()?;
                        if !for_await_of_guard {
                            let param = self.parse_ident(false)?;
                            if self.can_insert_semicolon()?
                                || !self.eat_punctuator(Punctuator::Arrow)?
                            {
                                return self.unexpected();
                            }
                            return self.parse_arrow_expression(
                                start,
                                vec![ParamExpr::Expr(ident_expr(param))],
                                true,
                                for_init,
                            );
                        }
                    }
                }

                Ok(ident_expr(id))
            }

            Token::Number(_) | Token::String(_) | Token::BigIntLiteral(_) => {
                self.parse_literal_token()
            }

            Token::Keyword(Keyword::True) | Token::Keyword(Keyword::False) => {
                let value = self.check_keyword(Keyword::True)?;
                self.next()?;
                let raw = if value { "true" } else { "false" };
                Ok(self.expression(
                    &start,
                    ExpressionKind::Literal {
                        value: LiteralValue::Boolean(value),
                        raw: raw.to_string(),
                    },
                ))
            }

            Token::Keyword(Keyword::Null) => {
                self.next()?;
                Ok(self.expression(
                    &start,
                    ExpressionKind::Literal {
                        value: LiteralValue::Null,
                        raw: "null".to_string(),
                    },
                ))
            }

            // The tokenizer classifies `/` as division; atom position means
            // it must be a regexp, so re-scan it as one
            Token::Punctuator(Punctuator::Slash) | Token::Punctuator(Punctuator::SlashEq) => {
                let (pattern, flags) = self.lexer.rescan_as_regexp()?;
                let raw = self
                    .lexer
                    .slice(Span::new(self.lexer.last_token_start, self.lexer.last_token_end));
                Ok(self.expression(
                    &start,
                    ExpressionKind::Literal {
                        value: LiteralValue::Regex { pattern, flags },
                        raw,
                    },
                ))
            }

            Token::Punctuator(Punctuator::LParen) => {
                let expr = self.parse_paren_and_distinguish(can_be_arrow, for_init)?;
                if let Some(refs) = refs.as_deref_mut() {
                    if refs.parenthesized_assign.is_none() && !is_simple_assign_target(&expr) {
                        refs.parenthesized_assign = Some(start.offset);
                    }
                    if refs.parenthesized_bind.is_none() {
                        refs.parenthesized_bind = Some(start.offset);
                    }
                }
                Ok(expr)
            }

            Token::Punctuator(Punctuator::LBracket) => {
                self.next()?;
                let elements = self.parse_expr_list(
                    Punctuator::RBracket,
                    true,
                    true,
                    refs.as_deref_mut(),
                )?;
                Ok(self.expression(&start, ExpressionKind::Array { elements }))
            }

            Token::Punctuator(Punctuator::LBrace) => self.parse_object_literal(refs),

            Token::Keyword(Keyword::Function) => {
                self.next()?;
                self.parse_function_expression_rest(start, false)
            }

            Token::Keyword(Keyword::Class) => self.parse_class_expression(),

            Token::Keyword(Keyword::New) => self.parse_new(),

            Token::Punctuator(Punctuator::Backtick) => self.parse_template(false),

            Token::Keyword(Keyword::Import) => {
                if self.options.ecma_version.supports(2020) {
                    self.parse_expr_import(for_new)
                } else {
                    self.unexpected()
                }
            }

            _ => self.unexpected(),
        }
    }

    pub(crate) fn parse_literal_token(&mut self) -> Result<Expression, JsError> {
        let start = self.start()?;
        let token = self.next()?;
        let raw = self
            .lexer
            .slice(Span::new(self.lexer.last_token_start, self.lexer.last_token_end));
        let value = match token {
            Token::Number(n) => {
                if self.strict && self.lexer.octal_position.is_some() {
                    return self.raise_recoverable(start.offset, "Invalid number");
                }
                LiteralValue::Number(n)
            }
            Token::String(s) => {
                if self.strict {
                    if let Some(offset) = self.lexer.octal_position {
                        return self.raise_recoverable(offset, "Octal literal in strict mode");
                    }
                }
                LiteralValue::String(s)
            }
            Token::BigIntLiteral(digits) => LiteralValue::BigInt(parse_bigint(&digits)),
            _ => return self.unexpected_at(start.offset),
        };
        Ok(self.expression(&start, ExpressionKind::Literal { value, raw }))
    }

    /// Parse `(...)`, deciding between a grouped expression, a sequence, and
    /// an arrow-function parameter list.
    fn parse_paren_and_distinguish(
        &mut self,
        can_be_arrow: bool,
        for_init: ForInitCtx,
    ) -> Result<Expression, JsError> {
        let start = self.start()?;
        self.next()?; // (
        let inner_start = self.start()?;

        let mut items: Vec<ParamExpr> = Vec::new();
        let mut first = true;
        let mut last_is_comma = false;
        let mut spread_start: Option<usize> = None;
        let mut refs = DestructuringErrors::new();
        let old_yield = self.yield_pos.take();
        let old_await = self.await_pos.take();
        let allow_trailing_comma = self.options.ecma_version.supports(2017);

        while !self.check_punctuator(Punctuator::RParen)? {
            if first {
                first = false;
            } else {
                self.expect_punctuator(Punctuator::Comma)?;
            }
            if allow_trailing_comma && self.check_punctuator(Punctuator::RParen)? {
                let offset = self.lexer.last_token_start;
                let pos = self.lexer.last_token_start_pos.clone();
                if let Some(handler) = self.options.on_trailing_comma.as_mut() {
                    handler(offset, &pos);
                }
                last_is_comma = true;
                break;
            }
            if self.check_punctuator(Punctuator::Spread)? {
                spread_start = Some(self.lexer.token_start);
                let rest = self.parse_rest_binding()?;
                items.push(ParamExpr::Pattern(rest));
                if self.check_punctuator(Punctuator::Comma)? {
                    return self.raise(
                        self.lexer.token_start,
                        "Comma is not permitted after the rest element",
                    );
                }
                break;
            }
            items.push(ParamExpr::Expr(
                self.parse_maybe_assign(ForInitCtx::None, Some(&mut refs))?,
            ));
        }

        let inner_end = self.lexer.last_token_end;
        let inner_end_pos = self.lexer.last_token_end_pos.clone();
        self.expect_punctuator(Punctuator::RParen)?;

        if can_be_arrow && !self.can_insert_semicolon()? && self.eat_punctuator(Punctuator::Arrow)?
        {
            self.check_pattern_errors(Some(&refs), false)?;
            self.check_yield_await_in_default_params()?;
            self.yield_pos = old_yield;
            self.await_pos = old_await;
            return self.parse_arrow_expression(start, items, false, for_init);
        }

        if items.is_empty() || last_is_comma {
            return self.unexpected_at(self.lexer.last_token_start);
        }
        if let Some(offset) = spread_start {
            return self.unexpected_at(offset);
        }
        self.check_expression_errors(Some(&refs))?;
        self.yield_pos = old_yield.or(self.yield_pos);
        self.await_pos = old_await.or(self.await_pos);

        let mut exprs: Vec<Expression> = items
            .into_iter()
            .map(|item| match item {
                ParamExpr::Expr(expr) => expr,
                ParamExpr::Pattern(_) => unreachable!("rest entries bail out above"),
            })
            .collect();
        let value = if exprs.len() > 1 {
            let (span, loc) = self.finish_span_at(&inner_start, inner_end, &inner_end_pos);
            Expression {
                kind: ExpressionKind::Sequence { expressions: exprs },
                span,
                loc,
            }
        } else {
            exprs.pop().expect("non-empty checked above")
        };

        if self.options.preserve_parens {
            Ok(self.expression(
                &start,
                ExpressionKind::Paren {
                    expression: Box::new(value),
                },
            ))
        } else {
            Ok(value)
        }
    }

    /// Build an arrow function from a prepared parameter list.
    pub(crate) fn parse_arrow_expression(
        &mut self,
        start: NodeStart,
        items: Vec<ParamExpr>,
        is_async: bool,
        for_init: ForInitCtx,
    ) -> Result<Expression, JsError> {
        let old_yield = self.yield_pos.take();
        let old_await = self.await_pos.take();
        let old_await_ident = self.await_ident_pos.take();

        self.scope_stack
            .enter(function_flags(is_async, false) | ScopeFlags::ARROW);
        let tail = self.parse_arrow_tail(items, for_init, start.offset);
        self.scope_stack.exit();

        self.yield_pos = old_yield;
        self.await_pos = old_await;
        self.await_ident_pos = old_await_ident;

        let (params, body) = tail?;
        Ok(self.expression(
            &start,
            ExpressionKind::Arrow {
                params,
                body,
                is_async,
            },
        ))
    }

    fn parse_arrow_tail(
        &mut self,
        items: Vec<ParamExpr>,
        for_init: ForInitCtx,
        arrow_start: usize,
    ) -> Result<(Vec<Pattern>, ArrowFunctionBody), JsError> {
        let count = items.len();
        let mut params = Vec::with_capacity(count);
        for (index, item) in items.into_iter().enumerate() {
            let pattern = match item {
                ParamExpr::Expr(expr) => self.to_assignable(expr, true, None)?,
                ParamExpr::Pattern(pattern) => pattern,
            };
            if matches!(pattern.kind, PatternKind::Rest { .. }) && index + 1 < count {
                return self.raise(pattern.span.start, "Rest element must be last element");
            }
            params.push(pattern);
        }
        self.check_params(&params, false)?;

        let body = if self.check_punctuator(Punctuator::LBrace)? {
            let block = self.parse_function_block_body(&params, None, arrow_start)?;
            ArrowFunctionBody::Block(Box::new(block))
        } else {
            let expr = self.parse_maybe_assign(for_init, None)?;
            ArrowFunctionBody::Expression(Box::new(expr))
        };
        Ok((params, body))
    }

    fn parse_yield(&mut self, for_init: ForInitCtx) -> Result<Expression, JsError> {
        let start = self.start()?;
        if self.yield_pos.is_none() {
            self.yield_pos = Some(start.offset);
        }
        self.next()?; // yield

        let (delegate, argument) = if self.check_punctuator(Punctuator::Semicolon)?
            || self.can_insert_semicolon()?
            || (!self.check_punctuator(Punctuator::Star)?
                && !token_starts_expr(self.lexer.peek_token()?))
        {
            (false, None)
        } else {
            let delegate = self.eat_punctuator(Punctuator::Star)?;
            let argument = self.parse_maybe_assign(for_init, None)?;
            (delegate, Some(Box::new(argument)))
        };
        Ok(self.expression(&start, ExpressionKind::Yield { argument, delegate }))
    }

    fn parse_await(&mut self, for_init: ForInitCtx) -> Result<Expression, JsError> {
        let start = self.start()?;
        if self.await_pos.is_none() {
            self.await_pos = Some(start.offset);
        }
        self.next()?; // await
        let argument = self.parse_maybe_unary(None, true, false, for_init)?;
        Ok(self.expression(
            &start,
            ExpressionKind::Await {
                argument: Box::new(argument),
            },
        ))
    }

    /// `new expr(...)` and `new.target`.
    fn parse_new(&mut self) -> Result<Expression, JsError> {
        let start = self.start()?;
        let meta = self.parse_ident(true)?;

        if self.options.ecma_version.supports(2015) && self.eat_punctuator(Punctuator::Dot)? {
            let escaped = self.peek_contains_esc()?;
            let property = self.parse_ident(true)?;
            if property.name != "target" {
                return self.raise_recoverable(
                    property.span.start,
                    "The only valid meta property for new is 'new.target'",
                );
            }
            if escaped {
                return self.raise_recoverable(
                    property.span.start,
                    "'new.target' must not contain escaped characters",
                );
            }
            if !self.scope_stack.allow_new_target() {
                return self.raise(
                    start.offset,
                    "'new.target' can only be used in functions and class static block",
                );
            }
            return Ok(self.expression(&start, ExpressionKind::MetaProperty { meta, property }));
        }

        let callee_start = self.start()?;
        let atom = self.parse_expr_atom(None, ForInitCtx::None, true)?;
        let callee = self.parse_subscripts(atom, callee_start, true, ForInitCtx::None)?;
        if matches!(callee.kind, ExpressionKind::Import { .. }) {
            return self.raise(callee.span.start, "Cannot use new with import()");
        }

        let arguments = if self.check_punctuator(Punctuator::LParen)? {
            self.next()?;
            let list = self.parse_expr_list(
                Punctuator::RParen,
                self.options.ecma_version.supports(2017),
                false,
                None,
            )?;
            list.into_iter().flatten().collect()
        } else {
            Vec::new()
        };
        Ok(self.expression(
            &start,
            ExpressionKind::New {
                callee: Box::new(callee),
                arguments,
            },
        ))
    }

    /// Dynamic `import(...)` and `import.meta`.
    fn parse_expr_import(&mut self, for_new: bool) -> Result<Expression, JsError> {
        let start = self.start()?;
        let meta = self.parse_ident(true)?;

        if self.check_punctuator(Punctuator::LParen)? {
            if for_new {
                return self.raise(start.offset, "Cannot use new with import()");
            }
            self.next()?; // (
            let source = self.parse_maybe_assign(ForInitCtx::None, None)?;
            if !self.eat_punctuator(Punctuator::RParen)? {
                let error_offset = self.lexer.token_start;
                if self.eat_punctuator(Punctuator::Comma)?
                    && self.eat_punctuator(Punctuator::RParen)?
                {
                    return self.raise_recoverable(
                        error_offset,
                        "Trailing comma is not allowed in import()",
                    );
                }
                return self.unexpected_at(error_offset);
            }
            return Ok(self.expression(
                &start,
                ExpressionKind::Import {
                    source: Box::new(source),
                },
            ));
        }

        if self.eat_punctuator(Punctuator::Dot)? {
            let escaped = self.peek_contains_esc()?;
            let property = self.parse_ident(true)?;
            if property.name != "meta" {
                return self.raise_recoverable(
                    property.span.start,
                    "The only valid meta property for import is 'import.meta'",
                );
            }
            if escaped {
                return self.raise_recoverable(
                    property.span.start,
                    "'import.meta' must not contain escaped characters",
                );
            }
            if !self.in_module && !self.options.allow_import_export_everywhere {
                return self.raise_recoverable(
                    start.offset,
                    "Cannot use 'import.meta' outside a module",
                );
            }
            return Ok(self.expression(&start, ExpressionKind::MetaProperty { meta, property }));
        }

        self.unexpected()
    }

    /// A template literal; the lexer produces the parts on demand.
    pub(crate) fn parse_template(&mut self, is_tagged: bool) -> Result<Expression, JsError> {
        let start = self.start()?;
        self.next()?; // backtick
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();

        loop {
            let part = self.lexer.read_template_part()?;
            if !is_tagged {
                if let Some(pos) = part.invalid_escape {
                    return Err(syntax_error(
                        "Invalid escape sequence in template string",
                        Some(pos),
                    ));
                }
            }
            let tail = part.tail;
            quasis.push(TemplateElement {
                raw: part.raw,
                cooked: part.cooked,
                tail,
                span: part.span,
                loc: self.options.locations.then(|| part.loc.clone()),
            });
            if tail {
                break;
            }
            expressions.push(self.parse_expression(ForInitCtx::None, None)?);
            if !self.check_punctuator(Punctuator::RBrace)? {
                return self.unexpected();
            }
            self.next()?; // }
        }

        Ok(self.expression(
            &start,
            ExpressionKind::TemplateLiteral {
                quasis,
                expressions,
            },
        ))
    }

    /// Object literal (the binding-pattern form has its own parser).
    pub(crate) fn parse_object_literal(
        &mut self,
        mut refs: Option<&mut DestructuringErrors>,
    ) -> Result<Expression, JsError> {
        let start = self.start()?;
        self.next()?; // {
        let mut properties = Vec::new();
        let mut first = true;
        let mut seen_proto = false;

        while !self.eat_punctuator(Punctuator::RBrace)? {
            if first {
                first = false;
            } else {
                self.expect_punctuator(Punctuator::Comma)?;
                if self.after_trailing_comma(Punctuator::RBrace)? {
                    break;
                }
            }
            let member = self.parse_object_member(refs.as_deref_mut())?;
            self.check_prop_clash(&member, &mut seen_proto, refs.as_deref_mut())?;
            properties.push(member);
        }
        Ok(self.expression(&start, ExpressionKind::Object { properties }))
    }

    fn parse_object_member(
        &mut self,
        mut refs: Option<&mut DestructuringErrors>,
    ) -> Result<ObjectMember, JsError> {
        let start = self.start()?;

        if self.options.ecma_version.supports(2018) && self.eat_punctuator(Punctuator::Spread)? {
            let argument = self.parse_maybe_assign(ForInitCtx::None, refs.as_deref_mut())?;
            if self.check_punctuator(Punctuator::Comma)? {
                if let Some(refs) = refs.as_deref_mut() {
                    if refs.trailing_comma.is_none() {
                        refs.trailing_comma = Some(self.lexer.token_start);
                    }
                }
            }
            let (span, loc) = self.finish_span(&start);
            return Ok(ObjectMember::Spread {
                argument: Box::new(argument),
                span,
                loc,
            });
        }

        let mut is_generator = self.eat_punctuator(Punctuator::Star)?;
        let contains_esc = self.peek_contains_esc()?;
        let (mut key, mut computed) = self.parse_property_name()?;

        // `async` seen as key but a real name follows: an async method
        let mut is_async = false;
        if !is_generator
            && !contains_esc
            && self.options.ecma_version.supports(2017)
            && !computed
            && key.is_identifier_named("async")
            && !self.lexer.line_terminator_before_token
            && property_name_can_follow(self.lexer.peek_token()?)
        {
            is_async = true;
            is_generator = self.options.ecma_version.supports(2018)
                && self.eat_punctuator(Punctuator::Star)?;
            let (real_key, real_computed) = self.parse_property_name()?;
            key = real_key;
            computed = real_computed;
        }

        let property =
            self.parse_property_value(start, key, computed, is_generator, is_async, contains_esc, refs)?;
        Ok(ObjectMember::Property(property))
    }

    /// Property name: `[computed]`, a literal, or an identifier.
    pub(crate) fn parse_property_name(&mut self) -> Result<(Expression, bool), JsError> {
        if self.options.ecma_version.supports(2015) && self.eat_punctuator(Punctuator::LBracket)? {
            let key = self.parse_maybe_assign(ForInitCtx::None, None)?;
            self.expect_punctuator(Punctuator::RBracket)?;
            return Ok((key, true));
        }
        let key = match self.lexer.peek_token()? {
            Token::Number(_) | Token::String(_) | Token::BigIntLiteral(_) => {
                self.parse_literal_token()?
            }
            _ => ident_expr(self.parse_ident(true)?),
        };
        Ok((key, false))
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_property_value(
        &mut self,
        start: NodeStart,
        key: Expression,
        computed: bool,
        is_generator: bool,
        is_async: bool,
        contains_esc: bool,
        refs: Option<&mut DestructuringErrors>,
    ) -> Result<Property, JsError> {
        if (is_generator || is_async) && self.check_punctuator(Punctuator::Colon)? {
            return self.unexpected();
        }

        if self.eat_punctuator(Punctuator::Colon)? {
            let value = self.parse_maybe_assign(ForInitCtx::None, refs)?;
            let (span, loc) = self.finish_span(&start);
            return Ok(Property {
                key,
                value,
                kind: PropertyKind::Init,
                is_method: false,
                shorthand: false,
                computed,
                span,
                loc,
            });
        }

        if self.check_punctuator(Punctuator::LParen)? {
            let function = self.parse_method(is_generator, is_async, false)?;
            let value = function_expr(function);
            let (span, loc) = self.finish_span(&start);
            return Ok(Property {
                key,
                value,
                kind: PropertyKind::Init,
                is_method: true,
                shorthand: false,
                computed,
                span,
                loc,
            });
        }

        // `get name() {}` / `set name(v) {}`
        let accessor_kind = if !computed && !contains_esc && !is_generator && !is_async {
            if key.is_identifier_named("get") && property_name_can_follow(self.lexer.peek_token()?)
            {
                Some(PropertyKind::Get)
            } else if key.is_identifier_named("set")
                && property_name_can_follow(self.lexer.peek_token()?)
            {
                Some(PropertyKind::Set)
            } else {
                None
            }
        } else {
            None
        };
        if let Some(kind) = accessor_kind {
            let (real_key, real_computed) = self.parse_property_name()?;
            let function = self.parse_method(false, false, false)?;
            self.check_accessor_arity(kind, &function)?;
            let value = function_expr(function);
            let (span, loc) = self.finish_span(&start);
            return Ok(Property {
                key: real_key,
                value,
                kind,
                is_method: false,
                shorthand: false,
                computed: real_computed,
                span,
                loc,
            });
        }

        // Shorthand property
        if let ExpressionKind::Identifier { name } = &key.kind {
            let name = name.clone();
            if !computed {
                self.check_unreserved(&name, contains_esc, key.span.start)?;
                let value = if self.check_punctuator(Punctuator::Assign)? {
                    // A default in an object literal only makes sense when the
                    // literal becomes a destructuring pattern; remember where
                    if let Some(refs) = refs {
                        if refs.shorthand_assign.is_none() {
                            refs.shorthand_assign = Some(self.lexer.token_start);
                        }
                    }
                    self.next()?; // =
                    let right = self.parse_maybe_assign(ForInitCtx::None, None)?;
                    let (span, loc) = self.finish_span(&start);
                    Expression {
                        kind: ExpressionKind::Assignment {
                            operator: AssignmentOperator::Assign,
                            left: AssignmentTarget::Expression(Box::new(key.clone())),
                            right: Box::new(right),
                        },
                        span,
                        loc,
                    }
                } else {
                    key.clone()
                };
                let (span, loc) = self.finish_span(&start);
                return Ok(Property {
                    key,
                    value,
                    kind: PropertyKind::Init,
                    is_method: false,
                    shorthand: true,
                    computed: false,
                    span,
                    loc,
                });
            }
        }

        self.unexpected()
    }

    pub(crate) fn check_accessor_arity(
        &mut self,
        kind: PropertyKind,
        function: &Function,
    ) -> Result<(), JsError> {
        match kind {
            PropertyKind::Get if !function.params.is_empty() => {
                self.raise_recoverable(function.span.start, "getter should have no params")
            }
            PropertyKind::Set if function.params.len() != 1 => {
                self.raise_recoverable(function.span.start, "setter should have exactly one param")
            }
            PropertyKind::Set
                if matches!(function.params[0].kind, PatternKind::Rest { .. }) =>
            {
                self.raise_recoverable(
                    function.params[0].span.start,
                    "Setter cannot use rest params",
                )
            }
            _ => Ok(()),
        }
    }

    /// At most one non-computed `__proto__: value` per object literal.
    fn check_prop_clash(
        &mut self,
        member: &ObjectMember,
        seen_proto: &mut bool,
        refs: Option<&mut DestructuringErrors>,
    ) -> Result<(), JsError> {
        let ObjectMember::Property(prop) = member else {
            return Ok(());
        };
        if prop.computed || prop.is_method || prop.shorthand || prop.kind != PropertyKind::Init {
            return Ok(());
        }
        let is_proto = match &prop.key.kind {
            ExpressionKind::Identifier { name } => name == "__proto__",
            ExpressionKind::Literal {
                value: LiteralValue::String(s),
                ..
            } => s == "__proto__",
            _ => false,
        };
        if !is_proto {
            return Ok(());
        }
        if *seen_proto {
            match refs {
                Some(refs) => {
                    if refs.double_proto.is_none() {
                        refs.double_proto = Some(prop.key.span.start);
                    }
                }
                None => {
                    return self
                        .raise_recoverable(prop.key.span.start, "Redefinition of __proto__ property")
                }
            }
        }
        *seen_proto = true;
        Ok(())
    }

    /// `#name` reference; recorded for resolution at class-body exit.
    pub(crate) fn parse_private_ident(&mut self) -> Result<Expression, JsError> {
        let start = self.start()?;
        let name = match self.peek()? {
            Token::PrivateIdentifier(name) => name,
            _ => return self.unexpected(),
        };
        self.next()?;
        let expr = self.expression(&start, ExpressionKind::PrivateIdentifier { name: name.clone() });

        if self.private_names.is_empty() {
            return self.raise(
                expr.span.start,
                format!("Private field '#{}' must be declared in an enclosing class", name),
            );
        }
        let pos = self.lexer.position_of_offset(expr.span.start);
        self.private_names.use_name(&name, pos);
        Ok(expr)
    }

    /// Comma-separated expression list up to `close`; `None` entries are
    /// array holes.
    pub(crate) fn parse_expr_list(
        &mut self,
        close: Punctuator,
        allow_trailing_comma: bool,
        allow_empty: bool,
        mut refs: Option<&mut DestructuringErrors>,
    ) -> Result<Vec<Option<Expression>>, JsError> {
        let mut elements = Vec::new();
        let mut first = true;
        while !self.eat_punctuator(close)? {
            if first {
                first = false;
            } else {
                self.expect_punctuator(Punctuator::Comma)?;
                if allow_trailing_comma && self.after_trailing_comma(close)? {
                    break;
                }
            }

            if allow_empty && self.check_punctuator(Punctuator::Comma)? {
                elements.push(None);
            } else if self.check_punctuator(Punctuator::Spread)? {
                let spread = self.parse_spread(refs.as_deref_mut())?;
                if self.check_punctuator(Punctuator::Comma)? {
                    if let Some(refs) = refs.as_deref_mut() {
                        if refs.trailing_comma.is_none() {
                            refs.trailing_comma = Some(self.lexer.token_start);
                        }
                    }
                }
                elements.push(Some(spread));
            } else {
                elements.push(Some(
                    self.parse_maybe_assign(ForInitCtx::None, refs.as_deref_mut())?,
                ));
            }
        }
        Ok(elements)
    }

    fn parse_spread(
        &mut self,
        refs: Option<&mut DestructuringErrors>,
    ) -> Result<Expression, JsError> {
        let start = self.start()?;
        self.next()?; // ...
        let argument = self.parse_maybe_assign(ForInitCtx::None, refs)?;
        Ok(self.expression(
            &start,
            ExpressionKind::Spread {
                argument: Box::new(argument),
            },
        ))
    }

    fn check_assignment_operator(&mut self) -> Result<Option<AssignmentOperator>, JsError> {
        let op = match self.lexer.peek_token()? {
            Token::Punctuator(p) => assignment_operator(*p),
            _ => None,
        };
        if let Some(op) = op {
            if matches!(
                op,
                AssignmentOperator::LogicalAndAssign
                    | AssignmentOperator::LogicalOrAssign
                    | AssignmentOperator::NullishCoalesceAssign
            ) && !self.options.ecma_version.supports(2021)
            {
                return Ok(None);
            }
        }
        Ok(op)
    }

    fn top_level_await_allowed(&self) -> bool {
        self.options.allow_await_outside_function
            || (self.in_module && self.options.ecma_version.supports(2022))
    }

    pub(crate) fn finish_loc_end(&self) -> core_types::SourcePosition {
        self.lexer.last_token_end_pos.clone()
    }
}

fn active_refs<'r>(
    refs: &'r mut Option<&mut DestructuringErrors>,
    own: &'r mut DestructuringErrors,
) -> &'r mut DestructuringErrors {
    match refs.as_deref_mut() {
        Some(outer) => outer,
        None => own,
    }
}

/// Wrap an [`Identifier`] node as an identifier expression
pub(crate) fn ident_expr(id: Identifier) -> Expression {
    Expression {
        kind: ExpressionKind::Identifier { name: id.name },
        span: id.span,
        loc: id.loc,
    }
}

/// Wrap a parsed [`Function`] as a function expression
pub(crate) fn function_expr(function: Function) -> Expression {
    Expression {
        span: function.span,
        loc: function.loc.clone(),
        kind: ExpressionKind::Function(function),
    }
}

fn is_simple_assign_target(expr: &Expression) -> bool {
    match &expr.kind {
        ExpressionKind::Paren { expression } => is_simple_assign_target(expression),
        ExpressionKind::Identifier { .. } | ExpressionKind::Member { .. } => true,
        _ => false,
    }
}

fn is_local_variable_access(expr: &Expression) -> bool {
    match &expr.kind {
        ExpressionKind::Identifier { .. } => true,
        ExpressionKind::Paren { expression } => is_local_variable_access(expression),
        _ => false,
    }
}

fn is_private_field_access(expr: &Expression) -> bool {
    match &expr.kind {
        ExpressionKind::Member { property, .. } => {
            matches!(property.kind, ExpressionKind::PrivateIdentifier { .. })
        }
        ExpressionKind::Chain { expression } => is_private_field_access(expression),
        ExpressionKind::Paren { expression } => is_private_field_access(expression),
        _ => false,
    }
}

/// Binary/logical operator precedence, 1 (lowest) to 10
fn binop_prec(token: &Token) -> Option<i32> {
    use Punctuator::*;
    Some(match token {
        Token::Punctuator(p) => match p {
            NullishCoalesce | OrOr => 1,
            AndAnd => 2,
            Or => 3,
            Xor => 4,
            And => 5,
            EqEq | NotEq | EqEqEq | NotEqEq => 6,
            Lt | Gt | LtEq | GtEq => 7,
            LtLt | GtGt | GtGtGt => 8,
            Plus | Minus => 9,
            Star | Slash | Percent => 10,
            _ => return None,
        },
        Token::Keyword(Keyword::In) | Token::Keyword(Keyword::Instanceof) => 7,
        _ => return None,
    })
}

fn build_binary(
    left_start: &NodeStart,
    end: usize,
    end_pos: &core_types::SourcePosition,
    locations: bool,
    left: Expression,
    right: Expression,
    token: &Token,
) -> Expression {
    let span = Span::new(left_start.offset, end);
    let loc = locations.then(|| core_types::SourceSpan {
        start: left_start.pos.clone(),
        end: end_pos.clone(),
    });
    let kind = match token {
        Token::Punctuator(Punctuator::OrOr) => ExpressionKind::Logical {
            operator: LogicalOperator::Or,
            left: Box::new(left),
            right: Box::new(right),
        },
        Token::Punctuator(Punctuator::AndAnd) => ExpressionKind::Logical {
            operator: LogicalOperator::And,
            left: Box::new(left),
            right: Box::new(right),
        },
        Token::Punctuator(Punctuator::NullishCoalesce) => ExpressionKind::Logical {
            operator: LogicalOperator::NullishCoalesce,
            left: Box::new(left),
            right: Box::new(right),
        },
        token => ExpressionKind::Binary {
            operator: binary_operator(token),
            left: Box::new(left),
            right: Box::new(right),
        },
    };
    Expression { kind, span, loc }
}

fn binary_operator(token: &Token) -> BinaryOperator {
    use Punctuator::*;
    match token {
        Token::Keyword(Keyword::In) => BinaryOperator::In,
        Token::Keyword(Keyword::Instanceof) => BinaryOperator::Instanceof,
        Token::Punctuator(p) => match p {
            Plus => BinaryOperator::Add,
            Minus => BinaryOperator::Sub,
            Star => BinaryOperator::Mul,
            Slash => BinaryOperator::Div,
            Percent => BinaryOperator::Mod,
            EqEq => BinaryOperator::Eq,
            NotEq => BinaryOperator::NotEq,
            EqEqEq => BinaryOperator::StrictEq,
            NotEqEq => BinaryOperator::StrictNotEq,
            Lt => BinaryOperator::Lt,
            LtEq => BinaryOperator::LtEq,
            Gt => BinaryOperator::Gt,
            GtEq => BinaryOperator::GtEq,
            And => BinaryOperator::BitwiseAnd,
            Or => BinaryOperator::BitwiseOr,
            Xor => BinaryOperator::BitwiseXor,
            LtLt => BinaryOperator::LeftShift,
            GtGt => BinaryOperator::RightShift,
            GtGtGt => BinaryOperator::UnsignedRightShift,
            _ => unreachable!("not a binary operator token"),
        },
        _ => unreachable!("not a binary operator token"),
    }
}

fn assignment_operator(p: Punctuator) -> Option<AssignmentOperator> {
    use Punctuator::*;
    Some(match p {
        Assign => AssignmentOperator::Assign,
        PlusEq => AssignmentOperator::AddAssign,
        MinusEq => AssignmentOperator::SubAssign,
        StarEq => AssignmentOperator::MulAssign,
        SlashEq => AssignmentOperator::DivAssign,
        PercentEq => AssignmentOperator::ModAssign,
        StarStarEq => AssignmentOperator::ExpAssign,
        AndEq => AssignmentOperator::BitAndAssign,
        OrEq => AssignmentOperator::BitOrAssign,
        XorEq => AssignmentOperator::BitXorAssign,
        LtLtEq => AssignmentOperator::LeftShiftAssign,
        GtGtEq => AssignmentOperator::RightShiftAssign,
        GtGtGtEq => AssignmentOperator::UnsignedRightShiftAssign,
        AndAndEq => AssignmentOperator::LogicalAndAssign,
        OrOrEq => AssignmentOperator::LogicalOrAssign,
        NullishCoalesceEq => AssignmentOperator::NullishCoalesceAssign,
        _ => return None,
    })
}

enum PrefixOp {
    Unary(UnaryOperator),
    Update(UpdateOperator),
}

fn prefix_operator(token: &Token) -> Option<PrefixOp> {
    use Punctuator::*;
    Some(match token {
        Token::Punctuator(PlusPlus) => PrefixOp::Update(UpdateOperator::Increment),
        Token::Punctuator(MinusMinus) => PrefixOp::Update(UpdateOperator::Decrement),
        Token::Punctuator(Not) => PrefixOp::Unary(UnaryOperator::Not),
        Token::Punctuator(Tilde) => PrefixOp::Unary(UnaryOperator::BitwiseNot),
        Token::Punctuator(Plus) => PrefixOp::Unary(UnaryOperator::Plus),
        Token::Punctuator(Minus) => PrefixOp::Unary(UnaryOperator::Minus),
        Token::Keyword(Keyword::Typeof) => PrefixOp::Unary(UnaryOperator::Typeof),
        Token::Keyword(Keyword::Void) => PrefixOp::Unary(UnaryOperator::Void),
        Token::Keyword(Keyword::Delete) => PrefixOp::Unary(UnaryOperator::Delete),
        _ => return None,
    })
}

fn postfix_operator(token: &Token) -> Option<UpdateOperator> {
    match token {
        Token::Punctuator(Punctuator::PlusPlus) => Some(UpdateOperator::Increment),
        Token::Punctuator(Punctuator::MinusMinus) => Some(UpdateOperator::Decrement),
        _ => None,
    }
}

/// Parse the digits of a BigInt literal (radix prefix included) exactly.
fn parse_bigint(digits: &str) -> BigInt {
    let (radix, rest) = if let Some(rest) = digits.strip_prefix("0x") {
        (16, rest)
    } else if let Some(rest) = digits.strip_prefix("0o") {
        (8, rest)
    } else if let Some(rest) = digits.strip_prefix("0b") {
        (2, rest)
    } else {
        (10, digits)
    };
    BigInt::parse_bytes(rest.as_bytes(), radix).unwrap_or_default()
}

/// Can this token begin an expression?
pub(crate) fn token_starts_expr(token: &Token) -> bool {
    use Punctuator::*;
    match token {
        Token::Identifier(..)
        | Token::PrivateIdentifier(_)
        | Token::Number(_)
        | Token::BigIntLiteral(_)
        | Token::String(_)
        | Token::Regex { .. } => true,
        Token::Keyword(k) => matches!(
            k,
            Keyword::This
                | Keyword::Super
                | Keyword::Function
                | Keyword::Class
                | Keyword::New
                | Keyword::Typeof
                | Keyword::Void
                | Keyword::Delete
                | Keyword::Import
                | Keyword::True
                | Keyword::False
                | Keyword::Null
                | Keyword::Async
                | Keyword::Await
                | Keyword::Yield
                | Keyword::Let
                | Keyword::Static
        ),
        Token::Punctuator(p) => matches!(
            p,
            LParen | LBracket | LBrace | Backtick | Not | Tilde | Plus | Minus | PlusPlus
                | MinusMinus | Slash | SlashEq
        ),
        Token::EOF => false,
    }
}

/// Can this token continue as a property name (after `async`, `get`, `set`,
/// `static`, or `*`)?
pub(crate) fn property_name_can_follow(token: &Token) -> bool {
    matches!(
        token,
        Token::Identifier(..)
            | Token::Keyword(_)
            | Token::Number(_)
            | Token::String(_)
            | Token::BigIntLiteral(_)
            | Token::Punctuator(Punctuator::LBracket)
    )
}
