//! Statement parsing: dispatch on the current token plus the individual
//! statement forms.
//!
//! The interesting cases are the ones that need disambiguation: `let` as a
//! declaration vs. an identifier, `async function` vs. the identifier
//! `async`, the three-way for/for-in/for-of split, and labeled statements
//! discovered only after an expression turns out to be a lone identifier
//! followed by a colon.

use core_types::JsError;

use crate::ast::*;
use crate::error::DestructuringErrors;
use crate::lexer::{Keyword, Punctuator, Token};
use crate::scope::{BindingKind, Label, LabelKind, ScopeFlags};

use super::{ForInitCtx, NodeStart, Parser, StatementContext};

impl<'a> Parser<'a> {
    /// Parse one statement. `context` describes a single-statement position
    /// (if branch, loop body, label body) where declarations are restricted.
    pub(crate) fn parse_statement(
        &mut self,
        context: StatementContext,
        top_level: bool,
    ) -> Result<Statement, JsError> {
        let start = self.start()?;

        if self.is_let_declaration(context)? {
            self.next()?; // let
            return self.parse_var_statement(start, VariableKind::Let);
        }

        match self.peek()? {
            Token::Keyword(Keyword::Break) => self.parse_break_continue(start, true),
            Token::Keyword(Keyword::Continue) => self.parse_break_continue(start, false),
            Token::Keyword(Keyword::Debugger) => {
                self.next()?;
                self.semicolon()?;
                Ok(self.statement(&start, StatementKind::Debugger))
            }
            Token::Keyword(Keyword::Do) => self.parse_do_while(start),
            Token::Keyword(Keyword::For) => self.parse_for_statement(start),
            Token::Keyword(Keyword::Function) => {
                // A declaration in single-statement position is only valid in
                // a sloppy-mode if branch or label body (Annex B)
                if context != StatementContext::None
                    && (self.strict
                        || !matches!(context, StatementContext::If | StatementContext::Label))
                {
                    return self.unexpected();
                }
                self.next()?;
                self.parse_function_statement_rest(
                    start,
                    false,
                    context != StatementContext::None,
                    false,
                )
            }
            Token::Keyword(Keyword::Class) => {
                if context != StatementContext::None {
                    return self.unexpected();
                }
                let class = self.parse_class(true, false)?;
                Ok(self.statement(&start, StatementKind::ClassDeclaration(class)))
            }
            Token::Keyword(Keyword::If) => self.parse_if_statement(start),
            Token::Keyword(Keyword::Return) => self.parse_return_statement(start),
            Token::Keyword(Keyword::Switch) => self.parse_switch_statement(start),
            Token::Keyword(Keyword::Throw) => self.parse_throw_statement(start),
            Token::Keyword(Keyword::Try) => self.parse_try_statement(start),
            Token::Keyword(Keyword::Const) => {
                if context != StatementContext::None {
                    return self.unexpected();
                }
                self.next()?;
                self.parse_var_statement(start, VariableKind::Const)
            }
            Token::Keyword(Keyword::Var) => {
                self.next()?;
                self.parse_var_statement(start, VariableKind::Var)
            }
            Token::Keyword(Keyword::While) => self.parse_while_statement(start),
            Token::Keyword(Keyword::With) => {
                if self.strict {
                    return self.raise_recoverable(start.offset, "'with' in strict mode");
                }
                self.parse_with_statement(start)
            }
            Token::Punctuator(Punctuator::LBrace) => self.parse_block_statement(),
            Token::Punctuator(Punctuator::Semicolon) => {
                self.next()?;
                Ok(self.statement(&start, StatementKind::Empty))
            }
            Token::Keyword(Keyword::Import) => {
                // `import(` and `import.` are expressions, not declarations
                if self.import_starts_expression()? {
                    return self.parse_expression_statement(start, context);
                }
                self.check_module_declaration_position(top_level, start.offset)?;
                self.parse_import_declaration(start)
            }
            Token::Keyword(Keyword::Export) => {
                self.check_module_declaration_position(top_level, start.offset)?;
                self.parse_export_declaration(start)
            }
            _ => {
                if self.is_async_function()? {
                    if context != StatementContext::None
                        && (self.strict
                            || !matches!(context, StatementContext::If | StatementContext::Label))
                    {
                        return self.unexpected();
                    }
                    self.next()?; // async
                    self.next()?; // function
                    return self.parse_function_statement_rest(
                        start,
                        true,
                        context != StatementContext::None,
                        false,
                    );
                }
                self.parse_expression_statement(start, context)
            }
        }
    }

    /// At statement start, `let` begins a declaration only when what follows
    /// can begin a binding; in a single-statement context it never does.
    fn is_let_declaration(&mut self, context: StatementContext) -> Result<bool, JsError> {
        if !self.options.ecma_version.supports(2015) || !self.is_contextual("let")? {
            return Ok(false);
        }
        let state = self.lexer.save_state();
        self.lexer.next_token()?; // let
        let next = self.lexer.peek_token()?.clone();
        self.lexer.restore_state(state);

        Ok(match next {
            Token::Punctuator(Punctuator::LBracket) => true,
            _ if context != StatementContext::None => false,
            Token::Punctuator(Punctuator::LBrace) => true,
            Token::Identifier(..) => true,
            Token::Keyword(Keyword::In) | Token::Keyword(Keyword::Instanceof) => false,
            Token::Keyword(_) => true,
            _ => false,
        })
    }

    /// `async` followed on the same line by `function`.
    pub(crate) fn is_async_function(&mut self) -> Result<bool, JsError> {
        if !self.options.ecma_version.supports(2017) || !self.is_contextual("async")? {
            return Ok(false);
        }
        let state = self.lexer.save_state();
        self.lexer.next_token()?; // async
        let is_function = matches!(self.lexer.peek_token()?, Token::Keyword(Keyword::Function))
            && !self.lexer.line_terminator_before_token;
        self.lexer.restore_state(state);
        Ok(is_function)
    }

    /// `import` starting a call or meta-property rather than a declaration.
    fn import_starts_expression(&mut self) -> Result<bool, JsError> {
        if !self.options.ecma_version.supports(2020) {
            return Ok(false);
        }
        let state = self.lexer.save_state();
        self.lexer.next_token()?; // import
        let starts_expr = matches!(
            self.lexer.peek_token()?,
            Token::Punctuator(Punctuator::LParen) | Token::Punctuator(Punctuator::Dot)
        );
        self.lexer.restore_state(state);
        Ok(starts_expr)
    }

    fn check_module_declaration_position(
        &mut self,
        top_level: bool,
        offset: usize,
    ) -> Result<(), JsError> {
        if self.options.allow_import_export_everywhere {
            return Ok(());
        }
        if !top_level {
            return self.raise(
                offset,
                "'import' and 'export' may only appear at the top level",
            );
        }
        if !self.in_module {
            return self.raise(
                offset,
                "'import' and 'export' may appear only with 'sourceType: module'",
            );
        }
        Ok(())
    }

    fn parse_expression_statement(
        &mut self,
        start: NodeStart,
        context: StatementContext,
    ) -> Result<Statement, JsError> {
        let starts_name_like = Self::token_is_name_like(&self.peek()?);
        let expr = self.parse_expression(ForInitCtx::None, None)?;

        // A lone identifier followed by `:` is a label, not an expression
        if starts_name_like
            && matches!(expr.kind, ExpressionKind::Identifier { .. })
            && self.eat_punctuator(Punctuator::Colon)?
        {
            return self.parse_labeled_statement(start, expr, context);
        }

        self.semicolon()?;
        Ok(self.statement(
            &start,
            StatementKind::Expression {
                expression: expr,
                directive: None,
            },
        ))
    }

    fn parse_labeled_statement(
        &mut self,
        start: NodeStart,
        label_expr: Expression,
        context: StatementContext,
    ) -> Result<Statement, JsError> {
        let ExpressionKind::Identifier { name } = &label_expr.kind else {
            return self.unexpected_at(label_expr.span.start);
        };
        let name = name.clone();

        for label in &self.labels {
            if label.name.as_deref() == Some(name.as_str()) {
                return self.raise(start.offset, format!("Label '{}' is already declared", name));
            }
        }

        let kind = match self.peek()? {
            Token::Keyword(Keyword::Do) | Token::Keyword(Keyword::While)
            | Token::Keyword(Keyword::For) => LabelKind::Loop,
            Token::Keyword(Keyword::Switch) => LabelKind::Switch,
            _ => LabelKind::None,
        };

        // Labels stacked directly on this statement retroactively adopt the
        // inner statement's start and kind, so `L: M: while (...)` makes both
        // labels valid continue targets
        let statement_start = self.lexer.token_start;
        for label in self.labels.iter_mut().rev() {
            if label.statement_start == start.offset {
                label.statement_start = statement_start;
                label.kind = kind;
            } else {
                break;
            }
        }

        self.labels.push(Label {
            name: Some(name.clone()),
            kind,
            statement_start,
        });
        let body = self.parse_statement(
            if context == StatementContext::None {
                StatementContext::Label
            } else {
                context
            },
            false,
        );
        self.labels.pop();
        let body = body?;

        let label = Identifier {
            name,
            span: label_expr.span,
            loc: label_expr.loc,
        };
        Ok(self.statement(
            &start,
            StatementKind::Labeled {
                label,
                body: Box::new(body),
            },
        ))
    }

    fn parse_break_continue(
        &mut self,
        start: NodeStart,
        is_break: bool,
    ) -> Result<Statement, JsError> {
        self.next()?;
        let label = if self.eat_punctuator(Punctuator::Semicolon)? || self.insert_semicolon()? {
            None
        } else {
            if !Self::token_is_name_like(&self.peek()?) {
                return self.unexpected();
            }
            let id = self.parse_ident(false)?;
            self.semicolon()?;
            Some(id)
        };

        let mut valid = false;
        for target in &self.labels {
            let name_matches = match &label {
                None => true,
                Some(id) => target.name.as_deref() == Some(id.name.as_str()),
            };
            if name_matches {
                if target.kind != LabelKind::None && (is_break || target.kind == LabelKind::Loop) {
                    valid = true;
                    break;
                }
                if label.is_some() && is_break {
                    valid = true;
                    break;
                }
            }
        }
        if !valid {
            let keyword = if is_break { "break" } else { "continue" };
            return self.raise(start.offset, format!("Unsyntactic {}", keyword));
        }

        let kind = if is_break {
            StatementKind::Break { label }
        } else {
            StatementKind::Continue { label }
        };
        Ok(self.statement(&start, kind))
    }

    fn parse_paren_expression(&mut self) -> Result<Expression, JsError> {
        self.expect_punctuator(Punctuator::LParen)?;
        let expr = self.parse_expression(ForInitCtx::None, None)?;
        self.expect_punctuator(Punctuator::RParen)?;
        Ok(expr)
    }

    fn parse_if_statement(&mut self, start: NodeStart) -> Result<Statement, JsError> {
        self.next()?;
        let test = self.parse_paren_expression()?;
        let consequent = self.parse_statement(StatementContext::If, false)?;
        let alternate = if self.eat_keyword(Keyword::Else)? {
            Some(Box::new(self.parse_statement(StatementContext::If, false)?))
        } else {
            None
        };
        Ok(self.statement(
            &start,
            StatementKind::If {
                test,
                consequent: Box::new(consequent),
                alternate,
            },
        ))
    }

    fn parse_return_statement(&mut self, start: NodeStart) -> Result<Statement, JsError> {
        if !self.scope_stack.in_function() && !self.options.allow_return_outside_function {
            return self.raise(start.offset, "'return' outside of function");
        }
        self.next()?;
        let argument = if self.eat_punctuator(Punctuator::Semicolon)? || self.insert_semicolon()? {
            None
        } else {
            let expr = self.parse_expression(ForInitCtx::None, None)?;
            self.semicolon()?;
            Some(expr)
        };
        Ok(self.statement(&start, StatementKind::Return { argument }))
    }

    fn parse_while_statement(&mut self, start: NodeStart) -> Result<Statement, JsError> {
        self.next()?;
        let test = self.parse_paren_expression()?;
        self.labels.push(Label {
            name: None,
            kind: LabelKind::Loop,
            statement_start: start.offset,
        });
        let body = self.parse_statement(StatementContext::While, false);
        self.labels.pop();
        let body = body?;
        Ok(self.statement(
            &start,
            StatementKind::While {
                test,
                body: Box::new(body),
            },
        ))
    }

    fn parse_do_while(&mut self, start: NodeStart) -> Result<Statement, JsError> {
        self.next()?;
        self.labels.push(Label {
            name: None,
            kind: LabelKind::Loop,
            statement_start: start.offset,
        });
        let body = self.parse_statement(StatementContext::Do, false);
        self.labels.pop();
        let body = body?;
        self.expect_keyword(Keyword::While)?;
        let test = self.parse_paren_expression()?;
        // ASI always applies after the closing paren of do-while
        self.eat_punctuator(Punctuator::Semicolon)?;
        Ok(self.statement(
            &start,
            StatementKind::DoWhile {
                body: Box::new(body),
                test,
            },
        ))
    }

    fn parse_with_statement(&mut self, start: NodeStart) -> Result<Statement, JsError> {
        self.next()?;
        let object = self.parse_paren_expression()?;
        let body = self.parse_statement(StatementContext::With, false)?;
        Ok(self.statement(
            &start,
            StatementKind::With {
                object,
                body: Box::new(body),
            },
        ))
    }

    fn parse_throw_statement(&mut self, start: NodeStart) -> Result<Statement, JsError> {
        self.next()?;
        self.lexer.peek_token()?;
        if self.lexer.line_terminator_before_token {
            return self.raise(self.lexer.last_token_end, "Illegal newline after throw");
        }
        let argument = self.parse_expression(ForInitCtx::None, None)?;
        self.semicolon()?;
        Ok(self.statement(&start, StatementKind::Throw { argument }))
    }

    fn parse_switch_statement(&mut self, start: NodeStart) -> Result<Statement, JsError> {
        self.next()?;
        let discriminant = self.parse_paren_expression()?;
        self.expect_punctuator(Punctuator::LBrace)?;
        self.labels.push(Label {
            name: None,
            kind: LabelKind::Switch,
            statement_start: start.offset,
        });
        self.scope_stack.enter(ScopeFlags::empty());

        let result = self.parse_switch_cases();
        self.scope_stack.exit();
        self.labels.pop();
        let cases = result?;

        Ok(self.statement(
            &start,
            StatementKind::Switch {
                discriminant,
                cases,
            },
        ))
    }

    fn parse_switch_cases(&mut self) -> Result<Vec<SwitchCase>, JsError> {
        let mut cases: Vec<SwitchCase> = Vec::new();
        let mut current: Option<(NodeStart, Option<Expression>, Vec<Statement>)> = None;
        let mut saw_default = false;

        while !self.check_punctuator(Punctuator::RBrace)? {
            let is_case = self.check_keyword(Keyword::Case)?;
            if is_case || self.check_keyword(Keyword::Default)? {
                if let Some((case_start, test, consequent)) = current.take() {
                    let (span, loc) = self.finish_span(&case_start);
                    cases.push(SwitchCase {
                        test,
                        consequent,
                        span,
                        loc,
                    });
                }
                let case_start = self.start()?;
                self.next()?;
                let test = if is_case {
                    Some(self.parse_expression(ForInitCtx::None, None)?)
                } else {
                    if saw_default {
                        return self
                            .raise_recoverable(self.lexer.last_token_start, "Multiple default clauses");
                    }
                    saw_default = true;
                    None
                };
                self.expect_punctuator(Punctuator::Colon)?;
                current = Some((case_start, test, Vec::new()));
            } else {
                let Some((_, _, consequent)) = current.as_mut() else {
                    return self.unexpected();
                };
                let stmt = self.parse_statement(StatementContext::None, false)?;
                consequent.push(stmt);
            }
        }

        if let Some((case_start, test, consequent)) = current.take() {
            let (span, loc) = self.finish_span(&case_start);
            cases.push(SwitchCase {
                test,
                consequent,
                span,
                loc,
            });
        }
        self.next()?; // }
        Ok(cases)
    }

    fn parse_try_statement(&mut self, start: NodeStart) -> Result<Statement, JsError> {
        self.next()?;
        let block = self.parse_block_statement()?;

        let handler = if self.check_keyword(Keyword::Catch)? {
            let clause_start = self.start()?;
            self.next()?;
            let param = if self.eat_punctuator(Punctuator::LParen)? {
                let param = self.parse_binding_atom()?;
                let simple = matches!(param.kind, PatternKind::Identifier { .. });
                self.scope_stack.enter(if simple {
                    ScopeFlags::SIMPLE_CATCH
                } else {
                    ScopeFlags::empty()
                });
                let checked = self.check_lval_pattern(
                    &param,
                    if simple {
                        BindingKind::SimpleCatch
                    } else {
                        BindingKind::Lexical
                    },
                    None,
                );
                if let Err(err) = checked {
                    self.scope_stack.exit();
                    return Err(err);
                }
                if let Err(err) = self.expect_punctuator(Punctuator::RParen) {
                    self.scope_stack.exit();
                    return Err(err);
                }
                Some(param)
            } else {
                if !self.options.ecma_version.supports(2019) {
                    return self.unexpected();
                }
                self.scope_stack.enter(ScopeFlags::empty());
                None
            };
            let body = self.parse_block(false);
            self.scope_stack.exit();
            let body = body?;
            let (span, loc) = self.finish_span(&clause_start);
            Some(CatchClause {
                param,
                body: Box::new(body),
                span,
                loc,
            })
        } else {
            None
        };

        let finalizer = if self.eat_keyword(Keyword::Finally)? {
            Some(Box::new(self.parse_block_statement()?))
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            return self.raise(start.offset, "Missing catch or finally clause");
        }
        Ok(self.statement(
            &start,
            StatementKind::Try {
                block: Box::new(block),
                handler,
                finalizer,
            },
        ))
    }

    /// A `{ ... }` block statement with its own lexical scope.
    pub(crate) fn parse_block_statement(&mut self) -> Result<Statement, JsError> {
        self.parse_block(true)
    }

    /// A block; catch clauses pass `create_scope = false` because the catch
    /// parameter already opened the scope.
    pub(crate) fn parse_block(&mut self, create_scope: bool) -> Result<Statement, JsError> {
        let start = self.start()?;
        self.expect_punctuator(Punctuator::LBrace)?;
        if create_scope {
            self.scope_stack.enter(ScopeFlags::empty());
        }
        let body = self.parse_block_body();
        if create_scope {
            self.scope_stack.exit();
        }
        let body = body?;
        Ok(self.statement(&start, StatementKind::Block { body }))
    }

    fn parse_block_body(&mut self) -> Result<Vec<Statement>, JsError> {
        let mut body = Vec::new();
        while !self.eat_punctuator(Punctuator::RBrace)? {
            if self.check_eof()? {
                return self.unexpected();
            }
            body.push(self.parse_statement(StatementContext::None, false)?);
        }
        Ok(body)
    }

    /// `var`/`let`/`const` statement; the keyword has been consumed.
    pub(crate) fn parse_var_statement(
        &mut self,
        start: NodeStart,
        kind: VariableKind,
    ) -> Result<Statement, JsError> {
        let declarations = self.parse_var_declarators(kind, false)?;
        self.semicolon()?;
        let (span, loc) = self.finish_span(&start);
        Ok(self.statement(
            &start,
            StatementKind::VariableDeclaration(VariableDeclaration {
                kind,
                declarations,
                span,
                loc,
            }),
        ))
    }

    /// The comma-separated declarator list of a variable declaration.
    pub(crate) fn parse_var_declarators(
        &mut self,
        kind: VariableKind,
        is_for: bool,
    ) -> Result<Vec<VariableDeclarator>, JsError> {
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.start()?;
            if kind != VariableKind::Var && self.is_contextual("let")? {
                return self.raise_recoverable(
                    self.lexer.token_start,
                    "let is disallowed as a lexically bound name",
                );
            }
            let id = self.parse_binding_atom()?;
            self.check_lval_pattern(
                &id,
                if kind == VariableKind::Var {
                    BindingKind::Var
                } else {
                    BindingKind::Lexical
                },
                None,
            )?;

            let init = if self.eat_punctuator(Punctuator::Assign)? {
                let ctx = if is_for {
                    ForInitCtx::Init
                } else {
                    ForInitCtx::None
                };
                Some(self.parse_maybe_assign(ctx, None)?)
            } else if kind == VariableKind::Const
                && !(self.check_keyword(Keyword::In)?
                    || (self.options.ecma_version.supports(2015) && self.is_contextual("of")?))
            {
                return self.unexpected();
            } else if !matches!(id.kind, PatternKind::Identifier { .. })
                && !(is_for
                    && (self.check_keyword(Keyword::In)? || self.is_contextual("of")?))
            {
                return self.raise(
                    self.lexer.last_token_end,
                    "Complex binding patterns require an initialization value",
                );
            } else {
                None
            };

            let (span, loc) = self.finish_span(&decl_start);
            declarations.push(VariableDeclarator {
                id,
                init,
                span,
                loc,
            });
            if !self.eat_punctuator(Punctuator::Comma)? {
                break;
            }
        }
        Ok(declarations)
    }

    fn parse_for_statement(&mut self, start: NodeStart) -> Result<Statement, JsError> {
        self.next()?; // for
        let can_await = self.options.ecma_version.supports(2018)
            && self.scope_stack.can_await(
                self.options.allow_await_outside_function
                    || (self.in_module && self.options.ecma_version.supports(2022)),
            );
        let await_at = if can_await && self.eat_contextual("await")? {
            Some(self.lexer.last_token_start)
        } else {
            None
        };

        self.labels.push(Label {
            name: None,
            kind: LabelKind::Loop,
            statement_start: start.offset,
        });
        self.scope_stack.enter(ScopeFlags::empty());

        let result = self.parse_for_head_and_body(&start, await_at);
        self.scope_stack.exit();
        self.labels.pop();
        result
    }

    fn parse_for_head_and_body(
        &mut self,
        start: &NodeStart,
        await_at: Option<usize>,
    ) -> Result<Statement, JsError> {
        self.expect_punctuator(Punctuator::LParen)?;

        if self.check_punctuator(Punctuator::Semicolon)? {
            if let Some(offset) = await_at {
                return self.unexpected_at(offset);
            }
            return self.parse_c_style_for(start, None);
        }

        let is_let = self.is_let_declaration(StatementContext::None)?;
        if is_let || self.check_keyword(Keyword::Var)? || self.check_keyword(Keyword::Const)? {
            let decl_start = self.start()?;
            let kind = if is_let {
                VariableKind::Let
            } else if self.check_keyword(Keyword::Const)? {
                VariableKind::Const
            } else {
                VariableKind::Var
            };
            self.next()?;
            let declarations = self.parse_var_declarators(kind, true)?;
            let (span, loc) = self.finish_span(&decl_start);
            let declaration = VariableDeclaration {
                kind,
                declarations,
                span,
                loc,
            };

            if (self.check_keyword(Keyword::In)? || self.is_contextual("of")?)
                && declaration.declarations.len() == 1
            {
                if self.check_keyword(Keyword::In)? {
                    if let Some(offset) = await_at {
                        return self.unexpected_at(offset);
                    }
                }
                return self.parse_for_in_of(
                    start,
                    ForInOfLeft::VariableDeclaration(declaration),
                    await_at,
                );
            }
            if let Some(offset) = await_at {
                return self.unexpected_at(offset);
            }
            return self.parse_c_style_for(start, Some(ForInit::VariableDeclaration(declaration)));
        }

        let starts_with_let = self.is_contextual("let")?;
        let mut refs = DestructuringErrors::new();
        let init_ctx = if await_at.is_some() {
            ForInitCtx::AwaitInit
        } else {
            ForInitCtx::Init
        };
        let init = if await_at.is_some() {
            self.parse_expr_subscripts(Some(&mut refs), init_ctx)?
        } else {
            self.parse_expression(init_ctx, Some(&mut refs))?
        };

        let is_for_of = self.is_contextual("of")?;
        if self.check_keyword(Keyword::In)? || is_for_of {
            if self.check_keyword(Keyword::In)? {
                if let Some(offset) = await_at {
                    return self.unexpected_at(offset);
                }
            }
            if is_for_of && starts_with_let {
                return self.raise(
                    init.span.start,
                    "The left-hand side of a for-of loop may not start with 'let'.",
                );
            }
            if is_for_of
                && self.options.ecma_version.supports(2017)
                && init.is_identifier_named("async")
            {
                return self.raise(
                    init.span.start,
                    "The left-hand side of a for-of loop may not be 'async'.",
                );
            }
            let pattern = self.to_assignable(init, false, Some(&mut refs))?;
            self.check_lval_pattern(&pattern, BindingKind::None, None)?;
            return self.parse_for_in_of(start, ForInOfLeft::Pattern(pattern), await_at);
        }

        self.check_expression_errors(Some(&refs))?;
        if let Some(offset) = await_at {
            return self.unexpected_at(offset);
        }
        self.parse_c_style_for(start, Some(ForInit::Expression(init)))
    }

    fn parse_c_style_for(
        &mut self,
        start: &NodeStart,
        init: Option<ForInit>,
    ) -> Result<Statement, JsError> {
        self.expect_punctuator(Punctuator::Semicolon)?;
        let test = if self.check_punctuator(Punctuator::Semicolon)? {
            None
        } else {
            Some(self.parse_expression(ForInitCtx::None, None)?)
        };
        self.expect_punctuator(Punctuator::Semicolon)?;
        let update = if self.check_punctuator(Punctuator::RParen)? {
            None
        } else {
            Some(self.parse_expression(ForInitCtx::None, None)?)
        };
        self.expect_punctuator(Punctuator::RParen)?;
        let body = self.parse_statement(StatementContext::For, false)?;
        Ok(self.statement(
            start,
            StatementKind::For {
                init,
                test,
                update,
                body: Box::new(body),
            },
        ))
    }

    fn parse_for_in_of(
        &mut self,
        start: &NodeStart,
        left: ForInOfLeft,
        await_at: Option<usize>,
    ) -> Result<Statement, JsError> {
        let is_for_in = self.check_keyword(Keyword::In)?;
        self.next()?; // in / of

        // A declarator initializer is only grandfathered for sloppy-mode
        // `for (var x = ... in ...)` with a plain identifier
        if let ForInOfLeft::VariableDeclaration(declaration) = &left {
            if let Some(first) = declaration.declarations.first() {
                if first.init.is_some()
                    && (!is_for_in
                        || self.strict
                        || declaration.kind != VariableKind::Var
                        || !matches!(first.id.kind, PatternKind::Identifier { .. }))
                {
                    let what = if is_for_in { "for-in" } else { "for-of" };
                    return self.raise(
                        declaration.span.start,
                        format!("{} loop variable declaration may not have an initializer", what),
                    );
                }
            }
        }

        let right = if is_for_in {
            self.parse_expression(ForInitCtx::None, None)?
        } else {
            self.parse_maybe_assign(ForInitCtx::None, None)?
        };
        self.expect_punctuator(Punctuator::RParen)?;
        let body = self.parse_statement(StatementContext::For, false)?;

        let kind = if is_for_in {
            StatementKind::ForIn {
                left,
                right,
                body: Box::new(body),
            }
        } else {
            StatementKind::ForOf {
                left,
                right,
                body: Box::new(body),
                is_await: await_at.is_some(),
            }
        };
        Ok(self.statement(start, kind))
    }
}
