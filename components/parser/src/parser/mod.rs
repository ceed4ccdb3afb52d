//! Recursive descent parser for JavaScript
//!
//! The [`Parser`] owns the lexer and all per-parse mutable state: the strict
//! flag, the scope/label/private-name stacks, and the delayed-error positions
//! used to postpone `yield`/`await` diagnostics until the surrounding
//! construct is known. The grammar is spread over the sibling modules:
//! statements, declarations (including modules and classes), expressions,
//! and the lvalue/destructuring machinery.

mod declarations;
mod expressions;
mod lvalue;
mod statements;

use std::collections::{HashMap, HashSet};

use core_types::{JsError, SourcePosition, SourceSpan, Span};

use crate::ast::*;
use crate::error::{recoverable_error, syntax_error, DestructuringErrors};
use crate::lexer::{Keyword, Lexer, Punctuator, Token};
use crate::options::Options;
use crate::scope::{Label, PrivateNameStack, ScopeFlags, ScopeStack};

/// Where an expression sits relative to a `for` head, which decides whether
/// the `in` operator is allowed and whether `for await` applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ForInitCtx {
    /// Not in a for head
    None,
    /// In the init of a for head: `in` is forbidden
    Init,
    /// In the init of a `for await` head
    AwaitInit,
}

impl ForInitCtx {
    pub(crate) fn forbids_in(self) -> bool {
        !matches!(self, ForInitCtx::None)
    }
}

/// The single-statement context a statement is being parsed in, which
/// restricts declarations (`if (x) let y` is invalid) and drives the `let`
/// disambiguation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatementContext {
    None,
    If,
    Label,
    Do,
    While,
    With,
    For,
}

/// The start bookkeeping of a node under construction
#[derive(Debug, Clone)]
pub(crate) struct NodeStart {
    pub offset: usize,
    pub pos: SourcePosition,
}

/// JavaScript parser
pub struct Parser<'a> {
    pub(crate) lexer: Lexer<'a>,
    pub(crate) options: Options,
    /// Track if we're in strict mode
    pub(crate) strict: bool,
    /// Track if the source is an ES module
    pub(crate) in_module: bool,
    /// Lexical scopes, innermost last
    pub(crate) scope_stack: ScopeStack,
    /// Active break/continue targets
    pub(crate) labels: Vec<Label>,
    /// Per-class private name frames
    pub(crate) private_names: PrivateNameStack,
    /// First `yield` in the parameter list being parsed, if any
    pub(crate) yield_pos: Option<usize>,
    /// First `await` expression in the parameter list being parsed, if any
    pub(crate) await_pos: Option<usize>,
    /// First `await` used as an identifier in a potential async arrow head
    pub(crate) await_ident_pos: Option<usize>,
    /// Offset where a `(` or name could begin an arrow function
    pub(crate) potential_arrow_at: Option<usize>,
    /// The potential arrow sits in a `for await` head
    pub(crate) potential_arrow_in_for_await: bool,
    /// Names exported so far (modules)
    pub(crate) exports: HashSet<String>,
    /// Exported local names with no binding yet, checked at end of program
    pub(crate) undefined_exports: HashMap<String, SourcePosition>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source code with default options
    pub fn new(source: &'a str) -> Self {
        Self::new_with_options(source, Options::default())
    }

    /// Create a new parser with explicit options
    pub fn new_with_options(source: &'a str, mut options: Options) -> Self {
        let on_comment = options.on_comment.take();
        let lexer = Lexer::new_with(source, options.allow_hash_bang, on_comment);
        let in_module = options.source_type == SourceType::Module;
        Self {
            lexer,
            options,
            strict: in_module,
            in_module,
            scope_stack: ScopeStack::new(),
            labels: Vec::new(),
            private_names: PrivateNameStack::new(),
            yield_pos: None,
            await_pos: None,
            await_ident_pos: None,
            potential_arrow_at: None,
            potential_arrow_in_for_await: false,
            exports: HashSet::new(),
            undefined_exports: HashMap::new(),
        }
    }

    /// Parse the source into a [`Program`]
    pub fn parse(&mut self) -> Result<Program, JsError> {
        self.scope_stack.enter(ScopeFlags::TOP);
        let result = self.parse_top_level();
        self.scope_stack.exit();
        result
    }

    fn parse_top_level(&mut self) -> Result<Program, JsError> {
        let mut body = Vec::new();
        let mut in_prologue = true;

        while !self.check_eof()? {
            let mut stmt = self.parse_statement(StatementContext::None, true)?;
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

        // Every `export { x }` without a matching local binding is an error
        if let Some((name, pos)) = self
            .undefined_exports
            .iter()
            .min_by_key(|(_, pos)| pos.offset)
            .map(|(name, pos)| (name.clone(), pos.clone()))
        {
            return Err(recoverable_error(
                format!("Export '{}' is not defined", name),
                Some(pos),
            ));
        }

        let end = self.lexer.len();
        let loc = self.options.locations.then(|| SourceSpan {
            start: SourcePosition {
                line: 1,
                column: 0,
                offset: 0,
            },
            end: self.lexer.position_of_offset(end),
        });
        Ok(Program {
            body,
            source_type: self.options.source_type,
            span: Span::new(0, end),
            loc,
        })
    }

    /// For a leading expression statement whose source starts with a quote,
    /// the raw text between the quotes. Parenthesized strings don't count.
    fn directive_text(&self, stmt: &Statement) -> Option<String> {
        let StatementKind::Expression { expression, .. } = &stmt.kind else {
            return None;
        };
        if !expression.is_string_literal() {
            return None;
        }
        let first = self.lexer.char_at(stmt.span.start)?;
        if first != '"' && first != '\'' {
            return None;
        }
        let raw = self.lexer.slice(expression.span);
        let mut chars = raw.chars();
        chars.next();
        chars.next_back();
        Some(chars.as_str().to_string())
    }

    // ------------------------------------------------------------------
    // Token interface
    // ------------------------------------------------------------------

    pub(crate) fn peek(&mut self) -> Result<Token, JsError> {
        Ok(self.lexer.peek_token()?.clone())
    }

    pub(crate) fn next(&mut self) -> Result<Token, JsError> {
        self.lexer.next_token()
    }

    pub(crate) fn check_eof(&mut self) -> Result<bool, JsError> {
        Ok(matches!(self.lexer.peek_token()?, Token::EOF))
    }

    pub(crate) fn check_punctuator(&mut self, p: Punctuator) -> Result<bool, JsError> {
        Ok(matches!(self.lexer.peek_token()?, Token::Punctuator(q) if *q == p))
    }

    pub(crate) fn eat_punctuator(&mut self, p: Punctuator) -> Result<bool, JsError> {
        if self.check_punctuator(p)? {
            self.lexer.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_punctuator(&mut self, p: Punctuator) -> Result<(), JsError> {
        if self.eat_punctuator(p)? {
            Ok(())
        } else {
            self.unexpected()
        }
    }

    pub(crate) fn check_keyword(&mut self, k: Keyword) -> Result<bool, JsError> {
        Ok(matches!(self.lexer.peek_token()?, Token::Keyword(q) if *q == k))
    }

    pub(crate) fn eat_keyword(&mut self, k: Keyword) -> Result<bool, JsError> {
        if self.check_keyword(k)? {
            self.lexer.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_keyword(&mut self, k: Keyword) -> Result<(), JsError> {
        if self.eat_keyword(k)? {
            Ok(())
        } else {
            self.unexpected()
        }
    }

    /// True when the current token is a plain, escape-free identifier with
    /// the given text. Contextual keywords that the lexer tokenizes as
    /// keywords (`async`, `static`, ...) also match on their text.
    pub(crate) fn is_contextual(&mut self, name: &str) -> Result<bool, JsError> {
        Ok(match self.lexer.peek_token()? {
            Token::Identifier(n, contains_esc) => !*contains_esc && n == name,
            Token::Keyword(k) => k.as_str() == name,
            _ => false,
        })
    }

    pub(crate) fn eat_contextual(&mut self, name: &str) -> Result<bool, JsError> {
        if self.is_contextual(name)? {
            self.lexer.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn expect_contextual(&mut self, name: &str) -> Result<(), JsError> {
        if self.eat_contextual(name)? {
            Ok(())
        } else {
            self.unexpected()
        }
    }

    /// ASI: a semicolon may be inserted before `}`, before EOF, or when a
    /// line terminator precedes the current token.
    pub(crate) fn can_insert_semicolon(&mut self) -> Result<bool, JsError> {
        let at_boundary = matches!(
            self.lexer.peek_token()?,
            Token::EOF | Token::Punctuator(Punctuator::RBrace)
        );
        Ok(at_boundary || self.lexer.line_terminator_before_token)
    }

    /// If ASI applies here, report the inserted semicolon and return true.
    pub(crate) fn insert_semicolon(&mut self) -> Result<bool, JsError> {
        if self.can_insert_semicolon()? {
            let offset = self.lexer.last_token_end;
            let pos = self.lexer.last_token_end_pos.clone();
            if let Some(handler) = self.options.on_inserted_semicolon.as_mut() {
                handler(offset, &pos);
            }
            return Ok(true);
        }
        Ok(false)
    }

    /// Consume a statement-terminating semicolon, inserting one when ASI
    /// applies.
    pub(crate) fn semicolon(&mut self) -> Result<(), JsError> {
        if self.eat_punctuator(Punctuator::Semicolon)? || self.insert_semicolon()? {
            return Ok(());
        }
        Err(syntax_error(
            "Expected semicolon",
            Some(self.lexer.last_token_end_pos.clone()),
        ))
    }

    /// If the closing token follows a comma we just consumed, report the
    /// trailing comma, consume the closer, and return true.
    pub(crate) fn after_trailing_comma(&mut self, close: Punctuator) -> Result<bool, JsError> {
        if self.check_punctuator(close)? {
            let offset = self.lexer.last_token_start;
            let pos = self.lexer.last_token_start_pos.clone();
            if let Some(handler) = self.options.on_trailing_comma.as_mut() {
                handler(offset, &pos);
            }
            self.lexer.next_token()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ------------------------------------------------------------------
    // Node construction
    // ------------------------------------------------------------------

    /// Capture the start of the node about to be parsed (the upcoming token)
    pub(crate) fn start(&mut self) -> Result<NodeStart, JsError> {
        self.lexer.peek_token()?;
        Ok(NodeStart {
            offset: self.lexer.token_start,
            pos: self.lexer.token_start_pos.clone(),
        })
    }

    /// A [`NodeStart`] for an already-built node, for wrappers that share its
    /// start position
    pub(crate) fn start_at(&self, span: Span, loc: Option<&SourceSpan>) -> NodeStart {
        NodeStart {
            offset: span.start,
            pos: loc
                .map(|l| l.start.clone())
                .unwrap_or_else(|| self.lexer.position_of_offset(span.start)),
        }
    }

    /// Produce the span (and `loc`, when enabled) from a start marker to the
    /// end of the last consumed token
    pub(crate) fn finish_span(&self, start: &NodeStart) -> (Span, Option<SourceSpan>) {
        let span = Span::new(start.offset, self.lexer.last_token_end);
        let loc = self.options.locations.then(|| SourceSpan {
            start: start.pos.clone(),
            end: self.lexer.last_token_end_pos.clone(),
        });
        (span, loc)
    }

    /// Like [`Parser::finish_span`] with an explicit out-of-band end
    pub(crate) fn finish_span_at(
        &self,
        start: &NodeStart,
        end: usize,
        end_pos: &SourcePosition,
    ) -> (Span, Option<SourceSpan>) {
        let span = Span::new(start.offset, end);
        let loc = self.options.locations.then(|| SourceSpan {
            start: start.pos.clone(),
            end: end_pos.clone(),
        });
        (span, loc)
    }

    pub(crate) fn statement(&self, start: &NodeStart, kind: StatementKind) -> Statement {
        let (span, loc) = self.finish_span(start);
        Statement { kind, span, loc }
    }

    pub(crate) fn expression(&self, start: &NodeStart, kind: ExpressionKind) -> Expression {
        let (span, loc) = self.finish_span(start);
        Expression { kind, span, loc }
    }

    pub(crate) fn pattern(&self, start: &NodeStart, kind: PatternKind) -> Pattern {
        let (span, loc) = self.finish_span(start);
        Pattern { kind, span, loc }
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    /// Unexpected-token error at the current token
    pub(crate) fn unexpected<T>(&mut self) -> Result<T, JsError> {
        let token = self.lexer.peek_token()?.clone();
        let pos = self.lexer.token_start_pos.clone();
        Err(syntax_error(
            format!("Unexpected token {}", describe_token(&token)),
            Some(pos),
        ))
    }

    /// Unexpected-token error pointing at a previously recorded offset
    pub(crate) fn unexpected_at<T>(&self, offset: usize) -> Result<T, JsError> {
        Err(syntax_error(
            "Unexpected token",
            Some(self.lexer.position_of_offset(offset)),
        ))
    }

    /// Fatal error at a recorded offset
    pub(crate) fn raise<T>(&self, offset: usize, message: impl Into<String>) -> Result<T, JsError> {
        Err(syntax_error(
            message,
            Some(self.lexer.position_of_offset(offset)),
        ))
    }

    /// Recoverable error at a recorded offset
    pub(crate) fn raise_recoverable<T>(
        &self,
        offset: usize,
        message: impl Into<String>,
    ) -> Result<T, JsError> {
        Err(recoverable_error(
            message,
            Some(self.lexer.position_of_offset(offset)),
        ))
    }

    // ------------------------------------------------------------------
    // Delayed destructuring / parameter errors
    // ------------------------------------------------------------------

    pub(crate) fn has_expression_errors(refs: Option<&DestructuringErrors>) -> bool {
        refs.map_or(false, |refs| refs.has_expression_errors())
    }

    /// Promote pending expression-role errors
    pub(crate) fn check_expression_errors(
        &self,
        refs: Option<&DestructuringErrors>,
    ) -> Result<(), JsError> {
        let Some(refs) = refs else { return Ok(()) };
        if let Some(offset) = refs.shorthand_assign {
            return self.raise(
                offset,
                "Shorthand property assignments are valid only in destructuring patterns",
            );
        }
        if let Some(offset) = refs.double_proto {
            return self.raise_recoverable(offset, "Redefinition of __proto__ property");
        }
        Ok(())
    }

    /// Promote pending pattern-role errors
    pub(crate) fn check_pattern_errors(
        &self,
        refs: Option<&DestructuringErrors>,
        is_assign: bool,
    ) -> Result<(), JsError> {
        let Some(refs) = refs else { return Ok(()) };
        if let Some(offset) = refs.trailing_comma {
            return self.raise(offset, "Comma is not permitted after the rest element");
        }
        let parens = if is_assign {
            refs.parenthesized_assign
        } else {
            refs.parenthesized_bind
        };
        if let Some(offset) = parens {
            return self.raise(offset, "Parenthesized pattern");
        }
        Ok(())
    }

    /// A `yield` or `await` recorded while parsing what turned out to be a
    /// function parameter list is an error.
    pub(crate) fn check_yield_await_in_default_params(&self) -> Result<(), JsError> {
        if let Some(yield_pos) = self.yield_pos {
            if self.await_pos.map_or(true, |await_pos| yield_pos < await_pos) {
                return self.raise(yield_pos, "Yield expression cannot be a default value");
            }
        }
        if let Some(await_pos) = self.await_pos {
            return self.raise(await_pos, "Await expression cannot be a default value");
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Identifiers and reserved words
    // ------------------------------------------------------------------

    /// Parse an identifier. With `liberal`, keywords are accepted as names
    /// (property names, `new.target`, labels after `break`).
    pub(crate) fn parse_ident(&mut self, liberal: bool) -> Result<Identifier, JsError> {
        let start = self.start()?;
        let (name, contains_esc) = match self.peek()? {
            Token::Identifier(name, esc) => (name, esc),
            Token::Keyword(k) => {
                if !liberal && !keyword_can_be_name(k) {
                    return self.unexpected();
                }
                (k.as_str().to_string(), false)
            }
            _ => return self.unexpected(),
        };
        self.next()?;
        let (span, loc) = self.finish_span(&start);
        if !liberal {
            self.check_unreserved(&name, contains_esc, span.start)?;
            if name == "await" && self.await_ident_pos.is_none() {
                self.await_ident_pos = Some(span.start);
            }
        }
        Ok(Identifier { name, span, loc })
    }

    /// Reject names that are reserved in the current context
    pub(crate) fn check_unreserved(
        &self,
        name: &str,
        _contains_esc: bool,
        offset: usize,
    ) -> Result<(), JsError> {
        if self.scope_stack.in_generator() && name == "yield" {
            return self
                .raise_recoverable(offset, "Cannot use 'yield' as identifier inside a generator");
        }
        if self.scope_stack.in_async() && name == "await" {
            return self.raise_recoverable(
                offset,
                "Cannot use 'await' as identifier inside an async function",
            );
        }
        if self.scope_stack.in_class_field_init() && name == "arguments" {
            return self
                .raise_recoverable(offset, "Cannot use 'arguments' in class field initializer");
        }
        if self.scope_stack.in_class_static_block() && name == "await" {
            return self.raise(offset, "Cannot use await in class static initialization block");
        }
        if is_reserved_word(name) {
            return self.raise(offset, format!("Unexpected keyword '{}'", name));
        }
        if self.strict && is_strict_reserved_word(name) {
            return self.raise_recoverable(offset, format!("The keyword '{}' is reserved", name));
        }
        if self.in_module && name == "await" {
            return self
                .raise_recoverable(offset, "Cannot use keyword 'await' outside an async function");
        }
        Ok(())
    }

    /// Current token can begin a name-like atom (identifier or contextual
    /// keyword)
    pub(crate) fn token_is_name_like(token: &Token) -> bool {
        match token {
            Token::Identifier(..) => true,
            Token::Keyword(k) => keyword_can_be_name(*k),
            _ => false,
        }
    }

    /// The escape flag of the current identifier-like token
    pub(crate) fn peek_contains_esc(&mut self) -> Result<bool, JsError> {
        Ok(matches!(
            self.lexer.peek_token()?,
            Token::Identifier(_, true)
        ))
    }
}

/// Describe a token for error messages
pub(crate) fn describe_token(token: &Token) -> String {
    match token {
        Token::Identifier(name, _) => format!("'{}'", name),
        Token::PrivateIdentifier(name) => format!("'#{}'", name),
        Token::Number(n) => format!("'{}'", n),
        Token::BigIntLiteral(s) => format!("'{}n'", s),
        Token::String(_) => "string".to_string(),
        Token::Regex { .. } => "regexp".to_string(),
        Token::Keyword(k) => format!("'{}'", k.as_str()),
        Token::Punctuator(p) => format!("'{}'", punctuator_text(*p)),
        Token::EOF => "end of input".to_string(),
    }
}

/// Contextual keywords may serve as identifiers where the grammar allows
pub(crate) fn keyword_can_be_name(k: Keyword) -> bool {
    matches!(
        k,
        Keyword::Async | Keyword::Await | Keyword::Yield | Keyword::Let | Keyword::Static
    )
}

/// Words that are always reserved (escaped keywords arrive here as
/// identifiers and must still be rejected)
pub(crate) fn is_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "break" | "case" | "catch" | "continue" | "debugger"
            | "default" | "delete" | "do" | "else" | "finally"
            | "for" | "function" | "if" | "in" | "instanceof"
            | "new" | "return" | "switch" | "this" | "throw"
            | "try" | "typeof" | "var" | "void" | "while"
            | "with" | "class" | "const" | "enum" | "export"
            | "extends" | "import" | "super"
            // Literals that are also reserved words
            | "null" | "true" | "false"
    )
}

/// Words reserved only in strict mode
pub(crate) fn is_strict_reserved_word(name: &str) -> bool {
    matches!(
        name,
        "implements" | "interface" | "let" | "package" | "private"
            | "protected" | "public" | "static" | "yield"
    )
}

/// Names that cannot be assignment or binding targets in strict mode
pub(crate) fn is_strict_bind_restricted(name: &str) -> bool {
    name == "eval" || name == "arguments" || is_strict_reserved_word(name)
}

pub(crate) fn punctuator_text(p: Punctuator) -> &'static str {
    use Punctuator::*;
    match p {
        LParen => "(",
        RParen => ")",
        LBrace => "{",
        RBrace => "}",
        LBracket => "[",
        RBracket => "]",
        Semicolon => ";",
        Comma => ",",
        Dot => ".",
        Spread => "...",
        OptionalChain => "?.",
        Colon => ":",
        Question => "?",
        Assign => "=",
        Arrow => "=>",
        Plus => "+",
        Minus => "-",
        Star => "*",
        Slash => "/",
        Percent => "%",
        StarStar => "**",
        EqEq => "==",
        EqEqEq => "===",
        NotEq => "!=",
        NotEqEq => "!==",
        Lt => "<",
        LtEq => "<=",
        Gt => ">",
        GtEq => ">=",
        AndAnd => "&&",
        OrOr => "||",
        NullishCoalesce => "??",
        Not => "!",
        And => "&",
        Or => "|",
        Xor => "^",
        Tilde => "~",
        LtLt => "<<",
        GtGt => ">>",
        GtGtGt => ">>>",
        PlusEq => "+=",
        MinusEq => "-=",
        StarEq => "*=",
        SlashEq => "/=",
        PercentEq => "%=",
        StarStarEq => "**=",
        AndEq => "&=",
        OrEq => "|=",
        XorEq => "^=",
        LtLtEq => "<<=",
        GtGtEq => ">>=",
        GtGtGtEq => ">>>=",
        AndAndEq => "&&=",
        OrOrEq => "||=",
        NullishCoalesceEq => "??=",
        PlusPlus => "++",
        MinusMinus => "--",
        Backtick => "`",
    }
}
