//! Conversion of expressions into assignment/binding patterns, and
//! validation of assignment and binding targets.
//!
//! Constructs like `({a} = b)` are parsed as expressions first, because the
//! parser cannot know they are patterns until the `=` is seen. At that commit
//! point [`Parser::to_assignable`] rewrites the expression tree into a
//! pattern tree, and the `check_lval_*` family validates targets and records
//! bindings into the scope stack.

use std::collections::HashSet;

use core_types::JsError;

use crate::ast::*;
use crate::error::DestructuringErrors;
use crate::scope::BindingKind;

use super::Parser;

impl<'a> Parser<'a> {
    /// Record a declared name in the scope stack, settling pending exports
    /// that were waiting for this local binding.
    pub(crate) fn declare_name(
        &mut self,
        name: &str,
        kind: BindingKind,
        offset: usize,
    ) -> Result<(), JsError> {
        let pos = self.lexer.position_of_offset(offset);
        let reached_top = self
            .scope_stack
            .declare_name(name, kind, self.strict, Some(pos))?;
        if self.in_module && reached_top {
            self.undefined_exports.remove(name);
        }
        Ok(())
    }

    /// Rewrite an expression subtree into a pattern subtree.
    ///
    /// With `is_binding`, member expressions are rejected (they are valid
    /// destructuring-assignment targets but not binding targets). Pending
    /// pattern-role errors in `refs` are promoted here, since the construct
    /// has committed to being a pattern.
    pub(crate) fn to_assignable(
        &mut self,
        expr: Expression,
        is_binding: bool,
        refs: Option<&mut DestructuringErrors>,
    ) -> Result<Pattern, JsError> {
        let Expression { kind, span, loc } = expr;
        let kind = match kind {
            ExpressionKind::Identifier { name } => {
                if self.scope_stack.in_async() && name == "await" {
                    return self.raise(
                        span.start,
                        "Cannot use 'await' as identifier inside an async function",
                    );
                }
                PatternKind::Identifier { name }
            }

            ExpressionKind::Object { properties } => {
                self.check_pattern_errors(refs.as_deref(), true)?;
                let mut converted = Vec::with_capacity(properties.len());
                for member in properties {
                    match member {
                        ObjectMember::Property(prop) => {
                            if prop.kind != PropertyKind::Init {
                                return self.raise(
                                    prop.key.span.start,
                                    "Object pattern can't contain getter or setter",
                                );
                            }
                            let value = self.to_assignable(prop.value, is_binding, None)?;
                            converted.push(ObjectPatternProperty::Property {
                                key: prop.key,
                                value,
                                shorthand: prop.shorthand,
                                computed: prop.computed,
                                span: prop.span,
                                loc: prop.loc,
                            });
                        }
                        ObjectMember::Spread {
                            argument,
                            span: spread_span,
                            loc: spread_loc,
                        } => {
                            let argument_start = argument.span.start;
                            let argument = self.to_assignable(*argument, is_binding, None)?;
                            match argument.kind {
                                PatternKind::Assignment { .. } => {
                                    return self.raise(
                                        argument_start,
                                        "Rest elements cannot have a default value",
                                    );
                                }
                                // An object rest target must be a plain name
                                // (or a member expression in assignments)
                                PatternKind::Object { .. } | PatternKind::Array { .. } => {
                                    return self.unexpected_at(argument_start);
                                }
                                _ => {}
                            }
                            converted.push(ObjectPatternProperty::Rest {
                                argument: Box::new(argument),
                                span: spread_span,
                                loc: spread_loc,
                            });
                        }
                    }
                }
                PatternKind::Object {
                    properties: converted,
                }
            }

            ExpressionKind::Array { elements } => {
                self.check_pattern_errors(refs.as_deref(), true)?;
                let elements = self.to_assignable_list(elements, is_binding)?;
                PatternKind::Array { elements }
            }

            ExpressionKind::Spread { argument } => {
                let argument_start = argument.span.start;
                let argument = self.to_assignable(*argument, is_binding, None)?;
                if matches!(argument.kind, PatternKind::Assignment { .. }) {
                    return self.raise(argument_start, "Rest elements cannot have a default value");
                }
                PatternKind::Rest {
                    argument: Box::new(argument),
                }
            }

            ExpressionKind::Assignment {
                operator,
                left,
                right,
            } => {
                if operator != AssignmentOperator::Assign {
                    return self.raise(
                        span.start,
                        "Only '=' operator can be used for specifying default value.",
                    );
                }
                let left = match left {
                    AssignmentTarget::Expression(expr) => {
                        self.to_assignable(*expr, is_binding, None)?
                    }
                    AssignmentTarget::Pattern(pattern) => *pattern,
                };
                PatternKind::Assignment {
                    left: Box::new(left),
                    right,
                }
            }

            ExpressionKind::Paren { expression } => {
                return self.to_assignable(*expression, is_binding, refs);
            }

            ExpressionKind::Chain { .. } => {
                return self.raise_recoverable(
                    span.start,
                    "Optional chaining cannot appear in left-hand side",
                );
            }

            ExpressionKind::Member { .. } if !is_binding => PatternKind::Member(Box::new(
                Expression { kind, span, loc: loc.clone() },
            )),

            _ => return self.raise(span.start, "Assigning to rvalue"),
        };
        Ok(Pattern { kind, span, loc })
    }

    /// Convert a parsed expression list (array elements, arrow parameters)
    /// into patterns, enforcing that a rest element comes last.
    pub(crate) fn to_assignable_list(
        &mut self,
        exprs: Vec<Option<Expression>>,
        is_binding: bool,
    ) -> Result<Vec<Option<Pattern>>, JsError> {
        let count = exprs.len();
        let mut patterns = Vec::with_capacity(count);
        for (index, expr) in exprs.into_iter().enumerate() {
            match expr {
                Some(expr) => {
                    let pattern = self.to_assignable(expr, is_binding, None)?;
                    if matches!(pattern.kind, PatternKind::Rest { .. }) && index + 1 < count {
                        return self
                            .raise(pattern.span.start, "Rest element must be last element");
                    }
                    patterns.push(Some(pattern));
                }
                None => patterns.push(None),
            }
        }
        Ok(patterns)
    }

    fn lval_kind_label(binding: BindingKind) -> &'static str {
        if binding == BindingKind::None {
            "Assigning to"
        } else {
            "Binding"
        }
    }

    /// Validate an identifier target and record its binding.
    pub(crate) fn check_lval_ident(
        &mut self,
        name: &str,
        offset: usize,
        binding: BindingKind,
        check_clashes: Option<&mut HashSet<String>>,
    ) -> Result<(), JsError> {
        if self.strict && super::is_strict_bind_restricted(name) {
            return self.raise_recoverable(
                offset,
                format!(
                    "{} '{}' in strict mode",
                    Self::lval_kind_label(binding),
                    name
                ),
            );
        }
        if let Some(clashes) = check_clashes {
            if !clashes.insert(name.to_string()) {
                return self.raise_recoverable(offset, "Argument name clash");
            }
        }
        if binding != BindingKind::None {
            if binding == BindingKind::Lexical && name == "let" {
                return self.raise_recoverable(
                    offset,
                    "let is disallowed as a lexically bound name",
                );
            }
            self.declare_name(name, binding, offset)?;
        }
        Ok(())
    }

    /// Validate a simple target: identifier, member expression, or (with
    /// `preserve_parens`) a parenthesized one.
    pub(crate) fn check_lval_simple(
        &mut self,
        expr: &Expression,
        binding: BindingKind,
        check_clashes: Option<&mut HashSet<String>>,
    ) -> Result<(), JsError> {
        match &expr.kind {
            ExpressionKind::Identifier { name } => {
                let name = name.clone();
                self.check_lval_ident(&name, expr.span.start, binding, check_clashes)
            }
            ExpressionKind::Chain { .. } => self.raise_recoverable(
                expr.span.start,
                "Optional chaining cannot appear in left-hand side",
            ),
            ExpressionKind::Member { .. } => {
                if binding != BindingKind::None {
                    self.raise_recoverable(expr.span.start, "Binding member expression")
                } else {
                    Ok(())
                }
            }
            ExpressionKind::Paren { expression } => {
                if binding != BindingKind::None {
                    self.raise_recoverable(expr.span.start, "Binding parenthesized expression")
                } else {
                    self.check_lval_simple(expression, binding, check_clashes)
                }
            }
            _ => self.raise(
                expr.span.start,
                format!("{} rvalue", Self::lval_kind_label(binding)),
            ),
        }
    }

    /// Validate a pattern target: also accepts object and array patterns.
    pub(crate) fn check_lval_pattern(
        &mut self,
        pattern: &Pattern,
        binding: BindingKind,
        mut check_clashes: Option<&mut HashSet<String>>,
    ) -> Result<(), JsError> {
        match &pattern.kind {
            PatternKind::Identifier { name } => {
                let name = name.clone();
                self.check_lval_ident(&name, pattern.span.start, binding, check_clashes)
            }
            PatternKind::Object { properties } => {
                for property in properties {
                    match property {
                        ObjectPatternProperty::Property { value, .. } => {
                            self.check_lval_inner_pattern(
                                value,
                                binding,
                                check_clashes.as_deref_mut(),
                            )?;
                        }
                        ObjectPatternProperty::Rest { argument, .. } => {
                            self.check_lval_inner_pattern(
                                argument,
                                binding,
                                check_clashes.as_deref_mut(),
                            )?;
                        }
                    }
                }
                Ok(())
            }
            PatternKind::Array { elements } => {
                for element in elements.iter().flatten() {
                    self.check_lval_inner_pattern(element, binding, check_clashes.as_deref_mut())?;
                }
                Ok(())
            }
            PatternKind::Member(_) => {
                if binding != BindingKind::None {
                    self.raise_recoverable(pattern.span.start, "Binding member expression")
                } else {
                    Ok(())
                }
            }
            PatternKind::Assignment { .. } | PatternKind::Rest { .. } => self.raise(
                pattern.span.start,
                format!("{} rvalue", Self::lval_kind_label(binding)),
            ),
        }
    }

    /// Validate a pattern element: additionally accepts defaults and rest.
    pub(crate) fn check_lval_inner_pattern(
        &mut self,
        pattern: &Pattern,
        binding: BindingKind,
        check_clashes: Option<&mut HashSet<String>>,
    ) -> Result<(), JsError> {
        match &pattern.kind {
            PatternKind::Assignment { left, .. } => {
                self.check_lval_inner_pattern(left, binding, check_clashes)
            }
            PatternKind::Rest { argument } => {
                self.check_lval_inner_pattern(argument, binding, check_clashes)
            }
            _ => self.check_lval_pattern(pattern, binding, check_clashes),
        }
    }
}
