//! Parse-time scope, label, and private-name tracking.
//!
//! The parser pushes a scope frame for every function, block, class static
//! block, and catch clause it enters, and records declared names into the
//! innermost applicable frame. `var`-like bindings cross block scopes and
//! re-emerge at the innermost function scope; lexical bindings stay in their
//! block; function declarations follow Annex-B semantics in sloppy mode.
//!
//! Private names get their own stack of per-class frames with forward
//! references: uses that don't resolve in the current class propagate to the
//! enclosing class frame, and are an error if none remains.

use bitflags::bitflags;
use core_types::{JsError, SourcePosition};
use std::collections::HashMap;

use crate::error::{recoverable_error, syntax_error};

bitflags! {
    /// Flags describing what kind of scope a frame is and what it permits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ScopeFlags: u16 {
        /// The top-level scope of a script or module
        const TOP = 1 << 0;
        /// A function scope (includes arrows and methods)
        const FUNCTION = 1 << 1;
        /// An arrow function scope; this/super/new.target are transparent
        const ARROW = 1 << 2;
        /// Scope of a catch clause with a simple identifier parameter
        const SIMPLE_CATCH = 1 << 3;
        /// `super.x` is allowed here (methods)
        const SUPER = 1 << 4;
        /// `super(...)` is allowed here (derived-class constructors)
        const DIRECT_SUPER = 1 << 5;
        /// A class `static { ... }` block
        const CLASS_STATIC_BLOCK = 1 << 6;
        /// A generator function scope
        const GENERATOR = 1 << 7;
        /// An async function scope
        const ASYNC = 1 << 8;
        /// Scopes where `var` declarations come to rest
        const VAR = Self::TOP.bits() | Self::FUNCTION.bits() | Self::CLASS_STATIC_BLOCK.bits();
    }
}

/// Compose the scope flags for a function with the given modifiers.
pub fn function_flags(is_async: bool, is_generator: bool) -> ScopeFlags {
    let mut flags = ScopeFlags::FUNCTION;
    if is_async {
        flags |= ScopeFlags::ASYNC;
    }
    if is_generator {
        flags |= ScopeFlags::GENERATOR;
    }
    flags
}

/// How a name is being bound, from least to most binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Plain assignment target, no binding recorded
    None,
    /// `var` declaration
    Var,
    /// `let` / `const` / class declaration
    Lexical,
    /// Function declaration (Annex-B aware)
    Function,
    /// A function expression's own name, bound outside the body scope
    Outside,
    /// Simple catch clause parameter
    SimpleCatch,
}

/// One scope frame.
#[derive(Debug, Clone)]
pub struct Scope {
    /// What kind of scope this is
    pub flags: ScopeFlags,
    /// Names of var-declared bindings that came to rest here
    pub var: Vec<String>,
    /// Names of lexically declared bindings
    pub lexical: Vec<String>,
    /// Names of function declarations
    pub functions: Vec<String>,
    /// Set while parsing a class field initializer whose this-scope this is
    pub in_class_field_init: bool,
}

impl Scope {
    fn new(flags: ScopeFlags) -> Self {
        Self {
            flags,
            var: Vec::new(),
            lexical: Vec::new(),
            functions: Vec::new(),
            in_class_field_init: false,
        }
    }
}

/// The stack of scope frames for one parse.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Create an empty stack; the caller enters the top-level scope.
    pub fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Push a new scope frame.
    pub fn enter(&mut self, flags: ScopeFlags) {
        self.scopes.push(Scope::new(flags));
    }

    /// Pop the innermost scope frame.
    pub fn exit(&mut self) {
        self.scopes.pop();
    }

    /// Number of live frames.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The innermost scope.
    pub fn current(&self) -> &Scope {
        self.scopes.last().expect("scope stack is never empty while parsing")
    }

    fn current_mut(&mut self) -> &mut Scope {
        self.scopes.last_mut().expect("scope stack is never empty while parsing")
    }

    /// The innermost scope where `var` declarations come to rest.
    pub fn current_var_scope(&self) -> &Scope {
        self.scopes
            .iter()
            .rev()
            .find(|scope| scope.flags.intersects(ScopeFlags::VAR))
            .expect("a var scope always encloses the cursor")
    }

    /// The innermost scope that owns `this`: the nearest non-arrow function,
    /// class static block, or the top level.
    pub fn current_this_scope(&self) -> &Scope {
        self.scopes
            .iter()
            .rev()
            .find(|scope| {
                scope.flags.intersects(ScopeFlags::VAR) && !scope.flags.contains(ScopeFlags::ARROW)
            })
            .expect("a this scope always encloses the cursor")
    }

    /// Mutable access to the current this-scope, for the field-init flag.
    pub fn current_this_scope_mut(&mut self) -> &mut Scope {
        self.scopes
            .iter_mut()
            .rev()
            .find(|scope| {
                scope.flags.intersects(ScopeFlags::VAR) && !scope.flags.contains(ScopeFlags::ARROW)
            })
            .expect("a this scope always encloses the cursor")
    }

    /// True inside any function body.
    pub fn in_function(&self) -> bool {
        self.current_var_scope().flags.contains(ScopeFlags::FUNCTION)
    }

    /// True where `yield` is an operator.
    pub fn in_generator(&self) -> bool {
        for scope in self.scopes.iter().rev() {
            if scope.in_class_field_init || scope.flags.contains(ScopeFlags::CLASS_STATIC_BLOCK) {
                return false;
            }
            if scope.flags.contains(ScopeFlags::FUNCTION) {
                return scope.flags.contains(ScopeFlags::GENERATOR);
            }
        }
        false
    }

    /// True where `await` would refer to an enclosing async function.
    pub fn in_async(&self) -> bool {
        for scope in self.scopes.iter().rev() {
            if scope.in_class_field_init || scope.flags.contains(ScopeFlags::CLASS_STATIC_BLOCK) {
                return false;
            }
            if scope.flags.contains(ScopeFlags::FUNCTION) {
                return scope.flags.contains(ScopeFlags::ASYNC);
            }
        }
        false
    }

    /// True where an `await` expression may appear. `top_level_await` covers
    /// both module top-level await and the allow-await-outside option.
    pub fn can_await(&self, top_level_await: bool) -> bool {
        for scope in self.scopes.iter().rev() {
            if scope.in_class_field_init || scope.flags.contains(ScopeFlags::CLASS_STATIC_BLOCK) {
                return false;
            }
            if scope.flags.contains(ScopeFlags::FUNCTION) {
                return scope.flags.contains(ScopeFlags::ASYNC);
            }
        }
        top_level_await
    }

    /// True inside a class `static { ... }` block.
    pub fn in_class_static_block(&self) -> bool {
        self.current_var_scope()
            .flags
            .contains(ScopeFlags::CLASS_STATIC_BLOCK)
    }

    /// True inside a class field initializer.
    pub fn in_class_field_init(&self) -> bool {
        self.current_this_scope().in_class_field_init
    }

    /// True where `super.x` is allowed.
    pub fn allow_super(&self) -> bool {
        self.current_this_scope().flags.contains(ScopeFlags::SUPER)
    }

    /// True where `super(...)` is allowed.
    pub fn allow_direct_super(&self) -> bool {
        self.current_this_scope()
            .flags
            .contains(ScopeFlags::DIRECT_SUPER)
    }

    /// True where `new.target` is allowed.
    pub fn allow_new_target(&self) -> bool {
        let scope = self.current_this_scope();
        scope
            .flags
            .intersects(ScopeFlags::FUNCTION | ScopeFlags::CLASS_STATIC_BLOCK)
            || scope.in_class_field_init
    }

    /// True if the top-level scope declares `name`.
    pub fn top_level_declares(&self, name: &str) -> bool {
        match self.scopes.first() {
            Some(scope) => {
                scope.lexical.iter().any(|n| n == name)
                    || scope.var.iter().any(|n| n == name)
                    || scope.functions.iter().any(|n| n == name)
            }
            None => false,
        }
    }

    fn treat_functions_as_var_in(scope: &Scope, strict: bool) -> bool {
        scope.flags.contains(ScopeFlags::FUNCTION)
            || (!strict && scope.flags.contains(ScopeFlags::TOP))
    }

    /// Annex-B: function declarations act like `var` inside function bodies
    /// and at the sloppy-mode top level.
    pub fn treat_functions_as_var(&self, strict: bool) -> bool {
        Self::treat_functions_as_var_in(self.current(), strict)
    }

    /// Record a declared name, enforcing the duplicate-binding rules.
    ///
    /// Returns true when the binding came to rest in the top-level scope,
    /// which the module parser uses to settle pending exports.
    pub fn declare_name(
        &mut self,
        name: &str,
        kind: BindingKind,
        strict: bool,
        pos: Option<SourcePosition>,
    ) -> Result<bool, JsError> {
        let mut redeclared = false;
        let mut reached_top = false;
        match kind {
            BindingKind::None => {}
            BindingKind::Lexical => {
                let scope = self.current_mut();
                redeclared = scope.lexical.iter().any(|n| n == name)
                    || scope.functions.iter().any(|n| n == name)
                    || scope.var.iter().any(|n| n == name);
                scope.lexical.push(name.to_string());
                reached_top = scope.flags.contains(ScopeFlags::TOP);
            }
            BindingKind::SimpleCatch => {
                self.current_mut().lexical.push(name.to_string());
            }
            BindingKind::Function => {
                let treat_as_var = Self::treat_functions_as_var_in(self.current(), strict);
                let scope = self.current_mut();
                redeclared = if treat_as_var {
                    scope.lexical.iter().any(|n| n == name)
                } else {
                    scope.lexical.iter().any(|n| n == name)
                        || scope.var.iter().any(|n| n == name)
                };
                scope.functions.push(name.to_string());
                reached_top = scope.flags.contains(ScopeFlags::TOP);
            }
            BindingKind::Var | BindingKind::Outside => {
                for index in (0..self.scopes.len()).rev() {
                    let treat_as_var =
                        Self::treat_functions_as_var_in(&self.scopes[index], strict);
                    let scope = &mut self.scopes[index];
                    let shadows_catch_param = scope.flags.contains(ScopeFlags::SIMPLE_CATCH)
                        && scope.lexical.first().map(|n| n.as_str()) == Some(name);
                    if (scope.lexical.iter().any(|n| n == name) && !shadows_catch_param)
                        || (!treat_as_var && scope.functions.iter().any(|n| n == name))
                    {
                        redeclared = true;
                        break;
                    }
                    scope.var.push(name.to_string());
                    if scope.flags.contains(ScopeFlags::TOP) {
                        reached_top = true;
                    }
                    if scope.flags.intersects(ScopeFlags::VAR) {
                        break;
                    }
                }
            }
        }
        if redeclared {
            return Err(recoverable_error(
                format!("Identifier '{}' has already been declared", name),
                pos,
            ));
        }
        Ok(reached_top)
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

/// What a label may be a target of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Labels a loop; valid for both break and continue
    Loop,
    /// Labels a switch; valid for break only
    Switch,
    /// Labels any other statement; valid for break only
    None,
}

/// One entry in the label stack.
#[derive(Debug, Clone)]
pub struct Label {
    /// The label's name; anonymous entries guard unlabeled break/continue
    pub name: Option<String>,
    /// What the labeled statement turned out to be
    pub kind: LabelKind,
    /// Start offset of the labeled statement, for chained-label fixups
    pub statement_start: usize,
}

/// What slot a private class element occupies, for conflict detection.
///
/// A getter and a setter of the same staticness pair up; any other repeat of
/// the same name conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivateElementKind {
    /// A field, method, or an already-paired accessor couple
    Plain,
    /// Instance getter
    InstanceGet,
    /// Instance setter
    InstanceSet,
    /// Static getter
    StaticGet,
    /// Static setter
    StaticSet,
}

impl PrivateElementKind {
    /// The kind after merging a compatible re-declaration, if any.
    fn merged_with(self, next: PrivateElementKind) -> Option<PrivateElementKind> {
        use PrivateElementKind::*;
        match (self, next) {
            (InstanceGet, InstanceSet)
            | (InstanceSet, InstanceGet)
            | (StaticGet, StaticSet)
            | (StaticSet, StaticGet) => Some(Plain),
            _ => None,
        }
    }
}

/// One per-class frame of declared and referenced private names.
#[derive(Debug, Clone, Default)]
pub struct PrivateNameFrame {
    declared: HashMap<String, PrivateElementKind>,
    used: Vec<(String, SourcePosition)>,
}

/// The stack of per-class private-name frames.
#[derive(Debug, Clone, Default)]
pub struct PrivateNameStack {
    frames: Vec<PrivateNameFrame>,
}

impl PrivateNameStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// True outside any class body.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of open class bodies.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a class body.
    pub fn enter_class_body(&mut self) {
        self.frames.push(PrivateNameFrame::default());
    }

    /// Record the declaration of `#name`, rejecting conflicting slots.
    pub fn declare(
        &mut self,
        name: &str,
        kind: PrivateElementKind,
        pos: Option<SourcePosition>,
    ) -> Result<(), JsError> {
        let frame = self
            .frames
            .last_mut()
            .expect("private names are declared only inside a class body");
        match frame.declared.get(name).copied() {
            None => {
                frame.declared.insert(name.to_string(), kind);
                Ok(())
            }
            Some(existing) => match existing.merged_with(kind) {
                Some(merged) => {
                    frame.declared.insert(name.to_string(), merged);
                    Ok(())
                }
                None => Err(recoverable_error(
                    format!("Identifier '#{}' has already been declared", name),
                    pos,
                )),
            },
        }
    }

    /// Record a reference to `#name` for resolution at class-body exit.
    pub fn use_name(&mut self, name: &str, pos: SourcePosition) {
        if let Some(frame) = self.frames.last_mut() {
            frame.used.push((name.to_string(), pos));
        }
    }

    /// Close a class body: unresolved references propagate to the enclosing
    /// class, or error if there is none.
    pub fn exit_class_body(&mut self) -> Result<(), JsError> {
        let frame = self
            .frames
            .pop()
            .expect("exit_class_body pairs with enter_class_body");
        for (name, pos) in frame.used {
            if frame.declared.contains_key(&name) {
                continue;
            }
            match self.frames.last_mut() {
                Some(parent) => parent.used.push((name, pos)),
                None => {
                    return Err(syntax_error(
                        format!("Private field '#{}' must be declared in an enclosing class", name),
                        Some(pos),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Option<SourcePosition> {
        Some(SourcePosition {
            line: 1,
            column: 0,
            offset: 0,
        })
    }

    #[test]
    fn test_var_repeats_are_allowed() {
        let mut scopes = ScopeStack::new();
        scopes.enter(ScopeFlags::TOP);
        scopes
            .declare_name("x", BindingKind::Var, false, pos())
            .expect("first var");
        scopes
            .declare_name("x", BindingKind::Var, false, pos())
            .expect("var may repeat");
    }

    #[test]
    fn test_lexical_duplicate_rejected() {
        let mut scopes = ScopeStack::new();
        scopes.enter(ScopeFlags::TOP);
        scopes
            .declare_name("x", BindingKind::Lexical, false, pos())
            .expect("first let");
        let err = scopes
            .declare_name("x", BindingKind::Lexical, false, pos())
            .expect_err("let may not repeat");
        assert!(err.message.contains("already been declared"));
        assert!(err.recoverable);
    }

    #[test]
    fn test_var_collides_with_outer_lexical() {
        let mut scopes = ScopeStack::new();
        scopes.enter(ScopeFlags::TOP);
        scopes
            .declare_name("x", BindingKind::Lexical, false, pos())
            .expect("outer let");
        scopes.enter(ScopeFlags::empty());
        let err = scopes
            .declare_name("x", BindingKind::Var, false, pos())
            .expect_err("var hoists across the block into the let");
        assert!(err.message.contains("already been declared"));
    }

    #[test]
    fn test_var_may_shadow_simple_catch_param() {
        let mut scopes = ScopeStack::new();
        scopes.enter(ScopeFlags::TOP);
        scopes.enter(ScopeFlags::SIMPLE_CATCH);
        scopes
            .declare_name("e", BindingKind::SimpleCatch, false, pos())
            .expect("catch param");
        scopes
            .declare_name("e", BindingKind::Var, false, pos())
            .expect("var may shadow a simple catch parameter");
    }

    #[test]
    fn test_lexical_stays_in_block() {
        let mut scopes = ScopeStack::new();
        scopes.enter(ScopeFlags::TOP);
        scopes.enter(ScopeFlags::empty());
        scopes
            .declare_name("x", BindingKind::Lexical, false, pos())
            .expect("block-scoped let");
        scopes.exit();
        scopes
            .declare_name("x", BindingKind::Lexical, false, pos())
            .expect("same name is free outside the block");
    }

    #[test]
    fn test_this_scope_skips_arrows() {
        let mut scopes = ScopeStack::new();
        scopes.enter(ScopeFlags::TOP);
        scopes.enter(function_flags(true, false));
        scopes.enter(function_flags(false, false) | ScopeFlags::ARROW);
        assert!(scopes.in_async(), "arrow inherits async-ness");
        assert!(!scopes
            .current_this_scope()
            .flags
            .contains(ScopeFlags::ARROW));
    }

    #[test]
    fn test_static_block_blocks_await() {
        let mut scopes = ScopeStack::new();
        scopes.enter(ScopeFlags::TOP);
        scopes.enter(function_flags(true, false));
        scopes.enter(ScopeFlags::CLASS_STATIC_BLOCK | ScopeFlags::SUPER);
        assert!(!scopes.can_await(true));
    }

    #[test]
    fn test_private_accessor_pair_allowed() {
        let mut names = PrivateNameStack::new();
        names.enter_class_body();
        names
            .declare("x", PrivateElementKind::InstanceGet, pos())
            .expect("getter");
        names
            .declare("x", PrivateElementKind::InstanceSet, pos())
            .expect("setter pairs with getter");
        let err = names
            .declare("x", PrivateElementKind::InstanceGet, pos())
            .expect_err("third occurrence conflicts");
        assert!(err.message.contains("already been declared"));
        names.exit_class_body().expect("no unresolved uses");
    }

    #[test]
    fn test_private_static_instance_mismatch_conflicts() {
        let mut names = PrivateNameStack::new();
        names.enter_class_body();
        names
            .declare("x", PrivateElementKind::InstanceGet, pos())
            .expect("getter");
        assert!(names
            .declare("x", PrivateElementKind::StaticSet, pos())
            .is_err());
    }

    #[test]
    fn test_private_forward_reference_resolves() {
        let mut names = PrivateNameStack::new();
        names.enter_class_body();
        names.use_name(
            "x",
            SourcePosition {
                line: 1,
                column: 10,
                offset: 10,
            },
        );
        names
            .declare("x", PrivateElementKind::Plain, pos())
            .expect("declared after use");
        names.exit_class_body().expect("forward reference resolves");
    }

    #[test]
    fn test_private_unresolved_escalates_to_parent() {
        let mut names = PrivateNameStack::new();
        names.enter_class_body(); // outer class declares #x
        names
            .declare("x", PrivateElementKind::Plain, pos())
            .expect("outer declaration");
        names.enter_class_body(); // inner class uses #x
        names.use_name(
            "x",
            SourcePosition {
                line: 2,
                column: 4,
                offset: 30,
            },
        );
        names.exit_class_body().expect("propagates to outer frame");
        names.exit_class_body().expect("resolves in outer class");
    }

    #[test]
    fn test_private_unresolved_at_bottom_errors() {
        let mut names = PrivateNameStack::new();
        names.enter_class_body();
        names.use_name(
            "missing",
            SourcePosition {
                line: 1,
                column: 5,
                offset: 5,
            },
        );
        let err = names
            .exit_class_body()
            .expect_err("no enclosing class declares #missing");
        assert!(err
            .message
            .contains("Private field '#missing' must be declared in an enclosing class"));
    }
}
