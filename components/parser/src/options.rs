//! The public options surface of the parser.

use crate::ast::SourceType;
use crate::lexer::CommentHandler;
use core_types::SourcePosition;

/// The ECMAScript language version to parse.
///
/// Later versions gate in their features: exponentiation (2016), async
/// functions (2017), async iteration and object rest/spread (2018), optional
/// catch binding (2019), optional chaining / nullish coalescing / dynamic
/// import / BigInt (2020), logical assignment and numeric separators (2021),
/// class fields, static blocks, private names and top-level await (2022).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EcmaVersion {
    /// ES2015 (ES6)
    Es2015,
    /// ES2016
    Es2016,
    /// ES2017
    Es2017,
    /// ES2018
    Es2018,
    /// ES2019
    Es2019,
    /// ES2020
    Es2020,
    /// ES2021
    Es2021,
    /// ES2022
    Es2022,
    /// The most recent version this parser implements
    Latest,
}

impl EcmaVersion {
    /// The version as a year, with `Latest` resolving to the newest supported
    pub fn year(self) -> u32 {
        match self {
            EcmaVersion::Es2015 => 2015,
            EcmaVersion::Es2016 => 2016,
            EcmaVersion::Es2017 => 2017,
            EcmaVersion::Es2018 => 2018,
            EcmaVersion::Es2019 => 2019,
            EcmaVersion::Es2020 => 2020,
            EcmaVersion::Es2021 => 2021,
            EcmaVersion::Es2022 | EcmaVersion::Latest => 2022,
        }
    }

    /// True when this version includes features introduced in `year`
    pub fn supports(self, year: u32) -> bool {
        self.year() >= year
    }
}

/// Callback fired at each automatic semicolon insertion point, with the
/// offset and position where the semicolon was inserted.
pub type InsertedSemicolonHandler = Box<dyn FnMut(usize, &SourcePosition)>;

/// Callback fired for each trailing comma, with the comma's offset/position.
pub type TrailingCommaHandler = Box<dyn FnMut(usize, &SourcePosition)>;

/// Parser configuration.
///
/// The observer callbacks receive borrowed data and may capture state; they
/// make `Options` intentionally not `Clone`.
pub struct Options {
    /// Language version to parse
    pub ecma_version: EcmaVersion,
    /// Script or module
    pub source_type: SourceType,
    /// Accept `return` at the top level
    pub allow_return_outside_function: bool,
    /// Accept import/export in non-top-level positions
    pub allow_import_export_everywhere: bool,
    /// Accept `await` at the top level of scripts
    pub allow_await_outside_function: bool,
    /// Accept `super` outside methods
    pub allow_super_outside_method: bool,
    /// Skip a leading `#!` line
    pub allow_hash_bang: bool,
    /// Attach `loc` (line/column ranges) to nodes
    pub locations: bool,
    /// Keep grouped expressions as explicit `Paren` nodes
    pub preserve_parens: bool,
    /// Observer for automatic semicolon insertion
    pub on_inserted_semicolon: Option<InsertedSemicolonHandler>,
    /// Observer for trailing commas
    pub on_trailing_comma: Option<TrailingCommaHandler>,
    /// Observer for comments
    pub on_comment: Option<CommentHandler>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ecma_version: EcmaVersion::Latest,
            source_type: SourceType::Script,
            allow_return_outside_function: false,
            allow_import_export_everywhere: false,
            allow_await_outside_function: false,
            allow_super_outside_method: false,
            allow_hash_bang: true,
            locations: false,
            preserve_parens: false,
            on_inserted_semicolon: None,
            on_trailing_comma: None,
            on_comment: None,
        }
    }
}

impl std::fmt::Debug for Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Options")
            .field("ecma_version", &self.ecma_version)
            .field("source_type", &self.source_type)
            .field(
                "allow_return_outside_function",
                &self.allow_return_outside_function,
            )
            .field(
                "allow_import_export_everywhere",
                &self.allow_import_export_everywhere,
            )
            .field(
                "allow_await_outside_function",
                &self.allow_await_outside_function,
            )
            .field("allow_super_outside_method", &self.allow_super_outside_method)
            .field("allow_hash_bang", &self.allow_hash_bang)
            .field("locations", &self.locations)
            .field("preserve_parens", &self.preserve_parens)
            .field("on_inserted_semicolon", &self.on_inserted_semicolon.is_some())
            .field("on_trailing_comma", &self.on_trailing_comma.is_some())
            .field("on_comment", &self.on_comment.is_some())
            .finish()
    }
}

impl Options {
    /// Options for parsing an ES module
    pub fn module() -> Self {
        Self {
            source_type: SourceType::Module,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = Options::default();
        assert_eq!(options.ecma_version, EcmaVersion::Latest);
        assert_eq!(options.source_type, SourceType::Script);
        assert!(!options.locations);
        assert!(options.allow_hash_bang);
    }

    #[test]
    fn test_module_options() {
        let options = Options::module();
        assert_eq!(options.source_type, SourceType::Module);
    }

    #[test]
    fn test_version_gating() {
        assert!(EcmaVersion::Latest.supports(2022));
        assert!(EcmaVersion::Es2020.supports(2018));
        assert!(!EcmaVersion::Es2017.supports(2020));
    }

    #[test]
    fn test_version_ordering() {
        assert!(EcmaVersion::Es2015 < EcmaVersion::Es2022);
        assert!(EcmaVersion::Es2022 <= EcmaVersion::Latest);
    }
}
