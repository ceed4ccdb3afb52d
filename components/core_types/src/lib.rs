//! Core source-location and error types.
//!
//! This crate provides the foundational types shared by the parser:
//! source positions, spans, and error values.
//!
//! # Overview
//!
//! - [`SourcePosition`] - A line/column/offset triple
//! - [`Span`] - A start/end offset pair covering a source range
//! - [`SourceSpan`] - A start/end pair of [`SourcePosition`]s
//! - [`JsError`] - JavaScript errors with a source position
//! - [`ErrorKind`] - Types of JavaScript errors
//!
//! # Examples
//!
//! ```
//! use core_types::{ErrorKind, JsError, Span};
//!
//! let span = Span::new(4, 9);
//! assert_eq!(span.text_in("let x = 1;"), "x = 1");
//!
//! let error = JsError {
//!     kind: ErrorKind::SyntaxError,
//!     message: "Unexpected token".to_string(),
//!     source_position: None,
//!     recoverable: false,
//! };
//! assert_eq!(error.to_string(), "SyntaxError: Unexpected token");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod source;

pub use error::{ErrorKind, JsError};
pub use source::{SourcePosition, SourceSpan, Span};
