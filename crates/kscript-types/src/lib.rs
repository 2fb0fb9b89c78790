//! Shared types for kitchen script.
//!
//! This crate defines the AST node types, source spans, compile
//! diagnostics, and the built-in call table used by every pipeline stage.

mod error;
mod span;
pub mod ast;

pub use error::{CompileError, CompileErrors, ErrorCategory, ErrorCode, MAX_ERRORS};
pub use span::{SourceFile, Span};
