use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of diagnostics kept before the parser gives up.
pub const MAX_ERRORS: usize = 20;

/// Diagnostic category, derived from the error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Structure,
}

/// Numeric compile error code (E100–E299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNCLOSED_BLOCK: Self = Self(101);
    pub const EXPECTED_NEWLINE: Self = Self(102);
    pub const INVALID_LITERAL: Self = Self(103);

    // ── Structure errors (E200–E299) ──
    pub const DANGLING_ELSE: Self = Self(200);
    pub const NESTING_LIMIT_EXCEEDED: Self = Self(201);
    pub const DUPLICATE_PARAMETER: Self = Self(202);

    pub fn category(self) -> ErrorCategory {
        match self.0 {
            200..=299 => ErrorCategory::Structure,
            _ => ErrorCategory::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Structure => write!(f, "structure"),
        }
    }
}

/// A structured compile diagnostic.
///
/// The editor renders these directly, so every field is machine readable
/// and the source line is carried along for context.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{span}: {code} [{category}] {message}")]
pub struct CompileError {
    pub file: String,
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    pub source_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl CompileError {
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            category: code.category(),
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    /// Attach a fix suggestion shown under the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// All diagnostics produced for one source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompileErrors {
    pub errors: Vec<CompileError>,
    pub total_errors: usize,
}

impl CompileErrors {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Record an error; only the first [`MAX_ERRORS`] are stored.
    pub fn push_error(&mut self, error: CompileError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    pub fn is_full(&self) -> bool {
        self.total_errors >= MAX_ERRORS
    }
}
