//! Core parser infrastructure: token cursor, error reporting, recovery.

use kscript_lexer::token::{Token, TokenKind};
use kscript_types::ast::{Ident, Program};
use kscript_types::{CompileError, CompileErrors, ErrorCode, SourceFile, Span};

/// Deepest expression nesting accepted before the parser bails out.
pub(crate) const MAX_EXPR_DEPTH: u32 = 64;
/// Deepest block nesting (`if` inside `while` inside `func`...).
pub(crate) const MAX_BLOCK_DEPTH: u32 = 32;

/// Recursive-descent parser for kitchen script.
///
/// Consumes the lexer's token stream and builds a [`Program`]. Errors are
/// collected rather than returned early; after an error the parser skips
/// to the next line and carries on.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source_file: &'src SourceFile,
    errors: CompileErrors,
    pub(crate) expr_depth: u32,
    pub(crate) block_depth: u32,
}

pub struct ParseResult {
    /// `None` whenever any error was reported.
    pub program: Option<Program>,
    pub errors: CompileErrors,
}

impl<'src> Parser<'src> {
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: CompileErrors::empty(),
            expr_depth: 0,
            block_depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &Token {
        static EOF: Token = Token {
            kind: TokenKind::Eof,
            span: Span {
                start_line: 1,
                start_col: 1,
                end_line: 1,
                end_col: 1,
            },
        };
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF)
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(1, 1))
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume the current token if it is `kind`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Line Handling ─────────────────────────────────────────────────────────

    pub(crate) fn skip_eols(&mut self) {
        while self.check(&TokenKind::Eol) {
            self.advance();
        }
    }

    /// A simple statement must end at a line break, the end of the file,
    /// or the `}` closing its block.
    pub(crate) fn expect_statement_end(&mut self) {
        match self.peek_kind() {
            TokenKind::Eof | TokenKind::RBrace => {}
            TokenKind::Eol => self.skip_eols(),
            other => {
                let message = format!("expected end of line, got '{other}'");
                self.error_at_current(ErrorCode::EXPECTED_NEWLINE, message);
                self.synchronize();
            }
        }
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check(expected) {
            Some(self.advance())
        } else {
            let code = if *expected == TokenKind::RBrace && self.at_end() {
                ErrorCode::UNCLOSED_BLOCK
            } else {
                ErrorCode::UNEXPECTED_TOKEN
            };
            self.error_at_current(
                code,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            other if other.is_keyword() => {
                let span = self.current_span();
                let error = self
                    .make_error(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("'{other}' is a reserved word"),
                        span,
                    )
                    .with_suggestion("pick a different name");
                self.errors.push_error(error);
                None
            }
            other => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected identifier, got '{other}'"),
                );
                None
            }
        }
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    fn make_error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> CompileError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        CompileError::new(&self.source_file.name, code, message, span, source_line)
    }

    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let error = self.make_error(code, message, span);
        self.errors.push_error(error);
    }

    pub(crate) fn too_many_errors(&self) -> bool {
        self.errors.is_full()
    }

    // ── Synchronization ───────────────────────────────────────────────────────

    /// Skip to the start of the next line, or to a `}` that may close the
    /// enclosing block.
    pub(crate) fn synchronize(&mut self) {
        while !self.at_end() {
            match self.peek_kind() {
                TokenKind::Eol => {
                    self.skip_eols();
                    return;
                }
                TokenKind::RBrace if self.block_depth > 0 => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // ── Public API ────────────────────────────────────────────────────────────

    pub fn parse(mut self) -> ParseResult {
        let start = self.current_span();
        let mut stmts = Vec::new();
        self.skip_eols();
        while !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            if self.check(&TokenKind::RBrace) {
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, "unmatched '}'");
                self.advance();
                self.skip_eols();
                continue;
            }
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
            self.skip_eols();
        }
        let span = start.merge(self.previous_span());
        let program = (!self.errors.has_errors()).then_some(Program { stmts, span });
        ParseResult {
            program,
            errors: self.errors,
        }
    }
}
