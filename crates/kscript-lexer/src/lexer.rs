//! Core kitchen script lexer.
//!
//! The lexer is total: it never fails. Anything it does not recognise is
//! emitted as an [`TokenKind::Identifier`] and left for the parser or the
//! evaluator to reject with a proper message.
//!
//! - `\r\n` and `\n` become [`TokenKind::Eol`]; the language is line based
//! - tabs, stray `\r` and zero-width spaces are dropped
//! - `//` comments run to the end of the line
//! - two-character operators are matched before single characters

use kscript_types::{SourceFile, Span};

use crate::token::{Token, TokenKind};

/// Convenience wrapper: lex a raw string.
pub fn tokenize(text: &str) -> Vec<Token> {
    Lexer::from_source(text).lex()
}

pub struct Lexer<'src> {
    source: &'src str,
    /// Current byte offset into `source`.
    pos: usize,
    line: u32,
    col: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self::from_source(&source_file.source)
    }

    pub fn from_source(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Lex the whole input. The returned stream always ends with `Eof`.
    pub fn lex(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return tokens;
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn skip_blanks(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                '\r' if self.peek_second() == Some('\n') => break,
                ' ' | '\t' | '\r' | '\u{200B}' | '\u{FEFF}' => {
                    self.advance();
                }
                '/' if self.peek_second() == Some('/') => self.skip_comment(),
                _ => break,
            }
        }
    }

    /// Consume a `//` comment, stopping before the line terminator.
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' || (ch == '\r' && self.peek_second() == Some('\n')) {
                break;
            }
            self.advance();
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan(&mut self) -> Token {
        self.skip_blanks();

        let start_line = self.line;
        let start_col = self.col;
        let start = self.pos;

        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::point(self.line, self.col));
        };

        let kind = match ch {
            '\r' => {
                // skip_blanks only stops on '\r' when '\n' follows
                self.advance();
                TokenKind::Eol
            }
            '\n' => TokenKind::Eol,
            '"' => self.scan_string(),
            c if is_word_char(c) => self.scan_word(start),
            _ => match self.scan_symbol(ch) {
                Some(kind) => kind,
                None => self.scan_unknown(start),
            },
        };

        // Eol spans the terminator on the line it ends
        let span = if kind == TokenKind::Eol {
            Span::point(start_line, start_col)
        } else {
            self.span_from(start_line, start_col)
        };
        Token::new(kind, span)
    }

    /// Called after the opening quote. Strings may not span lines; an
    /// unmatched quote is handed on as a one-character identifier.
    fn scan_string(&mut self) -> TokenKind {
        let rest = &self.source[self.pos..];
        let line_end = rest.find('\n').unwrap_or(rest.len());
        match rest[..line_end].find('"') {
            Some(close) => {
                let text = rest[..close].to_string();
                for _ in 0..=text.chars().count() {
                    self.advance();
                }
                TokenKind::StringLit(text)
            }
            None => TokenKind::Identifier("\"".to_string()),
        }
    }

    fn scan_word(&mut self, start: usize) -> TokenKind {
        while self.peek().is_some_and(is_word_char) {
            self.advance();
        }
        let text = &self.source[start..self.pos];

        if text.bytes().all(|b| b.is_ascii_digit()) {
            // Digit runs too large for i64 fall through to identifiers
            if let Ok(n) = text.parse::<i64>() {
                return TokenKind::IntLit(n);
            }
        }

        TokenKind::from_keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()))
    }

    /// Match an operator or punctuation mark whose first char is `ch`.
    fn scan_symbol(&mut self, ch: char) -> Option<TokenKind> {
        let next = self.peek();
        let (kind, two_char) = match (ch, next) {
            ('=', Some('=')) => (TokenKind::EqEq, true),
            ('!', Some('=')) => (TokenKind::BangEq, true),
            ('<', Some('=')) => (TokenKind::LessEq, true),
            ('>', Some('=')) => (TokenKind::GreaterEq, true),
            ('&', Some('&')) => (TokenKind::And, true),
            ('|', Some('|')) => (TokenKind::Or, true),
            ('=', _) => (TokenKind::Eq, false),
            ('!', _) => (TokenKind::Not, false),
            ('<', _) => (TokenKind::Less, false),
            ('>', _) => (TokenKind::Greater, false),
            ('+', _) => (TokenKind::Plus, false),
            ('-', _) => (TokenKind::Minus, false),
            ('*', _) => (TokenKind::Star, false),
            ('/', _) => (TokenKind::Slash, false),
            ('%', _) => (TokenKind::Percent, false),
            ('#', _) => (TokenKind::Hash, false),
            ('(', _) => (TokenKind::LParen, false),
            (')', _) => (TokenKind::RParen, false),
            ('{', _) => (TokenKind::LBrace, false),
            ('}', _) => (TokenKind::RBrace, false),
            ('[', _) => (TokenKind::LBracket, false),
            (']', _) => (TokenKind::RBracket, false),
            (',', _) => (TokenKind::Comma, false),
            ('.', _) => (TokenKind::Dot, false),
            _ => return None,
        };
        if two_char {
            self.advance();
        }
        Some(kind)
    }

    /// Collect a run of characters the language has no meaning for.
    fn scan_unknown(&mut self, start: usize) -> TokenKind {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace()
                || is_word_char(ch)
                || ch == '"'
                || ch == '\u{200B}'
                || ch == '\u{FEFF}'
                || self.starts_symbol(ch)
            {
                break;
            }
            self.advance();
        }
        TokenKind::Identifier(self.source[start..self.pos].to_string())
    }

    fn starts_symbol(&self, ch: char) -> bool {
        match ch {
            '&' => self.peek_second() == Some('&'),
            '|' => self.peek_second() == Some('|'),
            _ => "=!<>+-*/%#(){}[],.".contains(ch),
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
