//! Token types for the kitchen script lexer.
//!
//! [`TokenKind`] covers every lexeme of the language; [`Token`] pairs a kind
//! with its source [`Span`].

use kscript_types::ast::Builtin;
use kscript_types::Span;
use std::fmt;

/// Every reserved word, including the spelled-out operators and the
/// built-in kitchen calls. None of these can name a variable or function.
pub const ALL_KEYWORDS: &[&str] = &[
    // Declarations & control flow
    "var", "func", "return", "if", "else", "while",
    // Literals
    "true", "false", "none",
    // Spelled operators
    "and", "or", "not",
    // Kitchen calls
    "GOTO", "GET", "PLACE", "ACTIVATE", "TAKE", "DELIVER", "PRINT",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Coarse token classes, as seen by tools that only care about shape
/// (syntax highlighting, statement counting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    Integer,
    String,
    Symbol,
    EndOfLine,
    EndOfFile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    /// Decimal integer literal: `42`
    IntLit(i64),
    /// Quoted string literal: `"Tomato"`
    StringLit(String),

    /// Anything that is not a keyword, literal or symbol.
    Identifier(String),

    // ── Keywords ─────────────────────────────────────────────
    Var,
    Func,
    Return,
    If,
    Else,
    While,
    True,
    False,
    None,
    /// `and` / `&&`
    And,
    /// `or` / `||`
    Or,
    /// `not` / `!`
    Not,
    /// `GOTO`, `GET`, `PLACE`, ...
    Builtin(Builtin),

    // ── Operators ────────────────────────────────────────────
    /// `=`
    Eq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `#` (list length)
    Hash,

    // ── Punctuation ──────────────────────────────────────────
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,

    // ── Special ──────────────────────────────────────────────
    /// End of a source line. Statements are line-terminated.
    Eol,
    Eof,
}

impl TokenKind {
    /// Look up a reserved word. `None` means it is a user identifier.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "var" => TokenKind::Var,
            "func" => TokenKind::Func,
            "return" => TokenKind::Return,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "none" => TokenKind::None,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            other => return Builtin::from_name(other).map(TokenKind::Builtin),
        })
    }

    pub fn is_keyword(&self) -> bool {
        self.category() == TokenCategory::Keyword
    }

    pub fn category(&self) -> TokenCategory {
        match self {
            TokenKind::IntLit(_) => TokenCategory::Integer,
            TokenKind::StringLit(_) => TokenCategory::String,
            TokenKind::Identifier(_) => TokenCategory::Identifier,
            TokenKind::Var
            | TokenKind::Func
            | TokenKind::Return
            | TokenKind::If
            | TokenKind::Else
            | TokenKind::While
            | TokenKind::True
            | TokenKind::False
            | TokenKind::None
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Not
            | TokenKind::Builtin(_) => TokenCategory::Keyword,
            TokenKind::Eol => TokenCategory::EndOfLine,
            TokenKind::Eof => TokenCategory::EndOfFile,
            _ => TokenCategory::Symbol,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::IntLit(n) => write!(f, "{n}"),
            TokenKind::StringLit(s) => write!(f, "\"{s}\""),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::Var => f.write_str("var"),
            TokenKind::Func => f.write_str("func"),
            TokenKind::Return => f.write_str("return"),
            TokenKind::If => f.write_str("if"),
            TokenKind::Else => f.write_str("else"),
            TokenKind::While => f.write_str("while"),
            TokenKind::True => f.write_str("true"),
            TokenKind::False => f.write_str("false"),
            TokenKind::None => f.write_str("none"),
            TokenKind::And => f.write_str("and"),
            TokenKind::Or => f.write_str("or"),
            TokenKind::Not => f.write_str("not"),
            TokenKind::Builtin(b) => f.write_str(b.name()),
            TokenKind::Eq => f.write_str("="),
            TokenKind::EqEq => f.write_str("=="),
            TokenKind::BangEq => f.write_str("!="),
            TokenKind::Less => f.write_str("<"),
            TokenKind::LessEq => f.write_str("<="),
            TokenKind::Greater => f.write_str(">"),
            TokenKind::GreaterEq => f.write_str(">="),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::Percent => f.write_str("%"),
            TokenKind::Hash => f.write_str("#"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::LBrace => f.write_str("{"),
            TokenKind::RBrace => f.write_str("}"),
            TokenKind::LBracket => f.write_str("["),
            TokenKind::RBracket => f.write_str("]"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Dot => f.write_str("."),
            TokenKind::Eol => f.write_str("end of line"),
            TokenKind::Eof => f.write_str("end of file"),
        }
    }
}
