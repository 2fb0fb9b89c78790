//! Kitchen script lexer: converts source text into a token stream.

pub mod lexer;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenCategory, TokenKind, ALL_KEYWORDS};
