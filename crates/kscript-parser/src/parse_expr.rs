//! Expression parsing with operator precedence.
//!
//! Precedence (lowest → highest):
//! 7. `or` / `||`
//! 6. `and` / `&&`
//! 5. `==`, `!=` (no chaining)
//! 4. `<`, `<=`, `>`, `>=` (no chaining)
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `not` / `!`, `-`, `#`
//! 0. `[index]` postfix

use kscript_lexer::token::TokenKind;
use kscript_types::ast::*;
use kscript_types::ErrorCode;

use crate::parser::{Parser, MAX_EXPR_DEPTH};

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        if !self.enter_nesting() {
            return None;
        }
        let result = self.parse_or();
        self.expr_depth -= 1;
        result
    }

    /// Bump the nesting counter, reporting an error when it overflows.
    fn enter_nesting(&mut self) -> bool {
        self.expr_depth += 1;
        if self.expr_depth > MAX_EXPR_DEPTH {
            self.error_at_current(
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("expressions may nest at most {MAX_EXPR_DEPTH} deep"),
            );
            self.expr_depth -= 1;
            return false;
        }
        true
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    /// `or = and { "or" and }`
    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.parse_and()?;
            left = Self::binary(left, BinOp::Or, right);
        }
        Some(left)
    }

    /// `and = equality { "and" equality }`
    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::And) {
            let right = self.parse_equality()?;
            left = Self::binary(left, BinOp::And, right);
        }
        Some(left)
    }

    /// `equality = comparison [ ("==" | "!=") comparison ]`
    fn parse_equality(&mut self) -> Option<Expr> {
        let left = self.parse_comparison()?;
        let op = match self.peek_kind() {
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::NotEq,
            _ => return Some(left),
        };
        self.advance();
        let right = self.parse_comparison()?;
        if matches!(self.peek_kind(), TokenKind::EqEq | TokenKind::BangEq) {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "equality operators cannot be chained; use 'and'",
            );
            return None;
        }
        Some(Self::binary(left, op, right))
    }

    /// `comparison = additive [ ("<" | "<=" | ">" | ">=") additive ]`
    fn parse_comparison(&mut self) -> Option<Expr> {
        let left = self.parse_additive()?;
        let Some(op) = self.match_comparison_op() else {
            return Some(left);
        };
        self.advance();
        let right = self.parse_additive()?;
        if self.match_comparison_op().is_some() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "comparison operators cannot be chained; use 'and'",
            );
            return None;
        }
        Some(Self::binary(left, op, right))
    }

    fn match_comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::Less => Some(BinOp::Less),
            TokenKind::LessEq => Some(BinOp::LessEq),
            TokenKind::Greater => Some(BinOp::Greater),
            TokenKind::GreaterEq => Some(BinOp::GreaterEq),
            _ => None,
        }
    }

    /// `additive = multiplicative { ("+" | "-") multiplicative }`
    fn parse_additive(&mut self) -> Option<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Self::binary(left, op, right);
        }
        Some(left)
    }

    /// `multiplicative = unary { ("*" | "/" | "%") unary }`
    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Self::binary(left, op, right);
        }
        Some(left)
    }

    /// `unary = ("not" | "!" | "-" | "#") unary | postfix`
    fn parse_unary(&mut self) -> Option<Expr> {
        let op = match self.peek_kind() {
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Hash => UnaryOp::Len,
            _ => return self.parse_postfix(),
        };
        let start = self.advance().span;
        if !self.enter_nesting() {
            return None;
        }
        let operand = self.parse_unary();
        self.expr_depth -= 1;
        let operand = operand?;

        // `-5` becomes a literal rather than a negation node.
        if op == UnaryOp::Neg {
            if let ExprKind::NumberLit(n) = operand.kind {
                return Some(Expr::new(
                    ExprKind::NumberLit(n.wrapping_neg()),
                    start.merge(operand.span),
                ));
            }
        }

        let span = start.merge(operand.span);
        Some(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `postfix = primary { "[" expression "]" }`
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        while self.eat(&TokenKind::LBracket) {
            self.skip_eols();
            let index = self.parse_expression()?;
            self.skip_eols();
            self.expect(&TokenKind::RBracket)?;
            let span = expr.span.merge(self.previous_span());
            expr = Expr::new(
                ExprKind::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                },
                span,
            );
        }
        Some(expr)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary
    // ══════════════════════════════════════════════════════════════════════════

    fn parse_primary(&mut self) -> Option<Expr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::IntLit(n) => {
                self.advance();
                Some(Expr::new(ExprKind::NumberLit(n), token.span))
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Some(Expr::new(ExprKind::StringLit(s), token.span))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(true), token.span))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(false), token.span))
            }
            TokenKind::None => {
                self.advance();
                Some(Expr::new(ExprKind::NoneLit, token.span))
            }
            TokenKind::Identifier(name) if name == "\"" => {
                self.error_at_current(
                    ErrorCode::INVALID_LITERAL,
                    "unterminated string literal",
                );
                None
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    let args = self.parse_call_args()?;
                    let span = token.span.merge(self.previous_span());
                    Some(Expr::new(
                        ExprKind::Call {
                            name: Ident::new(name, token.span),
                            args,
                        },
                        span,
                    ))
                } else {
                    Some(Expr::new(ExprKind::Identifier(name), token.span))
                }
            }
            TokenKind::Builtin(builtin) => {
                self.advance();
                let args = self.parse_call_args()?;
                let span = token.span.merge(self.previous_span());
                if args.len() != builtin.arity() {
                    self.error_at(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!(
                            "{builtin} takes {} argument(s), got {}",
                            builtin.arity(),
                            args.len()
                        ),
                        span,
                    );
                    return None;
                }
                Some(Expr::new(ExprKind::Builtin { builtin, args }, span))
            }
            TokenKind::LBracket => {
                self.advance();
                let items = self.parse_comma_list(&TokenKind::RBracket)?;
                let span = token.span.merge(self.previous_span());
                Some(Expr::new(ExprKind::ListLit(items), span))
            }
            TokenKind::LParen => {
                self.advance();
                self.skip_eols();
                let inner = self.parse_expression()?;
                self.skip_eols();
                self.expect(&TokenKind::RParen)?;
                let span = token.span.merge(self.previous_span());
                Some(Expr::new(ExprKind::Paren(Box::new(inner)), span))
            }
            TokenKind::Eol | TokenKind::Eof => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "expected an expression before the end of the line",
                );
                None
            }
            other => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected an expression, got '{other}'"),
                );
                None
            }
        }
    }

    /// `"(" [ expression { "," expression } ] ")"`
    fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        self.parse_comma_list(&TokenKind::RParen)
    }

    /// Comma-separated expressions up to and including `close`. Line breaks
    /// between elements are ignored.
    fn parse_comma_list(&mut self, close: &TokenKind) -> Option<Vec<Expr>> {
        let mut items = Vec::new();
        self.skip_eols();
        if self.eat(close) {
            return Some(items);
        }
        loop {
            self.skip_eols();
            items.push(self.parse_expression()?);
            self.skip_eols();
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Some(items)
    }
}
