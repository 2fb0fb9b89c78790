//! Statement parsing.

use crate::parser::{Parser, MAX_BLOCK_DEPTH};
use kscript_lexer::token::TokenKind;
use kscript_types::ast::*;
use kscript_types::ErrorCode;

impl<'src> Parser<'src> {
    /// Parse `{ stmts... }`. Line breaks are allowed anywhere between
    /// statements, including right after `{`.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;

        self.block_depth += 1;
        if self.block_depth > MAX_BLOCK_DEPTH {
            self.error_at(
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("blocks may nest at most {MAX_BLOCK_DEPTH} deep"),
                start,
            );
            self.block_depth -= 1;
            return None;
        }

        self.skip_eols();
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            if self.too_many_errors() {
                break;
            }
            match self.parse_statement() {
                Some(stmt) => stmts.push(stmt),
                None => self.synchronize(),
            }
            self.skip_eols();
        }
        self.block_depth -= 1;

        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Block { stmts, span })
    }

    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek_kind() {
            TokenKind::Var => self.parse_var_decl(),
            TokenKind::Func => self.parse_func_decl(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::Else => {
                self.error_at_current(
                    ErrorCode::DANGLING_ELSE,
                    "'else' without a matching 'if'",
                );
                None
            }
            TokenKind::Identifier(_) if self.look_ahead(1) == &TokenKind::Eq => {
                self.parse_assignment()
            }
            _ => {
                let expr = self.parse_expression()?;
                let span = expr.span;
                self.expect_statement_end();
                Some(Stmt::Expr(ExprStmt { expr, span }))
            }
        }
    }

    /// `var name = expr`
    fn parse_var_decl(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `var`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression()?;
        let span = start.merge(value.span);
        self.expect_statement_end();
        Some(Stmt::Var(VarDecl { name, value, span }))
    }

    /// `name = expr`
    fn parse_assignment(&mut self) -> Option<Stmt> {
        let name = self.expect_identifier()?;
        self.advance(); // eat `=`
        let value = self.parse_expression()?;
        let span = name.span.merge(value.span);
        self.expect_statement_end();
        Some(Stmt::Assign(Assign { name, value, span }))
    }

    /// `func name(a, b) { body }`
    fn parse_func_decl(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `func`
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::LParen)?;

        let mut params: Vec<Ident> = Vec::new();
        self.skip_eols();
        if !self.check(&TokenKind::RParen) {
            loop {
                self.skip_eols();
                let param = self.expect_identifier()?;
                if params.iter().any(|p| p.name == param.name) {
                    self.error_at(
                        ErrorCode::DUPLICATE_PARAMETER,
                        format!("parameter '{}' is declared twice", param.name),
                        param.span,
                    );
                }
                params.push(param);
                self.skip_eols();
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen)?;

        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Some(Stmt::Func(FuncDecl {
            name,
            params,
            body,
            span,
        }))
    }

    /// `if cond { } else if cond { } else { }`
    ///
    /// `else` may sit on the line after the closing `}`.
    fn parse_if_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `if`
        let mut branches = Vec::new();
        let mut else_block = None;

        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        branches.push(CondBlock { condition, body });

        loop {
            // Only consume line breaks when an `else` follows them
            let mut ahead = 0;
            while self.look_ahead(ahead) == &TokenKind::Eol {
                ahead += 1;
            }
            if self.look_ahead(ahead) != &TokenKind::Else {
                break;
            }
            self.skip_eols();
            self.advance(); // eat `else`

            if self.eat(&TokenKind::If) {
                let condition = self.parse_expression()?;
                let body = self.parse_block()?;
                branches.push(CondBlock { condition, body });
            } else {
                else_block = Some(self.parse_block()?);
                break;
            }
        }

        let end = else_block
            .as_ref()
            .map(|b| b.span)
            .or_else(|| branches.last().map(|b| b.body.span))
            .unwrap_or(start);
        Some(Stmt::If(IfStmt {
            branches,
            else_block,
            span: start.merge(end),
        }))
    }

    /// `while cond { body }`
    fn parse_while_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `while`
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        let span = start.merge(body.span);
        Some(Stmt::While(WhileStmt {
            condition,
            body,
            span,
        }))
    }

    /// `return` or `return expr`
    fn parse_return_stmt(&mut self) -> Option<Stmt> {
        let start = self.advance().span; // eat `return`
        let value = match self.peek_kind() {
            TokenKind::Eol | TokenKind::Eof | TokenKind::RBrace => None,
            _ => Some(self.parse_expression()?),
        };
        let span = value.as_ref().map_or(start, |v| start.merge(v.span));
        self.expect_statement_end();
        Some(Stmt::Return(ReturnStmt { value, span }))
    }
}
