//! AST node types for kitchen script.
//!
//! Every node carries a [`Span`] so runtime errors can point at source.
//! Recursive expression nodes are boxed.

use crate::Span;
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete program: top-level statements in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// `{ statements... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `var name = expr`
    Var(VarDecl),
    /// `name = expr`
    Assign(Assign),
    /// `func name(a, b) { ... }`
    Func(FuncDecl),
    /// `if cond { } else if cond { } else { }`
    If(IfStmt),
    /// `while cond { }`
    While(WhileStmt),
    /// `return` or `return expr`
    Return(ReturnStmt),
    /// A bare expression, usually a call.
    Expr(ExprStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Var(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::Func(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Expr(s) => s.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: Ident,
    pub params: Vec<Ident>,
    pub body: Block,
    pub span: Span,
}

/// An `if` chain. `branches` holds the `if` and every `else if` in order.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub branches: Vec<CondBlock>,
    pub else_block: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondBlock {
    pub condition: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    NumberLit(i64),
    StringLit(String),
    BoolLit(bool),
    /// `none`
    NoneLit,
    /// `[a, b, c]`
    ListLit(Vec<Expr>),
    Identifier(String),
    /// User function call: `make_soup("Tomato")`
    Call { name: Ident, args: Vec<Expr> },
    /// Built-in kitchen call: `GOTO("Pantry")`
    Builtin { builtin: Builtin, args: Vec<Expr> },
    /// `list[index]`
    Index { target: Box<Expr>, index: Box<Expr> },
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// `( expr )`
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::NotEq => "!=",
            BinOp::Less => "<",
            BinOp::LessEq => "<=",
            BinOp::Greater => ">",
            BinOp::GreaterEq => ">=",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `not x` / `!x`
    Not,
    /// `-x`
    Neg,
    /// `#list`
    Len,
}

// ══════════════════════════════════════════════════════════════════════════════
// Built-in kitchen calls
// ══════════════════════════════════════════════════════════════════════════════

/// The world-affecting calls the chef understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Goto,
    Get,
    Place,
    Activate,
    Take,
    Deliver,
    Print,
}

impl Builtin {
    pub const ALL: [Builtin; 7] = [
        Builtin::Goto,
        Builtin::Get,
        Builtin::Place,
        Builtin::Activate,
        Builtin::Take,
        Builtin::Deliver,
        Builtin::Print,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Goto => "GOTO",
            Builtin::Get => "GET",
            Builtin::Place => "PLACE",
            Builtin::Activate => "ACTIVATE",
            Builtin::Take => "TAKE",
            Builtin::Deliver => "DELIVER",
            Builtin::Print => "PRINT",
        }
    }

    /// Number of arguments the call requires.
    pub fn arity(self) -> usize {
        match self {
            Builtin::Deliver => 0,
            Builtin::Goto | Builtin::Get | Builtin::Activate | Builtin::Take | Builtin::Print => 1,
            Builtin::Place => 3,
        }
    }

    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
