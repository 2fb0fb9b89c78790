//! Parser tests: statements, precedence, recovery and error codes.

use kscript_lexer::Lexer;
use kscript_parser::{ParseResult, Parser};
use kscript_types::ast::*;
use kscript_types::{ErrorCode, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse(source: &str) -> ParseResult {
    let sf = SourceFile::new("test.ks", source);
    let tokens = Lexer::new(&sf).lex();
    Parser::new(tokens, &sf).parse()
}

fn parse_ok(source: &str) -> Program {
    let result = parse(source);
    if result.errors.has_errors() {
        for e in &result.errors.errors {
            eprintln!("  ERROR: {} ({})", e.message, e.code);
        }
        panic!("unexpected parse errors (see above)");
    }
    result.program.expect("no program returned")
}

fn error_codes(source: &str) -> Vec<ErrorCode> {
    parse(source).errors.errors.iter().map(|e| e.code).collect()
}

/// Parse a single expression statement and return its expression.
fn expr(source: &str) -> Expr {
    let prog = parse_ok(source);
    assert_eq!(prog.stmts.len(), 1);
    match prog.stmts.into_iter().next() {
        Some(Stmt::Expr(s)) => s.expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

/// Render an expression fully parenthesised, for precedence checks.
fn sexpr(e: &Expr) -> String {
    match &e.kind {
        ExprKind::NumberLit(n) => n.to_string(),
        ExprKind::StringLit(s) => format!("{s:?}"),
        ExprKind::BoolLit(b) => b.to_string(),
        ExprKind::NoneLit => "none".into(),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::ListLit(items) => {
            let inner: Vec<_> = items.iter().map(sexpr).collect();
            format!("[{}]", inner.join(" "))
        }
        ExprKind::Call { name, args } => {
            let inner: Vec<_> = args.iter().map(sexpr).collect();
            format!("{}({})", name.name, inner.join(" "))
        }
        ExprKind::Builtin { builtin, args } => {
            let inner: Vec<_> = args.iter().map(sexpr).collect();
            format!("{}({})", builtin, inner.join(" "))
        }
        ExprKind::Index { target, index } => format!("{}[{}]", sexpr(target), sexpr(index)),
        ExprKind::Binary { left, op, right } => {
            format!("({} {} {})", op.symbol(), sexpr(left), sexpr(right))
        }
        ExprKind::Unary { op, operand } => {
            let sym = match op {
                UnaryOp::Not => "not",
                UnaryOp::Neg => "neg",
                UnaryOp::Len => "#",
            };
            format!("({sym} {})", sexpr(operand))
        }
        ExprKind::Paren(inner) => sexpr(inner),
    }
}

// ─────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_program() {
    let prog = parse_ok("");
    assert!(prog.stmts.is_empty());
    let prog = parse_ok("\n\n   \n");
    assert!(prog.stmts.is_empty());
}

#[test]
fn test_var_and_assign() {
    let prog = parse_ok("var x = 1\nx = x + 2\n");
    assert_eq!(prog.stmts.len(), 2);
    match &prog.stmts[0] {
        Stmt::Var(v) => {
            assert_eq!(v.name.name, "x");
            assert_eq!(v.value.kind, ExprKind::NumberLit(1));
        }
        other => panic!("expected var, got {other:?}"),
    }
    match &prog.stmts[1] {
        Stmt::Assign(a) => assert_eq!(a.name.name, "x"),
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_func_decl() {
    let prog = parse_ok("func make(a, b) {\n  return a\n}\n");
    match &prog.stmts[0] {
        Stmt::Func(f) => {
            assert_eq!(f.name.name, "make");
            let params: Vec<_> = f.params.iter().map(|p| p.name.as_str()).collect();
            assert_eq!(params, vec!["a", "b"]);
            assert_eq!(f.body.stmts.len(), 1);
            assert!(matches!(f.body.stmts[0], Stmt::Return(_)));
        }
        other => panic!("expected func, got {other:?}"),
    }
}

#[test]
fn test_func_without_params_and_empty_body() {
    let prog = parse_ok("func nothing() {}");
    match &prog.stmts[0] {
        Stmt::Func(f) => {
            assert!(f.params.is_empty());
            assert!(f.body.stmts.is_empty());
        }
        other => panic!("expected func, got {other:?}"),
    }
}

#[test]
fn test_if_else_if_else_chain() {
    let prog = parse_ok(
        "if x == 1 {\n  PRINT(1)\n} else if x == 2 {\n  PRINT(2)\n} else {\n  PRINT(3)\n}\n",
    );
    match &prog.stmts[0] {
        Stmt::If(s) => {
            assert_eq!(s.branches.len(), 2);
            assert!(s.else_block.is_some());
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_else_on_following_line() {
    let prog = parse_ok("if true {\n}\nelse {\n  PRINT(1)\n}\nPRINT(2)\n");
    assert_eq!(prog.stmts.len(), 2);
    match &prog.stmts[0] {
        Stmt::If(s) => assert!(s.else_block.is_some()),
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_if_without_else_keeps_following_statement() {
    let prog = parse_ok("if true {\n}\n\nPRINT(1)\n");
    assert_eq!(prog.stmts.len(), 2);
    match &prog.stmts[0] {
        Stmt::If(s) => {
            assert_eq!(s.branches.len(), 1);
            assert!(s.else_block.is_none());
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_while_loop() {
    let prog = parse_ok("var i = 0\nwhile i < 3 {\n  i = i + 1\n}\n");
    match &prog.stmts[1] {
        Stmt::While(w) => {
            assert_eq!(sexpr(&w.condition), "(< i 3)");
            assert_eq!(w.body.stmts.len(), 1);
        }
        other => panic!("expected while, got {other:?}"),
    }
}

#[test]
fn test_bare_return() {
    let prog = parse_ok("func f() {\n  return\n}\nreturn\n");
    match &prog.stmts[1] {
        Stmt::Return(r) => assert!(r.value.is_none()),
        other => panic!("expected return, got {other:?}"),
    }
}

#[test]
fn test_statement_before_closing_brace_on_same_line() {
    let prog = parse_ok("func f() { return 1 }");
    match &prog.stmts[0] {
        Stmt::Func(f) => assert_eq!(f.body.stmts.len(), 1),
        other => panic!("expected func, got {other:?}"),
    }
}

#[test]
fn test_crlf_line_endings() {
    let prog = parse_ok("var a = 1\r\nvar b = 2\r\n");
    assert_eq!(prog.stmts.len(), 2);
}

// ─────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(sexpr(&expr("1 + 2 * 3")), "(+ 1 (* 2 3))");
    assert_eq!(sexpr(&expr("(1 + 2) * 3")), "(* (+ 1 2) 3)");
    assert_eq!(sexpr(&expr("10 - 4 - 3")), "(- (- 10 4) 3)");
    assert_eq!(sexpr(&expr("7 % 4 / 2")), "(/ (% 7 4) 2)");
}

#[test]
fn test_logical_precedence() {
    assert_eq!(
        sexpr(&expr("a or b and c")),
        "(or a (and b c))"
    );
    assert_eq!(
        sexpr(&expr("a || b && not c")),
        "(or a (and b (not c)))"
    );
    assert_eq!(
        sexpr(&expr("x < 3 and y == 2")),
        "(and (< x 3) (== y 2))"
    );
}

#[test]
fn test_comparison_binds_tighter_than_equality() {
    assert_eq!(sexpr(&expr("a < b == true")), "(== (< a b) true)");
}

#[test]
fn test_unary_operators() {
    assert_eq!(sexpr(&expr("!done")), "(not done)");
    assert_eq!(sexpr(&expr("#orders - 1")), "(- (# orders) 1)");
    assert_eq!(sexpr(&expr("-x * 2")), "(* (neg x) 2)");
    assert_eq!(sexpr(&expr("-5")), "-5");
}

#[test]
fn test_index_and_calls() {
    assert_eq!(sexpr(&expr("orders[i + 1]")), "orders[(+ i 1)]");
    assert_eq!(sexpr(&expr("cook(\"Tomato\", 2)")), "cook(\"Tomato\" 2)");
    assert_eq!(sexpr(&expr("grid[0][1]")), "grid[0][1]");
}

#[test]
fn test_builtin_calls() {
    let e = expr("PLACE(soupmaker, held, 0)");
    match e.kind {
        ExprKind::Builtin { builtin, args } => {
            assert_eq!(builtin, Builtin::Place);
            assert_eq!(args.len(), 3);
        }
        other => panic!("expected builtin, got {other:?}"),
    }
    assert_eq!(sexpr(&expr("DELIVER()")), "DELIVER()");
}

#[test]
fn test_list_literal_across_lines() {
    assert_eq!(sexpr(&expr("[1,\n 2,\n 3]")), "[1 2 3]");
    assert_eq!(sexpr(&expr("[]")), "[]");
}

#[test]
fn test_literals() {
    assert_eq!(expr("true").kind, ExprKind::BoolLit(true));
    assert_eq!(expr("false").kind, ExprKind::BoolLit(false));
    assert_eq!(expr("none").kind, ExprKind::NoneLit);
    assert_eq!(expr("\"Bun\"").kind, ExprKind::StringLit("Bun".into()));
}

#[test]
fn test_spans_cover_expression() {
    let e = expr("  a + bb");
    assert_eq!(e.span.start_line, 1);
    assert_eq!(e.span.start_col, 3);
    assert_eq!(e.span.end_col, 8);
}

// ─────────────────────────────────────────────────────────────────────
// Errors and recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_errors_suppress_program() {
    let result = parse("var = 3\n");
    assert!(result.errors.has_errors());
    assert!(result.program.is_none());
}

#[test]
fn test_recovery_reports_every_bad_line() {
    let result = parse("var = 1\nvar ok = 2\nvar = 3\n");
    assert_eq!(result.errors.total_errors, 2);
    assert_eq!(result.errors.errors[0].span.start_line, 1);
    assert_eq!(result.errors.errors[1].span.start_line, 3);
}

#[test]
fn test_reserved_word_as_name() {
    let result = parse("var while = 1\n");
    let err = &result.errors.errors[0];
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert!(err.message.contains("reserved"));
    assert!(err.suggestion.is_some());
}

#[test]
fn test_trailing_tokens_need_newline() {
    assert_eq!(error_codes("var a = 1 2\n"), vec![ErrorCode::EXPECTED_NEWLINE]);
}

#[test]
fn test_unclosed_block() {
    assert_eq!(
        error_codes("while true {\n  PRINT(1)\n"),
        vec![ErrorCode::UNCLOSED_BLOCK]
    );
}

#[test]
fn test_dangling_else() {
    assert!(error_codes("else {\n}\n").contains(&ErrorCode::DANGLING_ELSE));
}

#[test]
fn test_duplicate_parameter() {
    assert_eq!(
        error_codes("func f(a, a) {\n}\n"),
        vec![ErrorCode::DUPLICATE_PARAMETER]
    );
}

#[test]
fn test_chained_comparison_rejected() {
    assert!(parse("a < b < c\n").errors.has_errors());
    assert!(parse("a == b == c\n").errors.has_errors());
}

#[test]
fn test_builtin_arity_checked() {
    assert!(parse("GOTO()\n").errors.has_errors());
    assert!(parse("DELIVER(1)\n").errors.has_errors());
    assert!(parse("PLACE(a, b)\n").errors.has_errors());
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        error_codes("PRINT(\"oops)\n"),
        vec![ErrorCode::INVALID_LITERAL]
    );
}

#[test]
fn test_expression_nesting_limit() {
    let deep = format!("{}1{}", "(".repeat(100), ")".repeat(100));
    assert!(error_codes(&deep).contains(&ErrorCode::NESTING_LIMIT_EXCEEDED));
    let negs = format!("{}1", "-".repeat(100));
    assert!(error_codes(&negs).contains(&ErrorCode::NESTING_LIMIT_EXCEEDED));
}

#[test]
fn test_block_nesting_limit() {
    let deep = format!("{}{}", "while true {\n".repeat(40), "}\n".repeat(40));
    assert!(error_codes(&deep).contains(&ErrorCode::NESTING_LIMIT_EXCEEDED));
}

#[test]
fn test_unmatched_closing_brace() {
    assert_eq!(error_codes("}\n"), vec![ErrorCode::UNEXPECTED_TOKEN]);
}

#[test]
fn test_error_cap() {
    let source = "var = 1\n".repeat(50);
    let result = parse(&source);
    assert!(result.errors.errors.len() <= kscript_types::MAX_ERRORS);
}

// ─────────────────────────────────────────────────────────────────────
// Properties
// ─────────────────────────────────────────────────────────────────────

use proptest::prelude::*;

fn operand_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        "[a-z][a-z0-9_]{0,6}".prop_filter("reserved word", |s| {
            !matches!(
                s.as_str(),
                "var" | "func" | "if" | "else" | "while" | "return" | "true" | "false"
                    | "none" | "and" | "or" | "not"
            )
        }),
        Just("\"Tomato\"".to_string()),
    ]
}

fn expr_strategy() -> impl Strategy<Value = String> {
    operand_strategy().prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), "[-+*/%]", inner.clone()).prop_map(|(a, op, b)| format!("{a} {op} {b}")),
            inner.clone().prop_map(|e| format!("({e})")),
            inner.clone().prop_map(|e| format!("not {e}")),
            prop::collection::vec(inner, 0..3).prop_map(|items| format!("[{}]", items.join(", "))),
        ]
    })
}

proptest! {
    #[test]
    fn prop_parser_is_total(source in "[a-z0-9 \"(){}\\[\\],=<>!#+*/%\n-]{0,80}") {
        let result = parse(&source);
        prop_assert_eq!(result.program.is_some(), !result.errors.has_errors());
        prop_assert!(result.errors.errors.len() <= kscript_types::MAX_ERRORS);
    }

    #[test]
    fn prop_generated_declarations_parse(e in expr_strategy()) {
        let prog = parse_ok(&format!("var generated = {e}\n"));
        prop_assert_eq!(prog.stmts.len(), 1);
        prop_assert!(matches!(prog.stmts[0], Stmt::Var(_)));
    }
}
