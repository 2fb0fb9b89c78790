//! Kitchen script pipeline.
//!
//! ```text
//! source → Lexer → Parser → ProgramStats
//!                         ↘ Interpreter (per test case) → check_constraints
//! ```
//!
//! [`compile`] turns source into a program plus its size metrics;
//! [`submit`] runs a program against every case of a [`Puzzle`] and grades
//! the cases that met their orders.

mod constraints;
mod puzzle;
mod stats;

pub use constraints::{check_constraints, Violation};
pub use puzzle::{
    run_case, run_puzzle, AdditionalConstraint, Constraints, ModuleSignature, Puzzle,
    PuzzleError, StationSignature, TestCaseResult, TestStatus,
};
pub use stats::ProgramStats;

use kscript_eval::EvalLimits;
use kscript_lexer::{Lexer, Token};
use kscript_parser::Parser;
use kscript_types::ast::Program;
use kscript_types::{CompileErrors, SourceFile};
use serde::Serialize;
use tracing::{debug, info_span};

/// Output of [`compile`]. `program` and `stats` are present only when
/// there were no errors.
#[derive(Debug, Clone)]
pub struct CompileResult {
    pub program: Option<Program>,
    pub stats: Option<ProgramStats>,
    pub tokens: Vec<Token>,
    pub errors: CompileErrors,
}

impl CompileResult {
    pub fn success(&self) -> bool {
        !self.errors.has_errors()
    }
}

/// Lex and parse `source`, collecting statistics on success.
pub fn compile(source: &str, file_name: &str) -> CompileResult {
    let span = info_span!("compile", file = file_name);
    let _guard = span.enter();

    let source_file = SourceFile::new(file_name, source);
    let tokens = Lexer::new(&source_file).lex();
    debug!(tokens = tokens.len(), "lexed");

    let parsed = Parser::new(tokens.clone(), &source_file).parse();
    let stats = parsed.program.as_ref().map(ProgramStats::collect);
    debug!(errors = parsed.errors.total_errors, ?stats, "parsed");

    CompileResult {
        program: parsed.program,
        stats,
        tokens,
        errors: parsed.errors,
    }
}

/// Graded result of running a program against a whole puzzle.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub stats: Option<ProgramStats>,
    pub errors: CompileErrors,
    pub cases: Vec<TestCaseResult>,
}

impl Submission {
    /// Every case passed with no constraint broken.
    pub fn solved(&self) -> bool {
        !self.errors.has_errors()
            && !self.cases.is_empty()
            && self.cases.iter().all(|c| c.status() == TestStatus::Passed)
    }
}

/// Compile `source` and run it against every test case of `puzzle`, grading
/// each case that met its orders. A program that fails to compile is not run.
pub fn submit(
    puzzle: &Puzzle,
    source: &str,
    file_name: &str,
    limits: EvalLimits,
) -> Result<Submission, PuzzleError> {
    let compiled = compile(source, file_name);
    let (Some(program), Some(stats)) = (&compiled.program, compiled.stats) else {
        return Ok(Submission {
            stats: None,
            errors: compiled.errors,
            cases: Vec::new(),
        });
    };

    let stations = puzzle.build_stations()?;
    let mut cases = run_puzzle(puzzle, program, limits)?;
    for case in cases.iter_mut().filter(|c| c.report.succeeded()) {
        case.violations =
            check_constraints(puzzle, &stations, &stats, &compiled.tokens, &case.report.log);
    }

    Ok(Submission {
        stats: Some(stats),
        errors: compiled.errors,
        cases,
    })
}
