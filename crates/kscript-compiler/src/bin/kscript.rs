//! kscript CLI: check and run kitchen scripts against puzzle files.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kscript_compiler::{compile, run_case, submit, Puzzle, TestStatus};
use kscript_eval::EvalLimits;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "kscript")]
#[command(about = "Run kitchen scripts against puzzle definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a script and report errors and statistics
    Check {
        /// Script file
        script: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a script against a puzzle's test cases
    Run {
        /// Puzzle definition (JSON)
        puzzle: PathBuf,

        /// Script file; defaults to the puzzle's starter code
        script: Option<PathBuf>,

        /// Run only this test case (0-based)
        #[arg(long)]
        case: Option<usize>,

        /// Print the action logs as JSON
        #[arg(long)]
        json: bool,

        /// Step budget per test case
        #[arg(long, default_value_t = EvalLimits::default().max_steps)]
        max_steps: u64,

        /// Deepest allowed nesting of function calls
        #[arg(long, default_value_t = EvalLimits::default().max_call_depth)]
        max_call_depth: usize,

        /// Longest string, in bytes, a script may build
        #[arg(long, default_value_t = EvalLimits::default().max_string_len)]
        max_string_len: usize,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { script, json } => {
            let source = read_script(&script)?;
            let result = compile(&source, &script.display().to_string());
            if json {
                let out = serde_json::json!({
                    "stats": result.stats,
                    "errors": result.errors,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for err in &result.errors.errors {
                    eprintln!("{}: {err}", err.file);
                    eprintln!("    {}", err.source_line);
                    if let Some(hint) = &err.suggestion {
                        eprintln!("    hint: {hint}");
                    }
                }
                if let Some(stats) = result.stats {
                    println!(
                        "ok: {} statements ({} top-level), {} functions",
                        stats.statements, stats.top_level_statements, stats.functions
                    );
                }
            }
            Ok(exit(result.success()))
        }

        Commands::Run {
            puzzle,
            script,
            case,
            json,
            max_steps,
            max_call_depth,
            max_string_len,
        } => {
            let puzzle = Puzzle::load(&puzzle)
                .with_context(|| format!("loading {}", puzzle.display()))?;
            let (source, file_name) = match &script {
                Some(path) => (read_script(path)?, path.display().to_string()),
                None => (puzzle.starter_code.clone(), "<starter code>".to_string()),
            };
            let limits = EvalLimits {
                max_steps,
                max_call_depth,
                max_string_len,
            };

            if let Some(index) = case {
                let compiled = compile(&source, &file_name);
                let Some(program) = &compiled.program else {
                    bail!(
                        "{file_name} has {} compile error(s)",
                        compiled.errors.total_errors
                    );
                };
                let result = run_case(&puzzle, program, index, limits)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    for entry in &result.report.log {
                        println!("  {entry}");
                    }
                    if let Some(err) = result.report.error() {
                        println!("  error: {err}");
                    }
                }
                return Ok(exit(result.report.succeeded()));
            }

            let submission = submit(&puzzle, &source, &file_name, limits)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&submission)?);
                return Ok(exit(submission.solved()));
            }

            for err in &submission.errors.errors {
                eprintln!("{}: {err}", err.file);
            }
            for result in &submission.cases {
                let status = match result.status() {
                    TestStatus::Passed => "passed",
                    TestStatus::Warning => "passed with warnings",
                    TestStatus::Failed => "failed",
                    TestStatus::Error => "error",
                };
                println!("case {} {:?}: {status}", result.index, result.orders);
                if let Some(err) = result.report.error() {
                    println!("    {err}");
                }
                for violation in &result.violations {
                    println!("    {violation}");
                }
            }
            println!(
                "{}: {}",
                puzzle.name,
                if submission.solved() { "solved" } else { "not solved" }
            );
            Ok(exit(submission.solved()))
        }
    }
}

fn read_script(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn exit(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
