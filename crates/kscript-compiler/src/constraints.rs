//! Grading a working solution against a puzzle's constraints.

use crate::puzzle::{AdditionalConstraint, Puzzle};
use crate::stats::ProgramStats;
use kscript_eval::{ActionEntry, Station};
use kscript_lexer::{Token, TokenKind};
use serde::Serialize;
use std::fmt;

/// Most real modules the `LessModules` rule allows.
pub const LESS_MODULES_MAX: usize = 3;
/// Most real modules one station may hold under `IndustrialKitchen`.
pub const INDUSTRIAL_STATION_MAX: usize = 2;
/// Most parameters a function may take under `LessParams`.
pub const LESS_PARAMS_MAX: usize = 3;
/// Function count window and body size for the method-size rule.
pub const METHODS_MIN: usize = 6;
pub const METHODS_MAX: usize = 7;
pub const METHOD_BODY_MAX: usize = 5;

/// One broken constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum Violation {
    TooManyStatements { max: usize, found: usize },
    TooManyActions { max: usize, found: usize },
    TooManyModules { max: usize, found: usize },
    CrowdedStation { station: String, modules: usize },
    TooManyParams { max: usize, found: usize },
    WrongFunctionCount { min: usize, max: usize, found: usize },
    FunctionTooLong { max: usize, found: usize },
    CompoundCondition { line: u32 },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyStatements { max, found } => {
                write!(f, "uses {found} statements; the limit is {max}")
            }
            Self::TooManyActions { max, found } => {
                write!(f, "takes {found} actions; the limit is {max}")
            }
            Self::TooManyModules { max, found } => {
                write!(f, "uses {found} modules; the limit is {max}")
            }
            Self::CrowdedStation { station, modules } => {
                write!(f, "station {station} holds {modules} modules")
            }
            Self::TooManyParams { max, found } => {
                write!(f, "a function takes {found} parameters; the limit is {max}")
            }
            Self::WrongFunctionCount { min, max, found } => {
                write!(f, "declares {found} functions; {min} to {max} are required")
            }
            Self::FunctionTooLong { max, found } => {
                write!(f, "a function has {found} statements; the limit is {max}")
            }
            Self::CompoundCondition { line } => {
                write!(f, "line {line} combines conditions with and/or")
            }
        }
    }
}

/// Check a solution that met its orders. `stations` is the kitchen layout
/// the player ran with, `tokens` the lexed program and `log` the action log
/// of the run.
pub fn check_constraints(
    puzzle: &Puzzle,
    stations: &[Station],
    stats: &ProgramStats,
    tokens: &[Token],
    log: &[ActionEntry],
) -> Vec<Violation> {
    let mut violations = Vec::new();
    let limits = &puzzle.constraints;

    if let Some(max) = limit(limits.max_statements) {
        if stats.statements > max {
            violations.push(Violation::TooManyStatements {
                max,
                found: stats.statements,
            });
        }
    }

    if let Some(max) = limit(limits.max_actions) {
        let found = log.iter().filter(|e| !e.action.is_terminal()).count();
        if found > max {
            violations.push(Violation::TooManyActions { max, found });
        }
    }

    match limits.additional() {
        Some(AdditionalConstraint::LessModules) => {
            let found = stations
                .iter()
                .map(|s| s.real_modules().count())
                .sum::<usize>();
            if found > LESS_MODULES_MAX {
                violations.push(Violation::TooManyModules {
                    max: LESS_MODULES_MAX,
                    found,
                });
            }
        }
        Some(AdditionalConstraint::IndustrialKitchen) => {
            for station in stations {
                let modules = station.real_modules().count();
                if modules > INDUSTRIAL_STATION_MAX {
                    violations.push(Violation::CrowdedStation {
                        station: station.name().to_string(),
                        modules,
                    });
                }
            }
        }
        Some(AdditionalConstraint::LessParams) => {
            if stats.max_params > LESS_PARAMS_MAX {
                violations.push(Violation::TooManyParams {
                    max: LESS_PARAMS_MAX,
                    found: stats.max_params,
                });
            }
        }
        Some(AdditionalConstraint::MaxFiveLinesPerMethodMaxSevenMethods) => {
            if !(METHODS_MIN..=METHODS_MAX).contains(&stats.functions) {
                violations.push(Violation::WrongFunctionCount {
                    min: METHODS_MIN,
                    max: METHODS_MAX,
                    found: stats.functions,
                });
            }
            if stats.longest_function > METHOD_BODY_MAX {
                violations.push(Violation::FunctionTooLong {
                    max: METHOD_BODY_MAX,
                    found: stats.longest_function,
                });
            }
        }
        Some(AdditionalConstraint::MaxOneIfComparison) => {
            let compound = tokens
                .iter()
                .find(|t| matches!(t.kind, TokenKind::And | TokenKind::Or));
            if let Some(token) = compound {
                violations.push(Violation::CompoundCondition {
                    line: token.span.start_line,
                });
            }
        }
        None => {}
    }

    violations
}

/// `-1` (or any negative number) means no limit.
fn limit(raw: i64) -> Option<usize> {
    usize::try_from(raw).ok()
}
