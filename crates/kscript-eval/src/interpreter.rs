//! One run of a program against one kitchen.

use crate::env::Environment;
use crate::evaluator::Evaluator;
use crate::kitchen::{FoodItem, Kitchen};
use crate::log::{Action, ActionEntry, Outcome, RunReport};
use crate::value::Value;
use kscript_types::ast::Program;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

/// Name of the variable holding the required orders.
pub const ORDERS_VAR: &str = "orders";

/// Execution budget for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvalLimits {
    /// Executed statements plus loop iterations.
    pub max_steps: u64,
    /// Nested user function calls.
    pub max_call_depth: usize,
    /// Longest string, in bytes, that concatenation may build.
    pub max_string_len: usize,
}

impl Default for EvalLimits {
    fn default() -> Self {
        Self {
            max_steps: 100_000,
            max_call_depth: 64,
            max_string_len: 64 * 1024,
        }
    }
}

/// Runs a program once against the kitchen it was built with.
///
/// An interpreter is used up by [`Interpreter::run`]; build a new one (and
/// a new [`Kitchen`]) for every attempt.
pub struct Interpreter {
    evaluator: Evaluator,
}

impl Interpreter {
    pub fn new(kitchen: Kitchen) -> Self {
        Self::with_limits(kitchen, EvalLimits::default())
    }

    /// Bind `orders` to the kitchen's required orders and set the budget.
    pub fn with_limits(kitchen: Kitchen, limits: EvalLimits) -> Self {
        let orders = Value::str_list(kitchen.required().iter().map(|o| o.name().to_string()));
        let env = Environment::with_bindings([(ORDERS_VAR.to_string(), orders)]);
        Self {
            evaluator: Evaluator::new(kitchen, env, limits),
        }
    }

    pub fn run(self, program: &Program) -> RunReport {
        self.execute(program).0
    }

    /// Like [`Interpreter::run`], also handing back the kitchen as the
    /// program left it.
    pub fn execute(mut self, program: &Program) -> (RunReport, Kitchen) {
        let span = info_span!("run", statements = program.stmts.len());
        let _guard = span.enter();
        info!(
            orders = self.evaluator.kitchen.required().len(),
            "run started"
        );

        let outcome = match self.evaluator.exec_block(&program.stmts) {
            Ok(_) => {
                let kitchen = &self.evaluator.kitchen;
                let (action, message, outcome) = if kitchen.orders_met() {
                    (
                        Action::Success,
                        "All orders were delivered".to_string(),
                        Outcome::Success,
                    )
                } else {
                    (
                        Action::Failure,
                        format!(
                            "Delivered {} but the orders were {}",
                            names(kitchen.delivered()),
                            names(kitchen.required())
                        ),
                        Outcome::Failure,
                    )
                };
                self.evaluator.log.push(ActionEntry::new(action, message));
                info!(
                    ?outcome,
                    steps = self.evaluator.steps(),
                    "run finished"
                );
                outcome
            }
            Err(err) => {
                warn!(error = %err, steps = self.evaluator.steps(), "run aborted");
                Outcome::Aborted(err)
            }
        };

        let report = RunReport {
            log: self.evaluator.log,
            outcome,
        };
        (report, self.evaluator.kitchen)
    }
}

fn names(items: &[FoodItem]) -> String {
    let names: Vec<&str> = items.iter().map(|i| i.name()).collect();
    format!("[{}]", names.join(", "))
}
