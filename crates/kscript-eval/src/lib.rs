//! Kitchen script runtime.
//!
//! Runs a parsed [`Program`](kscript_types::ast::Program) against a
//! simulated [`Kitchen`] and returns the ordered action log the frontend
//! replays. One [`Interpreter`] runs one program once.

pub mod env;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod kitchen;
pub mod log;
pub mod module;
pub mod value;

pub use env::Environment;
pub use error::{ErrorKind, EvalError, EvalResult, KitchenError, KitchenResult};
pub use evaluator::Evaluator;
pub use interpreter::{EvalLimits, Interpreter, ORDERS_VAR};
pub use kitchen::{bay_name, FoodItem, Kitchen, Location, Pantry, Station, BAYS_PER_STATION};
pub use log::{Action, ActionEntry, Outcome, RunReport};
pub use module::{Module, ModuleKind};
pub use value::{Type, Value};
