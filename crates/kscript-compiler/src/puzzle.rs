//! Puzzle definitions and running a program against every test case.

use kscript_eval::{
    bay_name, EvalLimits, FoodItem, Interpreter, Kitchen, KitchenError, Module, ModuleKind,
    Outcome, Pantry, RunReport, Station,
};
use kscript_types::ast::Program;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::constraints::Violation;

#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    #[error("failed to read puzzle file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid kitchen layout: {0}")]
    Layout(#[from] KitchenError),
    #[error("puzzle has {count} test case(s); there is no case {index}")]
    NoSuchCase { index: usize, count: usize },
    #[error("puzzle declares {expected} station(s) but lays out {found}")]
    StationCount { expected: usize, found: usize },
}

// ─────────────────────────────────────────────────────────────────────
// Definition
// ─────────────────────────────────────────────────────────────────────

/// A level as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub name: String,
    #[serde(default)]
    pub difficulty: u32,
    /// Each case is the ordered list of dishes to deliver.
    pub test_cases: Vec<Vec<String>>,
    #[serde(default)]
    pub starter_pantry: Vec<String>,
    #[serde(default)]
    pub starter_code: String,
    /// Declared station count, checked against `stations`; `0` skips the check.
    #[serde(default)]
    pub num_of_stations: usize,
    #[serde(default)]
    pub stations: Vec<StationSignature>,
    /// Whether the editor lets the player swap modules. Only the editor
    /// reads it; runs always use the layout as given.
    #[serde(default)]
    pub modules_locked: bool,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub story_prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationSignature {
    pub name: String,
    #[serde(default)]
    pub modules: Vec<ModuleSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSignature {
    /// Kind name, e.g. `"SoupMaker"`.
    pub module: String,
    pub name: String,
    #[serde(default)]
    pub locked: bool,
}

/// Grading limits. `-1` means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Constraints {
    pub max_statements: i64,
    pub max_actions: i64,
    /// One of the [`AdditionalConstraint`] names; anything else is ignored.
    pub additional_constraint: String,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_statements: -1,
            max_actions: -1,
            additional_constraint: String::new(),
        }
    }
}

/// Style rules a puzzle can add on top of its size limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdditionalConstraint {
    /// At most three real modules in the whole kitchen.
    LessModules,
    /// No station may fill all three of its bays.
    IndustrialKitchen,
    /// No function takes more than three parameters.
    LessParams,
    /// Six or seven functions, none longer than five statements.
    MaxFiveLinesPerMethodMaxSevenMethods,
    /// Conditions may not combine comparisons with `and`/`or`.
    MaxOneIfComparison,
}

impl AdditionalConstraint {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LessModules" => Some(Self::LessModules),
            "IndustrialKitchen" => Some(Self::IndustrialKitchen),
            "LessParams" => Some(Self::LessParams),
            "maxFiveLinesPerMethodMaxSevenMethods" => {
                Some(Self::MaxFiveLinesPerMethodMaxSevenMethods)
            }
            "maxOneIfComparison" => Some(Self::MaxOneIfComparison),
            _ => None,
        }
    }
}

impl Constraints {
    pub fn additional(&self) -> Option<AdditionalConstraint> {
        AdditionalConstraint::from_name(&self.additional_constraint)
    }
}

impl ModuleSignature {
    /// Build the module for bay `index` of `station`. Empty bays always take
    /// their positional name so they never clash across stations.
    pub fn to_module(&self, station: &str, index: usize) -> Result<Module, KitchenError> {
        let kind: ModuleKind = self.module.parse()?;
        let name = if kind == ModuleKind::None {
            bay_name(station, index)
        } else {
            self.name.clone()
        };
        Ok(Module::new(kind, name).locked(self.locked))
    }
}

impl StationSignature {
    pub fn to_station(&self) -> Result<Station, KitchenError> {
        let modules = self
            .modules
            .iter()
            .enumerate()
            .map(|(i, sig)| sig.to_module(&self.name, i))
            .collect::<Result<Vec<_>, _>>()?;
        Station::new(self.name.clone(), modules)
    }

    /// The signature of an existing station, for saving a layout.
    pub fn of(station: &Station) -> Self {
        Self {
            name: station.name().to_string(),
            modules: station
                .modules()
                .iter()
                .map(|m| ModuleSignature {
                    module: m.kind().signature().to_string(),
                    name: m.name().to_string(),
                    locked: m.is_locked(),
                })
                .collect(),
        }
    }
}

impl Puzzle {
    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PuzzleError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> Result<String, PuzzleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn build_stations(&self) -> Result<Vec<Station>, PuzzleError> {
        if self.num_of_stations != 0 && self.num_of_stations != self.stations.len() {
            return Err(PuzzleError::StationCount {
                expected: self.num_of_stations,
                found: self.stations.len(),
            });
        }
        let stations = self
            .stations
            .iter()
            .map(StationSignature::to_station)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stations)
    }

    /// A fresh kitchen set up for test case `index`.
    pub fn kitchen_for(&self, index: usize) -> Result<Kitchen, PuzzleError> {
        let case = self.test_cases.get(index).ok_or(PuzzleError::NoSuchCase {
            index,
            count: self.test_cases.len(),
        })?;
        let pantry: Pantry = self.starter_pantry.iter().map(String::as_str).collect();
        let orders = case.iter().map(FoodItem::new).collect();
        Ok(Kitchen::new(self.build_stations()?, pantry, orders)?)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Running
// ─────────────────────────────────────────────────────────────────────

/// How one test case went, after grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestStatus {
    Passed,
    /// Orders were met but a puzzle constraint was broken.
    Warning,
    Failed,
    /// The program stopped on a runtime error.
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct TestCaseResult {
    pub index: usize,
    pub orders: Vec<String>,
    pub report: RunReport,
    /// Constraint violations; only graded for cases that met their orders.
    pub violations: Vec<Violation>,
}

impl TestCaseResult {
    pub fn status(&self) -> TestStatus {
        match &self.report.outcome {
            Outcome::Success if self.violations.is_empty() => TestStatus::Passed,
            Outcome::Success => TestStatus::Warning,
            Outcome::Failure => TestStatus::Failed,
            Outcome::Aborted(_) => TestStatus::Error,
        }
    }
}

/// Run `program` once per test case, each time in a fresh kitchen.
pub fn run_puzzle(
    puzzle: &Puzzle,
    program: &Program,
    limits: EvalLimits,
) -> Result<Vec<TestCaseResult>, PuzzleError> {
    let mut results = Vec::with_capacity(puzzle.test_cases.len());
    for (index, orders) in puzzle.test_cases.iter().enumerate() {
        results.push(run_case(puzzle, program, index, limits)?);
        debug!(case = index, orders = ?orders, "case finished");
    }
    info!(
        puzzle = %puzzle.name,
        cases = results.len(),
        passed = results.iter().filter(|r| r.report.succeeded()).count(),
        "puzzle run complete"
    );
    Ok(results)
}

/// Run a single test case.
pub fn run_case(
    puzzle: &Puzzle,
    program: &Program,
    index: usize,
    limits: EvalLimits,
) -> Result<TestCaseResult, PuzzleError> {
    let kitchen = puzzle.kitchen_for(index)?;
    let report = Interpreter::with_limits(kitchen, limits).run(program);
    Ok(TestCaseResult {
        index,
        orders: puzzle.test_cases[index].clone(),
        report,
        violations: Vec::new(),
    })
}
