//! The action log a run produces, and the report handed back to callers.
//!
//! The frontend replays [`ActionEntry`] values one per tick. Entries are
//! appended in execution order and never changed afterwards.

use crate::error::EvalError;
use crate::kitchen::{FoodItem, Location};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the chef visibly does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Action {
    Move { to: Location },
    PickUp { item: FoodItem },
    PutDown { item: FoodItem },
    Use { module: String },
    Success,
    Failure,
    NoOp,
}

impl Action {
    /// `Success` and `Failure` close a completed run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Action::Success | Action::Failure)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    pub action: Action,
    pub message: String,
}

impl ActionEntry {
    pub fn new(action: Action, message: impl Into<String>) -> Self {
        Self {
            action,
            message: message.into(),
        }
    }
}

impl fmt::Display for ActionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "kebab-case")]
pub enum Outcome {
    /// Ran to completion and every order was delivered in sequence.
    Success,
    /// Ran to completion but the deliveries did not match the orders.
    Failure,
    /// A runtime error stopped the program.
    Aborted(EvalError),
}

/// Everything a run hands back: the log (partial if aborted) and the outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub log: Vec<ActionEntry>,
    pub outcome: Outcome,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == Outcome::Success
    }

    pub fn error(&self) -> Option<&EvalError> {
        match &self.outcome {
            Outcome::Aborted(err) => Some(err),
            _ => None,
        }
    }

    /// Log entries other than the closing success/failure.
    pub fn action_count(&self) -> usize {
        self.log.iter().filter(|e| !e.action.is_terminal()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_serialize_with_kind_tag() {
        let entry = ActionEntry::new(
            Action::Move {
                to: Location::Station("Stove".into()),
            },
            "Moved to Stove",
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["action"]["kind"], "move");
        assert_eq!(json["action"]["to"]["type"], "station");
        assert_eq!(json["action"]["to"]["name"], "Stove");

        let json = serde_json::to_value(Action::PickUp {
            item: FoodItem::new("Egg"),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"kind": "pick-up", "item": "Egg"}));
        assert_eq!(
            serde_json::to_value(Action::NoOp).unwrap(),
            serde_json::json!({"kind": "no-op"})
        );
    }

    #[test]
    fn entries_deserialize() {
        let entry: ActionEntry =
            serde_json::from_str(r#"{"action":{"kind":"use","module":"soup"},"message":"m"}"#)
                .unwrap();
        assert_eq!(entry.action, Action::Use { module: "soup".into() });
    }

    #[test]
    fn outcome_serializes_status() {
        let report = RunReport {
            log: vec![],
            outcome: Outcome::Aborted(EvalError::DivisionByZero),
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"]["status"], "aborted");
        assert_eq!(json["outcome"]["error"]["kind"], "division-by-zero");
        assert!(report.error().is_some());
        assert!(!report.succeeded());
    }
}
