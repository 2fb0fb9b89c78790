//! Runtime and kitchen error types.

use crate::value::Type;
use serde::Serialize;

/// A kitchen rule was broken, either while building the kitchen from a
/// puzzle layout or while the chef was acting in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum KitchenError {
    // ── Layout ──
    #[error("station name '{0}' is used more than once")]
    DuplicateStation(String),
    #[error("'{0}' is reserved and cannot name a station")]
    ReservedStationName(String),
    #[error("module name '{0}' is used more than once")]
    DuplicateModule(String),
    #[error("'{0}' is not a module kind")]
    UnknownModuleKind(String),
    #[error("station '{station}' has {count} modules; at most 3 fit")]
    TooManyModules { station: String, count: usize },

    // ── Chef ──
    #[error("there is no location called '{0}'")]
    UnknownLocation(String),
    #[error("there is no module called '{0}'")]
    UnknownModule(String),
    #[error("{action} needs the chef at the {required}, but the chef is at {actual}")]
    WrongLocation {
        action: String,
        required: String,
        actual: String,
    },
    #[error("the pantry has no {0} left")]
    OutOfStock(String),
    #[error("the chef is not holding anything")]
    EmptyHands,
    #[error("the chef is holding {held}, not {item}")]
    NotHolding { item: String, held: String },

    // ── Modules ──
    #[error("{module} has no slot {slot}; it has {size}")]
    SlotOutOfRange { module: String, slot: i64, size: usize },
    #[error("{0} is an empty bay")]
    EmptyBay(String),
    #[error("slot number {slot} of {module} has no food")]
    SlotEmpty { module: String, slot: usize },
    #[error("slot number {slot} of {module} does not have {expected}")]
    WrongItem {
        module: String,
        slot: usize,
        expected: String,
    },
    #[error("slot number {slot} of {module} is not a {wanted}")]
    Missing {
        module: String,
        slot: usize,
        wanted: String,
    },
    #[error("slot number {slot} of {module} is already a {unwanted}")]
    AlreadyDone {
        module: String,
        slot: usize,
        unwanted: String,
    },
}

/// Result alias for kitchen operations.
pub type KitchenResult<T> = Result<T, KitchenError>;

/// Broad class of a runtime error, for frontends that only care which kind
/// of mistake the player made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    Type,
    Name,
    Arity,
    World,
    Arithmetic,
    Budget,
}

/// An error that aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum EvalError {
    #[error("type error: expected {expected}, got {found}")]
    TypeError { expected: Type, found: Type },
    #[error("name error: '{0}' is not defined")]
    UndefinedVariable(String),
    #[error("name error: no function called '{0}'")]
    UndefinedFunction(String),
    #[error("name error: '{0}' is already defined")]
    AlreadyDefined(String),
    #[error("arity error: {name} takes {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("kitchen error: {0}")]
    World(#[from] KitchenError),
    #[error("index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: i64, len: usize },
    #[error("division by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("step limit of {0} exceeded")]
    StepLimitExceeded(u64),
    #[error("call depth limit of {0} exceeded")]
    CallDepthExceeded(usize),
    #[error("a string of {len} bytes is over the limit of {max}")]
    ValueTooLarge { len: usize, max: usize },
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeError { .. } => ErrorKind::Type,
            Self::UndefinedVariable(_) | Self::UndefinedFunction(_) | Self::AlreadyDefined(_) => {
                ErrorKind::Name
            }
            Self::Arity { .. } => ErrorKind::Arity,
            Self::World(_) => ErrorKind::World,
            Self::IndexOutOfRange { .. } | Self::DivisionByZero | Self::Overflow => {
                ErrorKind::Arithmetic
            }
            Self::StepLimitExceeded(_)
            | Self::CallDepthExceeded(_)
            | Self::ValueTooLarge { .. } => ErrorKind::Budget,
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
