//! Runtime values.
//!
//! Every value carries its [`Type`] tag. Operations check tags through the
//! `as_*` accessors and fail with [`EvalError::TypeError`] on a mismatch;
//! nothing is coerced.

use crate::error::{EvalError, EvalResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The tag of a runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Bool,
    Str,
    Num,
    List,
    None,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Bool => "bool",
            Type::Str => "string",
            Type::Num => "number",
            Type::List => "list",
            Type::None => "none",
        };
        f.write_str(name)
    }
}

/// A tagged runtime value.
///
/// Derived equality compares tags and payloads, so values of different
/// tags are never equal. That is exactly what `==` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bool(bool),
    Str(String),
    Num(i64),
    /// Element tag plus items. The element tag is [`Type::None`] for `[]`.
    List(Type, Vec<Value>),
    None,
}

impl Value {
    pub fn type_of(&self) -> Type {
        match self {
            Value::Bool(_) => Type::Bool,
            Value::Str(_) => Type::Str,
            Value::Num(_) => Type::Num,
            Value::List(..) => Type::List,
            Value::None => Type::None,
        }
    }

    /// Build a list, requiring every item to share one tag.
    pub fn list(items: Vec<Value>) -> EvalResult<Value> {
        let elem = items.first().map_or(Type::None, Value::type_of);
        if let Some(odd) = items.iter().find(|v| v.type_of() != elem) {
            return Err(EvalError::TypeError {
                expected: elem,
                found: odd.type_of(),
            });
        }
        Ok(Value::List(elem, items))
    }

    /// A list of strings, as used for the pre-bound `orders` variable.
    pub fn str_list<I, S>(items: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(
            Type::Str,
            items.into_iter().map(|s| Value::Str(s.into())).collect(),
        )
    }

    /// Fail with a type error unless this value has tag `expected`.
    pub fn check(&self, expected: Type) -> EvalResult<&Value> {
        if self.type_of() == expected {
            Ok(self)
        } else {
            Err(self.mismatch(expected))
        }
    }

    pub fn as_bool(&self) -> EvalResult<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch(Type::Bool)),
        }
    }

    pub fn as_num(&self) -> EvalResult<i64> {
        match self {
            Value::Num(n) => Ok(*n),
            other => Err(other.mismatch(Type::Num)),
        }
    }

    pub fn as_str(&self) -> EvalResult<&str> {
        match self {
            Value::Str(s) => Ok(s),
            other => Err(other.mismatch(Type::Str)),
        }
    }

    pub fn as_list(&self) -> EvalResult<(Type, &[Value])> {
        match self {
            Value::List(elem, items) => Ok((*elem, items)),
            other => Err(other.mismatch(Type::List)),
        }
    }

    fn mismatch(&self, expected: Type) -> EvalError {
        EvalError::TypeError {
            expected,
            found: self.type_of(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => f.write_str(s),
            Value::Num(n) => write!(f, "{n}"),
            Value::List(_, items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::None => f.write_str("none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_needs_matching_tags() {
        assert_eq!(Value::Num(1), Value::Num(1));
        assert_ne!(Value::Num(1), Value::Str("1".into()));
        assert_ne!(Value::None, Value::Bool(false));
        assert_eq!(Value::str_list(["a"]), Value::str_list(["a"]));
        assert_ne!(Value::str_list(["a", "b"]), Value::str_list(["b", "a"]));
    }

    #[test]
    fn accessors_report_expected_and_found() {
        let err = Value::Str("x".into()).as_num().unwrap_err();
        assert_eq!(
            err,
            EvalError::TypeError {
                expected: Type::Num,
                found: Type::Str
            }
        );
        assert!(Value::Bool(true).check(Type::Bool).is_ok());
        assert!(Value::None.check(Type::List).is_err());
    }

    #[test]
    fn list_requires_one_element_tag() {
        let ok = Value::list(vec![Value::Num(1), Value::Num(2)]).unwrap();
        assert_eq!(ok.as_list().unwrap().0, Type::Num);
        assert_eq!(Value::list(vec![]).unwrap(), Value::List(Type::None, vec![]));
        assert!(Value::list(vec![Value::Num(1), Value::Str("a".into())]).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Value::Num(-3).to_string(), "-3");
        assert_eq!(Value::Str("Bun".into()).to_string(), "Bun");
        assert_eq!(Value::str_list(["a", "b"]).to_string(), "[a, b]");
        assert_eq!(Value::None.to_string(), "none");
    }
}
