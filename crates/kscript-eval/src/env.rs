//! Variable environment, call frames and the global function table.

use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use kscript_types::ast::FuncDecl;
use std::collections::BTreeMap;
use std::rc::Rc;

type Bindings = BTreeMap<String, Value>;

/// Flat variable bindings plus a stack of saved caller bindings.
///
/// Blocks do not open scopes; only calls do. A call saves the caller's
/// bindings, runs against a copy of them, and the saved bindings come back
/// when the call returns. Functions live in one global, write-once table.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: Bindings,
    frames: Vec<Bindings>,
    functions: BTreeMap<String, Rc<FuncDecl>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// An environment with some variables already bound.
    pub fn with_bindings(bindings: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            vars: bindings.into_iter().collect(),
            ..Self::default()
        }
    }

    // ── Variables ──

    /// Bind a new variable. Fails if the name is already bound.
    pub fn declare(&mut self, name: &str, value: Value) -> EvalResult<()> {
        if self.vars.contains_key(name) {
            return Err(EvalError::AlreadyDefined(name.to_string()));
        }
        self.vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Rebind an existing variable.
    pub fn assign(&mut self, name: &str, value: Value) -> EvalResult<()> {
        match self.vars.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(EvalError::UndefinedVariable(name.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> EvalResult<&Value> {
        self.vars
            .get(name)
            .ok_or_else(|| EvalError::UndefinedVariable(name.to_string()))
    }

    // ── Functions ──

    /// Register a function. Fails if a variable or function already has
    /// the name.
    pub fn define_function(&mut self, decl: &FuncDecl) -> EvalResult<()> {
        let name = &decl.name.name;
        if self.vars.contains_key(name) || self.functions.contains_key(name) {
            return Err(EvalError::AlreadyDefined(name.clone()));
        }
        self.functions.insert(name.clone(), Rc::new(decl.clone()));
        Ok(())
    }

    pub fn function(&self, name: &str) -> EvalResult<Rc<FuncDecl>> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedFunction(name.to_string()))
    }

    // ── Call frames ──

    /// Save the caller's bindings and bind `params` in the callee's copy.
    /// Parameters shadow caller variables of the same name.
    pub fn push_frame(&mut self, params: impl IntoIterator<Item = (String, Value)>) {
        self.frames.push(self.vars.clone());
        self.vars.extend(params);
    }

    /// Drop the callee's bindings and restore the caller's.
    pub fn pop_frame(&mut self) {
        if let Some(saved) = self.frames.pop() {
            self.vars = saved;
        }
    }

    /// Number of active calls.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}
