//! Statement and expression evaluation.

use crate::env::Environment;
use crate::error::{EvalError, EvalResult};
use crate::interpreter::EvalLimits;
use crate::kitchen::{FoodItem, Kitchen};
use crate::log::{Action, ActionEntry};
use crate::value::Value;
use kscript_types::ast::*;
use tracing::{debug, trace};

/// How a statement finished.
#[derive(Debug)]
pub(crate) enum Flow {
    Normal,
    Return(Value),
}

/// Walks the AST, mutating the kitchen and appending to the action log.
pub struct Evaluator {
    pub(crate) env: Environment,
    pub(crate) kitchen: Kitchen,
    pub(crate) log: Vec<ActionEntry>,
    limits: EvalLimits,
    steps: u64,
}

impl Evaluator {
    pub fn new(kitchen: Kitchen, env: Environment, limits: EvalLimits) -> Self {
        Self {
            env,
            kitchen,
            log: Vec::new(),
            limits,
            steps: 0,
        }
    }

    /// Steps spent so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Spend one step of the budget.
    fn tick(&mut self) -> EvalResult<()> {
        self.steps += 1;
        if self.steps > self.limits.max_steps {
            Err(EvalError::StepLimitExceeded(self.limits.max_steps))
        } else {
            Ok(())
        }
    }

    fn record(&mut self, action: Action, message: String) {
        debug!(?action, %message, "action");
        self.log.push(ActionEntry::new(action, message));
    }

    // ══════════════════════════════════════════════════════════════════════
    // Statements
    // ══════════════════════════════════════════════════════════════════════

    pub(crate) fn exec_block(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        self.tick()?;
        trace!(line = stmt.span().start_line, "exec");
        match stmt {
            Stmt::Var(decl) => {
                let value = self.eval_expr(&decl.value)?;
                self.env.declare(&decl.name.name, value)?;
            }
            Stmt::Assign(assign) => {
                let value = self.eval_expr(&assign.value)?;
                self.env.assign(&assign.name.name, value)?;
            }
            Stmt::Func(decl) => self.env.define_function(decl)?,
            Stmt::If(if_stmt) => return self.exec_if(if_stmt),
            Stmt::While(while_stmt) => return self.exec_while(while_stmt),
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::None,
                };
                return Ok(Flow::Return(value));
            }
            Stmt::Expr(expr_stmt) => {
                self.eval_expr(&expr_stmt.expr)?;
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_if(&mut self, if_stmt: &IfStmt) -> EvalResult<Flow> {
        for branch in &if_stmt.branches {
            if self.eval_expr(&branch.condition)?.as_bool()? {
                return self.exec_block(&branch.body.stmts);
            }
        }
        match &if_stmt.else_block {
            Some(block) => self.exec_block(&block.stmts),
            None => Ok(Flow::Normal),
        }
    }

    fn exec_while(&mut self, while_stmt: &WhileStmt) -> EvalResult<Flow> {
        while self.eval_expr(&while_stmt.condition)?.as_bool()? {
            self.tick()?;
            if let Flow::Return(value) = self.exec_block(&while_stmt.body.stmts)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expressions
    // ══════════════════════════════════════════════════════════════════════

    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Num(*n)),
            ExprKind::StringLit(s) => Ok(Value::Str(s.clone())),
            ExprKind::BoolLit(b) => Ok(Value::Bool(*b)),
            ExprKind::NoneLit => Ok(Value::None),
            ExprKind::ListLit(elems) => {
                let items = elems
                    .iter()
                    .map(|e| self.eval_expr(e))
                    .collect::<EvalResult<Vec<_>>>()?;
                Value::list(items)
            }
            ExprKind::Identifier(name) => self.env.get(name).cloned(),
            ExprKind::Call { name, args } => self.call_function(&name.name, args),
            ExprKind::Builtin { builtin, args } => self.call_builtin(*builtin, args),
            ExprKind::Index { target, index } => self.eval_index(target, index),
            ExprKind::Binary { left, op, right } => self.eval_binary(left, *op, right),
            ExprKind::Unary { op, operand } => self.eval_unary(*op, operand),
            ExprKind::Paren(inner) => self.eval_expr(inner),
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        args.iter().map(|a| self.eval_expr(a)).collect()
    }

    fn eval_index(&mut self, target: &Expr, index: &Expr) -> EvalResult<Value> {
        let list = self.eval_expr(target)?;
        let index = self.eval_expr(index)?.as_num()?;
        let (_, items) = list.as_list()?;
        usize::try_from(index)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .ok_or(EvalError::IndexOutOfRange {
                index,
                len: items.len(),
            })
    }

    // ── Operators ─────────────────────────────────────────────────────────

    /// Both operands are always evaluated, left first.
    fn eval_binary(&mut self, left: &Expr, op: BinOp, right: &Expr) -> EvalResult<Value> {
        let l = self.eval_expr(left)?;
        let r = self.eval_expr(right)?;
        match op {
            BinOp::Add => match &l {
                Value::Str(a) => {
                    let b = r.as_str()?;
                    let len = a.len() + b.len();
                    if len > self.limits.max_string_len {
                        return Err(EvalError::ValueTooLarge {
                            len,
                            max: self.limits.max_string_len,
                        });
                    }
                    Ok(Value::Str(format!("{a}{b}")))
                }
                _ => checked(l.as_num()?.checked_add(r.as_num()?)),
            },
            BinOp::Sub => checked(l.as_num()?.checked_sub(r.as_num()?)),
            BinOp::Mul => checked(l.as_num()?.checked_mul(r.as_num()?)),
            BinOp::Div | BinOp::Mod => {
                let (a, b) = (l.as_num()?, r.as_num()?);
                if b == 0 {
                    return Err(EvalError::DivisionByZero);
                }
                checked(if op == BinOp::Div {
                    a.checked_div(b)
                } else {
                    a.checked_rem(b)
                })
            }
            BinOp::Eq => Ok(Value::Bool(l == r)),
            BinOp::NotEq => Ok(Value::Bool(l != r)),
            BinOp::Less => Ok(Value::Bool(l.as_num()? < r.as_num()?)),
            BinOp::LessEq => Ok(Value::Bool(l.as_num()? <= r.as_num()?)),
            BinOp::Greater => Ok(Value::Bool(l.as_num()? > r.as_num()?)),
            BinOp::GreaterEq => Ok(Value::Bool(l.as_num()? >= r.as_num()?)),
            BinOp::And => Ok(Value::Bool(l.as_bool()? & r.as_bool()?)),
            BinOp::Or => Ok(Value::Bool(l.as_bool()? | r.as_bool()?)),
        }
    }

    fn eval_unary(&mut self, op: UnaryOp, operand: &Expr) -> EvalResult<Value> {
        let value = self.eval_expr(operand)?;
        match op {
            UnaryOp::Not => Ok(Value::Bool(!value.as_bool()?)),
            UnaryOp::Neg => checked(value.as_num()?.checked_neg()),
            UnaryOp::Len => {
                let (_, items) = value.as_list()?;
                checked(i64::try_from(items.len()).ok())
            }
        }
    }

    // ── User functions ────────────────────────────────────────────────────

    fn call_function(&mut self, name: &str, args: &[Expr]) -> EvalResult<Value> {
        let decl = self.env.function(name)?;
        if args.len() != decl.params.len() {
            return Err(EvalError::Arity {
                name: name.to_string(),
                expected: decl.params.len(),
                found: args.len(),
            });
        }
        let values = self.eval_args(args)?;
        if self.env.depth() >= self.limits.max_call_depth {
            return Err(EvalError::CallDepthExceeded(self.limits.max_call_depth));
        }

        trace!(function = name, depth = self.env.depth() + 1, "call");
        let params = decl.params.iter().map(|p| p.name.clone()).zip(values);
        self.env.push_frame(params);
        let result = self.exec_block(&decl.body.stmts);
        self.env.pop_frame();

        match result? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::None),
        }
    }

    // ── Kitchen calls ─────────────────────────────────────────────────────

    /// Run one built-in. Every successful call logs exactly one entry.
    fn call_builtin(&mut self, builtin: Builtin, args: &[Expr]) -> EvalResult<Value> {
        if args.len() != builtin.arity() {
            return Err(EvalError::Arity {
                name: builtin.name().to_string(),
                expected: builtin.arity(),
                found: args.len(),
            });
        }
        let values = self.eval_args(args)?;
        debug!(%builtin, args = values.len(), "kitchen call");

        match builtin {
            Builtin::Goto => {
                let to = self.kitchen.goto(values[0].as_str()?)?.clone();
                self.record(Action::Move { to: to.clone() }, format!("Moved to {to}"));
                Ok(Value::None)
            }
            Builtin::Get => {
                let item = self.kitchen.get(values[0].as_str()?)?.clone();
                let message = format!("Picked up {item} from the Pantry");
                let name = item.name().to_string();
                self.record(Action::PickUp { item }, message);
                Ok(Value::Str(name))
            }
            Builtin::Deliver => {
                let item = self.kitchen.deliver()?;
                let message = format!("Delivered {item}");
                self.record(Action::PutDown { item }, message);
                Ok(Value::None)
            }
            Builtin::Place => {
                let module = values[0].as_str()?;
                let item = values[1].as_str()?;
                let slot = values[2].as_num()?;
                self.kitchen.place(module, item, slot)?;
                let message = format!("Placed {item} in slot {slot} of {module}");
                let item = FoodItem::new(item);
                self.record(Action::PutDown { item }, message);
                Ok(Value::None)
            }
            Builtin::Activate => {
                let module = values[0].as_str()?.to_string();
                let product = self.kitchen.activate(&module)?;
                let message = format!("Activated {module}, making {product}");
                self.record(Action::Use { module }, message);
                Ok(Value::Str(product.name().to_string()))
            }
            Builtin::Take => {
                let module = values[0].as_str()?;
                match self.kitchen.take(module)? {
                    Some(item) => {
                        let message = format!("Took {item} from {module}");
                        let name = item.name().to_string();
                        self.record(Action::PickUp { item }, message);
                        Ok(Value::Str(name))
                    }
                    None => {
                        let message = format!("{module} had nothing to take");
                        self.record(Action::NoOp, message);
                        Ok(Value::None)
                    }
                }
            }
            Builtin::Print => {
                let text = values[0].to_string();
                self.record(Action::NoOp, text);
                Ok(Value::None)
            }
        }
    }
}

fn checked(result: Option<i64>) -> EvalResult<Value> {
    result.map(Value::Num).ok_or(EvalError::Overflow)
}
