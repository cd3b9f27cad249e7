//! Tree-walking interpreter
//!
//! Evaluates a parsed module item by item and captures every top-level
//! binding into a [`Namespace`]. Functions are not evaluated until called;
//! a call resolves free names against the namespace the function was
//! defined in.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::eval::parser::{BinOp, Block, Expr, FunctionDef, Item, Program, Stmt, UnaryOp};
use crate::eval::value::Value;
use crate::eval::EvalError;

/// Maximum function call depth before evaluation is aborted
const MAX_CALL_DEPTH: u32 = 200;

/// The top-level bindings captured from one executed module
///
/// Iteration order is the lexicographic order of names.
#[derive(Debug, Clone)]
pub struct Namespace {
    name: String,
    bindings: BTreeMap<String, Value>,
}

impl Namespace {
    /// Dotted logical name of the module this namespace came from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a top-level binding
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    /// All bound names, sorted
    pub fn names(&self) -> Vec<String> {
        self.bindings.keys().cloned().collect()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if the module defined nothing
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Call a function bound in this namespace
    ///
    /// Free names in the function body resolve against this namespace, so
    /// functions may call other definitions from the same module.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, EvalError> {
        let value = self.get(name).ok_or_else(|| EvalError::Undefined {
            name: name.to_string(),
        })?;
        let Value::Function(def) = value else {
            return Err(EvalError::NotCallable {
                name: name.to_string(),
            });
        };
        let interp = Interpreter::new(&self.bindings);
        interp.call(def, args)
    }
}

/// Execute a parsed module and capture its top-level bindings
///
/// Items evaluate in file order: a `let` may reference any name defined
/// above it, including calling earlier functions. Later definitions of the
/// same name shadow earlier ones.
pub fn evaluate_program(module: &str, program: &Program) -> Result<Namespace, EvalError> {
    let mut bindings = BTreeMap::new();

    for item in &program.items {
        match item {
            Item::Function(def) => {
                bindings.insert(def.name.clone(), Value::Function(Arc::new(def.clone())));
            }
            Item::Let { name, value } => {
                let evaluated = {
                    let interp = Interpreter::new(&bindings);
                    let mut scope = Scope::new();
                    interp.eval_expr(value, &mut scope)?
                };
                bindings.insert(name.clone(), evaluated);
            }
        }
    }

    Ok(Namespace {
        name: module.to_string(),
        bindings,
    })
}

/// Lexical scope stack for one evaluation
struct Scope {
    frames: Vec<HashMap<String, Value>>,
}

impl Scope {
    fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    fn push(&mut self) {
        self.frames.push(HashMap::new());
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    fn define(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.to_string(), value);
        }
    }

    fn get(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }
}

struct Interpreter<'a> {
    globals: &'a BTreeMap<String, Value>,
    depth: Cell<u32>,
}

impl<'a> Interpreter<'a> {
    fn new(globals: &'a BTreeMap<String, Value>) -> Self {
        Self {
            globals,
            depth: Cell::new(0),
        }
    }

    /// Call a function with a fresh scope
    ///
    /// Functions see their parameters and the module globals; they do not
    /// capture locals from the calling context.
    fn call(&self, def: &FunctionDef, args: &[Value]) -> Result<Value, EvalError> {
        if def.params.len() != args.len() {
            return Err(EvalError::Arity {
                name: def.name.clone(),
                expected: def.params.len(),
                got: args.len(),
            });
        }

        if self.depth.get() >= MAX_CALL_DEPTH {
            return Err(EvalError::RecursionLimit {
                limit: MAX_CALL_DEPTH,
            });
        }
        self.depth.set(self.depth.get() + 1);

        let mut scope = Scope::new();
        for (param, arg) in def.params.iter().zip(args) {
            scope.define(param, arg.clone());
        }
        let result = self.eval_block(&def.body, &mut scope);

        self.depth.set(self.depth.get() - 1);
        result
    }

    fn eval_block(&self, block: &Block, scope: &mut Scope) -> Result<Value, EvalError> {
        scope.push();
        let result = self.eval_block_inner(block, scope);
        scope.pop();
        result
    }

    fn eval_block_inner(&self, block: &Block, scope: &mut Scope) -> Result<Value, EvalError> {
        for stmt in &block.stmts {
            match stmt {
                Stmt::Let { name, value } => {
                    let evaluated = self.eval_expr(value, scope)?;
                    scope.define(name, evaluated);
                }
                Stmt::Expr(expr) => {
                    self.eval_expr(expr, scope)?;
                }
            }
        }
        match &block.tail {
            Some(expr) => self.eval_expr(expr, scope),
            None => Ok(Value::Unit),
        }
    }

    fn eval_expr(&self, expr: &Expr, scope: &mut Scope) -> Result<Value, EvalError> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Ident(name) => self.lookup(name, scope).cloned(),
            Expr::Unary { op, operand } => {
                let value = self.eval_expr(operand, scope)?;
                self.eval_unary(*op, value)
            }
            Expr::Binary { op, lhs, rhs } => self.eval_binary(*op, lhs, rhs, scope),
            Expr::Call { callee, args, .. } => {
                let function = self.lookup(callee, scope)?.clone();
                let Value::Function(def) = function else {
                    return Err(EvalError::NotCallable {
                        name: callee.clone(),
                    });
                };
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(self.eval_expr(arg, scope)?);
                }
                self.call(&def, &evaluated)
            }
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.eval_expr(cond, scope)?;
                let Value::Bool(cond) = cond else {
                    return Err(EvalError::Type {
                        message: format!(
                            "if condition must be bool, got {}",
                            cond.type_name()
                        ),
                    });
                };
                if cond {
                    self.eval_block(then_branch, scope)
                } else if let Some(else_branch) = else_branch {
                    self.eval_block(else_branch, scope)
                } else {
                    Ok(Value::Unit)
                }
            }
            Expr::Block(block) => self.eval_block(block, scope),
        }
    }

    fn lookup<'s>(&'s self, name: &str, scope: &'s Scope) -> Result<&'s Value, EvalError> {
        scope
            .get(name)
            .or_else(|| self.globals.get(name))
            .ok_or_else(|| EvalError::Undefined {
                name: name.to_string(),
            })
    }

    fn eval_unary(&self, op: UnaryOp, value: Value) -> Result<Value, EvalError> {
        match (op, value) {
            (UnaryOp::Neg, Value::Int(n)) => {
                n.checked_neg().map(Value::Int).ok_or(EvalError::Type {
                    message: "integer overflow in negation".to_string(),
                })
            }
            (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
            (UnaryOp::Neg, value) => Err(EvalError::Type {
                message: format!("cannot negate {}", value.type_name()),
            }),
            (UnaryOp::Not, value) => Err(EvalError::Type {
                message: format!("cannot apply '!' to {}", value.type_name()),
            }),
        }
    }

    fn eval_binary(
        &self,
        op: BinOp,
        lhs: &Expr,
        rhs: &Expr,
        scope: &mut Scope,
    ) -> Result<Value, EvalError> {
        // Short-circuit operators evaluate the right side conditionally
        if matches!(op, BinOp::And | BinOp::Or) {
            let left = self.eval_expr(lhs, scope)?;
            let Value::Bool(left) = left else {
                return Err(EvalError::Type {
                    message: format!(
                        "logical operator requires bool, got {}",
                        left.type_name()
                    ),
                });
            };
            if (op == BinOp::And && !left) || (op == BinOp::Or && left) {
                return Ok(Value::Bool(left));
            }
            let right = self.eval_expr(rhs, scope)?;
            let Value::Bool(right) = right else {
                return Err(EvalError::Type {
                    message: format!(
                        "logical operator requires bool, got {}",
                        right.type_name()
                    ),
                });
            };
            return Ok(Value::Bool(right));
        }

        let left = self.eval_expr(lhs, scope)?;
        let right = self.eval_expr(rhs, scope)?;

        match op {
            BinOp::Eq => Ok(Value::Bool(left == right)),
            BinOp::Ne => Ok(Value::Bool(left != right)),
            BinOp::Add => match (left, right) {
                (Value::Int(a), Value::Int(b)) => {
                    a.checked_add(b).map(Value::Int).ok_or(EvalError::Type {
                        message: "integer overflow in addition".to_string(),
                    })
                }
                (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
                (a, b) => Err(type_mismatch("+", &a, &b)),
            },
            BinOp::Sub => int_op(left, right, "-", |a, b| {
                a.checked_sub(b).ok_or(EvalError::Type {
                    message: "integer overflow in subtraction".to_string(),
                })
            }),
            BinOp::Mul => int_op(left, right, "*", |a, b| {
                a.checked_mul(b).ok_or(EvalError::Type {
                    message: "integer overflow in multiplication".to_string(),
                })
            }),
            BinOp::Div => int_op(left, right, "/", |a, b| {
                a.checked_div(b).ok_or(EvalError::DivisionByZero)
            }),
            BinOp::Rem => int_op(left, right, "%", |a, b| {
                a.checked_rem(b).ok_or(EvalError::DivisionByZero)
            }),
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                let ordering = match (&left, &right) {
                    (Value::Int(a), Value::Int(b)) => a.cmp(b),
                    (Value::Str(a), Value::Str(b)) => a.cmp(b),
                    (a, b) => return Err(type_mismatch("comparison", a, b)),
                };
                let result = match op {
                    BinOp::Lt => ordering.is_lt(),
                    BinOp::Le => ordering.is_le(),
                    BinOp::Gt => ordering.is_gt(),
                    _ => ordering.is_ge(),
                };
                Ok(Value::Bool(result))
            }
            BinOp::And | BinOp::Or => unreachable!("handled above"),
        }
    }
}

fn int_op(
    left: Value,
    right: Value,
    op: &str,
    f: impl FnOnce(i64, i64) -> Result<i64, EvalError>,
) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => f(a, b).map(Value::Int),
        (a, b) => Err(type_mismatch(op, &a, &b)),
    }
}

fn type_mismatch(op: &str, left: &Value, right: &Value) -> EvalError {
    EvalError::Type {
        message: format!(
            "invalid operands for '{op}': {} and {}",
            left.type_name(),
            right.type_name()
        ),
    }
}
