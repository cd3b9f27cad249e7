//! Source evaluation
//!
//! Executes a file's source text in a fresh, isolated evaluation context and
//! captures every top-level name it defines. This is what a lazy node runs
//! the first time one of its attributes is accessed.
//!
//! The [`SourceEngine`] trait is the seam between the namespace mechanism and
//! the language being evaluated; [`ScriptEngine`] is the built-in
//! implementation for the lazyrepo script language. Note that evaluation runs
//! arbitrary fetched code by design; there is no sandboxing.

pub mod interp;
pub mod lexer;
pub mod parser;
pub mod value;

pub use interp::Namespace;
pub use value::Value;

use thiserror::Error;

/// Evaluation errors
///
/// Both static (lex/parse) and runtime failures; either way the owning node
/// stays unresolved and may be retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Lexical or parse error
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: u32, message: String },

    /// Name is not defined
    #[error("Undefined name '{name}'")]
    Undefined { name: String },

    /// Wrong number of call arguments
    #[error("Function '{name}' expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Called a value that is not a function
    #[error("'{name}' is not a function")]
    NotCallable { name: String },

    /// Operand types do not fit the operator
    #[error("Type error: {message}")]
    Type { message: String },

    /// Integer division or remainder by zero
    #[error("Division by zero")]
    DivisionByZero,

    /// Call depth exceeded the interpreter limit
    #[error("Recursion limit of {limit} calls exceeded")]
    RecursionLimit { limit: u32 },
}

/// Executes source text in an isolated context and captures its top-level
/// bindings
///
/// Implementations must be pure with respect to the process: each call gets
/// a fresh context, and nothing persists between calls except the returned
/// [`Namespace`].
pub trait SourceEngine: Send + Sync {
    /// Evaluate `source` as the module named `module` (dotted logical name)
    fn evaluate(&self, module: &str, source: &str) -> Result<Namespace, EvalError>;
}

/// The built-in engine for the lazyrepo script language
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptEngine;

impl ScriptEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }
}

impl SourceEngine for ScriptEngine {
    fn evaluate(&self, module: &str, source: &str) -> Result<Namespace, EvalError> {
        let tokens = lexer::tokenize(source)?;
        let program = parser::parse(tokens)?;
        interp::evaluate_program(module, &program)
    }
}
