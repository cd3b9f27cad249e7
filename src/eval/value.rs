//! Runtime values produced by module evaluation

use std::fmt;
use std::sync::Arc;

use crate::eval::parser::FunctionDef;

/// A value bound to a top-level name in a resolved module
#[derive(Debug, Clone)]
pub enum Value {
    /// Absence of a value (a block with no tail expression)
    Unit,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// UTF-8 string
    Str(String),
    /// Function defined at the top level of a module
    Function(Arc<FunctionDef>),
}

impl Value {
    /// Human-readable name of the value's type, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Unit => "unit",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Str(_) => "string",
            Self::Function(_) => "function",
        }
    }

    /// True if this value is a function
    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Convert to a JSON value for `--json` output
    ///
    /// Functions have no JSON representation and are rendered as a
    /// descriptive string.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Unit => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(n) => serde_json::Value::Number((*n).into()),
            Self::Str(s) => serde_json::Value::String(s.clone()),
            Self::Function(_) => serde_json::Value::String(self.to_string()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unit, Self::Unit) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            // Functions compare by identity
            (Self::Function(a), Self::Function(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit => write!(f, "()"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Function(def) => write!(f, "<fn {}/{}>", def.name, def.params.len()),
        }
    }
}
