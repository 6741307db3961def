//! Runtime value representation
//!
//! The values a test function can hand back to the harness.
//! - Numbers, Bools, Null: immediate values
//! - Strings and Arrays: reference-counted, immutable
//! - Option / Result: the runtime's tagged containers
//! - Future: a suspended computation the harness polls

use crate::async_runtime::TestFuture;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// Numeric value (IEEE 754 double-precision)
    Number(f64),
    /// String value (reference-counted, immutable)
    String(Arc<String>),
    /// Boolean value
    Bool(bool),
    /// Null value
    Null,
    /// Array value
    Array(Arc<Vec<Value>>),
    /// Option value (Some(value) or None)
    Option(Option<Box<Value>>),
    /// Result value (Ok(value) or Err(error))
    Result(Result<Box<Value>, Box<Value>>),
    /// Future value (suspended computation)
    Future(TestFuture),
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Arc::new(s.into()))
    }

    /// Create an array value
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }

    pub fn some(value: Value) -> Self {
        Value::Option(Some(Box::new(value)))
    }

    pub fn none() -> Self {
        Value::Option(None)
    }

    pub fn ok(value: Value) -> Self {
        Value::Result(Ok(Box::new(value)))
    }

    pub fn err(error: Value) -> Self {
        Value::Result(Err(Box::new(error)))
    }

    /// Get the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::Array(_) => "array",
            Value::Option(_) => "Option",
            Value::Result(_) => "Result",
            Value::Future(_) => "future",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Option(a), Value::Option(b)) => a == b,
            (Value::Result(a), Value::Result(b)) => a == b,
            // Futures have identity semantics
            (Value::Future(a), Value::Future(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Option(Some(inner)) => write!(f, "Some({})", inner),
            Value::Option(None) => write!(f, "None"),
            Value::Result(Ok(inner)) => write!(f, "Ok({})", inner),
            Value::Result(Err(inner)) => write!(f, "Err({})", inner),
            Value::Future(future) => write!(f, "{}", future),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::new(s))
    }
}

impl From<TestFuture> for Value {
    fn from(future: TestFuture) -> Self {
        Value::Future(future)
    }
}

/// Runtime error raised while executing test code
#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    /// An assertion primitive rejected its input
    #[error("{msg}")]
    AssertionFailed { msg: String },
    /// Type error (wrong argument type or arity)
    #[error("Type error: {msg}")]
    TypeError { msg: String },
    /// A value raised by script code
    #[error("Uncaught exception: {value}")]
    Thrown { value: Value },
    /// The execution context ran past its time budget
    #[error("Test timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u128 },
    /// The ambient context slot already has an occupant
    #[error("Execution context slot is already occupied")]
    ContextBusy,
    /// Native code panicked while running a test
    #[error("Panic: {msg}")]
    Panic { msg: String },
}

impl RuntimeError {
    /// Build an assertion failure
    pub fn assertion(msg: impl Into<String>) -> Self {
        RuntimeError::AssertionFailed { msg: msg.into() }
    }

    /// Build a script-level raise
    pub fn thrown(value: impl Into<Value>) -> Self {
        RuntimeError::Thrown {
            value: value.into(),
        }
    }

    /// Check whether this is a test-authored assertion failure
    pub fn is_assertion(&self) -> bool {
        matches!(self, RuntimeError::AssertionFailed { .. })
    }
}
