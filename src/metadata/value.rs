//! Typed descriptor values.
//!
//! The descriptor format carries no type information: every value is text.
//! [`str2num`] recovers a scalar type by trying, in a fixed order,
//! boolean, integer, floating point and finally falling back to the string.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Value
// =============================================================================

/// A single descriptor value after type inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    /// Name of the inferred type, for diagnostics.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric value as `f64`; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as a non-negative length.
    ///
    /// Floats are truncated toward zero. Booleans, strings, negative,
    /// non-finite and out-of-range numbers yield `None`.
    pub fn as_length(&self) -> Option<usize> {
        match self {
            Value::Int(i) => usize::try_from(*i).ok(),
            Value::Float(f) if *f >= 0.0 && *f < usize::MAX as f64 => Some(f.trunc() as usize),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => f.write_str(s),
        }
    }
}

// =============================================================================
// Type Inference
// =============================================================================

/// Infer a typed value from a sanitized descriptor string.
///
/// Priority is bool > int > float > string and must not be reordered: a run
/// of digits is always an [`Value::Int`] even though it also parses as a float.
pub fn str2num(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Str(s.to_string())
}

// =============================================================================
// Tests
// =============================================================================
