//! Leaf value kinds and weakly-typed coercion.
//!
//! File formats disagree on how scalars are written (`.env` and properties
//! files only have strings, YAML may quote booleans), and environment
//! variables are always strings. Every raw value is therefore coerced to the
//! declared kind of its leaf before the merged tree is handed to serde.

use std::fmt;

use serde_json::{Number, Value};

/// Declared kind of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Bool,
    Integer,
    Float,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::String => "string",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
        };
        f.write_str(name)
    }
}

impl ValueKind {
    /// The value a leaf takes when no source provides one.
    pub fn zero(self) -> Value {
        match self {
            ValueKind::String => Value::String(String::new()),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Integer => Value::Number(Number::from(0)),
            ValueKind::Float => float_value(0.0).unwrap_or(Value::Null),
        }
    }

    /// Whether `value` equals the zero value of this kind.
    pub fn is_zero(self, value: &Value) -> bool {
        match value {
            Value::String(s) => s.is_empty(),
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
            Value::Null => true,
            _ => false,
        }
    }

    /// Coerce a string from the environment or a string-only file format.
    ///
    /// The empty string is the zero value for every kind.
    pub fn coerce_str(self, raw: &str) -> Result<Value, String> {
        match self {
            ValueKind::String => Ok(Value::String(raw.to_string())),
            _ if raw.is_empty() => Ok(self.zero()),
            ValueKind::Bool => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| "not a boolean".to_string()),
            ValueKind::Integer => raw
                .parse::<i64>()
                .map(|n| Value::Number(Number::from(n)))
                .map_err(|e| format!("not an integer: {e}")),
            ValueKind::Float => {
                let f = raw
                    .parse::<f64>()
                    .map_err(|e| format!("not a number: {e}"))?;
                float_value(f).ok_or_else(|| "not a finite number".to_string())
            }
        }
    }

    /// Coerce a value decoded from a structured file.
    ///
    /// Returns `Ok(None)` for `null`, which counts as "not provided".
    pub fn coerce_value(self, value: &Value) -> Result<Option<Value>, String> {
        let coerced = match (self, value) {
            (_, Value::Null) => return Ok(None),
            (_, Value::String(s)) => self.coerce_str(s)?,

            (ValueKind::String, Value::Number(n)) => Value::String(n.to_string()),
            (ValueKind::String, Value::Bool(b)) => Value::String(if *b { "1" } else { "0" }.into()),

            (ValueKind::Bool, Value::Bool(b)) => Value::Bool(*b),
            (ValueKind::Bool, Value::Number(n)) => Value::Bool(n.as_f64().is_some_and(|f| f != 0.0)),

            (ValueKind::Integer, Value::Bool(b)) => Value::Number(Number::from(u8::from(*b))),
            (ValueKind::Integer, Value::Number(n)) if n.is_i64() || n.is_u64() => {
                Value::Number(n.clone())
            }
            (ValueKind::Integer, Value::Number(n)) => match n.as_f64() {
                // `i64::MAX as f64` rounds up to 2^63, which does not fit.
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Value::Number(Number::from(f as i64))
                }
                _ => return Err("not an integer".to_string()),
            },

            (ValueKind::Float, Value::Bool(b)) => {
                float_value(if *b { 1.0 } else { 0.0 }).unwrap_or(Value::Null)
            }
            (ValueKind::Float, Value::Number(n)) => n
                .as_f64()
                .and_then(float_value)
                .ok_or_else(|| "not a finite number".to_string())?,

            (_, Value::Array(_)) => return Err(format!("expected {self}, found a list")),
            (_, Value::Object(_)) => return Err(format!("expected {self}, found a table")),
        };
        Ok(Some(coerced))
    }
}

fn float_value(f: f64) -> Option<Value> {
    Number::from_f64(f).map(Value::Number)
}

/// The spellings accepted by Go's `strconv.ParseBool`, which existing
/// deployments already rely on.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
