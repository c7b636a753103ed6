use std::cmp::Ordering;
use std::fmt;

use super::condition::CompareOp;

/// Literal and record values.
///
/// `Int` and `Float` together form the numeric class; the split only records
/// whether a literal was written with a fraction or exponent.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
}

/// The comparison class of a [`Value`]. Two values can only be compared when
/// their kinds match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    String,
    Boolean,
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) | Value::Float(_) => ValueKind::Number,
            Value::Bool(_) => ValueKind::Boolean,
            Value::String(_) => ValueKind::String,
        }
    }

    /// Compare this value (left operand) to another using the given operator.
    ///
    /// Returns `None` when the two values belong to different [`ValueKind`]s.
    /// Numbers follow IEEE semantics, so any ordering against NaN is false.
    #[must_use]
    pub fn compare(&self, op: CompareOp, other: &Value) -> Option<bool> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(apply_ord(op, a.cmp(b))),
            (Value::String(a), Value::String(b)) => Some(apply_ord(op, a.cmp(b))),
            (Value::Bool(a), Value::Bool(b)) => Some(apply_ord(op, a.cmp(b))),
            (a, b) => Some(compare_f64(op, a.as_f64()?, b.as_f64()?)),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Bool(_) | Value::String(_) => None,
        }
    }
}

fn apply_ord(op: CompareOp, ord: Ordering) -> bool {
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::Neq => ord != Ordering::Equal,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Gte => ord != Ordering::Less,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::Lte => ord != Ordering::Greater,
    }
}

#[allow(clippy::float_cmp)]
fn compare_f64(op: CompareOp, a: f64, b: f64) -> bool {
    match op {
        CompareOp::Eq => a == b,
        CompareOp::Neq => a != b,
        CompareOp::Gt => a > b,
        CompareOp::Gte => a >= b,
        CompareOp::Lt => a < b,
        CompareOp::Lte => a <= b,
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

/// Renders the value in rule syntax, so the output lexes back to the same
/// value: strings are single-quoted and escaped, floats always carry a
/// decimal point or an exponent.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => {
                f.write_str("'")?;
                for c in v.chars() {
                    match c {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("'")
            }
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Number => f.write_str("number"),
            ValueKind::String => f.write_str("string"),
            ValueKind::Boolean => f.write_str("boolean"),
        }
    }
}
