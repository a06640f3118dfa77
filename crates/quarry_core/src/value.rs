//! Scalar values used for runtime parameters, bind values and result cells.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Runtime parameters supplied when a view is run, keyed by parameter id.
pub type RuntimeParams = BTreeMap<String, ScalarValue>;

/// A single opaque SQL value.
///
/// The compiler never interprets these; it only decides where they go in the
/// bind list. JSON `null`, booleans, integers, floats and strings map onto the
/// variants in that order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// SQL NULL, or "no value supplied"
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
}

impl ScalarValue {
    /// Whether this is the null value.
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Canonical, unambiguous rendering used when fingerprinting bind values.
    ///
    /// Strings are quoted so `'5'` and `5` never collide. Text is always
    /// single-quoted with `\'` escapes, so the rendering is stable but not
    /// identical to every other tuple repr.
    pub fn repr(&self) -> String {
        match self {
            ScalarValue::Null => "None".to_string(),
            ScalarValue::Bool(true) => "True".to_string(),
            ScalarValue::Bool(false) => "False".to_string(),
            ScalarValue::Int(i) => i.to_string(),
            ScalarValue::Float(x) => format!("{:?}", x),
            ScalarValue::Text(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('\'');
                for c in s.chars() {
                    match c {
                        '\\' => out.push_str("\\\\"),
                        '\'' => out.push_str("\\'"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\t' => out.push_str("\\t"),
                        '\0' => out.push_str("\\x00"),
                        _ => out.push(c),
                    }
                }
                out.push('\'');
                out
            }
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(i64::from(value))
    }
}

impl<T: Into<ScalarValue>> From<Option<T>> for ScalarValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ScalarValue::Null)
    }
}

/// Display form shown to users and matched by column filters.
///
/// Null renders as the empty string.
impl std::fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarValue::Null => Ok(()),
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Int(i) => write!(f, "{}", i),
            ScalarValue::Float(x) => write!(f, "{:?}", x),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

/// Render an ordered list of values as a tuple: `()`, `(30,)`, `('a', None)`.
pub fn tuple_repr(values: &[ScalarValue]) -> String {
    match values {
        [] => "()".to_string(),
        [single] => format!("({},)", single.repr()),
        many => {
            let parts: Vec<String> = many.iter().map(ScalarValue::repr).collect();
            format!("({})", parts.join(", "))
        }
    }
}
