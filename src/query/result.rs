//! Typed query results.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Discriminated kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// JSON string.
    String,
    /// JSON number.
    Number,
    /// JSON boolean.
    Bool,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
    /// JSON null.
    Null,
}

impl ValueKind {
    /// Returns the kind of a JSON value.
    #[must_use]
    pub const fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => Self::String,
            Value::Number(_) => Self::Number,
            Value::Bool(_) => Self::Bool,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
            Value::Null => Self::Null,
        }
    }

    /// Returns true for arrays and objects.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Array | Self::Object)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Bool => "bool",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        };
        write!(f, "{s}")
    }
}

/// The value selected by a path query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    value: Value,
}

impl QueryResult {
    /// Wraps a selected value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self { value }
    }

    /// Returns the kind of the selected value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        ValueKind::of(&self.value)
    }

    /// Returns the selected value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the result, returning the selected value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Returns the child key/value pairs of a composite value.
    ///
    /// Object members keep document order; array elements are keyed by
    /// their index. Scalars have no children.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, &Value)> {
        match &self.value {
            Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Returns the compact JSON text of the selected sub-document.
    #[must_use]
    pub fn raw(&self) -> String {
        self.value.to_string()
    }

    /// Returns the textual form of the selected value.
    #[must_use]
    pub fn text(&self) -> String {
        scalar_text(&self.value)
    }
}

/// Returns the textual form used when a value is stored or compared.
///
/// Strings are unquoted, `null` is empty, and composites keep their compact
/// JSON text.
#[must_use]
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}
