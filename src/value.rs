//! Bound argument values for compiled predicates.
//!
//! Comparators that cannot inline their operand into the expression text
//! (numbers, dates, member objects, `IN` collections) bind it through the
//! `%@` placeholder and append a [`PredicateValue`] to the builder's
//! argument list. Argument order always matches placeholder order,
//! left to right.
//!
//! # Examples
//!
//! ```rust
//! use predikit::PredicateValue;
//!
//! // Integer values
//! let val: PredicateValue = 42.into();
//! assert!(matches!(val, PredicateValue::Int(42)));
//!
//! // String values
//! let val: PredicateValue = "hello".into();
//! assert!(matches!(val, PredicateValue::String(_)));
//!
//! // Optional values map to Null
//! let val: PredicateValue = Option::<i64>::None.into();
//! assert!(val.is_null());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A value bound to a `%@` placeholder in a compiled predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// Date/time value (UTC).
    DateTime(DateTime<Utc>),
    /// Arbitrary JSON value, used when binding whole member objects.
    Json(serde_json::Value),
    /// List of values, bound as a single argument by `IN` comparisons.
    List(Vec<PredicateValue>),
}

impl PredicateValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the type name of this value for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            PredicateValue::Null => "Null",
            PredicateValue::Bool(_) => "Bool",
            PredicateValue::Int(_) => "Int",
            PredicateValue::Float(_) => "Float",
            PredicateValue::String(_) => "String",
            PredicateValue::DateTime(_) => "DateTime",
            PredicateValue::Json(_) => "Json",
            PredicateValue::List(_) => "List",
        }
    }
}

impl From<bool> for PredicateValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for PredicateValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for PredicateValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for PredicateValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for PredicateValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for PredicateValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<DateTime<Utc>> for PredicateValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<serde_json::Value> for PredicateValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<PredicateValue>> From<Vec<T>> for PredicateValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<PredicateValue>> From<Option<T>> for PredicateValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}
