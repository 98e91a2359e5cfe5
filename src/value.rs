//! Typed store values and their converted, store-neutral form.

use serde::Serialize;
use std::collections::HashMap;

/// A raw record returned by a point lookup, keyed by attribute name.
pub type StoreRecord = HashMap<String, TypedValue>;

/// A value as the backing store types it.
///
/// Numbers keep their textual form so no precision is lost on the way through.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// String scalar.
    String(String),
    /// Numeric scalar, as the store's decimal text.
    Number(String),
    /// Boolean scalar.
    Bool(bool),
    /// Nested map of typed values.
    Map(HashMap<String, TypedValue>),
    /// Ordered list of typed values.
    List(Vec<TypedValue>),
    /// Any attribute type this crate does not interpret (binary, sets, null).
    Unknown,
}

impl TypedValue {
    /// Shorthand for a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Shorthand for a numeric value given as text.
    pub fn number(text: impl Into<String>) -> Self {
        Self::Number(text.into())
    }

    /// Build a map value from `(key, value)` pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TypedValue)>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the nested map if this is a map value.
    pub fn as_map(&self) -> Option<&HashMap<String, TypedValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Short tag naming the variant, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Unknown => "unknown",
        }
    }
}

/// A converted value, independent of the store's type tags.
///
/// Serializes to plain JSON: numbers keep their text and are emitted as strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent scalar, produced for values the converter does not understand.
    Null,
    /// String scalar.
    String(String),
    /// Numeric scalar as its original text.
    Number(String),
    /// Boolean scalar.
    Bool(bool),
    /// Nested mapping.
    Map(HashMap<String, Value>),
    /// Ordered sequence.
    List(Vec<Value>),
}

impl Value {
    /// Returns the text of a string or number value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Number(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether this is the absent scalar.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_shorthand() {
        let value = TypedValue::map([("host", TypedValue::string("db1"))]);
        let map = value.as_map().unwrap();
        assert_eq!(map.get("host"), Some(&TypedValue::string("db1")));
    }

    #[test]
    fn test_as_map_on_scalar() {
        assert!(TypedValue::Bool(true).as_map().is_none());
        assert_eq!(TypedValue::Unknown.kind(), "unknown");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Number("5432".into()).as_str(), Some("5432"));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::Null.is_null());
        assert!(Value::Bool(false).as_str().is_none());
    }
}
