//! Conversion of typed store values into a flat, dot-keyed property map.
//!
//! Two steps: [`convert_typed_value`] strips the store's type tags into a [`Value`]
//! tree, then [`flatten`] joins nested map keys with `.` until only non-map values
//! remain. Lists are left whole under their parent key.

use crate::value::{TypedValue, Value};
use std::collections::{BTreeMap, HashMap};

/// Convert one typed value into its store-neutral form.
///
/// Unknown variants become [`Value::Null`] so a single unsupported leaf never
/// discards the rest of a record.
pub fn convert_typed_value(value: &TypedValue) -> Value {
    match value {
        TypedValue::String(s) => Value::String(s.clone()),
        TypedValue::Number(text) => Value::Number(text.clone()),
        TypedValue::Bool(b) => Value::Bool(*b),
        TypedValue::Map(map) => Value::Map(convert_map(map)),
        TypedValue::List(items) => Value::List(items.iter().map(convert_typed_value).collect()),
        TypedValue::Unknown => Value::Null,
    }
}

/// Convert every entry of a typed map.
pub fn convert_map(map: &HashMap<String, TypedValue>) -> HashMap<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), convert_typed_value(value)))
        .collect()
}

/// Flatten a nested mapping into dot-joined keys.
///
/// `prefix` is prepended (with a `.`) to every produced key; pass `""` at the root.
/// Keys that already contain dots are kept as they are.
///
/// # Examples
///
/// ```rust
/// use dynamodb_env_repository::flatten::flatten;
/// use dynamodb_env_repository::value::Value;
/// use std::collections::HashMap;
///
/// let mut db = HashMap::new();
/// db.insert("host".to_string(), Value::from("db1"));
/// let mut root = HashMap::new();
/// root.insert("database".to_string(), Value::Map(db));
///
/// let flat = flatten("", &root);
/// assert_eq!(flat.get("database.host"), Some(&Value::from("db1")));
/// ```
pub fn flatten(prefix: &str, node: &HashMap<String, Value>) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    flatten_into(prefix, node, &mut flat);
    flat
}

fn flatten_into(prefix: &str, node: &HashMap<String, Value>, flat: &mut BTreeMap<String, Value>) {
    for (key, value) in node {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Map(nested) => flatten_into(&path, nested, flat),
            other => {
                flat.insert(path, other.clone());
            }
        }
    }
}

/// Convert and flatten a typed map in one pass.
pub fn flatten_typed(map: &HashMap<String, TypedValue>) -> BTreeMap<String, Value> {
    flatten("", &convert_map(map))
}
