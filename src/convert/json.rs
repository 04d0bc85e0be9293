//! convert::json
//!
//! Small helpers for reshaping `serde_json::Value` trees.

use serde_json::{Map, Value};

/// Recursively drop `null` members and members that end up as `{}`.
///
/// Objects nested in arrays are cleaned too, but array items themselves are
/// never removed.
pub fn remove_none(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(remove_none_map(map)),
        other => other,
    }
}

fn remove_none_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let cleaned = match v {
                Value::Object(inner) => Value::Object(remove_none_map(inner)),
                Value::Array(items) => Value::Array(
                    items
                        .into_iter()
                        .map(|item| match item {
                            Value::Object(inner) => Value::Object(remove_none_map(inner)),
                            other => other,
                        })
                        .collect(),
                ),
                other => other,
            };
            (k, cleaned)
        })
        .filter(|(_, v)| !matches!(v, Value::Object(m) if m.is_empty()))
        .collect()
}

/// Deep-merge `update` into a copy of `original`.
///
/// Keys of `update` win. When both sides hold an object under the same key
/// the two objects are merged recursively.
pub fn update_nested(original: &Value, update: &Value) -> Value {
    let (Some(orig), Some(upd)) = (original.as_object(), update.as_object()) else {
        return update.clone();
    };

    let mut merged = orig.clone();
    for (key, value) in upd {
        let next = match orig.get(key) {
            Some(existing) if value.is_object() => update_nested(existing, value),
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    Value::Object(merged)
}

/// Fill the object-valued members of a partial update with the current
/// values they would otherwise overwrite.
///
/// Metax V2 replaces nested objects wholesale on PATCH, so a partial nested
/// update has to carry the untouched siblings along.
pub fn merge_patch(original: &Value, data: Value) -> Value {
    let Value::Object(mut map) = data else {
        return data;
    };
    for (key, value) in map.iter_mut() {
        if let Some(existing) = original.get(key) {
            if value.is_object() {
                *value = update_nested(existing, value);
            }
        }
    }
    Value::Object(map)
}

/// Loose truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are
/// all falsy.
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Iterate over an array member, treating anything else as empty.
pub(crate) fn items(value: &Value) -> impl Iterator<Item = &Value> {
    value.as_array().into_iter().flatten()
}

/// First truthy value, or `null`.
pub(crate) fn or(first: &Value, second: &Value) -> Value {
    if truthy(first) {
        first.clone()
    } else {
        second.clone()
    }
}
