//! Params and context normalization.
//!
//! Callers may hand params/context as a mapping or as a list of
//! `[key, value]` pairs. Anything else is a validation error.
//! Normalizing an already-normalized mapping is a no-op.

use crate::error::ExecError;
use jido_types::Payload;
use serde_json::Value;

/// Normalizes a raw value into a [`Payload`].
///
/// Accepted shapes:
/// - `null` → empty mapping
/// - mapping → itself
/// - list of two-element `[key, value]` arrays with string keys
///
/// Later pairs win on duplicate keys, matching mapping-merge
/// semantics.
///
/// # Example
///
/// ```
/// use jido_action::normalize;
/// use serde_json::json;
///
/// let from_map = normalize(json!({"x": 1})).unwrap();
/// let from_pairs = normalize(json!([["x", 1]])).unwrap();
/// assert_eq!(from_map, from_pairs);
///
/// assert!(normalize(json!(42)).is_err());
/// ```
pub fn normalize(value: Value) -> Result<Payload, ExecError> {
    match value {
        Value::Null => Ok(Payload::new()),
        Value::Object(map) => Ok(map),
        Value::Array(pairs) => {
            let mut out = Payload::new();
            for (i, pair) in pairs.into_iter().enumerate() {
                match pair {
                    Value::Array(mut kv) if kv.len() == 2 => {
                        let v = kv.pop().unwrap_or(Value::Null);
                        let k = kv.pop().unwrap_or(Value::Null);
                        match k {
                            Value::String(key) => {
                                out.insert(key, v);
                            }
                            other => {
                                return Err(ExecError::validation_with(
                                    format!("pair {i} key must be a string"),
                                    other,
                                ))
                            }
                        }
                    }
                    other => {
                        return Err(ExecError::validation_with(
                            format!("pair {i} must be a [key, value] array"),
                            other,
                        ))
                    }
                }
            }
            Ok(out)
        }
        other => Err(ExecError::validation_with(
            "params must be a mapping or a list of pairs",
            other,
        )),
    }
}
