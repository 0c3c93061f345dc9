//! Payload mapping alias and merge semantics.
//!
//! Agent state, instruction params and run contexts are all
//! string-keyed JSON mappings. Merging is shallow: overlay keys win,
//! values are replaced wholesale (no deep merge of nested objects).

use serde_json::{Map, Value};

/// String-keyed JSON mapping used for agent state, params, context
/// and structured error detail.
pub type Payload = Map<String, Value>;

/// Shallow union of two payloads. Keys in `overlay` win.
///
/// # Example
///
/// ```
/// use jido_types::{merge, Payload};
/// use serde_json::json;
///
/// let mut base = Payload::new();
/// base.insert("x".into(), json!(1));
/// base.insert("y".into(), json!(2));
///
/// let mut overlay = Payload::new();
/// overlay.insert("y".into(), json!(20));
/// overlay.insert("z".into(), json!(3));
///
/// let out = merge(&base, &overlay);
/// assert_eq!(out["x"], json!(1));
/// assert_eq!(out["y"], json!(20));
/// assert_eq!(out["z"], json!(3));
/// ```
#[must_use]
pub fn merge(base: &Payload, overlay: &Payload) -> Payload {
    let mut out = base.clone();
    for (k, v) in overlay {
        out.insert(k.clone(), v.clone());
    }
    out
}
