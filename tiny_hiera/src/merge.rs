//! Merge mechanics for override fragments.
//!
//! Both merges take ownership of their inputs, so the accumulator never
//! shares nodes with the document or the facts it was expanded from.

use serde_json::Value;

use crate::isolate::Mapping;

/// Overlay `incoming` onto `target` recursively.
///
/// Behaviour:
/// - Mappings merge key by key.
/// - Sequences concatenate, existing items first, without deduplication.
/// - Any other pairing replaces the existing value.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use tiny_hiera::merge::deep_merge;
///
/// let base = json!({"a": 1, "b": {"x": 1}, "list": [1]});
/// let layer = json!({"b": {"y": 2}, "c": 3, "list": [1, 2]});
/// let merged = deep_merge(
///     base.as_object().cloned().unwrap_or_default(),
///     layer.as_object().cloned().unwrap_or_default(),
/// );
/// assert_eq!(
///     serde_json::Value::Object(merged),
///     json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3, "list": [1, 1, 2]}),
/// );
/// ```
#[must_use]
pub fn deep_merge(mut target: Mapping, incoming: Mapping) -> Mapping {
    for (key, value) in incoming {
        match target.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key, value);
            }
        }
    }
    target
}

/// Replace top-level keys of `target` with those of `incoming`.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use tiny_hiera::merge::shallow_merge;
///
/// let base = json!({"a": {"x": 1}, "b": 2});
/// let layer = json!({"a": {"y": 2}});
/// let merged = shallow_merge(
///     base.as_object().cloned().unwrap_or_default(),
///     layer.as_object().cloned().unwrap_or_default(),
/// );
/// assert_eq!(serde_json::Value::Object(merged), json!({"a": {"y": 2}, "b": 2}));
/// ```
#[must_use]
pub fn shallow_merge(mut target: Mapping, incoming: Mapping) -> Mapping {
    target.extend(incoming);
    target
}

fn merge_value(target: &mut Value, incoming: Value) {
    match (target, incoming) {
        (Value::Object(existing), Value::Object(map)) => {
            let current = std::mem::take(existing);
            *existing = deep_merge(current, map);
        }
        (Value::Array(existing), Value::Array(items)) => existing.extend(items),
        (slot, value) => *slot = value,
    }
}
