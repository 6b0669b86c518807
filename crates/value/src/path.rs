//! Path-addressed reads.

use crate::Value;

/// Walk `value` step by step and return what `path` addresses.
///
/// A missing or non-container intermediate makes the rest of the descent
/// land in nothing, so the result is `None` rather than an error.
///
/// ```
/// use serde_json::json;
/// use track_changes_value::{get_path_value, Value};
///
/// let doc = Value::from(json!({"a": {"b": [1, 2]}}));
/// let path = ["a".to_string(), "b".to_string(), "1".to_string()];
/// assert_eq!(get_path_value(&doc, &path), Some(&Value::from(2i64)));
/// assert_eq!(get_path_value(&doc, &["x".to_string(), "y".to_string()]), None);
/// ```
pub fn get_path_value<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, step| current.child(step))
}

/// [`get_path_value`] starting from a possibly absent root.
pub fn get_opt_path_value<'a>(value: Option<&'a Value>, path: &[String]) -> Option<&'a Value> {
    get_path_value(value?, path)
}

/// Mutable counterpart of [`get_path_value`].
pub fn get_path_value_mut<'a>(value: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    let mut current = value;
    for step in path {
        current = current.child_mut(step)?;
    }
    Some(current)
}
