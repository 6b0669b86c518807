//! Deep structural equality.

use serde_json::Number;

use crate::{Scalar, Shape, Value};

/// Performs a deep equality check between two values.
///
/// - Leaves are equal iff their scalars are equal (dates and binary ids by value)
/// - Numbers compare by value, so `1` and `1.0` are equal
/// - Arrays are equal iff same length and pairwise-equal elements
/// - Objects are equal iff same key set and equal values per key
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use track_changes_value::{deep_equal, Value};
///
/// let a = Value::from(json!({"foo": [1, 2, 3]}));
/// let b = Value::from(json!({"foo": [1, 2, 3]}));
/// let c = Value::from(json!({"foo": [1, 2, 4]}));
///
/// assert!(deep_equal(&a, &b));
/// assert!(!deep_equal(&a, &c));
/// ```
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a.shape(), b.shape()) {
        (Shape::Leaf(a), Shape::Leaf(b)) => scalar_equal(a, b),

        (Shape::Elements(arr_a), Shape::Elements(arr_b)) => {
            arr_a.len() == arr_b.len() && arr_a.iter().zip(arr_b).all(|(a, b)| deep_equal(a, b))
        }

        (Shape::Entries(obj_a), Shape::Entries(obj_b)) => {
            obj_a.len() == obj_b.len()
                && obj_a
                    .iter()
                    .all(|(key, val_a)| obj_b.get(key).is_some_and(|val_b| deep_equal(val_a, val_b)))
        }

        // different shapes are never equal
        _ => false,
    }
}

/// [`deep_equal`] lifted over absence: absent equals only absent.
pub fn deep_equal_opt(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => deep_equal(a, b),
        _ => false,
    }
}

fn scalar_equal(a: &Scalar, b: &Scalar) -> bool {
    match (a, b) {
        (Scalar::Null, Scalar::Null) => true,
        (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
        (Scalar::Number(a), Scalar::Number(b)) => number_equal(a, b),
        (Scalar::String(a), Scalar::String(b)) => a == b,
        (Scalar::Date(a), Scalar::Date(b)) => a == b,
        (Scalar::Binary(a), Scalar::Binary(b)) => a == b,
        _ => false,
    }
}

/// Integers compare exactly. A float on either side compares as `f64`,
/// keeping `0` and `-0.0` apart.
fn number_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    if !a.is_f64() && !b.is_f64() {
        return false;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b && a.is_sign_negative() == b.is_sign_negative(),
        _ => false,
    }
}
