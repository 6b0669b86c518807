//! The structural tree value tracked by the change log.

use std::collections::BTreeMap;

use serde_json::{Map, Number};
use track_changes_pointer::{parse_index, PathStep};

/// An opaque atomic value, compared by value.
///
/// `Date` and `Binary` cover host-specific identifiers (timestamps, object
/// ids) that JSON alone cannot distinguish from numbers and arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    /// Milliseconds since the Unix epoch.
    Date(i64),
    Binary(Vec<u8>),
}

/// A tree-shaped document value.
///
/// Absence is modelled outside the type as `Option<Value>::None`, which is
/// distinct from an explicit `Leaf(Scalar::Null)`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Object(BTreeMap<String, Value>),
    Array(Vec<Value>),
    Leaf(Scalar),
}

/// Borrowed view of a value's shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    Entries(&'a BTreeMap<String, Value>),
    Elements(&'a [Value]),
    Leaf(&'a Scalar),
}

impl Value {
    /// An explicit null leaf, distinct from an absent value.
    pub fn null() -> Self {
        Value::Leaf(Scalar::Null)
    }

    /// A date leaf from milliseconds since the Unix epoch.
    pub fn date(millis: i64) -> Self {
        Value::Leaf(Scalar::Date(millis))
    }

    /// A binary leaf, e.g. an object id.
    ///
    /// ```
    /// use track_changes_value::{deep_equal, Value};
    ///
    /// assert!(deep_equal(&Value::binary([7u8; 12]), &Value::binary(vec![7u8; 12])));
    /// assert!(!deep_equal(&Value::binary([1u8]), &Value::from(serde_json::json!([1]))));
    /// ```
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Leaf(Scalar::Binary(bytes.into()))
    }

    /// `{}`. Also the container written for missing intermediate steps.
    pub fn empty_object() -> Self {
        Value::Object(BTreeMap::new())
    }

    /// Borrow the value as one of its three shapes.
    ///
    /// ```
    /// use serde_json::json;
    /// use track_changes_value::{Shape, Value};
    ///
    /// let v = Value::from(json!([1, 2]));
    /// assert!(matches!(v.shape(), Shape::Elements(items) if items.len() == 2));
    /// assert!(matches!(Value::null().shape(), Shape::Leaf(_)));
    /// ```
    pub fn shape(&self) -> Shape<'_> {
        match self {
            Value::Object(map) => Shape::Entries(map),
            Value::Array(arr) => Shape::Elements(arr),
            Value::Leaf(scalar) => Shape::Leaf(scalar),
        }
    }

    /// The entries of an object, or `None` for arrays and leaves.
    pub fn as_object_entries(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// The elements of an array, or `None` for objects and leaves.
    pub fn as_array_elements(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// The scalar of a leaf, or `None` for containers.
    pub fn as_leaf(&self) -> Option<&Scalar> {
        match self {
            Value::Leaf(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Whether the value is an object or an array.
    pub fn is_container(&self) -> bool {
        !matches!(self, Value::Leaf(_))
    }

    /// Look up one path step. Array steps must be canonical indices.
    ///
    /// ```
    /// use serde_json::json;
    /// use track_changes_value::Value;
    ///
    /// let v = Value::from(json!({"list": ["a", "b"]}));
    /// let list = v.child("list").unwrap();
    /// assert_eq!(list.child("1"), Some(&Value::from("b")));
    /// assert_eq!(list.child("01"), None);
    /// assert_eq!(list.child("2"), None);
    /// ```
    pub fn child(&self, step: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(step),
            Value::Array(arr) => arr.get(parse_index(step)?),
            Value::Leaf(_) => None,
        }
    }

    /// Mutable counterpart of [`Value::child`].
    pub fn child_mut(&mut self, step: &str) -> Option<&mut Value> {
        match self {
            Value::Object(map) => map.get_mut(step),
            Value::Array(arr) => arr.get_mut(parse_index(step)?),
            Value::Leaf(_) => None,
        }
    }

    /// Whether a rebuild edit at `step` can land in this container.
    ///
    /// Objects accept any key. Arrays accept existing indices and the slot
    /// one past the end. Leaves accept nothing.
    pub fn addresses(&self, step: &PathStep) -> bool {
        match self {
            Value::Object(_) => true,
            Value::Array(arr) => parse_index(step).is_some_and(|idx| idx <= arr.len()),
            Value::Leaf(_) => false,
        }
    }

    /// Convert to a plain `serde_json::Value`.
    ///
    /// Lossy: dates become epoch milliseconds and binary data becomes an
    /// array of byte numbers.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Leaf(Scalar::Null),
            serde_json::Value::Bool(b) => Value::Leaf(Scalar::Bool(*b)),
            serde_json::Value::Number(n) => Value::Leaf(Scalar::Number(n.clone())),
            serde_json::Value::String(s) => Value::Leaf(Scalar::String(s.clone())),
            serde_json::Value::Array(arr) => Value::Array(arr.iter().map(Value::from).collect()),
            serde_json::Value::Object(obj) => Value::Object(
                obj.iter()
                    .map(|(key, val)| (key.clone(), Value::from(val)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::from(&value)
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Leaf(Scalar::Null) => serde_json::Value::Null,
            Value::Leaf(Scalar::Bool(b)) => serde_json::Value::Bool(*b),
            Value::Leaf(Scalar::Number(n)) => serde_json::Value::Number(n.clone()),
            Value::Leaf(Scalar::String(s)) => serde_json::Value::String(s.clone()),
            Value::Leaf(Scalar::Date(millis)) => serde_json::Value::Number((*millis).into()),
            Value::Leaf(Scalar::Binary(bytes)) => serde_json::Value::Array(
                bytes
                    .iter()
                    .map(|b| serde_json::Value::Number((*b).into()))
                    .collect(),
            ),
            Value::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(obj) => {
                let mut out = Map::new();
                for (key, val) in obj {
                    out.insert(key.clone(), serde_json::Value::from(val));
                }
                serde_json::Value::Object(out)
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Leaf(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Leaf(Scalar::Number(n.into()))
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Leaf(Scalar::Number(n.into()))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Leaf(Scalar::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Leaf(Scalar::String(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(arr: Vec<Value>) -> Self {
        Value::Array(arr)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}
