//! Copy-free container rebuilds.
//!
//! A rebuild consumes a container and returns a container of the same shape
//! with only the edited keys changed. Callers that must keep the original
//! (the live document) hand in a snapshot they own.

use track_changes_pointer::{parse_index, PathStep};

use crate::Value;

/// One replacement: `Some` writes the subvalue, `None` removes it.
pub type Edit = (PathStep, Option<Value>);

impl Value {
    /// Apply `edits` to this container.
    ///
    /// - Objects: `Some` inserts or replaces, `None` removes the key.
    /// - Arrays: `Some` replaces an existing index or appends at `len`;
    ///   `None` truncates the last element, or nulls an interior one so later
    ///   indices keep their positions.
    /// - Edits that do not address the container (see [`Value::addresses`])
    ///   are skipped. Leaves are returned unchanged.
    pub fn rebuild<I>(self, edits: I) -> Value
    where
        I: IntoIterator<Item = Edit>,
    {
        match self {
            Value::Object(mut map) => {
                for (key, sub) in edits {
                    match sub {
                        Some(sub) => {
                            map.insert(key, sub);
                        }
                        None => {
                            map.remove(&key);
                        }
                    }
                }
                Value::Object(map)
            }
            Value::Array(mut arr) => {
                for (key, sub) in edits {
                    let Some(idx) = parse_index(&key) else {
                        continue;
                    };
                    match sub {
                        Some(sub) if idx < arr.len() => arr[idx] = sub,
                        Some(sub) if idx == arr.len() => arr.push(sub),
                        None if idx + 1 == arr.len() => {
                            arr.pop();
                        }
                        None if idx < arr.len() => arr[idx] = Value::null(),
                        _ => {}
                    }
                }
                Value::Array(arr)
            }
            leaf @ Value::Leaf(_) => leaf,
        }
    }

    /// Take the child at `step` out of this container, leaving a null
    /// placeholder for array slots. Used to recurse into a child without
    /// cloning it.
    pub fn take_child(&mut self, step: &str) -> Option<Value> {
        match self {
            Value::Object(map) => map.remove(step),
            Value::Array(arr) => {
                let slot = arr.get_mut(parse_index(step)?)?;
                Some(std::mem::replace(slot, Value::null()))
            }
            Value::Leaf(_) => None,
        }
    }
}
