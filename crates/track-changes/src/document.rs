//! What the engine needs from the host document.

use std::borrow::Cow;

use track_changes_value::{get_path_value, Value};

/// Read access to a host-owned document.
///
/// The engine only ever reads through this trait. Historical values are
/// built from owned snapshots, so the live document is never mutated.
pub trait Document {
    /// Current value at `path`, or `None` when nothing is there.
    fn get(&self, path: &[String]) -> Option<Cow<'_, Value>>;

    /// Whether `value` is itself a trackable nested document, whose final
    /// contents cannot be compared at the moment it is assigned.
    fn is_nested_document(&self, _value: &Value) -> bool {
        false
    }
}

impl Document for Value {
    fn get(&self, path: &[String]) -> Option<Cow<'_, Value>> {
        get_path_value(self, path).map(Cow::Borrowed)
    }
}

impl<D: Document + ?Sized> Document for &D {
    fn get(&self, path: &[String]) -> Option<Cow<'_, Value>> {
        (**self).get(path)
    }

    fn is_nested_document(&self, value: &Value) -> bool {
        (**self).is_nested_document(value)
    }
}

/// Current value at `path` as an owned snapshot.
pub(crate) fn snapshot<D: Document + ?Sized>(doc: &D, path: &[String]) -> Option<Value> {
    doc.get(path).map(Cow::into_owned)
}
