//! In-memory host document with change tracking wired in.
//!
//! [`TrackedDocument`] owns a [`Value`] and its [`TrackingSession`]. Every
//! write goes through the recorder first, then lands in the tree.

use std::borrow::Cow;

use tracing::debug;
use track_changes_pointer::{format_json_pointer, parse_index, Path};
use track_changes_value::{get_path_value, get_path_value_mut, Value};

use crate::config::TrackerConfig;
use crate::document::Document;
use crate::error::{TrackError, TrackResult};
use crate::log::{ChangeRecord, ReconcileReport};
use crate::recorder::{MutationKind, RecordOutcome};
use crate::session::TrackingSession;

/// Tells embedded trackable documents apart from plain subtrees.
pub type NestedPredicate = fn(&Value) -> bool;

#[derive(Debug, Clone)]
struct DocState {
    root: Value,
    nested: Option<NestedPredicate>,
}

impl Document for DocState {
    fn get(&self, path: &[String]) -> Option<Cow<'_, Value>> {
        get_path_value(&self.root, path).map(Cow::Borrowed)
    }

    fn is_nested_document(&self, value: &Value) -> bool {
        self.nested.is_some_and(|is_nested| is_nested(value))
    }
}

#[derive(Debug, Clone)]
pub struct TrackedDocument {
    state: DocState,
    session: TrackingSession,
}

impl TrackedDocument {
    /// A document loaded from storage.
    pub fn load(value: impl Into<Value>) -> Self {
        Self::load_with_config(value, TrackerConfig::default())
    }

    pub fn load_with_config(value: impl Into<Value>, config: TrackerConfig) -> Self {
        Self::with_session(value.into(), TrackingSession::with_config(config))
    }

    /// A document constructed in memory, never persisted.
    pub fn create(value: impl Into<Value>) -> Self {
        Self::create_with_config(value, TrackerConfig::default())
    }

    pub fn create_with_config(value: impl Into<Value>, config: TrackerConfig) -> Self {
        Self::with_session(value.into(), TrackingSession::for_new_document(config))
    }

    fn with_session(root: Value, session: TrackingSession) -> Self {
        Self {
            state: DocState { root, nested: None },
            session,
        }
    }

    /// Treat values matching `predicate` as embedded trackable documents.
    pub fn with_nested_documents(mut self, predicate: NestedPredicate) -> Self {
        self.state.nested = Some(predicate);
        self
    }

    pub fn value(&self) -> &Value {
        &self.state.root
    }

    pub fn into_value(self) -> Value {
        self.state.root
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn get(&self, pointer: &str) -> TrackResult<Option<&Value>> {
        let path = self.session.parse_pointer(pointer)?;
        Ok(get_path_value(&self.state.root, &path))
    }

    /// Write `value` at `pointer`. Missing intermediate objects are created
    /// and `-` appends to an array.
    ///
    /// A write that creates a missing branch is recorded at the first
    /// missing object key. A write that grows an array is recorded as an
    /// in-place mutation of that array.
    pub fn set(&mut self, pointer: &str, value: impl Into<Value>) -> TrackResult<RecordOutcome> {
        let value = value.into();
        let plan = self.plan_write(pointer)?;
        let outcome = {
            let rest = &plan.path[plan.record_len..];
            let observed = match plan.kind {
                MutationKind::Replace if rest.is_empty() => Some(Cow::Borrowed(&value)),
                MutationKind::Replace => {
                    let mut branch = Value::empty_object();
                    write_at(&mut branch, rest, value.clone())
                        .map_err(|reason| TrackError::write(pointer, reason))?;
                    Some(Cow::Owned(branch))
                }
                MutationKind::InPlaceMutate => None,
            };
            self.record_planned(&plan, observed.as_deref())
        };
        write_at(&mut self.state.root, &plan.path, value)
            .map_err(|reason| TrackError::write(pointer, reason))?;
        Ok(outcome)
    }

    /// Assign a whole subtree without handing its value to the recorder.
    /// The record stays unchecked until the next reconciliation.
    pub fn assign(&mut self, pointer: &str, value: impl Into<Value>) -> TrackResult<RecordOutcome> {
        let plan = self.plan_write(pointer)?;
        let outcome = self.record_planned(&plan, None);
        write_at(&mut self.state.root, &plan.path, value.into())
            .map_err(|reason| TrackError::write(pointer, reason))?;
        Ok(outcome)
    }

    /// Append to the array at `pointer`.
    pub fn push(&mut self, pointer: &str, value: impl Into<Value>) -> TrackResult<RecordOutcome> {
        let path = self.session.parse_pointer(pointer)?;
        if !matches!(get_path_value(&self.state.root, &path), Some(Value::Array(_))) {
            return Err(TrackError::write(pointer, "target is not an array"));
        }
        let outcome = self
            .session
            .record_path(&self.state, path.clone(), None, MutationKind::InPlaceMutate);
        if let Some(Value::Array(arr)) = get_path_value_mut(&mut self.state.root, &path) {
            arr.push(value.into());
        }
        Ok(outcome)
    }

    /// Remove element `index` from the array at `pointer`, shifting the
    /// rest down.
    pub fn remove_at(&mut self, pointer: &str, index: usize) -> TrackResult<Value> {
        let path = self.session.parse_pointer(pointer)?;
        match get_path_value(&self.state.root, &path) {
            Some(Value::Array(arr)) if index < arr.len() => {}
            Some(Value::Array(_)) => return Err(TrackError::write(pointer, "index out of bounds")),
            _ => return Err(TrackError::write(pointer, "target is not an array")),
        }
        self.session
            .record_path(&self.state, path.clone(), None, MutationKind::InPlaceMutate);
        match get_path_value_mut(&mut self.state.root, &path) {
            Some(Value::Array(arr)) => Ok(arr.remove(index)),
            _ => Err(TrackError::write(pointer, "target is not an array")),
        }
    }

    /// Remove the value at `pointer`. Array slots become null.
    pub fn unset(&mut self, pointer: &str) -> TrackResult<Option<Value>> {
        let path = self.session.parse_pointer(pointer)?;
        let Some((last, parent)) = path.split_last() else {
            return Err(TrackError::write(pointer, "cannot unset the root"));
        };
        self.session
            .record_path(&self.state, path.clone(), None, MutationKind::Replace);
        Ok(get_path_value_mut(&mut self.state.root, parent).and_then(|p| p.take_child(last)))
    }

    pub fn path_has_changed(&mut self, pointer: &str) -> TrackResult<bool> {
        self.session.path_has_changed(&self.state, pointer)
    }

    pub fn previous_value(&mut self, pointer: &str) -> TrackResult<Option<Value>> {
        self.session.previous_value(&self.state, pointer)
    }

    pub fn is(&self, pointer: &str, value: Option<&Value>) -> TrackResult<bool> {
        self.session.is(&self.state, pointer, value)
    }

    pub fn was(&mut self, pointer: &str, value: Option<&Value>) -> TrackResult<bool> {
        self.session.was(&self.state, pointer, value)
    }

    pub fn change_log(&mut self) -> &[ChangeRecord] {
        self.session.change_log(&self.state)
    }

    pub fn reconcile(&mut self) -> ReconcileReport {
        self.session.reconcile(&self.state)
    }

    /// The document is about to be deleted.
    pub fn remove(&mut self) {
        self.session.mark_removed(&self.state);
    }

    /// End of session, e.g. after the document was persisted.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Copy of the current contents with an empty, independent session.
    pub fn clone_fresh(&self) -> Self {
        debug!(target: "track_changes::tracked", "cloned document with fresh session");
        Self {
            state: self.state.clone(),
            session: self.session.fork(),
        }
    }

    /// Parse `pointer`, resolve a trailing `-` against the array it
    /// appends to, and work out where the write gets recorded.
    fn plan_write(&self, pointer: &str) -> TrackResult<WritePlan> {
        let mut path = self.session.parse_pointer(pointer)?;
        if path.last().is_some_and(|step| step == "-") {
            let parent = &path[..path.len() - 1];
            if let Some(Value::Array(arr)) = get_path_value(&self.state.root, parent) {
                let len = arr.len();
                if let Some(last) = path.last_mut() {
                    *last = len.to_string();
                }
            }
        }
        let (record_len, kind) = locate_write(&self.state.root, &path)
            .map_err(|reason| TrackError::write(format_json_pointer(&path), reason))?;
        Ok(WritePlan {
            path,
            record_len,
            kind,
        })
    }

    fn record_planned(&mut self, plan: &WritePlan, observed: Option<&Value>) -> RecordOutcome {
        let recorded = plan.path[..plan.record_len].to_vec();
        self.session
            .record_path(&self.state, recorded, observed, plan.kind)
    }
}

struct WritePlan {
    path: Path,
    /// Length of the prefix of `path` the change is recorded at.
    record_len: usize,
    kind: MutationKind,
}

/// Check that a write at `path` can land and find the prefix that records
/// it: the path itself, the first missing object key, or an array that
/// grows.
fn locate_write(root: &Value, path: &[String]) -> Result<(usize, MutationKind), &'static str> {
    let Some((last, parents)) = path.split_last() else {
        return Ok((0, MutationKind::Replace));
    };
    let mut cur = root;
    for (depth, step) in parents.iter().enumerate() {
        let next = match cur {
            Value::Object(map) => map.get(step),
            Value::Array(arr) => arr.get(parse_index(step).ok_or("array index expected")?),
            Value::Leaf(_) => return Err("parent is not a container"),
        };
        match next {
            Some(next) => cur = next,
            None if matches!(cur, Value::Array(_)) => {
                return Ok((depth, MutationKind::InPlaceMutate))
            }
            None => return Ok((depth + 1, MutationKind::Replace)),
        }
    }
    match cur {
        Value::Object(_) => Ok((path.len(), MutationKind::Replace)),
        Value::Array(arr) => {
            let idx = parse_index(last).ok_or("array index expected")?;
            if idx < arr.len() {
                Ok((path.len(), MutationKind::Replace))
            } else {
                Ok((parents.len(), MutationKind::InPlaceMutate))
            }
        }
        Value::Leaf(_) => Err("parent is not a container"),
    }
}

fn write_at(root: &mut Value, path: &[String], value: Value) -> Result<(), &'static str> {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return Ok(());
    };
    let mut cur = root;
    for step in parents {
        cur = match cur {
            Value::Object(map) => map.entry(step.clone()).or_insert_with(Value::empty_object),
            Value::Array(arr) => {
                let idx = parse_index(step).ok_or("array index expected")?;
                if idx >= arr.len() {
                    arr.resize(idx, Value::null());
                    arr.push(Value::empty_object());
                }
                &mut arr[idx]
            }
            Value::Leaf(_) => return Err("parent is not a container"),
        };
    }
    match cur {
        Value::Object(map) => {
            map.insert(last.clone(), value);
        }
        Value::Array(arr) => {
            let idx = parse_index(last).ok_or("array index expected")?;
            if idx < arr.len() {
                arr[idx] = value;
            } else {
                arr.resize(idx, Value::null());
                arr.push(value);
            }
        }
        Value::Leaf(_) => return Err("parent is not a container"),
    }
    Ok(())
}
