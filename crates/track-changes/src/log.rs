//! The change log: at most one pre-mutation snapshot per path.

use std::collections::BTreeSet;

use serde_json::json;
use tracing::debug;
use track_changes_pointer::{format_json_pointer, Path};
use track_changes_value::{deep_equal_opt, Value};

use crate::document::Document;

/// Snapshot of the value at `path` taken just before it was first mutated
/// in this session.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub path: Path,
    /// `None` when nothing existed at `path` before the mutation.
    pub old_value: Option<Value>,
    /// Recorded without seeing the new value; may still be retracted.
    pub unchecked: bool,
}

impl ChangeRecord {
    pub fn checked(path: Path, old_value: Option<Value>) -> Self {
        Self {
            path,
            old_value,
            unchecked: false,
        }
    }

    pub fn unchecked(path: Path, old_value: Option<Value>) -> Self {
        Self {
            path,
            old_value,
            unchecked: true,
        }
    }

    pub fn pointer(&self) -> String {
        format_json_pointer(&self.path)
    }

    /// Plain JSON form for audit output. An absent old value is omitted.
    pub fn to_json(&self) -> serde_json::Value {
        let mut out = json!({ "path": self.pointer() });
        if let Some(old) = &self.old_value {
            out["old_value"] = old.to_json();
        }
        if self.unchecked {
            out["unchecked"] = json!(true);
        }
        out
    }
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Unchecked records confirmed as real changes.
    pub confirmed: usize,
    /// Unchecked records dropped as no-ops.
    pub retracted: usize,
}

/// Newest-first change records plus the set of paths already recorded in
/// the current pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeLog {
    records: Vec<ChangeRecord>,
    visited: BTreeSet<Path>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, path: &[String]) -> Option<&ChangeRecord> {
        self.records.iter().find(|r| r.path == path)
    }

    pub fn contains(&self, path: &[String]) -> bool {
        self.find(path).is_some()
    }

    pub fn is_visited(&self, path: &[String]) -> bool {
        self.visited.contains(path)
    }

    pub fn has_unchecked(&self) -> bool {
        self.records.iter().any(|r| r.unchecked)
    }

    /// Prepend `record` unless one already exists for its path.
    ///
    /// Returns whether the record was inserted. The path is marked visited
    /// only on insertion.
    pub fn insert(&mut self, record: ChangeRecord) -> bool {
        if self.contains(&record.path) {
            return false;
        }
        self.visited.insert(record.path.clone());
        self.records.insert(0, record);
        true
    }

    /// Drop every record and visited path.
    pub fn clear(&mut self) {
        self.records.clear();
        self.visited.clear();
    }

    /// Replace the whole log with a single root record.
    pub fn replace_with_root(&mut self, old_value: Option<Value>) {
        self.clear();
        self.records.push(ChangeRecord::checked(Path::new(), old_value));
    }

    /// Verify every unchecked record against the document's current state.
    ///
    /// A record whose path now holds a value equal to its snapshot was a
    /// no-op: it is removed and its path un-visited so a later mutation is
    /// evaluated from scratch. Any other unchecked record is confirmed.
    pub fn reconcile<D: Document + ?Sized>(&mut self, doc: &D) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        while let Some(idx) = self.records.iter().position(|r| r.unchecked) {
            let record = &mut self.records[idx];
            let current = doc.get(&record.path);
            if deep_equal_opt(current.as_deref(), record.old_value.as_ref()) {
                let record = self.records.remove(idx);
                self.visited.remove(&record.path);
                report.retracted += 1;
                debug!(
                    target: "track_changes::log",
                    path = %record.pointer(),
                    "retracted no-op change"
                );
            } else {
                record.unchecked = false;
                report.confirmed += 1;
                debug!(
                    target: "track_changes::log",
                    path = %record.pointer(),
                    "confirmed unchecked change"
                );
            }
        }
        report
    }
}
