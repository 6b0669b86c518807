//! Decides whether an observed mutation becomes a change record.

use tracing::{debug, trace};
use track_changes_pointer::{format_json_pointer, Path};
use track_changes_value::{deep_equal_opt, Value};

use crate::document::{snapshot, Document};
use crate::log::{ChangeLog, ChangeRecord};

/// How the host is about to mutate the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// The value at the path is replaced by a new one.
    Replace,
    /// The container at the path is mutated in place (push, splice,
    /// reorder). Its new contents are not known until the call returns.
    InPlaceMutate,
}

/// What [`record`] did with a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOutcome {
    /// A checked record was added.
    Recorded,
    /// An unchecked record was added; the next reconciliation decides it.
    RecordedUnchecked,
    /// The path was already recorded in this pass.
    AlreadyVisited,
    /// A record for the path already exists; the oldest snapshot is kept.
    AlreadyRecorded,
    /// The new value equals the old one.
    Unchanged,
}

impl RecordOutcome {
    pub fn is_recorded(self) -> bool {
        matches!(self, RecordOutcome::Recorded | RecordOutcome::RecordedUnchecked)
    }
}

/// Record a mutation of `path` about to happen in `doc`.
///
/// `new_value` is the value being written when the host can observe it.
/// Without it, for in-place mutations, and for nested trackable documents
/// the record is unchecked. The old value is always an owned snapshot, so
/// an in-place array mutation that follows cannot reach it.
pub fn record<D: Document + ?Sized>(
    log: &mut ChangeLog,
    doc: &D,
    path: Path,
    new_value: Option<&Value>,
    kind: MutationKind,
) -> RecordOutcome {
    if log.is_visited(&path) {
        trace!(target: "track_changes::recorder", path = %format_json_pointer(&path), "already visited");
        return RecordOutcome::AlreadyVisited;
    }
    if log.contains(&path) {
        trace!(target: "track_changes::recorder", path = %format_json_pointer(&path), "already recorded");
        return RecordOutcome::AlreadyRecorded;
    }

    let observed = match (kind, new_value) {
        (MutationKind::Replace, Some(new)) if !doc.is_nested_document(new) => Some(new),
        _ => None,
    };
    let old_value = snapshot(doc, &path);

    let Some(new) = observed else {
        debug!(
            target: "track_changes::recorder",
            path = %format_json_pointer(&path),
            ?kind,
            "recording unchecked change"
        );
        log.insert(ChangeRecord::unchecked(path, old_value));
        return RecordOutcome::RecordedUnchecked;
    };

    if deep_equal_opt(old_value.as_ref(), Some(new)) {
        trace!(target: "track_changes::recorder", path = %format_json_pointer(&path), "value unchanged");
        return RecordOutcome::Unchanged;
    }
    debug!(target: "track_changes::recorder", path = %format_json_pointer(&path), "recording change");
    log.insert(ChangeRecord::checked(path, old_value));
    RecordOutcome::Recorded
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::borrow::Cow;
    use track_changes_pointer::parse_json_pointer;

    fn p(s: &str) -> Path {
        parse_json_pointer(s).unwrap()
    }

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    struct WithSubdocs(Value);

    impl Document for WithSubdocs {
        fn get(&self, path: &[String]) -> Option<Cow<'_, Value>> {
            self.0.get(path)
        }

        fn is_nested_document(&self, value: &Value) -> bool {
            value
                .as_object_entries()
                .is_some_and(|entries| entries.contains_key("_id"))
        }
    }

    #[test]
    fn test_checked_change() {
        let doc = v(json!({"name": "old"}));
        let mut log = ChangeLog::new();
        let out = record(&mut log, &doc, p("/name"), Some(&v(json!("new"))), MutationKind::Replace);
        assert_eq!(out, RecordOutcome::Recorded);
        assert_eq!(log.records()[0], ChangeRecord::checked(p("/name"), Some(v(json!("old")))));
        assert!(log.is_visited(&p("/name")));
    }

    #[test]
    fn test_equal_value_is_not_recorded_or_visited() {
        let doc = v(json!({"flag": true}));
        let mut log = ChangeLog::new();
        let out = record(&mut log, &doc, p("/flag"), Some(&v(json!(true))), MutationKind::Replace);
        assert_eq!(out, RecordOutcome::Unchanged);
        assert!(log.is_empty());
        assert!(!log.is_visited(&p("/flag")));

        let out = record(&mut log, &doc, p("/flag"), Some(&v(json!(false))), MutationKind::Replace);
        assert_eq!(out, RecordOutcome::Recorded);
    }

    #[test]
    fn test_integral_float_matches_integer() {
        let doc = v(json!({"a": 1}));
        let mut log = ChangeLog::new();
        let out = record(&mut log, &doc, p("/a"), Some(&v(json!(1.0))), MutationKind::Replace);
        assert_eq!(out, RecordOutcome::Unchanged);
        assert!(log.is_empty());

        let out = record(&mut log, &doc, p("/a"), Some(&v(json!(1.5))), MutationKind::Replace);
        assert_eq!(out, RecordOutcome::Recorded);
    }

    #[test]
    fn test_absent_old_value() {
        let doc = v(json!({}));
        let mut log = ChangeLog::new();
        let out = record(&mut log, &doc, p("/new"), Some(&v(json!(1))), MutationKind::Replace);
        assert_eq!(out, RecordOutcome::Recorded);
        assert_eq!(log.records()[0].old_value, None);
    }

    #[test]
    fn test_visited_suppresses_second_record() {
        let doc = v(json!({"a": 1}));
        let mut log = ChangeLog::new();
        record(&mut log, &doc, p("/a"), Some(&v(json!(2))), MutationKind::Replace);
        let out = record(&mut log, &doc, p("/a"), Some(&v(json!(3))), MutationKind::Replace);
        assert_eq!(out, RecordOutcome::AlreadyVisited);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_unobserved_value_is_unchecked() {
        let doc = v(json!({"a": 1}));
        let mut log = ChangeLog::new();
        let out = record(&mut log, &doc, p("/a"), None, MutationKind::Replace);
        assert_eq!(out, RecordOutcome::RecordedUnchecked);
        assert!(log.records()[0].unchecked);
    }

    #[test]
    fn test_in_place_mutation_snapshots_array() {
        let doc = v(json!({"list": [1, 2]}));
        let mut log = ChangeLog::new();
        let out = record(
            &mut log,
            &doc,
            p("/list"),
            Some(&v(json!([1, 2]))),
            MutationKind::InPlaceMutate,
        );
        assert_eq!(out, RecordOutcome::RecordedUnchecked);
        assert_eq!(log.records()[0].old_value, Some(v(json!([1, 2]))));
    }

    #[test]
    fn test_nested_document_is_unchecked() {
        let doc = WithSubdocs(v(json!({"sub": {"_id": 1, "x": 1}})));
        let mut log = ChangeLog::new();
        let same = v(json!({"_id": 1, "x": 1}));
        let out = record(&mut log, &doc, p("/sub"), Some(&same), MutationKind::Replace);
        assert_eq!(out, RecordOutcome::RecordedUnchecked);
        assert_eq!(log.reconcile(&doc).retracted, 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_existing_record_keeps_oldest_snapshot() {
        let doc = v(json!({"a": 5}));
        let mut log = ChangeLog::new();
        // a root record is present without its path being visited
        log.replace_with_root(Some(v(json!({"a": 1}))));
        assert_eq!(
            record(&mut log, &doc, p(""), Some(&v(json!({"a": 6}))), MutationKind::Replace),
            RecordOutcome::AlreadyRecorded
        );
        assert_eq!(log.len(), 1);
        assert_eq!(log.records()[0].old_value, Some(v(json!({"a": 1}))));
    }

    #[test]
    fn test_is_recorded() {
        assert!(RecordOutcome::Recorded.is_recorded());
        assert!(RecordOutcome::RecordedUnchecked.is_recorded());
        assert!(!RecordOutcome::Unchanged.is_recorded());
    }
}
