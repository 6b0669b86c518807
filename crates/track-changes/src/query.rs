//! Historical queries over a reconciled change log.
//!
//! These functions assume the log has been reconciled; the session wrapper
//! guarantees that before delegating here.

use track_changes_pointer::{is_ancestor, relation, reroot, PathRelation};
use track_changes_value::{deep_equal_opt, get_opt_path_value, Value};

use crate::document::{snapshot, Document};
use crate::log::ChangeLog;
use crate::undo::undo_all;

/// Whether the value at `path` differs from its value before the session's
/// first mutation touching it.
///
/// - A record at `path` itself decides on its own: its snapshot is compared
///   with the current value.
/// - An ancestor record whose snapshot contains `path` reports a change when
///   that part of the snapshot differs from the current value.
/// - A descendant record reports a change when its own path differs.
///
/// A record at `path` shadows every record below it, including older ones.
pub fn path_has_changed<D: Document + ?Sized>(log: &ChangeLog, doc: &D, path: &[String]) -> bool {
    let current = doc.get(path);
    if let Some(record) = log.find(path) {
        return !deep_equal_opt(record.old_value.as_ref(), current.as_deref());
    }
    for record in log.records() {
        match relation(&record.path, path) {
            PathRelation::Ancestor => {
                let Some(sub) = reroot(path, &record.path) else {
                    continue;
                };
                // nothing existed there before: this record says nothing
                let Some(old) = get_opt_path_value(record.old_value.as_ref(), sub) else {
                    continue;
                };
                if !deep_equal_opt(Some(old), current.as_deref()) {
                    return true;
                }
            }
            PathRelation::Descendant => {
                let now = doc.get(&record.path);
                if !deep_equal_opt(record.old_value.as_ref(), now.as_deref()) {
                    return true;
                }
            }
            PathRelation::Equal | PathRelation::Unrelated => {}
        }
    }
    false
}

/// The value `path` held before the session's mutations.
///
/// Returns `None` for every path while the log is empty: nothing was ever
/// modified. Otherwise the historical value is rebuilt by undoing, newest
/// first, every record on the same branch as `path`, starting from the
/// current value at the closest-to-root of those records (or `path` itself
/// when all of them lie below it).
///
/// A record at `path` is returned as is. Its snapshot was taken when it was
/// recorded, so it already carries any earlier edit below `path`; records
/// below are not undone into it. Query an ancestor to rebuild through both.
pub fn previous_value<D: Document + ?Sized>(
    log: &ChangeLog,
    doc: &D,
    path: &[String],
) -> Option<Value> {
    if log.is_empty() {
        return None;
    }
    if let Some(record) = log.find(path) {
        return record.old_value.clone();
    }

    let related: Vec<_> = log
        .records()
        .iter()
        .filter(|r| relation(&r.path, path).is_related())
        .collect();
    if related.is_empty() {
        return snapshot(doc, path);
    }

    let root: &[String] = related
        .iter()
        .filter(|r| is_ancestor(&r.path, path))
        .map(|r| r.path.as_slice())
        .min_by_key(|p| p.len())
        .unwrap_or(path);

    let changes = related.iter().filter_map(|r| {
        let rel = reroot(&r.path, root)?;
        Some((rel, r.old_value.as_ref()))
    });
    let rebuilt = undo_all(snapshot(doc, root), changes);

    let sub = reroot(path, root)?;
    get_opt_path_value(rebuilt.as_ref(), sub).cloned()
}
