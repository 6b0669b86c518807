//! Structural undo: rebuild a historical subtree from a current one.

use tracing::warn;
use track_changes_pointer::format_json_pointer;
use track_changes_value::Value;

/// Replace the subtree at `path` inside `value` with `old`.
///
/// Every sibling along the way is carried over untouched. When `path` runs
/// into a leaf, an absent branch, or an array index past the end, the log
/// no longer matches the document's shape; that branch is kept as it is
/// now.
pub fn undo(value: Option<Value>, path: &[String], old: Option<&Value>) -> Option<Value> {
    let Some((head, rest)) = path.split_first() else {
        return old.cloned();
    };
    let mut container = value?;
    if !container.addresses(head) {
        if container.is_container() {
            warn!(
                target: "track_changes::undo",
                path = %format_json_pointer(path),
                "change record does not fit the document shape; keeping current branch"
            );
        }
        return Some(container);
    }
    let child = container.take_child(head);
    let restored = undo(child, rest, old);
    Some(container.rebuild([(head.clone(), restored)]))
}

/// Fold [`undo`] over `changes`, applied in iteration order.
///
/// Pass the newest change first: the oldest snapshot of an overlapping
/// subtree is then applied last and wins.
pub fn undo_all<'a, I>(value: Option<Value>, changes: I) -> Option<Value>
where
    I: IntoIterator<Item = (&'a [String], Option<&'a Value>)>,
{
    changes
        .into_iter()
        .fold(value, |acc, (path, old)| undo(acc, path, old))
}
