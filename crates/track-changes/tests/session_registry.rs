use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use serde_json::json;
use track_changes::{MutationKind, RecordOutcome, SessionRegistry, TrackerConfig, Value};

#[test]
fn concurrent_writers_share_one_session() {
    let registry = SessionRegistry::default();
    let (id, session) = registry.start();
    let doc = Arc::new(Mutex::new(Value::from(json!({"a": 0, "b": 0, "c": 0, "d": 0}))));

    let handles: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|key| {
            let session = Arc::clone(&session);
            let doc = Arc::clone(&doc);
            thread::spawn(move || {
                let pointer = format!("/{key}");
                let new = Value::from(1i64);
                // the session lock is the document's mutation boundary
                let mut session = session.lock();
                let mut doc = doc.lock();
                let out = session
                    .record_mutation(&*doc, &pointer, Some(&new), MutationKind::Replace)
                    .unwrap();
                if let Some(slot) = doc.child_mut(key) {
                    *slot = new;
                }
                out
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), RecordOutcome::Recorded);
    }

    let shared = registry.get(id).unwrap();
    let mut session = shared.lock();
    let doc = doc.lock();
    assert_eq!(session.change_log(&*doc).len(), 4);
    assert_eq!(
        session.previous_value(&*doc, "").unwrap().map(|v| v.to_json()),
        Some(json!({"a": 0, "b": 0, "c": 0, "d": 0}))
    );
}

#[test]
fn sessions_are_per_document() {
    let registry = SessionRegistry::new(TrackerConfig::default());
    let (first, first_session) = registry.start();
    let (_, second_session) = registry.start();
    let doc = Value::from(json!({"a": 1}));

    first_session
        .lock()
        .record_mutation(&doc, "/a", Some(&Value::from(2i64)), MutationKind::Replace)
        .unwrap();
    assert_eq!(first_session.lock().records().len(), 1);
    assert!(second_session.lock().records().is_empty());

    let (_, copy) = registry.clone_document(first).unwrap();
    assert!(copy.lock().records().is_empty());
    assert_eq!(registry.len(), 3);

    registry.end(first);
    assert_eq!(registry.len(), 2);
    assert!(registry.get(first).is_err());
}

#[test]
fn registry_applies_its_config() {
    let config = TrackerConfig::from_toml_str("max_path_depth = 1").unwrap();
    let registry = SessionRegistry::new(config);
    let (_, session) = registry.start_new_document();
    let doc = Value::from(json!({"a": {"b": 1}}));

    let mut session = session.lock();
    assert!(session.path_has_changed(&doc, "").unwrap());
    assert!(!session.path_has_changed(&doc, "/a").unwrap());
    assert!(session.path_has_changed(&doc, "/a/b").is_err());
}
