//! Document handle to session lookup.
//!
//! Hosts that cannot store a session next to each document instance keep
//! them here instead, keyed by a [`DocumentId`] handle. Each session sits
//! behind its own lock, so concurrent writers to one document serialize
//! while different documents proceed independently.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::TrackerConfig;
use crate::error::{TrackError, TrackResult};
use crate::session::TrackingSession;

/// Opaque handle identifying one tracked document instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// The raw handle. Ids are never reused within one registry.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A session behind the lock that serializes writers to one document.
pub type SharedSession = Arc<Mutex<TrackingSession>>;

/// Sessions of every tracked document, keyed by [`DocumentId`].
///
/// ```
/// use track_changes::{SessionRegistry, Value};
///
/// let registry = SessionRegistry::default();
/// let (id, session) = registry.start();
/// let doc = Value::from(serde_json::json!({"a": 1}));
/// assert!(!session.lock().path_has_changed(&doc, "/a").unwrap());
///
/// assert!(registry.end(id).is_some());
/// assert!(registry.get(id).is_err());
/// ```
#[derive(Debug)]
pub struct SessionRegistry {
    config: TrackerConfig,
    next_id: AtomicU64,
    sessions: Mutex<HashMap<DocumentId, SharedSession>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}

impl SessionRegistry {
    /// An empty registry. Every session it starts uses `config`.
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            next_id: AtomicU64::new(1),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn insert(&self, session: TrackingSession) -> (DocumentId, SharedSession) {
        let id = DocumentId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let shared = Arc::new(Mutex::new(session));
        self.sessions.lock().insert(id, Arc::clone(&shared));
        debug!(target: "track_changes::registry", document = %id, "session started");
        (id, shared)
    }

    /// Start tracking a document loaded from storage.
    pub fn start(&self) -> (DocumentId, SharedSession) {
        self.insert(TrackingSession::with_config(self.config.clone()))
    }

    /// Start tracking a freshly constructed document.
    pub fn start_new_document(&self) -> (DocumentId, SharedSession) {
        self.insert(TrackingSession::for_new_document(self.config.clone()))
    }

    /// The session of `id`, or [`TrackError::UnknownDocument`].
    pub fn get(&self, id: DocumentId) -> TrackResult<SharedSession> {
        self.sessions
            .lock()
            .get(&id)
            .cloned()
            .ok_or(TrackError::UnknownDocument(id))
    }

    /// Register a clone of document `id` with its own empty session.
    pub fn clone_document(&self, id: DocumentId) -> TrackResult<(DocumentId, SharedSession)> {
        let fork = self.get(id)?.lock().fork();
        Ok(self.insert(fork))
    }

    /// Stop tracking `id`, returning its session if it was registered.
    pub fn end(&self, id: DocumentId) -> Option<SharedSession> {
        let removed = self.sessions.lock().remove(&id);
        if removed.is_some() {
            debug!(target: "track_changes::registry", document = %id, "session ended");
        }
        removed
    }

    /// Number of documents currently tracked.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
