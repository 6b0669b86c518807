//! Per-document tracking session.
//!
//! A [`TrackingSession`] owns the change log of exactly one document. The
//! host calls [`TrackingSession::record_mutation`] from its interception
//! layer before every write, and the queries read the live document through
//! the [`Document`] trait.

use tracing::debug;
use track_changes_pointer::{parse_json_pointer_with, Path};
use track_changes_value::{deep_equal_opt, Value};

use crate::config::TrackerConfig;
use crate::document::{snapshot, Document};
use crate::error::TrackResult;
use crate::log::{ChangeLog, ChangeRecord, ReconcileReport};
use crate::query;
use crate::recorder::{self, MutationKind, RecordOutcome};

#[derive(Debug, Clone, Default)]
pub struct TrackingSession {
    config: TrackerConfig,
    log: ChangeLog,
}

impl TrackingSession {
    /// Session for a document loaded from storage: nothing has changed yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            config,
            log: ChangeLog::new(),
        }
    }

    /// Session for a freshly constructed document.
    ///
    /// The log starts with a root record whose old value is absent: the root
    /// reads as changed and every previous value as absent.
    pub fn for_new_document(config: TrackerConfig) -> Self {
        let mut session = Self::with_config(config);
        session.log.replace_with_root(None);
        debug!(target: "track_changes::session", "started session for new document");
        session
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Parse `pointer` under this session's limits.
    pub fn parse_pointer(&self, pointer: &str) -> TrackResult<Path> {
        Ok(parse_json_pointer_with(pointer, &self.config.limits())?)
    }

    /// Record a mutation of `pointer` that the host is about to apply to
    /// `doc`. Must be called before the write lands.
    pub fn record_mutation<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        pointer: &str,
        new_value: Option<&Value>,
        kind: MutationKind,
    ) -> TrackResult<RecordOutcome> {
        let path = self.parse_pointer(pointer)?;
        Ok(self.record_path(doc, path, new_value, kind))
    }

    /// [`record_mutation`](Self::record_mutation) for an already parsed path.
    pub fn record_path<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        path: Path,
        new_value: Option<&Value>,
        kind: MutationKind,
    ) -> RecordOutcome {
        if self.config.reconcile_before_record && self.log.has_unchecked() {
            self.log.reconcile(doc);
        }
        recorder::record(&mut self.log, doc, path, new_value, kind)
    }

    /// Record that `pointer` is about to be modified without knowing the
    /// new value.
    pub fn mark_modified<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        pointer: &str,
        kind: MutationKind,
    ) -> TrackResult<RecordOutcome> {
        self.record_mutation(doc, pointer, None, kind)
    }

    /// Settle every unchecked record against `doc`. Idempotent.
    pub fn reconcile<D: Document + ?Sized>(&mut self, doc: &D) -> ReconcileReport {
        self.log.reconcile(doc)
    }

    pub fn path_has_changed<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        pointer: &str,
    ) -> TrackResult<bool> {
        let path = self.parse_pointer(pointer)?;
        self.log.reconcile(doc);
        Ok(query::path_has_changed(&self.log, doc, &path))
    }

    pub fn previous_value<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        pointer: &str,
    ) -> TrackResult<Option<Value>> {
        let path = self.parse_pointer(pointer)?;
        self.log.reconcile(doc);
        Ok(query::previous_value(&self.log, doc, &path))
    }

    /// Whether the current value at `pointer` equals `value`.
    pub fn is<D: Document + ?Sized>(
        &self,
        doc: &D,
        pointer: &str,
        value: Option<&Value>,
    ) -> TrackResult<bool> {
        let path = self.parse_pointer(pointer)?;
        Ok(deep_equal_opt(doc.get(&path).as_deref(), value))
    }

    /// Whether the previous value at `pointer` equals `value`.
    pub fn was<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        pointer: &str,
        value: Option<&Value>,
    ) -> TrackResult<bool> {
        let previous = self.previous_value(doc, pointer)?;
        Ok(deep_equal_opt(previous.as_ref(), value))
    }

    /// Reconciled records, newest first.
    pub fn change_log<D: Document + ?Sized>(&mut self, doc: &D) -> &[ChangeRecord] {
        self.log.reconcile(doc);
        self.log.records()
    }

    /// Records as they stand, unchecked ones included.
    pub fn records(&self) -> &[ChangeRecord] {
        self.log.records()
    }

    pub fn is_visited(&self, pointer: &str) -> TrackResult<bool> {
        let path = self.parse_pointer(pointer)?;
        Ok(self.log.is_visited(&path))
    }

    /// The document is about to be deleted: the whole current document
    /// becomes the single root record.
    pub fn mark_removed<D: Document + ?Sized>(&mut self, doc: &D) {
        self.log.replace_with_root(snapshot(doc, &[]));
        debug!(target: "track_changes::session", "document marked removed");
    }

    /// End of session: forget every record.
    pub fn reset(&mut self) {
        self.log.clear();
        debug!(target: "track_changes::session", "session reset");
    }

    /// An empty session for a clone of this document. The clone's changes
    /// never show up here and vice versa.
    pub fn fork(&self) -> Self {
        Self::with_config(self.config.clone())
    }
}
