//! Change tracking for tree-shaped documents.
//!
//! A [`TrackingSession`] records, before every write, the value a path held
//! just before its first mutation. From that log it answers whether a path
//! changed and what it held before, at any depth: an ancestor's previous
//! value is rebuilt from its descendants' records, and a descendant's from
//! its ancestors'.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use track_changes::TrackedDocument;
//!
//! let mut doc = TrackedDocument::load(json!({"a": {"b": {"c": 1, "d": 2}}}));
//! doc.set("/a/b/c", 22i64).unwrap();
//! doc.set("/a/b/d", 33i64).unwrap();
//!
//! assert!(doc.path_has_changed("/a").unwrap());
//! assert!(!doc.path_has_changed("/a/b/e").unwrap());
//! let previous = doc.previous_value("/a/b").unwrap().unwrap();
//! assert_eq!(previous.to_json(), json!({"c": 1, "d": 2}));
//! ```

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod log;
pub mod query;
pub mod recorder;
pub mod registry;
pub mod session;
pub mod tracked;
pub mod undo;

pub use config::{ConfigError, TrackerConfig};
pub use document::Document;
pub use error::{TrackError, TrackResult};
pub use log::{ChangeLog, ChangeRecord, ReconcileReport};
pub use recorder::{MutationKind, RecordOutcome};
pub use registry::{DocumentId, SessionRegistry, SharedSession};
pub use session::TrackingSession;
pub use tracked::{NestedPredicate, TrackedDocument};

pub use track_changes_pointer as pointer;
pub use track_changes_value::{Scalar, Value};
