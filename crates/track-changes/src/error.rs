//! Error types for change tracking.

use thiserror::Error;
use track_changes_pointer::PointerError;

use crate::config::ConfigError;
use crate::registry::DocumentId;

/// Result type alias for change tracking operations.
pub type TrackResult<T> = Result<T, TrackError>;

/// Errors surfaced to callers.
///
/// Only argument validation fails loudly. A log that no longer matches the
/// document's shape is recovered inside undo and never shows up here.
#[derive(Debug, Error)]
pub enum TrackError {
    /// Malformed JSON Pointer.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PointerError),

    /// No session is registered for the document.
    #[error("no tracking session for document {0}")]
    UnknownDocument(DocumentId),

    /// The host document cannot hold a value at the path.
    #[error("cannot write {path}: {reason}")]
    Write {
        /// Pointer that was written.
        path: String,
        /// What blocked the write.
        reason: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TrackError {
    #[inline]
    pub fn write(path: impl Into<String>, reason: &'static str) -> Self {
        TrackError::Write {
            path: path.into(),
            reason,
        }
    }
}
