//! Event schema for mirroring observability.
//!
//! One `SyncEvent` is produced per mutating filesystem action and per
//! pass-level failure. Events are ephemeral: `run_pass` returns them and the
//! configured sink renders them; nothing is persisted by the engine itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Kind of mutating action (or failure) an event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    CreatedFolder,
    CopiedFile,
    DeletedFolder,
    DeletedFile,
    Error,
}

impl EventKind {
    /// Log severity this event is rendered with
    pub fn severity(&self) -> Severity {
        match self {
            EventKind::Error => Severity::Error,
            _ => Severity::Info,
        }
    }
}

/// Severity attached to a rendered event line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// One record of a mutating action or a pass failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncEvent {
    pub kind: EventKind,
    /// Absolute path the action applied to; for `Error`, the source root
    pub path: PathBuf,
    pub timestamp: DateTime<Utc>,
    /// Failure description, present only for `Error` events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SyncEvent {
    /// Create an event for a completed mutating action, stamped now
    pub fn action(kind: EventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            timestamp: Utc::now(),
            detail: None,
        }
    }

    /// Create an `Error` event describing a failed pass
    pub fn error(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Error,
            path: path.into(),
            timestamp: Utc::now(),
            detail: Some(detail.into()),
        }
    }

    /// Human-readable one-line message for this event
    pub fn message(&self) -> String {
        let path = self.path.display();
        match self.kind {
            EventKind::CreatedFolder => format!("Created folder: {}", path),
            EventKind::CopiedFile => format!("Copied file: {}", path),
            EventKind::DeletedFolder => format!("Deleted folder: {}", path),
            EventKind::DeletedFile => format!("Deleted file: {}", path),
            EventKind::Error => format!(
                "Sync error: {}",
                self.detail.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

impl fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
