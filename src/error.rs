//! Error types for the replisync mirroring engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by configuration validation and mirroring passes
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Path {path:?} is not under root {root:?}")]
    PathOutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Engine is terminated; no further passes are possible")]
    Terminated,
}

impl SyncError {
    /// Whether this error was raised before the sync loop started
    pub fn is_config(&self) -> bool {
        matches!(self, SyncError::Config(_))
    }
}
