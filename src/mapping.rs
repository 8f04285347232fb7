//! Bidirectional counterpart-path mapping between the source and replica roots.
//!
//! A relative path under one root maps 1:1 to the same relative path under
//! the other root. The mapping is derived once from the two configured roots
//! and used everywhere a counterpart path is needed; prefix stripping on path
//! components avoids the pitfalls of string substitution when roots share
//! substrings.

use crate::error::SyncError;
use std::path::{Path, PathBuf};

/// Fixed relative-path mapping between a source root and a replica root
#[derive(Debug, Clone)]
pub struct PathMapping {
    source_root: PathBuf,
    replica_root: PathBuf,
}

impl PathMapping {
    pub fn new(source_root: impl Into<PathBuf>, replica_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            replica_root: replica_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn replica_root(&self) -> &Path {
        &self.replica_root
    }

    /// Counterpart of a source path under the replica root
    pub fn to_replica(&self, source_path: &Path) -> Result<PathBuf, SyncError> {
        let relative = self.relative_to(source_path, &self.source_root)?;
        Ok(self.replica_root.join(relative))
    }

    /// Counterpart of a replica path under the source root
    pub fn to_source(&self, replica_path: &Path) -> Result<PathBuf, SyncError> {
        let relative = self.relative_to(replica_path, &self.replica_root)?;
        Ok(self.source_root.join(relative))
    }

    fn relative_to<'a>(&self, path: &'a Path, root: &Path) -> Result<&'a Path, SyncError> {
        path.strip_prefix(root)
            .map_err(|_| SyncError::PathOutsideRoot {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })
    }
}
