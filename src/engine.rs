//! Mirror Engine
//!
//! Converges the replica tree to match the source tree, one full
//! propagate-then-prune pass per invocation, repeating under a timed loop
//! until a fatal error occurs. Each mutating action is emitted as one
//! `SyncEvent` to the injected sink, after the mutation has succeeded.
//!
//! Symbolic links are never followed and never copied; a replica symlink
//! whose source counterpart is absent is pruned like a file.

use crate::config::{FailurePolicy, SyncConfig};
use crate::error::SyncError;
use crate::event::{EventKind, SyncEvent};
use crate::mapping::PathMapping;
use crate::sink::EventSink;
use filetime::FileTime;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Operating state of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Between passes, sleeping
    Idle,
    /// One pass in progress
    Syncing,
    /// Absorbing; no further passes occur
    Terminated,
}

/// One-way periodic mirroring engine
pub struct MirrorEngine<S: EventSink> {
    mapping: PathMapping,
    interval: Duration,
    failure_policy: FailurePolicy,
    sink: S,
    state: EngineState,
}

impl<S: EventSink> MirrorEngine<S> {
    pub fn new(config: &SyncConfig, sink: S) -> Self {
        Self {
            mapping: PathMapping::new(&config.source, &config.replica),
            interval: config.interval(),
            failure_policy: config.failure_policy,
            sink,
            state: EngineState::Idle,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run one full pass: propagate structure and content from source to
    /// replica, then prune replica entries absent from source.
    ///
    /// The order is fixed so a pass leaves the replica either fully
    /// converged or, on error, in a well-defined partially-converged state.
    /// Fails if the source root does not exist or is unreadable.
    pub fn run_pass(&mut self) -> Result<Vec<SyncEvent>, SyncError> {
        if self.state == EngineState::Terminated {
            return Err(SyncError::Terminated);
        }

        self.state = EngineState::Syncing;
        let result = self.pass_inner();
        if self.state == EngineState::Syncing {
            self.state = EngineState::Idle;
        }
        result
    }

    fn pass_inner(&mut self) -> Result<Vec<SyncEvent>, SyncError> {
        let mut events = Vec::new();
        self.propagate(&mut events)?;
        self.prune(&mut events)?;
        Ok(events)
    }

    /// Loop passes with the configured cool-down until a fatal error.
    ///
    /// The interval elapses after a pass fully completes; passes never
    /// overlap. The first pass error is emitted as one `Error` event; under
    /// `FailFast` it terminates the loop and is returned as a typed value,
    /// under `RetryNextPass` the loop continues after the interval.
    pub fn run_forever(&mut self) -> SyncError {
        loop {
            match self.run_pass() {
                Ok(events) => {
                    debug!(event_count = events.len(), "Pass complete");
                }
                Err(err) => {
                    let event = SyncEvent::error(self.mapping.source_root(), err.to_string());
                    if let Err(sink_err) = self.sink.emit(&event) {
                        warn!("Failed to record error event: {}", sink_err);
                    }
                    match self.failure_policy {
                        FailurePolicy::FailFast => {
                            self.state = EngineState::Terminated;
                            return err;
                        }
                        FailurePolicy::RetryNextPass => {
                            warn!("Pass failed, retrying after interval: {}", err);
                        }
                    }
                }
            }
            thread::sleep(self.interval);
        }
    }

    /// Step 1: walk the source tree top-down, creating missing replica
    /// folders and copying new or changed files. Never deletes anything
    /// except a replica entry whose type conflicts with its source
    /// counterpart, and never inspects the replica beyond the specific
    /// counterpart under consideration.
    fn propagate(&mut self, events: &mut Vec<SyncEvent>) -> Result<(), SyncError> {
        let source_root = self.mapping.source_root().to_path_buf();

        for entry in WalkDir::new(&source_root).follow_links(false) {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }
            let file_type = entry.file_type();
            if file_type.is_symlink() {
                debug!(path = ?entry.path(), "Skipping symlink");
                continue;
            }

            let target = self.mapping.to_replica(entry.path())?;
            if file_type.is_dir() {
                self.mirror_folder(&target, events)?;
            } else if file_type.is_file() {
                let source_meta = entry.metadata()?;
                let source_mtime = FileTime::from_last_modification_time(&source_meta);
                self.mirror_file(entry.path(), &target, source_mtime, events)?;
            }
        }
        Ok(())
    }

    /// Ensure the replica counterpart of a source directory exists as a
    /// directory, reconciling a type mismatch by delete-then-recreate
    fn mirror_folder(
        &mut self,
        target: &Path,
        events: &mut Vec<SyncEvent>,
    ) -> Result<(), SyncError> {
        match fs::symlink_metadata(target) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => {
                // Replica has a file (or symlink) where source has a folder
                fs::remove_file(target)?;
                self.emit(events, EventKind::DeletedFile, target)?;
                fs::create_dir(target)?;
                self.emit(events, EventKind::CreatedFolder, target)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Parents exist already: traversal is top-down
                fs::create_dir(target)?;
                self.emit(events, EventKind::CreatedFolder, target)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Copy a source file to its replica counterpart unless the counterpart
    /// exists with a bit-equal modification timestamp.
    ///
    /// Timestamp equality is the whole change-detection policy: files with
    /// identical mtimes but different content are never re-copied.
    fn mirror_file(
        &mut self,
        source: &Path,
        target: &Path,
        source_mtime: FileTime,
        events: &mut Vec<SyncEvent>,
    ) -> Result<(), SyncError> {
        match fs::symlink_metadata(target) {
            Ok(meta) if meta.is_file() => {
                let target_mtime = FileTime::from_last_modification_time(&meta);
                if target_mtime == source_mtime {
                    return Ok(());
                }
            }
            Ok(meta) if meta.is_dir() => {
                // Replica has a folder where source has a file
                fs::remove_dir_all(target)?;
                self.emit(events, EventKind::DeletedFolder, target)?;
            }
            Ok(_) => {
                fs::remove_file(target)?;
                self.emit(events, EventKind::DeletedFile, target)?;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        fs::copy(source, target)?;
        filetime::set_file_mtime(target, source_mtime)?;
        self.emit(events, EventKind::CopiedFile, target)
    }

    /// Step 2: walk the replica tree top-down, removing entries whose source
    /// counterpart is absent. Runs after propagation within the same pass so
    /// freshly created replica entries are never mistaken for orphans.
    fn prune(&mut self, events: &mut Vec<SyncEvent>) -> Result<(), SyncError> {
        let replica_root = self.mapping.replica_root().to_path_buf();
        let mut walker = WalkDir::new(&replica_root).follow_links(false).into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            if entry.depth() == 0 {
                continue;
            }

            let counterpart = self.mapping.to_source(entry.path())?;
            match fs::symlink_metadata(&counterpart) {
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }

            let orphan: PathBuf = entry.path().to_path_buf();
            if entry.file_type().is_dir() {
                fs::remove_dir_all(&orphan)?;
                self.emit(events, EventKind::DeletedFolder, &orphan)?;
                // Everything beneath went with it
                walker.skip_current_dir();
            } else {
                fs::remove_file(&orphan)?;
                self.emit(events, EventKind::DeletedFile, &orphan)?;
            }
        }
        Ok(())
    }

    fn emit(
        &mut self,
        events: &mut Vec<SyncEvent>,
        kind: EventKind,
        path: &Path,
    ) -> Result<(), SyncError> {
        let event = SyncEvent::action(kind, path);
        self.sink.emit(&event)?;
        info!(kind = ?kind, path = ?path, "Mirror action");
        events.push(event);
        Ok(())
    }
}
