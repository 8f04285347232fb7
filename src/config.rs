//! Configuration System
//!
//! Typed startup configuration for the mirroring daemon: the two directory
//! roots, the log destination, the sync interval, and the failure policy.
//! Assembled from CLI arguments or loaded from a TOML file, validated before
//! the sync loop starts.

use crate::cli::Cli;
use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What the engine does when a pass fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Terminate the loop on the first pass error (original behavior)
    #[default]
    FailFast,
    /// Log the error and retry on the next scheduled pass
    RetryNextPass,
}

/// Startup configuration for one mirroring daemon instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Source root; authoritative, must exist and be a readable directory
    pub source: PathBuf,

    /// Replica root; created if absent
    pub replica: PathBuf,

    /// Log file destination; parent directories created if absent
    pub log_file: PathBuf,

    /// Cool-down between passes, in seconds; must be greater than zero
    pub interval_secs: u64,

    /// Pass failure policy (default: fail fast, as the original behaves)
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl SyncConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SyncError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            SyncError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;
        toml::from_str(&contents)
            .map_err(|e| SyncError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    /// Assemble configuration from parsed CLI arguments: a config file when
    /// `--config` is given, the positional arguments otherwise, with flag
    /// overrides applied on top
    pub fn from_cli(cli: &Cli) -> Result<Self, SyncError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => {
                // clap enforces presence of the positionals without --config
                match (&cli.source, &cli.replica, &cli.log_file, cli.interval) {
                    (Some(source), Some(replica), Some(log_file), Some(interval)) => Self {
                        source: source.clone(),
                        replica: replica.clone(),
                        log_file: log_file.clone(),
                        interval_secs: interval,
                        failure_policy: FailurePolicy::default(),
                    },
                    _ => {
                        return Err(SyncError::Config(
                            "source, replica, log file, and interval are required".to_string(),
                        ))
                    }
                }
            }
        };

        if cli.keep_going {
            config.failure_policy = FailurePolicy::RetryNextPass;
        }

        Ok(config)
    }

    /// Validate startup constraints without touching the filesystem state
    ///
    /// Checks that the source root exists and is a directory, that the
    /// interval is positive, and that source and replica are distinct.
    pub fn validate(&self) -> Result<(), SyncError> {
        if self.interval_secs == 0 {
            return Err(SyncError::Config(
                "Sync interval must be greater than zero seconds".to_string(),
            ));
        }

        let source_meta = fs::metadata(&self.source).map_err(|e| {
            SyncError::Config(format!(
                "Source path {:?} is not accessible: {}",
                self.source, e
            ))
        })?;
        if !source_meta.is_dir() {
            return Err(SyncError::Config(format!(
                "Source path {:?} is not a directory",
                self.source
            )));
        }

        if self.source == self.replica {
            return Err(SyncError::Config(
                "Source and replica paths must differ".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate, then create the replica directory and the log file's parent
    /// directory when absent. Returns a config with canonicalized roots so
    /// the path mapping is stable regardless of how the roots were spelled.
    pub fn prepare(mut self) -> Result<Self, SyncError> {
        self.validate()?;

        fs::create_dir_all(&self.replica).map_err(|e| {
            SyncError::Config(format!(
                "Failed to create replica directory {:?}: {}",
                self.replica, e
            ))
        })?;

        if let Some(parent) = self.log_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    SyncError::Config(format!("Failed to create log directory {:?}: {}", parent, e))
                })?;
            }
        }

        self.source = dunce::canonicalize(&self.source).map_err(|e| {
            SyncError::Config(format!(
                "Failed to canonicalize source path {:?}: {}",
                self.source, e
            ))
        })?;
        self.replica = dunce::canonicalize(&self.replica).map_err(|e| {
            SyncError::Config(format!(
                "Failed to canonicalize replica path {:?}: {}",
                self.replica, e
            ))
        })?;

        // Canonical roots make containment checks exact
        if self.replica.starts_with(&self.source) || self.source.starts_with(&self.replica) {
            return Err(SyncError::Config(
                "Source and replica directories must not contain one another".to_string(),
            ));
        }

        Ok(self)
    }

    /// Cool-down between passes as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}
