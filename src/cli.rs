//! CLI parse: clap types for replisync. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Replisync - periodic one-way directory mirroring
#[derive(Parser, Debug)]
#[command(name = "replisync")]
#[command(about = "Mirror a source directory onto a replica at a fixed interval")]
pub struct Cli {
    /// Path to the source directory (authoritative, read-only)
    #[arg(required_unless_present = "config")]
    pub source: Option<PathBuf>,

    /// Path to the replica directory (created if absent)
    #[arg(required_unless_present = "config")]
    pub replica: Option<PathBuf>,

    /// Path to the log file (created if absent)
    #[arg(required_unless_present = "config")]
    pub log_file: Option<PathBuf>,

    /// Sync interval in seconds (must be greater than zero)
    #[arg(required_unless_present = "config")]
    pub interval: Option<u64>,

    /// Load configuration from a TOML file instead of positional arguments
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run a single pass and exit instead of looping
    #[arg(long)]
    pub once: bool,

    /// Retry on the next pass after a failed pass instead of exiting
    #[arg(long)]
    pub keep_going: bool,

    /// Console log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,
}
