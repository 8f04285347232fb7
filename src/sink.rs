//! Event sinks: where sync events go once the engine has produced them.
//!
//! The sink is an injected dependency of the engine rather than ambient
//! global logger state. `LogFileSink` renders each event as one line in the
//! persistent log file and mirrors it to the console through `tracing`.
//! Sinks are called synchronously from the single engine thread and must not
//! block indefinitely.

use crate::error::SyncError;
use crate::event::{Severity, SyncEvent};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{error, info};

/// Destination for the engine's event stream
pub trait EventSink {
    /// Render one event; called in emission order, after the corresponding
    /// filesystem mutation has succeeded
    fn emit(&mut self, event: &SyncEvent) -> Result<(), SyncError>;

    /// Flush any buffered output (teardown hook)
    fn flush(&mut self) -> Result<(), SyncError> {
        Ok(())
    }
}

/// Sink writing one line per event to a log file and the console
pub struct LogFileSink {
    writer: BufWriter<File>,
}

impl LogFileSink {
    /// Open the log file in append mode, creating it and its parent
    /// directories when absent
    pub fn open(path: &Path) -> Result<Self, SyncError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    fn render_line(event: &SyncEvent) -> String {
        format!(
            "{} - {} - {}",
            event.timestamp.to_rfc3339(),
            event.kind.severity(),
            event.message()
        )
    }
}

impl EventSink for LogFileSink {
    fn emit(&mut self, event: &SyncEvent) -> Result<(), SyncError> {
        writeln!(self.writer, "{}", Self::render_line(event))?;
        self.writer.flush()?;

        match event.kind.severity() {
            Severity::Error => error!("{}", event.message()),
            Severity::Info => info!("{}", event.message()),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SyncError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink that records events in memory; test support
#[derive(Debug, Default)]
pub struct MemorySink {
    pub events: Vec<SyncEvent>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for MemorySink {
    fn emit(&mut self, event: &SyncEvent) -> Result<(), SyncError> {
        self.events.push(event.clone());
        Ok(())
    }
}
