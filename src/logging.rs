//! Logging System
//!
//! Console logging through the `tracing` crate. The persistent per-event log
//! file is owned by the event sink; this module only configures the console
//! subscriber (level filter, RFC 3339 timestamps).

use crate::error::SyncError;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable overriding the console log filter
pub const LOG_ENV_VAR: &str = "REPLISYNC_LOG";

/// Initialize the console subscriber.
///
/// Filter priority: `REPLISYNC_LOG` environment variable, then the level
/// passed by the caller (CLI argument), then "info".
pub fn init_logging(level: Option<&str>) -> Result<(), SyncError> {
    let filter = build_env_filter(level)?;

    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_timer(ChronoUtc::rfc_3339()),
        )
        .try_init()
        .map_err(|e| SyncError::Config(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

fn build_env_filter(level: Option<&str>) -> Result<EnvFilter, SyncError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV_VAR) {
        return Ok(filter);
    }

    let level = level.unwrap_or("info");
    level
        .parse::<EnvFilter>()
        .map_err(|e| SyncError::Config(format!("Invalid log level '{}': {}", level, e)))
}
