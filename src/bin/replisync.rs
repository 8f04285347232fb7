//! Replisync CLI Binary
//!
//! Thin wrapper wiring the CLI arguments into the mirroring engine: parse,
//! prepare configuration, initialize logging, open the event sink, run.

use clap::Parser;
use replisync::cli::Cli;
use replisync::config::SyncConfig;
use replisync::engine::MirrorEngine;
use replisync::logging::init_logging;
use replisync::sink::LogFileSink;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    let config = match SyncConfig::from_cli(&cli).and_then(SyncConfig::prepare) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let sink = match LogFileSink::open(&config.log_file) {
        Ok(sink) => sink,
        Err(e) => {
            error!("Failed to open log file {:?}: {}", config.log_file, e);
            process::exit(1);
        }
    };

    info!(
        source = ?config.source,
        replica = ?config.replica,
        interval_secs = config.interval_secs,
        "Starting sync"
    );

    let mut engine = MirrorEngine::new(&config, sink);

    if cli.once {
        match engine.run_pass() {
            Ok(events) => info!(event_count = events.len(), "Pass complete"),
            Err(e) => {
                error!("Pass failed: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    // run_forever only returns on a fatal error. The error has already been
    // recorded as an Error event; the process exits with a success status,
    // matching the documented contract that callers inspect the log rather
    // than the exit code.
    let fatal = engine.run_forever();
    error!("Sync terminated: {}", fatal);
    process::exit(0);
}
