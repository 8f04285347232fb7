//! Integration tests for the pass failure policies

use super::test_utils::{engine, setup, write_file};
use replisync::config::FailurePolicy;
use replisync::engine::{EngineState, MirrorEngine};
use replisync::error::SyncError;
use replisync::event::{EventKind, SyncEvent};
use replisync::sink::{EventSink, MemorySink};
use std::fs;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Deleting the source root before a pass raises an I/O error, exactly one
/// Error event is emitted, and the engine terminates without a further pass
#[test]
fn vanished_source_root_terminates_the_loop() {
    let (_temp, config) = setup();
    write_file(&config.source.join("a.txt"), "x");

    fs::remove_dir_all(&config.source).unwrap();

    let mut engine: MirrorEngine<MemorySink> = engine(&config);
    let fatal = engine.run_forever();

    assert!(matches!(fatal, SyncError::Io(_) | SyncError::Walk(_)));
    assert_eq!(engine.state(), EngineState::Terminated);

    let error_events: Vec<_> = engine
        .sink()
        .events
        .iter()
        .filter(|e| e.kind == EventKind::Error)
        .collect();
    assert_eq!(error_events.len(), 1);
    assert!(error_events[0].detail.is_some());
}

#[test]
fn terminated_engine_rejects_further_passes() {
    let (_temp, config) = setup();
    fs::remove_dir_all(&config.source).unwrap();

    let mut engine = engine(&config);
    let _ = engine.run_forever();
    assert!(matches!(engine.run_pass(), Err(SyncError::Terminated)));
}

/// Sink sharing its event log with the test thread while the engine loops
struct SharedSink(Arc<Mutex<Vec<SyncEvent>>>);

impl EventSink for SharedSink {
    fn emit(&mut self, event: &SyncEvent) -> Result<(), SyncError> {
        self.0.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(30);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::sleep(Duration::from_millis(100));
    }
}

/// Under the retry policy a failed pass is recorded as one Error event and
/// the loop keeps going; once the source root returns, the replica converges
#[test]
fn retry_policy_recovers_after_source_returns() {
    let (_temp, mut config) = setup();
    config.failure_policy = FailurePolicy::RetryNextPass;
    fs::remove_dir_all(&config.source).unwrap();

    let events = Arc::new(Mutex::new(Vec::new()));
    let engine_config = config.clone();
    let engine_events = Arc::clone(&events);
    thread::spawn(move || {
        let mut engine = MirrorEngine::new(&engine_config, SharedSink(engine_events));
        engine.run_forever();
    });

    // At least one pass must fail before we repair the source
    wait_until("a failed pass", || {
        events
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.kind == EventKind::Error)
    });

    fs::create_dir_all(&config.source).unwrap();
    write_file(&config.source.join("a.txt"), "x");

    wait_until("the replica to converge", || {
        config.replica.join("a.txt").is_file()
    });
    assert_eq!(
        fs::read_to_string(config.replica.join("a.txt")).unwrap(),
        "x"
    );

    // Failed passes produced only Error events, one each, and the recovery
    // pass produced the copy
    let events = events.lock().unwrap();
    let first_copy = events
        .iter()
        .position(|e| e.kind == EventKind::CopiedFile)
        .expect("recovery pass emits a CopiedFile event");
    assert!(first_copy >= 1);
    assert!(events[..first_copy]
        .iter()
        .all(|e| e.kind == EventKind::Error));
}

/// A failed standalone pass leaves the engine runnable: once the cause is
/// repaired, the next pass succeeds (the retry-next-pass policy relies on
/// this)
#[test]
fn failed_pass_leaves_engine_runnable() {
    let (_temp, config) = setup();
    fs::remove_dir_all(&config.source).unwrap();

    let mut engine = engine(&config);
    assert!(engine.run_pass().is_err());
    assert_eq!(engine.state(), EngineState::Idle);

    fs::create_dir_all(&config.source).unwrap();
    write_file(&config.source.join("a.txt"), "x");
    let events = engine.run_pass().unwrap();
    assert_eq!(events.len(), 1);
}
