//! Integration tests for deletion propagation (pruning)

use super::test_utils::{engine, mtime_of, setup, write_file, write_file_with_mtime};
use replisync::event::EventKind;
use std::fs;

#[test]
fn removed_source_file_is_pruned() {
    let (_temp, config) = setup();
    write_file(&config.source.join("a.txt"), "x");

    let mut engine = engine(&config);
    engine.run_pass().unwrap();

    fs::remove_file(config.source.join("a.txt")).unwrap();
    let events = engine.run_pass().unwrap();

    assert!(!config.replica.join("a.txt").exists());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::DeletedFile);
    assert_eq!(events[0].path, config.replica.join("a.txt"));
}

/// A removed directory produces exactly one DeletedFolder event for the
/// top-level entry; descendants go with it silently
#[test]
fn removed_source_directory_is_pruned_recursively() {
    let (_temp, config) = setup();
    write_file(&config.source.join("dir").join("a.txt"), "x");
    write_file(&config.source.join("dir").join("sub").join("b.txt"), "y");

    let mut engine = engine(&config);
    engine.run_pass().unwrap();

    fs::remove_dir_all(config.source.join("dir")).unwrap();
    let events = engine.run_pass().unwrap();

    assert!(!config.replica.join("dir").exists());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::DeletedFolder);
    assert_eq!(events[0].path, config.replica.join("dir"));
}

/// Scenario from the design: source = {dir/b.txt}, replica = {dir/b.txt
/// (same mtime), dir/stale.txt, orphanDir/}. The pass deletes stale.txt and
/// orphanDir and leaves dir/b.txt untouched (no CopiedFile event).
#[test]
fn stale_entries_are_pruned_without_recopying_unchanged_files() {
    let (_temp, config) = setup();
    write_file(&config.source.join("dir").join("b.txt"), "b");
    let source_mtime = mtime_of(&config.source.join("dir").join("b.txt"));

    fs::create_dir_all(config.replica.join("dir")).unwrap();
    write_file_with_mtime(&config.replica.join("dir").join("b.txt"), "b", source_mtime);
    write_file(&config.replica.join("dir").join("stale.txt"), "stale");
    fs::create_dir_all(config.replica.join("orphanDir")).unwrap();

    let mut engine = engine(&config);
    let events = engine.run_pass().unwrap();

    assert!(!config.replica.join("dir").join("stale.txt").exists());
    assert!(!config.replica.join("orphanDir").exists());
    assert!(config.replica.join("dir").join("b.txt").is_file());

    let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&EventKind::DeletedFile));
    assert!(kinds.contains(&EventKind::DeletedFolder));
    assert!(!kinds.contains(&EventKind::CopiedFile));
    assert_eq!(events.len(), 2);
}

/// Entries deleted from source between passes are removed in the same pass
/// they are detected, after propagation
#[test]
fn propagation_runs_before_pruning_within_a_pass() {
    let (_temp, config) = setup();
    write_file(&config.source.join("keep.txt"), "k");
    write_file(&config.replica.join("orphan.txt"), "o");

    let mut engine = engine(&config);
    let events = engine.run_pass().unwrap();

    // The copy precedes the prune in emission order
    let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::CopiedFile, EventKind::DeletedFile]);
}
