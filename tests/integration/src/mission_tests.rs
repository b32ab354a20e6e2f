//! Mission-based integration tests
//!
//! Each test plays out a realistic sequence of game sessions on the two
//! platforms, syncing between them, and checks what the player would see.

use std::fs;
use std::path::Path;
use std::time::Duration;

use pretty_assertions::assert_eq;
use savesync_core::{
    Direction, FileOutcome, MemorySink, Reconciler, RunStatus, SideLabels, SyncOptions,
};
use savesync_test_utils::SaveFolders;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Sync the scenario folders and return the emitted lines
fn sync(folders: &SaveFolders, options: SyncOptions) -> (savesync_core::SyncReport, Vec<String>) {
    let sink = MemorySink::new();
    let report = Reconciler::new(options).synchronize_blocking(&folders.a(), &folders.b(), &sink);
    (report, sink.take())
}

fn default_options(folders: &SaveFolders) -> SyncOptions {
    SyncOptions::new(folders.backups())
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// Mission 1: alternate platforms across sessions
// =============================================================================

#[test]
fn mission_alternating_sessions_keep_both_sides_current() {
    let folders = SaveFolders::new();
    folders.write_a("slot1.sav", "chapter 1", 0);
    folders.write_b("slot1.sav", "chapter 1", 0);

    // Session on Steam
    folders.write_a("slot1.sav", "chapter 2 (steam)", 100);
    let (report, _) = sync(&folders, default_options(&folders));
    assert!(matches!(
        report.file("slot1.sav"),
        Some(FileOutcome::Updated {
            direction: Direction::AtoB,
            ..
        })
    ));
    assert_eq!(folders.read_b("slot1.sav"), "chapter 2 (steam)");

    // Session on Xbox
    folders.write_b("slot1.sav", "chapter 3 (xbox)", 200);
    let (report, _) = sync(&folders, default_options(&folders));
    assert!(matches!(
        report.file("slot1.sav"),
        Some(FileOutcome::Updated {
            direction: Direction::BtoA,
            ..
        })
    ));
    assert_eq!(folders.read_a("slot1.sav"), "chapter 3 (xbox)");

    // Nothing played since
    let (report, lines) = sync(&folders, default_options(&folders));
    assert!(!report.any_action());
    assert_eq!(lines.last().map(String::as_str), Some("[Info] All files are up to date."));

    // Each overwrite left the replaced version behind
    let entries = folders.backup_entries();
    assert_eq!(entries.len(), 2, "{entries:?}");
    let (a_to_b, b_to_a): (Vec<_>, Vec<_>) = entries.iter().partition(|e| e.contains("_AtoB/"));
    assert_eq!(a_to_b.len(), 1);
    assert_eq!(b_to_a.len(), 1);
    assert_eq!(
        fs::read_to_string(folders.backups().join(a_to_b[0])).unwrap(),
        "chapter 1"
    );
    assert_eq!(
        fs::read_to_string(folders.backups().join(b_to_a[0])).unwrap(),
        "chapter 2 (steam)"
    );
}

// =============================================================================
// Mission 2: a deleted save comes back
// =============================================================================

#[test]
fn mission_deletion_is_not_propagated() {
    let folders = SaveFolders::new();
    folders.write_a("slot1.sav", "keep me", 0);
    folders.write_b("slot1.sav", "keep me", 0);

    fs::remove_file(folders.b().join("slot1.sav")).unwrap();
    let (report, lines) = sync(&folders, default_options(&folders));

    assert_eq!(report.file("slot1.sav"), Some(&FileOutcome::CopiedNew { to: savesync_core::Side::B }));
    assert_eq!(folders.read_b("slot1.sav"), "keep me");
    assert!(lines.contains(&"[New] Found slot1.sav in Steam only. Copying to Xbox...".to_string()));
    assert!(folders.backup_entries().is_empty());
}

// =============================================================================
// Mission 3: first sync of a fresh install
// =============================================================================

#[test]
fn mission_first_sync_fills_empty_side() {
    let folders = SaveFolders::new();
    for (i, name) in ["a.sav", "b.sav", "c.sav", "profile.dat"].iter().enumerate() {
        folders.write_a(name, name, i as u64);
    }

    let (report, lines) = sync(&folders, default_options(&folders));

    assert!(report.is_success());
    assert_eq!(names_in(&folders.b()), names_in(&folders.a()));
    assert!(folders.backup_entries().is_empty());

    // Names are processed in a stable order
    let copied: Vec<&String> = lines.iter().filter(|l| l.starts_with("[Success]")).collect();
    assert_eq!(
        copied,
        [
            "[Success] Copied a.sav to Xbox.",
            "[Success] Copied b.sav to Xbox.",
            "[Success] Copied c.sav to Xbox.",
            "[Success] Copied profile.dat to Xbox.",
        ]
    );
}

// =============================================================================
// Mission 4: coarse timestamps on removable storage
// =============================================================================

#[test]
fn mission_tolerance_ignores_timestamp_rounding() {
    let folders = SaveFolders::new();
    folders.write_a("slot1.sav", "same save", 1);
    folders.write_b("slot1.sav", "same save", 0);

    let strict = sync(&folders, default_options(&folders).with_dry_run(true)).0;
    assert_eq!(
        strict.file("slot1.sav"),
        Some(&FileOutcome::Planned {
            decision: savesync_core::Decision::ANewer
        })
    );

    let options = default_options(&folders).with_tolerance(Duration::from_secs(2));
    let (report, _) = sync(&folders, options);
    assert_eq!(report.file("slot1.sav"), Some(&FileOutcome::UpToDate));
    assert!(folders.backup_entries().is_empty());
}

// =============================================================================
// Mission 5: custom platform names
// =============================================================================

#[test]
fn mission_custom_labels_flow_into_every_line() {
    let folders = SaveFolders::new();
    folders.write_a("slot1.sav", "deck", 10);
    folders.write_b("slot1.sav", "desktop", 0);

    let options = default_options(&folders).with_labels(SideLabels::new("Deck", "Desktop"));
    let (report, lines) = sync(&folders, options);

    assert_eq!(report.status, RunStatus::Completed);
    assert!(lines[0].contains("\nDeck: "));
    assert!(lines[0].contains("\nDesktop: "));
    assert!(lines.contains(&"[Sync] Updating slot1.sav (AtoB)...".to_string()));
}

// =============================================================================
// Mission 6: one root unplugged
// =============================================================================

#[test]
fn mission_missing_drive_touches_nothing() {
    let folders = SaveFolders::new();
    folders.write_a("slot1.sav", "a", 0);
    fs::remove_dir(folders.b()).unwrap();

    let (report, lines) = sync(&folders, default_options(&folders));

    assert!(matches!(report.status, RunStatus::PathNotFound { .. }));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[Error] Xbox path not found: "));
    assert!(!folders.backups().exists());
    assert_eq!(names_in(&folders.a()), vec!["slot1.sav".to_string()]);
}
