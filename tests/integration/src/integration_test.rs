//! End-to-end integration test for the vertical slice
//!
//! Exercises the complete flow: config file -> options -> async sync -> backup listing.

use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use savesync_core::{
    BackupStore, Direction, FileOutcome, LogSink, MemorySink, Reconciler, RunStatus, SyncConfig,
};
use savesync_test_utils::SaveFolders;

/// Write a config.toml pointing at the scenario folders
fn write_config(folders: &SaveFolders) -> std::path::PathBuf {
    let path = folders.root().join("config.toml");
    fs::write(
        &path,
        format!(
            r#"
backup_root = "{backups}"

[side_a]
label = "Steam"
path = "{a}"

[side_b]
label = "Xbox"
path = "{b}"
"#,
            backups = folders.backups().display(),
            a = folders.a().display(),
            b = folders.b().display(),
        ),
    )
    .unwrap();
    path
}

#[tokio::test]
async fn test_config_to_sync_to_backup_listing() {
    let folders = SaveFolders::new();
    folders.write_a("user1.dat", "steam newer", 10);
    folders.write_b("user1.dat", "xbox older", 0);
    folders.write_a("settings.cfg", "same", 5);
    folders.write_b("settings.cfg", "same", 5);
    folders.write_b("user2.dat", "xbox only", 3);

    // 1. Load config
    let config = SyncConfig::load(&write_config(&folders)).unwrap();
    let side_a = config.side_a.path.clone().unwrap();
    let side_b = config.side_b.path.clone().unwrap();

    // 2. Run the reconciler off the async runtime
    let sink = Arc::new(MemorySink::new());
    let reconciler = Reconciler::new(config.options().unwrap());
    let report = reconciler
        .synchronize(side_a, side_b, Arc::clone(&sink) as Arc<dyn LogSink>)
        .await;

    assert_eq!(report.status, RunStatus::Completed);
    assert!(report.is_success());
    assert_eq!(report.files.len(), 3);
    assert_eq!(report.file("settings.cfg"), Some(&FileOutcome::UpToDate));

    // 3. Both folders now hold the newest version of everything
    assert_eq!(folders.read_b("user1.dat"), "steam newer");
    assert_eq!(folders.read_a("user2.dat"), "xbox only");
    assert_eq!(folders.mtime_a("user1.dat"), folders.mtime_b("user1.dat"));

    // 4. The backup is discoverable through the store
    let listed = BackupStore::new(folders.backups()).list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].direction, Some(Direction::AtoB));
    assert!(listed[0].created.is_some());
    assert_eq!(listed[0].files, vec!["user1.dat".to_string()]);

    // 5. The log tells the same story
    let lines = sink.lines();
    assert!(lines[0].starts_with("[Info] Starting sync check between:\nSteam: "));
    assert!(lines.iter().any(|l| l == "[Success] user1.dat updated successfully."));
    assert!(lines.iter().any(|l| l == "[Success] Copied user2.dat to Steam."));
    assert!(!lines.iter().any(|l| l.contains("settings.cfg")));
}

#[test]
fn test_report_serializes_for_scripting() {
    let folders = SaveFolders::new();
    folders.write_a("user1.dat", "a", 0);

    let config = SyncConfig::load(&write_config(&folders)).unwrap();
    let report = Reconciler::new(config.options().unwrap()).plan(&folders.a(), &folders.b());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["status"], "completed");
    assert_eq!(json["files"][0]["outcome"], "planned");
    assert_eq!(json["files"][0]["decision"], "AOnly");
    assert!(!folders.b().join("user1.dat").exists());
}
