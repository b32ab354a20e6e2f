//! End-to-end tests that invoke the compiled `savesync` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use savesync_test_utils::SaveFolders;

/// A `savesync` command isolated from the user's real config.
fn savesync(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("savesync").expect("Failed to find savesync binary");
    cmd.arg("--config").arg(config).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn config_path(folders: &SaveFolders) -> PathBuf {
    folders.root().join("config.toml")
}

/// `sync` with explicit folders and backup root.
fn sync_args(folders: &SaveFolders) -> Vec<String> {
    vec![
        "sync".into(),
        "-a".into(),
        folders.a().display().to_string(),
        "-b".into(),
        folders.b().display().to_string(),
        "--backup-root".into(),
        folders.backups().display().to_string(),
    ]
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn test_help_exits_zero() {
    let folders = SaveFolders::new();
    savesync(&config_path(&folders))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("backups"));
}

#[test]
fn test_no_command_prints_hint() {
    let folders = SaveFolders::new();
    savesync(&config_path(&folders))
        .assert()
        .success()
        .stdout(predicate::str::contains("savesync --help"));
}

// ============================================================================
// sync
// ============================================================================

#[test]
fn test_sync_without_folders_asks_for_both() {
    let folders = SaveFolders::new();
    savesync(&config_path(&folders))
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Please select both Steam and Xbox save folders.",
        ));
}

#[test]
fn test_sync_propagates_and_backs_up() {
    let folders = SaveFolders::new();
    folders.write_a("save1.dat", "steam progress", 10);
    folders.write_b("save1.dat", "xbox progress", 0);
    folders.write_b("save2.dat", "xbox only", 5);

    savesync(&config_path(&folders))
        .args(sync_args(&folders))
        .assert()
        .success()
        .stdout(predicate::str::contains("[Info] Starting sync check between:"))
        .stdout(predicate::str::contains("[Sync] Updating save1.dat (AtoB)..."))
        .stdout(predicate::str::contains("[Success] Copied save2.dat to Steam."));

    assert_eq!(folders.read_b("save1.dat"), "steam progress");
    assert_eq!(folders.read_a("save2.dat"), "xbox only");
    assert_eq!(folders.backup_content("save1.dat"), "xbox progress");
}

#[test]
fn test_sync_lines_carry_clock_prefix() {
    let folders = SaveFolders::new();
    let out = savesync(&config_path(&folders))
        .args(sync_args(&folders))
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&out.stdout);
    let last = stdout.lines().last().unwrap_or_default();
    // [HH:MM:SS] [Info] All files are up to date.
    assert_eq!(&last[0..1], "[");
    assert_eq!(&last[9..11], "] ");
    assert_eq!(&last[11..], "[Info] All files are up to date.");
}

#[test]
fn test_second_sync_is_up_to_date() {
    let folders = SaveFolders::new();
    folders.write_a("user1.dat", "new", 10);
    folders.write_b("user1.dat", "old", 0);

    savesync(&config_path(&folders)).args(sync_args(&folders)).assert().success();
    savesync(&config_path(&folders))
        .args(sync_args(&folders))
        .assert()
        .success()
        .stdout(predicate::str::contains("[Info] All files are up to date."))
        .stdout(predicate::str::contains("[Backup]").not());

    assert_eq!(folders.backup_entries().len(), 1);
}

#[test]
fn test_sync_missing_folder_fails() {
    let folders = SaveFolders::new();
    let missing = folders.root().join("nowhere");

    savesync(&config_path(&folders))
        .args(["sync", "-a"])
        .arg(&missing)
        .arg("-b")
        .arg(folders.b())
        .arg("--backup-root")
        .arg(folders.backups())
        .assert()
        .failure()
        .stdout(predicate::str::contains("[Error] Steam path not found:"));
}

#[test]
fn test_sync_dry_run_changes_nothing() {
    let folders = SaveFolders::new();
    folders.write_a("user1.dat", "new", 10);
    folders.write_b("user1.dat", "old", 0);

    savesync(&config_path(&folders))
        .args(sync_args(&folders))
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[Plan] user1.dat: Steam is newer, would update Xbox (AtoB)",
        ));

    assert_eq!(folders.read_b("user1.dat"), "old");
    assert!(!folders.backups().exists());
}

#[test]
fn test_sync_json_report_on_stdout() {
    let folders = SaveFolders::new();
    folders.write_a("only_a.dat", "a", 0);

    let out = savesync(&config_path(&folders))
        .args(sync_args(&folders))
        .arg("--json")
        .output()
        .unwrap();

    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["status"], "completed");
    assert_eq!(report["files"][0]["name"], "only_a.dat");
    assert_eq!(report["files"][0]["outcome"], "copied_new");
    assert!(String::from_utf8_lossy(&out.stderr).contains("[New] Found only_a.dat in Steam only."));
}

// ============================================================================
// status
// ============================================================================

#[test]
fn test_status_lists_pending_changes() {
    let folders = SaveFolders::new();
    folders.write_b("user2.dat", "b", 0);

    savesync(&config_path(&folders))
        .arg("status")
        .arg("-a")
        .arg(folders.a())
        .arg("-b")
        .arg(folders.b())
        .assert()
        .success()
        .stdout(predicate::str::contains("user2.dat: only in Xbox, would copy to Steam"));

    assert!(!folders.a().join("user2.dat").exists());
}

// ============================================================================
// config and backups
// ============================================================================

#[test]
fn test_config_set_then_sync_uses_saved_folders() {
    let folders = SaveFolders::new();
    let config = config_path(&folders);
    folders.write_a("user1.dat", "a", 0);

    savesync(&config)
        .args(["config", "set", "--label-a", "PC", "-a"])
        .arg(folders.a())
        .arg("-b")
        .arg(folders.b())
        .arg("--backup-root")
        .arg(folders.backups())
        .assert()
        .success();
    assert!(fs::read_to_string(&config).unwrap().contains("label = \"PC\""));

    savesync(&config)
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("[New] Found user1.dat in PC only. Copying to Xbox..."));
}

#[test]
fn test_config_show_json() {
    let folders = SaveFolders::new();
    let out = savesync(&config_path(&folders))
        .args(["config", "show", "--json"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let config: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(config["side_a"]["label"], "Steam");
    assert_eq!(config["tolerance_secs"], 0);
}

#[test]
fn test_backups_lists_run_folders() {
    let folders = SaveFolders::new();
    folders.write_a("user1.dat", "old", 0);
    folders.write_b("user1.dat", "new", 10);
    savesync(&config_path(&folders)).args(sync_args(&folders)).assert().success();

    savesync(&config_path(&folders))
        .arg("backups")
        .arg("--backup-root")
        .arg(folders.backups())
        .assert()
        .success()
        .stdout(predicate::str::contains("_BtoA"))
        .stdout(predicate::str::contains("user1.dat"));
}

#[test]
fn test_backups_empty_root() {
    let folders = SaveFolders::new();
    savesync(&config_path(&folders))
        .arg("backups")
        .arg("--backup-root")
        .arg(folders.backups())
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups in"));
}
