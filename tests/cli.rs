//! CLI smoke tests for the rolodex binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn rolodex(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rolodex").unwrap();
    cmd.env("ROLODEX_DATA_DIR", data_dir.path());
    cmd
}

#[test]
fn add_list_and_audit_flow() {
    let data_dir = TempDir::new().unwrap();

    rolodex(&data_dir)
        .args(["contact", "add", "Alice", "0911111111"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added contact Alice"));

    rolodex(&data_dir)
        .args(["contact", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("0911111111"));

    rolodex(&data_dir)
        .args(["audit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE"));
}

#[test]
fn update_and_delete_leave_audit_records() {
    let data_dir = TempDir::new().unwrap();

    rolodex(&data_dir)
        .args(["contact", "add", "Alice", "0911111111"])
        .assert()
        .success();

    rolodex(&data_dir)
        .args(["contact", "update", "1", "Alice", "0922222222"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated contact Alice"));

    rolodex(&data_dir)
        .args(["contact", "delete", "1", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted contact"));

    rolodex(&data_dir)
        .args(["audit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DELETE"))
        .stdout(predicate::str::contains("UPDATE"))
        .stdout(predicate::str::contains("CREATE"));

    rolodex(&data_dir)
        .args(["audit", "show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0911111111"))
        .stdout(predicate::str::contains("0922222222"));
}

#[test]
fn invalid_contact_is_rejected() {
    let data_dir = TempDir::new().unwrap();

    rolodex(&data_dir)
        .args(["contact", "add", "", "0911111111"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name is required"));

    rolodex(&data_dir)
        .args(["audit", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit records found."));
}

#[test]
fn delete_without_force_is_a_dry_run() {
    let data_dir = TempDir::new().unwrap();

    rolodex(&data_dir)
        .args(["contact", "add", "Alice", "0911111111"])
        .assert()
        .success();

    rolodex(&data_dir)
        .args(["contact", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Use --force"));

    // Still there, and no delete record
    rolodex(&data_dir)
        .args(["contact", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"));
}

#[test]
fn config_shows_paths() {
    let data_dir = TempDir::new().unwrap();

    rolodex(&data_dir)
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data directory"))
        .stdout(predicate::str::contains("Strict audit: false"));
}
