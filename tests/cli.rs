// ABOUTME: Integration tests for the reclaim CLI.
// ABOUTME: Runs the binary against a temporary state root and cgroup tree.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn reclaim_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("reclaim"));
    cmd.env_remove("RECLAIM_CONFIG")
        .env_remove("RECLAIM_ROOT")
        .env_remove("RUST_LOG");
    cmd
}

/// A state root and v1 cgroup tree wired together by a config file.
struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("state")).unwrap();
        fs::create_dir_all(dir.path().join("cgroup")).unwrap();
        let config = format!(
            "root: {}\ncgroup:\n  root: {}\n  layout: v1\nstop:\n  timeout: 2s\n",
            dir.path().join("state").display(),
            dir.path().join("cgroup").display(),
        );
        fs::write(dir.path().join("config.yml"), config).unwrap();
        Self { dir }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.yml")
    }

    fn state_dir(&self, id: &str) -> PathBuf {
        self.dir.path().join("state").join(id)
    }

    fn cgroup_dir(&self, id: &str) -> PathBuf {
        self.dir.path().join("cgroup/memory/reclaim").join(id)
    }

    /// Register a container with a memory cgroup on disk.
    fn add_container(&self, id: &str, phase: &str, pid: u32) {
        fs::create_dir_all(self.cgroup_dir(id)).unwrap();
        let oci_config = serde_json::json!({
            "ociVersion": "1.0.2",
            "linux": {
                "cgroupsPath": format!("reclaim/{id}"),
                "resources": {"memory": {"limit": 1048576}}
            }
        });
        let status = serde_json::json!({
            "id": id,
            "phase": phase,
            "pid": pid,
            "annotations": {
                "reclaim.bundle": format!("/run/bundles/{id}"),
                "reclaim.config": oci_config.to_string(),
            }
        });
        fs::create_dir_all(self.state_dir(id)).unwrap();
        fs::write(self.state_dir(id).join("status.json"), status.to_string()).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = reclaim_cmd();
        cmd.arg("--config").arg(self.config_path());
        cmd
    }
}

fn exists(path: &Path) -> bool {
    path.try_exists().unwrap()
}

#[test]
fn help_shows_delete() {
    reclaim_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("delete"));
}

#[test]
fn delete_help_shows_example_and_force() {
    reclaim_cmd()
        .args(["delete", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"))
        .stdout(predicate::str::contains("reclaim delete ubuntu01"));
}

#[test]
fn delete_without_ids_fails() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("delete")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing container ID"));
}

#[test]
fn delete_unknown_container_fails() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["delete", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("container ID (ghost) does not exist"));
}

#[test]
fn delete_stopped_container() {
    let fixture = Fixture::new();
    fixture.add_container("ubuntu01", "stopped", 0);

    fixture
        .cmd()
        .args(["delete", "ubuntu01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted ubuntu01"))
        .stdout(predicate::str::contains("Delete complete!"));

    assert!(!exists(&fixture.state_dir("ubuntu01")));
    assert!(!exists(&fixture.cgroup_dir("ubuntu01")));
}

#[test]
fn root_flag_overrides_config() {
    let fixture = Fixture::new();
    fixture.add_container("ubuntu01", "stopped", 0);
    let empty = tempfile::tempdir().unwrap();

    fixture
        .cmd()
        .arg("--root")
        .arg(empty.path())
        .args(["delete", "ubuntu01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));

    assert!(exists(&fixture.state_dir("ubuntu01")));
}

#[test]
fn batch_stops_at_first_failure() {
    let fixture = Fixture::new();
    fixture.add_container("web", "stopped", 0);
    fixture.add_container("db", "stopped", 0);

    fixture
        .cmd()
        .args(["delete", "web", "ghost", "db"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Deleted web"))
        .stderr(predicate::str::contains("container ID (ghost) does not exist"));

    assert!(!exists(&fixture.state_dir("web")));
    assert!(exists(&fixture.state_dir("db")));
    assert!(exists(&fixture.cgroup_dir("db")));
}

#[test]
fn failed_batch_still_reports_warnings_for_deleted_containers() {
    let fixture = Fixture::new();
    fixture.add_container("web", "stopped", 0);
    fs::remove_dir(fixture.cgroup_dir("web")).unwrap();

    fixture
        .cmd()
        .args(["delete", "web", "ghost"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Deleted web"))
        .stderr(predicate::str::contains("already removed"))
        .stderr(predicate::str::contains("container ID (ghost) does not exist"));
}

#[test]
fn malformed_id_does_not_exist() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["delete", "a/b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("container ID (a/b) does not exist"));
}

#[test]
fn running_container_requires_force() {
    let fixture = Fixture::new();
    let mut child = std::process::Command::new("sleep").arg("30").spawn().unwrap();
    fixture.add_container("busy", "running", child.id());

    let assert = fixture.cmd().args(["delete", "busy"]).assert();

    child.kill().unwrap();
    child.wait().unwrap();

    assert
        .failure()
        .stderr(predicate::str::contains("still running"));
    assert!(exists(&fixture.state_dir("busy")));
    assert!(exists(&fixture.cgroup_dir("busy")));
}

#[test]
fn json_mode_emits_deleted_event() {
    let fixture = Fixture::new();
    fixture.add_container("ubuntu01", "stopped", 0);

    fixture
        .cmd()
        .args(["--json", "delete", "ubuntu01"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""event":"deleted""#))
        .stdout(predicate::str::contains(r#""container_id":"ubuntu01""#));
}

#[test]
fn quiet_and_json_conflict() {
    reclaim_cmd()
        .args(["--quiet", "--json", "delete", "x"])
        .assert()
        .failure();
}
