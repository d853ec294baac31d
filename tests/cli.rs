//! End-to-end tests driving the compiled `labscan` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn labscan_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("labscan");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::create_dir_all(root.join("data")).unwrap();

    // Submission fixtures: two programs sharing two lines, one disjoint.
    let files_dir = root.join("files");
    fs::create_dir_all(&files_dir).unwrap();
    fs::write(
        files_dir.join("alpha.txt"),
        "fn main() {\n    println!(\"hello\");\n}\n",
    )
    .unwrap();
    fs::write(
        files_dir.join("beta.txt"),
        "fn main() {\n    println!(\"goodbye\");\n}\n",
    )
    .unwrap();
    // No trailing newline: a trailing terminator contributes an empty line
    // to the set, which would intersect with alpha.txt's.
    fs::write(files_dir.join("gamma.txt"), "entirely\nunrelated\ncontent").unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/labscan.sqlite"

[server]
bind = "127.0.0.1:7431"
"#,
        root.display()
    );

    let config_path = config_dir.join("labscan.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_labscan(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = labscan_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run labscan binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_labscan(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_labscan(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_labscan(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_owner_add_and_list() {
    let (_tmp, config_path) = setup_test_env();
    run_labscan(&config_path, &["init"]);

    let (stdout, stderr, success) =
        run_labscan(&config_path, &["owner", "add", "alice", "--name", "Alice"]);
    assert!(success, "owner add failed: stdout={}, stderr={}", stdout, stderr);

    let (stdout, _, success) = run_labscan(&config_path, &["owner", "list"]);
    assert!(success);
    assert!(stdout.contains("owners: 1"));
    assert!(stdout.contains("alice"));
}

#[test]
fn test_submit_unknown_owner_fails() {
    let (tmp, config_path) = setup_test_env();
    run_labscan(&config_path, &["init"]);

    let alpha = tmp.path().join("files/alpha.txt");
    let (_, stderr, success) = run_labscan(
        &config_path,
        &["submit", "--owner", "ghost", "--name", "Lab 1", alpha.to_str().unwrap()],
    );
    assert!(!success);
    assert!(stderr.contains("owner not found"));
}

#[test]
fn test_cross_owner_duplicate_detected() {
    let (tmp, config_path) = setup_test_env();
    run_labscan(&config_path, &["init"]);
    run_labscan(&config_path, &["owner", "add", "alice", "--name", "Alice"]);
    run_labscan(&config_path, &["owner", "add", "bob", "--name", "Bob"]);

    let alpha = tmp.path().join("files/alpha.txt");
    let beta = tmp.path().join("files/beta.txt");

    // First submission has nothing to compare against.
    let (stdout, stderr, success) = run_labscan(
        &config_path,
        &["submit", "--owner", "alice", "--name", "Lab 1", alpha.to_str().unwrap()],
    );
    assert!(success, "first submit failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("matches: 0"));

    // Second submitter shares two lines with alpha.txt.
    let (stdout, stderr, success) = run_labscan(
        &config_path,
        &["submit", "--owner", "bob", "--name", "Lab 1", beta.to_str().unwrap()],
    );
    assert!(success, "second submit failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("matches: 1"));

    let (stdout, _, success) = run_labscan(&config_path, &["list"]);
    assert!(success);
    assert!(stdout.contains("submissions: 2"));
}

#[test]
fn test_resubmission_by_same_owner_not_self_matched() {
    let (tmp, config_path) = setup_test_env();
    run_labscan(&config_path, &["init"]);
    run_labscan(&config_path, &["owner", "add", "alice", "--name", "Alice"]);

    let alpha = tmp.path().join("files/alpha.txt");
    run_labscan(
        &config_path,
        &["submit", "--owner", "alice", "--name", "Lab 1", alpha.to_str().unwrap()],
    );

    // Identical content resubmitted by the same owner must not match the
    // owner's earlier submission.
    let (stdout, _, success) = run_labscan(
        &config_path,
        &["submit", "--owner", "alice", "--name", "Lab 1 retry", alpha.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("matches: 0"));
}

#[test]
fn test_disjoint_files_produce_no_matches() {
    let (tmp, config_path) = setup_test_env();
    run_labscan(&config_path, &["init"]);
    run_labscan(&config_path, &["owner", "add", "alice", "--name", "Alice"]);
    run_labscan(&config_path, &["owner", "add", "bob", "--name", "Bob"]);

    let alpha = tmp.path().join("files/alpha.txt");
    let gamma = tmp.path().join("files/gamma.txt");

    run_labscan(
        &config_path,
        &["submit", "--owner", "alice", "--name", "Lab 1", alpha.to_str().unwrap()],
    );
    let (stdout, _, success) = run_labscan(
        &config_path,
        &["submit", "--owner", "bob", "--name", "Lab 1", gamma.to_str().unwrap()],
    );
    assert!(success);
    assert!(stdout.contains("matches: 0"));
}
