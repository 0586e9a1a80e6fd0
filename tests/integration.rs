//! Integration tests for the `updown` binary.
//!
//! These tests spawn the compiled binary and assert on exit codes, stdout and
//! stderr.  `rustic` is **not** required: they cover argument handling,
//! config loading and `--print-config`, none of which reach a rustic
//! invocation.
//!
//! # Running
//!
//! ```sh
//! cargo test --test integration
//! ```

use std::{fs, path::Path, process::Command};

/// Absolute path to the compiled `updown` binary, resolved at compile time
/// by Cargo.
const BIN: &str = env!("CARGO_BIN_EXE_updown");

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Run `updown` with `args` in the given working directory.
///
/// Returns `(exit_success, stdout, stderr)`.
fn run_in(args: &[&str], dir: &Path) -> (bool, String, String) {
    let out = Command::new(BIN)
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn {BIN}: {e}"));

    (
        out.status.success(),
        String::from_utf8_lossy(&out.stdout).into_owned(),
        String::from_utf8_lossy(&out.stderr).into_owned(),
    )
}

/// A temp dir holding `.rustic.yaml` with `content`.
fn project(content: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(".rustic.yaml"), content).unwrap();
    dir
}

const FULL: &str = r#"
remote: "s3:bucket/repo"
host: "server1"
excludes:
  - "*.tmp"
"#;

// ─── --help / --version ───────────────────────────────────────────────────────

#[test]
fn help_lists_both_commands() {
    let (ok, stdout, _) = run_in(&["--help"], &std::env::temp_dir());
    assert!(ok, "updown --help should exit 0");
    assert!(stdout.contains("up"));
    assert!(stdout.contains("down"));
}

#[test]
fn version_exits_zero() {
    let (ok, stdout, _) = run_in(&["--version"], &std::env::temp_dir());
    assert!(ok);
    assert!(stdout.contains("0.1.0"));
}

// ─── arity ────────────────────────────────────────────────────────────────────

#[test]
fn up_with_two_dirs_is_a_usage_error() {
    let (ok, _, stderr) = run_in(&["up", "/nonexistent/a", "/nonexistent/b"], &std::env::temp_dir());
    assert!(!ok);
    assert!(stderr.contains("not 2"), "stderr: {stderr}");
    assert!(!stderr.contains("config"), "no config should be read: {stderr}");
}

#[test]
fn down_with_three_dirs_is_a_usage_error() {
    let (ok, _, stderr) = run_in(&["down", "a", "b", "c"], &std::env::temp_dir());
    assert!(!ok);
    assert!(stderr.contains("not 3"), "stderr: {stderr}");
}

// ─── config failures ──────────────────────────────────────────────────────────

#[test]
fn missing_config_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let (ok, _, stderr) = run_in(&["up", "--print-config"], dir.path());
    assert!(!ok);
    assert!(stderr.contains("reading config"), "stderr: {stderr}");
    assert!(stderr.contains(".rustic.yaml"), "stderr: {stderr}");
}

#[test]
fn malformed_config_exits_nonzero() {
    let dir = project("excludes: {not: a list}\n");
    let (ok, _, stderr) = run_in(&["down", "--print-config"], dir.path());
    assert!(!ok);
    assert!(stderr.contains("parsing config"), "stderr: {stderr}");
}

// ─── --print-config ───────────────────────────────────────────────────────────

#[test]
fn up_resolves_config_from_dir_argument() {
    let dir = project(FULL);
    let path = dir.path().to_str().unwrap();
    let (ok, stdout, stderr) =
        run_in(&["up", path, "--print-config", "--exclude", "old"], &std::env::temp_dir());
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("\"s3:bucket/repo\""), "{stdout}");
    assert!(stdout.contains("\"server1\""), "{stdout}");
    assert!(stdout.contains("\"*.tmp\""), "{stdout}");
    assert!(!stdout.contains("\"old\""), "config excludes replace flags: {stdout}");
    assert!(stdout.contains("ignore_inode: true"), "{stdout}");
    assert!(stdout.contains(path), "{stdout}");
}

#[test]
fn up_resolves_relative_dir_to_absolute_root() {
    let parent = tempfile::tempdir().unwrap();
    let dir = parent.path().canonicalize().unwrap().join("project");
    fs::create_dir(&dir).unwrap();
    fs::write(dir.join(".rustic.yaml"), FULL).unwrap();

    let (ok, stdout, stderr) = run_in(&["up", "project", "--print-config"], dir.parent().unwrap());
    assert!(ok, "stderr: {stderr}");
    assert!(
        stdout.contains(&format!("root: {:?}", dir)),
        "root should be absolute: {stdout}"
    );
}

#[test]
fn print_config_hides_password() {
    let dir = project(FULL);
    let (ok, stdout, stderr) = run_in(&["--password", "hunter2", "up", "--print-config"], dir.path());
    assert!(ok, "stderr: {stderr}");
    assert!(!stdout.contains("hunter2"), "password leaked: {stdout}");
    assert!(stdout.contains("password: \"***\""), "{stdout}");
}

#[test]
fn up_defaults_to_current_dir() {
    let dir = project(FULL);
    let (ok, stdout, _) = run_in(&["up", "--print-config"], dir.path());
    assert!(ok);
    assert!(stdout.contains("s3:bucket/repo"), "{stdout}");
}

#[test]
fn down_without_config_uses_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().to_str().unwrap();
    let (ok, stdout, stderr) = run_in(
        &[
            "-r",
            "s3:bucket/repo",
            "down",
            path,
            "--allow-missing-config",
            "--print-config",
        ],
        &std::env::temp_dir(),
    );
    assert!(ok, "stderr: {stderr}");
    assert!(stdout.contains("s3:bucket/repo"), "{stdout}");
    assert!(stdout.contains("\"latest\""), "{stdout}");
    assert!(stdout.contains(path), "{stdout}");
}

// ─── operation failures ───────────────────────────────────────────────────────

#[test]
fn up_without_any_repository_fails() {
    let dir = project("host: server1\n");
    let (ok, _, stderr) = run_in(&["-q", "up"], dir.path());
    assert!(!ok);
    assert!(stderr.contains("backup failed"), "stderr: {stderr}");
    assert!(stderr.contains("no repository"), "stderr: {stderr}");
}

#[test]
fn unknown_flag_exits_nonzero() {
    let (ok, _, _) = run_in(&["up", "--this-flag-does-not-exist"], &std::env::temp_dir());
    assert!(!ok);
}
