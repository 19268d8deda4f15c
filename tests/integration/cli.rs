//! Integration tests for the context-hash binary

use super::test_utils::context_with;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary with an isolated config home and no logging overrides.
fn run(args: &[&str], cwd: &Path) -> Output {
    run_with_env(args, cwd, &[])
}

fn run_with_env(args: &[&str], cwd: &Path, env: &[(&str, &str)]) -> Output {
    let config_home = TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_context-hash"))
        .current_dir(cwd)
        .env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("CONTEXT_HASH_LOG")
        .env_remove("CONTEXT_HASH_LOG_FORMAT")
        .env_remove("CONTEXT_HASH_LOG_OUTPUT")
        .envs(env.iter().copied())
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_prints_only_digest() {
    let ctx = context_with(&[("Dockerfile", b"FROM scratch"), ("a.txt", b"hello")]);
    let output = run(&["."], ctx.path());

    assert!(
        output.status.success(),
        "stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    let digest = stdout.trim_end();
    assert_eq!(stdout, format!("{}\n", digest));
    assert_eq!(
        digest,
        context_hash::hash_context(ctx.path(), "Dockerfile").unwrap()
    );
}

#[test]
fn test_debug_lists_files_on_stderr() {
    let ctx = context_with(&[("Dockerfile", b"FROM scratch"), ("a.txt", b"hello")]);
    let output = run(&["--debug", "."], ctx.path());

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("+ Dockerfile\n"));
    assert!(stderr.contains("+ a.txt\n"));
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim().len(), 64);
}

#[test]
fn test_file_flag_selects_dockerfile() {
    let ctx = context_with(&[("Containerfile", b"FROM scratch")]);
    let output = run(&["-f", "Containerfile", "."], ctx.path());
    assert!(output.status.success());
}

#[test]
fn test_missing_dockerfile_exits_one() {
    let ctx = context_with(&[("a.txt", b"hello")]);
    let output = run(&["."], ctx.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not a file"), "stderr={:?}", stderr);
}

#[test]
fn test_config_file_sets_dockerfile() {
    let ctx = context_with(&[
        ("Containerfile", b"FROM scratch"),
        ("hash.toml", b"dockerfile = \"Containerfile\"\n"),
    ]);
    let output = run(&["--config", "hash.toml", "."], ctx.path());
    assert!(
        output.status.success(),
        "stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_invalid_log_format_env_is_rejected() {
    let ctx = context_with(&[("Dockerfile", b"FROM scratch")]);
    let output = run_with_env(&["."], ctx.path(), &[("CONTEXT_HASH_LOG_FORMAT", "xml")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid log format: xml"), "stderr={:?}", stderr);
}

#[test]
fn test_valid_log_format_env_is_accepted() {
    let ctx = context_with(&[("Dockerfile", b"FROM scratch")]);
    let output = run_with_env(&["."], ctx.path(), &[("CONTEXT_HASH_LOG_FORMAT", "json")]);
    assert!(output.status.success());
}
