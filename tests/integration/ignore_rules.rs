//! Integration tests for .dockerignore handling

use super::test_utils::{context_with, hash_and_list};
use context_hash::{hash_context, ContextHashError};

/// Excluded files are absent and do not affect the digest
#[test]
fn test_excluded_file_is_absent() {
    let ctx = context_with(&[
        ("Dockerfile", b"FROM scratch"),
        (".dockerignore", b"*.log\n"),
        ("app.py", b"print()"),
        ("debug.log", b"noise"),
    ]);
    let (before, paths) = hash_and_list(ctx.path(), "Dockerfile");
    assert_eq!(paths, vec![".dockerignore", "Dockerfile", "app.py"]);

    std::fs::write(ctx.path().join("debug.log"), "different noise").unwrap();
    assert_eq!(hash_context(ctx.path(), "Dockerfile").unwrap(), before);
}

/// A negated pattern re-includes a file under an excluded directory
#[test]
fn test_negation_reincludes() {
    let ctx = context_with(&[
        ("Dockerfile", b"FROM scratch"),
        (".dockerignore", b"docs\n!docs/keep.md\n"),
        ("docs/keep.md", b"keep"),
        ("docs/drop.md", b"drop"),
    ]);
    let (_, paths) = hash_and_list(ctx.path(), "Dockerfile");
    assert_eq!(paths, vec![".dockerignore", "Dockerfile", "docs/keep.md"]);
}

/// The last matching pattern wins
#[test]
fn test_last_match_wins() {
    let ctx = context_with(&[
        ("Dockerfile", b"FROM scratch"),
        (".dockerignore", b"!a.txt\n*.txt\n"),
        ("a.txt", b"a"),
        ("b.txt", b"b"),
    ]);
    let (_, paths) = hash_and_list(ctx.path(), "Dockerfile");
    assert_eq!(paths, vec![".dockerignore", "Dockerfile"]);
}

/// The Dockerfile is archived even when everything is excluded
#[test]
fn test_dockerfile_forced_under_blanket_exclude() {
    let ctx = context_with(&[
        ("Dockerfile", b"FROM scratch"),
        (".dockerignore", b"*\n"),
        ("a.txt", b"hello"),
    ]);
    let (_, paths) = hash_and_list(ctx.path(), "Dockerfile");
    assert_eq!(paths, vec!["Dockerfile"]);
}

/// A non-default Dockerfile in a subdirectory is force-included too
#[test]
fn test_nested_dockerfile_forced() {
    let ctx = context_with(&[
        ("build/Containerfile", b"FROM scratch"),
        (".dockerignore", b"build\n"),
        ("build/other", b"x"),
    ]);
    let (_, paths) = hash_and_list(ctx.path(), "build/Containerfile");
    assert_eq!(paths, vec![".dockerignore", "build/Containerfile"]);
}

/// The ignore file can exclude itself
#[test]
fn test_dockerignore_can_exclude_itself() {
    let ctx = context_with(&[
        ("Dockerfile", b"FROM scratch"),
        (".dockerignore", b".dockerignore\n"),
    ]);
    let (_, paths) = hash_and_list(ctx.path(), "Dockerfile");
    assert_eq!(paths, vec!["Dockerfile"]);
}

/// `**` matches any number of directories
#[test]
fn test_double_star_matches_nested() {
    let ctx = context_with(&[
        ("Dockerfile", b"FROM scratch"),
        (".dockerignore", b"**/*.pyc\n"),
        ("top.pyc", b"0"),
        ("pkg/mod.pyc", b"1"),
        ("pkg/deep/er.pyc", b"2"),
        ("pkg/mod.py", b"src"),
    ]);
    let (_, paths) = hash_and_list(ctx.path(), "Dockerfile");
    assert_eq!(
        paths,
        vec![".dockerignore", "Dockerfile", "pkg/", "pkg/deep/", "pkg/mod.py"]
    );
}

/// Comments, blank lines and leading slashes are handled like docker does
#[test]
fn test_comments_and_leading_slash() {
    let ctx = context_with(&[
        ("Dockerfile", b"FROM scratch"),
        (".dockerignore", b"# build output\n\n/target\n"),
        ("target/bin", b"bin"),
        ("src.rs", b"src"),
    ]);
    let (_, paths) = hash_and_list(ctx.path(), "Dockerfile");
    assert_eq!(paths, vec![".dockerignore", "Dockerfile", "src.rs"]);
}

/// A malformed pattern is an ignore-rule error
#[test]
fn test_malformed_pattern_fails() {
    let ctx = context_with(&[
        ("Dockerfile", b"FROM scratch"),
        (".dockerignore", b"[unclosed\n"),
    ]);
    let err = hash_context(ctx.path(), "Dockerfile").unwrap_err();
    assert!(matches!(err, ContextHashError::ValidateContext(_)));
}

/// A lone `!` is rejected
#[test]
fn test_lone_bang_fails() {
    let ctx = context_with(&[("Dockerfile", b"FROM scratch"), (".dockerignore", b"!\n")]);
    let err = hash_context(ctx.path(), "Dockerfile").unwrap_err();
    assert!(err.to_string().contains("illegal exclusion pattern"));
}
