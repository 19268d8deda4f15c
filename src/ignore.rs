//! Ignore rules for a build context.
//!
//! Rules come from `.dockerignore` at the context root. A missing file means
//! no rules. Lines starting with `#` are comments, blank lines are skipped and
//! every other line is a pattern, optionally prefixed with `!`. Patterns are
//! cleaned to relative slash paths before they are compiled (see [`pattern`]).

pub mod pattern;

use crate::error::IgnoreError;
use crate::tree::walker::ContextWalker;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

pub use pattern::{Pattern, PatternMatcher};

/// Name of the ignore file at the context root.
pub const DOCKERIGNORE: &str = ".dockerignore";

const UTF8_BOM: char = '\u{feff}';

/// Read the ignore patterns for `root`. Returns an empty list when the
/// context has no ignore file.
pub fn read_dockerignore(root: &Path) -> Result<Vec<String>, IgnoreError> {
    let path = root.join(DOCKERIGNORE);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No ignore file");
            return Ok(Vec::new());
        }
        Err(source) => return Err(IgnoreError::Read { path, source }),
    };
    let patterns = parse_dockerignore(&contents);
    debug!(path = %path.display(), count = patterns.len(), "Loaded ignore patterns");
    Ok(patterns)
}

/// Parse ignore-file contents into cleaned pattern strings, `!` preserved.
pub fn parse_dockerignore(contents: &str) -> Vec<String> {
    let contents = contents.strip_prefix(UTF8_BOM).unwrap_or(contents);
    let mut out = Vec::new();
    for line in contents.lines() {
        // Comments are recognised before trimming
        if line.starts_with('#') {
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (invert, body) = match line.strip_prefix('!') {
            Some(rest) => (true, rest.trim()),
            None => (false, line),
        };
        let mut body = if body.is_empty() {
            String::new()
        } else {
            pattern::clean_path(body)
        };
        if body.len() > 1 && body.starts_with('/') {
            body.remove(0);
        }
        if invert {
            out.push(format!("!{}", body));
        } else {
            out.push(body);
        }
    }
    out
}

/// Check that every path the patterns leave in the context can be read.
///
/// Walks the context with the same matcher the archiver uses. Excluded
/// subtrees are skipped; symlinks are not followed.
pub fn validate_context_directory<S: AsRef<str>>(
    root: &Path,
    excludes: &[S],
) -> Result<(), IgnoreError> {
    let matcher = PatternMatcher::new(excludes)?;
    for entry in ContextWalker::new(root, matcher) {
        let entry = entry.map_err(walk_error)?;
        if !entry.file_type().is_file() {
            continue;
        }
        fs::File::open(entry.path()).map_err(|source| IgnoreError::CannotAccess {
            path: entry.path().to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn walk_error(err: walkdir::Error) -> IgnoreError {
    let kind = err.io_error().map(io::Error::kind);
    match (kind, err.path()) {
        (Some(io::ErrorKind::PermissionDenied), Some(path)) => {
            IgnoreError::CannotStat(path.to_path_buf())
        }
        (Some(io::ErrorKind::NotFound), Some(path)) => IgnoreError::NotFound(path.to_path_buf()),
        _ => IgnoreError::Walk(err),
    }
}
