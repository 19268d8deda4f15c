//! Dockerignore pattern matching.
//!
//! Patterns are slash-separated globs: `*` matches a run of non-separator
//! characters, `?` a single one, `[...]` a character class, `\` escapes the
//! next character and `**` spans any number of directories. A `!` prefix turns
//! a pattern into an exclusion (re-include). Patterns are evaluated in order
//! and the last one that matches a path or any of its parent directories wins.

use crate::error::IgnoreError;
use regex::Regex;
use tracing::trace;

/// A single compiled ignore pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    cleaned: String,
    exclusion: bool,
    regex: Regex,
}

impl Pattern {
    /// Parse and compile one pattern line.
    pub fn new(raw: &str) -> Result<Self, IgnoreError> {
        let trimmed = raw.trim();
        let (exclusion, body) = match trimmed.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if exclusion && body.is_empty() {
            return Err(IgnoreError::IllegalExclusion(raw.to_string()));
        }
        let cleaned = clean_path(body);
        let regex = compile(&cleaned).map_err(|reason| IgnoreError::Pattern {
            pattern: raw.to_string(),
            reason,
        })?;
        Ok(Self {
            cleaned,
            exclusion,
            regex,
        })
    }

    /// The cleaned pattern, without the `!` prefix.
    pub fn as_str(&self) -> &str {
        &self.cleaned
    }

    /// Whether this is a `!` re-include pattern.
    pub fn is_exclusion(&self) -> bool {
        self.exclusion
    }

    /// Match a slash-separated path relative to the context root.
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Ordered pattern set with last-match-wins semantics.
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<Pattern>,
}

impl PatternMatcher {
    /// Compile every non-blank pattern, in order.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, IgnoreError> {
        let patterns = patterns
            .iter()
            .map(AsRef::as_ref)
            .filter(|p| !p.trim().is_empty())
            .map(Pattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        for pattern in &patterns {
            trace!(
                pattern = pattern.as_str(),
                reinclude = pattern.is_exclusion(),
                "Compiled ignore pattern"
            );
        }
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Decide whether `path` is ignored.
    ///
    /// A pattern applies when it matches `path` itself or any of its parent
    /// directories. Patterns that cannot change the current verdict are skipped.
    pub fn matches_or_parent_matches(&self, path: &str) -> bool {
        let parent = match path.rsplit_once('/') {
            Some((parent, _)) => parent,
            None => ".",
        };
        let parent_dirs: Vec<&str> = parent.split('/').collect();

        let mut matched = false;
        for pattern in &self.patterns {
            if pattern.exclusion != matched {
                continue;
            }
            let mut hit = pattern.matches(path);
            if !hit && parent != "." {
                hit = (1..=parent_dirs.len())
                    .any(|depth| pattern.matches(&parent_dirs[..depth].join("/")));
            }
            if hit {
                matched = !pattern.exclusion;
            }
        }
        matched
    }

    /// Whether an excluded directory still has to be descended because some
    /// `!` pattern names a path underneath it.
    pub fn may_include_under(&self, dir: &str) -> bool {
        let dir_slash = format!("{}/", dir);
        self.patterns
            .iter()
            .filter(|p| p.exclusion)
            .any(|p| format!("{}/", p.cleaned).starts_with(&dir_slash))
    }
}

/// Lexically clean a slash path: collapse separators, drop `.` segments and
/// resolve `..` against preceding segments. An empty result becomes `.`.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

fn compile(pattern: &str) -> Result<Regex, String> {
    let mut expr = String::from("(?s)^");
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                // `**/` behaves like `**`
                if chars.peek() == Some(&'/') {
                    chars.next();
                }
                if chars.peek().is_none() {
                    expr.push_str(".*");
                } else {
                    expr.push_str("(.*/)?");
                }
            }
            '*' => expr.push_str("[^/]*"),
            '?' => expr.push_str("[^/]"),
            '\\' => match chars.next() {
                Some(next) => expr.push_str(&regex::escape(&next.to_string())),
                None => return Err("trailing backslash".to_string()),
            },
            '.' | '+' | '(' | ')' | '|' | '{' | '}' | '$' => {
                expr.push('\\');
                expr.push(ch);
            }
            other => expr.push(other),
        }
    }
    expr.push('$');
    Regex::new(&expr).map_err(|e| e.to_string())
}
