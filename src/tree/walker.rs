//! Filesystem walker for traversing a build context

use crate::ignore::PatternMatcher;
use crate::tree::path;
use std::fs::{FileType, Metadata};
use std::path::{Path, PathBuf};
use tracing::trace;
use walkdir::{DirEntry, WalkDir};

/// One entry the ignore rules leave in the context.
#[derive(Debug)]
pub struct ContextEntry {
    entry: DirEntry,
    relative: String,
}

impl ContextEntry {
    /// Absolute (or root-joined) filesystem path.
    pub fn path(&self) -> &Path {
        self.entry.path()
    }

    /// Slash-separated path relative to the context root.
    pub fn relative(&self) -> &str {
        &self.relative
    }

    /// Type of the entry itself; symlinks are not followed.
    pub fn file_type(&self) -> FileType {
        self.entry.file_type()
    }

    pub fn metadata(&self) -> Result<Metadata, walkdir::Error> {
        self.entry.metadata()
    }
}

/// Depth-first walk over a context root, applying ignore patterns.
///
/// Children of each directory are visited in byte-wise file name order, so
/// the sequence is fixed for a given tree. The root itself is not yielded.
/// Excluded directories are pruned unless a `!` pattern names something
/// below them, in which case the walk descends without yielding the
/// directory.
pub struct ContextWalker {
    root: PathBuf,
    matcher: PatternMatcher,
    inner: walkdir::IntoIter,
}

impl ContextWalker {
    pub fn new(root: &Path, matcher: PatternMatcher) -> Self {
        let inner = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Self {
            root: root.to_path_buf(),
            matcher,
            inner,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for ContextWalker {
    type Item = Result<ContextEntry, walkdir::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };
            if entry.depth() == 0 {
                continue;
            }
            let relative = path::relative_slash(&self.root, entry.path());
            if self.matcher.matches_or_parent_matches(&relative) {
                if entry.file_type().is_dir() && !self.matcher.may_include_under(&relative) {
                    self.inner.skip_current_dir();
                }
                trace!(path = %relative, "Excluded by ignore rules");
                continue;
            }
            return Some(Ok(ContextEntry { entry, relative }));
        }
    }
}
