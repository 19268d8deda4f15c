//! Context hashing API
//!
//! [`ContextHasher`] runs the whole pipeline for one call: validate the
//! inputs, resolve ignore rules, then stream the archive through the header
//! normalizer (on one scoped worker thread) into the digest on the calling
//! thread. Nothing is cached between calls.

use crate::archive::ArchiveStream;
use crate::digest;
use crate::error::ContextHashError;
use crate::ignore::pattern::clean_path;
use crate::ignore::{self, PatternMatcher};
use crate::normalize;
use crate::pipe::{self, DEFAULT_CAPACITY};
use crate::trace::{NoTrace, PathTrace};
use crate::validate;
use std::panic;
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{debug, info, instrument};

/// Default entry-point file name.
pub const DEFAULT_DOCKERFILE: &str = "Dockerfile";

const WORKER_NAME: &str = "context-normalizer";

/// Hash the build context at `root` with `dockerfile` as its entry point.
///
/// Shorthand for `ContextHasher::new(root, dockerfile).hash()` with no path
/// trace and the default pipe capacity.
pub fn hash_context(
    root: impl AsRef<Path>,
    dockerfile: &str,
) -> Result<String, ContextHashError> {
    ContextHasher::new(root.as_ref(), dockerfile).hash()
}

/// One configured hashing call.
pub struct ContextHasher<'a> {
    root: PathBuf,
    dockerfile: String,
    pipe_capacity: usize,
    trace: Box<dyn PathTrace + Send + 'a>,
}

impl<'a> ContextHasher<'a> {
    pub fn new(root: impl Into<PathBuf>, dockerfile: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            dockerfile: dockerfile.into(),
            pipe_capacity: DEFAULT_CAPACITY,
            trace: Box::new(NoTrace),
        }
    }

    /// Receive the name of every archived entry, in archive order.
    pub fn with_trace(mut self, trace: impl PathTrace + Send + 'a) -> Self {
        self.trace = Box::new(trace);
        self
    }

    /// Number of chunks buffered between the normalizer and the digest.
    pub fn with_pipe_capacity(mut self, capacity: usize) -> Self {
        self.pipe_capacity = capacity.max(1);
        self
    }

    /// Compute the digest of the context.
    ///
    /// # Panics
    ///
    /// Panics if the normalizer cannot finish its output for any reason other
    /// than the digest side having already stopped reading. That is an
    /// internal fault, not a property of the context.
    #[instrument(
        skip(self),
        fields(root = %self.root.display(), dockerfile = %self.dockerfile)
    )]
    pub fn hash(&mut self) -> Result<String, ContextHashError> {
        validate::ensure_directory(&self.root)?;
        let dockerfile = self.entry_point()?;
        validate::ensure_file(&self.root.join(&dockerfile))?;

        let root =
            dunce::canonicalize(&self.root).map_err(|_| ContextHashError::NotADirectory {
                path: self.root.clone(),
            })?;

        let mut excludes =
            ignore::read_dockerignore(&root).map_err(ContextHashError::ReadIgnore)?;
        ignore::validate_context_directory(&root, &excludes)
            .map_err(ContextHashError::ValidateContext)?;
        excludes.push(format!("!{}", dockerfile));

        let matcher = PatternMatcher::new(&excludes).map_err(ContextHashError::Patterns)?;
        debug!(patterns = matcher.patterns().len(), "Resolved ignore rules");
        let stream = ArchiveStream::new(&root, matcher);
        let (writer, reader) = pipe::pipe(self.pipe_capacity);
        let trace = self.trace.as_mut();

        let digest = thread::scope(|scope| {
            let worker = thread::Builder::new()
                .name(WORKER_NAME.to_string())
                .spawn_scoped(scope, move || {
                    normalize::rewrite_headers(stream, writer, trace)
                })
                .map_err(ContextHashError::Spawn)?;

            let digest = digest::digest_stream(reader);

            match worker.join() {
                Ok(Ok(())) => {}
                Ok(Err(fatal)) => fatal.escalate(),
                Err(payload) => panic::resume_unwind(payload),
            }
            digest
        })?;

        info!(digest = %digest, "Hashed build context");
        Ok(digest)
    }

    /// The entry point as a cleaned slash path under the root.
    ///
    /// A leading `/` is dropped, so an absolute name still refers to a file
    /// inside the context. Names that resolve to the root itself or climb
    /// out of it are rejected.
    fn entry_point(&self) -> Result<String, ContextHashError> {
        let cleaned = clean_path(&self.dockerfile);
        let relative = cleaned.trim_start_matches('/');
        let escapes = relative == ".." || relative.starts_with("../");
        if relative.is_empty() || relative == "." || escapes {
            return Err(ContextHashError::NotAFile {
                path: self.root.join(&self.dockerfile),
            });
        }
        Ok(relative.to_string())
    }
}
