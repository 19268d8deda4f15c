//! Error types for the context hashing pipeline.
//!
//! Recoverable failures (bad input, bad ignore rules, archival I/O, a broken
//! pipeline stage) are values of [`ContextHashError`]. A failure that can only
//! mean the pipeline itself is wired wrong is a [`FatalError`], which has no
//! conversion into `ContextHashError` and is escalated instead of returned.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by a hashing call.
#[derive(Debug, Error)]
pub enum ContextHashError {
    #[error("{path:?} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("{path:?} is not a file")]
    NotAFile { path: PathBuf },

    #[error("failed to read dockerignore: {0}")]
    ReadIgnore(#[source] IgnoreError),

    #[error("failed to validate context directory: {0}")]
    ValidateContext(#[source] IgnoreError),

    #[error("failed to create tar: {0}")]
    Patterns(#[source] IgnoreError),

    #[error("failed to create tar: {0}")]
    Archive(#[source] ArchiveError),

    #[error("failed to start normalizer: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to normalize context tar: {0}")]
    Pipeline(#[source] ClosedWithError),

    #[error("failed to generate hash from context tar: {0}")]
    Digest(#[source] io::Error),
}

impl ContextHashError {
    /// Classify a read error coming out of the hashing pipe.
    ///
    /// A pipe closed with an archival failure maps back to `Archive`; any other
    /// closed-with-error pipe is a `Pipeline` error; everything else is a plain
    /// read failure of the digest stage.
    pub fn from_stream(err: io::Error) -> Self {
        match downcast_io::<ClosedWithError>(err) {
            Err(err) => ContextHashError::Digest(err),
            Ok(closed) => match downcast_io::<ArchiveError>(closed.cause) {
                Ok(archive) => ContextHashError::Archive(archive),
                Err(cause) => ContextHashError::Pipeline(ClosedWithError { cause }),
            },
        }
    }
}

/// Ignore-file and pattern errors
#[derive(Debug, Error)]
pub enum IgnoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("illegal exclusion pattern: {0:?}")]
    IllegalExclusion(String),

    #[error("syntax error in pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },

    #[error("can't stat '{}'", .0.display())]
    CannotStat(PathBuf),

    #[error("can't access '{}': {source}", .path.display())]
    CannotAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("file ('{}') not found or excluded by .dockerignore", .0.display())]
    NotFound(PathBuf),

    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// An I/O failure while producing the archive, tagged with the offending path.
#[derive(Debug, Error)]
#[error("failed to archive {}: {source}", .path.display())]
pub struct ArchiveError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl ArchiveError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

impl From<ArchiveError> for io::Error {
    fn from(err: ArchiveError) -> Self {
        io::Error::new(err.source.kind(), err)
    }
}

impl From<walkdir::Error> for ArchiveError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        ArchiveError::new(path, err.into())
    }
}

/// The cause a writer closed the pipe with, as seen by the reader.
#[derive(Debug, Error)]
#[error("pipe closed with error: {cause}")]
pub struct ClosedWithError {
    #[source]
    pub cause: io::Error,
}

/// Unrecoverable internal failure: a resource could not be closed for a reason
/// other than the reader having already gone away.
#[derive(Debug, Error)]
#[error("{context}: {source}")]
pub struct FatalError {
    pub context: &'static str,
    #[source]
    pub source: io::Error,
}

impl FatalError {
    pub fn new(context: &'static str, source: io::Error) -> Self {
        Self { context, source }
    }

    /// Abort the current call by panicking with this error.
    pub fn escalate(self) -> ! {
        panic!("fatal internal error: {}", self)
    }
}

/// Configuration and logging setup errors (binary side).
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration:\n{0}")]
    Invalid(String),

    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<config::ConfigError> for SetupError {
    fn from(err: config::ConfigError) -> Self {
        SetupError::Config(err.to_string())
    }
}

/// Take the typed error out of an `io::Error`, or give the `io::Error` back.
fn downcast_io<T>(err: io::Error) -> Result<T, io::Error>
where
    T: std::error::Error + Send + Sync + 'static,
{
    if !err.get_ref().is_some_and(|inner| inner.is::<T>()) {
        return Err(err);
    }
    let kind = err.kind();
    match err.into_inner().map(|inner| inner.downcast::<T>()) {
        Some(Ok(inner)) => Ok(*inner),
        Some(Err(inner)) => Err(io::Error::new(kind, inner)),
        None => Err(io::Error::from(kind)),
    }
}
