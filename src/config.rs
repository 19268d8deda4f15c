//! Configuration System
//!
//! Layered settings for the command-line tool: built-in defaults, the global
//! config file, an explicit `--config` file, then `CONTEXT_HASH__*`
//! environment variables. CLI flags are applied on top by the caller.

use crate::api::DEFAULT_DOCKERFILE;
use crate::logging::LoggingConfig;
use crate::pipe::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextHashConfig {
    /// Entry-point file name, relative to the context root
    #[serde(default = "default_dockerfile")]
    pub dockerfile: String,

    /// Chunks buffered between the normalizer and the digest
    #[serde(default = "default_pipe_capacity")]
    pub pipe_capacity: usize,

    /// Emit every archived path as an `info` event on the
    /// `context_hash::trace` target. The CLI enables that target at `info`
    /// unless `logging.modules` already sets it; `CONTEXT_HASH_LOG`
    /// replaces the whole filter.
    #[serde(default)]
    pub trace: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_dockerfile() -> String {
    DEFAULT_DOCKERFILE.to_string()
}

fn default_pipe_capacity() -> usize {
    DEFAULT_CAPACITY
}

impl Default for ContextHashConfig {
    fn default() -> Self {
        Self {
            dockerfile: default_dockerfile(),
            pipe_capacity: default_pipe_capacity(),
            trace: false,
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Field(&'static str, String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Field(name, msg) => write!(f, "{}: {}", name, msg),
            ValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ContextHashConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.dockerfile.trim().is_empty() {
            errors.push(ValidationError::Field(
                "dockerfile",
                "cannot be empty".to_string(),
            ));
        }
        if self.pipe_capacity == 0 {
            errors.push(ValidationError::Field(
                "pipe_capacity",
                "must be at least 1".to_string(),
            ));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
