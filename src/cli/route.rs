//! CLI route: resolve settings, then run one hashing call.

use super::parse::Cli;
use crate::api::ContextHasher;
use crate::config::{ConfigLoader, ContextHashConfig};
use crate::error::{ContextHashError, SetupError};
use crate::trace::{LogTrace, WriterTrace, TRACE_TARGET};
use anyhow::Context;
use std::io;
use tracing::debug;

/// Load configuration from all sources and apply CLI flags on top.
/// Precedence: CLI flags override environment override config files override defaults.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<ContextHashConfig> {
    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)
            .map_err(SetupError::from)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ConfigLoader::load().map_err(SetupError::from)?,
    };

    if let Some(ref file) = cli.file {
        config.dockerfile = file.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = format.clone();
    }

    if config.trace {
        config
            .logging
            .modules
            .entry(TRACE_TARGET.to_string())
            .or_insert_with(|| "info".to_string());
    }

    config.validate().map_err(|errors| {
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        SetupError::Invalid(messages.join("\n"))
    })?;

    Ok(config)
}

/// Hash the context named on the command line.
///
/// `--debug` writes the path listing to stderr; the `trace` setting sends it
/// to the log instead.
pub fn execute(cli: &Cli, config: &ContextHashConfig) -> Result<String, ContextHashError> {
    debug!(dir = %cli.dir.display(), dockerfile = %config.dockerfile, "Hashing context");
    let hasher = ContextHasher::new(&cli.dir, config.dockerfile.as_str())
        .with_pipe_capacity(config.pipe_capacity);

    let mut hasher = if cli.debug {
        hasher.with_trace(WriterTrace::new(io::stderr()))
    } else if config.trace {
        hasher.with_trace(LogTrace)
    } else {
        hasher
    };
    hasher.hash()
}
