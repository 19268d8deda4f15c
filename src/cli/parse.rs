//! CLI parse: clap types for context-hash. No behavior; definitions only.

use clap::Parser;
use std::path::PathBuf;

/// Compute a deterministic hash of a Docker build context
#[derive(Debug, Parser)]
#[command(name = "context-hash", version)]
#[command(about = "Compute a deterministic hash of a Docker build context")]
pub struct Cli {
    /// Build context directory
    pub dir: PathBuf,

    /// Name of the Dockerfile, relative to the context directory [default: Dockerfile]
    #[arg(short = 'f', long = "file", value_name = "NAME")]
    pub file: Option<String>,

    /// List every file included in the context on stderr
    #[arg(short, long)]
    pub debug: bool,

    /// Configuration file path (layered over the global config)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,
}
