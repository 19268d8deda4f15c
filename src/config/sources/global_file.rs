//! Global config file source: $XDG_CONFIG_HOME/context-hash/config.toml

use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

/// Path to global config file.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "context-hash").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add global config file source to builder if it exists.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    let Some(path) = global_config_path() else {
        return builder;
    };
    if !path.exists() {
        debug!(config_path = %path.display(), "No global configuration file");
        return builder;
    }
    let path = dunce::canonicalize(&path).unwrap_or(path);
    builder.add_source(File::from(path).required(false))
}
