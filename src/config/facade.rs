//! Loading facade over the layered sources.

use super::merge::merge_policy;
use super::sources::{explicit_file, global_file};
use super::ContextHashConfig;
use config::ConfigError;
use std::path::Path;
use tracing::debug;

/// Loads [`ContextHashConfig`] from every source in precedence order.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, then environment.
    pub fn load() -> Result<ContextHashConfig, ConfigError> {
        Self::build(None)
    }

    /// Defaults, global file, `path`, then environment.
    pub fn load_from_file(path: &Path) -> Result<ContextHashConfig, ConfigError> {
        Self::build(Some(path))
    }

    fn build(explicit: Option<&Path>) -> Result<ContextHashConfig, ConfigError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder);
        if let Some(path) = explicit {
            debug!(config_path = %path.display(), "Loading explicit configuration file");
            builder = explicit_file::add_to_builder(builder, path);
        }
        builder = merge_policy::add_environment(builder);
        builder.build()?.try_deserialize()
    }
}
