//! Explicit config file source: `--config <FILE>`. The file must exist.

use config::builder::DefaultState;
use config::{ConfigBuilder, File};
use std::path::Path;

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).required(true))
}
