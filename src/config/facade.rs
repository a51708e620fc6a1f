//! Config loading entry points.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::LineageConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

/// Configuration loader
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence, lowest first: built-in defaults, the global file, the
    /// workspace `config/config.toml`, `config/{ASSET_LINEAGE_ENV}.toml`,
    /// then `ASSET_LINEAGE__*` environment variables.
    pub fn load(workspace_root: &Path) -> Result<LineageConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load configuration from a single explicit file, over the defaults.
    pub fn load_from_file(path: &Path) -> Result<LineageConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()
    }

    /// Defaults only, no files or environment.
    pub fn defaults() -> Result<LineageConfig, ConfigError> {
        merge_policy::builder_with_defaults()?.build()?.try_deserialize()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
