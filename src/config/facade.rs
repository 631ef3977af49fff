//! Config loading facade: assembles sources in precedence order.

use super::merge::merge_policy;
use super::sources::{global_file, site_file};
use super::ContentConfig;
use config::{ConfigError, Environment, File};
use std::path::{Path, PathBuf};

/// Loads `ContentConfig` from defaults, files and environment.
#[derive(Debug, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for the site at `site_root`.
    ///
    /// Precedence (lowest to highest): defaults, user config, site config,
    /// site env-specific config, `CONTENT__*` environment variables.
    /// `site_root` fills in when no source sets one.
    pub fn load(site_root: &Path) -> Result<ContentConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = site_file::add_to_builder(builder, site_root)?;
        let builder = builder.add_source(
            Environment::with_prefix("CONTENT")
                .prefix_separator("__")
                .separator("__"),
        );

        let mut config: ContentConfig = builder.build()?.try_deserialize()?;
        if config.site_root.is_none() {
            config.site_root = Some(site_root.to_path_buf());
        }
        Ok(config)
    }

    /// Load configuration from a single file, skipping every other source.
    pub fn load_from_file(path: &Path) -> Result<ContentConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()
    }

    /// Location of the user-level config file, if a home directory is known.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
