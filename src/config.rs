//! Configuration System
//!
//! Layered configuration for the content store: built-in defaults, a user-level
//! file, site-level files and `CONTENT__*` environment overrides. The resolved
//! configuration is handed explicitly to the collection store and upload gateway.

use crate::assets::AssetLayout;
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Site root every relative storage path resolves against (defaults to current directory)
    pub site_root: Option<PathBuf>,

    /// Storage locations
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where collections and assets live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one `<kind>.json` per entity type
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Publicly served directory; asset references are relative to it
    #[serde(default = "default_public_root")]
    pub public_root: PathBuf,

    /// Asset directory under `public_root`; each kind gets `<asset_root>/<kind>`
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,

    /// Per-kind asset directory overrides, relative to `public_root`
    #[serde(default)]
    pub asset_dirs: HashMap<String, PathBuf>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("public/data")
}

fn default_public_root() -> PathBuf {
    PathBuf::from("public")
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("images")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            public_root: default_public_root(),
            asset_root: default_asset_root(),
            asset_dirs: HashMap::new(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Storage(String),
    AssetDir(String, String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Storage(msg) => write!(f, "Storage: {}", msg),
            ValidationError::AssetDir(kind, msg) => write!(f, "Asset dir '{}': {}", kind, msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.data_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Storage("Data dir cannot be empty".to_string()));
        }
        if self.public_root.as_os_str().is_empty() {
            errors.push(ValidationError::Storage(
                "Public root cannot be empty".to_string(),
            ));
        }
        if self.asset_root.is_absolute() || escapes(&self.asset_root) {
            errors.push(ValidationError::Storage(
                "Asset root must be a relative path inside the public root".to_string(),
            ));
        }

        for (kind, dir) in &self.asset_dirs {
            match kind.parse::<EntityKind>() {
                Ok(k) if !k.has_assets() => errors.push(ValidationError::AssetDir(
                    kind.clone(),
                    "entity type has no assets".to_string(),
                )),
                Ok(_) => {}
                Err(_) => errors.push(ValidationError::AssetDir(
                    kind.clone(),
                    "unknown entity type".to_string(),
                )),
            }
            if dir.is_absolute() || escapes(dir) {
                errors.push(ValidationError::AssetDir(
                    kind.clone(),
                    "must be a relative path inside the public root".to_string(),
                ));
            }
        }

        errors
    }
}

fn escapes(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
}

impl ContentConfig {
    /// Config rooted at `site_root` with every other setting at its default.
    pub fn for_site(site_root: impl Into<PathBuf>) -> Self {
        Self {
            site_root: Some(site_root.into()),
            ..Self::default()
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let errors = self.storage.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn site_root(&self) -> PathBuf {
        self.site_root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// Absolute (or site-relative when the site root is relative) data directory.
    pub fn data_dir(&self) -> PathBuf {
        resolve(&self.site_root(), &self.storage.data_dir)
    }

    pub fn public_root(&self) -> PathBuf {
        resolve(&self.site_root(), &self.storage.public_root)
    }

    /// Asset directory of `kind`, relative to the public root.
    pub fn asset_subdir(&self, kind: EntityKind) -> PathBuf {
        self.storage
            .asset_dirs
            .get(kind.as_str())
            .cloned()
            .unwrap_or_else(|| self.storage.asset_root.join(kind.as_str()))
    }

    /// Build the asset layout every asset-touching component shares.
    pub fn asset_layout(&self) -> AssetLayout {
        let dirs = EntityKind::ALL
            .into_iter()
            .filter(|k| k.has_assets())
            .map(|k| (k, self.asset_subdir(k)))
            .collect();
        AssetLayout::new(self.public_root(), dirs)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
