//! Image assets
//!
//! Each entity kind with images owns one directory under the public root.
//! Documents reference their images by public path (`/images/events/x.png`);
//! [`AssetLayout`] translates between those references and files on disk.

pub mod sync;
pub mod upload;

pub use sync::{sync_asset, AssetSyncOutcome, RenameMode};
pub use upload::{ImageMime, UploadGateway, UploadRequest};

use crate::error::{ApiError, ValidationReport};
use crate::identity::is_path_safe;
use crate::types::EntityKind;
use std::collections::HashMap;
use std::path::{Component, PathBuf};

/// Per-kind asset directories relative to one public root.
#[derive(Debug, Clone)]
pub struct AssetLayout {
    public_root: PathBuf,
    dirs: HashMap<EntityKind, PathBuf>,
}

/// An asset reference resolved to a file inside its kind's directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub path: PathBuf,
    pub file_name: String,
}

impl AssetLayout {
    pub fn new(public_root: impl Into<PathBuf>, dirs: HashMap<EntityKind, PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
            dirs,
        }
    }

    /// Filesystem directory for `kind`'s assets.
    pub fn dir(&self, kind: EntityKind) -> Result<PathBuf, ApiError> {
        self.dirs
            .get(&kind)
            .map(|rel| self.public_root.join(rel))
            .ok_or_else(|| {
                ApiError::Validation(ValidationReport::invalid(
                    "type",
                    format!("'{}' has no asset directory", kind),
                ))
            })
    }

    /// Public reference for `file_name` in `kind`'s directory.
    pub fn reference(&self, kind: EntityKind, file_name: &str) -> Option<String> {
        self.url_prefix(kind)
            .map(|prefix| format!("{}{}", prefix, file_name))
    }

    /// Resolve `reference` if it names a file directly inside `kind`'s directory.
    ///
    /// References elsewhere (other directories, external URLs, nested paths,
    /// anything with `..`) resolve to `None` and are left alone by callers.
    pub fn resolve(&self, kind: EntityKind, reference: &str) -> Option<ResolvedAsset> {
        let prefix = self.url_prefix(kind)?;
        let normalized = if reference.starts_with('/') {
            reference.to_string()
        } else {
            format!("/{}", reference)
        };
        let file_name = normalized.strip_prefix(&prefix)?;
        if !is_path_safe(file_name) {
            return None;
        }
        let dir = self.public_root.join(self.dirs.get(&kind)?);
        Some(ResolvedAsset {
            path: dir.join(file_name),
            file_name: file_name.to_string(),
        })
    }

    /// `/<dir>/` with forward slashes, e.g. `/images/events/`.
    fn url_prefix(&self, kind: EntityKind) -> Option<String> {
        let rel = self.dirs.get(&kind)?;
        let segments: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if segments.is_empty() {
            Some("/".to_string())
        } else {
            Some(format!("/{}/", segments.join("/")))
        }
    }
}
