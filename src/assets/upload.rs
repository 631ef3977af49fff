//! Upload Gateway
//!
//! Validates inbound images and stores them under the kind's asset directory.
//! Nothing is written unless every check passes.

use super::sync::extension_of;
use super::AssetLayout;
use crate::config::ContentConfig;
use crate::error::{ApiError, StorageError, ValidationReport};
use crate::identity::is_path_safe;
use crate::types::EntityKind;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;
use tracing::info;

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageMime::Jpeg),
            "image/png" => Some(ImageMime::Png),
            "image/webp" => Some(ImageMime::Webp),
            _ => None,
        }
    }

    /// Guess from a file extension, for callers that only have a path.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(ImageMime::Jpeg),
            "png" => Some(ImageMime::Png),
            "webp" => Some(ImageMime::Webp),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Webp => "image/webp",
        }
    }

    /// Extension used when the uploaded name has none.
    pub fn default_extension(&self) -> &'static str {
        match self {
            ImageMime::Jpeg => ".jpg",
            ImageMime::Png => ".png",
            ImageMime::Webp => ".webp",
        }
    }
}

/// One inbound file.
#[derive(Debug, Clone)]
pub struct UploadRequest<'a> {
    pub kind: EntityKind,
    pub bytes: &'a [u8],
    pub mime_type: &'a str,
    pub original_name: &'a str,
    pub identity_hint: Option<&'a str>,
}

/// Stores uploads under the configured asset directories.
#[derive(Debug, Clone)]
pub struct UploadGateway {
    layout: AssetLayout,
}

impl UploadGateway {
    pub fn new(layout: AssetLayout) -> Self {
        Self { layout }
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new(config.asset_layout())
    }

    /// Validate and write `request`, returning its public reference.
    ///
    /// With an identity hint the file is named `<hint><ext>` and replaces any
    /// previous upload for that identity; without one it is named
    /// `<original stem>-<millis><ext>`.
    pub fn store(&self, request: &UploadRequest<'_>) -> Result<String, ApiError> {
        let mut report = ValidationReport::new();

        let mime = ImageMime::from_mime(request.mime_type);
        if mime.is_none() {
            report.push_invalid(
                "mimeType",
                format!("'{}' is not one of JPEG, PNG, WebP", request.mime_type),
            );
        }

        let dir = match self.layout.dir(request.kind) {
            Ok(dir) => Some(dir),
            Err(_) => {
                report.push_invalid("type", format!("'{}' does not accept uploads", request.kind));
                None
            }
        };

        let base_name = base_name(request.original_name);
        if base_name.is_empty() {
            report.missing.push("originalName");
        }

        let hint = request.identity_hint.filter(|h| !h.trim().is_empty());
        if let Some(hint) = hint {
            if !is_path_safe(hint) {
                report.push_invalid("identityHint", "must be a single path segment");
            }
        }

        let (mime, dir) = match (mime, dir) {
            (Some(mime), Some(dir)) if report.is_empty() => (mime, dir),
            _ => return Err(ApiError::Validation(report)),
        };

        let mut ext = extension_of(base_name);
        if ext.is_empty() {
            ext = mime.default_extension().to_string();
        }
        let file_name = match hint {
            Some(hint) => format!("{}{}", hint, ext),
            None => {
                let stem = base_name.strip_suffix(ext.as_str()).unwrap_or(base_name);
                let stem = if stem.is_empty() { "upload" } else { stem };
                format!("{}-{}{}", stem, chrono::Utc::now().timestamp_millis(), ext)
            }
        };

        write_atomic(&dir, &file_name, request.bytes)?;

        let reference = self
            .layout
            .reference(request.kind, &file_name)
            .ok_or_else(|| StorageError::InvalidPath(format!("no asset directory for {}", request.kind)))?;
        info!(
            collection = %request.kind,
            reference = %reference,
            bytes = request.bytes.len(),
            "Stored upload"
        );
        Ok(reference)
    }
}

/// Last path segment of a client-supplied name, whichever separator it used.
fn base_name(original_name: &str) -> &str {
    original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name)
        .trim()
}

fn write_atomic(dir: &std::path::Path, file_name: &str, bytes: &[u8]) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to create asset directory {:?}: {}", dir, e),
        ))
    })?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    let target = dir.join(file_name);
    temp.persist(&target).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.error.kind(),
            format!("Failed to move upload into {:?}: {}", target, e.error),
        ))
    })?;
    Ok(())
}
