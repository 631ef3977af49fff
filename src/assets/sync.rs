//! Asset Synchronizer
//!
//! Keeps an asset's file name in step with its document's identity. Runs only
//! when an update changes the identity. A reference whose source file is gone
//! is reported as [`AssetSyncOutcome::SourceMissing`] and logged; it is never
//! an error because a metadata update must not fail on a stale image.

use super::AssetLayout;
use crate::error::StorageError;
use crate::types::EntityKind;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// How the new file name is derived from the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameMode {
    /// `<identity><ext>`; a timestamp is appended only on collision.
    Single,
    /// `<identity>-<millis><ext>` always, for documents with several images.
    Timestamped,
}

/// Result of one synchronization attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSyncOutcome {
    /// Nothing to do: name already matches, or the reference lies outside the kind's directory.
    Unchanged,
    /// File moved; `to` is the reference the document should now hold.
    Renamed { from: String, to: String },
    /// The referenced file does not exist. The reference is left as-is.
    SourceMissing { reference: String },
}

/// Move the file behind `reference` so its name tracks `new_identity`.
///
/// The move is a single `rename`; it never copies. An existing file at the
/// proposed name is never overwritten.
pub fn sync_asset(
    layout: &AssetLayout,
    kind: EntityKind,
    reference: &str,
    new_identity: &str,
    mode: RenameMode,
) -> Result<AssetSyncOutcome, StorageError> {
    let Some(source) = layout.resolve(kind, reference) else {
        return Ok(AssetSyncOutcome::Unchanged);
    };

    let ext = extension_of(&source.file_name);
    let stamp = chrono::Utc::now().timestamp_millis();
    let proposed = match mode {
        RenameMode::Single => format!("{}{}", new_identity, ext),
        RenameMode::Timestamped => format!("{}-{}{}", new_identity, stamp, ext),
    };

    if proposed == source.file_name {
        return Ok(AssetSyncOutcome::Unchanged);
    }

    if !source.path.exists() {
        warn!(
            collection = %kind,
            reference,
            identity = new_identity,
            "Asset source missing, leaving reference unchanged"
        );
        return Ok(AssetSyncOutcome::SourceMissing {
            reference: reference.to_string(),
        });
    }

    let dir = source
        .path
        .parent()
        .ok_or_else(|| StorageError::InvalidPath(format!("{:?} has no parent", source.path)))?;
    let target_name = free_name(dir, &proposed, new_identity, stamp, &ext);
    let target = dir.join(&target_name);

    fs::rename(&source.path, &target).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to rename {:?} to {:?}: {}", source.path, target, e),
        ))
    })?;

    let to = layout
        .reference(kind, &target_name)
        .ok_or_else(|| StorageError::InvalidPath(format!("no asset directory for {}", kind)))?;
    info!(collection = %kind, from = reference, to = %to, "Renamed asset");

    Ok(AssetSyncOutcome::Renamed {
        from: reference.to_string(),
        to,
    })
}

/// `proposed` if free, else `<identity>-<stamp><ext>`, else `<identity>-<stamp>-<n><ext>`.
fn free_name(dir: &Path, proposed: &str, identity: &str, stamp: i64, ext: &str) -> String {
    if !dir.join(proposed).exists() {
        return proposed.to_string();
    }
    let stamped = format!("{}-{}{}", identity, stamp, ext);
    if !dir.join(&stamped).exists() {
        return stamped;
    }
    (1u32..)
        .map(|n| format!("{}-{}-{}{}", identity, stamp, n, ext))
        .find(|candidate| !dir.join(candidate).exists())
        .unwrap_or(stamped)
}

/// `.png` for `foo.png`, empty when there is no extension.
pub(crate) fn extension_of(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
