//! Persistence layer for collection files
//!
//! Collections are whole-file JSON documents. Writes go to a temporary file in
//! the same directory and are renamed into place, so readers see either the old
//! file or the new one, never a torn write.

use crate::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Read and parse a collection file.
///
/// Returns `Ok(None)` when the file does not exist. Unreadable or malformed
/// files are errors.
pub fn read_collection<C: DeserializeOwned>(
    path: &Path,
    collection: &str,
) -> Result<Option<C>, StorageError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to read collection from {:?}: {}", path, e),
            )))
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| StorageError::Malformed {
            collection: collection.to_string(),
            reason: e.to_string(),
        })
}

/// Serialize `value` with `indent` spaces per level.
pub fn to_pretty_json<C: Serialize>(value: &C, indent: usize) -> Result<Vec<u8>, StorageError> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    value.serialize(&mut serializer).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to serialize collection: {}", e),
        ))
    })?;
    Ok(out)
}

/// Replace the file at `path` with `value`, atomically.
pub fn write_collection_atomic<C: Serialize>(
    path: &Path,
    value: &C,
    indent: usize,
) -> Result<(), StorageError> {
    let parent = path
        .parent()
        .ok_or_else(|| StorageError::InvalidPath(format!("{:?} has no parent directory", path)))?;
    fs::create_dir_all(parent).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to create data directory {:?}: {}", parent, e),
        ))
    })?;

    let serialized = to_pretty_json(value, indent)?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.kind(),
            format!("Failed to create temp file in {:?}: {}", parent, e),
        ))
    })?;
    temp.write_all(&serialized)
        .and_then(|_| temp.as_file().sync_all())
        .map_err(|e| {
            StorageError::IoError(std::io::Error::new(
                e.kind(),
                format!("Failed to write collection to {:?}: {}", temp.path(), e),
            ))
        })?;

    // The temp file is removed on drop if persist fails
    temp.persist(path).map_err(|e| {
        StorageError::IoError(std::io::Error::new(
            e.error.kind(),
            format!("Failed to rename temp file to {:?}: {}", path, e.error),
        ))
    })?;

    Ok(())
}
