//! Error types for the content store.

use std::fmt;
use thiserror::Error;

/// Storage-related errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Collection '{collection}' is malformed: {reason}")]
    Malformed { collection: String, reason: String },

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Storage I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Structured result of validating an inbound document.
///
/// Names every missing or invalid field instead of stopping at the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub missing: Vec<&'static str>,
    pub invalid: Vec<(&'static str, String)>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(field: &'static str) -> Self {
        Self {
            missing: vec![field],
            invalid: Vec::new(),
        }
    }

    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            missing: Vec::new(),
            invalid: vec![(field, reason.into())],
        }
    }

    /// Record `field` as missing when `value` is absent or blank.
    pub fn require(&mut self, field: &'static str, value: Option<&str>) {
        if value.map_or(true, |v| v.trim().is_empty()) {
            self.missing.push(field);
        }
    }

    pub fn push_invalid(&mut self, field: &'static str, reason: impl Into<String>) {
        self.invalid.push((field, reason.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }

    /// `Ok(())` when nothing was recorded, otherwise the report as an `ApiError`.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self))
        }
    }

    /// Names of every field that failed, missing first.
    pub fn fields(&self) -> Vec<&'static str> {
        self.missing
            .iter()
            .copied()
            .chain(self.invalid.iter().map(|(field, _)| *field))
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing {}", self.missing.join(", ")));
        }
        for (field, reason) in &self.invalid {
            parts.push(format!("invalid {}: {}", field, reason));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Coarse classification callers use to map failures onto responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Io,
    Config,
}

/// Errors surfaced by entity operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("{what} not found: {key}")]
    NotFound { what: &'static str, key: String },

    #[error("{what} already exists: {key}")]
    Conflict { what: &'static str, key: String },

    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Renamed {moved} asset(s) but failed to save the collection: {source}")]
    SaveAfterAssetSync {
        moved: usize,
        #[source]
        source: StorageError,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ApiError {
    pub fn not_found(what: &'static str, key: impl Into<String>) -> Self {
        ApiError::NotFound {
            what,
            key: key.into(),
        }
    }

    pub fn conflict(what: &'static str, key: impl Into<String>) -> Self {
        ApiError::Conflict {
            what,
            key: key.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
            ApiError::Conflict { .. } => ErrorKind::Conflict,
            ApiError::StorageError(_) | ApiError::SaveAfterAssetSync { .. } => ErrorKind::Io,
            ApiError::ConfigError(_) => ErrorKind::Config,
        }
    }

    /// Message safe to hand to a client. Storage failures never carry paths.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::StorageError(_) => "Storage failure".to_string(),
            ApiError::SaveAfterAssetSync { .. } => {
                "Storage failure: assets were renamed but the collection was not saved".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
