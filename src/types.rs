//! Shared identifiers for the content store.

use crate::error::{ApiError, ValidationReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The entity types the store manages. Each has exactly one collection file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    People,
    Events,
    Projects,
    Papers,
    Blogs,
    Collaborators,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::People,
        EntityKind::Events,
        EntityKind::Projects,
        EntityKind::Papers,
        EntityKind::Blogs,
        EntityKind::Collaborators,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::People => "people",
            EntityKind::Events => "events",
            EntityKind::Projects => "projects",
            EntityKind::Papers => "papers",
            EntityKind::Blogs => "blogs",
            EntityKind::Collaborators => "collaborators",
        }
    }

    /// Backing file name inside the data directory.
    pub fn collection_file(&self) -> String {
        format!("{}.json", self.as_str())
    }

    /// Whether documents of this kind carry image assets.
    pub fn has_assets(&self) -> bool {
        !matches!(self, EntityKind::Papers)
    }

    /// Indent width of the existing collection files.
    pub fn indent_width(&self) -> usize {
        match self {
            EntityKind::People | EntityKind::Events => 4,
            _ => 2,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                ApiError::Validation(ValidationReport::invalid(
                    "type",
                    format!("unknown entity type '{}'", s),
                ))
            })
    }
}
