use super::{present, Record, Shape};
use crate::error::ValidationReport;
use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;

keep_shape!(Collaborator);

/// Partner institution or company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Collaborator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub shape: Shape,
}

impl Collaborator {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    /// Alphabetical by name, case-insensitive, ties broken by exact name.
    pub fn cmp_by_name(&self, other: &Self) -> Ordering {
        let a = self.name.as_deref().unwrap_or_default();
        let b = other.name.as_deref().unwrap_or_default();
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    }
}

impl Record for Collaborator {
    const KIND: EntityKind = EntityKind::Collaborators;

    fn validate(&self) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();
        report.require("name", present(&self.name));
        report.require("category", present(&self.category));
        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}
