use super::{present, Record, Shape};
use crate::error::ValidationReport;
use crate::types::EntityKind;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

keep_shape!(Paper);

/// A publication. Papers have no slug; they are addressed by [`PaperKey`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(remote = "Self", rename_all = "camelCase")]
pub struct Paper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub authors: Vec<String>,
    #[serde(default, deserialize_with = "text_or_number", skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    #[serde(skip)]
    pub shape: Shape,
}

/// Composite identity of a paper. Matching is exact: every field, and the
/// author list in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaperKey {
    pub title: String,
    pub year: String,
    pub authors: Vec<String>,
}

impl PaperKey {
    pub fn new(title: &str, year: &str, authors: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            year: year.to_string(),
            authors: authors.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for PaperKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({}) by {}", self.title, self.year, self.authors.join(", "))
    }
}

impl Paper {
    pub fn key(&self) -> PaperKey {
        PaperKey {
            title: self.title.clone().unwrap_or_default(),
            year: self.year.clone().unwrap_or_default(),
            authors: self.authors.clone(),
        }
    }

    pub fn matches(&self, key: &PaperKey) -> bool {
        self.title.as_deref() == Some(key.title.as_str())
            && self.year.as_deref() == Some(key.year.as_str())
            && self.authors == key.authors
    }
}

impl Record for Paper {
    const KIND: EntityKind = EntityKind::Papers;

    fn validate(&self) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::new();
        report.require("title", present(&self.title));
        if self.authors.iter().all(|a| a.trim().is_empty()) {
            report.missing.push("authors");
        }
        report.require("year", present(&self.year));
        report.require("venue", present(&self.venue));
        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

/// Accept either `"A. Author"` or `["A. Author", ...]`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(author)) => vec![author],
        Some(OneOrMany::Many(authors)) => authors,
    })
}

/// Years arrive as strings from forms and as numbers from hand-edited files.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
