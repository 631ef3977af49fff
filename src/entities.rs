//! Entity records
//!
//! One typed record per entity kind. Fields the record does not name are kept
//! in `extra` so a load/save cycle never drops data written by other tools,
//! and [`Shape`] keeps the JSON form of the fields it does name.
//! Required fields are optional in the type and checked by `validate`, which
//! reports every problem at once.

/// Route a record's serde impls through its [`Shape`]. The record derives with
/// `#[serde(remote = "Self")]` and carries a `#[serde(skip)] shape` field.
macro_rules! keep_shape {
    ($($record:ty),+ $(,)?) => {$(
        impl serde::Serialize for $record {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let value = <$record>::serialize(self, serde_json::value::Serializer)
                    .map_err(<S::Error as serde::ser::Error>::custom)?;
                serde::Serialize::serialize(&self.shape.restore(value), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $record {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let mut map: serde_json::Map<String, serde_json::Value> =
                    serde::Deserialize::deserialize(deserializer)?;
                let shape = $crate::entities::Shape::capture(&mut map);
                let mut record = <$record>::deserialize(serde_json::Value::Object(map))
                    .map_err(<D::Error as serde::de::Error>::custom)?;
                record.shape = shape;
                Ok(record)
            }
        }
    )+};
}

mod blog;
mod collaborator;
mod event;
mod paper;
mod person;
mod project;
mod shape;

pub use blog::{display_date, Blog};
pub use collaborator::Collaborator;
pub use event::{parse_timestamp, Event};
pub use paper::{Paper, PaperKey};
pub use person::{Education, Person};
pub use project::{Project, ProjectLink, ProjectPartner};
pub use shape::Shape;

use crate::error::ValidationReport;
use crate::types::EntityKind;
use std::collections::BTreeMap;

/// Category name -> documents. Identity is unique within each category.
pub type Categorized<T> = BTreeMap<String, Vec<T>>;

/// A stored document type.
pub trait Record {
    const KIND: EntityKind;

    /// Check required fields without touching storage.
    fn validate(&self) -> Result<(), ValidationReport>;
}

/// Trimmed, non-empty value of an optional text field.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
