//! Content API
//!
//! Single entry point over one site: the collection store, the asset layout
//! and the upload gateway, with per-kind handlers borrowed from it. Share one
//! `ContentApi` (e.g. behind an `Arc`) between every caller that writes to the
//! same site so they also share its collection locks.

use crate::assets::{AssetLayout, UploadGateway, UploadRequest};
use crate::config::ContentConfig;
use crate::entities::{Blog, Categorized, Collaborator, Event, Person, Project};
use crate::error::{ApiError, StorageError};
use crate::handlers::{
    BlogsHandler, CollaboratorsHandler, EventsHandler, PapersHandler, PeopleHandler,
    ProjectsHandler,
};
use crate::store::CollectionStore;
use crate::types::EntityKind;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;
use walkdir::WalkDir;

/// Content API service
pub struct ContentApi {
    store: CollectionStore,
    layout: AssetLayout,
    uploads: UploadGateway,
}

impl ContentApi {
    /// Build from configuration, rejecting an invalid one.
    pub fn new(config: &ContentConfig) -> Result<Self, ApiError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(messages.join("; "))
        })?;
        Ok(Self::with_parts(
            CollectionStore::from_config(config),
            config.asset_layout(),
        ))
    }

    pub fn with_parts(store: CollectionStore, layout: AssetLayout) -> Self {
        let uploads = UploadGateway::new(layout.clone());
        Self {
            store,
            layout,
            uploads,
        }
    }

    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    pub fn people(&self) -> PeopleHandler<'_> {
        PeopleHandler::new(&self.store, &self.layout)
    }

    pub fn events(&self) -> EventsHandler<'_> {
        EventsHandler::new(&self.store, &self.layout)
    }

    pub fn projects(&self) -> ProjectsHandler<'_> {
        ProjectsHandler::new(&self.store, &self.layout)
    }

    pub fn collaborators(&self) -> CollaboratorsHandler<'_> {
        CollaboratorsHandler::new(&self.store, &self.layout)
    }

    pub fn papers(&self) -> PapersHandler<'_> {
        PapersHandler::new(&self.store)
    }

    pub fn blogs(&self) -> BlogsHandler<'_> {
        BlogsHandler::new(&self.store, &self.layout)
    }

    /// Store an uploaded image, returning its public reference.
    pub fn upload(&self, request: &UploadRequest<'_>) -> Result<String, ApiError> {
        self.uploads.store(request)
    }

    /// Whole collection of `kind` as JSON, whatever its shape.
    pub fn list_json(&self, kind: EntityKind) -> Result<Value, ApiError> {
        Ok(self.store.load::<Value>(kind).map(|v| match v {
            Value::Null => empty_collection(kind),
            other => other,
        })?)
    }

    /// Files in `kind`'s asset directory that no document references.
    ///
    /// Deletes never remove assets, so this is how leftovers are found. The
    /// result is sorted and nothing is removed.
    pub fn orphaned_assets(&self, kind: EntityKind) -> Result<Vec<String>, ApiError> {
        let dir = self.layout.dir(kind)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let referenced = self.referenced_assets(kind)?;

        let mut orphans = Vec::new();
        for entry in WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                StorageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("Failed to scan {:?}: {}", dir, e),
                ))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            let Some(reference) = self.layout.reference(kind, &name) else {
                continue;
            };
            if !referenced.contains(&reference) {
                orphans.push(reference);
            }
        }
        orphans.sort();
        debug!(collection = %kind, orphans = orphans.len(), "Scanned asset directory");
        Ok(orphans)
    }

    /// Every in-directory reference held by `kind`'s documents, normalized to
    /// the layout's canonical form.
    fn referenced_assets(&self, kind: EntityKind) -> Result<BTreeSet<String>, ApiError> {
        let raw: Vec<String> = match kind {
            EntityKind::People => self
                .store
                .load::<Categorized<Person>>(kind)?
                .into_values()
                .flatten()
                .filter_map(|p| p.image_url)
                .collect(),
            EntityKind::Events => self
                .store
                .load::<Vec<Event>>(kind)?
                .into_iter()
                .flat_map(|e| e.images)
                .collect(),
            EntityKind::Projects => self
                .store
                .load::<Vec<Project>>(kind)?
                .into_iter()
                .flat_map(|p| {
                    p.image
                        .into_iter()
                        .chain(p.collaborators.into_iter().filter_map(|c| c.logo))
                })
                .collect(),
            EntityKind::Collaborators => self
                .store
                .load::<Vec<Collaborator>>(kind)?
                .into_iter()
                .filter_map(|c| c.logo)
                .collect(),
            EntityKind::Blogs => self
                .store
                .load::<Vec<Blog>>(kind)?
                .into_iter()
                .filter_map(|b| b.cover_image)
                .collect(),
            EntityKind::Papers => Vec::new(),
        };

        Ok(raw
            .iter()
            .filter_map(|r| self.layout.resolve(kind, r))
            .filter_map(|asset| self.layout.reference(kind, &asset.file_name))
            .collect())
    }
}

fn empty_collection(kind: EntityKind) -> Value {
    match kind {
        EntityKind::People => Value::Object(Default::default()),
        _ => Value::Array(Vec::new()),
    }
}
