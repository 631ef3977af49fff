use super::{commit, requested_identity, scope, sync_single};
use crate::assets::AssetLayout;
use crate::entities::{Project, Record};
use crate::error::{ApiError, ValidationReport};
use crate::identity::unique_in;
use crate::store::CollectionStore;
use crate::types::EntityKind;
use tracing::info;

const KIND: EntityKind = EntityKind::Projects;

pub struct ProjectsHandler<'a> {
    store: &'a CollectionStore,
    layout: &'a AssetLayout,
}

impl<'a> ProjectsHandler<'a> {
    pub fn new(store: &'a CollectionStore, layout: &'a AssetLayout) -> Self {
        Self { store, layout }
    }

    pub fn list(&self) -> Result<Vec<Project>, ApiError> {
        Ok(self.store.load(KIND)?)
    }

    pub fn get(&self, id: &str) -> Result<Project, ApiError> {
        self.list()?
            .into_iter()
            .find(|p| p.id() == id)
            .ok_or_else(|| ApiError::not_found("project", id))
    }

    /// Append `project`, deriving its id from the title when absent.
    pub fn create(&self, mut project: Project) -> Result<String, ApiError> {
        project.validate().map_err(ApiError::Validation)?;
        let requested = requested_identity("id", &project.id, &project.title)?
            .ok_or_else(|| ApiError::Validation(ValidationReport::missing("title")))?;

        let mut tx = self.store.begin::<Vec<Project>>(KIND)?;
        let id = unique_in(tx.iter().map(Project::id), &requested);
        project.id = Some(id.clone());
        tx.push(project);
        commit(tx, 0)?;

        info!(id = %id, "Created project");
        Ok(id)
    }

    /// Replace the project stored under `old_id`. The image follows a new id.
    pub fn update(&self, old_id: &str, mut project: Project) -> Result<String, ApiError> {
        project.validate().map_err(ApiError::Validation)?;
        let requested = requested_identity("id", &project.id, &None)?
            .unwrap_or_else(|| old_id.to_string());

        let mut tx = self.store.begin::<Vec<Project>>(KIND)?;
        let index = tx
            .iter()
            .position(|p| p.id() == old_id)
            .ok_or_else(|| ApiError::not_found("project", old_id))?;
        let id = if requested == old_id {
            requested
        } else {
            unique_in(scope(tx.as_slice(), Some(index), Project::id), &requested)
        };

        let moved = if id != old_id {
            sync_single(self.layout, KIND, &mut project.image, &id)?
        } else {
            0
        };
        project.id = Some(id.clone());
        tx[index] = project;
        commit(tx, moved)?;

        info!(from = old_id, to = %id, "Updated project");
        Ok(id)
    }

    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut tx = self.store.begin::<Vec<Project>>(KIND)?;
        let index = tx
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| ApiError::not_found("project", id))?;
        tx.remove(index);
        commit(tx, 0)?;

        info!(id, "Deleted project");
        Ok(())
    }
}
