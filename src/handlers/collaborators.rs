use super::{commit, requested_identity, scope, sync_single};
use crate::assets::AssetLayout;
use crate::entities::{Collaborator, Record};
use crate::error::{ApiError, ValidationReport};
use crate::identity::unique_in;
use crate::store::CollectionStore;
use crate::types::EntityKind;
use tracing::info;

const KIND: EntityKind = EntityKind::Collaborators;

/// Collaborators, kept in alphabetical order by name.
pub struct CollaboratorsHandler<'a> {
    store: &'a CollectionStore,
    layout: &'a AssetLayout,
}

impl<'a> CollaboratorsHandler<'a> {
    pub fn new(store: &'a CollectionStore, layout: &'a AssetLayout) -> Self {
        Self { store, layout }
    }

    pub fn list(&self) -> Result<Vec<Collaborator>, ApiError> {
        Ok(self.store.load(KIND)?)
    }

    pub fn get(&self, id: &str) -> Result<Collaborator, ApiError> {
        self.list()?
            .into_iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| ApiError::not_found("collaborator", id))
    }

    pub fn create(&self, mut collaborator: Collaborator) -> Result<String, ApiError> {
        collaborator.validate().map_err(ApiError::Validation)?;
        let requested = requested_identity("id", &collaborator.id, &collaborator.name)?
            .ok_or_else(|| ApiError::Validation(ValidationReport::missing("name")))?;

        let mut tx = self.store.begin::<Vec<Collaborator>>(KIND)?;
        let id = unique_in(tx.iter().map(Collaborator::id), &requested);
        collaborator.id = Some(id.clone());
        tx.push(collaborator);
        tx.sort_by(Collaborator::cmp_by_name);
        commit(tx, 0)?;

        info!(id = %id, "Created collaborator");
        Ok(id)
    }

    /// Replace the collaborator stored under `old_id`; the logo follows a new id.
    pub fn update(&self, old_id: &str, mut collaborator: Collaborator) -> Result<String, ApiError> {
        collaborator.validate().map_err(ApiError::Validation)?;
        let requested = requested_identity("id", &collaborator.id, &None)?
            .unwrap_or_else(|| old_id.to_string());

        let mut tx = self.store.begin::<Vec<Collaborator>>(KIND)?;
        let index = tx
            .iter()
            .position(|c| c.id() == old_id)
            .ok_or_else(|| ApiError::not_found("collaborator", old_id))?;
        let id = if requested == old_id {
            requested
        } else {
            unique_in(scope(tx.as_slice(), Some(index), Collaborator::id), &requested)
        };

        let moved = if id != old_id {
            sync_single(self.layout, KIND, &mut collaborator.logo, &id)?
        } else {
            0
        };
        collaborator.id = Some(id.clone());
        tx[index] = collaborator;
        tx.sort_by(Collaborator::cmp_by_name);
        commit(tx, moved)?;

        info!(from = old_id, to = %id, "Updated collaborator");
        Ok(id)
    }

    pub fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut tx = self.store.begin::<Vec<Collaborator>>(KIND)?;
        let index = tx
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| ApiError::not_found("collaborator", id))?;
        tx.remove(index);
        commit(tx, 0)?;

        info!(id, "Deleted collaborator");
        Ok(())
    }
}
