use super::commit;
use crate::entities::{Paper, PaperKey, Record};
use crate::error::ApiError;
use crate::store::CollectionStore;
use crate::types::EntityKind;
use tracing::info;

const KIND: EntityKind = EntityKind::Papers;

/// Publications, newest first. Papers carry no assets.
pub struct PapersHandler<'a> {
    store: &'a CollectionStore,
}

impl<'a> PapersHandler<'a> {
    pub fn new(store: &'a CollectionStore) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Paper>, ApiError> {
        Ok(self.store.load(KIND)?)
    }

    /// Prepend `paper`. An exact duplicate of an existing key is a conflict.
    pub fn create(&self, paper: Paper) -> Result<PaperKey, ApiError> {
        paper.validate().map_err(ApiError::Validation)?;
        let key = paper.key();

        let mut tx = self.store.begin::<Vec<Paper>>(KIND)?;
        if tx.iter().any(|p| p.matches(&key)) {
            return Err(ApiError::conflict("paper", key.to_string()));
        }
        tx.insert(0, paper);
        commit(tx, 0)?;

        info!(paper = %key, "Created paper");
        Ok(key)
    }

    /// Replace the paper matching `key` exactly, returning its new key.
    pub fn update(&self, key: &PaperKey, paper: Paper) -> Result<PaperKey, ApiError> {
        paper.validate().map_err(ApiError::Validation)?;
        let new_key = paper.key();

        let mut tx = self.store.begin::<Vec<Paper>>(KIND)?;
        let index = position(&tx, key)?;
        if &new_key != key && tx.iter().any(|p| p.matches(&new_key)) {
            return Err(ApiError::conflict("paper", new_key.to_string()));
        }
        tx[index] = paper;
        commit(tx, 0)?;

        info!(from = %key, to = %new_key, "Updated paper");
        Ok(new_key)
    }

    pub fn delete(&self, key: &PaperKey) -> Result<(), ApiError> {
        let mut tx = self.store.begin::<Vec<Paper>>(KIND)?;
        let index = position(&tx, key)?;
        tx.remove(index);
        commit(tx, 0)?;

        info!(paper = %key, "Deleted paper");
        Ok(())
    }
}

fn position(papers: &[Paper], key: &PaperKey) -> Result<usize, ApiError> {
    papers
        .iter()
        .position(|p| p.matches(key))
        .ok_or_else(|| ApiError::not_found("paper", key.to_string()))
}
