use super::{commit, requested_identity, sync_many};
use crate::assets::AssetLayout;
use crate::entities::{Event, Record};
use crate::error::{ApiError, ValidationReport};
use crate::store::CollectionStore;
use crate::types::EntityKind;
use std::cmp::Reverse;
use tracing::info;

const KIND: EntityKind = EntityKind::Events;

/// Events, newest first. Slugs are unique across the whole collection and a
/// taken slug is a conflict rather than being suffixed.
pub struct EventsHandler<'a> {
    store: &'a CollectionStore,
    layout: &'a AssetLayout,
}

impl<'a> EventsHandler<'a> {
    pub fn new(store: &'a CollectionStore, layout: &'a AssetLayout) -> Self {
        Self { store, layout }
    }

    pub fn list(&self) -> Result<Vec<Event>, ApiError> {
        Ok(self.store.load(KIND)?)
    }

    pub fn get(&self, slug: &str) -> Result<Event, ApiError> {
        self.list()?
            .into_iter()
            .find(|e| e.slug() == slug)
            .ok_or_else(|| ApiError::not_found("event", slug))
    }

    /// Add `event`, returning its slug.
    pub fn create(&self, mut event: Event) -> Result<String, ApiError> {
        event.validate().map_err(ApiError::Validation)?;
        let slug = requested_identity("slug", &event.slug, &event.name)?
            .ok_or_else(|| ApiError::Validation(ValidationReport::missing("name")))?;

        let mut tx = self.store.begin::<Vec<Event>>(KIND)?;
        if tx.iter().any(|e| e.slug() == slug) {
            return Err(ApiError::conflict("event", slug));
        }
        event.slug = Some(slug.clone());
        event.refresh_year();
        tx.push(event);
        sort_newest_first(&mut tx);
        commit(tx, 0)?;

        info!(slug = %slug, "Created event");
        Ok(slug)
    }

    /// Replace the event stored under `old_slug`.
    ///
    /// Without an explicit slug the event keeps its old one. A new slug renames
    /// every image to `<slug>-<millis><ext>`.
    pub fn update(&self, old_slug: &str, mut event: Event) -> Result<String, ApiError> {
        event.validate().map_err(ApiError::Validation)?;
        let slug = match requested_identity("slug", &event.slug, &None)? {
            Some(slug) => slug,
            None => old_slug.to_string(),
        };

        let mut tx = self.store.begin::<Vec<Event>>(KIND)?;
        let index = tx
            .iter()
            .position(|e| e.slug() == old_slug)
            .ok_or_else(|| ApiError::not_found("event", old_slug))?;
        if slug != old_slug && tx.iter().any(|e| e.slug() == slug) {
            return Err(ApiError::conflict("event", slug));
        }

        let moved = if slug != old_slug {
            sync_many(self.layout, KIND, &mut event.images, &slug)?
        } else {
            0
        };
        event.slug = Some(slug.clone());
        event.refresh_year();
        tx[index] = event;
        sort_newest_first(&mut tx);
        commit(tx, moved)?;

        info!(from = old_slug, to = %slug, images_renamed = moved, "Updated event");
        Ok(slug)
    }

    /// Remove an event. Its images stay on disk.
    pub fn delete(&self, slug: &str) -> Result<(), ApiError> {
        let mut tx = self.store.begin::<Vec<Event>>(KIND)?;
        let index = tx
            .iter()
            .position(|e| e.slug() == slug)
            .ok_or_else(|| ApiError::not_found("event", slug))?;
        tx.remove(index);
        commit(tx, 0)?;

        info!(slug, "Deleted event");
        Ok(())
    }
}

/// Descending start time; events without a parseable start sink to the end.
fn sort_newest_first(events: &mut [Event]) {
    events.sort_by_key(|e| Reverse(e.starts_at()));
}
