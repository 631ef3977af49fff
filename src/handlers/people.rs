use super::{commit, requested_identity, scope, sync_single};
use crate::assets::AssetLayout;
use crate::entities::{present, Categorized, Person, Record};
use crate::error::{ApiError, ValidationReport};
use crate::identity::unique_in;
use crate::store::CollectionStore;
use crate::types::EntityKind;
use tracing::{debug, info};

const KIND: EntityKind = EntityKind::People;

/// An edit to an existing person, possibly moving them to another category.
#[derive(Debug, Clone)]
pub struct PersonUpdate {
    /// Slug the person is stored under now.
    pub old_slug: String,
    /// Category the person is stored under now. Defaults to `category`.
    pub old_category: Option<String>,
    /// Destination category.
    pub category: String,
    pub person: Person,
}

/// People grouped by category. Slugs are unique within a category.
pub struct PeopleHandler<'a> {
    store: &'a CollectionStore,
    layout: &'a AssetLayout,
}

impl<'a> PeopleHandler<'a> {
    pub fn new(store: &'a CollectionStore, layout: &'a AssetLayout) -> Self {
        Self { store, layout }
    }

    pub fn list(&self) -> Result<Categorized<Person>, ApiError> {
        Ok(self.store.load(KIND)?)
    }

    pub fn get(&self, category: &str, slug: &str) -> Result<Person, ApiError> {
        self.list()?
            .remove(category)
            .and_then(|members| members.into_iter().find(|p| p.slug() == slug))
            .ok_or_else(|| ApiError::not_found("person", format!("{}/{}", category, slug)))
    }

    /// Add `person` to `category`, returning the slug they were stored under.
    pub fn create(&self, category: &str, mut person: Person) -> Result<String, ApiError> {
        let mut report = person.validate().err().unwrap_or_default();
        report.require("category", Some(category));
        report.into_result()?;
        let requested = identity_of(&person)?;

        let mut tx = self.store.begin::<Categorized<Person>>(KIND)?;
        let members = tx.entry(category.to_string()).or_default();
        let slug = unique_in(members.iter().map(Person::slug), &requested);
        person.slug = Some(slug.clone());
        members.push(person);
        commit(tx, 0)?;

        info!(category, slug = %slug, "Created person");
        Ok(slug)
    }

    /// Replace a person, renaming their image when their slug changes.
    ///
    /// Moving between categories re-checks uniqueness in the destination, so
    /// the returned slug may carry a suffix.
    pub fn update(&self, update: PersonUpdate) -> Result<String, ApiError> {
        let PersonUpdate {
            old_slug,
            old_category,
            category,
            mut person,
        } = update;
        let mut report = person.validate().err().unwrap_or_default();
        report.require("slug", Some(&old_slug));
        report.require("category", Some(&category));
        report.into_result()?;
        let requested = identity_of(&person)?;

        let source = old_category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| category.clone());
        let moving = source != category;

        let mut tx = self.store.begin::<Categorized<Person>>(KIND)?;
        let index = tx
            .get(&source)
            .and_then(|members| members.iter().position(|p| p.slug() == old_slug))
            .ok_or_else(|| ApiError::not_found("person", format!("{}/{}", source, old_slug)))?;

        let slug = if moving {
            let destination = tx.get(&category).map(Vec::as_slice).unwrap_or_default();
            unique_in(scope(destination, None, Person::slug), &requested)
        } else if requested == old_slug {
            requested
        } else {
            unique_in(scope(tx[&source].as_slice(), Some(index), Person::slug), &requested)
        };

        let moved = if slug != old_slug {
            sync_single(self.layout, KIND, &mut person.image_url, &slug)?
        } else {
            0
        };
        person.slug = Some(slug.clone());

        if moving {
            if let Some(members) = tx.get_mut(&source) {
                members.remove(index);
            }
            tx.entry(category.clone()).or_default().push(person);
        } else if let Some(members) = tx.get_mut(&source) {
            members[index] = person;
        }
        commit(tx, moved)?;

        info!(from = %format!("{}/{}", source, old_slug), to = %format!("{}/{}", category, slug), "Updated person");
        Ok(slug)
    }

    /// Remove a person. Their image stays on disk.
    pub fn delete(&self, category: &str, slug: &str) -> Result<(), ApiError> {
        let mut tx = self.store.begin::<Categorized<Person>>(KIND)?;
        let members = tx
            .get_mut(category)
            .ok_or_else(|| ApiError::not_found("category", category))?;
        let index = members
            .iter()
            .position(|p| p.slug() == slug)
            .ok_or_else(|| ApiError::not_found("person", format!("{}/{}", category, slug)))?;
        let removed = members.remove(index);
        commit(tx, 0)?;

        if let Some(image) = present(&removed.image_url) {
            debug!(image, "Image retained after delete");
        }
        info!(category, slug, "Deleted person");
        Ok(())
    }
}

fn identity_of(person: &Person) -> Result<String, ApiError> {
    requested_identity("slug", &person.slug, &person.name)?
        .ok_or_else(|| ApiError::Validation(ValidationReport::missing("name")))
}
