use super::{commit, requested_identity, scope, sync_single};
use crate::assets::AssetLayout;
use crate::entities::{display_date, present, Blog, Record};
use crate::error::{ApiError, ValidationReport};
use crate::identity::{slugify, unique_in};
use crate::store::CollectionStore;
use crate::types::EntityKind;
use serde::Serialize;
use tracing::info;

const KIND: EntityKind = EntityKind::Blogs;

/// Where a post was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogRef {
    pub id: u64,
    pub slug: String,
}

/// Blog posts, newest first, addressed by numeric id.
pub struct BlogsHandler<'a> {
    store: &'a CollectionStore,
    layout: &'a AssetLayout,
}

impl<'a> BlogsHandler<'a> {
    pub fn new(store: &'a CollectionStore, layout: &'a AssetLayout) -> Self {
        Self { store, layout }
    }

    pub fn list(&self) -> Result<Vec<Blog>, ApiError> {
        Ok(self.store.load(KIND)?)
    }

    pub fn get(&self, id: u64) -> Result<Blog, ApiError> {
        self.list()?
            .into_iter()
            .find(|b| b.id == Some(id))
            .ok_or_else(|| ApiError::not_found("blog", id.to_string()))
    }

    /// Prepend `blog` under the next free id. The date defaults to today.
    pub fn create(&self, mut blog: Blog) -> Result<BlogRef, ApiError> {
        blog.validate().map_err(ApiError::Validation)?;
        let requested = requested_identity("slug", &blog.slug, &blog.title)?
            .ok_or_else(|| ApiError::Validation(ValidationReport::missing("title")))?;

        let mut tx = self.store.begin::<Vec<Blog>>(KIND)?;
        let id = tx
            .iter()
            .filter_map(|b| b.id)
            .max()
            .map_or(0, |max| max + 1);
        let slug = unique_in(tx.iter().map(Blog::slug), &requested);
        blog.id = Some(id);
        blog.slug = Some(slug.clone());
        if present(&blog.date).is_none() {
            blog.date = Some(display_date(chrono::Local::now().date_naive()));
        }
        tx.insert(0, blog);
        commit(tx, 0)?;

        info!(id, slug = %slug, "Created blog post");
        Ok(BlogRef { id, slug })
    }

    /// Replace post `id`.
    ///
    /// The slug only changes when one is given explicitly, or when
    /// `regenerate_slug` is set and the title changed. The cover image follows
    /// a changed slug.
    pub fn update(&self, id: u64, mut blog: Blog, regenerate_slug: bool) -> Result<BlogRef, ApiError> {
        blog.validate().map_err(ApiError::Validation)?;
        let explicit = requested_identity("slug", &blog.slug, &None)?;

        let mut tx = self.store.begin::<Vec<Blog>>(KIND)?;
        let index = tx
            .iter()
            .position(|b| b.id == Some(id))
            .ok_or_else(|| ApiError::not_found("blog", id.to_string()))?;
        let old = &tx[index];
        let old_slug = old.slug().to_string();
        let title_changed = old.title != blog.title;

        let requested = match explicit {
            Some(slug) if slug != old_slug => slug,
            _ if regenerate_slug && title_changed => {
                slugify(blog.title.as_deref().unwrap_or_default())
            }
            _ => old_slug.clone(),
        };
        let slug = if requested == old_slug || requested.is_empty() {
            old_slug.clone()
        } else {
            unique_in(scope(tx.as_slice(), Some(index), Blog::slug), &requested)
        };
        if present(&blog.date).is_none() {
            blog.date = tx[index].date.clone();
        }

        let moved = if slug != old_slug {
            sync_single(self.layout, KIND, &mut blog.cover_image, &slug)?
        } else {
            0
        };
        blog.id = Some(id);
        blog.slug = Some(slug.clone());
        tx[index] = blog;
        commit(tx, moved)?;

        info!(id, from = %old_slug, to = %slug, "Updated blog post");
        Ok(BlogRef { id, slug })
    }

    pub fn delete(&self, id: u64) -> Result<(), ApiError> {
        let mut tx = self.store.begin::<Vec<Blog>>(KIND)?;
        let index = tx
            .iter()
            .position(|b| b.id == Some(id))
            .ok_or_else(|| ApiError::not_found("blog", id.to_string()))?;
        tx.remove(index);
        commit(tx, 0)?;

        info!(id, "Deleted blog post");
        Ok(())
    }
}
