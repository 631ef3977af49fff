//! Entity Handlers
//!
//! Per-kind create/read/update/delete. Every mutating operation follows the
//! same order: validate the input, lock and load the collection, check
//! existence and uniqueness, rename assets, mutate in memory, save. Nothing
//! touches disk until every check has passed, and assets move before the
//! collection is saved.

mod blogs;
mod collaborators;
mod events;
mod papers;
mod people;
mod projects;

pub use blogs::{BlogRef, BlogsHandler};
pub use collaborators::CollaboratorsHandler;
pub use events::EventsHandler;
pub use papers::PapersHandler;
pub use people::{PeopleHandler, PersonUpdate};
pub use projects::ProjectsHandler;

use crate::assets::{sync_asset, AssetLayout, AssetSyncOutcome, RenameMode};
use crate::entities::present;
use crate::error::{ApiError, ValidationReport};
use crate::identity::{is_path_safe, slugify};
use crate::store::Transaction;
use crate::types::EntityKind;
use serde::Serialize;
use tracing::error;

/// Identities of `docs`, optionally skipping the document at `skip`.
pub(crate) fn scope<'a, T>(docs: &'a [T], skip: Option<usize>, id: fn(&T) -> &str) -> Vec<&'a str> {
    docs.iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != skip)
        .map(|(_, doc)| id(doc))
        .collect()
}

/// Explicit identity if given, else the slug of `name`.
///
/// Fails when neither yields a usable single-segment identity.
pub(crate) fn requested_identity(
    field: &'static str,
    explicit: &Option<String>,
    name: &Option<String>,
) -> Result<Option<String>, ApiError> {
    let candidate = match present(explicit) {
        Some(explicit) => explicit.to_string(),
        None => match present(name) {
            Some(name) => slugify(name),
            None => return Ok(None),
        },
    };
    if !is_path_safe(&candidate) {
        return Err(ApiError::Validation(ValidationReport::invalid(
            field,
            format!("'{}' is not a usable identity", candidate),
        )));
    }
    Ok(Some(candidate))
}

/// Rename the single asset behind `reference` after `identity`, in place.
/// Returns how many files moved.
pub(crate) fn sync_single(
    layout: &AssetLayout,
    kind: EntityKind,
    reference: &mut Option<String>,
    identity: &str,
) -> Result<usize, ApiError> {
    let Some(current) = reference.as_deref() else {
        return Ok(0);
    };
    match sync_asset(layout, kind, current, identity, RenameMode::Single)? {
        AssetSyncOutcome::Renamed { to, .. } => {
            *reference = Some(to);
            Ok(1)
        }
        AssetSyncOutcome::Unchanged | AssetSyncOutcome::SourceMissing { .. } => Ok(0),
    }
}

/// Rename every asset in `references` after `identity`, in place.
///
/// If one rename fails, the ones already done are moved back before the error
/// is returned.
pub(crate) fn sync_many(
    layout: &AssetLayout,
    kind: EntityKind,
    references: &mut [String],
    identity: &str,
) -> Result<usize, ApiError> {
    let mut renamed: Vec<(usize, String)> = Vec::new();
    for i in 0..references.len() {
        match sync_asset(layout, kind, &references[i], identity, RenameMode::Timestamped) {
            Ok(AssetSyncOutcome::Renamed { from, to }) => {
                references[i] = to;
                renamed.push((i, from));
            }
            Ok(_) => {}
            Err(e) => {
                roll_back(layout, kind, references, &renamed);
                return Err(e.into());
            }
        }
    }
    Ok(renamed.len())
}

fn roll_back(
    layout: &AssetLayout,
    kind: EntityKind,
    references: &mut [String],
    renamed: &[(usize, String)],
) {
    for (i, from) in renamed.iter().rev() {
        let (Some(now), Some(before)) = (
            layout.resolve(kind, &references[*i]),
            layout.resolve(kind, from),
        ) else {
            continue;
        };
        match std::fs::rename(&now.path, &before.path) {
            Ok(()) => references[*i] = from.clone(),
            Err(e) => error!(
                collection = %kind,
                reference = %references[*i],
                original = %from,
                error = %e,
                "Failed to roll back asset rename"
            ),
        }
    }
}

/// Save `tx`, reporting a divergence when assets already moved.
pub(crate) fn commit<C: Serialize>(tx: Transaction<'_, C>, moved: usize) -> Result<(), ApiError> {
    let kind = tx.kind();
    tx.commit().map_err(|source| {
        error!(collection = %kind, error = %source, moved, "Failed to save collection");
        if moved > 0 {
            ApiError::SaveAfterAssetSync { moved, source }
        } else {
            ApiError::StorageError(source)
        }
    })
}
