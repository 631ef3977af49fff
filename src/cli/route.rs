//! CLI route: single route table and run context. Dispatches to the entity
//! handlers and presentation.

use crate::api::ContentApi;
use crate::assets::{ImageMime, UploadRequest};
use crate::cli::output::command_name;
use crate::cli::parse::{Commands, ListFormat};
use crate::cli::presentation::{
    format_blogs_table, format_collaborators_table, format_events_table, format_orphans,
    format_papers_table, format_people_table, format_projects_table,
};
use crate::config::{ConfigLoader, ContentConfig};
use crate::entities::PaperKey;
use crate::error::{ApiError, StorageError, ValidationReport};
use crate::handlers::PersonUpdate;
use crate::types::EntityKind;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Runtime context for CLI execution: resolved config and the content API.
pub struct RunContext {
    api: Arc<ContentApi>,
    config: ContentConfig,
}

impl RunContext {
    /// Create run context from the site root and optional config path. Uses ConfigLoader only.
    pub fn new(site_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let mut config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&site_root)?,
        };
        if config.site_root.is_none() {
            config.site_root = Some(site_root);
        }
        let api = ContentApi::new(&config)?;
        Ok(Self {
            api: Arc::new(api),
            config,
        })
    }

    pub fn api(&self) -> &ContentApi {
        &self.api
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        debug!(command = %command_name(command), "Executing command");
        match command {
            Commands::List { kind, format } => self.handle_list(*kind, *format),
            Commands::Create {
                kind,
                file,
                category,
            } => self.handle_create(*kind, file, category.as_deref()),
            Commands::Update {
                kind,
                identity,
                file,
                category,
                old_category,
                regenerate_slug,
            } => self.handle_update(
                *kind,
                identity,
                file,
                category.as_deref(),
                old_category.clone(),
                *regenerate_slug,
            ),
            Commands::Delete {
                kind,
                identity,
                category,
            } => self.handle_delete(*kind, identity, category.as_deref()),
            Commands::Upload {
                kind,
                path,
                slug,
                mime,
            } => self.handle_upload(*kind, path, slug.as_deref(), mime.as_deref()),
            Commands::Orphans { kind } => {
                let orphans = self.api.orphaned_assets(*kind)?;
                Ok(format_orphans(kind.as_str(), &orphans))
            }
            Commands::Config => self.config.to_toml(),
        }
    }

    fn handle_list(&self, kind: EntityKind, format: ListFormat) -> Result<String, ApiError> {
        if format == ListFormat::Json {
            let value = self.api.list_json(kind)?;
            return serde_json::to_string_pretty(&value)
                .map_err(|e| ApiError::StorageError(StorageError::InvalidPath(e.to_string())));
        }
        Ok(match kind {
            EntityKind::People => format_people_table(&self.api.people().list()?),
            EntityKind::Events => format_events_table(&self.api.events().list()?),
            EntityKind::Projects => format_projects_table(&self.api.projects().list()?),
            EntityKind::Collaborators => {
                format_collaborators_table(&self.api.collaborators().list()?)
            }
            EntityKind::Papers => format_papers_table(&self.api.papers().list()?),
            EntityKind::Blogs => format_blogs_table(&self.api.blogs().list()?),
        })
    }

    fn handle_create(
        &self,
        kind: EntityKind,
        file: &Path,
        category: Option<&str>,
    ) -> Result<String, ApiError> {
        let created = match kind {
            EntityKind::People => {
                let category = require_category(category)?;
                let slug = self.api.people().create(category, read_document(file)?)?;
                format!("{}/{}", category, slug)
            }
            EntityKind::Events => self.api.events().create(read_document(file)?)?,
            EntityKind::Projects => self.api.projects().create(read_document(file)?)?,
            EntityKind::Collaborators => self.api.collaborators().create(read_document(file)?)?,
            EntityKind::Papers => self.api.papers().create(read_document(file)?)?.to_string(),
            EntityKind::Blogs => {
                let blog = self.api.blogs().create(read_document(file)?)?;
                format!("{} ({})", blog.slug, blog.id)
            }
        };
        Ok(format!("Created {} {}", kind, created))
    }

    fn handle_update(
        &self,
        kind: EntityKind,
        identity: &str,
        file: &Path,
        category: Option<&str>,
        old_category: Option<String>,
        regenerate_slug: bool,
    ) -> Result<String, ApiError> {
        let updated = match kind {
            EntityKind::People => {
                let category = require_category(category)?;
                let slug = self.api.people().update(PersonUpdate {
                    old_slug: identity.to_string(),
                    old_category,
                    category: category.to_string(),
                    person: read_document(file)?,
                })?;
                format!("{}/{}", category, slug)
            }
            EntityKind::Events => self.api.events().update(identity, read_document(file)?)?,
            EntityKind::Projects => self.api.projects().update(identity, read_document(file)?)?,
            EntityKind::Collaborators => self
                .api
                .collaborators()
                .update(identity, read_document(file)?)?,
            EntityKind::Papers => self
                .api
                .papers()
                .update(&paper_key(identity)?, read_document(file)?)?
                .to_string(),
            EntityKind::Blogs => {
                let blog = self
                    .api
                    .blogs()
                    .update(blog_id(identity)?, read_document(file)?, regenerate_slug)?;
                format!("{} ({})", blog.slug, blog.id)
            }
        };
        Ok(format!("Updated {} {}", kind, updated))
    }

    fn handle_delete(
        &self,
        kind: EntityKind,
        identity: &str,
        category: Option<&str>,
    ) -> Result<String, ApiError> {
        match kind {
            EntityKind::People => self.api.people().delete(require_category(category)?, identity)?,
            EntityKind::Events => self.api.events().delete(identity)?,
            EntityKind::Projects => self.api.projects().delete(identity)?,
            EntityKind::Collaborators => self.api.collaborators().delete(identity)?,
            EntityKind::Papers => self.api.papers().delete(&paper_key(identity)?)?,
            EntityKind::Blogs => self.api.blogs().delete(blog_id(identity)?)?,
        }
        Ok(format!("Deleted {} {}", kind, identity))
    }

    fn handle_upload(
        &self,
        kind: EntityKind,
        path: &Path,
        slug: Option<&str>,
        mime: Option<&str>,
    ) -> Result<String, ApiError> {
        let bytes = std::fs::read(path).map_err(|e| read_error(path, e))?;
        let original_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = match mime {
            Some(mime) => mime.to_string(),
            None => path
                .extension()
                .and_then(|ext| ImageMime::from_extension(&ext.to_string_lossy()))
                .map(|m| m.as_mime().to_string())
                .unwrap_or_default(),
        };
        let reference = self.api.upload(&UploadRequest {
            kind,
            bytes: &bytes,
            mime_type: &mime_type,
            original_name: &original_name,
            identity_hint: slug,
        })?;
        Ok(reference)
    }
}

fn require_category(category: Option<&str>) -> Result<&str, ApiError> {
    category
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::Validation(ValidationReport::missing("category")))
}

fn read_error(path: &Path, e: std::io::Error) -> ApiError {
    ApiError::StorageError(StorageError::IoError(std::io::Error::new(
        e.kind(),
        format!("Failed to read {:?}: {}", path, e),
    )))
}

fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
    let raw = std::fs::read_to_string(path).map_err(|e| read_error(path, e))?;
    serde_json::from_str(&raw).map_err(|e| {
        ApiError::Validation(ValidationReport::invalid("document", e.to_string()))
    })
}

fn paper_key(identity: &str) -> Result<PaperKey, ApiError> {
    serde_json::from_str(identity).map_err(|e| {
        ApiError::Validation(ValidationReport::invalid(
            "key",
            format!("expected {{\"title\", \"year\", \"authors\"}}: {}", e),
        ))
    })
}

fn blog_id(identity: &str) -> Result<u64, ApiError> {
    identity.trim().parse().map_err(|_| {
        ApiError::Validation(ValidationReport::invalid(
            "id",
            format!("'{}' is not a blog id", identity),
        ))
    })
}
