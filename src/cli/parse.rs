//! CLI parse: clap types for content-store. No behavior; definitions only.

use crate::types::EntityKind;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// content-store CLI - manage the collections and images behind the site
#[derive(Parser)]
#[command(name = "content-store")]
#[command(about = "Manage the JSON collections and image assets of a research center website")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Site root directory
    #[arg(long, default_value = ".")]
    pub site_root: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every document of a type
    List {
        /// people, events, projects, papers, blogs or collaborators
        kind: EntityKind,
        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: ListFormat,
    },
    /// Create a document from a JSON file
    Create {
        kind: EntityKind,
        /// JSON document to store
        #[arg(long)]
        file: PathBuf,
        /// Category (people only)
        #[arg(long)]
        category: Option<String>,
    },
    /// Replace a document with the contents of a JSON file
    Update {
        kind: EntityKind,
        /// Current slug or id; for papers a JSON key {"title","year","authors"}
        identity: String,
        #[arg(long)]
        file: PathBuf,
        /// Destination category (people only)
        #[arg(long)]
        category: Option<String>,
        /// Category the person is filed under now, when moving them
        #[arg(long)]
        old_category: Option<String>,
        /// Derive a new slug from a changed title (blogs only)
        #[arg(long)]
        regenerate_slug: bool,
    },
    /// Delete a document
    Delete {
        kind: EntityKind,
        /// Slug or id; for papers a JSON key {"title","year","authors"}
        identity: String,
        /// Category (people only)
        #[arg(long)]
        category: Option<String>,
    },
    /// Store an image for a document type
    Upload {
        kind: EntityKind,
        /// Image file to upload
        path: PathBuf,
        /// Name the file after this slug, replacing any earlier upload for it
        #[arg(long)]
        slug: Option<String>,
        /// MIME type (default: inferred from the file extension)
        #[arg(long)]
        mime: Option<String>,
    },
    /// List asset files no document references
    Orphans { kind: EntityKind },
    /// Print the effective configuration
    Config,
}
