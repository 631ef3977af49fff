//! Content Store: file-backed content management for a research center site
//!
//! Keeps people, events, projects, papers, blog posts and collaborators in JSON
//! collections on disk, with image assets whose file names track the identity
//! of the document that owns them.

pub mod api;
pub mod assets;
pub mod cli;
pub mod concurrency;
pub mod config;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod logging;
pub mod store;
pub mod types;

pub use api::ContentApi;
