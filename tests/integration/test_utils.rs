//! Shared test utilities for integration tests
//!
//! Site fixtures plus environment isolation for tests that touch XDG or
//! `CONTENT__*` variables.

#![allow(dead_code)]

use content_store::config::ContentConfig;
use content_store::types::EntityKind;
use content_store::ContentApi;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

/// Serializes environment variable access across all tests in this binary
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: [&str; 4] = ["HOME", "XDG_CONFIG_HOME", "CONTENT_ENV", "CONTENT__STORAGE__DATA_DIR"];

/// A throwaway site: temp root, default layout, one `ContentApi`.
pub struct Site {
    pub temp: TempDir,
    pub config: ContentConfig,
    pub api: ContentApi,
}

impl Site {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = ContentConfig::for_site(temp.path());
        Self::with_config(temp, config)
    }

    pub fn with_config(temp: TempDir, config: ContentConfig) -> Self {
        let api = ContentApi::new(&config).unwrap();
        Self { temp, config, api }
    }

    /// Write an asset file for `kind`, returning its path on disk.
    pub fn write_asset(&self, kind: EntityKind, name: &str) -> PathBuf {
        let dir = self.api.layout().dir(kind).unwrap();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, name.as_bytes()).unwrap();
        path
    }

    pub fn asset_path(&self, kind: EntityKind, name: &str) -> PathBuf {
        self.api.layout().dir(kind).unwrap().join(name)
    }

    /// Raw JSON of a collection file as stored on disk.
    pub fn collection_json(&self, kind: EntityKind) -> serde_json::Value {
        let raw = fs::read_to_string(self.api.store().path(kind)).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    /// Every file under the public root, relative to it.
    pub fn public_files(&self) -> Vec<PathBuf> {
        let root = self.config.public_root();
        walkdir::WalkDir::new(&root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(&root).unwrap().to_path_buf())
            .collect()
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir`, and every
/// `CONTENT_*` variable this suite uses cleared, restoring them afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> = ISOLATED_VARS
        .iter()
        .map(|name| (*name, std::env::var(name).ok()))
        .collect();

    let home = test_dir.path().join("home");
    let config_home = test_dir.path().join("xdg");
    fs::create_dir_all(&home).unwrap();
    fs::create_dir_all(&config_home).unwrap();
    std::env::set_var("HOME", &home);
    std::env::set_var("XDG_CONFIG_HOME", &config_home);
    std::env::remove_var("CONTENT_ENV");
    std::env::remove_var("CONTENT__STORAGE__DATA_DIR");

    let result = f();

    for (name, value) in saved {
        match value {
            Some(v) => std::env::set_var(name, v),
            None => std::env::remove_var(name),
        }
    }
    result
}
