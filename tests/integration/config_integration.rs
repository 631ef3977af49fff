//! Integration tests for configuration layering

use super::test_utils::with_isolated_env;
use content_store::config::ConfigLoader;
use content_store::types::EntityKind;
use content_store::ContentApi;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults_without_any_file() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let site = temp.path().join("site");
        let config = ConfigLoader::load(&site).unwrap();
        assert_eq!(config.site_root(), site);
        assert_eq!(config.data_dir(), site.join("public/data"));
        assert_eq!(config.asset_subdir(EntityKind::Events), PathBuf::from("images/events"));
        assert!(config.validate().is_ok());
    });
}

#[test]
fn test_site_file_and_env_precedence() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let site = temp.path().join("site");
        fs::create_dir_all(site.join("config")).unwrap();
        fs::write(
            site.join("config/config.toml"),
            r#"
[storage]
data_dir = "content"
asset_root = "assets"

[storage.asset_dirs]
people = "media/team"
"#,
        )
        .unwrap();

        let config = ConfigLoader::load(&site).unwrap();
        assert_eq!(config.data_dir(), site.join("content"));
        assert_eq!(config.asset_subdir(EntityKind::Blogs), PathBuf::from("assets/blogs"));
        assert_eq!(config.asset_subdir(EntityKind::People), PathBuf::from("media/team"));

        std::env::set_var("CONTENT__STORAGE__DATA_DIR", "env-data");
        let config = ConfigLoader::load(&site).unwrap();
        std::env::remove_var("CONTENT__STORAGE__DATA_DIR");
        assert_eq!(config.data_dir(), site.join("env-data"));
    });
}

#[test]
fn test_environment_specific_file() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let site = temp.path().join("site");
        fs::create_dir_all(site.join("config")).unwrap();
        fs::write(site.join("config/config.toml"), "[storage]\ndata_dir = \"base\"\n").unwrap();
        fs::write(site.join("config/staging.toml"), "[storage]\ndata_dir = \"staged\"\n").unwrap();

        std::env::set_var("CONTENT_ENV", "staging");
        let config = ConfigLoader::load(&site).unwrap();
        std::env::remove_var("CONTENT_ENV");
        assert_eq!(config.data_dir(), site.join("staged"));
    });
}

#[test]
fn test_invalid_asset_dir_rejected_by_api() {
    let temp = TempDir::new().unwrap();
    let config_file = temp.path().join("content.toml");
    fs::write(
        &config_file,
        r#"
site_root = "."

[storage.asset_dirs]
papers = "images/papers"
events = "../outside"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(ContentApi::new(&config).is_err());
}

#[test]
fn test_effective_config_renders_as_toml() {
    let temp = TempDir::new().unwrap();
    with_isolated_env(&temp, || {
        let config = ConfigLoader::load(temp.path()).unwrap();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("data_dir = \"public/data\""));
        assert!(rendered.contains("[logging]"));
    });
}
