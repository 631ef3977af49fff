//! Create/update/delete flows for events, papers, projects, collaborators and blogs

use super::test_utils::Site;
use content_store::config::ContentConfig;
use content_store::entities::{Blog, Collaborator, Event, Paper, PaperKey, Project};
use content_store::error::ErrorKind;
use content_store::types::EntityKind;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn event(name: &str, start: &str) -> Event {
    Event {
        name: Some(name.to_string()),
        start_time: Some(start.to_string()),
        end_time: Some(start.to_string()),
        location: Some("Main Hall".to_string()),
        ..Event::default()
    }
}

fn paper(title: &str, year: &str, authors: &[&str]) -> Paper {
    Paper {
        title: Some(title.to_string()),
        year: Some(year.to_string()),
        authors: authors.iter().map(|a| a.to_string()).collect(),
        venue: Some("ICSE".to_string()),
        ..Paper::default()
    }
}

#[test]
fn test_event_slug_change_renames_timestamped_images() {
    let temp = TempDir::new().unwrap();
    let mut config = ContentConfig::for_site(temp.path());
    config.storage.asset_root = PathBuf::from("assets");
    let site = Site::with_config(temp, config);
    let old_file = site.write_asset(EntityKind::Events, "foo-1700000000000.png");

    let mut foo = event("Foo", "2024-04-01T15:00");
    foo.slug = Some("foo".to_string());
    foo.images = vec!["/assets/events/foo-1700000000000.png".to_string()];
    site.api.events().create(foo.clone()).unwrap();

    foo.slug = Some("bar".to_string());
    let slug = site.api.events().update("foo", foo).unwrap();
    assert_eq!(slug, "bar");

    let stored = site.api.events().get("bar").unwrap();
    let reference = &stored.images[0];
    assert!(reference.starts_with("/assets/events/"));
    let basename = Path::new(reference).file_name().unwrap().to_string_lossy().into_owned();
    assert!(basename.starts_with("bar-"));
    assert!(basename.ends_with(".png"));
    assert!(site.asset_path(EntityKind::Events, &basename).exists());
    assert!(!old_file.exists());
}

#[test]
fn test_event_taken_slug_is_conflict_on_update() {
    let site = Site::new();
    let events = site.api.events();
    events.create(event("Alpha", "2024-01-01T10:00")).unwrap();
    events.create(event("Beta", "2024-02-01T10:00")).unwrap();

    let mut alpha = events.get("alpha").unwrap();
    alpha.slug = Some("beta".to_string());
    let err = events.update("alpha", alpha).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(events.get("alpha").is_ok());
}

#[test]
fn test_event_kept_newest_first_after_update() {
    let site = Site::new();
    let events = site.api.events();
    events.create(event("Alpha", "2024-01-01T10:00")).unwrap();
    events.create(event("Beta", "2024-02-01T10:00")).unwrap();

    let mut alpha = events.get("alpha").unwrap();
    alpha.start_time = Some("2025-03-01T10:00".to_string());
    alpha.end_time = Some("2025-03-01T12:00".to_string());
    events.update("alpha", alpha).unwrap();

    let list = events.list().unwrap();
    assert_eq!(list[0].slug(), "alpha");
    assert_eq!(list[0].year, Some(2025));
}

#[test]
fn test_paper_delete_requires_exact_key() {
    let site = Site::new();
    let papers = site.api.papers();
    papers.create(paper("X", "2020", &["A"])).unwrap();

    let err = papers
        .delete(&PaperKey::new("X", "2020", &["A", "B"]))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(papers.list().unwrap().len(), 1);
}

#[test]
fn test_paper_invalid_names_every_field() {
    let site = Site::new();
    let err = site.api.papers().create(Paper::default()).unwrap_err();
    match err {
        content_store::error::ApiError::Validation(report) => {
            assert_eq!(report.fields(), vec!["title", "authors", "year", "venue"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(!site.api.store().path(EntityKind::Papers).exists());
}

#[test]
fn test_project_and_collaborator_lifecycle() {
    let site = Site::new();
    site.write_asset(EntityKind::Collaborators, "acme.svg");

    let projects = site.api.projects();
    let id = projects
        .create(Project {
            title: Some("Edge AI".to_string()),
            description: Some("On-device inference".to_string()),
            category: Some("ai".to_string()),
            ..Project::default()
        })
        .unwrap();
    assert_eq!(id, "edge-ai");
    projects.delete(&id).unwrap();
    assert!(projects.list().unwrap().is_empty());

    let collaborators = site.api.collaborators();
    collaborators
        .create(Collaborator {
            name: Some("Acme".to_string()),
            category: Some("industry".to_string()),
            logo: Some("/images/collaborators/acme.svg".to_string()),
            ..Collaborator::default()
        })
        .unwrap();
    let mut acme = collaborators.get("acme").unwrap();
    acme.id = Some("acme-corp".to_string());
    collaborators.update("acme", acme).unwrap();

    assert_eq!(
        collaborators.get("acme-corp").unwrap().logo.as_deref(),
        Some("/images/collaborators/acme-corp.svg")
    );
    collaborators.delete("acme-corp").unwrap();
    // Deletes keep the asset; the orphan report surfaces it
    assert_eq!(
        site.api.orphaned_assets(EntityKind::Collaborators).unwrap(),
        vec!["/images/collaborators/acme-corp.svg"]
    );
}

#[test]
fn test_blog_lifecycle() {
    let site = Site::new();
    let blogs = site.api.blogs();
    let post = |title: &str| Blog {
        title: Some(title.to_string()),
        author: Some("Robin".to_string()),
        content: Some("...".to_string()),
        ..Blog::default()
    };

    let first = blogs.create(post("Launch Day")).unwrap();
    let second = blogs.create(post("Launch Day")).unwrap();
    assert_eq!((first.id, first.slug.as_str()), (0, "launch-day"));
    assert_eq!((second.id, second.slug.as_str()), (1, "launch-day-1"));

    let mut edited = blogs.get(1).unwrap();
    edited.title = Some("Second Launch".to_string());
    let date = edited.date.clone();
    let updated = blogs.update(1, edited, true).unwrap();
    assert_eq!(updated.slug, "second-launch");
    assert_eq!(blogs.get(1).unwrap().date, date);

    blogs.delete(0).unwrap();
    assert_eq!(blogs.delete(0).unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(blogs.list().unwrap().len(), 1);
}
