//! Integration tests for the collection store

use super::test_utils::Site;
use content_store::entities::{Categorized, Event, Person};
use content_store::error::{ErrorKind, StorageError};
use content_store::types::EntityKind;
use serde_json::{json, Value};
use std::fs;

#[test]
fn test_round_trip_preserves_documents_and_order() {
    let site = Site::new();
    let path = site.api.store().path(EntityKind::Events);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let original = json!([
        {"slug": "b", "name": "B", "startTime": "2024-02-01T10:00", "endTime": "2024-02-01T11:00",
         "location": "X", "year": 2024, "recording": {"url": "https://video.example.org/b"}},
        {"slug": "a", "name": "A", "startTime": "2023-02-01T10:00", "endTime": "2023-02-01T11:00",
         "location": "Y", "year": 2023, "images": ["/images/events/a.png"]}
    ]);
    fs::write(&path, serde_json::to_string(&original).unwrap()).unwrap();

    let events: Vec<Event> = site.api.store().load(EntityKind::Events).unwrap();
    site.api.store().save(EntityKind::Events, &events).unwrap();

    assert_eq!(site.collection_json(EntityKind::Events), original);
}

#[test]
fn test_people_file_uses_four_space_indent() {
    let site = Site::new();
    site.api
        .people()
        .create("faculty", Person::named("Ada Lovelace"))
        .unwrap();

    let raw = fs::read_to_string(site.api.store().path(EntityKind::People)).unwrap();
    assert!(raw.starts_with("{\n    \"faculty\""));
}

#[test]
fn test_malformed_collection_fails_without_overwrite() {
    let site = Site::new();
    let path = site.api.store().path(EntityKind::People);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ not json").unwrap();

    let err = site.api.people().list().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.public_message(), "Storage failure");

    let err = site
        .api
        .people()
        .create("faculty", Person::named("Ada Lovelace"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");

    let direct = site
        .api
        .store()
        .load::<Categorized<Person>>(EntityKind::People)
        .unwrap_err();
    assert!(matches!(direct, StorageError::Malformed { .. }));
}

#[test]
fn test_save_leaves_no_temp_files() {
    let site = Site::new();
    for name in ["One", "Two", "Three"] {
        site.api.people().create("staff", Person::named(name)).unwrap();
    }
    let data_dir = site.api.store().data_dir().to_path_buf();
    let names: Vec<String> = fs::read_dir(&data_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["people.json"]);

    let people = site.collection_json(EntityKind::People);
    assert_eq!(people["staff"].as_array().map(Vec::len), Some(3));
    assert!(matches!(people["staff"][0]["slug"], Value::String(_)));
}
