//! Concurrent read-modify-write cycles on one collection never lose a write

use super::test_utils::Site;
use content_store::entities::{Categorized, Paper, Person};
use content_store::error::ApiError;
use content_store::handlers::PersonUpdate;
use content_store::types::EntityKind;
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_creates_all_land() {
    let site = Arc::new(Site::new());
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let site = Arc::clone(&site);
            thread::spawn(move || {
                for i in 0..10 {
                    site.api
                        .people()
                        .create("faculty", Person::named(&format!("Person {t} {i}")))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let people = site.api.people().list().unwrap();
    assert_eq!(people["faculty"].len(), 80);
}

#[test]
fn test_concurrent_same_name_creates_get_distinct_slugs() {
    let site = Arc::new(Site::new());
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let site = Arc::clone(&site);
            thread::spawn(move || {
                site.api
                    .people()
                    .create("staff", Person::named("Alex Kim"))
                    .unwrap()
            })
        })
        .collect();
    let mut slugs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    slugs.sort();
    slugs.dedup();
    assert_eq!(slugs.len(), 6);
    assert!(slugs.contains(&"alex-kim".to_string()));
}

#[test]
fn test_transactions_interleave_without_lost_updates() {
    let site = Arc::new(Site::new());
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let site = Arc::clone(&site);
            thread::spawn(move || {
                for i in 0..25 {
                    site.api
                        .store()
                        .transact::<Vec<Paper>, _, ApiError>(EntityKind::Papers, |papers| {
                            papers.push(Paper {
                                title: Some(format!("Paper {t}-{i}")),
                                ..Paper::default()
                            });
                            Ok(())
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(site.api.papers().list().unwrap().len(), 100);
    // Other collections are independent and stay empty
    let people: Categorized<Person> = site.api.store().load(EntityKind::People).unwrap();
    assert!(people.is_empty());
}

#[test]
fn test_concurrent_updates_in_one_category_all_persist() {
    let site = Arc::new(Site::new());
    let slugs: Vec<String> = (0..8)
        .map(|i| {
            site.api
                .people()
                .create("faculty", Person::named(&format!("Member {i}")))
                .unwrap()
        })
        .collect();

    let handles: Vec<_> = slugs
        .iter()
        .cloned()
        .enumerate()
        .map(|(i, slug)| {
            let site = Arc::clone(&site);
            thread::spawn(move || {
                let mut person = site.api.people().get("faculty", &slug).unwrap();
                person.title = Some(format!("Title {i}"));
                site.api
                    .people()
                    .update(PersonUpdate {
                        old_slug: slug,
                        old_category: None,
                        category: "faculty".to_string(),
                        person,
                    })
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let people = site.api.people().list().unwrap();
    assert_eq!(people["faculty"].len(), 8);
    for (i, slug) in slugs.iter().enumerate() {
        let person = site.api.people().get("faculty", slug).unwrap();
        assert_eq!(person.title.as_deref(), Some(format!("Title {i}").as_str()));
    }
}
