//! Load/save round trips preserve every document and their order

use content_store::entities::{Categorized, Collaborator, Paper, Person};
use content_store::store::CollectionStore;
use content_store::types::EntityKind;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

fn collaborator() -> impl Strategy<Value = Collaborator> {
    (
        proptest::option::of("[a-z-]{1,12}"),
        proptest::option::of("\\PC{0,16}"),
        proptest::option::of("https://[a-z]{1,8}\\.org"),
    )
        .prop_map(|(id, name, website)| Collaborator {
            id,
            name,
            website,
            ..Collaborator::default()
        })
}

/// Absent, explicit null, or text.
fn text_field() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        "[a-z ]{0,8}".prop_map(|s| Some(Value::String(s))),
    ]
}

fn raw_paper() -> impl Strategy<Value = Value> {
    let year = prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        (1990u32..2030).prop_map(|y| Some(json!(y))),
        (1990u32..2030).prop_map(|y| Some(json!(y.to_string()))),
    ];
    let authors = prop_oneof![
        Just(None),
        Just(Some(json!([]))),
        "[A-Z][a-z]{1,6}".prop_map(|a| Some(json!(a))),
        proptest::collection::vec("[A-Z][a-z]{1,6}", 1..3).prop_map(|a| Some(json!(a))),
    ];
    (text_field(), authors, year, text_field(), text_field()).prop_map(
        |(title, authors, year, venue, doi)| {
            let mut doc = Map::new();
            for (key, value) in [
                ("title", title),
                ("authors", authors),
                ("year", year),
                ("venue", venue),
                ("doi", doi),
            ] {
                if let Some(value) = value {
                    doc.insert(key.to_string(), value);
                }
            }
            Value::Object(doc)
        },
    )
}

fn reparsed(store: &CollectionStore, kind: EntityKind) -> Value {
    serde_json::from_str(&std::fs::read_to_string(store.path(kind)).unwrap()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn list_collection_round_trips(docs in proptest::collection::vec(collaborator(), 0..8)) {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        store.save(EntityKind::Collaborators, &docs).unwrap();

        let loaded: Vec<Collaborator> = store.load(EntityKind::Collaborators).unwrap();
        prop_assert_eq!(&loaded, &docs);

        store.save(EntityKind::Collaborators, &loaded).unwrap();
        let raw: Value = serde_json::from_str(
            &std::fs::read_to_string(store.path(EntityKind::Collaborators)).unwrap(),
        ).unwrap();
        prop_assert_eq!(raw, serde_json::to_value(&docs).unwrap());
    }

    #[test]
    fn category_map_round_trips(
        names in proptest::collection::btree_map("[a-z]{1,8}", proptest::collection::vec("[A-Z][a-z]{1,8}", 0..4), 0..4)
    ) {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        let people: Categorized<Person> = names
            .into_iter()
            .map(|(category, members)| {
                (category, members.iter().map(|n| Person::named(n)).collect())
            })
            .collect();
        store.save(EntityKind::People, &people).unwrap();

        let loaded: Categorized<Person> = store.load(EntityKind::People).unwrap();
        prop_assert_eq!(loaded, people);
    }

    #[test]
    fn stored_papers_keep_their_wire_shape(docs in proptest::collection::vec(raw_paper(), 0..6)) {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        let original = Value::Array(docs);
        std::fs::write(store.path(EntityKind::Papers), original.to_string()).unwrap();

        let loaded: Vec<Paper> = store.load(EntityKind::Papers).unwrap();
        store.save(EntityKind::Papers, &loaded).unwrap();
        prop_assert_eq!(reparsed(&store, EntityKind::Papers), original);
    }

    #[test]
    fn stored_people_keep_nulls(
        bios in proptest::collection::vec(text_field(), 1..5),
        emails in proptest::collection::vec(text_field(), 1..5),
    ) {
        let temp = TempDir::new().unwrap();
        let store = CollectionStore::new(temp.path());
        let faculty: Vec<Value> = bios
            .into_iter()
            .zip(emails)
            .enumerate()
            .map(|(i, (bio, email))| {
                let mut doc = json!({"name": format!("Person {}", i), "slug": format!("person-{}", i)});
                if let Some(bio) = bio {
                    doc["bio"] = bio;
                }
                if let Some(email) = email {
                    doc["email"] = email;
                }
                doc
            })
            .collect();
        let original = json!({"faculty": faculty, "staff": []});
        std::fs::write(store.path(EntityKind::People), original.to_string()).unwrap();

        let loaded: Categorized<Person> = store.load(EntityKind::People).unwrap();
        store.save(EntityKind::People, &loaded).unwrap();
        prop_assert_eq!(reparsed(&store, EntityKind::People), original);
    }
}
