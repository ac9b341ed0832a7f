// src/services/detail_service_tests.rs
//
// Per-character detail behavior: sightings and transformations.
//
// INVARIANTS TESTED:
// - Children are fetched once per character, then served from the store
// - Lookups for unknown characters fail before any network work
// - Sightings keep store order; transformations come back name-sorted
// - Form lookup distinguishes "no such form" from remote failure

use std::sync::Arc;

use crate::error::AppError;
use crate::remote::records::{CharacterRecord, FormRecord, LocationRecord};
use crate::remote::MockRemoteClient;
use crate::services::{DetailService, FormService};
use crate::store::{CharacterStore, SqliteCharacterStore};

fn owner(id: &str) -> CharacterRecord {
    CharacterRecord {
        id: Some(id.to_string()),
        name: None,
        photo: None,
        favorite: None,
        description: None,
    }
}

fn location_record(id: &str, date: &str, owner_id: &str) -> LocationRecord {
    LocationRecord {
        id: Some(id.to_string()),
        date: Some(date.to_string()),
        latitude: Some("35.71867899343361".to_string()),
        longitude: Some("139.8202084625656".to_string()),
        character: Some(owner(owner_id)),
    }
}

fn form_record(id: &str, name: &str, owner_id: &str) -> FormRecord {
    FormRecord {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        description: Some(format!("{} form", name)),
        photo: None,
        character: Some(owner(owner_id)),
    }
}

/// An in-memory store already holding Goku, so detail lookups resolve.
fn seeded_store() -> Arc<SqliteCharacterStore> {
    let store = SqliteCharacterStore::open_in_memory().expect("in-memory store");
    store.insert_characters(&[CharacterRecord {
        id: Some("goku".to_string()),
        name: Some("Goku".to_string()),
        photo: None,
        favorite: Some(false),
        description: None,
    }]);
    Arc::new(store)
}

#[tokio::test]
async fn locations_are_fetched_once_then_served_from_store() {
    let store = seeded_store();
    let mut remote = MockRemoteClient::new();
    remote
        .expect_fetch_locations()
        .withf(|id| id == "goku")
        .times(1)
        .returning(|_| {
            Ok(vec![
                location_record("loc-1", "2024-02-20T00:00:00Z", "goku"),
                location_record("loc-2", "2024-02-21T00:00:00Z", "goku"),
            ])
        });

    let service = DetailService::new(store, Arc::new(remote));

    let first = service.load_locations("goku").await.unwrap();
    assert_eq!(first.len(), 2);
    assert!(first.iter().all(|l| l.character_id.as_deref() == Some("goku")));
    // Sightings keep the order the API reported them in
    assert_eq!(first[0].date, "2024-02-20T00:00:00Z");
    assert_eq!(first[1].date, "2024-02-21T00:00:00Z");

    let second = service.load_locations("goku").await.unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn unknown_character_fails_before_any_fetch() {
    let store = seeded_store();
    let mut remote = MockRemoteClient::new();
    remote.expect_fetch_locations().never();
    remote.expect_fetch_forms().never();

    let service = DetailService::new(store, Arc::new(remote));

    match service.load_locations("nobody").await {
        Err(AppError::CharacterNotFound(id)) => assert_eq!(id, "nobody"),
        other => panic!("expected CharacterNotFound, got {:?}", other),
    }
    match service.character("nobody") {
        Err(AppError::CharacterNotFound(id)) => assert_eq!(id, "nobody"),
        other => panic!("expected CharacterNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn character_detail_reads_the_store_only() {
    let store = seeded_store();
    let remote = MockRemoteClient::new();

    let service = DetailService::new(store, Arc::new(remote));
    let character = service.character("goku").unwrap();
    assert_eq!(character.name, "Goku");
}

#[tokio::test]
async fn forms_come_back_name_sorted_on_both_paths() {
    let store = seeded_store();
    let mut remote = MockRemoteClient::new();
    remote
        .expect_fetch_forms()
        .withf(|id| id == "goku")
        .times(1)
        .returning(|_| {
            Ok(vec![
                form_record("form-3", "Ultra Instinct", "goku"),
                form_record("form-1", "Base", "goku"),
                form_record("form-2", "Super Saiyan", "goku"),
            ])
        });

    let service = DetailService::new(store, Arc::new(remote));

    let first = service.load_forms("goku").await.unwrap();
    let names: Vec<&str> = first.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Base", "Super Saiyan", "Ultra Instinct"]);

    // Second read comes from the store and sorts the same way
    let second = service.load_forms("goku").await.unwrap();
    let names: Vec<&str> = second.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["Base", "Super Saiyan", "Ultra Instinct"]);
}

#[tokio::test]
async fn remote_failure_caches_nothing() {
    let store = seeded_store();
    let mut remote = MockRemoteClient::new();
    remote
        .expect_fetch_locations()
        .times(1)
        .returning(|_| Err(AppError::Api(500)));

    let service = DetailService::new(store.clone(), Arc::new(remote));

    match service.load_locations("goku").await {
        Err(AppError::Api(status)) => assert_eq!(status, 500),
        other => panic!("expected Api(500), got {:?}", other),
    }
    assert!(store.locations_for("goku").is_empty());
}

#[tokio::test]
async fn concurrent_location_loads_fetch_once() {
    let store = seeded_store();
    let mut remote = MockRemoteClient::new();
    remote
        .expect_fetch_locations()
        .times(1)
        .returning(|_| Ok(vec![location_record("loc-1", "2024-02-20T00:00:00Z", "goku")]));

    let service = Arc::new(DetailService::new(store, Arc::new(remote)));

    let first = tokio::spawn({
        let service = service.clone();
        async move { service.load_locations("goku").await }
    });
    let second = tokio::spawn({
        let service = service.clone();
        async move { service.load_locations("goku").await }
    });

    assert_eq!(first.await.unwrap().unwrap().len(), 1);
    assert_eq!(second.await.unwrap().unwrap().len(), 1);
}

#[tokio::test]
async fn form_lookup_finds_the_exact_name() {
    let store = seeded_store();
    let mut remote = MockRemoteClient::new();
    remote
        .expect_fetch_forms()
        .times(1)
        .returning(|_| {
            Ok(vec![
                form_record("form-1", "Base", "goku"),
                form_record("form-2", "Super Saiyan", "goku"),
            ])
        });

    let service = FormService::new(Arc::new(DetailService::new(store, Arc::new(remote))));

    let form = service.load_form("goku", "Super Saiyan").await.unwrap();
    assert_eq!(form.id, "form-2");
    assert_eq!(form.info, "Super Saiyan form");
}

#[tokio::test]
async fn missing_form_names_the_character_and_the_form() {
    let store = seeded_store();
    let mut remote = MockRemoteClient::new();
    remote
        .expect_fetch_forms()
        .times(1)
        .returning(|_| Ok(vec![form_record("form-1", "Base", "goku")]));

    let service = FormService::new(Arc::new(DetailService::new(store, Arc::new(remote))));

    match service.load_form("goku", "Golden Frieza").await {
        Err(AppError::FormNotFound { character_id, name }) => {
            assert_eq!(character_id, "goku");
            assert_eq!(name, "Golden Frieza");
        }
        other => panic!("expected FormNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn form_lookup_keeps_the_remote_error() {
    let store = seeded_store();
    let mut remote = MockRemoteClient::new();
    remote
        .expect_fetch_forms()
        .times(1)
        .returning(|_| Err(AppError::Api(401)));

    let service = FormService::new(Arc::new(DetailService::new(store, Arc::new(remote))));

    // A failed fetch is not "form not found"
    match service.load_form("goku", "Base").await {
        Err(AppError::Api(status)) => assert_eq!(status, 401),
        other => panic!("expected Api(401), got {:?}", other),
    }
}

#[tokio::test]
async fn form_lookup_for_absent_character_never_fetches() {
    let store = seeded_store();
    let mut remote = MockRemoteClient::new();
    remote.expect_fetch_forms().never();

    let service = FormService::new(Arc::new(DetailService::new(store, Arc::new(remote))));

    match service.load_form("nobody", "Base").await {
        Err(AppError::CharacterNotFound(id)) => assert_eq!(id, "nobody"),
        other => panic!("expected CharacterNotFound, got {:?}", other),
    }
}
