//! Unit tests for the boundary operations in `BookmarkDataService`.

use bookmark_store::database::Database;
use bookmark_store::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use bookmark_store::managers::pagination::PageSession;
use bookmark_store::services::bookmark_data_service::BookmarkDataService;
use bookmark_store::types::bookmark::{BookmarkDraft, CreateBookmarkPayload, UpdateBookmarkPayload};
use bookmark_store::types::errors::BookmarkError;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn create(service: &BookmarkDataService<'_>, url: &str) -> bookmark_store::types::bookmark::Bookmark {
    service
        .create_bookmark(CreateBookmarkPayload {
            url: url.to_string(),
            name: None,
        })
        .unwrap()
}

#[test]
fn test_create_assigns_id_group_and_timestamps() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);

    let created = create(&service, "https://www.rust-lang.org/learn");
    assert!(uuid::Uuid::parse_str(&created.id).is_ok());
    assert_eq!(created.bookmark_group_id, "default");
    assert_eq!(created.name, "rust-lang org - learn");
    assert_eq!(created.created_at, created.modified_at);
    assert_eq!(service.get_bookmark(&created.id).unwrap(), Some(created));
}

#[test]
fn test_create_keeps_explicit_name() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    let created = service
        .create_bookmark(CreateBookmarkPayload {
            url: "https://example.com".to_string(),
            name: Some("My site".to_string()),
        })
        .unwrap();
    assert_eq!(created.name, "My site");
}

#[test]
fn test_create_rejects_invalid_url() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    let err = service
        .create_bookmark(CreateBookmarkPayload {
            url: "example.com".to_string(),
            name: None,
        })
        .unwrap_err();
    assert!(matches!(err, BookmarkError::InvalidUrl(_)));
    assert_eq!(service.get_bookmarks_count().unwrap(), 0);
}

#[test]
fn test_create_duplicate_url_differing_in_case() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    create(&service, "HTTPS://EXAMPLE.COM/A");

    let err = service
        .create_bookmark(CreateBookmarkPayload {
            url: "https://example.com/a".to_string(),
            name: None,
        })
        .unwrap_err();
    assert!(matches!(err, BookmarkError::DuplicateUrl(_)));
    assert!(err.to_string().contains("already exists"));
    assert_eq!(service.get_bookmarks_count().unwrap(), 1);
}

#[test]
fn test_update_unknown_id_is_not_found() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    let err = service
        .update_bookmark(UpdateBookmarkPayload {
            id: "ghost".to_string(),
            url: "https://example.com".to_string(),
            name: None,
        })
        .unwrap_err();
    assert_eq!(err.to_string(), "The bookmark with ID 'ghost' does not exist");
    assert_eq!(service.get_bookmarks_count().unwrap(), 0);
}

#[test]
fn test_update_changes_url_and_preserves_created_at() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    let created = create(&service, "https://example.com/old");

    let updated = service
        .update_bookmark(UpdateBookmarkPayload {
            id: created.id.clone(),
            url: "https://example.com/new".to_string(),
            name: Some("New".to_string()),
        })
        .unwrap();

    assert_eq!(updated.url, "https://example.com/new");
    assert_eq!(updated.name, "New");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.modified_at >= created.modified_at);
}

#[test]
fn test_url_only_update_bumps_modified_at() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    BookmarkManager::new(db.connection())
        .upsert(
            BookmarkDraft::new("bk-1")
                .with_url("https://example.com/old")
                .with_name("Kept")
                .with_created_at(1_000),
        )
        .unwrap();

    let before = BookmarkManager::now();
    let updated = service
        .update_bookmark(UpdateBookmarkPayload {
            id: "bk-1".to_string(),
            url: "https://example.com/new".to_string(),
            name: None,
        })
        .unwrap();
    let after = BookmarkManager::now();

    assert_eq!(updated.name, "Kept");
    assert_eq!(updated.created_at, 1_000);
    assert!(updated.modified_at >= before && updated.modified_at <= after);
}

#[test]
fn test_update_to_taken_url_is_rejected() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    let a = create(&service, "https://a.example");
    let b = create(&service, "https://b.example");

    let err = service
        .update_bookmark(UpdateBookmarkPayload {
            id: b.id.clone(),
            url: a.url.clone(),
            name: None,
        })
        .unwrap_err();
    assert!(matches!(err, BookmarkError::DuplicateUrl(_)));
    assert_eq!(service.get_bookmark(&b.id).unwrap(), Some(b));
}

#[test]
fn test_delete_twice_succeeds() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    let created = create(&service, "https://example.com");

    assert_eq!(service.delete_bookmark(&created.id).unwrap(), created.id);
    assert_eq!(service.delete_bookmark(&created.id).unwrap(), created.id);
    assert_eq!(service.get_bookmark(&created.id).unwrap(), None);
}

#[test]
fn test_paginated_count_and_search_through_service() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    assert_eq!(service.seed_sample_bookmarks(25).unwrap(), 25);

    assert_eq!(service.get_bookmarks_count().unwrap(), 25);

    let mut session = PageSession::new();
    let first = service.get_bookmarks_paginated(&mut session, 0, 10).unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].url, "https://example.com/bookmark-25");
    assert!(first.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    assert_eq!(service.get_bookmark_search_result_count("bookmark-1").unwrap(), 11);
    let found = service.search_bookmarks_by_url("bookmark-2", 0, 3).unwrap();
    assert_eq!(found.len(), 3);
    assert!(found.iter().all(|b| b.url.contains("bookmark-2")));

    assert_eq!(service.get_all_bookmarks().unwrap().len(), 25);
}

#[test]
fn test_seeding_twice_skips_existing_urls() {
    let db = setup();
    let service = BookmarkDataService::new(db.connection(), 50);
    assert_eq!(service.seed_sample_bookmarks(5).unwrap(), 5);
    assert_eq!(service.seed_sample_bookmarks(8).unwrap(), 3);
    assert_eq!(service.get_bookmarks_count().unwrap(), 8);
}
