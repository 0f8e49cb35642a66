//! Unit tests for the database layer (connection + migrations).

use bookmark_store::database::migrations::{
    self, require_index, CREATED_AT_INDEX, CURRENT_SCHEMA_VERSION, URL_CREATED_AT_INDEX, URL_INDEX,
};
use bookmark_store::database::Database;
use bookmark_store::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use bookmark_store::managers::search::Searcher;
use bookmark_store::types::bookmark::BookmarkDraft;
use bookmark_store::types::errors::BookmarkError;
use tempfile::TempDir;

fn index_is_unique(db: &Database, name: &str) -> bool {
    db.connection()
        .query_row(
            "SELECT \"unique\" FROM pragma_index_list('bookmarks') WHERE name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .map(|u| u == 1)
        .unwrap_or(false)
}

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_schema_reaches_current_version() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.schema_version(), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_create_store_and_indexes() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();

    let table: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='bookmarks'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(table, "bookmarks table should exist after migrations");

    for index in [URL_INDEX, CREATED_AT_INDEX, URL_CREATED_AT_INDEX] {
        assert!(require_index(conn, index).is_ok(), "index '{}' should exist", index);
    }
    assert!(migrations::missing_indexes(conn).unwrap().is_empty());
}

#[test]
fn test_index_uniqueness_flags() {
    let db = Database::open_in_memory().unwrap();
    assert!(index_is_unique(&db, URL_INDEX));
    assert!(!index_is_unique(&db, CREATED_AT_INDEX));
    assert!(!index_is_unique(&db, URL_CREATED_AT_INDEX));
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().unwrap();
    let result = migrations::run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
    assert_eq!(db.schema_version(), CURRENT_SCHEMA_VERSION);

    let versions: i64 = db
        .connection()
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(versions, CURRENT_SCHEMA_VERSION as i64);
}

#[test]
fn test_missing_index_is_reported_then_repaired() {
    let db = Database::open_in_memory().unwrap();
    db.connection()
        .execute_batch("DROP INDEX idx_bookmarks_created_at;")
        .unwrap();

    match require_index(db.connection(), CREATED_AT_INDEX) {
        Err(BookmarkError::MissingIndex(name)) => assert_eq!(name, CREATED_AT_INDEX),
        other => panic!("expected MissingIndex, got {:?}", other),
    }
    assert_eq!(
        migrations::missing_indexes(db.connection()).unwrap(),
        vec![CREATED_AT_INDEX]
    );

    db.run_migrations().unwrap();
    assert!(require_index(db.connection(), CREATED_AT_INDEX).is_ok());
}

#[test]
fn test_upgrade_from_v1_keeps_records() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.db");

    // A version-1 database: store exists, indexes do not.
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY, applied_at INTEGER NOT NULL, description TEXT NOT NULL);
             INSERT INTO schema_version VALUES (1, 0, 'legacy');
             CREATE TABLE bookmarks (
                 id TEXT PRIMARY KEY, name TEXT NOT NULL, url TEXT NOT NULL,
                 bookmark_group_id TEXT NOT NULL DEFAULT 'default',
                 created_at INTEGER NOT NULL, modified_at INTEGER NOT NULL);
             INSERT INTO bookmarks VALUES ('bk-1', 'Old', 'https://old.example.com', 'default', 10, 10);",
        )
        .unwrap();
    }

    let db = Database::open(&path).unwrap();
    assert_eq!(db.schema_version(), CURRENT_SCHEMA_VERSION);
    assert!(migrations::missing_indexes(db.connection()).unwrap().is_empty());

    let mgr = BookmarkManager::new(db.connection());
    let old = mgr.get_by_id("bk-1").unwrap().expect("legacy record survives upgrade");
    assert_eq!(old.name, "Old");
    assert_eq!(old.created_at, 10);
}

#[test]
fn test_upgrade_from_v1_normalizes_stored_urls() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("legacy.db");

    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY, applied_at INTEGER NOT NULL, description TEXT NOT NULL);
             INSERT INTO schema_version VALUES (1, 0, 'legacy');
             CREATE TABLE bookmarks (
                 id TEXT PRIMARY KEY, name TEXT NOT NULL, url TEXT NOT NULL,
                 bookmark_group_id TEXT NOT NULL DEFAULT 'default',
                 created_at INTEGER NOT NULL, modified_at INTEGER NOT NULL);
             INSERT INTO bookmarks VALUES ('mixed', 'Mixed', ' https://Old.Example.com ', 'default', 10, 10);
             INSERT INTO bookmarks VALUES ('clean', 'Clean', 'https://dup.example', 'default', 20, 20);
             INSERT INTO bookmarks VALUES ('clash', 'Clash', 'HTTPS://DUP.example', 'default', 30, 30);",
        )
        .unwrap();
    }

    let db = Database::open(&path).unwrap();
    assert!(migrations::missing_indexes(db.connection()).unwrap().is_empty());

    let mgr = BookmarkManager::new(db.connection());
    let mixed = mgr.get_by_url("https://old.example.com").unwrap().expect("legacy url is normalized");
    assert_eq!(mixed.id, "mixed");

    let searcher = Searcher::with_default_ceiling(db.connection());
    let hits = searcher.search("old.example", 0, 10).unwrap();
    assert_eq!(hits.len(), 1);

    // The clashing row keeps its stored url rather than breaking the unique index.
    assert_eq!(mgr.get_by_id("clash").unwrap().unwrap().url, "HTTPS://DUP.example");
    assert_eq!(mgr.get_by_url("https://dup.example").unwrap().unwrap().id, "clean");
}

#[test]
fn test_open_file_database_persists() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bookmarks.db");

    {
        let db = Database::open(&path).unwrap();
        let mut mgr = BookmarkManager::new(db.connection());
        mgr.upsert(BookmarkDraft::new("bk-1").with_url("https://example.com"))
            .unwrap();
    }
    assert!(path.exists(), "Database file should exist on disk");

    let db = Database::open(&path).unwrap();
    let mgr = BookmarkManager::new(db.connection());
    assert_eq!(mgr.count().unwrap(), 1);
}

#[test]
fn test_url_index_rejects_duplicates_at_schema_level() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection();
    conn.execute(
        "INSERT INTO bookmarks (id, name, url, created_at, modified_at) VALUES ('a', 'A', 'https://x.com', 1, 1)",
        [],
    )
    .unwrap();
    let dup = conn.execute(
        "INSERT INTO bookmarks (id, name, url, created_at, modified_at) VALUES ('b', 'B', 'https://x.com', 2, 2)",
        [],
    );
    assert!(dup.is_err(), "unique url index must reject a second row with the same url");
}
