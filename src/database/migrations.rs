//! Schema migrations for the bookmark store.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp. After
//! the versioned steps, every secondary index is re-asserted so a database
//! that lost an index is repaired on the next open.

use std::collections::HashSet;

use rusqlite::{params, Connection, OptionalExtension};

use crate::types::bookmark::normalize_url;
use crate::types::errors::{BookmarkError, BookmarkResult};

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Unique index on `url`.
pub const URL_INDEX: &str = "idx_bookmarks_url";
/// Index on `created_at`, walked in reverse for pagination.
pub const CREATED_AT_INDEX: &str = "idx_bookmarks_created_at";
/// Composite index on `(url, created_at)`, walked in reverse for search.
pub const URL_CREATED_AT_INDEX: &str = "idx_bookmarks_url_created_at";

/// Index definitions, in creation order.
const INDEXES: [(&str, &str); 3] = [
    (
        URL_INDEX,
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookmarks_url ON bookmarks(url)",
    ),
    (
        CREATED_AT_INDEX,
        "CREATE INDEX IF NOT EXISTS idx_bookmarks_created_at ON bookmarks(created_at)",
    ),
    (
        URL_CREATED_AT_INDEX,
        "CREATE INDEX IF NOT EXISTS idx_bookmarks_url_created_at ON bookmarks(url, created_at)",
    ),
];

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Safe to call on every startup: applied versions are skipped and index
/// creation is idempotent.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Create bookmarks store")?;
        tracing::info!(version = 1, "applied schema migration");
    }

    if current < 2 {
        let rewritten = normalize_stored_urls(conn)?;
        if rewritten > 0 {
            tracing::info!(rewritten, "normalized stored bookmark urls");
        }
        ensure_indexes(conn)?;
        record_version(conn, 2, "Add url, created_at and (url, created_at) indexes")?;
        tracing::info!(version = 2, "applied schema migration");
    }

    // Repair pass for databases that are at the current version but lost an index.
    let repaired = missing_indexes(conn)?;
    if !repaired.is_empty() {
        tracing::warn!(indexes = ?repaired, "recreating missing indexes");
        ensure_indexes(conn)?;
    }

    Ok(())
}

fn record_version(conn: &Connection, version: i32, description: &str) -> Result<(), rusqlite::Error> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        params![version, now, description],
    )?;
    Ok(())
}

/// V1: the record store, keyed by id.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS bookmarks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            url TEXT NOT NULL,
            bookmark_group_id TEXT NOT NULL DEFAULT 'default',
            created_at INTEGER NOT NULL,
            modified_at INTEGER NOT NULL
        );
        ",
    )
}

/// V2 data step: rewrite rows written before url normalization.
///
/// A url whose normalized form is already taken is left as stored, so the
/// unique index can still be built.
fn normalize_stored_urls(conn: &Connection) -> Result<usize, rusqlite::Error> {
    let rows: Vec<(String, String)> = {
        let mut stmt = conn.prepare("SELECT id, url FROM bookmarks ORDER BY created_at, rowid")?;
        let mapped = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        mapped.collect::<Result<_, _>>()?
    };

    let mut taken: HashSet<String> = rows
        .iter()
        .filter(|(_, url)| normalize_url(url) == *url)
        .map(|(_, url)| url.clone())
        .collect();

    let mut rewritten = 0;
    for (id, url) in rows {
        let normalized = normalize_url(&url);
        if normalized == url {
            continue;
        }
        if !taken.insert(normalized.clone()) {
            tracing::warn!(%id, %url, "normalized url already taken; keeping stored url");
            continue;
        }
        conn.execute(
            "UPDATE bookmarks SET url = ?1 WHERE id = ?2",
            params![normalized, id],
        )?;
        rewritten += 1;
    }
    Ok(rewritten)
}

/// V2 and repair: create every secondary index that does not exist yet.
fn ensure_indexes(conn: &Connection) -> Result<(), rusqlite::Error> {
    for (_, sql) in INDEXES {
        conn.execute(sql, [])?;
    }
    Ok(())
}

fn index_exists(conn: &Connection, name: &str) -> Result<bool, rusqlite::Error> {
    conn.query_row(
        "SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1",
        params![name],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
}

/// Names of required indexes that are absent from the schema.
pub fn missing_indexes(conn: &Connection) -> Result<Vec<&'static str>, rusqlite::Error> {
    let mut missing = Vec::new();
    for (name, _) in INDEXES {
        if !index_exists(conn, name)? {
            missing.push(name);
        }
    }
    Ok(missing)
}

/// Fails with [`BookmarkError::MissingIndex`] when `name` is not in the schema.
///
/// Queries call this before opening a cursor so a broken schema surfaces as a
/// configuration error instead of a slow or wrong result.
pub fn require_index(conn: &Connection, name: &str) -> BookmarkResult<()> {
    let exists = index_exists(conn, name)
        .map_err(|e| BookmarkError::storage("Failed to inspect schema.", e))?;
    if exists {
        Ok(())
    } else {
        Err(BookmarkError::MissingIndex(name.to_string()))
    }
}
