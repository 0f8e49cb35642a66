//! Bookmark Manager: the record store.
//!
//! Implements `BookmarkManagerTrait`: point lookups, insert-or-replace with
//! URL uniqueness, delete and count, backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

use crate::types::bookmark::{
    default_name_for_url, normalize_url, Bookmark, BookmarkDraft, DEFAULT_BOOKMARK_GROUP,
};
use crate::types::errors::{messages, BookmarkError, BookmarkResult};

pub(crate) const BOOKMARK_COLUMNS: &str =
    "id, name, url, bookmark_group_id, created_at, modified_at";

/// Trait defining record store operations.
pub trait BookmarkManagerTrait {
    fn get_by_id(&self, id: &str) -> BookmarkResult<Option<Bookmark>>;
    fn get_by_url(&self, url: &str) -> BookmarkResult<Option<Bookmark>>;
    /// Inserts or merges `draft`, rejecting URLs owned by another id.
    fn upsert(&mut self, draft: BookmarkDraft) -> BookmarkResult<Bookmark>;
    /// Removes a bookmark. Deleting an unknown id succeeds.
    fn delete(&mut self, id: &str) -> BookmarkResult<String>;
    fn count(&self) -> BookmarkResult<u64>;
    /// All bookmarks, newest first.
    fn list_all(&self) -> BookmarkResult<Vec<Bookmark>>;
    /// Removes every bookmark. Returns how many were removed.
    fn clear(&mut self) -> BookmarkResult<u64>;
}

/// Record store backed by a SQLite connection.
pub struct BookmarkManager<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkManager<'a> {
    /// Creates a new `BookmarkManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Returns the current UNIX timestamp in milliseconds.
    pub fn now() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Reads a single `Bookmark` row (selected with `BOOKMARK_COLUMNS`).
    pub(crate) fn row_to_bookmark(row: &Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            name: row.get(1)?,
            url: row.get(2)?,
            bookmark_group_id: row.get(3)?,
            created_at: row.get(4)?,
            modified_at: row.get(5)?,
        })
    }

    fn find_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Bookmark>> {
        conn.query_row(
            &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE id = ?1"),
            params![id],
            Self::row_to_bookmark,
        )
        .optional()
    }

    fn find_by_url(conn: &Connection, normalized_url: &str) -> rusqlite::Result<Option<Bookmark>> {
        conn.query_row(
            &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks WHERE url = ?1"),
            params![normalized_url],
            Self::row_to_bookmark,
        )
        .optional()
    }

    /// Merges `draft` over `existing` (if any) and stamps timestamps.
    fn merge(draft: BookmarkDraft, existing: Option<Bookmark>, now: i64) -> BookmarkResult<Bookmark> {
        let url = draft.url.as_deref().map(normalize_url);
        match existing {
            Some(current) => {
                let url = match url {
                    Some(url) if url.is_empty() => {
                        return Err(BookmarkError::InvalidUrl(draft.url.unwrap_or_default()))
                    }
                    Some(url) => url,
                    None => current.url.clone(),
                };
                let name = draft.name.unwrap_or_else(|| current.name.clone());
                // Only name and url count as a semantic change.
                let changed = name != current.name || url != current.url;
                Ok(Bookmark {
                    modified_at: if changed { now } else { current.modified_at },
                    bookmark_group_id: draft
                        .bookmark_group_id
                        .unwrap_or(current.bookmark_group_id),
                    created_at: current.created_at,
                    id: current.id,
                    name,
                    url,
                })
            }
            None => {
                let url = match url {
                    Some(url) if !url.is_empty() => url,
                    _ => return Err(BookmarkError::InvalidUrl(draft.url.unwrap_or_default())),
                };
                let created_at = draft.created_at.unwrap_or(now);
                Ok(Bookmark {
                    name: draft.name.unwrap_or_else(|| default_name_for_url(&url)),
                    bookmark_group_id: draft
                        .bookmark_group_id
                        .unwrap_or_else(|| DEFAULT_BOOKMARK_GROUP.id.to_string()),
                    id: draft.id,
                    url,
                    created_at,
                    modified_at: created_at,
                })
            }
        }
    }

    fn write(tx: &Transaction<'_>, bookmark: &Bookmark) -> rusqlite::Result<usize> {
        tx.execute(
            "INSERT INTO bookmarks (id, name, url, bookmark_group_id, created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                url = excluded.url,
                bookmark_group_id = excluded.bookmark_group_id,
                modified_at = excluded.modified_at",
            params![
                bookmark.id,
                bookmark.name,
                bookmark.url,
                bookmark.bookmark_group_id,
                bookmark.created_at,
                bookmark.modified_at,
            ],
        )
    }

    fn is_constraint_violation(err: &rusqlite::Error) -> bool {
        err.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
    }
}

impl<'a> BookmarkManagerTrait for BookmarkManager<'a> {
    fn get_by_id(&self, id: &str) -> BookmarkResult<Option<Bookmark>> {
        tracing::debug!(id, "get bookmark by id");
        Self::find_by_id(self.conn, id).map_err(BookmarkError::wrap(messages::GET))
    }

    fn get_by_url(&self, url: &str) -> BookmarkResult<Option<Bookmark>> {
        let url = normalize_url(url);
        tracing::debug!(%url, "get bookmark by url");
        Self::find_by_url(self.conn, &url).map_err(BookmarkError::wrap(messages::GET))
    }

    /// The uniqueness check and the write share one IMMEDIATE transaction,
    /// so no other writer can claim the URL in between.
    fn upsert(&mut self, draft: BookmarkDraft) -> BookmarkResult<Bookmark> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(BookmarkError::wrap(messages::SAVE))?;

        if let Some(url) = draft.url.as_deref().map(normalize_url) {
            let owner = Self::find_by_url(&tx, &url).map_err(BookmarkError::wrap(messages::SAVE))?;
            if let Some(owner) = owner {
                if owner.id != draft.id {
                    tracing::warn!(%url, id = %draft.id, owner = %owner.id, "rejected duplicate url");
                    return Err(BookmarkError::DuplicateUrl(url));
                }
            }
        }

        let existing = Self::find_by_id(&tx, &draft.id).map_err(BookmarkError::wrap(messages::SAVE))?;
        let is_new = existing.is_none();
        let bookmark = Self::merge(draft, existing, Self::now())?;

        Self::write(&tx, &bookmark).map_err(|e| {
            if Self::is_constraint_violation(&e) {
                BookmarkError::DuplicateUrl(bookmark.url.clone())
            } else {
                BookmarkError::storage(messages::SAVE, e)
            }
        })?;
        tx.commit().map_err(BookmarkError::wrap(messages::SAVE))?;

        tracing::info!(id = %bookmark.id, url = %bookmark.url, created = is_new, "saved bookmark");
        Ok(bookmark)
    }

    fn delete(&mut self, id: &str) -> BookmarkResult<String> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])
            .map_err(BookmarkError::wrap(messages::DELETE))?;
        tracing::info!(id, removed = affected > 0, "deleted bookmark");
        Ok(id.to_string())
    }

    fn count(&self) -> BookmarkResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bookmarks", [], |row| row.get(0))
            .map_err(BookmarkError::wrap(messages::COUNT))?;
        Ok(count as u64)
    }

    fn list_all(&self) -> BookmarkResult<Vec<Bookmark>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {BOOKMARK_COLUMNS} FROM bookmarks ORDER BY created_at DESC, rowid DESC"
            ))
            .map_err(BookmarkError::wrap(messages::LIST))?;

        let rows = stmt
            .query_map([], Self::row_to_bookmark)
            .map_err(BookmarkError::wrap(messages::LIST))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(BookmarkError::wrap(messages::LIST))?);
        }
        Ok(results)
    }

    fn clear(&mut self) -> BookmarkResult<u64> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks", [])
            .map_err(BookmarkError::wrap(messages::DELETE))?;
        tracing::info!(removed = affected, "cleared bookmarks");
        Ok(affected as u64)
    }
}
