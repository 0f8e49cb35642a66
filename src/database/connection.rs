//! SQLite database connection management for the bookmark store.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and automatically runs schema migrations on open.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;
use crate::types::errors::{messages, BookmarkError, BookmarkResult};

/// Owned handle to the bookmark database.
///
/// There is no process-wide instance: the composition root opens one and
/// lends the connection to managers by reference.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `BookmarkError::Storage` if the connection cannot be established
    /// or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> BookmarkResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening bookmark database");
        let conn = Connection::open(path).map_err(BookmarkError::wrap(messages::OPEN))?;
        Self::from_connection(conn)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// The database is discarded when the `Database` is dropped.
    pub fn open_in_memory() -> BookmarkResult<Self> {
        let conn = Connection::open_in_memory().map_err(BookmarkError::wrap(messages::OPEN))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> BookmarkResult<Self> {
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Brings the schema to [`migrations::CURRENT_SCHEMA_VERSION`] and repairs
    /// missing indexes. Idempotent.
    pub fn run_migrations(&self) -> BookmarkResult<()> {
        migrations::run_all(&self.conn).map_err(BookmarkError::wrap(messages::OPEN))
    }

    /// Schema version currently recorded in the database.
    pub fn schema_version(&self) -> i32 {
        migrations::get_schema_version(&self.conn)
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
