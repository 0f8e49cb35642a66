//! Substring search over bookmark URLs.
//!
//! Walks the `(url, created_at)` index in reverse and tests each URL for
//! containment. The index gives a stable order but cannot seek a substring,
//! so every call is a linear scan that stops once the window is full.

use rusqlite::Connection;

use crate::database::migrations::{require_index, URL_CREATED_AT_INDEX};
use crate::managers::bookmark_manager::{BookmarkManager, BOOKMARK_COLUMNS};
use crate::managers::pagination::{Step, WindowedScan};
use crate::types::bookmark::{normalize_url, Bookmark};
use crate::types::errors::{messages, BookmarkError, BookmarkResult};
use crate::types::settings::DEFAULT_MAX_PAGE_SIZE;

/// URL substring search with offset/limit windowing.
pub struct Searcher<'a> {
    conn: &'a Connection,
    max_page_size: usize,
}

impl<'a> Searcher<'a> {
    pub fn new(conn: &'a Connection, max_page_size: usize) -> Self {
        Self {
            conn,
            max_page_size: max_page_size.max(1),
        }
    }

    pub fn with_default_ceiling(conn: &'a Connection) -> Self {
        Self::new(conn, DEFAULT_MAX_PAGE_SIZE)
    }

    fn walk<F>(&self, mut visit: F) -> BookmarkResult<()>
    where
        F: FnMut(&rusqlite::Row<'_>) -> BookmarkResult<bool>,
    {
        require_index(self.conn, URL_CREATED_AT_INDEX)?;

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {BOOKMARK_COLUMNS} FROM bookmarks INDEXED BY {URL_CREATED_AT_INDEX} \
                 ORDER BY url DESC, created_at DESC"
            ))
            .map_err(BookmarkError::wrap(messages::SEARCH))?;
        let mut rows = stmt.query([]).map_err(BookmarkError::wrap(messages::SEARCH))?;

        while let Some(row) = rows.next().map_err(BookmarkError::wrap(messages::SEARCH))? {
            if !visit(row)? {
                break;
            }
        }
        Ok(())
    }

    /// Returns up to `limit` bookmarks whose URL contains `query`
    /// (case-insensitive), skipping the first `start_index` matches.
    ///
    /// An empty query matches every bookmark.
    pub fn search(&self, query: &str, start_index: usize, limit: usize) -> BookmarkResult<Vec<Bookmark>> {
        let needle = normalize_url(query);
        let target = limit.min(self.max_page_size);
        if target == 0 {
            require_index(self.conn, URL_CREATED_AT_INDEX)?;
            return Ok(Vec::new());
        }

        let mut scan = WindowedScan::new(start_index, target, start_index.saturating_add(target));
        let mut results = Vec::with_capacity(target);
        self.walk(|row| {
            let url: String = row.get(2).map_err(BookmarkError::wrap(messages::SEARCH))?;
            if !url.contains(&needle) {
                return Ok(true);
            }
            match scan.visit() {
                Step::Skip => {}
                Step::Collect => results.push(
                    BookmarkManager::row_to_bookmark(row).map_err(BookmarkError::wrap(messages::SEARCH))?,
                ),
                Step::Stop => return Ok(false),
            }
            Ok(!scan.is_done())
        })?;

        tracing::debug!(query = %needle, start_index, limit, returned = results.len(), "searched bookmarks");
        Ok(results)
    }

    /// Total number of bookmarks whose URL contains `query`.
    pub fn search_count(&self, query: &str) -> BookmarkResult<u64> {
        let needle = normalize_url(query);
        let mut count = 0u64;
        self.walk(|row| {
            let url: String = row.get(2).map_err(BookmarkError::wrap(messages::SEARCH))?;
            if url.contains(&needle) {
                count += 1;
            }
            Ok(true)
        })?;
        Ok(count)
    }
}
