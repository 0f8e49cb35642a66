//! Reverse-chronological pagination over the `created_at` index.
//!
//! SQLite has no offset-addressable index, so a page is produced by stepping
//! a cursor (`Rows::next`) newest-first, skipping `start_index` rows and then
//! collecting up to `limit`. Results are consistent within one call only;
//! writes between calls can shift which rows land in a given window.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::database::migrations::{require_index, CREATED_AT_INDEX};
use crate::managers::bookmark_manager::{BookmarkManager, BOOKMARK_COLUMNS};
use crate::types::bookmark::Bookmark;
use crate::types::errors::{messages, BookmarkError, BookmarkResult};
use crate::types::settings::DEFAULT_MAX_PAGE_SIZE;

/// Per-session paging state, owned by the caller and passed to every
/// [`Paginator::page`] call of the same browsing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSession {
    /// Limit used by the previous call, if any.
    #[serde(default)]
    pub last_limit: Option<usize>,
}

impl PageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `limit` and returns how far the walk bound must be widened:
    /// by the previous limit when the page size shrank, otherwise zero.
    fn observe(&mut self, limit: usize) -> usize {
        let widen = match self.last_limit {
            Some(previous) if limit < previous => previous,
            _ => 0,
        };
        self.last_limit = Some(limit);
        widen
    }
}

/// What a windowed scan wants done with the row just visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Skip,
    Collect,
    Stop,
}

/// Skip/collect bookkeeping for a bounded cursor walk.
///
/// Only rows passed to [`WindowedScan::visit`] count, so callers that filter
/// (search) simply do not report rejected rows.
///
/// `bound` is a ceiling on visited rows, never below `start + target`. It
/// cannot cut a window short: the scan collects `target` rows no later than
/// the `start + target`th visit. Widening it after a page-size change only
/// raises the ceiling, so a page's contents depend on `start` and `target` alone.
#[derive(Debug)]
pub(crate) struct WindowedScan {
    start: usize,
    target: usize,
    bound: usize,
    visited: usize,
    collected: usize,
}

impl WindowedScan {
    pub(crate) fn new(start: usize, target: usize, bound: usize) -> Self {
        Self {
            start,
            target,
            bound: bound.max(start.saturating_add(target)),
            visited: 0,
            collected: 0,
        }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.collected >= self.target || self.visited >= self.bound
    }

    pub(crate) fn visit(&mut self) -> Step {
        if self.is_done() {
            return Step::Stop;
        }
        self.visited += 1;
        if self.visited <= self.start {
            Step::Skip
        } else {
            self.collected += 1;
            Step::Collect
        }
    }
}

/// Offset/limit pagination over bookmarks, newest first.
pub struct Paginator<'a> {
    conn: &'a Connection,
    max_page_size: usize,
}

impl<'a> Paginator<'a> {
    /// `max_page_size` caps every page regardless of the requested limit.
    pub fn new(conn: &'a Connection, max_page_size: usize) -> Self {
        Self {
            conn,
            max_page_size: max_page_size.max(1),
        }
    }

    pub fn with_default_ceiling(conn: &'a Connection) -> Self {
        Self::new(conn, DEFAULT_MAX_PAGE_SIZE)
    }

    pub fn max_page_size(&self) -> usize {
        self.max_page_size
    }

    /// Returns at most `limit` bookmarks ordered by `created_at` descending,
    /// skipping the first `start_index`.
    ///
    /// # Errors
    /// `MissingIndex` if the `created_at` index is absent; nothing is read in that case.
    pub fn page(
        &self,
        session: &mut PageSession,
        start_index: usize,
        limit: usize,
    ) -> BookmarkResult<Vec<Bookmark>> {
        require_index(self.conn, CREATED_AT_INDEX)?;

        let widen = session.observe(limit);
        let target = limit.min(self.max_page_size);
        if target == 0 {
            return Ok(Vec::new());
        }
        let bound = start_index
            .saturating_add(target)
            .saturating_add(widen);

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {BOOKMARK_COLUMNS} FROM bookmarks INDEXED BY {CREATED_AT_INDEX} \
                 ORDER BY created_at DESC, rowid DESC"
            ))
            .map_err(BookmarkError::wrap(messages::LIST))?;
        let mut rows = stmt.query([]).map_err(BookmarkError::wrap(messages::LIST))?;

        let mut scan = WindowedScan::new(start_index, target, bound);
        let mut page = Vec::with_capacity(target);
        while let Some(row) = rows.next().map_err(BookmarkError::wrap(messages::LIST))? {
            match scan.visit() {
                Step::Skip => continue,
                Step::Collect => page.push(
                    BookmarkManager::row_to_bookmark(row).map_err(BookmarkError::wrap(messages::LIST))?,
                ),
                Step::Stop => break,
            }
            if scan.is_done() {
                break;
            }
        }

        tracing::debug!(start_index, limit, widen, returned = page.len(), "paged bookmarks");
        Ok(page)
    }
}
