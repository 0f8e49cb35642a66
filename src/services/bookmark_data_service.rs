//! Boundary operations consumed by the application state layer.
//!
//! `BookmarkDataService` composes the record store, paginator and searcher
//! over one borrowed connection. Each method returns a single result; it
//! performs no retries.

use rusqlite::Connection;
use uuid::Uuid;

use crate::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use crate::managers::pagination::{PageSession, Paginator};
use crate::managers::search::Searcher;
use crate::services::sample_data::sample_bookmarks;
use crate::types::bookmark::{
    validate_url, Bookmark, BookmarkDraft, CreateBookmarkPayload, UpdateBookmarkPayload,
    DEFAULT_BOOKMARK_GROUP,
};
use crate::types::errors::{BookmarkError, BookmarkResult};

pub struct BookmarkDataService<'a> {
    conn: &'a Connection,
    max_page_size: usize,
}

impl<'a> BookmarkDataService<'a> {
    pub fn new(conn: &'a Connection, max_page_size: usize) -> Self {
        Self { conn, max_page_size }
    }

    fn records(&self) -> BookmarkManager<'a> {
        BookmarkManager::new(self.conn)
    }

    pub fn get_bookmarks_paginated(
        &self,
        session: &mut PageSession,
        start_index: usize,
        limit: usize,
    ) -> BookmarkResult<Vec<Bookmark>> {
        Paginator::new(self.conn, self.max_page_size).page(session, start_index, limit)
    }

    pub fn get_bookmarks_count(&self) -> BookmarkResult<u64> {
        self.records().count()
    }

    pub fn get_bookmark_search_result_count(&self, search: &str) -> BookmarkResult<u64> {
        Searcher::new(self.conn, self.max_page_size).search_count(search)
    }

    /// Absent ids resolve to `Ok(None)`.
    pub fn get_bookmark(&self, id: &str) -> BookmarkResult<Option<Bookmark>> {
        self.records().get_by_id(id)
    }

    /// Fails with `NotFound` for unknown ids and `DuplicateUrl` when another
    /// bookmark owns the URL. `modified_at` only moves when name or url changed.
    pub fn update_bookmark(&self, payload: UpdateBookmarkPayload) -> BookmarkResult<Bookmark> {
        validate_url(&payload.url)?;
        let mut records = self.records();
        if records.get_by_id(&payload.id)?.is_none() {
            return Err(BookmarkError::NotFound(payload.id));
        }
        let mut draft = BookmarkDraft::new(payload.id).with_url(payload.url);
        draft.name = payload.name;
        records.upsert(draft)
    }

    pub fn delete_bookmark(&self, id: &str) -> BookmarkResult<String> {
        self.records().delete(id)
    }

    /// Assigns a fresh id, the default group and creation timestamps.
    pub fn create_bookmark(&self, payload: CreateBookmarkPayload) -> BookmarkResult<Bookmark> {
        validate_url(&payload.url)?;
        let mut draft = BookmarkDraft::new(Uuid::new_v4().to_string()).with_url(payload.url);
        draft.name = payload.name.filter(|n| !n.trim().is_empty());
        draft.bookmark_group_id = Some(DEFAULT_BOOKMARK_GROUP.id.to_string());
        self.records().upsert(draft)
    }

    pub fn search_bookmarks_by_url(
        &self,
        query: &str,
        start_index: usize,
        limit: usize,
    ) -> BookmarkResult<Vec<Bookmark>> {
        Searcher::new(self.conn, self.max_page_size).search(query, start_index, limit)
    }

    pub fn get_all_bookmarks(&self) -> BookmarkResult<Vec<Bookmark>> {
        self.records().list_all()
    }

    /// Inserts `count` sample bookmarks, skipping URLs that already exist.
    /// Returns how many were inserted.
    pub fn seed_sample_bookmarks(&self, count: usize) -> BookmarkResult<usize> {
        let mut records = self.records();
        let mut inserted = 0;
        for draft in sample_bookmarks(count, BookmarkManager::now()) {
            match records.upsert(draft) {
                Ok(_) => inserted += 1,
                Err(BookmarkError::DuplicateUrl(_)) => {}
                Err(e) => return Err(e),
            }
        }
        tracing::info!(requested = count, inserted, "seeded sample bookmarks");
        Ok(inserted)
    }
}
