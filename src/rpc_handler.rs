//! RPC method handler for the bookmark store JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! `handle_method` is the boundary the external state layer talks to: each
//! method maps to one `BookmarkDataService` operation and returns one result.

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::pagination::PageSession;
use crate::types::bookmark::{CreateBookmarkPayload, UpdateBookmarkPayload};

fn str_param<'p>(params: &'p Value, key: &'static str) -> Result<&'p str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn usize_param(params: &Value, key: &'static str, default: usize) -> Result<usize, String> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(v) => v
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| format!("invalid {}: expected a non-negative integer", key)),
    }
}

/// Dispatch a JSON-RPC method call to the bookmark store.
///
/// Returns `Ok(Value)` on success or `Err(String)` with the error's display text.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Reads ───
        "bookmarks.page" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let start = usize_param(params, "startIndex", 0)?;
            let limit = usize_param(params, "limit", a.settings.default_page_size)?;
            let mut session: PageSession = match params.get("session") {
                None | Some(Value::Null) => PageSession::default(),
                Some(v) => serde_json::from_value(v.clone()).map_err(|e| format!("invalid session: {}", e))?,
            };
            let items = a
                .bookmarks()
                .get_bookmarks_paginated(&mut session, start, limit)
                .map_err(|e| e.to_string())?;
            Ok(json!({"items": items, "session": session}))
        }
        "bookmarks.count" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let count = a.bookmarks().get_bookmarks_count().map_err(|e| e.to_string())?;
            Ok(json!({"count": count}))
        }
        "bookmarks.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let items = a.bookmarks().get_all_bookmarks().map_err(|e| e.to_string())?;
            Ok(json!({"items": items}))
        }
        "bookmarks.get" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let bookmark = a.bookmarks().get_bookmark(id).map_err(|e| e.to_string())?;
            Ok(json!({"bookmark": bookmark}))
        }
        "bookmarks.search" => {
            let query = str_param(params, "query")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let start = usize_param(params, "startIndex", 0)?;
            let limit = usize_param(params, "limit", a.settings.default_page_size)?;
            let items = a
                .bookmarks()
                .search_bookmarks_by_url(query, start, limit)
                .map_err(|e| e.to_string())?;
            Ok(json!({"items": items}))
        }
        "bookmarks.searchCount" => {
            let query = str_param(params, "query")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let count = a
                .bookmarks()
                .get_bookmark_search_result_count(query)
                .map_err(|e| e.to_string())?;
            Ok(json!({"count": count}))
        }

        // ─── Writes ───
        "bookmarks.create" => {
            let payload: CreateBookmarkPayload =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid payload: {}", e))?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let bookmark = a.bookmarks().create_bookmark(payload).map_err(|e| e.to_string())?;
            Ok(json!(bookmark))
        }
        "bookmarks.update" => {
            let payload: UpdateBookmarkPayload =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid payload: {}", e))?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let bookmark = a.bookmarks().update_bookmark(payload).map_err(|e| e.to_string())?;
            Ok(json!(bookmark))
        }
        "bookmarks.delete" => {
            let id = str_param(params, "id")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let id = a.bookmarks().delete_bookmark(id).map_err(|e| e.to_string())?;
            Ok(json!({"id": id}))
        }
        "bookmarks.seed" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let count = usize_param(params, "count", a.settings.sample_size)?;
            let inserted = a.bookmarks().seed_sample_bookmarks(count).map_err(|e| e.to_string())?;
            Ok(json!({"inserted": inserted}))
        }

        // ─── Settings ───
        "settings.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(&a.settings).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
