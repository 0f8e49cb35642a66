use serde::{Deserialize, Serialize};

use crate::types::errors::{BookmarkError, BookmarkResult};

/// Represents a saved bookmark.
///
/// Timestamps are Unix epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub name: String,
    pub url: String,
    pub bookmark_group_id: String,
    pub created_at: i64,
    pub modified_at: i64,
}

/// A grouping bucket for bookmarks. Only the default group exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookmarkGroup {
    pub id: &'static str,
    pub name: &'static str,
}

pub const DEFAULT_BOOKMARK_GROUP: BookmarkGroup = BookmarkGroup {
    id: "default",
    name: "Default",
};

/// Input to `upsert`: every field except `id` may be left unset, in which
/// case the stored value (or a derived default for new records) is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkDraft {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub bookmark_group_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
}

impl BookmarkDraft {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Payload for creating a bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBookmarkPayload {
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Payload for editing an existing bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBookmarkPayload {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Canonical form of a URL used for storage and comparison.
pub fn normalize_url(url: &str) -> String {
    url.trim().to_lowercase()
}

/// Accepts only `http://` or `https://` URLs with something after the scheme.
pub fn validate_url(url: &str) -> BookmarkResult<()> {
    let normalized = normalize_url(url);
    let rest = normalized
        .strip_prefix("https://")
        .or_else(|| normalized.strip_prefix("http://"));
    match rest {
        Some(rest) if !rest.is_empty() => Ok(()),
        _ => Err(BookmarkError::InvalidUrl(url.to_string())),
    }
}

/// Derives a human-friendly label for a URL, e.g.
/// `https://www.example.com/getting-started?x=1` becomes
/// `example com - getting started with additional parameters`.
pub fn default_name_for_url(url: &str) -> String {
    const FALLBACK: &str = "Default description";

    let trimmed = url.trim();
    let Some(scheme_end) = trimmed.find("://") else {
        return FALLBACK.to_string();
    };
    let after_scheme = &trimmed[scheme_end + 3..];

    let (without_fragment, _) = after_scheme.split_once('#').unwrap_or((after_scheme, ""));
    let (location, query) = match without_fragment.split_once('?') {
        Some((loc, q)) => (loc, q),
        None => (without_fragment, ""),
    };
    let (authority, path) = match location.find('/') {
        Some(i) => (&location[..i], &location[i..]),
        None => (location, "/"),
    };

    // Drop credentials and port.
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host).to_lowercase();
    if host.is_empty() {
        return FALLBACK.to_string();
    }
    let host = host.replacen("www.", "", 1);

    let mut name = host.split('.').collect::<Vec<_>>().join(" ");
    let path_label = if path == "/" {
        "Home page".to_string()
    } else {
        path[1..].replace('-', " ")
    };
    if !path_label.is_empty() {
        name.push_str(" - ");
        name.push_str(&path_label);
    }
    if !query.is_empty() {
        name.push_str(" with additional parameters");
    }
    name
}
