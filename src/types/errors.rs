use thiserror::Error;

// === BookmarkError ===

/// Errors raised by the bookmark persistence layer.
///
/// Storage failures carry a stable, human-readable message per operation.
/// The underlying SQLite error is flattened into `detail` so callers never
/// depend on `rusqlite` types.
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// Another bookmark (with a different id) already uses this URL.
    #[error("A bookmark with the URL '{0}' already exists")]
    DuplicateUrl(String),
    /// A secondary index required by a query is absent from the schema.
    #[error("Required index is missing: {0}")]
    MissingIndex(String),
    /// Bookmark with the given ID was not found.
    #[error("The bookmark with ID '{0}' does not exist")]
    NotFound(String),
    /// The URL is empty or does not use an http(s) scheme.
    #[error("Invalid bookmark URL: '{0}'")]
    InvalidUrl(String),
    /// The underlying store rejected the operation.
    #[error("{message}")]
    Storage {
        message: &'static str,
        detail: String,
    },
}

impl BookmarkError {
    /// Wraps a store failure under a stable per-operation message.
    pub fn storage(message: &'static str, err: impl std::fmt::Display) -> Self {
        let detail = err.to_string();
        tracing::error!(%detail, "{message}");
        BookmarkError::Storage { message, detail }
    }

    /// Returns a closure suitable for `map_err` that wraps with `message`.
    pub fn wrap<E: std::fmt::Display>(message: &'static str) -> impl FnOnce(E) -> Self {
        move |err| Self::storage(message, err)
    }

    /// True for errors that indicate a broken schema rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BookmarkError::MissingIndex(_) | BookmarkError::Storage { .. })
    }
}

/// Result alias used throughout the persistence layer.
pub type BookmarkResult<T> = Result<T, BookmarkError>;

/// Stable messages attached to [`BookmarkError::Storage`].
pub mod messages {
    pub const OPEN: &str = "Failed to open database.";
    pub const SAVE: &str = "Failed to save bookmark.";
    pub const GET: &str = "Failed to get bookmark.";
    pub const LIST: &str = "Failed to get bookmarks.";
    pub const DELETE: &str = "Failed to delete bookmark.";
    pub const COUNT: &str = "Failed to count bookmarks.";
    pub const SEARCH: &str = "Failed to search bookmarks.";
}

// === SettingsError ===

/// Errors related to store configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
