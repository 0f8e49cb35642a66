use serde::{Deserialize, Serialize};

/// Upper bound on any single page or search window.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 50;

/// Top-level store configuration, persisted as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Explicit database file. When unset the file lives in the data directory.
    pub database_path: Option<String>,
    pub max_page_size: usize,
    pub default_page_size: usize,
    /// Populate an empty store with sample bookmarks on startup.
    pub seed_sample_data: bool,
    pub sample_size: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_path: None,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            default_page_size: 10,
            seed_sample_data: false,
            sample_size: 100,
        }
    }
}
