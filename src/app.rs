//! App core for the bookmark store.
//!
//! Composition root: owns the single database handle and the settings, and
//! hands out borrowing services on demand.

use std::sync::Arc;

use crate::database::connection::Database;
use crate::services::bookmark_data_service::BookmarkDataService;
use crate::services::settings_engine::{validate, SettingsEngine, SettingsEngineTrait};
use crate::types::errors::BookmarkError;
use crate::types::settings::StoreSettings;

/// Errors raised while starting the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Settings(#[from] crate::types::errors::SettingsError),
    #[error(transparent)]
    Store(#[from] BookmarkError),
}

/// Central application struct.
///
/// The database is opened once here and lives as long as the `App`.
/// `BookmarkDataService` borrows the connection and is created per call.
pub struct App {
    pub db: Arc<Database>,
    pub settings: StoreSettings,
}

impl App {
    /// Opens the database at `db_path` with explicit settings.
    pub fn new(db_path: &str, settings: StoreSettings) -> Result<Self, AppError> {
        validate(&settings)?;
        let db = Arc::new(Database::open(db_path)?);
        Self::assemble(db, settings)
    }

    /// In-memory store, mainly for tests and demos.
    pub fn in_memory(settings: StoreSettings) -> Result<Self, AppError> {
        validate(&settings)?;
        let db = Arc::new(Database::open_in_memory()?);
        Self::assemble(db, settings)
    }

    /// Loads settings through `engine` (file + environment) and opens the
    /// database it points at.
    pub fn from_settings_engine(engine: &mut SettingsEngine) -> Result<Self, AppError> {
        engine.load()?;
        engine.apply_env_overrides()?;
        let path = engine.database_path();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    crate::types::errors::SettingsError::IoError(format!(
                        "Failed to create data directory: {}",
                        e
                    ))
                })?;
            }
        }
        Self::new(&path.to_string_lossy(), engine.get_settings().clone())
    }

    fn assemble(db: Arc<Database>, settings: StoreSettings) -> Result<Self, AppError> {
        let app = Self { db, settings };
        if app.settings.seed_sample_data {
            let service = app.bookmarks();
            if service.get_bookmarks_count()? == 0 {
                service.seed_sample_bookmarks(app.settings.sample_size)?;
            }
        }
        tracing::info!(
            schema_version = app.db.schema_version(),
            max_page_size = app.settings.max_page_size,
            "bookmark store ready"
        );
        Ok(app)
    }

    /// Boundary service bound to this app's connection and page ceiling.
    pub fn bookmarks(&self) -> BookmarkDataService<'_> {
        BookmarkDataService::new(self.db.connection(), self.settings.max_page_size)
    }
}
