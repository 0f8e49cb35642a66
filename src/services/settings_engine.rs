// Bookmark store settings engine
// Loads, saves, updates and resets store configuration.
// Settings are stored as a JSON file in the data directory; a few values can
// be overridden from the environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::errors::SettingsError;
use crate::types::settings::StoreSettings;

/// Directory holding the database and settings file.
pub const DATA_DIR_ENV: &str = "BOOKMARK_STORE_DATA_DIR";
/// Overrides `max_page_size`.
pub const MAX_PAGE_SIZE_ENV: &str = "BOOKMARK_STORE_MAX_PAGE_SIZE";

const DATABASE_FILE: &str = "bookmarks.db";
const SETTINGS_FILE: &str = "settings.json";

/// Returns the directory for persistent data.
///
/// `BOOKMARK_STORE_DATA_DIR` wins; otherwise the platform data directory
/// (e.g. `~/.local/share/bookmark-store`), falling back to the working directory.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_dir()
        .map(|d| d.join("bookmark-store"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<StoreSettings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &StoreSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
    fn get_config_path(&self) -> &str;
}

/// Settings engine implementation that persists settings as JSON on disk.
pub struct SettingsEngine {
    config_path: String,
    settings: StoreSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// If `path_override` is `Some`, uses that path for the config file.
    /// Otherwise, uses `settings.json` inside [`data_dir`].
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = match path_override {
            Some(p) => p,
            None => data_dir().join(SETTINGS_FILE).to_string_lossy().to_string(),
        };

        Self {
            config_path,
            settings: StoreSettings::default(),
        }
    }

    /// Resolved database location: the configured path, or `bookmarks.db`
    /// next to the settings file.
    pub fn database_path(&self) -> PathBuf {
        match &self.settings.database_path {
            Some(p) => PathBuf::from(p),
            None => Path::new(&self.config_path)
                .parent()
                .map(|dir| dir.join(DATABASE_FILE))
                .unwrap_or_else(|| PathBuf::from(DATABASE_FILE)),
        }
    }

    /// Applies environment overrides on top of the loaded settings.
    pub fn apply_env_overrides(&mut self) -> Result<(), SettingsError> {
        if let Ok(raw) = std::env::var(MAX_PAGE_SIZE_ENV) {
            let value: usize = raw.trim().parse().map_err(|_| {
                SettingsError::InvalidValue(format!("{} is not a number: {}", MAX_PAGE_SIZE_ENV, raw))
            })?;
            let mut candidate = self.settings.clone();
            candidate.max_page_size = value;
            candidate.default_page_size = candidate.default_page_size.min(value);
            validate(&candidate)?;
            self.settings = candidate;
        }
        Ok(())
    }
}

/// Checks cross-field constraints on page sizes.
pub fn validate(settings: &StoreSettings) -> Result<(), SettingsError> {
    if settings.max_page_size == 0 {
        return Err(SettingsError::InvalidValue(
            "max_page_size must be at least 1".to_string(),
        ));
    }
    if settings.default_page_size == 0 || settings.default_page_size > settings.max_page_size {
        return Err(SettingsError::InvalidValue(format!(
            "default_page_size must be between 1 and {}",
            settings.max_page_size
        )));
    }
    Ok(())
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<StoreSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            self.settings = StoreSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: StoreSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        validate(&settings)?;

        tracing::debug!(path = %self.config_path, "loaded settings");
        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Saves the current settings to the JSON config file.
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self) -> Result<(), SettingsError> {
        let path = Path::new(&self.config_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        fs::write(path, json)
            .map_err(|e| SettingsError::IoError(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    fn get_settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Updates a single top-level setting by key and saves to disk.
    ///
    /// The value must deserialize into the field's type, and the result must
    /// still pass [`validate`]; otherwise nothing changes.
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| SettingsError::SerializationError("Settings is not an object".to_string()))?;
        if !obj.contains_key(key) {
            return Err(SettingsError::InvalidKey(key.to_string()));
        }
        obj.insert(key.to_string(), value);

        let updated: StoreSettings = serde_json::from_value(json).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for '{}': {}", key, e))
        })?;
        validate(&updated)?;

        self.settings = updated;
        self.save()
    }

    /// Restores defaults and saves them to disk.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = StoreSettings::default();
        self.save()
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
