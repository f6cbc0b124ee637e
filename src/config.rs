//! Gallery configuration.
//!
//! Settings are plain JSON. In the browser they are read from and written to
//! `localStorage`; missing fields fall back to their defaults so older saved
//! configurations keep loading.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ingest::IngestionPipeline;
use crate::keybindings::KeyBindings;
use crate::persistence::DEFAULT_STORAGE_KEY;
#[cfg(target_arch = "wasm32")]
use crate::storage::LocalStorage;
use crate::storage::KeyValueStorage;

/// Log level setting for the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Gallery configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Version of the configuration format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Key the image collection is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// chrono format string for record date labels
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Duration of card and viewer exit transitions, in milliseconds
    #[serde(default = "default_exit_transition_ms")]
    pub exit_transition_ms: u64,

    /// Upload batches larger than this log a memory warning
    #[serde(default = "default_large_batch_warning")]
    pub large_batch_warning: usize,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeyBindings,
}

fn default_app_name() -> String {
    "picboard".to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_date_format() -> String {
    IngestionPipeline::DEFAULT_DATE_FORMAT.to_string()
}

fn default_exit_transition_ms() -> u64 {
    300
}

/// Upper bound for exit transitions, in milliseconds.
pub const MAX_EXIT_TRANSITION_MS: u64 = 10_000;

fn default_large_batch_warning() -> usize {
    IngestionPipeline::DEFAULT_LARGE_BATCH_WARNING
}

impl GalleryConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            storage_key: default_storage_key(),
            date_format: default_date_format(),
            exit_transition_ms: default_exit_transition_ms(),
            large_batch_warning: default_large_batch_warning(),
            log_level: LogLevel::default(),
            keybindings: KeyBindings::default(),
        }
    }

    /// Exit transition as a Duration, capped at [`MAX_EXIT_TRANSITION_MS`].
    pub fn exit_transition(&self) -> Duration {
        Duration::from_millis(self.exit_transition_ms.min(MAX_EXIT_TRANSITION_MS))
    }

    /// Build the ingestion pipeline these settings describe.
    pub fn ingestion_pipeline(&self) -> IngestionPipeline {
        IngestionPipeline::new()
            .with_date_format(self.date_format.clone())
            .with_large_batch_warning(self.large_batch_warning)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Storage key the configuration is kept under.
    pub const STORAGE_KEY: &'static str = "picboard-config";

    /// Load configuration from a key-value store.
    /// Returns None if not found or can't be parsed.
    pub fn load_from<S: KeyValueStorage>(storage: &S) -> Option<Self> {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from storage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse stored config: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No stored config found");
                None
            }
            Err(e) => {
                log::warn!("Failed to read config: {}", e);
                None
            }
        }
    }

    /// Save configuration to a key-value store.
    pub fn save_to<S: KeyValueStorage>(&self, storage: &S) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| ConfigError::StorageError(e.to_string()))?;

        log::info!("Saved configuration");
        Ok(())
    }

    /// Try to load configuration from localStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn load_from_local_storage() -> Option<Self> {
        match LocalStorage::open() {
            Ok(storage) => Self::load_from(&storage),
            Err(e) => {
                log::warn!("localStorage unavailable: {}", e);
                None
            }
        }
    }

    /// Save configuration to localStorage (WASM only).
    #[cfg(target_arch = "wasm32")]
    pub fn save_to_local_storage(&self) -> Result<(), ConfigError> {
        let storage =
            LocalStorage::open().map_err(|e| ConfigError::StorageError(e.to_string()))?;
        self.save_to(&storage)
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    StorageError(String),
}
