//! Store configuration and factory.
//!
//! Selects the document store backend and schema revision at runtime from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `STORAGE_MODE`: `file` (default) | `in_memory`
//! - `DATA_FILE`: path of the JSON document (default: `data.json`)
//! - `SCHEMA_REVISION`: `tasks` | `progress` | `rewards` | `bulk` | `timestamped` (default)
//! - `SERIALIZE_WRITES`: `true` to serialize read-modify-write sequences (default: `false`)
//!
//! # Example
//!
//! ```ignore
//! let config = StoreConfig::from_env()?;
//! let store = StoreFactory::new(config).create()?;
//! let document = store.read().await?;
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use super::{DocumentStore, InMemoryDocumentStore, JsonFileStore};
use crate::domain::SchemaRevision;

/// Default backing path, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "data.json";

// =============================================================================
// Configuration Types
// =============================================================================

/// Storage backend for the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// One JSON file on disk.
    #[default]
    File,
    /// Process memory; lost on shutdown.
    InMemory,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    /// Parses a storage mode from a string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidStorageMode` if the string is not recognized.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "file" | "json" | "json_file" => Ok(Self::File),
            "in_memory" | "inmemory" | "memory" => Ok(Self::InMemory),
            _ => Err(ConfigurationError::InvalidStorageMode(value.to_string())),
        }
    }
}

/// Configuration for the store factory and request handlers.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Storage backend.
    pub storage_mode: StorageMode,
    /// Backing path (used when `storage_mode` is `File`).
    pub data_file: PathBuf,
    /// Schema revision served.
    pub revision: SchemaRevision,
    /// Whether read-modify-write sequences are serialized behind a mutex.
    pub serialize_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_mode: StorageMode::default(),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            revision: SchemaRevision::default(),
            serialize_writes: false,
        }
    }
}

impl StoreConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if any variable holds an unrecognized
    /// value or `DATA_FILE` is blank in file mode.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let storage_mode = match env::var("STORAGE_MODE") {
            Ok(value) => value.parse()?,
            Err(env::VarError::NotPresent) => StorageMode::default(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigurationError::InvalidStorageMode(
                    "<non-UTF-8 value>".to_string(),
                ));
            }
        };

        let revision = match env::var("SCHEMA_REVISION") {
            Ok(value) => value
                .parse::<SchemaRevision>()
                .map_err(|_| ConfigurationError::InvalidRevision(value))?,
            Err(env::VarError::NotPresent) => SchemaRevision::default(),
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ConfigurationError::InvalidRevision(
                    "<non-UTF-8 value>".to_string(),
                ));
            }
        };

        let data_file = env::var_os("DATA_FILE")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_FILE), PathBuf::from);

        let serialize_writes = match env::var("SERIALIZE_WRITES") {
            Ok(value) => parse_flag("SERIALIZE_WRITES", &value)?,
            Err(_) => false,
        };

        let config = Self {
            storage_mode,
            data_file,
            revision,
            serialize_writes,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingDataFile` if file mode has an empty path.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.storage_mode == StorageMode::File && self.data_file.as_os_str().is_empty() {
            return Err(ConfigurationError::MissingDataFile);
        }

        Ok(())
    }
}

/// Parses a boolean environment flag.
fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigurationError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

/// Builder for `StoreConfig`.
///
/// # Example
///
/// ```ignore
/// let config = StoreConfig::builder()
///     .data_file("/var/lib/tasklevels/data.json")
///     .revision(SchemaRevision::Bulk)
///     .serialize_writes(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Sets the storage mode.
    #[must_use]
    pub const fn storage_mode(mut self, mode: StorageMode) -> Self {
        self.config.storage_mode = mode;
        self
    }

    /// Sets the backing path.
    #[must_use]
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Sets the schema revision.
    #[must_use]
    pub const fn revision(mut self, revision: SchemaRevision) -> Self {
        self.config.revision = revision;
        self
    }

    /// Enables or disables write serialization.
    #[must_use]
    pub const fn serialize_writes(mut self, enabled: bool) -> Self {
        self.config.serialize_writes = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid.
    pub fn build(self) -> Result<StoreConfig, ConfigurationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while loading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// Invalid storage mode value.
    #[error("Invalid storage mode: '{0}'. Expected 'file' or 'in_memory'")]
    InvalidStorageMode(String),

    /// Invalid schema revision value.
    #[error(
        "Invalid schema revision: '{0}'. Expected 'tasks', 'progress', 'rewards', 'bulk' or 'timestamped'"
    )]
    InvalidRevision(String),

    /// Invalid boolean flag.
    #[error("Invalid value for {name}: '{value}'. Expected true or false")]
    InvalidFlag { name: &'static str, value: String },

    /// Empty `DATA_FILE` in file mode.
    #[error("DATA_FILE must not be empty when STORAGE_MODE=file")]
    MissingDataFile,
}

/// Errors that can occur while creating the store.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The directory that should hold the data file does not exist.
    #[error("Data directory does not exist: {}", .0.display())]
    MissingDataDirectory(PathBuf),
}

// =============================================================================
// Store Factory
// =============================================================================

/// Factory for creating the document store from configuration.
#[derive(Debug, Clone)]
pub struct StoreFactory {
    config: StoreConfig,
}

impl StoreFactory {
    /// Creates a new factory with the given configuration.
    #[must_use]
    pub const fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Creates a new factory from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::Configuration` if environment configuration is invalid.
    pub fn from_env() -> Result<Self, FactoryError> {
        let config = StoreConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Returns the configuration used by this factory.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Creates the configured store.
    ///
    /// The data file itself may be absent (the default document is served
    /// until the first write), but its parent directory must exist.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError::MissingDataDirectory` if the parent directory
    /// of the data file does not exist.
    pub fn create(&self) -> Result<Arc<dyn DocumentStore>, FactoryError> {
        match self.config.storage_mode {
            StorageMode::InMemory => Ok(Arc::new(InMemoryDocumentStore::new(
                self.config.revision,
            ))),
            StorageMode::File => {
                let path = &self.config.data_file;
                if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty())
                    && !parent.is_dir()
                {
                    return Err(FactoryError::MissingDataDirectory(parent.to_path_buf()));
                }

                Ok(Arc::new(JsonFileStore::new(path, self.config.revision)))
            }
        }
    }

    /// Returns the backing path, if the configured store has one.
    #[must_use]
    pub fn data_file(&self) -> Option<&Path> {
        match self.config.storage_mode {
            StorageMode::File => Some(&self.config.data_file),
            StorageMode::InMemory => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
