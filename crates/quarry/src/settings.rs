//! Application settings.

use derive_builder::Builder;
use derive_getters::Getters;
use quarry_cache::DEFAULT_CAPACITY;
use quarry_core::{Catalog, ViewSet};
use quarry_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where configuration lives and how large the result cache is.
///
/// Loaded from an optional TOML file; every key is optional:
///
/// ```toml
/// queries = "config/queries.json"
/// views = "config/views.json"
/// cache_capacity = 25
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    Builder,
    derive_setters::Setters,
)]
#[builder(setter(into), default)]
#[setters(prefix = "with_", into)]
#[serde(default)]
pub struct Settings {
    /// Path to `queries.json` (connections, dialects, catalog expressions)
    queries: PathBuf,
    /// Path to the views document
    views: PathBuf,
    /// Maximum number of cached result sets
    cache_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            queries: PathBuf::from("queries.json"),
            views: PathBuf::from("views.json"),
            cache_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read settings file: {}", e))
        })?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))
    }

    /// Load the catalog named by `queries`.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn load_catalog(&self) -> Result<Catalog, ConfigError> {
        Catalog::from_file(&self.queries)
    }

    /// Load the views named by `views`.
    ///
    /// # Errors
    ///
    /// Returns an error if the views cannot be loaded.
    pub fn load_views(&self) -> Result<ViewSet, ConfigError> {
        ViewSet::from_file(&self.views)
    }
}
