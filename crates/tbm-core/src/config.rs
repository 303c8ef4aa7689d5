//! Configuration types.
//!
//! Settings live in `<config_dir>/tbm/config.toml`. Every field has a default,
//! so a missing file is the same as an empty one. The store URL and key can
//! also come from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::query::{SortDirection, SortKey};

/// Book count shown on the landing page when the store cannot be reached.
pub const DEFAULT_FALLBACK_COUNT: u64 = 738;

/// Environment variable overriding `store.url`.
pub const ENV_STORE_URL: &str = "TBM_SUPABASE_URL";

/// Environment variable overriding `store.anon_key`.
pub const ENV_ANON_KEY: &str = "TBM_SUPABASE_ANON_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub catalog: CatalogSection,
}

/// Remote record store settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    pub url: Option<String>,

    /// Public (anon) API key.
    pub anon_key: Option<String>,

    /// Table holding book records.
    pub table: String,

    /// Upper bound for a single store call.
    pub timeout_secs: u64,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            table: "buku".to_string(),
            timeout_secs: 10,
        }
    }
}

impl StoreSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Both URL and key are present and non-empty.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.url) && present(&self.anon_key)
    }
}

/// How list filters are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPolicy {
    /// Every filter change refetches with the filter pushed to the store.
    #[default]
    Remote,
    /// Fetch the full table once and filter in memory.
    Local,
}

/// Catalog presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    pub fallback_count: u64,
    pub filter_policy: FilterPolicy,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            fallback_count: DEFAULT_FALLBACK_COUNT,
            filter_policy: FilterPolicy::Remote,
            sort_key: SortKey::Title,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl CatalogConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match config_path() {
                Some(p) => p,
                None => {
                    tracing::debug!("No config directory; using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !path.exists() {
            tracing::info!("No config found at {:?}; using defaults", path);
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let config = Self::from_toml(&text).map_err(|message| ConfigError::Parse {
            path: path.clone(),
            message,
        })?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Replace the store URL and key with any supplied non-empty values.
    pub fn with_overrides(mut self, url: Option<String>, anon_key: Option<String>) -> Self {
        if let Some(url) = url.filter(|v| !v.trim().is_empty()) {
            self.store.url = Some(url);
        }
        if let Some(key) = anon_key.filter(|v| !v.trim().is_empty()) {
            self.store.anon_key = Some(key);
        }
        self
    }
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tbm"))
}

/// Get the path to config.toml.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}
