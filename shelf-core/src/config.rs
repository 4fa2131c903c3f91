//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "catalog": {
//!     "baseUrl": "https://www.googleapis.com/books/v1",
//!     "apiKey": null,
//!     "timeoutSecs": 10,
//!     "maxResults": 20
//!   }
//! }
//! ```
//! Keys this crate does not manage are kept as-is when saving.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::google_books::GOOGLE_BOOKS_URL;
use crate::domain::result::Error;

pub const SETTINGS_FILENAME: &str = "settings.json";

pub const BASE_URL_ENV: &str = "SHELF_CATALOG_BASE_URL";
pub const API_KEY_ENV: &str = "SHELF_CATALOG_API_KEY";
pub const TIMEOUT_ENV: &str = "SHELF_CATALOG_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_RESULTS: u32 = 20;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    catalog: CatalogSettings,
    #[serde(flatten)]
    other: serde_json::Map<String, serde_json::Value>,
}

/// Book catalog connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_base_url() -> String {
    GOOGLE_BOOKS_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Shelf configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Effective catalog settings (file values with env overrides applied)
    pub catalog: CatalogSettings,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Config {
    /// Keys accepted by [`Config::set`]
    pub const KEYS: &'static [&'static str] = &[
        "catalog.baseUrl",
        "catalog.apiKey",
        "catalog.timeoutSecs",
        "catalog.maxResults",
    ];

    /// Load config from the data directory
    ///
    /// Catalog settings can be overridden with `SHELF_CATALOG_BASE_URL`,
    /// `SHELF_CATALOG_API_KEY` and `SHELF_CATALOG_TIMEOUT_SECS`.
    pub fn load(data_dir: &Path) -> Result<Self> {
        Self::load_with_env(data_dir, |key| std::env::var(key).ok())
    }

    /// Load config, resolving env overrides through `env`
    pub fn load_with_env<F>(data_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings_path = data_dir.join(SETTINGS_FILENAME);

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {}", settings_path.display()))?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let mut catalog = raw.catalog.clone();
        if catalog.timeout_secs == 0 {
            catalog.timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        if let Some(url) = env(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            catalog.base_url = url;
        }
        if let Some(key) = env(API_KEY_ENV) {
            catalog.api_key = Some(key).filter(|k| !k.is_empty());
        }
        if let Some(secs) = env(TIMEOUT_ENV)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
        {
            catalog.timeout_secs = secs;
        }

        Ok(Self {
            catalog,
            _raw_settings: raw,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings that shelf doesn't manage
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let settings_path = data_dir.join(SETTINGS_FILENAME);

        // Reload so keys written by someone else since load survive
        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.catalog = self._raw_settings.catalog.clone();

        std::fs::create_dir_all(data_dir)?;
        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Set one managed key from its string form
    ///
    /// Env overrides still win for the effective value until the variable
    /// is unset.
    pub fn set(&mut self, key: &str, value: &str) -> crate::Result<()> {
        let stored = &mut self._raw_settings.catalog;
        match key {
            "catalog.baseUrl" => {
                url::Url::parse(value)
                    .map_err(|e| Error::validation(format!("invalid URL '{}': {}", value, e)))?;
                stored.base_url = value.to_string();
                self.catalog.base_url = value.to_string();
            }
            "catalog.apiKey" => {
                let key = Some(value.to_string()).filter(|v| !v.is_empty());
                stored.api_key = key.clone();
                self.catalog.api_key = key;
            }
            "catalog.timeoutSecs" => {
                let secs = parse_positive(key, value)?;
                stored.timeout_secs = secs;
                self.catalog.timeout_secs = secs;
            }
            "catalog.maxResults" => {
                let n = parse_positive(key, value)?;
                let n = u32::try_from(n)
                    .map_err(|_| Error::validation(format!("{} is too large", key)))?;
                stored.max_results = n;
                self.catalog.max_results = n;
            }
            other => {
                return Err(Error::Config(format!(
                    "unknown key '{}' (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_positive(key: &str, value: &str) -> crate::Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::validation(format!(
            "{} must be a positive integer, got '{}'",
            key, value
        ))),
    }
}
