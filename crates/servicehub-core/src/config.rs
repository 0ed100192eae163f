use crate::models::{FilterCriteria, DEFAULT_MIN_RATING, DEFAULT_PRICE_RANGE};
use crate::recent::MAX_RECENT_SEARCHES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
///
/// Loaded from `config.toml` in the user's config dir. Every field has a
/// default, so a half-written file still parses.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load config from default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(Self::config_path()?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            // No config file? Use defaults
            Ok(Self::default())
        }
    }

    /// Save config to disk
    pub fn save(&self) -> crate::Result<()> {
        self.save_to(Self::config_path()?)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the config file path (XDG config dir on Unix, AppData on Windows)
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("servicehub");

        Ok(config_dir.join("config.toml"))
    }

    /// Where the key-value store lives unless `store.path` says otherwise
    pub fn store_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("servicehub");

        Ok(data_dir.join("store.db"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Catalog JSON document
    pub path: Option<PathBuf>,

    /// Translation tables, `{ "es": { "Cleaning": "Limpieza" } }`
    pub translations_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_services_initial")]
    pub services_initial: usize,

    #[serde(default = "default_services_batch")]
    pub services_batch: usize,

    #[serde(default = "default_tabs_initial")]
    pub tabs_initial: usize,

    #[serde(default = "default_tabs_batch")]
    pub tabs_batch: usize,

    /// Fake loading time before a batch appears
    #[serde(default = "default_reveal_delay")]
    pub delay_ms: u64,
}

fn default_services_initial() -> usize {
    6
}

fn default_services_batch() -> usize {
    6
}

fn default_tabs_initial() -> usize {
    4
}

fn default_tabs_batch() -> usize {
    4
}

fn default_reveal_delay() -> u64 {
    1000
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            services_initial: default_services_initial(),
            services_batch: default_services_batch(),
            tabs_initial: default_tabs_initial(),
            tabs_batch: default_tabs_batch(),
            delay_ms: default_reveal_delay(),
        }
    }
}

impl RevealConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_latency")]
    pub latency_ms: u64,

    /// Can shrink the recent search log, never grow it past 7
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

fn default_search_latency() -> u64 {
    300
}

fn default_recent_limit() -> usize {
    MAX_RECENT_SEARCHES
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_search_latency(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl SearchConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_min_price")]
    pub min_price: f64,

    #[serde(default = "default_max_price")]
    pub max_price: f64,

    #[serde(default = "default_min_rating")]
    pub min_rating: f64,

    /// Label of the "every category" tab (before translation)
    #[serde(default = "default_all_label")]
    pub all_label: String,
}

fn default_min_price() -> f64 {
    DEFAULT_PRICE_RANGE.0
}

fn default_max_price() -> f64 {
    DEFAULT_PRICE_RANGE.1
}

fn default_min_rating() -> f64 {
    DEFAULT_MIN_RATING
}

fn default_all_label() -> String {
    "All".to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_price: default_min_price(),
            max_price: default_max_price(),
            min_rating: default_min_rating(),
            all_label: default_all_label(),
        }
    }
}

impl FilterConfig {
    /// Starting criteria for a fresh filter screen
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::default()
            .with_price_range(self.min_price, self.max_price)
            .with_rating(self.min_rating)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// SQLite file for bookmarks, recent searches and the locale
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.reveal.services_initial, 6);
        assert_eq!(config.reveal.tabs_batch, 4);
        assert_eq!(config.search.recent_limit, 7);
        assert_eq!(config.filter.all_label, "All");
        assert_eq!(config.filter.criteria(), FilterCriteria::default());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = toml::to_string(&config).unwrap();
        assert!(toml.contains("services_batch"));
        assert!(toml.contains("latency_ms"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[reveal]\nservices_batch = 10\n").unwrap();
        assert_eq!(config.reveal.services_batch, 10);
        assert_eq!(config.reveal.services_initial, 6);
        assert_eq!(config.search.latency_ms, 300);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("servicehub").join("config.toml");

        let mut config = Config::default();
        config.filter.min_rating = 3.5;
        config.store.path = Some(dir.path().join("store.db"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.filter.min_rating, 3.5);
        assert_eq!(loaded.store_path().unwrap(), dir.path().join("store.db"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.reveal.delay_ms, 1000);
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "reveal = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::Error::ConfigError(_))
        ));
    }
}
