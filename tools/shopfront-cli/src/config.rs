//! CLI configuration.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shopfront_commerce::search::{CatalogTab, PageSize};

use crate::logging::LogFormat;

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["shopfront.toml", ".shopfront.toml", "shopfront.json"];

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "SHOPFRONT_API_URL";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Catalog browsing defaults.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Where the cart is kept.
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Apply overrides from the environment.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// CMS base URL used to resolve product image assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_base_url: Option<String>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            asset_base_url: None,
        }
    }
}

/// Catalog browsing defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogConfig {
    #[serde(default)]
    pub default_tab: CatalogTab,

    /// One of 20, 40 or 60.
    #[serde(default)]
    pub page_size: PageSize,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl CatalogConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_debounce_ms() -> u64 {
    500
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_tab: CatalogTab::default(),
            page_size: PageSize::default(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Cart storage location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    /// Directory for the cart record, relative to the working directory.
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

fn default_storage_dir() -> String {
    ".shopfront".to_string()
}

fn default_cart_key() -> String {
    shopfront_commerce::cart::CART_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            cart_key: default_cart_key(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive used when `SHOPFRONT_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
        }
    }
}

/// Generate a default shopfront.toml config file.
pub fn generate_default_config(base_url: &str) -> String {
    format!(
        r#"# Storefront CLI configuration

[api]
base_url = "{base_url}"
timeout_ms = 10000
# asset_base_url = "https://admin.example.com"

[catalog]
default_tab = "machines"
page_size = 20
debounce_ms = 500

[storage]
dir = ".shopfront"
cart_key = "cart-storage"

[logging]
level = "info"
format = "human"
"#,
        base_url = base_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: CliConfig = toml::from_str(&generate_default_config("http://localhost:8000")).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let config: CliConfig = toml::from_str(
            r#"
            [api]
            base_url = "http://backend:8000"

            [catalog]
            default_tab = "spares"
            page_size = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "http://backend:8000");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.catalog.default_tab, CatalogTab::Spares);
        assert_eq!(config.catalog.page_size, PageSize::Sixty);
        assert_eq!(config.storage.cart_key, "cart-storage");
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let result = toml::from_str::<CliConfig>("[catalog]\npage_size = 25\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_json_and_toml_files() {
        let dir = tempfile::tempdir().unwrap();

        let json = dir.path().join("shopfront.json");
        std::fs::write(&json, r#"{"logging": {"level": "debug", "format": "json"}}"#).unwrap();
        let config = CliConfig::load(&json).unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "debug");

        let toml_path = dir.path().join("shopfront.toml");
        std::fs::write(&toml_path, "[storage]\ndir = \"/var/lib/shopfront\"\n").unwrap();
        let config = CliConfig::load(&toml_path).unwrap();
        assert_eq!(config.storage.dir, "/var/lib/shopfront");

        assert!(CliConfig::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_env_override() {
        let mut config = CliConfig::default();
        config.apply_env(|key| (key == API_URL_ENV).then(|| " http://staging:8000 ".to_string()));
        assert_eq!(config.api.base_url, "http://staging:8000");

        config.apply_env(|_| Some(String::new()));
        assert_eq!(config.api.base_url, "http://staging:8000");
    }
}
