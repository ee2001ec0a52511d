//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use shopfront_cache::Cache;
use shopfront_commerce::cart::{CacheCartStorage, CartStore};
use shopfront_commerce::search::{CatalogController, HttpCatalogApi};
use shopfront_data::FetchClient;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (mut config, config_path) = match config_path {
            Some(path) => {
                let path = resolve(&cwd, path);
                (CliConfig::load(&path)?, Some(path))
            }
            None => match find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Directory holding the persisted cart.
    pub fn storage_dir(&self) -> PathBuf {
        resolve(&self.cwd, &self.config.storage.dir)
    }

    /// Open the cache the cart lives in.
    pub fn cache(&self) -> Result<Cache> {
        let dir = self.storage_dir();
        Cache::open(&dir).with_context(|| format!("Failed to open storage at {}", dir.display()))
    }

    /// Restore the persisted cart.
    pub fn cart(&self) -> Result<CartStore<CacheCartStorage>> {
        let storage = CacheCartStorage::new(self.cache()?).with_key(&self.config.storage.cart_key);
        Ok(CartStore::hydrate(storage))
    }

    /// Catalog client for the configured backend.
    pub fn catalog_api(&self) -> HttpCatalogApi {
        let client = FetchClient::new()
            .with_base_url(&self.config.api.base_url)
            .with_timeout(self.config.api.timeout());
        HttpCatalogApi::new(client)
    }

    /// Catalog controller with the configured defaults.
    pub fn catalog_controller(&self) -> CatalogController {
        let catalog = &self.config.catalog;
        CatalogController::with_defaults(catalog.default_tab, catalog.page_size)
            .with_debounce(catalog.debounce())
    }

    /// CMS base URL for product images.
    pub fn asset_base_url(&self) -> Option<&str> {
        self.config.api.asset_base_url.as_deref()
    }
}

/// Find a config file in the directory tree, nearest first.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// Resolve a path relative to the working directory.
fn resolve(cwd: &Path, path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}
