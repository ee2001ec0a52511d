//! Durable storage port for the cart.

use crate::cart::CartLineItem;
use crate::error::CommerceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key the cart record is stored under.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// Layout version written into every persisted record.
pub const CART_SCHEMA_VERSION: u32 = 1;

/// The persisted form of a cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistedCart {
    pub version: u32,
    pub items: Vec<CartLineItem>,
    pub saved_at: DateTime<Utc>,
}

impl PersistedCart {
    /// Wrap the current items with the current schema version and time.
    pub fn new(items: Vec<CartLineItem>) -> Self {
        Self {
            version: CART_SCHEMA_VERSION,
            items,
            saved_at: Utc::now(),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from JSON, rejecting records written by a newer schema.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let record: PersistedCart = serde_json::from_str(json)?;
        record.check_version()?;
        Ok(record)
    }

    fn check_version(&self) -> Result<(), CommerceError> {
        if self.version > CART_SCHEMA_VERSION {
            return Err(CommerceError::StorageError(format!(
                "cart record version {} is newer than supported version {}",
                self.version, CART_SCHEMA_VERSION
            )));
        }
        Ok(())
    }
}

/// Where the cart store keeps its items between sessions.
pub trait CartStorage {
    /// Read the saved items, or `None` if nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError>;

    /// Replace the saved items.
    fn save(&self, items: &[CartLineItem]) -> Result<(), CommerceError>;
}

/// Storage that keeps nothing: the cart lives only in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct EphemeralStorage;

impl CartStorage for EphemeralStorage {
    fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError> {
        Ok(None)
    }

    fn save(&self, _items: &[CartLineItem]) -> Result<(), CommerceError> {
        Ok(())
    }
}

#[cfg(feature = "storage")]
pub use cache_backed::CacheCartStorage;

#[cfg(feature = "storage")]
mod cache_backed {
    use super::*;
    use shopfront_cache::{Cache, FileStore, KvStore};

    /// Cart storage backed by a [`Cache`] record.
    #[derive(Debug)]
    pub struct CacheCartStorage<S = FileStore> {
        cache: Cache<S>,
        key: String,
    }

    impl<S: KvStore> CacheCartStorage<S> {
        /// Store the cart under [`CART_STORAGE_KEY`].
        pub fn new(cache: Cache<S>) -> Self {
            Self {
                cache,
                key: CART_STORAGE_KEY.to_string(),
            }
        }

        /// Store the cart under a custom key.
        pub fn with_key(mut self, key: impl Into<String>) -> Self {
            self.key = key.into();
            self
        }

        /// The record key.
        pub fn key(&self) -> &str {
            &self.key
        }

        /// The underlying cache.
        pub fn cache(&self) -> &Cache<S> {
            &self.cache
        }
    }

    impl<S: KvStore> CartStorage for CacheCartStorage<S> {
        fn load(&self) -> Result<Option<Vec<CartLineItem>>, CommerceError> {
            match self.cache.get::<PersistedCart>(&self.key)? {
                Some(record) => {
                    record.check_version()?;
                    Ok(Some(record.items))
                }
                None => Ok(None),
            }
        }

        fn save(&self, items: &[CartLineItem]) -> Result<(), CommerceError> {
            self.cache
                .set(&self.key, &PersistedCart::new(items.to_vec()))
                .map_err(Into::into)
        }
    }
}
