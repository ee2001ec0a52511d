//! Typed cache wrapper with automatic serialization.

use crate::{CacheError, FileStore, KvStore, MemoryStore};
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

/// Type-safe cache over any [`KvStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
#[derive(Debug)]
pub struct Cache<S = FileStore> {
    store: S,
}

impl Cache<FileStore> {
    /// Open a directory-backed cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open(".shopfront")?;
    /// ```
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Ok(Self::new(FileStore::open(dir)?))
    }
}

impl Cache<MemoryStore> {
    /// Create a cache that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: KvStore> Cache<S> {
    /// Wrap an existing store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let prefs: Option<Preferences> = cache.get("prefs:catalog")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.store.get(key)? {
            Some(bytes) => {
                let value: T = serde_json::from_slice(&bytes)?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// cache.set("prefs:catalog", &prefs)?;
    /// ```
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.store.set(key, &bytes)
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.store.delete(key)
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.store.exists(key)
    }

    /// Get all keys in the cache.
    pub fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.store.keys()
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("cart", user_id);
/// // Returns "cart:user123"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        page_size: u32,
        tab: String,
    }

    #[test]
    fn test_typed_roundtrip() {
        let cache = Cache::in_memory();
        let prefs = Prefs {
            page_size: 20,
            tab: "machines".to_string(),
        };

        cache.set("prefs", &prefs).unwrap();
        let loaded: Option<Prefs> = cache.get("prefs").unwrap();
        assert_eq!(loaded, Some(prefs));
    }

    #[test]
    fn test_get_missing_is_none() {
        let cache = Cache::in_memory();
        let loaded: Option<Prefs> = cache.get("missing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_get_corrupt_value_is_error() {
        let cache = Cache::in_memory();
        cache.store().set("prefs", b"{not json").unwrap();
        let result: Result<Option<Prefs>, _> = cache.get("prefs");
        assert!(matches!(result, Err(CacheError::SerializeError(_))));
    }

    #[test]
    fn test_file_backed_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::open(dir.path().join("state")).unwrap();

        cache.set("count", &3u32).unwrap();
        assert!(cache.exists("count").unwrap());
        assert_eq!(cache.keys().unwrap(), vec!["count"]);

        cache.delete("count").unwrap();
        assert!(!cache.exists("count").unwrap());
    }

    #[test]
    fn test_cache_key_macro() {
        let user = 42;
        assert_eq!(cache_key!("cart", user), "cart:42");
        assert_eq!(cache_key!("search", "machines", 2), "search:machines:2");
    }
}
