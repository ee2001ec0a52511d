//! Type-safe Key-Value storage layer for the storefront.
//!
//! Provides a small, ergonomic API for keeping client-side state (the cart,
//! remembered preferences) in a durable key-value store with automatic JSON
//! serialization. The backing store is pluggable through [`KvStore`]:
//!
//! - [`MemoryStore`] keeps everything in process memory (tests, ephemeral sessions)
//! - [`FileStore`] keeps one JSON file per key inside a directory
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_cache::Cache;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Preferences {
//!     page_size: u32,
//! }
//!
//! let cache = Cache::open(".shopfront")?;
//!
//! // Store a value
//! cache.set("prefs:catalog", &Preferences { page_size: 20 })?;
//!
//! // Retrieve a value
//! let prefs: Option<Preferences> = cache.get("prefs:catalog")?;
//!
//! // Delete a value
//! cache.delete("prefs:catalog")?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, KvStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
