//! Port to the catalog backend.

use crate::catalog::{FilterGroups, Product};
use crate::search::{CatalogQuery, SearchPage};
use crate::CommerceError;
use async_trait::async_trait;

/// Catalog backend operations.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of results for a query.
    async fn search(&self, query: &CatalogQuery) -> Result<SearchPage, CommerceError>;

    /// Fetch the category filter tree.
    async fn filters(&self) -> Result<FilterGroups, CommerceError>;

    /// Look up one product by id or slug. `Ok(None)` when it does not exist.
    async fn product(&self, id_or_slug: &str) -> Result<Option<Product>, CommerceError>;
}
