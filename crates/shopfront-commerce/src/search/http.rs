//! [`CatalogApi`] over the backend REST API.

use crate::catalog::{FilterGroups, Product};
use crate::search::{CatalogApi, CatalogQuery, SearchPage};
use crate::CommerceError;
use async_trait::async_trait;
use shopfront_data::FetchClient;

pub const SEARCH_PATH: &str = "/catalog/search";
pub const FILTERS_PATH: &str = "/catalog/filters";
pub const PRODUCT_PATH: &str = "/catalog";

/// Catalog backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: FetchClient,
}

impl HttpCatalogApi {
    /// Use a client already pointed at the backend base URL.
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    /// Build a client for `base_url` with default settings.
    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        Self::new(FetchClient::new().with_base_url(base_url))
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn search(&self, query: &CatalogQuery) -> Result<SearchPage, CommerceError> {
        let page = self
            .client
            .get(SEARCH_PATH)
            .query_opt("q", query.search_term.as_deref())
            .query("type", query.tab.as_str())
            .query("limit", query.limit)
            .query("offset", query.offset)
            .query_opt("category", query.category.as_deref())
            .send()
            .await?
            .error_for_status()?
            .json::<SearchPage>()?;
        tracing::debug!(
            returned = page.results.len(),
            total = page.total,
            "catalog search completed"
        );
        Ok(page)
    }

    async fn filters(&self) -> Result<FilterGroups, CommerceError> {
        Ok(self
            .client
            .get(FILTERS_PATH)
            .send()
            .await?
            .error_for_status()?
            .json()?)
    }

    async fn product(&self, id_or_slug: &str) -> Result<Option<Product>, CommerceError> {
        let path = format!("{}/{}", PRODUCT_PATH, urlencoding::encode(id_or_slug.trim()));
        let resp = self.client.get(path).send().await?;
        if resp.is_not_found() {
            return Ok(None);
        }
        let body: serde_json::Value = resp.error_for_status()?.json()?;
        if body.get("error").is_some() {
            tracing::debug!(id_or_slug, "backend reported missing product");
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(body)?))
    }
}
