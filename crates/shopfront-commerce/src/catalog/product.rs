//! Catalog product as returned by the backend.

use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Deserializer, Serialize};

/// A product in the catalog.
///
/// Every field except `id` is optional on the wire; missing or malformed
/// values degrade to defaults instead of failing the whole page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    #[serde(default)]
    pub name: String,
    /// URL-friendly slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Manufacturer name.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Technical specification, either a JSON object or free text.
    #[serde(default)]
    pub specs: Option<serde_json::Value>,
    /// External image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// CMS asset id, preferred over `image_url` when present.
    #[serde(default)]
    pub image_file: Option<String>,
    /// Price in major units.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<f64>,
}

impl Product {
    /// Create a product with only the required fields.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: None,
            description: None,
            category: None,
            manufacturer: None,
            specs: None,
            image_url: None,
            image_file: None,
            price: None,
        }
    }

    /// Set the price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Price as money; a missing price counts as zero.
    pub fn price_or_zero(&self, currency: Currency) -> Money {
        self.price
            .map(|p| Money::from_decimal(p, currency))
            .unwrap_or_else(|| Money::zero(currency))
    }

    /// Routing key: the slug when present, otherwise the id.
    pub fn route_key(&self) -> &str {
        self.slug
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.id.as_str())
    }

    /// Best available image URL.
    ///
    /// A CMS asset wins over the raw `image_url`; without an asset base URL
    /// only `image_url` can be used.
    pub fn image(&self, asset_base_url: Option<&str>) -> Option<String> {
        let asset = match (asset_base_url, self.image_file.as_deref()) {
            (Some(base), Some(file)) if !file.is_empty() => {
                Some(format!("{}/assets/{}", base.trim_end_matches('/'), file))
            }
            _ => None,
        };
        asset.or_else(|| self.image_url.clone().filter(|u| !u.is_empty()))
    }
}

/// Accept numbers, numeric strings and null; anything else becomes `None`.
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    })
}
