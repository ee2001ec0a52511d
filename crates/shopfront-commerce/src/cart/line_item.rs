//! Cart line items.

use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// What an "add to cart" action carries: a line item without a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemDraft {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    pub image_url: Option<String>,
    pub slug: Option<String>,
}

impl CartItemDraft {
    /// Create a draft with the required fields.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image_url: None,
            slug: None,
        }
    }

    /// Set the image URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Set the routing slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Build a draft from a catalog product.
    ///
    /// A missing price becomes zero and a missing slug falls back to the id,
    /// so the line item can always link back to its product page.
    pub fn from_product(product: &Product, currency: Currency, asset_base_url: Option<&str>) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.trim().to_string(),
            price: product.price_or_zero(currency),
            image_url: product.image(asset_base_url),
            slug: Some(product.route_key().to_string()),
        }
    }
}

/// One row of the cart: a product and how many of it were selected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    /// Product identifier; unique within the cart.
    pub id: ProductId,
    /// Product name as it was when first added.
    pub name: String,
    /// Unit price as it was when first added.
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Always at least 1 while the item is in a cart.
    pub quantity: i64,
}

impl CartLineItem {
    pub(crate) fn from_draft(draft: CartItemDraft) -> Self {
        Self {
            id: draft.id,
            name: draft.name,
            price: draft.price,
            image_url: draft.image_url,
            slug: draft.slug,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.price.saturating_mul(self.quantity)
    }
}
