//! Storefront domain logic: the shopping cart and the catalog controller.
//!
//! - **Cart**: [`CartStore`] owns the line items, merges repeated adds into a
//!   quantity, and writes through a [`CartStorage`] port after each change.
//! - **Catalog**: product and filter wire types from the backend.
//! - **Search**: [`CatalogController`] turns search, tab, category and
//!   page-size changes into generation-tagged fetches and merges the pages.
//! - **Checkout**: [`checkout::place_order`] submits the cart with validated
//!   contact details and clears it once the backend accepts.
//!
//! Cargo features:
//!
//! - `storage`: [`cart::CacheCartStorage`] backed by `shopfront-cache`.
//! - `http`: [`search::HttpCatalogApi`] backed by `shopfront-data`, which
//!   also implements [`checkout::OrderApi`].
//!
//! # Example
//!
//! ```rust
//! use shopfront_commerce::prelude::*;
//!
//! let mut cart = CartStore::in_memory();
//! let lathe = CartItemDraft::new("p1", "Токарный станок", Money::new(150_000_000, Currency::RUB));
//! cart.add_item(lathe.clone());
//! cart.add_item(lathe);
//! assert_eq!(cart.item_count(), 2);
//!
//! let mut catalog = CatalogController::new();
//! let ticket = catalog.reset();
//! catalog.apply(ticket, Ok(SearchPage::new(vec![Product::new("p1", "16К20")], 57)));
//! assert!(catalog.has_more());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

pub use cart::{CartItemDraft, CartLineItem, CartStorage, CartStore};
pub use error::CommerceError;
pub use ids::ProductId;
pub use money::{Currency, Money};
pub use search::{CatalogApi, CatalogController};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{CategoryRef, FilterGroup, FilterGroups, Product};

    // Cart
    pub use crate::cart::{
        CartItemDraft, CartLineItem, CartStorage, CartStore, EphemeralStorage, PersistedCart,
    };
    #[cfg(feature = "storage")]
    pub use crate::cart::CacheCartStorage;

    // Checkout
    pub use crate::checkout::{
        place_order, CheckoutRequest, ContactDetails, OrderApi, OrderReceipt,
    };

    // Search
    pub use crate::search::{
        ApplyOutcome, CatalogApi, CatalogController, CatalogQuery, CatalogTab, FetchMode,
        FetchTicket, FilterChange, PageSize, Pagination, SearchPage,
    };
    #[cfg(feature = "http")]
    pub use crate::search::HttpCatalogApi;
}
