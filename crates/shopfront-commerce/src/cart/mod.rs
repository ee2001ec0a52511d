//! Shopping cart module.
//!
//! Contains the line item types, the single-writer cart store, and the
//! storage port it persists through.

mod line_item;
mod persist;
mod store;

pub use line_item::{CartItemDraft, CartLineItem};
pub use persist::{CartStorage, EphemeralStorage, PersistedCart, CART_STORAGE_KEY};
#[cfg(feature = "storage")]
pub use persist::CacheCartStorage;
pub use store::CartStore;
