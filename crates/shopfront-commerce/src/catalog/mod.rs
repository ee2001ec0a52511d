//! Catalog module.
//!
//! Wire types returned by the backend catalog endpoints.

mod category;
mod product;

pub use category::{CategoryRef, FilterGroup, FilterGroups};
pub use product::Product;
