//! Catalog search module.
//!
//! Contains the query types, the backend port, and the controller that
//! coordinates debounced search, filters and load-more pagination.

mod api;
mod controller;
mod debounce;
#[cfg(feature = "http")]
mod http;
mod query;
mod results;

pub use api::CatalogApi;
pub use controller::{ApplyOutcome, CatalogController, CatalogState, FetchMode, FetchTicket};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
#[cfg(feature = "http")]
pub use http::HttpCatalogApi;
pub use query::{CatalogQuery, CatalogTab, FilterChange, PageSize};
pub use results::{Pagination, SearchPage};
