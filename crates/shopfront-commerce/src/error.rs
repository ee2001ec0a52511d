//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart, catalog and checkout operations.
///
/// Cart and controller operations never return these to their callers; they
/// surface from the storage and API ports, where they are logged and
/// absorbed, and from order placement.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Backend request failed (transport, status, or body).
    #[error("Backend request failed: {0}")]
    FetchError(String),

    /// Durable storage failed to read or write.
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Unknown catalog tab.
    #[error("Unknown catalog tab: {0}")]
    InvalidTab(String),

    /// Page size outside the supported set.
    #[error("Unsupported page size {0} (expected one of 20, 40, 60)")]
    InvalidPageSize(u32),

    /// An order needs at least one line item.
    #[error("Cannot place an order for an empty cart")]
    EmptyCart,

    /// Contact details failed validation; lists the offending fields.
    #[error("Invalid contact details: {0}")]
    InvalidContact(String),
}

#[cfg(feature = "http")]
impl From<shopfront_data::FetchError> for CommerceError {
    fn from(e: shopfront_data::FetchError) -> Self {
        CommerceError::FetchError(e.to_string())
    }
}

#[cfg(feature = "storage")]
impl From<shopfront_cache::CacheError> for CommerceError {
    fn from(e: shopfront_cache::CacheError) -> Self {
        CommerceError::StorageError(e.to_string())
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
