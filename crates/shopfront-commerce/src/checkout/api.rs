//! Port to the order intake backend.

use crate::checkout::{CheckoutRequest, OrderReceipt};
use crate::CommerceError;
use async_trait::async_trait;

/// Order submission.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Submit an order. Any error means the backend did not record it.
    async fn submit_order(&self, order: &CheckoutRequest) -> Result<OrderReceipt, CommerceError>;
}
