//! [`OrderApi`] over the backend lead intake endpoint.

use crate::checkout::{CheckoutRequest, OrderApi, OrderReceipt};
use crate::search::HttpCatalogApi;
use crate::CommerceError;
use async_trait::async_trait;

pub const LEADS_PATH: &str = "/ingest/leads";

#[async_trait]
impl OrderApi for HttpCatalogApi {
    async fn submit_order(&self, order: &CheckoutRequest) -> Result<OrderReceipt, CommerceError> {
        let resp = self
            .client()
            .post(LEADS_PATH)
            .json(order)?
            .send()
            .await?
            .error_for_status()?;
        if resp.body.is_empty() {
            return Ok(OrderReceipt::default());
        }
        Ok(resp.json()?)
    }
}
