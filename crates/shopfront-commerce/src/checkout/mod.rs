//! Checkout module.
//!
//! Turns the cart into an order request for a sales manager to follow up:
//! contact details are validated, the cart is snapshotted, and the cart is
//! cleared only once the backend has accepted the order.

mod api;
mod flow;
#[cfg(feature = "http")]
mod http;
mod order;

pub use api::OrderApi;
pub use flow::place_order;
#[cfg(feature = "http")]
pub use http::LEADS_PATH;
pub use order::{CheckoutRequest, ContactDetails, OrderLine, OrderMeta, OrderReceipt, ORDER_SOURCE};
