//! Order placement.

use crate::cart::{CartStorage, CartStore};
use crate::checkout::{CheckoutRequest, ContactDetails, OrderApi, OrderReceipt};
use crate::CommerceError;

/// Submit the cart as an order and clear it once the backend accepts.
///
/// On any error (empty cart, invalid contact, failed request) the cart is
/// left exactly as it was.
pub async fn place_order<S, A>(
    cart: &mut CartStore<S>,
    api: &A,
    contact: ContactDetails,
) -> Result<OrderReceipt, CommerceError>
where
    S: CartStorage,
    A: OrderApi + ?Sized,
{
    let order = CheckoutRequest::from_cart(cart, contact)?;
    let lines = order.meta.items.len();

    let receipt = match api.submit_order(&order).await {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::warn!(error = %e, lines, "order submission failed, cart kept");
            return Err(e);
        }
    };

    tracing::info!(lead_id = ?receipt.lead_id, lines, total = order.meta.total, "order placed");
    cart.clear_cart();
    Ok(receipt)
}
