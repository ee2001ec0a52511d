//! Order request types.

use crate::cart::{CartStorage, CartStore};
use crate::ids::ProductId;
use crate::CommerceError;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Lead source the backend files cart orders under.
pub const ORDER_SOURCE: &str = "cart_order";

/// Minimum number of phone characters once whitespace is removed.
const MIN_PHONE_LEN: usize = 10;

/// Who placed the order and how to reach them.
///
/// All fields are trimmed on construction; an empty email or comment is
/// treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ContactDetails {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub comment: Option<String>,
}

impl ContactDetails {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            phone: phone.into().trim().to_string(),
            email: None,
            comment: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = non_empty(email.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = non_empty(comment.into());
        self
    }

    /// Check every field, naming all the invalid ones at once.
    pub fn check(&self) -> Result<(), CommerceError> {
        self.validate().map_err(|errors| {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            CommerceError::InvalidContact(fields.join(", "))
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Digits, `+`, `-` and parentheses; spaces are ignored.
fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let compact: Vec<char> = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let allowed = compact
        .iter()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')'));
    if allowed && compact.len() >= MIN_PHONE_LEN {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

/// One ordered product as the backend records it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub id: ProductId,
    pub name: String,
    /// Unit price in rubles.
    pub price: f64,
    pub quantity: i64,
}

/// Cart snapshot attached to the lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderMeta {
    pub items: Vec<OrderLine>,
    /// Cart total in rubles.
    pub total: f64,
}

/// Body of an order submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutRequest {
    pub source: String,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub message: String,
    pub meta: OrderMeta,
}

impl CheckoutRequest {
    /// Snapshot `cart` into an order for `contact`.
    ///
    /// Without a comment the message states the order total.
    pub fn from_cart<S: CartStorage>(
        cart: &CartStore<S>,
        contact: ContactDetails,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        contact.check()?;

        let total = cart.total_amount();
        let items = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                id: item.id.clone(),
                name: item.name.clone(),
                price: item.price.to_decimal(),
                quantity: item.quantity,
            })
            .collect();
        let message = contact
            .comment
            .unwrap_or_else(|| format!("Заказ на сумму {}", total.display()));

        Ok(Self {
            source: ORDER_SOURCE.to_string(),
            name: contact.name,
            phone: contact.phone,
            email: contact.email,
            message,
            meta: OrderMeta {
                items,
                total: total.to_decimal(),
            },
        })
    }
}

/// Backend acknowledgement of a submitted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderReceipt {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub lead_id: Option<String>,
}
