//! JSON wire contracts shared by the API server and the client SDK.
//!
//! Field names are camelCase on the wire; every body the server accepts or
//! returns lives here so the two sides cannot drift apart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CartItemId, OrderId, OrderItemId, OrderStatus, ProductId, UserId};

// =============================================================================
// Authentication
// =============================================================================

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Preferred language tag (BCP-47); defaults to "en" server-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Body of `POST /api/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// User profile as exposed over the wire (never includes the password hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub language: String,
}

/// A freshly issued access/refresh token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Response of `POST /api/login` and `POST /api/register` (auto-login).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: PublicUser,
}

// =============================================================================
// Cart
// =============================================================================

/// Body of `POST /api/cart/items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemRequest {
    pub product_id: ProductId,
    /// Defaults to 1 when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
}

/// Body of `PUT /api/cart/items/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

/// One cart line as returned to the client. `unit_price` already accounts
/// for the product's active discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemResponse {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub title: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// Response of `GET /api/cart/items`. Unauthenticated callers get the empty
/// cart, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub total_items: i64,
    pub subtotal: Decimal,
}

impl CartResponse {
    /// The empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            subtotal: Decimal::ZERO,
        }
    }
}

// =============================================================================
// Promo codes
// =============================================================================

/// Body of `POST /api/promo/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePromoRequest {
    pub code: String,
}

/// A promo discount descriptor. Applied at total-computation time only;
/// never mutates the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum PromoDiscount {
    /// Percentage off the goods total (0-100).
    Percentage(u8),
    /// Fixed amount off the goods total, floored at zero.
    Fixed(Decimal),
}

/// Response of `POST /api/promo/validate`. An unknown code is a negative
/// result, not an error status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePromoResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<PromoDiscount>,
}

// =============================================================================
// Checkout & orders
// =============================================================================

/// Body of `POST /api/create-payment-intent`. Amount in major units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentRequest {
    pub amount: Decimal,
}

/// Response of `POST /api/create-payment-intent`. The client secret is
/// opaque to us; only the provider's browser SDK consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

/// One immutable order line snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub id: OrderItemId,
    pub title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

/// An order with its line snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

/// Response of `GET /api/verify-payment/{id}`.
///
/// `status` is the provider's status verbatim; `order` is present only when
/// the payment succeeded and the order was materialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderResponse>,
}

/// Body of `PUT /api/admin/orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Response of `POST /api/admin/orders/{id}/refund`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundResponse {
    pub refund_id: String,
    pub refund_status: String,
    pub order_status: OrderStatus,
}

// =============================================================================
// Errors
// =============================================================================

/// Uniform error body returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let body = RefreshRequest {
            refresh_token: "abc".into(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"refreshToken":"abc"}"#);
    }

    #[test]
    fn test_add_item_quantity_defaults_to_absent() {
        let body: AddCartItemRequest =
            serde_json::from_str(r#"{"productId": 3}"#).unwrap();
        assert_eq!(body.product_id, ProductId::new(3));
        assert_eq!(body.quantity, None);
    }

    #[test]
    fn test_promo_discount_tagged_representation() {
        let pct = serde_json::to_value(PromoDiscount::Percentage(10)).unwrap();
        assert_eq!(pct["type"], "percentage");

        let fixed = serde_json::to_value(PromoDiscount::Fixed("5.00".parse().unwrap())).unwrap();
        assert_eq!(fixed["type"], "fixed");
    }

    #[test]
    fn test_verify_payment_omits_absent_order() {
        let resp = VerifyPaymentResponse {
            status: "requires_payment_method".into(),
            order: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("order"));
    }
}
