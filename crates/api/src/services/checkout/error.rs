//! Checkout error types.

use rust_decimal::Decimal;
use thiserror::Error;

use juniper_core::OrderStatus;

use crate::db::RepositoryError;
use crate::payments::PaymentError;

/// Errors that can occur during checkout and order management.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout attempted with no cart lines; nothing was created.
    #[error("cart is empty")]
    EmptyCart,

    /// Payment succeeded but no purchaser was identified. Money has been
    /// captured with no order to show for it: an operational problem that
    /// needs manual reconciliation, never silently swallowed.
    #[error("authentication required to complete checkout")]
    AuthenticationRequired,

    /// Refund attempted on an order with no payment-intent reference.
    #[error("order has no payment intent and cannot be refunded")]
    NotRefundable,

    /// The order does not exist.
    #[error("order not found")]
    OrderNotFound,

    /// Payment amount must be positive and representable in cents.
    #[error("invalid payment amount: {0}")]
    InvalidAmount(Decimal),

    /// Illegal admin status transition.
    #[error("cannot transition order from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Payment provider failure, message preserved verbatim.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
