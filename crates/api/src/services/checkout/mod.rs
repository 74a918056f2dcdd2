//! Checkout orchestrator.
//!
//! Bridges an external payment confirmation to a durable, immutable order,
//! exactly once. The provider is authoritative for payment state: an order
//! materializes only after `retrieve_payment_intent` reports "succeeded",
//! and the header insert, line snapshots, and cart clear are one
//! transaction.

mod error;
pub mod promo;

pub use error::CheckoutError;

use rust_decimal::Decimal;
use sqlx::PgPool;

use juniper_core::wire::PromoDiscount;
use juniper_core::{OrderId, OrderStatus, UserId, to_minor_units};

use crate::db::carts::CartRepository;
use crate::db::orders::{OrderRepository, OrderTotals};
use crate::models::{CartView, Order, OrderLineSnapshot, OrderWithItems};
use crate::payments::{PaymentClient, PaymentIntent, Refund, STATUS_SUCCEEDED};

/// Fixed tax rate applied to the goods total.
const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Flat shipping fee per order.
const SHIPPING_FLAT: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

/// Settlement currency.
const CURRENCY: &str = "usd";

/// Result of verifying a payment intent.
///
/// `status` is the provider's status verbatim; `order` is present only when
/// the payment succeeded and an order exists for the intent.
#[derive(Debug)]
pub struct VerifyOutcome {
    pub status: String,
    pub order: Option<OrderWithItems>,
}

/// Checkout service.
pub struct CheckoutService<'a> {
    carts: CartRepository<'a>,
    orders: OrderRepository<'a>,
    payments: &'a PaymentClient,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, payments: &'a PaymentClient) -> Self {
        Self {
            carts: CartRepository::new(pool),
            orders: OrderRepository::new(pool),
            payments,
        }
    }

    /// Create a payment intent with the provider for a major-unit amount.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidAmount` for non-positive or
    /// non-representable amounts and `CheckoutError::Payment` for provider
    /// failures.
    pub async fn create_payment_intent(
        &self,
        amount: Decimal,
    ) -> Result<PaymentIntent, CheckoutError> {
        if amount <= Decimal::ZERO {
            return Err(CheckoutError::InvalidAmount(amount));
        }

        let amount_minor =
            to_minor_units(amount).ok_or(CheckoutError::InvalidAmount(amount))?;

        Ok(self
            .payments
            .create_payment_intent(amount_minor, CURRENCY)
            .await?)
    }

    /// Verify a payment intent and, on success, materialize the order.
    ///
    /// A non-"succeeded" status is reported verbatim with no side effects.
    /// Replays of an already-materialized intent return the existing order
    /// instead of creating a second one.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::AuthenticationRequired` when the payment
    /// succeeded with no identified purchaser, `CheckoutError::EmptyCart`
    /// when there is nothing to order, and provider/repository errors
    /// otherwise.
    pub async fn verify_payment(
        &self,
        user_id: Option<UserId>,
        payment_intent_id: &str,
        promo_code: Option<&str>,
    ) -> Result<VerifyOutcome, CheckoutError> {
        // Replay: clients retry this endpoint; the stored intent reference
        // makes the cart-to-order transition exactly-once.
        if let Some(existing) = self.orders.get_by_payment_intent(payment_intent_id).await? {
            return Ok(VerifyOutcome {
                status: STATUS_SUCCEEDED.to_owned(),
                order: Some(existing),
            });
        }

        let intent = self
            .payments
            .retrieve_payment_intent(payment_intent_id)
            .await?;

        if intent.status != STATUS_SUCCEEDED {
            return Ok(VerifyOutcome {
                status: intent.status,
                order: None,
            });
        }

        let Some(user_id) = user_id else {
            // Money captured, no purchaser: do not create an order, and make
            // sure someone sees this.
            tracing::error!(
                payment_intent_id,
                "payment succeeded with no authenticated purchaser; manual reconciliation required"
            );
            return Err(CheckoutError::AuthenticationRequired);
        };

        let cart = self.carts.get_or_create(user_id).await?;
        let view = CartView::new(self.carts.lines(cart.id).await?);
        if view.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let discount = promo_code.and_then(|code| {
            let found = promo::lookup(code);
            if found.is_none() {
                tracing::warn!(code, "ignoring unknown promo code at checkout");
            }
            found
        });

        let totals = compute_totals(view.subtotal(), discount);
        let snapshots: Vec<OrderLineSnapshot> =
            view.lines.iter().map(OrderLineSnapshot::from).collect();

        let order = self
            .orders
            .create_from_cart(user_id, cart.id, totals, payment_intent_id, &snapshots)
            .await?;

        tracing::info!(
            user_id = %user_id,
            order_id = %order.order.id,
            payment_intent_id,
            total = %totals.total,
            "order materialized from cart"
        );

        Ok(VerifyOutcome {
            status: intent.status,
            order: Some(order),
        })
    }

    /// Refund an order through the provider and mark it refunded.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::OrderNotFound` if the order doesn't exist and
    /// `CheckoutError::NotRefundable` (before any provider call) if it has
    /// no payment-intent reference. Provider failures leave the order's
    /// status unchanged.
    pub async fn refund(&self, order_id: OrderId) -> Result<(Refund, Order), CheckoutError> {
        let existing = self
            .orders
            .get(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        let Some(payment_intent_id) = existing.order.payment_intent_id else {
            return Err(CheckoutError::NotRefundable);
        };

        let refund = self.payments.create_refund(&payment_intent_id).await?;
        let order = self.orders.set_status(order_id, OrderStatus::Refunded).await?;

        tracing::info!(
            order_id = %order_id,
            refund_id = %refund.id,
            "order refunded"
        );

        Ok((refund, order))
    }

    /// Admin-driven status transition, validated against the state machine.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::OrderNotFound` if the order doesn't exist and
    /// `CheckoutError::InvalidTransition` for illegal transitions.
    pub async fn update_status(
        &self,
        order_id: OrderId,
        next: OrderStatus,
    ) -> Result<Order, CheckoutError> {
        let existing = self
            .orders
            .get(order_id)
            .await?
            .ok_or(CheckoutError::OrderNotFound)?;

        let current = existing.order.status;
        if !current.can_transition_to(next) {
            return Err(CheckoutError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        Ok(self.orders.set_status(order_id, next).await?)
    }
}

/// Totals from a goods subtotal: promo applies to the goods total only, tax
/// is computed on the discounted goods, shipping is a flat fee.
#[must_use]
pub fn compute_totals(subtotal: Decimal, discount: Option<PromoDiscount>) -> OrderTotals {
    let total = discount.map_or(subtotal, |d| promo::apply(d, subtotal));
    let tax = (total * TAX_RATE)
        .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);

    OrderTotals {
        total,
        tax,
        shipping: SHIPPING_FLAT,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_totals_without_promo() {
        // 10.00 x 2 + 5.00 x 1 = 25.00 pre-tax
        let totals = compute_totals(dec("25.00"), None);
        assert_eq!(totals.total, dec("25.00"));
        assert_eq!(totals.tax, dec("2.00"));
        assert_eq!(totals.shipping, dec("5.00"));
    }

    #[test]
    fn test_totals_with_percentage_promo() {
        let totals = compute_totals(dec("25.00"), Some(PromoDiscount::Percentage(10)));
        assert_eq!(totals.total, dec("22.50"));
        assert_eq!(totals.tax, dec("1.80"));
        assert_eq!(totals.shipping, dec("5.00"));
    }

    #[test]
    fn test_totals_with_fixed_promo() {
        let totals = compute_totals(dec("25.00"), Some(PromoDiscount::Fixed(dec("5.00"))));
        assert_eq!(totals.total, dec("20.00"));
        assert_eq!(totals.tax, dec("1.60"));
    }

    #[test]
    fn test_oversized_fixed_promo_floors_total() {
        let totals = compute_totals(dec("3.00"), Some(PromoDiscount::Fixed(dec("10.00"))));
        assert_eq!(totals.total, dec("0.00"));
        assert_eq!(totals.tax, dec("0.00"));
        // Shipping is still owed on a fully discounted cart.
        assert_eq!(totals.shipping, dec("5.00"));
    }

    #[test]
    fn test_tax_rate_constant() {
        assert_eq!(TAX_RATE, dec("0.08"));
        assert_eq!(SHIPPING_FLAT, dec("5.00"));
    }
}
