//! Cart domain types.
//!
//! Totals are derived values: nothing here is stored, everything is computed
//! from the lines at read time so a product discount change is reflected on
//! the next cart fetch (order snapshots, by contrast, freeze their amounts).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use juniper_core::wire::{CartItemResponse, CartResponse};
use juniper_core::{CartId, CartItemId, ProductId, UserId, discounted_unit_price};

/// A user's cart row. At most one exists per user.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// One cart line joined with its product's current title and pricing.
#[derive(Debug, Clone, FromRow)]
pub struct CartLine {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub title: String,
    pub price: Decimal,
    pub discount_percent: i32,
    pub quantity: i32,
}

impl CartLine {
    /// Unit price after the product's active discount.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        discounted_unit_price(self.price, self.discount_percent)
    }

    /// Line total: discounted unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    /// Wire projection of a single line.
    #[must_use]
    pub fn to_response(&self) -> CartItemResponse {
        CartItemResponse {
            id: self.id,
            product_id: self.product_id,
            title: self.title.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price(),
            line_total: self.line_total(),
        }
    }
}

/// A cart with its lines and derived totals.
#[derive(Debug, Clone)]
pub struct CartView {
    pub lines: Vec<CartLine>,
}

impl CartView {
    #[must_use]
    pub const fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_items(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }

    /// Sum of discounted line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Wire projection.
    #[must_use]
    pub fn to_response(&self) -> CartResponse {
        CartResponse {
            items: self.lines.iter().map(CartLine::to_response).collect(),
            total_items: self.total_items(),
            subtotal: self.subtotal(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(id: i32, price: &str, discount: i32, quantity: i32) -> CartLine {
        CartLine {
            id: CartItemId::new(id),
            cart_id: CartId::new(1),
            product_id: ProductId::new(id),
            title: format!("Product {id}"),
            price: price.parse().unwrap(),
            discount_percent: discount,
            quantity,
        }
    }

    #[test]
    fn test_empty_cart_totals() {
        let view = CartView::new(Vec::new());
        assert_eq!(view.total_items(), 0);
        assert_eq!(view.subtotal(), Decimal::ZERO);
        assert!(view.is_empty());
    }

    #[test]
    fn test_subtotal_sums_discounted_lines() {
        // 10.00 x 2 + 5.00 x 1 = 25.00 pre-tax
        let view = CartView::new(vec![line(1, "10.00", 0, 2), line(2, "5.00", 0, 1)]);
        assert_eq!(view.total_items(), 3);
        assert_eq!(view.subtotal(), "25.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_discount_applies_per_line() {
        // 20.00 at 25% off -> 15.00, x2 = 30.00
        let view = CartView::new(vec![line(1, "20.00", 25, 2)]);
        assert_eq!(view.subtotal(), "30.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_response_mirrors_totals() {
        let view = CartView::new(vec![line(1, "20.00", 0, 1), line(2, "15.00", 0, 2)]);
        let resp = view.to_response();
        assert_eq!(resp.total_items, 3);
        assert_eq!(resp.subtotal, "50.00".parse::<Decimal>().unwrap());
        assert_eq!(resp.items.len(), 2);
        assert_eq!(
            resp.items.first().unwrap().line_total,
            "20.00".parse::<Decimal>().unwrap()
        );
    }
}
