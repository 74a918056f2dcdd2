//! Order domain types.
//!
//! Orders are immutable snapshots. Line amounts are frozen at creation and
//! must never be recomputed from the products table.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use juniper_core::wire::{OrderItemResponse, OrderResponse};
use juniper_core::{OrderId, OrderItemId, OrderStatus, UserId};

use super::cart::CartLine;

/// An order header row.
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub payment_intent_id: Option<String>,
    pub shipping_address: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order line snapshot row.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

/// An order with its line snapshots loaded.
#[derive(Debug, Clone)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderWithItems {
    /// Wire projection.
    #[must_use]
    pub fn to_response(&self) -> OrderResponse {
        OrderResponse {
            id: self.order.id,
            status: self.order.status,
            total: self.order.total,
            tax: self.order.tax,
            shipping: self.order.shipping,
            payment_intent_id: self.order.payment_intent_id.clone(),
            created_at: self.order.created_at,
            items: self
                .items
                .iter()
                .map(|i| OrderItemResponse {
                    id: i.id,
                    title: i.product_title.clone(),
                    unit_price: i.unit_price,
                    quantity: i.quantity,
                    subtotal: i.subtotal,
                })
                .collect(),
        }
    }
}

/// The frozen copy of one cart line, taken at checkout time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineSnapshot {
    pub product_title: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

impl From<&CartLine> for OrderLineSnapshot {
    fn from(line: &CartLine) -> Self {
        Self {
            product_title: line.title.clone(),
            unit_price: line.unit_price(),
            quantity: line.quantity,
            subtotal: line.line_total(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use juniper_core::{CartId, CartItemId, ProductId};

    #[test]
    fn test_snapshot_freezes_discounted_amounts() {
        let line = CartLine {
            id: CartItemId::new(1),
            cart_id: CartId::new(1),
            product_id: ProductId::new(9),
            title: "Juniper Mug".into(),
            price: "10.00".parse().unwrap(),
            discount_percent: 10,
            quantity: 2,
        };

        let snapshot = OrderLineSnapshot::from(&line);
        assert_eq!(snapshot.product_title, "Juniper Mug");
        assert_eq!(snapshot.unit_price, "9.00".parse::<Decimal>().unwrap());
        assert_eq!(snapshot.quantity, 2);
        assert_eq!(snapshot.subtotal, "18.00".parse::<Decimal>().unwrap());
    }
}
