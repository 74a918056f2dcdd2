//! Product catalog domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use juniper_core::{ProductId, discounted_unit_price};

/// A catalog product.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// List price in major units.
    pub price: Decimal,
    /// Active discount, 0-100.
    pub discount_percent: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Effective unit price after the active discount.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        discounted_unit_price(self.price, self.discount_percent)
    }
}
