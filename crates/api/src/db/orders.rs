//! Order repository for database operations.
//!
//! Order creation is the one multi-statement unit of work in this crate:
//! inserting the header, inserting the line snapshots, and clearing the cart
//! happen inside a single transaction. A failure at any point rolls the
//! whole unit back, so a cleared cart always has a matching order.

use rust_decimal::Decimal;
use sqlx::PgPool;

use juniper_core::{CartId, OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderLineSnapshot, OrderWithItems};

const ORDER_COLUMNS: &str = "id, user_id, status, total, tax, shipping, payment_intent_id, \
                             shipping_address, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_title, unit_price, quantity, subtotal";

/// Monetary totals of an order, computed by the checkout service.
#[derive(Debug, Clone, Copy)]
pub struct OrderTotals {
    pub total: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Materialize an order from cart state, atomically.
    ///
    /// Inserts the order header, one snapshot row per cart line, and deletes
    /// the cart's lines, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is persisted in that case.
    pub async fn create_from_cart(
        &self,
        user_id: UserId,
        cart_id: CartId,
        totals: OrderTotals,
        payment_intent_id: &str,
        lines: &[OrderLineSnapshot],
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO orders (user_id, status, total, tax, shipping, payment_intent_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(OrderStatus::Pending)
        .bind(totals.total)
        .bind(totals.tax)
        .bind(totals.shipping)
        .bind(payment_intent_id)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            let item = sqlx::query_as::<_, OrderItem>(&format!(
                "INSERT INTO order_items (order_id, product_title, unit_price, quantity, subtotal)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {ITEM_COLUMNS}"
            ))
            .bind(order.id)
            .bind(&line.product_title)
            .bind(line.unit_price)
            .bind(line.quantity)
            .bind(line.subtotal)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// Get an order with its line snapshots.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderWithItems>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match order {
            Some(order) => {
                let items = self.items_for(order.id).await?;
                Ok(Some(OrderWithItems { order, items }))
            }
            None => Ok(None),
        }
    }

    /// Get an order only if it belongs to the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_for_user(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        match order {
            Some(order) => {
                let items = self.items_for(order.id).await?;
                Ok(Some(OrderWithItems { order, items }))
            }
            None => Ok(None),
        }
    }

    /// Find the order already materialized for a payment intent, if any.
    ///
    /// Verify-payment is retried by clients; this lookup is what makes the
    /// cart-to-order transition exactly-once.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE payment_intent_id = $1"
        ))
        .bind(payment_intent_id)
        .fetch_optional(self.pool)
        .await?;

        match order {
            Some(order) => {
                let items = self.items_for(order.id).await?;
                Ok(Some(OrderWithItems { order, items }))
            }
            None => Ok(None),
        }
    }

    /// A user's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items_for(order.id).await?;
            result.push(OrderWithItems { order, items });
        }

        Ok(result)
    }

    /// Overwrite an order's status.
    ///
    /// Transition legality is the caller's responsibility
    /// (`OrderStatus::can_transition_to`); the refund flow writes `Refunded`
    /// directly after the provider confirms.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        order.ok_or(RepositoryError::NotFound)
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id ASC"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}
