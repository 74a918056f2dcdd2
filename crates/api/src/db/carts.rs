//! Cart repository for database operations.
//!
//! Concurrency relies on row-level atomicity: the add-merge is a single
//! `INSERT ... ON CONFLICT DO UPDATE`, and every mutation by item id carries
//! the owner's `user_id` in the same statement, so an item id from another
//! user's cart simply matches zero rows.

use sqlx::PgPool;

use juniper_core::{CartId, CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartLine};

const LINE_COLUMNS: &str = "ci.id, ci.cart_id, ci.product_id, p.title, p.price, \
                            p.discount_percent, ci.quantity";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating it on first interaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the cart row vanishes
    /// between insert and select (users are never hard-deleted, so this
    /// indicates a broken foreign key).
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        // ON CONFLICT DO NOTHING keeps concurrent first interactions from
        // violating the one-cart-per-user unique constraint.
        sqlx::query("INSERT INTO carts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        let cart = sqlx::query_as::<_, Cart>(
            "SELECT id, user_id, created_at FROM carts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        cart.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("cart missing after upsert for user {user_id}"))
        })
    }

    /// All lines of a cart, joined with current product title and pricing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, CartLine>(&format!(
            "SELECT {LINE_COLUMNS}
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.created_at ASC"
        ))
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add a product to a cart, merging into the existing line if present.
    ///
    /// A second add of the same product increments the stored quantity
    /// instead of inserting a duplicate row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_line(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let item_id: CartItemId = sqlx::query_scalar(
            "INSERT INTO cart_items (cart_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity,
                           updated_at = now()
             RETURNING id",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        let line = sqlx::query_as::<_, CartLine>(&format!(
            "SELECT {LINE_COLUMNS}
             FROM cart_items ci
             JOIN products p ON p.id = ci.product_id
             WHERE ci.id = $1"
        ))
        .bind(item_id)
        .fetch_optional(self.pool)
        .await?;

        line.ok_or_else(|| {
            RepositoryError::DataCorruption(format!("cart line {item_id} missing after upsert"))
        })
    }

    /// Overwrite a line's quantity, only if the line belongs to the user.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was updated, `false` when the item does not
    /// exist or belongs to someone else's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_quantity(
        &self,
        item_id: CartItemId,
        user_id: UserId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE cart_items ci
             SET quantity = $3, updated_at = now()
             FROM carts c
             WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2",
        )
        .bind(item_id)
        .bind(user_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a line, only if it belongs to the user.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted, `false` when the item does not
    /// exist or belongs to someone else's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_line(
        &self,
        item_id: CartItemId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM cart_items ci
             USING carts c
             WHERE ci.id = $1 AND ci.cart_id = c.id AND c.user_id = $2",
        )
        .bind(item_id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every line of a cart. Returns the number of deleted lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
