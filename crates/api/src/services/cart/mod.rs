//! Cart service.
//!
//! CRUD over one user's line items with idempotent-merge semantics on add.
//! Every mutation is ownership-scoped: the caller's user id travels into the
//! SQL statement, so a foreign item id matches zero rows and surfaces as
//! [`CartError::Ownership`].

mod error;

pub use error::CartError;

use sqlx::PgPool;

use juniper_core::{CartItemId, ProductId, UserId};

use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::models::{Cart, CartLine, CartView};

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// The user's cart, created lazily on first interaction.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the database operation fails.
    pub async fn get_cart(&self, user_id: UserId) -> Result<Cart, CartError> {
        Ok(self.carts.get_or_create(user_id).await?)
    }

    /// The user's cart lines with derived totals.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the database operation fails.
    pub async fn view(&self, user_id: UserId) -> Result<CartView, CartError> {
        let cart = self.carts.get_or_create(user_id).await?;
        let lines = self.carts.lines(cart.id).await?;
        Ok(CartView::new(lines))
    }

    /// Add a product to the user's cart, merging into an existing line.
    ///
    /// Adding the same product twice increments the stored quantity; there
    /// is never more than one line per (cart, product).
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for quantities below 1 and
    /// `CartError::UnknownProduct` when the catalog has no such product.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        if self.products.get_by_id(product_id).await?.is_none() {
            return Err(CartError::UnknownProduct(product_id));
        }

        let cart = self.carts.get_or_create(user_id).await?;
        let line = self.carts.upsert_line(cart.id, product_id, quantity).await?;

        tracing::debug!(
            user_id = %user_id,
            product_id = %product_id,
            quantity = line.quantity,
            "cart line upserted"
        );

        Ok(line)
    }

    /// Overwrite a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for quantities below 1 (the
    /// stored quantity is left untouched) and `CartError::Ownership` when
    /// the item does not belong to the caller's cart.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity(quantity));
        }

        let updated = self
            .carts
            .update_quantity(item_id, user_id, quantity)
            .await?;

        if !updated {
            return Err(CartError::Ownership);
        }

        Ok(())
    }

    /// Remove a line from the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Ownership` when the item does not belong to the
    /// caller's cart.
    pub async fn remove_item(&self, user_id: UserId, item_id: CartItemId) -> Result<(), CartError> {
        let deleted = self.carts.delete_line(item_id, user_id).await?;

        if !deleted {
            return Err(CartError::Ownership);
        }

        Ok(())
    }

    /// Empty the user's cart. Returns the number of removed lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the database operation fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, CartError> {
        let cart = self.carts.get_or_create(user_id).await?;
        Ok(self.carts.clear(cart.id).await?)
    }
}
