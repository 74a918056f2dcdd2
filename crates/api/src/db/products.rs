//! Product repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use juniper_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

const PRODUCT_COLUMNS: &str = "id, title, price, discount_percent, created_at, updated_at";

/// Repository for catalog database operations.
///
/// Catalog rows are created by the seed/admin path only; the cart never
/// creates them implicitly.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List the whole catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Create a catalog row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(
        &self,
        title: &str,
        price: Decimal,
        discount_percent: i32,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (title, price, discount_percent)
             VALUES ($1, $2, $3)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(title)
        .bind(price)
        .bind(discount_percent)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Update a product's list price.
    ///
    /// Existing order snapshots are unaffected; carts pick the new price up
    /// on the next read.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_price(
        &self,
        id: ProductId,
        price: Decimal,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET price = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(price)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
