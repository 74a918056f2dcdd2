//! Cart error types.

use thiserror::Error;

use juniper_core::ProductId;

use crate::db::RepositoryError;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be at least 1; use remove instead of zeroing a line.
    #[error("quantity must be at least 1 (got {0})")]
    InvalidQuantity(i32),

    /// The product is not in the catalog. Catalog rows come from the
    /// import/admin path; the cart never creates them.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The cart item does not belong to the caller. Presented as not-found
    /// so another user's item ids are indistinguishable from absent ones.
    #[error("cart item not found")]
    Ownership,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
