//! Route definitions.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::error::AppError;
use crate::state::AppState;

/// Build the full API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Authentication
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/refresh", post(auth::refresh))
        .route("/api/me", get(auth::me))
        .route("/api/logout", post(auth::logout))
        .route("/api/revoke-sessions", post(auth::revoke_sessions))
        // Cart
        .route(
            "/api/cart/items",
            get(cart::list).post(cart::add).delete(cart::clear),
        )
        .route(
            "/api/cart/items/{id}",
            put(cart::update).delete(cart::remove),
        )
        // Promo & checkout
        .route("/api/promo/validate", post(checkout::validate_promo))
        .route(
            "/api/create-payment-intent",
            post(checkout::create_payment_intent),
        )
        .route(
            "/api/verify-payment/{payment_intent_id}",
            get(checkout::verify_payment),
        )
        // Orders
        .route("/api/orders", get(orders::list))
        .route("/api/orders/{id}", get(orders::get))
        // Admin back-office
        .route(
            "/api/admin/orders/{id}/status",
            put(orders::admin_update_status),
        )
        .route("/api/admin/orders/{id}/refund", post(orders::admin_refund))
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("no such route".to_owned())
}
