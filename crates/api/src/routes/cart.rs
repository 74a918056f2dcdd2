//! Cart route handlers.
//!
//! Listing tolerates anonymous callers (empty cart, not a 401) so the
//! storefront can render a cart badge before login. Every mutation requires
//! a verified identity and is ownership-checked in the service layer.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use juniper_core::CartItemId;
use juniper_core::wire::{AddCartItemRequest, CartItemResponse, CartResponse, UpdateCartItemRequest};

use crate::error::Result;
use crate::middleware::{OptionalUser, RequireUser};
use crate::services::cart::CartService;
use crate::state::AppState;

/// `GET /api/cart/items` - the caller's cart, or the empty cart when
/// unauthenticated.
pub async fn list(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Result<Json<CartResponse>> {
    let Some(user) = user else {
        return Ok(Json(CartResponse::empty()));
    };

    let view = CartService::new(state.pool()).view(user.id).await?;

    Ok(Json(view.to_response()))
}

/// `POST /api/cart/items` - add a product, merging into an existing line.
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<AddCartItemRequest>,
) -> Result<(StatusCode, Json<CartItemResponse>)> {
    let line = CartService::new(state.pool())
        .add_item(user.id, body.product_id, body.quantity.unwrap_or(1))
        .await?;

    Ok((StatusCode::CREATED, Json(line.to_response())))
}

/// `PUT /api/cart/items/{id}` - overwrite a line's quantity.
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(item_id): Path<CartItemId>,
    Json(body): Json<UpdateCartItemRequest>,
) -> Result<StatusCode> {
    CartService::new(state.pool())
        .update_quantity(user.id, item_id, body.quantity)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/cart/items/{id}` - remove a line.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(item_id): Path<CartItemId>,
) -> Result<StatusCode> {
    CartService::new(state.pool())
        .remove_item(user.id, item_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/cart/items` - empty the caller's cart.
pub async fn clear(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<StatusCode> {
    let removed = CartService::new(state.pool()).clear(user.id).await?;

    tracing::debug!(user_id = %user.id, removed, "cart cleared");

    Ok(StatusCode::NO_CONTENT)
}
