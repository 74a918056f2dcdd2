//! Order route handlers: user order history plus the admin back-office.

use axum::{
    Json,
    extract::{Path, State},
};

use juniper_core::OrderId;
use juniper_core::wire::{OrderResponse, RefundResponse, UpdateOrderStatusRequest};

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireUser};
use crate::services::checkout::CheckoutService;
use crate::state::AppState;

/// `GET /api/orders` - the caller's order history, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<OrderResponse>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(orders.iter().map(|o| o.to_response()).collect()))
}

/// `GET /api/orders/{id}` - one order, only if it belongs to the caller.
///
/// A foreign order id is indistinguishable from an absent one.
pub async fn get(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(order_id): Path<OrderId>,
) -> Result<Json<OrderResponse>> {
    let order = OrderRepository::new(state.pool())
        .get_for_user(order_id, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

    Ok(Json(order.to_response()))
}

/// `PUT /api/admin/orders/{id}/status` - admin status transition, validated
/// against the order state machine.
pub async fn admin_update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(order_id): Path<OrderId>,
    Json(body): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>> {
    let service = CheckoutService::new(state.pool(), state.payments());

    let order = service.update_status(order_id, body.status).await?;

    tracing::info!(
        admin = %admin.username,
        order_id = %order_id,
        status = %order.status,
        "order status updated"
    );

    let full = OrderRepository::new(state.pool())
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

    Ok(Json(full.to_response()))
}

/// `POST /api/admin/orders/{id}/refund` - refund through the provider and
/// mark the order refunded.
pub async fn admin_refund(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(order_id): Path<OrderId>,
) -> Result<Json<RefundResponse>> {
    let service = CheckoutService::new(state.pool(), state.payments());

    let (refund, order) = service.refund(order_id).await?;

    tracing::info!(
        admin = %admin.username,
        order_id = %order_id,
        refund_id = %refund.id,
        "refund issued"
    );

    Ok(Json(RefundResponse {
        refund_id: refund.id,
        refund_status: refund.status,
        order_status: order.status,
    }))
}
