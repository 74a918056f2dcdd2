//! Checkout route handlers.
//!
//! The payment flow: the client asks for an intent, pays inside the
//! provider's own UI, then returns here with the intent id. Verification
//! asks the provider for the authoritative status and only a "succeeded"
//! answer materializes an order.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use juniper_core::wire::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, ValidatePromoRequest,
    ValidatePromoResponse, VerifyPaymentResponse,
};

use crate::error::{AppError, Result};
use crate::middleware::OptionalUser;
use crate::services::checkout::{CheckoutService, promo};
use crate::state::AppState;

/// Query parameters of `GET /api/verify-payment/{id}`.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// Optional promo code, applied at total-computation time only.
    pub promo: Option<String>,
}

/// `POST /api/promo/validate` - look up a promo code.
///
/// Unknown codes are a `valid: false` result, not an error status.
pub async fn validate_promo(
    Json(body): Json<ValidatePromoRequest>,
) -> Json<ValidatePromoResponse> {
    let discount = promo::lookup(&body.code);

    Json(ValidatePromoResponse {
        valid: discount.is_some(),
        discount,
    })
}

/// `POST /api/create-payment-intent` - create a provider payment intent.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(body): Json<CreatePaymentIntentRequest>,
) -> Result<Json<CreatePaymentIntentResponse>> {
    let service = CheckoutService::new(state.pool(), state.payments());

    let intent = service.create_payment_intent(body.amount).await?;

    let client_secret = intent.client_secret.ok_or_else(|| {
        AppError::Internal("provider returned an intent without a client secret".to_owned())
    })?;

    Ok(Json(CreatePaymentIntentResponse { client_secret }))
}

/// `GET /api/verify-payment/{payment_intent_id}` - check the provider's
/// status and, on success, turn the caller's cart into an order.
pub async fn verify_payment(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Path(payment_intent_id): Path<String>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyPaymentResponse>> {
    let service = CheckoutService::new(state.pool(), state.payments());

    let outcome = service
        .verify_payment(
            user.map(|u| u.id),
            &payment_intent_id,
            query.promo.as_deref(),
        )
        .await?;

    Ok(Json(VerifyPaymentResponse {
        status: outcome.status,
        order: outcome.order.map(|o| o.to_response()),
    }))
}
