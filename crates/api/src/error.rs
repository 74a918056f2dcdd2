//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding. All route handlers return `Result<T, AppError>`;
//! the response body is always a JSON [`ErrorResponse`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use juniper_core::wire::ErrorResponse;

use crate::db::RepositoryError;
use crate::payments::PaymentError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::services::tokens::TokenError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Token verification failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout operation failed.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but not allowed.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Token(_) => StatusCode::UNAUTHORIZED,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::UserNotFound
                | AuthError::Token(_) => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Cart(err) => match err {
                CartError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
                // Another user's item ids must be indistinguishable from
                // absent ones.
                CartError::UnknownProduct(_) | CartError::Ownership => StatusCode::NOT_FOUND,
                CartError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(err) => match err {
                CheckoutError::EmptyCart
                | CheckoutError::NotRefundable
                | CheckoutError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
                CheckoutError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
                CheckoutError::OrderNotFound => StatusCode::NOT_FOUND,
                CheckoutError::InvalidTransition { .. } => StatusCode::CONFLICT,
                CheckoutError::Payment(_) => StatusCode::BAD_GATEWAY,
                CheckoutError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details never leak; provider
    /// messages pass through verbatim because reconciliation depends on
    /// them.
    fn message(&self) -> String {
        match self {
            Self::Token(_) => "Please log in again".to_owned(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_owned(),
                AuthError::UserNotFound | AuthError::Token(_) => "Please log in again".to_owned(),
                AuthError::UserAlreadyExists => {
                    "An account with this username or email already exists".to_owned()
                }
                AuthError::WeakPassword(msg) | AuthError::InvalidUsername(msg) => msg.clone(),
                AuthError::InvalidEmail(_) => "Invalid email address".to_owned(),
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_owned()
                }
            },
            Self::Cart(err) => match err {
                CartError::InvalidQuantity(_) => err.to_string(),
                CartError::UnknownProduct(_) => "Product not found".to_owned(),
                CartError::Ownership => "Cart item not found".to_owned(),
                CartError::Repository(_) => "Internal server error".to_owned(),
            },
            Self::Checkout(err) => match err {
                CheckoutError::Payment(PaymentError::Provider { message, .. }) => message.clone(),
                CheckoutError::Payment(PaymentError::Http(_)) => {
                    "Payment provider unreachable, please retry".to_owned()
                }
                // A charge may already exist; route the user to support
                // instead of inviting a second payment attempt.
                CheckoutError::Repository(_) => {
                    "Order could not be recorded. Please contact support".to_owned()
                }
                other => other.to_string(),
            },
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_owned(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Unauthorized(_) => "Please log in again".to_owned(),
            Self::Forbidden(_) => "Forbidden".to_owned(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server-class errors to Sentry
        if status.is_server_error() || status == StatusCode::BAD_GATEWAY {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorResponse {
            error: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use juniper_core::OrderStatus;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        assert_eq!(
            get_status(AppError::Token(TokenError::Expired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Token(TokenError::Invalid)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_ownership_is_not_found() {
        // Never reveal that the item exists in someone else's cart.
        assert_eq!(
            get_status(AppError::Cart(CartError::Ownership)),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_checkout_statuses() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::AuthenticationRequired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::NotRefundable)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Refunded,
            })),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_provider_message_passes_through() {
        let err = AppError::Checkout(CheckoutError::Payment(PaymentError::Provider {
            status: 402,
            message: "Your card was declined.".to_owned(),
        }));
        assert_eq!(err.message(), "Your card was declined.");
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_internal_details_do_not_leak() {
        let err = AppError::Internal("connection pool exhausted on 10.0.3.7".to_owned());
        assert_eq!(err.message(), "Internal server error");
    }
}
