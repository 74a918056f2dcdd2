//! Authentication extractors.
//!
//! Handlers declare what they need in their signature: [`RequireUser`] for a
//! verified identity, [`OptionalUser`] where anonymous callers are fine, and
//! [`RequireAdmin`] for the back-office surface. Verification is stateless
//! (signature + expiry); only the admin check touches the database, because
//! the admin flag is not embedded in token claims.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use juniper_core::UserId;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// The identity carried by a verified access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub username: String,
}

/// Extractor that requires a valid bearer access token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireUser(pub AuthUser);

/// Extractor that accepts anonymous callers.
///
/// A missing or invalid token yields `None`; it never rejects. The client
/// owns the decision to rotate and retry on 401, so endpoints that serve
/// anonymous callers must not convert a stale token into an error.
pub struct OptionalUser(pub Option<AuthUser>);

/// Extractor that requires a valid bearer token belonging to an admin.
///
/// Carries the full user record, freshly loaded; the admin flag is checked
/// against the database on every request rather than trusted from a claim.
pub struct RequireAdmin(pub User);

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

fn verify(parts: &Parts, state: &AppState) -> Result<AuthUser, AppError> {
    let token = bearer_token(parts)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

    let claims = state.tokens().verify_access(token)?;

    Ok(AuthUser {
        id: claims.sub,
        username: claims.username,
    })
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        verify(parts, state).map(Self)
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(verify(parts, state).ok()))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = verify(parts, state)?;

        let user = UserRepository::new(state.pool())
            .get_by_id(auth_user.id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("unknown user".to_owned()))?;

        if !user.is_admin {
            return Err(AppError::Forbidden("admin access required".to_owned()));
        }

        Ok(Self(user))
    }
}
