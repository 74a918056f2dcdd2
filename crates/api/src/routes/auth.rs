//! Authentication route handlers.
//!
//! Registration auto-logs-in; login and refresh both hand back a complete
//! token pair. Logout is a client-side affair in this design; the server
//! holds no session state to tear down. `/api/revoke-sessions` bumps
//! the user's token version and kills every outstanding refresh token.

use axum::{Json, extract::State, http::StatusCode};

use juniper_core::wire::{
    AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest, TokenPairResponse,
};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// `POST /api/register` - create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let service = AuthService::new(state.pool(), state.tokens());

    let (user, pair) = service
        .register(
            &body.username,
            &body.email,
            &body.password,
            body.language.as_deref(),
        )
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            user: user.to_public(),
        }),
    ))
}

/// `POST /api/login` - exchange credentials for a token pair.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let service = AuthService::new(state.pool(), state.tokens());

    let (user, pair) = service.login(&body.username, &body.password).await?;

    Ok(Json(AuthResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: user.to_public(),
    }))
}

/// `POST /api/refresh` - rotate a refresh token into a brand-new pair.
///
/// No bearer auth: the refresh token in the body is the credential.
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>> {
    let service = AuthService::new(state.pool(), state.tokens());

    let (_user, pair) = service.rotate_tokens(&body.refresh_token).await?;

    Ok(Json(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// `GET /api/me` - the authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
) -> Result<Json<PublicUser>> {
    let service = AuthService::new(state.pool(), state.tokens());

    let user = service.get_user(auth.id).await?;

    Ok(Json(user.to_public()))
}

/// `POST /api/logout` - acknowledge logout.
///
/// Tokens are stateless, so there is nothing to invalidate here; the client
/// discards its stored pair. A stolen refresh token survives logout; see
/// `/api/revoke-sessions` for the hard variant.
pub async fn logout(RequireUser(auth): RequireUser) -> StatusCode {
    tracing::debug!(user_id = %auth.id, "logout acknowledged");
    StatusCode::NO_CONTENT
}

/// `POST /api/revoke-sessions` - invalidate every outstanding refresh token
/// for the caller by bumping their token version.
pub async fn revoke_sessions(
    State(state): State<AppState>,
    RequireUser(auth): RequireUser,
) -> Result<StatusCode> {
    let service = AuthService::new(state.pool(), state.tokens());

    service.revoke_sessions(auth.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
