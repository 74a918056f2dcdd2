//! Session mechanics: bearer attachment, 401 interception, single-flight
//! rotation, and the proactive refresh task.
//!
//! The rotation endpoint reissues BOTH tokens, so two concurrent rotations
//! would invalidate each other's refresh tokens. The rule here: one
//! rotation in flight at a time. The first caller to see a 401 takes the
//! lock and rotates; everyone who was waiting re-reads the store, notices
//! the access token changed under them, and reuses it instead of rotating
//! again.

use std::time::Duration;

use reqwest::{Method, Response, StatusCode};

use juniper_core::wire::{ErrorResponse, RefreshRequest, TokenPairResponse};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::store::StoredTokens;

/// Proactive rotation period: one minute short of the 15-minute access
/// token lifetime, so the 401 path stays a fallback.
const PROACTIVE_REFRESH_INTERVAL: Duration = Duration::from_secs(14 * 60);

impl ApiClient {
    /// Send an authenticated request, transparently rotating the token pair
    /// and retrying exactly once on 401.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` when there is no session or
    /// rotation was rejected (tokens are discarded in that case), and
    /// `ClientError::Api` for other non-2xx answers.
    pub(crate) async fn send_authed(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ClientError> {
        let access = self
            .inner
            .store
            .load()
            .await?
            .map(|tokens| tokens.access_token);

        let response = self
            .send_raw(method.clone(), path, body.clone(), access.as_deref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check(response).await;
        }

        // 401: rotate once and retry once. With no tokens at all there is
        // nothing to rotate with.
        let Some(stale_access) = access else {
            return Err(ClientError::Unauthorized);
        };

        let Some(fresh_access) = self.rotate_shared(&stale_access).await? else {
            return Err(ClientError::Unauthorized);
        };

        let retry = self
            .send_raw(method, path, body, Some(&fresh_access))
            .await?;

        if retry.status() == StatusCode::UNAUTHORIZED {
            // The retried request is not retried again; one rotation per
            // original request, or the two would loop forever on a bad
            // refresh token.
            return Err(ClientError::Unauthorized);
        }

        Self::check(retry).await
    }

    async fn send_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        access_token: Option<&str>,
    ) -> Result<Response, ClientError> {
        let mut request = self.inner.http.request(method, self.url(path)?);

        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        Ok(request.send().await?)
    }

    /// Rotate the token pair, sharing one in-flight rotation among
    /// concurrent callers.
    ///
    /// Returns the access token to proceed with, or `None` when the session
    /// is gone (no stored tokens, or the server rejected the refresh token
    /// and the pair has been discarded).
    ///
    /// `stale_access` is the access token the caller just failed with: if
    /// the stored token already differs, another caller finished rotating
    /// while we waited for the lock and we reuse their result.
    pub(crate) async fn rotate_shared(
        &self,
        stale_access: &str,
    ) -> Result<Option<String>, ClientError> {
        let _guard = self.inner.rotation.lock().await;

        let Some(current) = self.inner.store.load().await? else {
            return Ok(None);
        };

        if current.access_token != stale_access {
            return Ok(Some(current.access_token));
        }

        self.rotate_locked(current).await
    }

    /// Perform the actual rotation. Caller must hold the rotation lock.
    async fn rotate_locked(&self, current: StoredTokens) -> Result<Option<String>, ClientError> {
        let body = RefreshRequest {
            refresh_token: current.refresh_token,
        };

        let response = self
            .inner
            .http
            .post(self.url("/api/refresh")?)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            // The refresh token is invalid or revoked: the whole session is
            // over. Discard both tokens; the caller reports logged-out.
            tracing::debug!(status = %response.status(), "token rotation rejected; clearing session");
            self.inner.store.clear().await?;
            return Ok(None);
        }

        let pair: TokenPairResponse = response.json().await?;

        self.inner
            .store
            .save(&StoredTokens {
                access_token: pair.access_token.clone(),
                refresh_token: pair.refresh_token,
            })
            .await?;

        Ok(Some(pair.access_token))
    }

    /// Rotate the pair now (the proactive path). Returns `false` when there
    /// is no session to refresh or the server rejected it.
    ///
    /// # Errors
    ///
    /// Returns transport and store errors; the session survives those.
    pub async fn refresh_session(&self) -> Result<bool, ClientError> {
        let _guard = self.inner.rotation.lock().await;

        let Some(current) = self.inner.store.load().await? else {
            return Ok(false);
        };

        Ok(self.rotate_locked(current).await?.is_some())
    }

    /// Spawn the background task that rotates the pair every 14 minutes,
    /// keeping the access token fresh so the 401 path is a fallback rather
    /// than the primary refresh mechanism.
    ///
    /// The task runs until the handle is dropped/aborted. Transport errors
    /// are logged and retried on the next tick; a rejected rotation ends
    /// the session (tokens discarded) and the task keeps idling.
    #[must_use]
    pub fn spawn_proactive_refresh(&self) -> tokio::task::JoinHandle<()> {
        let client = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(PROACTIVE_REFRESH_INTERVAL);
            // The first tick fires immediately; the session is fresh then.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                match client.refresh_session().await {
                    Ok(true) => tracing::debug!("proactive token rotation complete"),
                    Ok(false) => tracing::debug!("no session to refresh"),
                    Err(e) => tracing::warn!(error = %e, "proactive token rotation failed"),
                }
            }
        })
    }

    /// Map a non-2xx response to `ClientError::Api` with the server's
    /// message; pass 2xx through.
    pub(crate) async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .map_or_else(|_| format!("HTTP {status}"), |body| body.error);

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
