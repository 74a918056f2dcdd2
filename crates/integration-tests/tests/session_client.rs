//! Session client behavior against an in-process stub server.
//!
//! The stub implements just the wire contract the client depends on:
//! `POST /api/refresh` rotates a pair (reissuing BOTH tokens, like the real
//! server), and the authenticated routes accept only the currently-valid
//! access token. No database or network access needed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use tokio::sync::Mutex;

use juniper_client::{ApiClient, MemoryTokenStore, StoredTokens, TokenStore};
use juniper_core::UserId;
use juniper_core::wire::{PublicUser, RefreshRequest, TokenPairResponse};

// ============================================================================
// Stub server
// ============================================================================

#[derive(Clone)]
struct StubState {
    /// The currently-valid pair; refresh rotates it.
    valid: Arc<Mutex<StoredTokens>>,
    /// Successful rotations performed.
    refresh_calls: Arc<AtomicUsize>,
    /// Requests seen by `GET /api/me`.
    me_calls: Arc<AtomicUsize>,
    /// Counter for minting unique token strings.
    counter: Arc<AtomicUsize>,
    /// When true, `/api/me` rejects every access token; exercises the
    /// retry-at-most-once rule.
    reject_all_access: bool,
}

fn stub_user() -> PublicUser {
    PublicUser {
        id: UserId::new(1),
        username: "freya".to_owned(),
        email: "freya@example.com".to_owned(),
        is_admin: false,
        language: "en".to_owned(),
    }
}

async fn stub_refresh(
    State(state): State<StubState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, StatusCode> {
    let mut valid = state.valid.lock().await;

    if body.refresh_token != valid.refresh_token {
        return Err(StatusCode::UNAUTHORIZED);
    }

    // Hold the rotation open briefly so concurrent callers pile up behind
    // the client's single-flight lock while one rotation is in flight.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let n = state.counter.fetch_add(1, Ordering::SeqCst) + 1;
    valid.access_token = format!("access-{n}");
    valid.refresh_token = format!("refresh-{n}");
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);

    Ok(Json(TokenPairResponse {
        access_token: valid.access_token.clone(),
        refresh_token: valid.refresh_token.clone(),
    }))
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

async fn stub_me(
    State(state): State<StubState>,
    headers: HeaderMap,
) -> Result<Json<PublicUser>, StatusCode> {
    state.me_calls.fetch_add(1, Ordering::SeqCst);

    let valid = state.valid.lock().await;
    if !state.reject_all_access && bearer(&headers) == Some(valid.access_token.as_str()) {
        Ok(Json(stub_user()))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn stub_cart(
    State(state): State<StubState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let valid = state.valid.lock().await;
    if bearer(&headers) == Some(valid.access_token.as_str()) {
        Ok(Json(serde_json::json!({
            "items": [],
            "totalItems": 0,
            "subtotal": "0",
        })))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

/// Start a stub server; returns its state and base URL.
async fn spawn_stub(reject_all_access: bool) -> (StubState, String) {
    let state = StubState {
        valid: Arc::new(Mutex::new(StoredTokens {
            access_token: "access-0".to_owned(),
            refresh_token: "refresh-0".to_owned(),
        })),
        refresh_calls: Arc::new(AtomicUsize::new(0)),
        me_calls: Arc::new(AtomicUsize::new(0)),
        counter: Arc::new(AtomicUsize::new(0)),
        reject_all_access,
    };

    let app = Router::new()
        .route("/api/refresh", post(stub_refresh))
        .route("/api/me", get(stub_me))
        .route("/api/cart/items", get(stub_cart))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    (state, format!("http://{addr}"))
}

/// Build a client whose token store is also held by the test.
fn client_with_store(base_url: &str) -> (ApiClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    let client = ApiClient::new(base_url, Arc::clone(&store)).expect("client");
    (client, store)
}

async fn seed(store: &MemoryTokenStore, access: &str, refresh: &str) {
    store
        .save(&StoredTokens {
            access_token: access.to_owned(),
            refresh_token: refresh.to_owned(),
        })
        .await
        .expect("seed tokens");
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_valid_token_is_attached_and_resolves_user() {
    let (stub, url) = spawn_stub(false).await;
    let (client, store) = client_with_store(&url);
    seed(&store, "access-0", "refresh-0").await;

    let user = client.current_user().await.expect("current_user");

    assert_eq!(user, Some(stub_user()));
    assert_eq!(stub.me_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_401_rotates_once_and_retries_once() {
    let (stub, url) = spawn_stub(false).await;
    let (client, store) = client_with_store(&url);
    // Stale access token, valid refresh token: the 401 fallback path.
    seed(&store, "stale-access", "refresh-0").await;

    let user = client.current_user().await.expect("current_user");

    assert_eq!(user, Some(stub_user()));
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
    // Original request + exactly one retry.
    assert_eq!(stub.me_calls.load(Ordering::SeqCst), 2);

    // The rotated pair was persisted.
    let stored = store.load().await.expect("load").expect("tokens present");
    assert_eq!(stored.access_token, "access-1");
    assert_eq!(stored.refresh_token, "refresh-1");
}

#[tokio::test]
async fn test_rejected_rotation_clears_session() {
    let (stub, url) = spawn_stub(false).await;
    let (client, store) = client_with_store(&url);
    // Both tokens bad: rotation is rejected, the session is over.
    seed(&store, "stale-access", "bogus-refresh").await;

    let user = client.current_user().await.expect("current_user");

    // Logged-out is a None, not an error.
    assert_eq!(user, None);
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.load().await.expect("load"), None);
}

#[tokio::test]
async fn test_no_tokens_resolves_to_none_without_requests() {
    let (stub, url) = spawn_stub(false).await;
    let (client, _store) = client_with_store(&url);

    let user = client.current_user().await.expect("current_user");

    assert_eq!(user, None);
    assert_eq!(stub.me_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_rotation() {
    let (stub, url) = spawn_stub(false).await;
    let (client, store) = client_with_store(&url);
    seed(&store, "stale-access", "refresh-0").await;

    // Eight concurrent requests all hit 401 territory at once. Reissuing
    // both tokens means a second rotation would invalidate the first's
    // refresh token, so exactly one may reach the server.
    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move { client.current_user().await }));
    }

    for handle in handles {
        let user = handle.await.expect("join").expect("current_user");
        assert_eq!(user, Some(stub_user()));
    }

    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_retry_happens_at_most_once() {
    // /api/me rejects every access token: rotation "succeeds" but the
    // retry still 401s. The client must give up, not loop.
    let (stub, url) = spawn_stub(true).await;
    let (client, store) = client_with_store(&url);
    seed(&store, "stale-access", "refresh-0").await;

    let user = client.current_user().await.expect("current_user");

    assert_eq!(user, None);
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(stub.me_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cart_items_fall_back_to_empty_when_logged_out() {
    let (_stub, url) = spawn_stub(false).await;
    let (client, _store) = client_with_store(&url);

    let cart = client.cart_items().await.expect("cart_items");

    assert!(cart.items.is_empty());
    assert_eq!(cart.total_items, 0);
}

#[tokio::test]
async fn test_proactive_refresh_rotates_in_background() {
    let (stub, url) = spawn_stub(false).await;
    let (client, store) = client_with_store(&url);
    seed(&store, "access-0", "refresh-0").await;

    // Drive the rotation directly rather than waiting 14 minutes; the
    // background task calls exactly this method on its interval.
    let rotated = client.refresh_session().await.expect("refresh_session");

    assert!(rotated);
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);

    let stored = store.load().await.expect("load").expect("tokens present");
    assert_eq!(stored.access_token, "access-1");

    // The old access token no longer works; the new one does.
    let user = client.current_user().await.expect("current_user");
    assert_eq!(user, Some(stub_user()));
    assert_eq!(stub.refresh_calls.load(Ordering::SeqCst), 1);
}
