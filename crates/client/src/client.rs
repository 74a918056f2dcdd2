//! The API client.
//!
//! High-level operations over the Juniper Market API. Session mechanics
//! (bearer attachment, 401 interception, rotation) live in `session.rs`;
//! the methods here are thin wrappers around them.

use std::sync::Arc;

use reqwest::Method;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use url::Url;

use juniper_core::wire::{
    AddCartItemRequest, AuthResponse, CartItemResponse, CartResponse, CreatePaymentIntentRequest,
    CreatePaymentIntentResponse, LoginRequest, OrderResponse, PublicUser, RegisterRequest,
    UpdateCartItemRequest, ValidatePromoRequest, ValidatePromoResponse, VerifyPaymentResponse,
};
use juniper_core::{CartItemId, OrderId, ProductId};

use crate::error::ClientError;
use crate::store::{StoredTokens, TokenStore};

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) store: Box<dyn TokenStore>,
    /// Guards token rotation: one in-flight rotation at a time, with
    /// waiters reusing the winner's result. See `session.rs`.
    pub(crate) rotation: Mutex<()>,
}

/// Session-aware API client.
///
/// Cheap to clone; clones share the token store and the single-flight
/// rotation lock, so concurrent requests across clones never rotate twice.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) inner: Arc<ClientInner>,
}

impl ApiClient {
    /// Create a client against a base URL with an explicit token store.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` if the base URL does not parse.
    pub fn new(
        base_url: impl AsRef<str>,
        store: impl TokenStore + 'static,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url.as_ref())
            .map_err(|e| ClientError::Config(format!("invalid base url: {e}")))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http: reqwest::Client::new(),
                base_url,
                store: Box::new(store),
                rotation: Mutex::new(()),
            }),
        })
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.inner
            .base_url
            .join(path)
            .map_err(|e| ClientError::Config(format!("invalid path {path}: {e}")))
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Register a new account. Registration auto-logs-in: the returned
    /// token pair is persisted before this returns.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` with the server's message on validation
    /// or conflict failures.
    pub async fn register(&self, request: &RegisterRequest) -> Result<PublicUser, ClientError> {
        let response = self
            .inner
            .http
            .post(self.url("/api/register")?)
            .json(request)
            .send()
            .await?;

        self.accept_auth_response(response).await
    }

    /// Log in with username and password, persisting the token pair.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on invalid credentials.
    pub async fn login(&self, username: &str, password: &str) -> Result<PublicUser, ClientError> {
        let body = LoginRequest {
            username: username.to_owned(),
            password: password.to_owned(),
        };

        let response = self
            .inner
            .http
            .post(self.url("/api/login")?)
            .json(&body)
            .send()
            .await?;

        self.accept_auth_response(response).await
    }

    /// Log out: tell the server (best effort) and discard stored tokens.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Store` only if discarding the local pair
    /// fails; server-side trouble never blocks a logout.
    pub async fn logout(&self) -> Result<(), ClientError> {
        if let Err(e) = self.send_authed(Method::POST, "/api/logout", None).await {
            tracing::debug!(error = %e, "logout request failed; clearing local session anyway");
        }

        self.inner.store.clear().await
    }

    /// Resolve the current user, or `None` when not logged in.
    ///
    /// Performs one transparent rotation attempt if the access token is
    /// rejected. "No session" is a `None`, never an error, so login state
    /// is always resolvable to a boolean.
    ///
    /// # Errors
    ///
    /// Returns transport and store errors only.
    pub async fn current_user(&self) -> Result<Option<PublicUser>, ClientError> {
        if self.inner.store.load().await?.is_none() {
            return Ok(None);
        }

        match self.send_authed(Method::GET, "/api/me", None).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(ClientError::Unauthorized) => Ok(None),
            Err(other) => Err(other),
        }
    }

    /// Whether a token pair is currently stored.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Store` if the store cannot be read.
    pub async fn is_logged_in(&self) -> Result<bool, ClientError> {
        Ok(self.inner.store.load().await?.is_some())
    }

    async fn accept_auth_response(
        &self,
        response: reqwest::Response,
    ) -> Result<PublicUser, ClientError> {
        let auth: AuthResponse = Self::check(response).await?.json().await?;

        self.inner
            .store
            .save(&StoredTokens {
                access_token: auth.access_token,
                refresh_token: auth.refresh_token,
            })
            .await?;

        Ok(auth.user)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The current cart. Empty when not logged in.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on server failure.
    pub async fn cart_items(&self) -> Result<CartResponse, ClientError> {
        match self.send_authed(Method::GET, "/api/cart/items", None).await {
            Ok(response) => Ok(response.json().await?),
            // The endpoint serves anonymous callers; mirror that here.
            Err(ClientError::Unauthorized) => Ok(CartResponse::empty()),
            Err(other) => Err(other),
        }
    }

    /// Add a product to the cart, merging into an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` when logged out and
    /// `ClientError::Api` for unknown products or bad quantities.
    pub async fn add_cart_item(
        &self,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItemResponse, ClientError> {
        let body = AddCartItemRequest {
            product_id,
            quantity: Some(quantity),
        };

        let response = self
            .send_authed(
                Method::POST,
                "/api/cart/items",
                Some(serde_json::to_value(&body)?),
            )
            .await?;

        Ok(response.json().await?)
    }

    /// Overwrite a cart line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` for bad quantities or foreign item ids.
    pub async fn update_cart_item(
        &self,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<(), ClientError> {
        let body = UpdateCartItemRequest { quantity };

        self.send_authed(
            Method::PUT,
            &format!("/api/cart/items/{item_id}"),
            Some(serde_json::to_value(&body)?),
        )
        .await?;

        Ok(())
    }

    /// Remove a cart line.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` for foreign item ids.
    pub async fn remove_cart_item(&self, item_id: CartItemId) -> Result<(), ClientError> {
        self.send_authed(
            Method::DELETE,
            &format!("/api/cart/items/{item_id}"),
            None,
        )
        .await?;

        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` when logged out.
    pub async fn clear_cart(&self) -> Result<(), ClientError> {
        self.send_authed(Method::DELETE, "/api/cart/items", None)
            .await?;

        Ok(())
    }

    // =========================================================================
    // Checkout & orders
    // =========================================================================

    /// Validate a promo code. Unknown codes come back `valid: false`.
    ///
    /// # Errors
    ///
    /// Returns transport errors only.
    pub async fn validate_promo(&self, code: &str) -> Result<ValidatePromoResponse, ClientError> {
        let body = ValidatePromoRequest {
            code: code.to_owned(),
        };

        let response = self
            .inner
            .http
            .post(self.url("/api/promo/validate")?)
            .json(&body)
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    /// Ask the server for a payment intent; returns the opaque client
    /// secret for the provider's browser SDK.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` for invalid amounts or provider trouble.
    pub async fn create_payment_intent(&self, amount: Decimal) -> Result<String, ClientError> {
        let body = CreatePaymentIntentRequest { amount };

        let response = self
            .inner
            .http
            .post(self.url("/api/create-payment-intent")?)
            .json(&body)
            .send()
            .await?;

        let parsed: CreatePaymentIntentResponse = Self::check(response).await?.json().await?;
        Ok(parsed.client_secret)
    }

    /// Verify a payment intent; on success the server materializes the
    /// order and the response carries it.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` when the session is gone and
    /// `ClientError::Api` for checkout failures.
    pub async fn verify_payment(
        &self,
        payment_intent_id: &str,
        promo_code: Option<&str>,
    ) -> Result<VerifyPaymentResponse, ClientError> {
        let mut path = format!("/api/verify-payment/{payment_intent_id}");
        if let Some(code) = promo_code {
            path.push_str("?promo=");
            path.push_str(code);
        }

        let response = self.send_authed(Method::GET, &path, None).await?;

        Ok(response.json().await?)
    }

    /// The caller's order history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Unauthorized` when logged out.
    pub async fn orders(&self) -> Result<Vec<OrderResponse>, ClientError> {
        let response = self.send_authed(Method::GET, "/api/orders", None).await?;

        Ok(response.json().await?)
    }

    /// One order by id.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` (404) for absent or foreign orders.
    pub async fn order(&self, order_id: OrderId) -> Result<OrderResponse, ClientError> {
        let response = self
            .send_authed(Method::GET, &format!("/api/orders/{order_id}"), None)
            .await?;

        Ok(response.json().await?)
    }
}
