//! Payment provider client.
//!
//! A thin REST client over the provider's three operations: create a payment
//! intent, retrieve its status, refund a captured intent. The server never
//! sees raw payment instruments; the browser talks to the provider directly
//! using the opaque client secret.

mod error;
mod types;

pub use error::PaymentError;
pub use types::{PaymentIntent, Refund, STATUS_SUCCEEDED};

use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::config::PaymentConfig;

/// Payment provider REST client.
#[derive(Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretString,
}

impl PaymentClient {
    /// Create a client from configuration. The base URL is overridable so
    /// tests and sandboxes can point at a stub.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.api_key.clone(),
        }
    }

    /// Create a payment intent for an amount in minor units (cents).
    ///
    /// Sends an idempotency key so a retried create never double-charges.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Http` on transport failure and
    /// `PaymentError::Provider` with the provider's message otherwise.
    pub async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", currency.to_owned()),
            ])
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Retrieve a payment intent's current status.
    ///
    /// # Errors
    ///
    /// Same semantics as [`Self::create_payment_intent`].
    pub async fn retrieve_payment_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        let response = self
            .http
            .get(format!("{}/v1/payment_intents/{id}", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Refund a captured payment intent in full.
    ///
    /// # Errors
    ///
    /// Same semantics as [`Self::create_payment_intent`].
    pub async fn create_refund(&self, payment_intent_id: &str) -> Result<Refund, PaymentError> {
        let response = self
            .http
            .post(format!("{}/v1/refunds", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .header("Idempotency-Key", Uuid::new_v4().to_string())
            .form(&[("payment_intent", payment_intent_id.to_owned())])
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Decode a success body, or surface the provider's error verbatim.
    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PaymentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<types::ProviderErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| format!("provider returned HTTP {status}"));

        Err(PaymentError::Provider {
            status: status.as_u16(),
            message,
        })
    }
}
