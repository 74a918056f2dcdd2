//! Payment provider wire types.

use serde::Deserialize;

/// The provider status that permits order materialization. The checkout
/// orchestrator never infers success from anything else.
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// A payment intent as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Provider-assigned intent ID.
    pub id: String,
    /// Opaque secret consumed only by the provider's browser SDK; present
    /// on creation, not necessarily on retrieval.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Provider status string (e.g. "succeeded", "requires_payment_method").
    pub status: String,
}

/// A refund as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Refund {
    /// Provider-assigned refund ID.
    pub id: String,
    /// Provider status string.
    pub status: String,
}

/// The provider's error envelope.
#[derive(Debug, Deserialize)]
pub(super) struct ProviderErrorBody {
    pub error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProviderErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_deserializes_without_client_secret() {
        let intent: PaymentIntent =
            serde_json::from_str(r#"{"id": "pi_1", "status": "succeeded"}"#).expect("parse");
        assert_eq!(intent.id, "pi_1");
        assert_eq!(intent.status, STATUS_SUCCEEDED);
        assert!(intent.client_secret.is_none());
    }

    #[test]
    fn test_error_body_parses_message() {
        let body: ProviderErrorBody = serde_json::from_str(
            r#"{"error": {"message": "Amount must be at least 50 cents", "type": "invalid_request_error"}}"#,
        )
        .expect("parse");
        assert_eq!(
            body.error.message.as_deref(),
            Some("Amount must be at least 50 cents")
        );
    }
}
