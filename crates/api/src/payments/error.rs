//! Payment provider error types.

use thiserror::Error;

/// Errors from the payment provider client.
///
/// Provider-supplied messages are preserved verbatim: support and
/// reconciliation depend on them, so they are never masked as generic
/// failures.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Transport-level failure (includes timeouts). Retryable.
    #[error("payment provider unreachable: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider rejected the request.
    #[error("payment provider error: {message}")]
    Provider {
        /// HTTP status returned by the provider.
        status: u16,
        /// The provider's own error message, verbatim.
        message: String,
    },
}
