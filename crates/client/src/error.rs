//! Client error types.

use thiserror::Error;

/// Errors from the client SDK.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Invalid base URL or other construction problem.
    #[error("client configuration error: {0}")]
    Config(String),

    /// Transport-level failure. The session is untouched; retry later.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status and an error body.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-supplied message.
        message: String,
    },

    /// The session is gone: no tokens stored, or rotation was rejected and
    /// both tokens have been discarded.
    #[error("not logged in")]
    Unauthorized,

    /// Token store I/O failure.
    #[error("token store error: {0}")]
    Store(#[from] std::io::Error),

    /// Token store (de)serialization failure.
    #[error("token store corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}
