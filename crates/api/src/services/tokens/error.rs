//! Token error types.

use thiserror::Error;

/// Errors that can occur while issuing or verifying tokens.
///
/// Every verification failure is terminal for that call; the caller decides
/// whether to fall back to re-authentication.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signature invalid, malformed, or wrong issuer.
    #[error("invalid token")]
    Invalid,

    /// Token is past its expiry.
    #[error("token expired")]
    Expired,

    /// Token carries a stale `token_version`; the user revoked their
    /// sessions after it was issued.
    #[error("token revoked")]
    Revoked,

    /// Signing failed (bad key material).
    #[error("token signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),
}
