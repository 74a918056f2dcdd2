//! Stateless JWT token service.
//!
//! Issues and verifies the access/refresh pair that represents an
//! authenticated identity. The two token kinds are signed with distinct
//! secrets, so leaking one never compromises the other's issuance
//! authority. Nothing is persisted: verification is signature + expiry
//! only, and rotation (which does consult the user record) lives in
//! [`crate::services::auth::AuthService`].

mod error;

pub use error::TokenError;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use juniper_core::UserId;

use crate::models::User;

/// Token issuer embedded and required in every claim set.
const ISSUER: &str = "juniper-api";

/// Claims carried by both token kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID.
    pub sub: UserId,
    /// Login name at issuance time.
    pub username: String,
    /// The user's `token_version` at issuance time; rotation rejects the
    /// token when this no longer matches the stored value.
    pub token_version: i32,
    /// Unique token ID; two pairs issued in the same second still differ.
    pub jti: Uuid,
    /// Issued-at timestamp.
    pub iat: i64,
    /// Expiry timestamp.
    pub exp: i64,
    /// Token issuer.
    pub iss: String,
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// One signing direction: key material plus a TTL.
#[derive(Clone)]
struct Signer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Signer {
    fn new(secret: &SecretString, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
            decoding: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            ttl,
        }
    }
}

/// Stateless issuer/verifier for the access/refresh token pair.
#[derive(Clone)]
pub struct TokenService {
    access: Signer,
    refresh: Signer,
    validation: Validation,
}

impl TokenService {
    /// Production TTL of an access token.
    #[must_use]
    pub fn access_ttl() -> Duration {
        Duration::minutes(15)
    }

    /// Production TTL of a refresh token.
    #[must_use]
    pub fn refresh_ttl() -> Duration {
        Duration::days(7)
    }

    /// Create a token service with production TTLs (15 minutes / 7 days).
    #[must_use]
    pub fn new(access_secret: &SecretString, refresh_secret: &SecretString) -> Self {
        Self::with_ttls(
            access_secret,
            refresh_secret,
            Self::access_ttl(),
            Self::refresh_ttl(),
        )
    }

    /// Create a token service with explicit TTLs. Test fixtures use short or
    /// negative TTLs to exercise expiry without sleeping.
    #[must_use]
    pub fn with_ttls(
        access_secret: &SecretString,
        refresh_secret: &SecretString,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);

        Self {
            access: Signer::new(access_secret, access_ttl),
            refresh: Signer::new(refresh_secret, refresh_ttl),
            validation,
        }
    }

    /// Issue a brand-new access/refresh pair for a user.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if encoding fails (bad key material).
    pub fn issue_pair(&self, user: &User) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access_token: self.sign(&self.access, user)?,
            refresh_token: self.sign(&self.refresh, user)?,
        })
    }

    /// Verify an access token: signature, expiry, and issuer only.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Expired` when the token is past its expiry and
    /// `TokenError::Invalid` for any other verification failure.
    pub fn verify_access(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify(&self.access, token)
    }

    /// Verify a refresh token, using the refresh secret.
    ///
    /// # Errors
    ///
    /// Same semantics as [`Self::verify_access`].
    pub fn verify_refresh(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify(&self.refresh, token)
    }

    fn sign(&self, signer: &Signer, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user.id,
            username: user.username.clone(),
            token_version: user.token_version,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + signer.ttl).timestamp(),
            iss: ISSUER.to_owned(),
        };

        encode(&Header::default(), &claims, &signer.encoding).map_err(TokenError::Signing)
    }

    fn verify(&self, signer: &Signer, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &signer.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use juniper_core::Email;

    fn secrets() -> (SecretString, SecretString) {
        (
            SecretString::from("access-unit-test-signing-key-0123456789"),
            SecretString::from("refresh-unit-test-signing-key-9876543210"),
        )
    }

    fn service() -> TokenService {
        let (access, refresh) = secrets();
        TokenService::new(&access, &refresh)
    }

    fn test_user() -> User {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        User {
            id: UserId::new(7),
            username: "freya".into(),
            email: Email::parse("freya@example.com").unwrap(),
            is_admin: false,
            language: "en".into(),
            token_version: 3,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_issue_then_verify_roundtrip() {
        let svc = service();
        let user = test_user();
        let pair = svc.issue_pair(&user).unwrap();

        let access = svc.verify_access(&pair.access_token).unwrap();
        assert_eq!(access.sub, user.id);
        assert_eq!(access.username, "freya");
        assert_eq!(access.token_version, 3);

        let refresh = svc.verify_refresh(&pair.refresh_token).unwrap();
        assert_eq!(refresh.sub, user.id);
        assert_eq!(refresh.username, "freya");
    }

    #[test]
    fn test_tokens_are_not_interchangeable() {
        // An access token must not verify as a refresh token or vice versa:
        // the two kinds are signed with distinct secrets.
        let svc = service();
        let pair = svc.issue_pair(&test_user()).unwrap();

        assert!(matches!(
            svc.verify_refresh(&pair.access_token),
            Err(TokenError::Invalid)
        ));
        assert!(matches!(
            svc.verify_access(&pair.refresh_token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let (access, refresh) = secrets();
        // Expired two minutes ago, beyond the default validation leeway.
        let svc = TokenService::with_ttls(
            &access,
            &refresh,
            Duration::minutes(-2),
            Duration::minutes(-2),
        );
        let pair = svc.issue_pair(&test_user()).unwrap();

        assert!(matches!(
            svc.verify_access(&pair.access_token),
            Err(TokenError::Expired)
        ));
        assert!(matches!(
            svc.verify_refresh(&pair.refresh_token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = service();
        let pair = svc.issue_pair(&test_user()).unwrap();

        let mut tampered = pair.access_token;
        tampered.pop();
        tampered.push('A');

        assert!(svc.verify_access(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = service();
        let pair = svc.issue_pair(&test_user()).unwrap();

        let other = TokenService::new(
            &SecretString::from("a-completely-different-access-key!!"),
            &SecretString::from("a-completely-different-refresh-key!"),
        );

        assert!(matches!(
            other.verify_access(&pair.access_token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_consecutive_pairs_are_fresh() {
        // Even within the same second, the jti claim makes every issued
        // token string unique.
        let svc = service();
        let user = test_user();

        let first = svc.issue_pair(&user).unwrap();
        let second = svc.issue_pair(&user).unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }
}
