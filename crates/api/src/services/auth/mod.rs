//! Authentication service.
//!
//! Password registration/login and the refresh-token rotation that keeps a
//! session alive. Token cryptography lives in
//! [`crate::services::tokens::TokenService`]; this service adds the pieces
//! that need the user record: credential checks, the re-fetch on rotation,
//! and the `token_version` revocation gate.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use juniper_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;
use crate::services::tokens::{TokenError, TokenPair, TokenService};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Username length bounds.
const USERNAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=32;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, tokens: &'a TokenService) -> Self {
        Self {
            users: UserRepository::new(pool),
            tokens,
        }
    }

    /// Register a new user and log them in (registration auto-login).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidEmail` /
    /// `AuthError::WeakPassword` on validation failure, and
    /// `AuthError::UserAlreadyExists` if the username or email is taken.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        language: Option<&str>,
    ) -> Result<(User, TokenPair), AuthError> {
        validate_username(username)?;
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(username, &email, &password_hash, language.unwrap_or("en"))
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        let pair = self.tokens.issue_pair(&user)?;
        Ok((user, pair))
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is
    /// wrong. Unknown username and wrong password are indistinguishable to
    /// the caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let (user, password_hash) = self
            .users
            .get_with_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let pair = self.tokens.issue_pair(&user)?;
        Ok((user, pair))
    }

    /// Rotate a refresh token into a brand-new pair.
    ///
    /// Both tokens are reissued, not just the access token: rotation bounds
    /// the lifetime of any single refresh token even under legitimate use.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if the refresh token fails verification or
    /// carries a stale `token_version`, and `AuthError::UserNotFound` if the
    /// referenced user no longer exists.
    pub async fn rotate_tokens(&self, refresh_token: &str) -> Result<(User, TokenPair), AuthError> {
        let claims = self.tokens.verify_refresh(refresh_token)?;

        let user = self
            .users
            .get_by_id(claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if claims.token_version != user.token_version {
            return Err(AuthError::Token(TokenError::Revoked));
        }

        let pair = self.tokens.issue_pair(&user)?;
        Ok((user, pair))
    }

    /// Get a user by ID (the `/api/me` lookup).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Invalidate every outstanding refresh token for a user by bumping the
    /// stored `token_version`. O(1); already-issued access tokens ride out
    /// their remaining minutes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn revoke_sessions(&self, user_id: UserId) -> Result<i32, AuthError> {
        let version = self
            .users
            .bump_token_version(user_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(user_id = %user_id, token_version = version, "sessions revoked");
        Ok(version)
    }
}

/// Validate username format: 3-32 characters, alphanumeric plus `._-`.
fn validate_username(username: &str) -> Result<(), AuthError> {
    if !USERNAME_LENGTH.contains(&username.len()) {
        return Err(AuthError::InvalidUsername(format!(
            "username must be {}-{} characters",
            USERNAME_LENGTH.start(),
            USERNAME_LENGTH.end()
        )));
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(AuthError::InvalidUsername(
            "username may only contain letters, digits, '.', '_' and '-'".to_owned(),
        ));
    }

    Ok(())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username_accepts_reasonable_names() {
        assert!(validate_username("freya").is_ok());
        assert!(validate_username("user_42").is_ok());
        assert!(validate_username("anna.k-j").is_ok());
    }

    #[test]
    fn test_validate_username_rejects_bad_names() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username("emoji🙂").is_err());
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough").is_ok());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("same password").unwrap();
        let second = hash_password("same password").unwrap();
        assert_ne!(first, second);
    }
}
