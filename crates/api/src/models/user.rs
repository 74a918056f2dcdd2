//! User domain types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use juniper_core::wire::PublicUser;
use juniper_core::{Email, UserId};

/// An account holder.
///
/// The password hash never leaves [`crate::db::users::UserRepository`]; this
/// type is safe to pass around handlers.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Unique, normalized email address.
    pub email: Email,
    /// Whether the user may access the admin surface.
    pub is_admin: bool,
    /// Preferred language tag (BCP-47).
    pub language: String,
    /// Monotonic counter; bumping it invalidates all outstanding refresh
    /// tokens for this user.
    pub token_version: i32,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The wire-safe projection of this user.
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.as_str().to_owned(),
            is_admin: self.is_admin,
            language: self.language.clone(),
        }
    }
}
