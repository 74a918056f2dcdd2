//! Juniper Market client SDK.
//!
//! Makes the token lifecycle invisible to application code: the client
//! attaches the current access token to every request, proactively rotates
//! the pair before it expires, falls back to a single rotate-and-retry on
//! 401, and resolves "who am I" without ever throwing for the logged-out
//! case.
//!
//! There is no ambient global state: every caller holds an [`ApiClient`]
//! value, and token persistence is an explicit [`TokenStore`] dependency.
//!
//! # Example
//!
//! ```rust,ignore
//! use juniper_client::{ApiClient, FileTokenStore};
//!
//! let store = FileTokenStore::new("~/.config/juniper/tokens.json".into());
//! let client = ApiClient::new("https://shop.example.com", store)?;
//!
//! client.login("freya", "correct horse battery").await?;
//! let _refresh = client.spawn_proactive_refresh();
//!
//! let me = client.current_user().await?; // Some(user), or None; never an error
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
mod error;
mod session;
mod store;

pub use client::ApiClient;
pub use error::ClientError;
pub use store::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};

/// Wire types re-exported for callers.
pub use juniper_core::wire;
