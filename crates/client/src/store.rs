//! Durable token storage.
//!
//! Two string tokens under a well-known location is the entire persisted
//! client-side state. The [`FileTokenStore`] survives process restarts and
//! is scoped to one profile directory; the [`MemoryTokenStore`] backs tests
//! and short-lived tools.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::error::ClientError;

/// The persisted access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Durable storage for the current token pair.
///
/// Implementations must tolerate concurrent calls; the [`ApiClient`]
/// serializes rotation itself but reads freely.
///
/// [`ApiClient`]: crate::ApiClient
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the current pair, `None` when logged out.
    async fn load(&self) -> Result<Option<StoredTokens>, ClientError>;

    /// Persist a new pair, replacing any previous one.
    async fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError>;

    /// Discard the stored pair.
    async fn clear(&self) -> Result<(), ClientError>;
}

#[async_trait]
impl<T: TokenStore + ?Sized> TokenStore for std::sync::Arc<T> {
    async fn load(&self) -> Result<Option<StoredTokens>, ClientError> {
        (**self).load().await
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError> {
        (**self).save(tokens).await
    }

    async fn clear(&self) -> Result<(), ClientError> {
        (**self).clear().await
    }
}

/// In-memory token store.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    inner: RwLock<Option<StoredTokens>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<StoredTokens>, ClientError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError> {
        *self.inner.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        *self.inner.write().await = None;
        Ok(())
    }
}

/// JSON-file token store.
///
/// A missing file means logged out, not an error, so first runs work
/// without setup.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<StoredTokens>, ClientError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec_pretty(tokens)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pair(tag: &str) -> StoredTokens {
        StoredTokens {
            access_token: format!("access-{tag}"),
            refresh_token: format!("refresh-{tag}"),
        }
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&pair("a")).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(pair("a")));

        store.save(&pair("b")).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(pair("b")));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));

        // Missing file is logged-out, not an error
        assert_eq!(store.load().await.unwrap(), None);

        store.save(&pair("x")).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(pair("x")));

        // A second store at the same path sees the persisted pair
        let reopened = FileTokenStore::new(dir.path().join("tokens.json"));
        assert_eq!(reopened.load().await.unwrap(), Some(pair("x")));

        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);

        // Clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested/profile/tokens.json"));

        store.save(&pair("deep")).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(pair("deep")));
    }
}
