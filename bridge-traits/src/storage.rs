//! Persistent Storage Abstraction
//!
//! The offline cache sits on top of a plain string key-value medium supplied
//! by the host: `localStorage` in a browser shell, a SQLite file on desktop,
//! `UserDefaults`/`SharedPreferences` on mobile.

use async_trait::async_trait;

use crate::error::Result;

/// Best-effort, string-keyed persistent storage.
///
/// The medium makes no capacity promise. Implementations report a full store
/// with [`BridgeError::QuotaExceeded`](crate::error::BridgeError::QuotaExceeded)
/// and every other failure as an error value; callers treat writes as advisory.
///
/// There is no multi-key transaction support and no coordination between
/// processes sharing the same medium: the last write wins.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::KeyValueStore;
///
/// async fn remember_theme(store: &dyn KeyValueStore) -> Result<()> {
///     store.set("theme", "dark").await
/// }
/// ```
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// List every key currently held by the medium.
    async fn keys(&self) -> Result<Vec<String>>;

    /// Check whether `key` holds a value.
    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Remove every key starting with `prefix`.
    ///
    /// Returns the number of keys removed.
    async fn remove_prefixed(&self, prefix: &str) -> Result<usize> {
        let mut removed = 0;
        for key in self.keys().await? {
            if key.starts_with(prefix) {
                self.remove(&key).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
