//! In-process key-value store

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::KeyValueStore,
};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Key-value store held entirely in memory.
///
/// Used by tests and by shells that do not persist anything between runs.
/// An optional byte quota mimics the capacity limit of browser storage:
/// a write that would push the total size of keys and values past the quota
/// fails with [`BridgeError::QuotaExceeded`] and leaves the store untouched.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that refuses writes beyond `bytes` in total.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            quota: Some(bytes),
        }
    }

    /// Bytes currently held (keys plus values).
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();

        if let Some(quota) = self.quota {
            let current: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = key.len() + value.len();
            if current + needed > quota {
                return Err(BridgeError::QuotaExceeded {
                    needed,
                    available: quota.saturating_sub(current),
                });
            }
        }

        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.read().keys().cloned().collect())
    }
}
