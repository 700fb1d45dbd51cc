//! Versioned envelope store.
//!
//! Every value is persisted as
//!
//! ```json
//! { "data": ..., "timestamp": 1700000000000, "schemaVersion": "1.0.0" }
//! ```
//!
//! under `"{namespace}::{key}"`. Reads only trust envelopes carrying the
//! configured schema version. Entries from other versions are ignored but left
//! on the medium.

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::{Clock, KeyValueStore};
use chrono::{DateTime, TimeZone, Utc};
use core_runtime::config::{CacheSettings, CACHE_SCHEMA_VERSION, DEFAULT_CACHE_NAMESPACE};
use core_runtime::events::{CacheEvent, CoreEvent, EventBus};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{CacheError, Result};

/// A stored value with its write time and schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEnvelope<T> {
    pub data: T,
    /// Unix epoch milliseconds
    pub timestamp: i64,
    pub schema_version: String,
}

/// Borrowed form used on the write path.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a, T: ?Sized> {
    data: &'a T,
    timestamp: i64,
    schema_version: &'a str,
}

impl<T> CacheEnvelope<T> {
    pub fn written_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// Best-effort persistence of schema-versioned values.
///
/// Reads never fail: a missing key, an unreadable medium, a corrupt payload
/// and a foreign schema version all come back as `None` (the last three are
/// logged). Writes report failure as [`CacheError`](crate::CacheError) so
/// the caller can decide whether it matters.
pub struct VersionedCacheStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    namespace: String,
    schema_version: String,
    event_bus: Option<EventBus>,
}

impl VersionedCacheStore {
    /// Store under the default namespace and the current schema version.
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            schema_version: CACHE_SCHEMA_VERSION.to_string(),
            event_bus: None,
        }
    }

    pub fn from_settings(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        settings: &CacheSettings,
    ) -> Self {
        Self::new(store, clock)
            .with_namespace(settings.namespace.clone())
            .with_schema_version(settings.schema_version.clone())
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Expected schema version for reads and the version stamped on writes.
    pub fn with_schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = version.into();
        self
    }

    /// Report write failures and clears on the event bus.
    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub(crate) fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}::{}", self.namespace, key)
    }

    fn prefix(&self) -> String {
        format!("{}::", self.namespace)
    }

    /// The envelope under `key` if it exists and matches the schema version.
    async fn envelope(&self, key: &str) -> Option<CacheEnvelope<Value>> {
        let storage_key = self.storage_key(key);

        let raw = match self.store.get(&storage_key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Cache read failed");
                return None;
            }
        };

        let envelope: CacheEnvelope<Value> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Discarding unreadable cache entry");
                return None;
            }
        };

        if envelope.schema_version != self.schema_version {
            debug!(
                key = %storage_key,
                found = %envelope.schema_version,
                expected = %self.schema_version,
                "Ignoring cache entry from another schema version"
            );
            return None;
        }

        Some(envelope)
    }

    /// Data stored under `key`, or `None` when absent or untrusted.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let envelope = self.envelope(key).await?;
        match serde_json::from_value(envelope.data) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(key = %self.storage_key(key), error = %e, "Cache entry has unexpected shape");
                None
            }
        }
    }

    /// Replace the value under `key` with a freshly stamped envelope.
    #[instrument(skip(self, data), fields(namespace = %self.namespace))]
    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<()> {
        let storage_key = self.storage_key(key);

        let result = async {
            let envelope = EnvelopeRef {
                data,
                timestamp: self.clock.unix_timestamp_millis(),
                schema_version: self.schema_version.as_str(),
            };
            let raw = serde_json::to_string(&envelope)?;
            self.store.set(&storage_key, &raw).await?;
            debug!(key = %storage_key, bytes = raw.len(), "Cache entry written");
            Ok::<(), CacheError>(())
        }
        .await;

        if let Err(e) = &result {
            warn!(key = %storage_key, error = %e, "Cache write failed");
            if let Some(bus) = &self.event_bus {
                bus.emit(CoreEvent::Cache(CacheEvent::WriteFailed {
                    key: storage_key,
                    message: e.to_string(),
                }))
                .ok();
            }
        }

        result
    }

    /// True iff a current-schema envelope exists and is older than `max_age`.
    pub async fn is_stale(&self, key: &str, max_age: Duration) -> bool {
        let Some(envelope) = self.envelope(key).await else {
            return false;
        };
        let age_ms = self.clock.unix_timestamp_millis() - envelope.timestamp;
        age_ms > i64::try_from(max_age.as_millis()).unwrap_or(i64::MAX)
    }

    /// When the current-schema value under `key` was written.
    pub async fn timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        self.envelope(key).await?.written_at()
    }

    /// Remove `key`. Clearing a missing key succeeds.
    pub async fn clear(&self, key: &str) -> Result<()> {
        self.store.remove(&self.storage_key(key)).await?;
        Ok(())
    }

    /// Remove every key in this store's namespace, whatever its schema version.
    #[instrument(skip(self), fields(namespace = %self.namespace))]
    pub async fn clear_all(&self) -> Result<usize> {
        let removed = self.store.remove_prefixed(&self.prefix()).await?;
        debug!(removed, "Cache namespace cleared");

        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Cache(CacheEvent::Cleared {
                namespace: self.namespace.clone(),
                removed,
            }))
            .ok();
        }
        Ok(removed)
    }
}
