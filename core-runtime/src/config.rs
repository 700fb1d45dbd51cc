//! # Core Configuration Module
//!
//! Builder-based configuration for the offline scripture core.
//!
//! ## Overview
//!
//! [`CoreConfigBuilder`] collects the host bridges and settings, fills in
//! platform defaults where the `desktop-shims` feature allows it and validates
//! everything before a [`CoreConfig`] is handed out. Missing capabilities fail
//! fast with [`Error::CapabilityMissing`] and a message naming what to inject.
//!
//! ## Required Dependencies
//!
//! - `KeyValueStore` - persistent medium for the offline cache
//! - `HttpClient` - transport for chapter downloads
//!
//! With `desktop-shims` both default to the `bridge-desktop` implementations
//! (a SQLite file in the platform data directory and a reqwest client).
//!
//! ## Optional Dependencies
//!
//! - `NetworkMonitor` - feeds the connectivity flag
//! - `Clock` - defaults to the system clock
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CacheSettings, CoreConfig};
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .key_value_store(Arc::new(MyLocalStorage))
//!     .http_client(Arc::new(MyFetch))
//!     .cache_settings(CacheSettings::default().with_namespace("kjv-offline"))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{Clock, HttpClient, KeyValueStore, NetworkMonitor, SystemClock};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Schema version stamped on every cache envelope written by this build.
pub const CACHE_SCHEMA_VERSION: &str = "1.0.0";

/// Default key namespace for the offline cache.
pub const DEFAULT_CACHE_NAMESPACE: &str = "offline";

/// Default chapter endpoint.
pub const DEFAULT_CONTENT_API_URL: &str = "https://bible-api.com";

/// Default translation requested from the chapter endpoint.
pub const DEFAULT_TRANSLATION: &str = "kjv";

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Core configuration for the offline scripture core.
///
/// Use [`CoreConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Persistent medium for cached content (required)
    pub key_value_store: Arc<dyn KeyValueStore>,

    /// Transport for chapter downloads (required)
    pub http_client: Arc<dyn HttpClient>,

    /// Host connectivity signal (optional)
    pub network_monitor: Option<Arc<dyn NetworkMonitor>>,

    /// Time source for cache timestamps and staleness
    pub clock: Arc<dyn Clock>,

    pub cache: CacheSettings,

    pub content_api: ContentApiConfig,

    pub features: FeatureFlags,

    /// Capacity of the event bus channel
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("key_value_store", &"KeyValueStore { ... }")
            .field("http_client", &"HttpClient { ... }")
            .field(
                "network_monitor",
                &self
                    .network_monitor
                    .as_ref()
                    .map(|_| "NetworkMonitor { ... }"),
            )
            .field("cache", &self.cache)
            .field("content_api", &self.content_api)
            .field("features", &self.features)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

/// Feature flags control optional functionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Build and serve the content search index
    pub enable_search: bool,

    /// Track connectivity through the injected `NetworkMonitor`
    pub enable_network_awareness: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_search: true,
            enable_network_awareness: false,
        }
    }
}

/// Offline cache settings.
///
/// Max ages drive the advisory staleness checks only; stale entries are still
/// served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// Prefix separating this cache's keys from anything else on the medium
    pub namespace: String,

    /// Envelopes stamped with any other version are treated as absent
    pub schema_version: String,

    /// Default: 7 days
    pub chapter_max_age: Duration,

    /// Default: 1 day
    pub devotional_max_age: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_CACHE_NAMESPACE.to_string(),
            schema_version: CACHE_SCHEMA_VERSION.to_string(),
            chapter_max_age: 7 * DAY,
            devotional_max_age: DAY,
        }
    }
}

impl CacheSettings {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_schema_version(mut self, version: impl Into<String>) -> Self {
        self.schema_version = version.into();
        self
    }

    pub fn with_chapter_max_age(mut self, max_age: Duration) -> Self {
        self.chapter_max_age = max_age;
        self
    }

    pub fn with_devotional_max_age(mut self, max_age: Duration) -> Self {
        self.devotional_max_age = max_age;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.namespace.trim().is_empty() {
            return Err(Error::invalid("cache.namespace", "cannot be empty"));
        }
        if self.namespace.contains("::") {
            return Err(Error::invalid(
                "cache.namespace",
                "cannot contain the `::` key separator",
            ));
        }
        if self.schema_version.trim().is_empty() {
            return Err(Error::invalid("cache.schema_version", "cannot be empty"));
        }
        if self.chapter_max_age.is_zero() || self.devotional_max_age.is_zero() {
            return Err(Error::invalid(
                "cache.max_age",
                "max ages must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Remote chapter endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentApiConfig {
    /// Endpoint root, without a trailing slash (e.g. `https://bible-api.com`)
    pub base_url: String,

    /// Translation code passed to the endpoint (e.g. `kjv`, `web`)
    pub translation: String,
}

impl Default for ContentApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CONTENT_API_URL.to_string(),
            translation: DEFAULT_TRANSLATION.to_string(),
        }
    }
}

impl ContentApiConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_translation(mut self, translation: impl Into<String>) -> Self {
        self.translation = translation.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(Error::invalid(
                "content_api.base_url",
                format!("`{}` is not an http(s) URL", self.base_url),
            ));
        }
        if self.translation.is_empty()
            || !self
                .translation
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(Error::invalid(
                "content_api.translation",
                format!("`{}` is not a translation code", self.translation),
            ));
        }
        Ok(())
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Checks settings and feature flags against the injected bridges.
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;
        self.content_api.validate()?;

        if self.event_buffer_size == 0 {
            return Err(Error::invalid(
                "event_buffer_size",
                "must be greater than zero",
            ));
        }

        if self.features.enable_network_awareness && self.network_monitor.is_none() {
            return Err(Error::Config(
                "Network awareness enabled but no NetworkMonitor provided. \
                 Disable the feature or inject a NetworkMonitor implementation."
                    .to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn key_value_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "KeyValueStore".to_string(),
        message: "KeyValueStore implementation is required for the offline cache. \
                 Desktop: enable the 'desktop-shims' feature to use the default SqliteKeyValueStore. \
                 Mobile: inject UserDefaults/SharedPreferences-backed storage. \
                 Web: inject localStorage-backed storage."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required for chapter downloads. \
                 Desktop: enable the 'desktop-shims' feature to use the default ReqwestHttpClient. \
                 Mobile/Web: inject the platform's fetch/URLSession/OkHttp bridge."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_key_value_store(
    storage_path: Option<PathBuf>,
) -> Result<Arc<dyn KeyValueStore>> {
    use bridge_desktop::SqliteKeyValueStore;
    use core_async::runtime::{block_on, Handle};
    use std::thread;

    let open = move || -> Result<SqliteKeyValueStore> {
        let opened = block_on(async move {
            match storage_path {
                Some(path) => SqliteKeyValueStore::new(path).await,
                None => SqliteKeyValueStore::open_default().await,
            }
        })
        .map_err(|e| {
            Error::Internal(format!(
                "Failed to create runtime for default KeyValueStore: {}",
                e
            ))
        })?;

        opened.map_err(|e| Error::Storage(e.to_string()))
    };

    // block_on panics inside a runtime, so hop to a plain thread when we are in one
    let store = match Handle::try_current() {
        Ok(_) => thread::spawn(open).join().map_err(|_| {
            Error::Internal("Thread panicked while creating default KeyValueStore".to_string())
        })??,
        Err(_) => open()?,
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(store);
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_key_value_store(
    _storage_path: Option<PathBuf>,
) -> Result<Arc<dyn KeyValueStore>> {
    Err(key_value_store_missing_error())
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    let client = bridge_desktop::ReqwestHttpClient::new()
        .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for [`CoreConfig`].
pub struct CoreConfigBuilder {
    key_value_store: Option<Arc<dyn KeyValueStore>>,
    storage_path: Option<PathBuf>,
    http_client: Option<Arc<dyn HttpClient>>,
    network_monitor: Option<Arc<dyn NetworkMonitor>>,
    clock: Option<Arc<dyn Clock>>,
    cache: CacheSettings,
    content_api: ContentApiConfig,
    features: FeatureFlags,
    event_buffer_size: usize,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self {
            key_value_store: None,
            storage_path: None,
            http_client: None,
            network_monitor: None,
            clock: None,
            cache: CacheSettings::default(),
            content_api: ContentApiConfig::default(),
            features: FeatureFlags::default(),
            event_buffer_size: crate::events::DEFAULT_EVENT_BUFFER_SIZE,
        }
    }
}

impl CoreConfigBuilder {
    /// Sets the persistent medium (required unless `desktop-shims` is on).
    pub fn key_value_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.key_value_store = Some(store);
        self
    }

    /// Location of the default SQLite store. Ignored when a store is injected.
    pub fn storage_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.storage_path = Some(path.into());
        self
    }

    /// Sets the HTTP client (required unless `desktop-shims` is on).
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn network_monitor(mut self, monitor: Arc<dyn NetworkMonitor>) -> Self {
        self.network_monitor = Some(monitor);
        self
    }

    /// Overrides the system clock, mainly for tests that age cache entries.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn cache_settings(mut self, cache: CacheSettings) -> Self {
        self.cache = cache;
        self
    }

    pub fn content_api(mut self, content_api: ContentApiConfig) -> Self {
        self.content_api = content_api;
        self
    }

    pub fn enable_search(mut self, enabled: bool) -> Self {
        self.features.enable_search = enabled;
        self
    }

    /// Requires a `NetworkMonitor`.
    pub fn enable_network_awareness(mut self, enabled: bool) -> Self {
        self.features.enable_network_awareness = enabled;
        self
    }

    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when a required bridge is absent and no
    ///   desktop default is available
    /// - [`Error::InvalidSetting`] / [`Error::Config`] for bad values or
    ///   feature flags without their bridge
    pub fn build(self) -> Result<CoreConfig> {
        let key_value_store = match self.key_value_store {
            Some(store) => store,
            None => provide_default_key_value_store(self.storage_path)?,
        };

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let config = CoreConfig {
            key_value_store,
            http_client,
            network_monitor: self.network_monitor,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            cache: self.cache,
            content_api: self.content_api,
            features: self.features,
            event_buffer_size: self.event_buffer_size,
        };

        config.validate()?;
        Ok(config)
    }
}
