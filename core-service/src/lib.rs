//! Core service façade and bootstrap helpers.
//!
//! Wires the host bridges from a [`CoreConfig`] into the offline cache, the
//! chapter downloader, the connectivity monitor and the search index, and
//! exposes them behind one cloneable handle. Desktop hosts typically enable
//! the `desktop-shims` feature so the configuration builder can fall back to
//! the SQLite store and reqwest client from `bridge-desktop`.
//!
//! ```rust,ignore
//! use core_service::{CoreConfig, CoreService};
//!
//! let config = CoreConfig::builder().storage_path("/tmp/offline.db").build()?;
//! let core = CoreService::bootstrap(config).await?;
//!
//! if core.download_book("Ruth").await? {
//!     let chapter = core.chapter("Ruth", 1).await;
//! }
//! ```

pub mod error;

pub use error::{CoreError, Result};

pub use core_cache::{ChapterRecord, ContentCacheFacade, Verse};
pub use core_runtime::config::{CacheSettings, ContentApiConfig, CoreConfig, FeatureFlags};
pub use core_runtime::events::{CoreEvent, EventBus, EventStream};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
pub use core_search::{ContentProvider, SearchFilters, SearchRecord};
pub use core_sync::{DownloadConfig, DownloadProgress, DownloadStatus};

#[cfg(feature = "desktop-shims")]
pub use bridge_desktop;

use std::sync::Arc;

use core_async::sync::watch;
use core_async::task::JoinHandle;
use core_cache::VersionedCacheStore;
use core_runtime::events::Receiver;
use core_runtime::ConnectivityMonitor;
use core_search::{CachedDevotionalProvider, SearchConfig, SearchIndexEngine};
use core_sync::DownloadOrchestrator;
use provider_bible_api::BibleApiSource;
use tracing::{info, instrument};

struct ServiceInner {
    event_bus: EventBus,
    cache: Arc<ContentCacheFacade>,
    downloads: Arc<DownloadOrchestrator>,
    connectivity: ConnectivityMonitor,
    search: Option<Arc<SearchIndexEngine>>,
    network_task: Option<JoinHandle<()>>,
}

impl Drop for ServiceInner {
    fn drop(&mut self) {
        if let Some(task) = self.network_task.take() {
            task.abort();
        }
    }
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    inner: Arc<ServiceInner>,
}

impl CoreService {
    /// Build every component from `config`.
    pub async fn bootstrap(config: CoreConfig) -> Result<Self> {
        Self::bootstrap_with(config, DownloadConfig::default(), Vec::new()).await
    }

    /// Like [`bootstrap`](Self::bootstrap) with download tuning and extra
    /// search providers.
    ///
    /// When search is enabled the cached devotionals are always indexed,
    /// ahead of `providers`. When network awareness is enabled the
    /// connectivity flag follows the configured `NetworkMonitor`.
    #[instrument(skip_all, fields(namespace = %config.cache.namespace))]
    pub async fn bootstrap_with(
        config: CoreConfig,
        downloads: DownloadConfig,
        providers: Vec<Arc<dyn ContentProvider>>,
    ) -> Result<Self> {
        config.validate()?;

        let event_bus = EventBus::new(config.event_buffer_size);

        let store = VersionedCacheStore::from_settings(
            config.key_value_store.clone(),
            config.clock.clone(),
            &config.cache,
        )
        .with_event_bus(event_bus.clone());
        let cache = Arc::new(ContentCacheFacade::with_settings(
            Arc::new(store),
            &config.cache,
        ));

        let source = Arc::new(BibleApiSource::from_config(&config.content_api));
        let orchestrator = DownloadOrchestrator::new(config.http_client.clone(), source, cache.clone())
            .with_config(downloads)
            .with_event_bus(event_bus.clone());

        let connectivity = ConnectivityMonitor::default().with_event_bus(event_bus.clone());
        let network_task = match (&config.network_monitor, config.features.enable_network_awareness) {
            (Some(monitor), true) => Some(
                connectivity
                    .attach(monitor.clone())
                    .await
                    .map_err(|e| {
                        CoreError::InitializationFailed(format!(
                            "Network monitor could not be attached: {}",
                            e
                        ))
                    })?,
            ),
            _ => None,
        };

        let search = config.features.enable_search.then(|| {
            let mut engine = SearchIndexEngine::new(SearchConfig::default())
                .with_event_bus(event_bus.clone())
                .with_provider(Arc::new(CachedDevotionalProvider::new(cache.clone())));
            for provider in providers {
                engine = engine.with_provider(provider);
            }
            Arc::new(engine)
        });

        info!(
            search = search.is_some(),
            network_awareness = network_task.is_some(),
            translation = %config.content_api.translation,
            "Core service ready"
        );

        Ok(Self {
            inner: Arc::new(ServiceInner {
                event_bus,
                cache,
                downloads: Arc::new(orchestrator),
                connectivity,
                search,
                network_task,
            }),
        })
    }

    // ------------------------------------------------------------------
    // Components
    // ------------------------------------------------------------------

    pub fn cache(&self) -> &Arc<ContentCacheFacade> {
        &self.inner.cache
    }

    pub fn downloads(&self) -> &Arc<DownloadOrchestrator> {
        &self.inner.downloads
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.inner.connectivity
    }

    /// # Errors
    ///
    /// [`CoreError::FeatureDisabled`] when search was turned off in the
    /// configuration.
    pub fn search_engine(&self) -> Result<&Arc<SearchIndexEngine>> {
        self.inner
            .search
            .as_ref()
            .ok_or(CoreError::FeatureDisabled("search"))
    }

    pub fn subscribe_events(&self) -> Receiver<CoreEvent> {
        self.inner.event_bus.subscribe()
    }

    // ------------------------------------------------------------------
    // Downloads and offline reading
    // ------------------------------------------------------------------

    /// Download every chapter of `book`. `true` iff the whole book is cached.
    pub async fn download_book(&self, book: &str) -> Result<bool> {
        Ok(self.inner.downloads.download_book(book).await?)
    }

    pub fn cancel_download(&self) -> bool {
        self.inner.downloads.cancel()
    }

    pub fn download_progress(&self) -> DownloadProgress {
        self.inner.downloads.progress()
    }

    pub fn subscribe_download_progress(&self) -> watch::Receiver<DownloadProgress> {
        self.inner.downloads.subscribe_progress()
    }

    pub async fn is_chapter_available(&self, book: &str, chapter: u32) -> bool {
        self.inner.cache.is_chapter_available(book, chapter).await
    }

    pub async fn chapter(&self, book: &str, chapter: u32) -> Option<ChapterRecord> {
        self.inner.cache.chapter(book, chapter).await
    }

    // ------------------------------------------------------------------
    // Connectivity
    // ------------------------------------------------------------------

    pub fn is_online(&self) -> bool {
        self.inner.connectivity.is_online()
    }

    /// Push the host's connectivity signal. Returns whether it changed.
    pub fn set_online(&self, online: bool) -> bool {
        self.inner.connectivity.set_online(online)
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// (Re)build the search index. Returns the number of indexed records.
    pub async fn initialize_search(&self) -> Result<usize> {
        Ok(self.search_engine()?.initialize().await?)
    }

    pub fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<SearchRecord>> {
        Ok(self.search_engine()?.search(query, filters)?)
    }
}
