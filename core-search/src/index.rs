//! # Search Index Engine
//!
//! In-memory index over every registered [`ContentProvider`].
//!
//! `initialize()` rebuilds the index wholesale from provider snapshots. Until
//! the first build, every query returns [`SearchError::NotInitialized`].
//! Queries never touch the network.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use core_runtime::events::{CoreEvent, EventBus, SearchEvent};
use futures::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, SearchError};
use crate::fuzzy::{FieldWeights, Query, Scorer, DEFAULT_THRESHOLD};
use crate::provider::ContentProvider;
use crate::records::{ContentKind, SearchFilters, SearchRecord};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub weights: FieldWeights,
    /// Minimum field similarity in `[0.0, 1.0]` for the field to count.
    pub threshold: f64,
    /// Cap on returned records. `None` returns every match.
    pub max_results: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weights: FieldWeights::default(),
            threshold: DEFAULT_THRESHOLD,
            max_results: None,
        }
    }
}

impl SearchConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }
}

/// A matching record and its weighted score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub record: SearchRecord,
    pub score: f64,
}

pub struct SearchIndexEngine {
    providers: Vec<Arc<dyn ContentProvider>>,
    config: SearchConfig,
    index: RwLock<Option<Vec<SearchRecord>>>,
    event_bus: Option<EventBus>,
}

impl SearchIndexEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            providers: Vec::new(),
            config,
            index: RwLock::new(None),
            event_bus: None,
        }
    }

    /// Register a provider. Takes effect at the next `initialize()`.
    pub fn with_provider(mut self, provider: Arc<dyn ContentProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.index.read().is_some()
    }

    pub fn len(&self) -> usize {
        self.index.read().as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pull a snapshot from every provider and replace the index.
    ///
    /// A provider that fails is logged and left out; the build still
    /// succeeds. Records keep provider registration order, then each
    /// provider's own order. Returns the number of indexed records.
    #[instrument(skip(self), fields(providers = self.providers.len()))]
    pub async fn initialize(&self) -> Result<usize> {
        let snapshots = join_all(self.providers.iter().map(|provider| provider.snapshot())).await;

        let mut records = Vec::new();
        let mut healthy = 0;
        for (provider, snapshot) in self.providers.iter().zip(snapshots) {
            match snapshot {
                Ok(items) => {
                    debug!(provider = provider.name(), items = items.len(), "Provider snapshot");
                    healthy += 1;
                    records.extend(items.into_iter().map(SearchRecord::from));
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Skipping content provider");
                    self.emit(SearchEvent::ProviderFailed {
                        provider: provider.name().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let count = records.len();
        *self.index.write() = Some(records);

        info!(records = count, providers = healthy, "Search index built");
        self.emit(SearchEvent::IndexBuilt {
            records: count,
            providers: healthy,
        });
        Ok(count)
    }

    /// Records matching `query` and `filters`, best first.
    ///
    /// A blank query returns every record passing the filters in index order.
    pub fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<SearchRecord>> {
        Ok(self
            .search_scored(query, filters)?
            .into_iter()
            .map(|hit| hit.record)
            .collect())
    }

    /// Like [`search`](Self::search) but keeps the scores. Ties keep index
    /// order. A blank query scores every hit `0.0`.
    pub fn search_scored(&self, query: &str, filters: &SearchFilters) -> Result<Vec<SearchHit>> {
        let guard = self.index.read();
        let index = guard.as_ref().ok_or(SearchError::NotInitialized)?;
        let filtered = index.iter().filter(|record| filters.matches(record));

        let query = Query::parse(query);
        let mut hits: Vec<SearchHit> = if query.is_empty() {
            filtered
                .map(|record| SearchHit {
                    record: record.clone(),
                    score: 0.0,
                })
                .collect()
        } else {
            let scorer = Scorer::new(self.config.weights, self.config.threshold);
            let mut hits: Vec<SearchHit> = filtered
                .filter_map(|record| {
                    scorer.score(&query, record).map(|score| SearchHit {
                        record: record.clone(),
                        score,
                    })
                })
                .collect();
            // Stable sort keeps index order among equal scores
            hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
            hits
        };

        if let Some(max) = self.config.max_results {
            hits.truncate(max);
        }
        Ok(hits)
    }

    /// Distinct categories, optionally restricted to one content kind.
    pub fn categories(&self, kind: Option<ContentKind>) -> Result<BTreeSet<String>> {
        let guard = self.index.read();
        let index = guard.as_ref().ok_or(SearchError::NotInitialized)?;
        Ok(index
            .iter()
            .filter(|record| kind.map_or(true, |kind| record.kind == kind))
            .filter_map(|record| record.category.clone())
            .collect())
    }

    /// Distinct tags across the whole index.
    pub fn tags(&self) -> Result<BTreeSet<String>> {
        let guard = self.index.read();
        let index = guard.as_ref().ok_or(SearchError::NotInitialized)?;
        Ok(index
            .iter()
            .flat_map(|record| record.tags.iter().cloned())
            .collect())
    }

    fn emit(&self, event: SearchEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Search(event)).ok();
        }
    }
}

impl Default for SearchIndexEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_queries_fail() {
        let engine = SearchIndexEngine::default();
        assert!(!engine.is_initialized());
        assert!(matches!(
            engine.search("grace", &SearchFilters::new()),
            Err(SearchError::NotInitialized)
        ));
        assert!(matches!(engine.tags(), Err(SearchError::NotInitialized)));
        assert!(matches!(
            engine.categories(None),
            Err(SearchError::NotInitialized)
        ));
    }

    #[tokio::test]
    async fn test_empty_build_is_initialized() {
        let engine = SearchIndexEngine::default();
        assert_eq!(engine.initialize().await.unwrap(), 0);
        assert!(engine.is_initialized());
        assert!(engine.search("", &SearchFilters::new()).unwrap().is_empty());
    }

    #[test]
    fn test_threshold_is_clamped() {
        assert_eq!(SearchConfig::default().with_threshold(1.7).threshold, 1.0);
    }
}
