//! Index builds and queries over realistic parish content.

use std::sync::Arc;

use async_trait::async_trait;
use bridge_desktop::MemoryKeyValueStore;
use bridge_traits::SystemClock;
use chrono::{NaiveDate, TimeZone, Utc};
use core_cache::{ContentCacheFacade, Devotional, VersionedCacheStore};
use core_runtime::events::{CoreEvent, EventBus, SearchEvent};
use core_search::{
    Announcement, CachedDevotionalProvider, ContentItem, ContentKind, ContentProvider, Event,
    Post, SearchConfig, SearchError, SearchFilters, SearchIndexEngine, StaticContentProvider,
};

fn day(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, day).unwrap()
}

fn post(id: &str, title: &str, body: &str, category: &str, tags: &[&str], month: u32, d: u32) -> ContentItem {
    ContentItem::Post(Post {
        id: id.to_string(),
        title: title.to_string(),
        body: body.to_string(),
        category: Some(category.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        excerpt: None,
        published_at: Utc.with_ymd_and_hms(2024, month, d, 9, 0, 0).unwrap(),
    })
}

fn event(id: &str, title: &str, description: &str, location: &str, tags: &[&str], month: u32, d: u32) -> ContentItem {
    ContentItem::Event(Event {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category: Some("worship".to_string()),
        location: Some(location.to_string()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        starts_at: Utc.with_ymd_and_hms(2024, month, d, 6, 30, 0).unwrap(),
    })
}

fn bulletin() -> Vec<ContentItem> {
    vec![
        post(
            "p1",
            "The Good Shepherd",
            "Reflections on John 10 and the shepherd who knows his sheep.",
            "sermons",
            &["john", "shepherd"],
            3,
            3,
        ),
        post(
            "p2",
            "Lenten fasting guide",
            "Practical steps for prayer and fasting during Lent.",
            "devotion",
            &["lent", "prayer"],
            2,
            14,
        ),
        post(
            "p3",
            "Youth retreat recap",
            "Photos and stories from the mountain retreat.",
            "youth",
            &["retreat"],
            4,
            20,
        ),
        ContentItem::Announcement(Announcement {
            id: "a1".to_string(),
            title: "Office closed Monday".to_string(),
            message: "The church office is closed for Easter Monday.".to_string(),
            category: Some("office".to_string()),
            published_at: Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap(),
        }),
        event(
            "e1",
            "Easter sunrise service",
            "Join us at dawn for worship.",
            "Lakeside park",
            &["easter", "worship"],
            3,
            31,
        ),
        event(
            "e2",
            "Prayer vigil",
            "An evening of prayer for the city.",
            "Sanctuary",
            &["prayer"],
            3,
            15,
        ),
    ]
}

async fn engine() -> SearchIndexEngine {
    let engine = SearchIndexEngine::default()
        .with_provider(Arc::new(StaticContentProvider::new("bulletin", bulletin())));
    engine.initialize().await.unwrap();
    engine
}

fn ids(records: &[core_search::SearchRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

struct BrokenProvider;

#[async_trait]
impl ContentProvider for BrokenProvider {
    fn name(&self) -> &str {
        "events-feed"
    }

    async fn snapshot(&self) -> core_search::Result<Vec<ContentItem>> {
        Err(SearchError::provider("events-feed", "HTTP 502"))
    }
}

// ============================================================================
// Ranking
// ============================================================================

#[tokio::test]
async fn weighted_fields_rank_title_matches_first() {
    let engine = engine().await;

    let hits = engine.search_scored("prayer", &SearchFilters::new()).unwrap();
    let ranked: Vec<&str> = hits.iter().map(|h| h.record.id.as_str()).collect();

    // e2: title + content + tag; p2: content + tag
    assert_eq!(ranked, vec!["e2", "p2"]);
    assert!((hits[0].score - 0.8).abs() < 1e-9);
    assert!((hits[1].score - 0.4).abs() < 1e-9);
}

#[tokio::test]
async fn typos_still_match() {
    let engine = engine().await;
    let results = engine.search("shepard", &SearchFilters::new()).unwrap();
    assert_eq!(ids(&results), vec!["p1"]);
}

#[tokio::test]
async fn equal_scores_keep_index_order() {
    let items = vec![
        post("d", "Weekly bulletin", "Grace for the week", "news", &[], 1, 7),
        post("a", "Grace notes", "Hymn sing", "music", &[], 1, 8),
        post("b", "Grace abounds", "Hymn sing", "music", &[], 1, 9),
        post("c", "Amazing grace", "Hymn sing", "music", &[], 1, 10),
    ];
    let engine = SearchIndexEngine::default()
        .with_provider(Arc::new(StaticContentProvider::new("music", items)));
    engine.initialize().await.unwrap();

    let results = engine.search("grace", &SearchFilters::new()).unwrap();
    assert_eq!(ids(&results), vec!["a", "b", "c", "d"]);
}

#[tokio::test]
async fn unmatched_query_returns_nothing() {
    let engine = engine().await;
    assert!(engine
        .search("xylophone", &SearchFilters::new())
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn max_results_truncates_after_ranking() {
    let engine = SearchIndexEngine::new(SearchConfig::default().with_max_results(1))
        .with_provider(Arc::new(StaticContentProvider::new("bulletin", bulletin())));
    engine.initialize().await.unwrap();

    let results = engine.search("prayer", &SearchFilters::new()).unwrap();
    assert_eq!(ids(&results), vec!["e2"]);
}

// ============================================================================
// Filters
// ============================================================================

#[tokio::test]
async fn empty_query_lists_filtered_records_in_index_order() {
    let engine = engine().await;

    let all = engine.search("   ", &SearchFilters::new()).unwrap();
    assert_eq!(ids(&all), vec!["p1", "p2", "p3", "a1", "e1", "e2"]);

    let posts = engine
        .search("", &SearchFilters::new().kind(ContentKind::Post))
        .unwrap();
    assert_eq!(ids(&posts), vec!["p1", "p2", "p3"]);
}

#[tokio::test]
async fn filters_compose_across_dimensions() {
    let engine = engine().await;
    let march_worship = SearchFilters::new()
        .kind(ContentKind::Event)
        .category("worship")
        .date_range(day(3, 1), day(3, 31));

    // End of range is inclusive
    assert_eq!(
        ids(&engine.search("", &march_worship).unwrap()),
        vec!["e1", "e2"]
    );
    assert_eq!(
        ids(&engine.search("", &march_worship.clone().tags(["prayer"])).unwrap()),
        vec!["e2"]
    );
    assert_eq!(
        ids(&engine
            .search("", &march_worship.clone().date_range(day(3, 1), day(3, 30)))
            .unwrap()),
        vec!["e2"]
    );
    assert!(engine
        .search("", &march_worship.category("sermons"))
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn filters_apply_before_scoring() {
    let engine = engine().await;
    let results = engine
        .search("prayer", &SearchFilters::new().kind(ContentKind::Post))
        .unwrap();
    assert_eq!(ids(&results), vec!["p2"]);
}

// ============================================================================
// Facets
// ============================================================================

#[tokio::test]
async fn categories_and_tags_are_deduplicated() {
    let engine = engine().await;

    let all: Vec<String> = engine.categories(None).unwrap().into_iter().collect();
    assert_eq!(all, vec!["devotion", "office", "sermons", "worship", "youth"]);

    let events: Vec<String> = engine
        .categories(Some(ContentKind::Event))
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(events, vec!["worship"]);

    let tags: Vec<String> = engine.tags().unwrap().into_iter().collect();
    assert_eq!(
        tags,
        vec!["easter", "john", "lent", "prayer", "retreat", "shepherd", "worship"]
    );
}

// ============================================================================
// Index lifecycle
// ============================================================================

#[tokio::test]
async fn failing_provider_is_skipped() {
    let bus = EventBus::new(16);
    let mut events = bus.subscribe();
    let engine = SearchIndexEngine::default()
        .with_provider(Arc::new(BrokenProvider))
        .with_provider(Arc::new(StaticContentProvider::new("bulletin", bulletin())))
        .with_event_bus(bus);

    assert_eq!(engine.initialize().await.unwrap(), 6);

    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Search(SearchEvent::ProviderFailed {
            provider: "events-feed".to_string(),
            message: "Content provider events-feed failed: HTTP 502".to_string(),
        })
    );
    assert_eq!(
        events.recv().await.unwrap(),
        CoreEvent::Search(SearchEvent::IndexBuilt {
            records: 6,
            providers: 1,
        })
    );
}

#[tokio::test]
async fn reinitialize_replaces_the_index() {
    let engine = engine().await;
    assert_eq!(engine.len(), 6);

    let replacement = SearchIndexEngine::default()
        .with_provider(Arc::new(BrokenProvider));
    replacement.initialize().await.unwrap();
    assert!(replacement.is_initialized());
    assert!(replacement.is_empty());

    assert_eq!(engine.initialize().await.unwrap(), 6);
    assert_eq!(engine.len(), 6);
}

#[tokio::test]
async fn cached_devotionals_are_searchable() {
    let cache = Arc::new(ContentCacheFacade::new(Arc::new(VersionedCacheStore::new(
        Arc::new(MemoryKeyValueStore::new()),
        Arc::new(SystemClock),
    ))));
    cache
        .save_devotionals(&[Devotional {
            id: "d-0214".to_string(),
            title: "Steadfast love".to_string(),
            date: day(2, 14),
            scripture: "Lamentations 3:22-23".to_string(),
            content: "His mercies are new every morning.".to_string(),
            author: None,
        }])
        .await
        .unwrap();

    let engine = SearchIndexEngine::default()
        .with_provider(Arc::new(CachedDevotionalProvider::new(cache)))
        .with_provider(Arc::new(StaticContentProvider::new("bulletin", bulletin())));
    assert_eq!(engine.initialize().await.unwrap(), 7);

    let results = engine
        .search(
            "lamentations",
            &SearchFilters::new().kind(ContentKind::Devotional),
        )
        .unwrap();
    assert_eq!(ids(&results), vec!["d-0214"]);

    let mercy = engine.search("mercies", &SearchFilters::new()).unwrap();
    assert_eq!(ids(&mercy), vec!["d-0214"]);
}
