//! Behaviour of the content cache against real storage media.

use std::sync::Arc;

use bridge_desktop::{MemoryKeyValueStore, SqliteKeyValueStore};
use bridge_traits::{KeyValueStore, ManualClock};
use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use core_cache::{
    Bookmark, ContentCacheFacade, Devotional, Highlight, Verse, VersionedCacheStore,
};

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap(),
    ))
}

fn facade_over(medium: Arc<dyn KeyValueStore>, clock: Arc<ManualClock>) -> ContentCacheFacade {
    ContentCacheFacade::new(Arc::new(VersionedCacheStore::new(medium, clock)))
}

fn verses(count: u32, prefix: &str) -> Vec<Verse> {
    (1..=count)
        .map(|n| Verse::new(n, format!("{} verse {}", prefix, n)))
        .collect()
}

#[tokio::test]
async fn saving_chapters_never_loses_earlier_ones() {
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock());

    cache.save_chapter("Genesis", 1, verses(31, "g1")).await.unwrap();
    cache.save_chapter("Genesis", 2, verses(25, "g2")).await.unwrap();

    let first = cache.chapter("Genesis", 1).await.unwrap();
    let second = cache.chapter("Genesis", 2).await.unwrap();
    assert_eq!(first.verses.len(), 31);
    assert_eq!(second.verses.len(), 25);
    assert_eq!(
        cache.downloaded_chapters("Genesis").await.into_iter().collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[tokio::test]
async fn second_save_of_same_chapter_wins() {
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock());

    cache.save_chapter("Genesis", 1, verses(31, "first")).await.unwrap();
    cache.save_chapter("Genesis", 2, verses(25, "other")).await.unwrap();
    cache.save_chapter("Genesis", 1, verses(3, "second")).await.unwrap();

    let record = cache.chapter("Genesis", 1).await.unwrap();
    assert_eq!(record.verses, verses(3, "second"));
    assert_eq!(cache.chapter("Genesis", 2).await.unwrap().verses.len(), 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_saves_are_all_kept() {
    let cache = Arc::new(facade_over(Arc::new(MemoryKeyValueStore::new()), clock()));

    let handles: Vec<_> = (1..=21)
        .map(|chapter| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .save_chapter("Judges", chapter, verses(2, "j"))
                    .await
                    .unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.downloaded_chapters("Judges").await.len(), 21);
}

#[tokio::test]
async fn availability_is_a_pure_membership_check() {
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock());

    assert!(!cache.is_chapter_available("Ruth", 1).await);
    cache.save_chapter("Ruth", 1, verses(22, "r")).await.unwrap();
    assert!(cache.is_chapter_available("Ruth", 1).await);
    assert!(!cache.is_chapter_available("Ruth", 2).await);
    assert!(!cache.is_chapter_available("ruth", 1).await);
}

#[tokio::test]
async fn old_schema_chapters_are_not_available() {
    let medium: Arc<dyn KeyValueStore> = Arc::new(MemoryKeyValueStore::new());
    let clock = clock();

    let legacy = ContentCacheFacade::new(Arc::new(
        VersionedCacheStore::new(medium.clone(), clock.clone()).with_schema_version("0.9.0"),
    ));
    legacy.save_chapter("Ruth", 1, verses(22, "r")).await.unwrap();

    let current = facade_over(medium, clock);
    assert!(!current.is_chapter_available("Ruth", 1).await);

    // A fresh save starts a new current-schema map
    current.save_chapter("Ruth", 2, verses(23, "r")).await.unwrap();
    assert!(current.is_chapter_available("Ruth", 2).await);
    assert!(!current.is_chapter_available("Ruth", 1).await);
}

#[tokio::test]
async fn chapters_go_stale_after_a_week_but_remain_readable() {
    let clock = clock();
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock.clone());

    cache.save_chapter("Genesis", 1, verses(31, "g")).await.unwrap();
    assert!(!cache.chapters_stale().await);

    clock.advance(ChronoDuration::days(7) + ChronoDuration::seconds(1));

    assert!(cache.chapters_stale().await);
    assert!(cache.is_chapter_available("Genesis", 1).await);
}

#[tokio::test]
async fn devotionals_go_stale_after_a_day() {
    let clock = clock();
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock.clone());

    let devotional = Devotional {
        id: "d-2024-05-01".to_string(),
        title: "Where you go".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        scripture: "Ruth 1:16".to_string(),
        content: "Loyalty that chooses.".to_string(),
        author: None,
    };
    cache.save_devotionals(&[devotional.clone()]).await.unwrap();

    clock.advance(ChronoDuration::hours(23));
    assert!(!cache.devotionals_stale().await);

    clock.advance(ChronoDuration::hours(2));
    assert!(cache.devotionals_stale().await);
    assert_eq!(cache.devotionals().await, Some(vec![devotional]));
}

#[tokio::test]
async fn bookmarks_and_highlights_never_expire() {
    let clock = clock();
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock.clone());
    let now = Utc::now();

    cache
        .add_bookmark(Bookmark {
            id: "b1".to_string(),
            book: "Ruth".to_string(),
            chapter: 1,
            verse: 16,
            note: Some("vow".to_string()),
            created_at: now,
        })
        .await
        .unwrap();
    cache
        .add_highlight(Highlight {
            id: "h1".to_string(),
            book: "Ruth".to_string(),
            chapter: 4,
            verse: 17,
            color: "yellow".to_string(),
            created_at: now,
        })
        .await
        .unwrap();

    clock.advance(ChronoDuration::days(400));

    assert_eq!(cache.bookmarks().await.len(), 1);
    assert_eq!(cache.highlights().await.len(), 1);
}

#[tokio::test]
async fn bookmark_upsert_and_remove() {
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock());
    let mut bookmark = Bookmark {
        id: "b1".to_string(),
        book: "John".to_string(),
        chapter: 3,
        verse: 16,
        note: None,
        created_at: Utc::now(),
    };

    cache.add_bookmark(bookmark.clone()).await.unwrap();
    bookmark.note = Some("memorize".to_string());
    cache.add_bookmark(bookmark.clone()).await.unwrap();

    assert_eq!(cache.bookmarks().await, vec![bookmark]);
    assert!(cache.remove_bookmark("b1").await.unwrap());
    assert!(!cache.remove_bookmark("b1").await.unwrap());
    assert!(cache.bookmarks().await.is_empty());
}

#[tokio::test]
async fn reading_position_uses_cache_clock() {
    let clock = clock();
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock.clone());

    assert!(cache.reading_position().await.is_none());
    let position = cache.mark_reading_position("Ruth", 2, Some(12)).await.unwrap();

    assert_eq!(position.updated_at, Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap());
    assert_eq!(cache.reading_position().await, Some(position));
}

#[tokio::test]
async fn remove_book_only_touches_that_book() {
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock());
    for chapter in 1..=4 {
        cache.save_chapter("Ruth", chapter, verses(2, "r")).await.unwrap();
    }
    cache.save_chapter("Jonah", 1, verses(2, "j")).await.unwrap();

    assert_eq!(cache.remove_book("Ruth").await.unwrap(), 4);
    assert_eq!(cache.remove_book("Ruth").await.unwrap(), 0);
    assert!(cache.downloaded_chapters("Ruth").await.is_empty());
    assert!(cache.is_chapter_available("Jonah", 1).await);
}

#[tokio::test]
async fn clear_all_wipes_every_content_kind() {
    let cache = facade_over(Arc::new(MemoryKeyValueStore::new()), clock());
    cache.save_chapter("Ruth", 1, verses(2, "r")).await.unwrap();
    cache.mark_reading_position("Ruth", 1, None).await.unwrap();

    assert_eq!(cache.clear_all().await.unwrap(), 2);
    assert!(!cache.is_chapter_available("Ruth", 1).await);
    assert!(cache.reading_position().await.is_none());
}

#[tokio::test]
async fn quota_exceeded_write_keeps_previous_map() {
    let cache = facade_over(Arc::new(MemoryKeyValueStore::with_quota(600)), clock());

    cache.save_chapter("Ruth", 1, verses(2, "r")).await.unwrap();
    let err = cache
        .save_chapter("Psalms", 119, verses(176, "p"))
        .await
        .unwrap_err();

    assert!(err.is_quota_exceeded());
    assert!(cache.is_chapter_available("Ruth", 1).await);
    assert!(!cache.is_chapter_available("Psalms", 119).await);
}

#[tokio::test]
async fn sqlite_medium_round_trip() {
    let medium = Arc::new(SqliteKeyValueStore::in_memory().await.unwrap());
    let cache = facade_over(medium, clock());

    cache.save_chapter("Obadiah", 1, verses(21, "o")).await.unwrap();

    let record = cache.chapter("Obadiah", 1).await.unwrap();
    assert_eq!(record.book, "Obadiah");
    assert_eq!(record.verses.len(), 21);
}
