//! Typed accessors for offline content.
//!
//! | Key                | Value                              | Max age |
//! |--------------------|------------------------------------|---------|
//! | `chapters`         | map `"{book}-{chapter}"` → record  | 7 days  |
//! | `devotionals`      | ordered list                       | 1 day   |
//! | `bookmarks`        | list                               | none    |
//! | `highlights`       | list                               | none    |
//! | `reading_progress` | last position                      | none    |

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use core_async::sync::Mutex;
use core_runtime::config::CacheSettings;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::models::{
    chapter_key, Bookmark, ChapterRecord, Devotional, Highlight, ReadingPosition, Verse,
};
use crate::store::VersionedCacheStore;

pub const CHAPTERS_KEY: &str = "chapters";
pub const DEVOTIONALS_KEY: &str = "devotionals";
pub const BOOKMARKS_KEY: &str = "bookmarks";
pub const HIGHLIGHTS_KEY: &str = "highlights";
pub const READING_PROGRESS_KEY: &str = "reading_progress";

type ChapterMap = BTreeMap<String, ChapterRecord>;

/// Domain view over a [`VersionedCacheStore`].
///
/// Collection writes are read-modify-write against the persisted value,
/// serialized by an internal lock, so saving chapters back to back (or from
/// several tasks) never drops an earlier save.
pub struct ContentCacheFacade {
    store: Arc<VersionedCacheStore>,
    chapter_max_age: Duration,
    devotional_max_age: Duration,
    write_lock: Mutex<()>,
}

impl ContentCacheFacade {
    pub fn new(store: Arc<VersionedCacheStore>) -> Self {
        Self::with_settings(store, &CacheSettings::default())
    }

    /// Take max ages from `settings`. The store's namespace and schema version
    /// are left as configured.
    pub fn with_settings(store: Arc<VersionedCacheStore>, settings: &CacheSettings) -> Self {
        Self {
            store,
            chapter_max_age: settings.chapter_max_age,
            devotional_max_age: settings.devotional_max_age,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<VersionedCacheStore> {
        &self.store
    }

    // ------------------------------------------------------------------
    // Chapters
    // ------------------------------------------------------------------

    async fn chapter_map(&self) -> ChapterMap {
        self.store.read(CHAPTERS_KEY).await.unwrap_or_default()
    }

    /// Cache one chapter, replacing any earlier copy of the same chapter.
    #[instrument(skip(self, verses), fields(verses = verses.len()))]
    pub async fn save_chapter(&self, book: &str, chapter: u32, verses: Vec<Verse>) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut chapters = self.chapter_map().await;
        let record = ChapterRecord {
            book: book.to_string(),
            chapter,
            verses,
        };
        chapters.insert(record.key(), record);

        self.store.write(CHAPTERS_KEY, &chapters).await?;
        debug!(cached = chapters.len(), "Chapter cached");
        Ok(())
    }

    /// Whether the chapter is cached. Never consults the network.
    pub async fn is_chapter_available(&self, book: &str, chapter: u32) -> bool {
        self.chapter_map()
            .await
            .contains_key(&chapter_key(book, chapter))
    }

    pub async fn chapter(&self, book: &str, chapter: u32) -> Option<ChapterRecord> {
        self.chapter_map().await.remove(&chapter_key(book, chapter))
    }

    /// Chapter numbers of `book` present in the cache.
    pub async fn downloaded_chapters(&self, book: &str) -> BTreeSet<u32> {
        self.chapter_map()
            .await
            .into_values()
            .filter(|record| record.book == book)
            .map(|record| record.chapter)
            .collect()
    }

    /// Drop every cached chapter of `book`. Returns how many were removed.
    #[instrument(skip(self))]
    pub async fn remove_book(&self, book: &str) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let mut chapters = self.chapter_map().await;
        let before = chapters.len();
        chapters.retain(|_, record| record.book != book);
        let removed = before - chapters.len();

        if removed > 0 {
            self.store.write(CHAPTERS_KEY, &chapters).await?;
            info!(removed, "Removed cached book");
        }
        Ok(removed)
    }

    pub async fn chapters_stale(&self) -> bool {
        self.store.is_stale(CHAPTERS_KEY, self.chapter_max_age).await
    }

    // ------------------------------------------------------------------
    // Devotionals
    // ------------------------------------------------------------------

    /// Replace the cached devotionals wholesale.
    pub async fn save_devotionals(&self, devotionals: &[Devotional]) -> Result<()> {
        self.store.write(DEVOTIONALS_KEY, devotionals).await
    }

    pub async fn devotionals(&self) -> Option<Vec<Devotional>> {
        self.store.read(DEVOTIONALS_KEY).await
    }

    pub async fn devotionals_stale(&self) -> bool {
        self.store
            .is_stale(DEVOTIONALS_KEY, self.devotional_max_age)
            .await
    }

    // ------------------------------------------------------------------
    // Bookmarks
    // ------------------------------------------------------------------

    pub async fn bookmarks(&self) -> Vec<Bookmark> {
        self.store.read(BOOKMARKS_KEY).await.unwrap_or_default()
    }

    pub async fn save_bookmarks(&self, bookmarks: &[Bookmark]) -> Result<()> {
        self.store.write(BOOKMARKS_KEY, bookmarks).await
    }

    /// Insert or replace (by id).
    pub async fn add_bookmark(&self, bookmark: Bookmark) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut bookmarks = self.bookmarks().await;
        upsert_by(&mut bookmarks, bookmark, |b| b.id.clone());
        self.store.write(BOOKMARKS_KEY, &bookmarks).await
    }

    /// Returns whether a bookmark with `id` existed.
    pub async fn remove_bookmark(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut bookmarks = self.bookmarks().await;
        let before = bookmarks.len();
        bookmarks.retain(|b| b.id != id);
        if bookmarks.len() == before {
            return Ok(false);
        }
        self.store.write(BOOKMARKS_KEY, &bookmarks).await?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Highlights
    // ------------------------------------------------------------------

    pub async fn highlights(&self) -> Vec<Highlight> {
        self.store.read(HIGHLIGHTS_KEY).await.unwrap_or_default()
    }

    pub async fn save_highlights(&self, highlights: &[Highlight]) -> Result<()> {
        self.store.write(HIGHLIGHTS_KEY, highlights).await
    }

    /// Insert or replace (by id).
    pub async fn add_highlight(&self, highlight: Highlight) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut highlights = self.highlights().await;
        upsert_by(&mut highlights, highlight, |h| h.id.clone());
        self.store.write(HIGHLIGHTS_KEY, &highlights).await
    }

    pub async fn remove_highlight(&self, id: &str) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let mut highlights = self.highlights().await;
        let before = highlights.len();
        highlights.retain(|h| h.id != id);
        if highlights.len() == before {
            return Ok(false);
        }
        self.store.write(HIGHLIGHTS_KEY, &highlights).await?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Reading progress
    // ------------------------------------------------------------------

    pub async fn save_reading_position(&self, position: &ReadingPosition) -> Result<()> {
        self.store.write(READING_PROGRESS_KEY, position).await
    }

    /// Record the reader's position stamped with the cache clock.
    pub async fn mark_reading_position(
        &self,
        book: &str,
        chapter: u32,
        verse: Option<u32>,
    ) -> Result<ReadingPosition> {
        let position = ReadingPosition {
            book: book.to_string(),
            chapter,
            verse,
            updated_at: self.store.clock().now(),
        };
        self.save_reading_position(&position).await?;
        Ok(position)
    }

    pub async fn reading_position(&self) -> Option<ReadingPosition> {
        self.store.read(READING_PROGRESS_KEY).await
    }

    /// Wipe every content kind in this cache's namespace.
    pub async fn clear_all(&self) -> Result<usize> {
        let _guard = self.write_lock.lock().await;
        self.store.clear_all().await
    }
}

fn upsert_by<T, K, F>(items: &mut Vec<T>, item: T, key: F)
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let id = key(&item);
    match items.iter_mut().find(|existing| key(existing) == id) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_replaces_matching_id() {
        let mut items = vec![("a", 1), ("b", 2)];
        upsert_by(&mut items, ("b", 20), |(id, _)| *id);
        upsert_by(&mut items, ("c", 3), |(id, _)| *id);
        assert_eq!(items, vec![("a", 1), ("b", 20), ("c", 3)]);
    }
}
