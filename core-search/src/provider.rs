//! # Content Providers
//!
//! Sources of searchable content. Each provider hands the engine a full
//! snapshot of its items; the engine flattens them into [`SearchRecord`]s.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_cache::{ContentCacheFacade, Devotional};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::records::{ContentKind, SearchRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub starts_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Post(Post),
    Announcement(Announcement),
    Event(Event),
    Devotional(Devotional),
}

impl From<ContentItem> for SearchRecord {
    fn from(item: ContentItem) -> Self {
        match item {
            ContentItem::Post(post) => SearchRecord {
                id: post.id,
                title: post.title,
                content: post.body,
                kind: ContentKind::Post,
                category: post.category,
                tags: post.tags,
                date: post.published_at.date_naive(),
                excerpt: post.excerpt,
            },
            ContentItem::Announcement(announcement) => SearchRecord {
                id: announcement.id,
                title: announcement.title,
                content: announcement.message,
                kind: ContentKind::Announcement,
                category: announcement.category,
                tags: Vec::new(),
                date: announcement.published_at.date_naive(),
                excerpt: None,
            },
            // The venue is searchable through the excerpt
            ContentItem::Event(event) => SearchRecord {
                id: event.id,
                title: event.title,
                content: event.description,
                kind: ContentKind::Event,
                category: event.category,
                tags: event.tags,
                date: event.starts_at.date_naive(),
                excerpt: event.location,
            },
            // Scripture reference as excerpt, author as tag
            ContentItem::Devotional(devotional) => SearchRecord {
                id: devotional.id,
                title: devotional.title,
                content: devotional.content,
                kind: ContentKind::Devotional,
                category: None,
                tags: devotional.author.into_iter().collect(),
                date: devotional.date,
                excerpt: Some(devotional.scripture),
            },
        }
    }
}

/// A source of searchable content.
///
/// `snapshot` returns everything the provider currently has. It is called
/// once per index build.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Identifier used in logs and events
    fn name(&self) -> &str;

    async fn snapshot(&self) -> Result<Vec<ContentItem>>;
}

/// Fixed list of items, for content the host already holds in memory.
pub struct StaticContentProvider {
    name: String,
    items: Vec<ContentItem>,
}

impl StaticContentProvider {
    pub fn new(name: impl Into<String>, items: Vec<ContentItem>) -> Self {
        Self {
            name: name.into(),
            items,
        }
    }
}

#[async_trait]
impl ContentProvider for StaticContentProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn snapshot(&self) -> Result<Vec<ContentItem>> {
        Ok(self.items.clone())
    }
}

/// Devotionals currently held in the offline cache.
///
/// Stale devotionals are still indexed; an empty or unreadable cache yields
/// no items.
pub struct CachedDevotionalProvider {
    cache: Arc<ContentCacheFacade>,
}

impl CachedDevotionalProvider {
    pub fn new(cache: Arc<ContentCacheFacade>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl ContentProvider for CachedDevotionalProvider {
    fn name(&self) -> &str {
        "cached-devotionals"
    }

    async fn snapshot(&self) -> Result<Vec<ContentItem>> {
        Ok(self
            .cache
            .devotionals()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(ContentItem::Devotional)
            .collect())
    }
}
