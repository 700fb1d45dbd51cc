//! Cached content records.
//!
//! Field names serialize in camelCase so entries written by other shells of
//! the app (which share the same medium) stay readable.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Composite key of a chapter inside the chapters map: `"{book}-{chapter}"`.
pub fn chapter_key(book: &str, chapter: u32) -> String {
    format!("{}-{}", book, chapter)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub verse_number: u32,
    pub text: String,
}

impl Verse {
    pub fn new(verse_number: u32, text: impl Into<String>) -> Self {
        Self {
            verse_number,
            text: text.into(),
        }
    }
}

/// One downloaded chapter. Never edited in place; a new fetch of the same
/// chapter overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterRecord {
    pub book: String,
    pub chapter: u32,
    pub verses: Vec<Verse>,
}

impl ChapterRecord {
    pub fn key(&self) -> String {
        chapter_key(&self.book, self.chapter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Devotional {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    /// Reference of the reading, e.g. "Ruth 1:16-17"
    pub scripture: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: String,
    pub book: String,
    pub chapter: u32,
    pub verse: u32,
    /// CSS-style color token chosen by the reader (e.g. "yellow", "#ffd54f")
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Last place the reader stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingPosition {
    pub book: String,
    pub chapter: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<u32>,
    pub updated_at: DateTime<Utc>,
}
