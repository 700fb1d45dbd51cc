//! # Offline Content Cache
//!
//! Versioned, best-effort persistence for downloaded scripture and user data.
//!
//! ## Layers
//!
//! - [`VersionedCacheStore`] wraps a host [`KeyValueStore`] and stores every
//!   value in a [`CacheEnvelope`] stamped with a write time and the schema
//!   version. Envelopes from another schema version read as absent.
//! - [`ContentCacheFacade`] exposes typed accessors (chapters, devotionals,
//!   bookmarks, highlights, reading position) on top of the store, each with
//!   its own staleness policy.
//!
//! Staleness is advisory: stale data is still returned and the caller decides
//! whether to refresh.
//!
//! [`KeyValueStore`]: bridge_traits::KeyValueStore

pub mod content;
pub mod error;
pub mod models;
pub mod store;

pub use content::ContentCacheFacade;
pub use core_runtime::config::CACHE_SCHEMA_VERSION;
pub use error::{CacheError, Result};
pub use models::{
    chapter_key, Bookmark, ChapterRecord, Devotional, Highlight, ReadingPosition, Verse,
};
pub use store::{CacheEnvelope, VersionedCacheStore};
