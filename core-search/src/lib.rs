//! # Content Search
//!
//! Client-side fuzzy search over community content (posts, announcements,
//! events, devotionals).
//!
//! ## Pieces
//!
//! - [`ContentProvider`]: async source of content snapshots
//! - [`SearchIndexEngine`]: builds the index and answers queries
//! - [`SearchFilters`]: type, category, inclusive date range and tag overlap
//! - [`fuzzy`]: field similarity and weighted scoring
//!
//! ## Usage
//!
//! ```rust,ignore
//! let engine = SearchIndexEngine::default()
//!     .with_provider(Arc::new(StaticContentProvider::new("bulletin", items)));
//! engine.initialize().await?;
//!
//! let hits = engine.search("shepherd", &SearchFilters::new().kind(ContentKind::Post))?;
//! ```

pub mod error;
pub mod fuzzy;
pub mod index;
pub mod provider;
pub mod records;

pub use error::{Result, SearchError};
pub use fuzzy::{FieldWeights, DEFAULT_THRESHOLD};
pub use index::{SearchConfig, SearchHit, SearchIndexEngine};
pub use provider::{
    Announcement, CachedDevotionalProvider, ContentItem, ContentProvider, Event, Post,
    StaticContentProvider,
};
pub use records::{ContentKind, DateRange, SearchFilters, SearchRecord};
