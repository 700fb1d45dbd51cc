//! # Chapter Download
//!
//! Fills the offline content cache with whole books.
//!
//! ## Components
//!
//! - **Catalog** (`catalog`): the 66 books and their chapter counts
//! - **Retried fetch** (`fetch`): per-attempt timeout, linear backoff, longer
//!   wait on rate limiting, cancellable waits
//! - **Progress** (`progress`): status machine and live progress snapshot
//! - **Orchestrator** (`orchestrator`): one book at a time, main pass plus a
//!   remediation pass over failed chapters
//!
//! Chapters are addressed and parsed by a
//! [`ChapterSource`](bridge_traits::ChapterSource) and stored through
//! [`ContentCacheFacade`](core_cache::ContentCacheFacade). A chapter already in
//! the cache is never fetched again.

pub mod catalog;
pub mod error;
pub mod fetch;
pub mod orchestrator;
pub mod progress;

pub use catalog::{find_book, Book, Testament};
pub use error::{Result, SyncError};
pub use fetch::{fetch_with_retry, FetchOutcome, RetryPolicy};
pub use orchestrator::{DownloadConfig, DownloadOrchestrator};
pub use progress::{DownloadProgress, DownloadReport, DownloadStatus};
