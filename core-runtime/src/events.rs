//! # Event Bus System
//!
//! Typed, decoupled notifications between the core modules and the host,
//! built on `tokio::sync::broadcast`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐    emit     ┌───────────┐
//! │ Downloader   ├────────────>│           │
//! └──────────────┘             │           │   subscribe   ┌────────────┐
//! ┌──────────────┐    emit     │ EventBus  ├──────────────>│ Subscriber │
//! │ Connectivity ├────────────>│ (broadcast│               └────────────┘
//! └──────────────┘             │  channel) │   subscribe   ┌────────────┐
//! ┌──────────────┐    emit     │           ├──────────────>│ Subscriber │
//! │ Cache/Search ├────────────>│           │               └────────────┘
//! └──────────────┘             └───────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, ConnectivityEvent, EventBus};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(100);
//! let mut rx = bus.subscribe();
//!
//! bus.emit(CoreEvent::Connectivity(ConnectivityEvent::Offline)).ok();
//! assert_eq!(
//!     rx.recv().await.unwrap(),
//!     CoreEvent::Connectivity(ConnectivityEvent::Offline)
//! );
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind and missed `n`
//!   events. Non-fatal; keep receiving.
//! - **`RecvError::Closed`**: every sender is gone. Treat as shutdown.
//!
//! Emitting with no subscribers returns an error; publishers ignore it with
//! `.ok()` since nobody listening is a normal state.

use serde::{Deserialize, Serialize};
use std::fmt;
use core_async::sync::broadcast;

pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// A whole-book download emits one progress event per chapter; the largest
/// book has 150 chapters, so slow subscribers may lag during a full run.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 256;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Download(DownloadEvent),
    Connectivity(ConnectivityEvent),
    Cache(CacheEvent),
    Search(SearchEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Download(e) => e.description(),
            CoreEvent::Connectivity(e) => e.description(),
            CoreEvent::Cache(e) => e.description(),
            CoreEvent::Search(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Download(DownloadEvent::Failed { .. }) => EventSeverity::Error,
            CoreEvent::Download(DownloadEvent::ChapterFailed { .. })
            | CoreEvent::Cache(CacheEvent::WriteFailed { .. })
            | CoreEvent::Search(SearchEvent::ProviderFailed { .. })
            | CoreEvent::Connectivity(ConnectivityEvent::Offline) => EventSeverity::Warning,
            CoreEvent::Download(DownloadEvent::Completed { .. })
            | CoreEvent::Download(DownloadEvent::Paused { .. })
            | CoreEvent::Connectivity(ConnectivityEvent::Online)
            | CoreEvent::Search(SearchEvent::IndexBuilt { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Download Events
// ============================================================================

/// Book download lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum DownloadEvent {
    /// A book download began.
    Started { book: String, total: u32 },
    /// Snapshot published after every chapter attempt.
    Progress {
        book: String,
        current: u32,
        total: u32,
        failed_chapters: Vec<u32>,
    },
    /// A chapter could not be obtained in the current pass.
    ChapterFailed {
        book: String,
        chapter: u32,
        reason: String,
    },
    /// The second sweep over failed chapters began.
    RemediationStarted { book: String, chapters: Vec<u32> },
    /// Every chapter of the book is cached.
    Completed {
        book: String,
        downloaded: u32,
        skipped: u32,
        duration_ms: u64,
    },
    /// The download was cancelled; progress is frozen at `current`.
    Paused {
        book: String,
        current: u32,
        total: u32,
    },
    /// The run finished with chapters still missing.
    Failed {
        book: String,
        failed_chapters: Vec<u32>,
    },
}

impl DownloadEvent {
    fn description(&self) -> &str {
        match self {
            DownloadEvent::Started { .. } => "Book download started",
            DownloadEvent::Progress { .. } => "Book download progress",
            DownloadEvent::ChapterFailed { .. } => "Chapter download failed",
            DownloadEvent::RemediationStarted { .. } => "Retrying failed chapters",
            DownloadEvent::Completed { .. } => "Book download completed",
            DownloadEvent::Paused { .. } => "Book download paused",
            DownloadEvent::Failed { .. } => "Book download finished with missing chapters",
        }
    }
}

// ============================================================================
// Connectivity Events
// ============================================================================

/// Host online/offline transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

impl ConnectivityEvent {
    fn description(&self) -> &str {
        match self {
            ConnectivityEvent::Online => "Network connection restored",
            ConnectivityEvent::Offline => "Network connection lost",
        }
    }
}

impl From<bool> for ConnectivityEvent {
    fn from(online: bool) -> Self {
        if online {
            ConnectivityEvent::Online
        } else {
            ConnectivityEvent::Offline
        }
    }
}

// ============================================================================
// Cache Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum CacheEvent {
    /// A best-effort write did not reach the storage medium.
    WriteFailed { key: String, message: String },
    /// Entries under a namespace were removed.
    Cleared { namespace: String, removed: usize },
}

impl CacheEvent {
    fn description(&self) -> &str {
        match self {
            CacheEvent::WriteFailed { .. } => "Cache write failed",
            CacheEvent::Cleared { .. } => "Cache cleared",
        }
    }
}

// ============================================================================
// Search Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum SearchEvent {
    /// The index was (re)built.
    IndexBuilt { records: usize, providers: usize },
    /// A content provider was skipped while building the index.
    ProviderFailed { provider: String, message: String },
}

impl SearchEvent {
    fn description(&self) -> &str {
        match self {
            SearchEvent::IndexBuilt { .. } => "Search index built",
            SearchEvent::ProviderFailed { .. } => "Search provider failed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central broadcast channel for [`CoreEvent`]s.
///
/// Cloning is cheap; every clone publishes into the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional predicate.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::new(16);
/// let downloads = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Download(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// `RecvError::Lagged(n)` if the subscriber fell behind by `n` events,
    /// `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv). `None` when nothing is
    /// queued.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
