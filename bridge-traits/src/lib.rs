//! # Host Bridge Traits
//!
//! Platform abstraction traits that each host shell implements.
//!
//! ## Overview
//!
//! This crate defines the contract between the offline core and the platform
//! it runs on. Each trait is a capability the core needs but cannot provide
//! portably.
//!
//! ## Traits
//!
//! - [`KeyValueStore`](storage::KeyValueStore) - Persistent string key-value medium
//! - [`HttpClient`](http::HttpClient) - Request/response transport
//! - [`ChapterSource`](content::ChapterSource) - Addressing and parsing of remote chapters
//! - [`NetworkMonitor`](network::NetworkMonitor) - Online/offline signal with change notifications
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate |
//! |----------|---------------------|
//! | Desktop  | `bridge-desktop`    |
//! | Mobile   | host-injected       |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! convert platform errors into it and keep messages actionable (include the
//! key, URL or status involved).
//!
//! ## Thread Safety
//!
//! Every trait requires `Send + Sync` so implementations can be shared across
//! async tasks behind an `Arc`.

pub mod content;
pub mod error;
pub mod http;
pub mod network;
pub mod storage;
pub mod time;

pub use error::BridgeError;

pub use content::{ChapterSource, RemoteVerse};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use network::{NetworkChangeStream, NetworkMonitor, NetworkStatus};
pub use storage::KeyValueStore;
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
