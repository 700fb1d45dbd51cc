//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `KeyValueStore` backed by a SQLite file (`SqliteKeyValueStore`) or by
//!   process memory with an optional quota (`MemoryKeyValueStore`)
//! - `NetworkMonitor` using a TCP reachability probe
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SqliteKeyValueStore};
//!
//! #[tokio::main]
//! async fn main() {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let store = SqliteKeyValueStore::open_default().await?;
//!     // Hand both to CoreConfig::builder()
//! }
//! ```

mod http;
mod memory;
mod network;
mod store;

pub use http::ReqwestHttpClient;
pub use memory::MemoryKeyValueStore;
pub use network::DesktopNetworkMonitor;
pub use store::SqliteKeyValueStore;
