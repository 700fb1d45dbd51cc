//! Async runtime facade for the scripture offline core.
//!
//! Every `core-*` and `provider-*` crate goes through this crate instead of
//! depending on Tokio directly, so the executor can be swapped in one place.
//!
//! # Modules
//!
//! - `task`: task spawning
//! - `time`: sleeping, timeouts and cancellable waits
//! - `sync`: locks, channels and the cancellation token
//! - `runtime`: runtime handles and a blocking entry point
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::CancellationToken;
//! use core_async::time::{sleep_or_cancel, Duration};
//!
//! async fn wait_politely(token: &CancellationToken) -> bool {
//!     // `false` means the wait was cut short by cancellation.
//!     sleep_or_cancel(Duration::from_millis(300), token).await
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use tokio::select;
pub use time::{sleep, Duration, Instant};
