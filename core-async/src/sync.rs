//! Synchronization primitives.
//!
//! Async-aware locks and channels from Tokio plus the cooperative
//! [`CancellationToken`] used by long-running jobs such as book downloads.
//!
//! ```rust
//! use core_async::sync::{CancellationToken, Mutex};
//!
//! # async fn example() {
//! let guard = Mutex::new(0u32);
//! *guard.lock().await += 1;
//!
//! let token = CancellationToken::new();
//! let child = token.clone();
//! token.cancel();
//! assert!(child.is_cancelled());
//! # }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};
pub use tokio_util::sync::CancellationToken;
