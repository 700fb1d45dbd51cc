//! Workspace umbrella crate.
//!
//! Re-exports the workspace crates behind feature flags so host applications
//! can depend on `scripture-offline-workspace` and enable `desktop-shims`,
//! `search` or `bible-api` without wiring each crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service as service;

#[cfg(feature = "search")]
pub use core_search as search;

#[cfg(feature = "bible-api")]
pub use provider_bible_api as bible_api;
