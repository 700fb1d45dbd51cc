//! # bible-api Provider
//!
//! [`ChapterSource`](bridge_traits::ChapterSource) for [bible-api.com] and
//! compatible mirrors.
//!
//! Transport concerns (retries, rate limiting, timeouts) are left to the
//! downloader; this crate only builds chapter URLs and reads responses.
//!
//! [bible-api.com]: https://bible-api.com

pub mod error;
pub mod source;
pub mod types;

pub use error::{BibleApiError, Result};
pub use source::BibleApiSource;
