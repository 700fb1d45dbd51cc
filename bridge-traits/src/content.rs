//! Remote Scripture Content Abstraction
//!
//! Describes the chapter endpoint the downloader talks to. The downloader owns
//! the transport (retries, timeouts, rate limiting); a source only knows how
//! to address a chapter and how to read the verses out of a response.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::http::HttpResponse;

/// A verse as delivered by a remote source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteVerse {
    pub number: u32,
    pub text: String,
}

impl RemoteVerse {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Remote chapter provider.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::content::ChapterSource;
///
/// let url = source.chapter_url("Genesis", 1);
/// let response = http.execute(HttpRequest::get(url)).await?;
/// let verses = source.parse_chapter(&response)?;
/// ```
pub trait ChapterSource: Send + Sync {
    /// Short identifier used in logs (e.g. `"bible-api"`).
    fn name(&self) -> &str;

    /// URL that returns the given chapter.
    fn chapter_url(&self, book: &str, chapter: u32) -> String;

    /// Extract verses from a successful response.
    ///
    /// An empty list is a valid parse; the downloader treats it as a failed
    /// chapter.
    fn parse_chapter(&self, response: &HttpResponse) -> Result<Vec<RemoteVerse>>;
}
