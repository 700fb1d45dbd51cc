//! `ChapterSource` for bible-api.com style endpoints.

use bridge_traits::content::{ChapterSource, RemoteVerse};
use bridge_traits::error::Result;
use bridge_traits::http::HttpResponse;
use core_runtime::config::ContentApiConfig;
use tracing::{debug, warn};

use crate::error::BibleApiError;
use crate::types::ApiBody;

/// Addresses chapters as `{base}/{book}+{chapter}?translation={t}` and reads
/// the `verses` array of the response.
///
/// # Example
///
/// ```
/// use provider_bible_api::BibleApiSource;
/// use bridge_traits::ChapterSource;
///
/// let source = BibleApiSource::new("https://bible-api.com/", "kjv");
/// assert_eq!(
///     source.chapter_url("1 Samuel", 3),
///     "https://bible-api.com/1%20Samuel+3?translation=kjv"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct BibleApiSource {
    base_url: String,
    translation: String,
}

impl BibleApiSource {
    pub fn new(base_url: impl Into<String>, translation: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            translation: translation.into(),
        }
    }

    pub fn from_config(config: &ContentApiConfig) -> Self {
        Self::new(config.base_url.clone(), config.translation.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn translation(&self) -> &str {
        &self.translation
    }

    fn parse(&self, response: &HttpResponse) -> crate::error::Result<Vec<RemoteVerse>> {
        let chapter = match serde_json::from_slice::<ApiBody>(&response.body)? {
            ApiBody::Error(error) => return Err(BibleApiError::Api(error.error)),
            ApiBody::Chapter(chapter) => chapter,
        };

        if let Some(found) = chapter.translation_id.as_deref() {
            if !found.eq_ignore_ascii_case(&self.translation) {
                warn!(expected = %self.translation, found, "Translation mismatch");
            }
        }
        debug!(
            reference = chapter.reference.as_deref().unwrap_or("?"),
            verses = chapter.verses.len(),
            "Parsed chapter"
        );

        Ok(chapter
            .verses
            .into_iter()
            .map(|verse| RemoteVerse::new(verse.verse, verse.text.trim()))
            .collect())
    }
}

impl ChapterSource for BibleApiSource {
    fn name(&self) -> &str {
        "bible-api"
    }

    fn chapter_url(&self, book: &str, chapter: u32) -> String {
        format!(
            "{}/{}+{}?translation={}",
            self.base_url,
            urlencoding::encode(book),
            chapter,
            urlencoding::encode(&self.translation)
        )
    }

    fn parse_chapter(&self, response: &HttpResponse) -> Result<Vec<RemoteVerse>> {
        Ok(self.parse(response)?)
    }
}
