//! bible-api.com response types

use serde::Deserialize;

/// Body of `GET /{book}+{chapter}`.
///
/// Only the fields the downloader reads are modelled; the rest are ignored.
#[derive(Debug, Deserialize)]
pub struct ChapterResponse {
    #[serde(default)]
    pub reference: Option<String>,

    #[serde(default)]
    pub verses: Vec<ApiVerse>,

    #[serde(default)]
    pub translation_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiVerse {
    pub chapter: Option<u32>,
    pub verse: u32,
    /// Usually ends with a newline
    pub text: String,
}

/// Body returned with 4xx statuses, e.g. `{"error":"not found"}`.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Either shape the endpoint may return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiBody {
    Error(ErrorResponse),
    Chapter(ChapterResponse),
}
