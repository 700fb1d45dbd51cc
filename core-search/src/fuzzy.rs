//! Weighted fuzzy scoring.
//!
//! A field's similarity to the query is `1.0` when it contains the query
//! (case-insensitive) and otherwise the best normalized Damerau-Levenshtein
//! similarity between the query and any run of consecutive words of the
//! same length. A field counts only when its similarity reaches the
//! threshold; the record score is the weighted sum of counting fields.

use serde::{Deserialize, Serialize};
use strsim::normalized_damerau_levenshtein;

use crate::records::SearchRecord;

pub const DEFAULT_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    pub title: f64,
    pub content: f64,
    pub excerpt: f64,
    pub tags: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            title: 0.4,
            content: 0.3,
            excerpt: 0.2,
            tags: 0.1,
        }
    }
}

/// Lowercased query split into words, reused across every record.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    words: Vec<String>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        let words: Vec<String> = raw.split_whitespace().map(str::to_lowercase).collect();
        Self {
            text: words.join(" "),
            words,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Similarity of `field` to this query in `[0.0, 1.0]`.
    pub fn similarity(&self, field: &str) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let field = field.to_lowercase();
        if field.contains(&self.text) {
            return 1.0;
        }

        let words: Vec<&str> = field.split_whitespace().collect();
        if words.is_empty() {
            return 0.0;
        }
        let span = self.words.len().min(words.len());
        words
            .windows(span)
            .map(|window| normalized_damerau_levenshtein(&self.text, &window.join(" ")))
            .fold(0.0, f64::max)
    }
}

/// Scores records against a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    pub weights: FieldWeights,
    pub threshold: f64,
}

impl Scorer {
    pub fn new(weights: FieldWeights, threshold: f64) -> Self {
        Self { weights, threshold }
    }

    fn counted(&self, similarity: f64, weight: f64) -> f64 {
        if similarity >= self.threshold {
            similarity * weight
        } else {
            0.0
        }
    }

    /// `None` when no field reaches the threshold.
    pub fn score(&self, query: &Query, record: &SearchRecord) -> Option<f64> {
        let tags = record
            .tags
            .iter()
            .map(|tag| query.similarity(tag))
            .fold(0.0, f64::max);
        let excerpt = record
            .excerpt
            .as_deref()
            .map_or(0.0, |excerpt| query.similarity(excerpt));

        let score = self.counted(query.similarity(&record.title), self.weights.title)
            + self.counted(query.similarity(&record.content), self.weights.content)
            + self.counted(excerpt, self.weights.excerpt)
            + self.counted(tags, self.weights.tags);

        (score > 0.0).then_some(score)
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(FieldWeights::default(), DEFAULT_THRESHOLD)
    }
}
