//! Indexed records and query filters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Announcement,
    Event,
    Devotional,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::Announcement => "announcement",
            ContentKind::Event => "event",
            ContentKind::Devotional => "devotional",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Flattened, searchable view of one piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Every set dimension must match.
///
/// `kind` and `category` compare exactly, `date_range` is inclusive, and
/// `tags` matches when the record shares at least one tag. An empty tag list
/// constrains nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ContentKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: ContentKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange::new(start, end));
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn matches(&self, record: &SearchRecord) -> bool {
        if self.kind.is_some_and(|kind| kind != record.kind) {
            return false;
        }
        if let Some(category) = &self.category {
            if record.category.as_ref() != Some(category) {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            if !range.contains(record.date) {
                return false;
            }
        }
        match &self.tags {
            Some(wanted) if !wanted.is_empty() => {
                record.tags.iter().any(|tag| wanted.contains(tag))
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn record() -> SearchRecord {
        SearchRecord {
            id: "p1".to_string(),
            title: "Lenten prayer guide".to_string(),
            content: "Forty days of prayer".to_string(),
            kind: ContentKind::Post,
            category: Some("prayer".to_string()),
            tags: vec!["lent".to_string(), "fasting".to_string()],
            date: date(10),
            excerpt: None,
        }
    }

    #[test]
    fn test_empty_filters_match_everything() {
        assert!(SearchFilters::new().matches(&record()));
        assert!(SearchFilters::new().tags(Vec::<String>::new()).matches(&record()));
    }

    #[test]
    fn test_each_dimension() {
        let r = record();
        assert!(SearchFilters::new().kind(ContentKind::Post).matches(&r));
        assert!(!SearchFilters::new().kind(ContentKind::Event).matches(&r));
        assert!(!SearchFilters::new().category("Prayer").matches(&r));
        assert!(SearchFilters::new().date_range(date(10), date(10)).matches(&r));
        assert!(!SearchFilters::new().date_range(date(11), date(20)).matches(&r));
        assert!(SearchFilters::new().tags(["easter", "lent"]).matches(&r));
        assert!(!SearchFilters::new().tags(["advent"]).matches(&r));
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["type"], "post");
        assert!(json.get("excerpt").is_none());

        let filters: SearchFilters = serde_json::from_value(serde_json::json!({
            "type": "event",
            "dateRange": { "start": "2024-03-01", "end": "2024-03-31" }
        }))
        .unwrap();
        assert_eq!(filters.kind, Some(ContentKind::Event));
        assert_eq!(filters.date_range, Some(DateRange::new(date(1), date(31))));
    }
}
