//! # Download Progress
//!
//! Live state of the book download state machine.
//!
//! ```text
//! Idle → Downloading → Completed
//!             │      → Error     (finished with chapters missing)
//!             └────→ Paused      (cancelled; `current` frozen)
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Idle,
    Downloading,
    Paused,
    Completed,
    Error,
}

impl DownloadStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DownloadStatus::Paused | DownloadStatus::Completed | DownloadStatus::Error
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadStatus::Idle => "idle",
            DownloadStatus::Downloading => "downloading",
            DownloadStatus::Paused => "paused",
            DownloadStatus::Completed => "completed",
            DownloadStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot published after every chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadProgress {
    pub book: String,
    /// Chapters processed so far in the main pass. Stays frozen at its last
    /// value once the status is `Paused`.
    pub current: u32,
    pub total: u32,
    pub status: DownloadStatus,
    pub failed_chapters: BTreeSet<u32>,
}

impl DownloadProgress {
    pub fn idle() -> Self {
        Self {
            book: String::new(),
            current: 0,
            total: 0,
            status: DownloadStatus::Idle,
            failed_chapters: BTreeSet::new(),
        }
    }

    pub fn started(book: impl Into<String>, total: u32) -> Self {
        Self {
            book: book.into(),
            current: 0,
            total,
            status: DownloadStatus::Downloading,
            failed_chapters: BTreeSet::new(),
        }
    }

    /// Completion as a percentage (0.0 - 100.0)
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.current as f64 / self.total as f64) * 100.0
    }
}

impl Default for DownloadProgress {
    fn default() -> Self {
        Self::idle()
    }
}

/// Summary of one `download_book` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub book: String,
    pub status: DownloadStatus,
    /// Chapters fetched and cached by this run (including rescued ones).
    pub downloaded: u32,
    /// Chapters already cached before the run started.
    pub skipped: u32,
    pub failed: Vec<u32>,
    pub duration: Duration,
}

impl DownloadReport {
    pub fn is_complete(&self) -> bool {
        self.status == DownloadStatus::Completed
    }
}
