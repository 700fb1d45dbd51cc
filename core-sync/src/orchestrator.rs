//! # Book Download Orchestrator
//!
//! Downloads every chapter of a book into the content cache.
//!
//! ## Workflow
//!
//! 1. Resolve the book through the [catalog](crate::catalog)
//! 2. Claim the single download slot (a second request is rejected)
//! 3. Main pass over `1..=chapters`:
//!    - stop if cancelled
//!    - skip chapters already cached
//!    - fetch with [`RetryPolicy::main_pass`], parse, persist
//!    - publish progress
//!    - wait the inter-request delay before the next fetch
//! 4. Remediation pass over chapters that failed, with a smaller budget and
//!    longer backoff
//! 5. Settle on `Completed`, `Error` (some chapters missing) or `Paused`
//!
//! ## Usage
//!
//! ```rust,ignore
//! let orchestrator = Arc::new(DownloadOrchestrator::new(http, source, cache));
//!
//! let mut progress = orchestrator.subscribe_progress();
//! let task = tokio::spawn({
//!     let orchestrator = orchestrator.clone();
//!     async move { orchestrator.download_book("Ruth").await }
//! });
//!
//! while progress.changed().await.is_ok() {
//!     let p = progress.borrow().clone();
//!     println!("{}/{} {}", p.current, p.total, p.status);
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::content::ChapterSource;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_async::sync::{watch, CancellationToken};
use core_async::time::{sleep_or_cancel, Instant};
use core_cache::{ContentCacheFacade, Verse};
use core_runtime::events::{CoreEvent, DownloadEvent, EventBus};
use parking_lot::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::catalog::{find_book, Book};
use crate::error::{Result, SyncError};
use crate::fetch::{fetch_with_retry, FetchOutcome, RetryPolicy};
use crate::progress::{DownloadProgress, DownloadReport, DownloadStatus};

#[derive(Debug, Clone)]
pub struct DownloadConfig {
    pub main_pass: RetryPolicy,
    pub remediation: RetryPolicy,

    /// Pause between two fetched chapters. Not applied after cache hits or
    /// after the last chapter.
    pub inter_request_delay: Duration,

    /// Pause before each remediation attempt.
    pub settle_delay: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            main_pass: RetryPolicy::main_pass(),
            remediation: RetryPolicy::remediation(),
            inter_request_delay: Duration::from_millis(300),
            settle_delay: Duration::from_millis(500),
        }
    }
}

struct ActiveDownload {
    book: &'static str,
    token: CancellationToken,
}

/// Releases the download slot however the run ends.
struct SlotGuard<'a> {
    slot: &'a Mutex<Option<ActiveDownload>>,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.slot.lock().take();
    }
}

enum ChapterOutcome {
    Saved,
    Failed(String),
    Cancelled,
}

pub struct DownloadOrchestrator {
    http: Arc<dyn HttpClient>,
    source: Arc<dyn ChapterSource>,
    cache: Arc<ContentCacheFacade>,
    config: DownloadConfig,
    event_bus: Option<EventBus>,
    active: Mutex<Option<ActiveDownload>>,
    progress: watch::Sender<DownloadProgress>,
}

impl DownloadOrchestrator {
    pub fn new(
        http: Arc<dyn HttpClient>,
        source: Arc<dyn ChapterSource>,
        cache: Arc<ContentCacheFacade>,
    ) -> Self {
        let (progress, _) = watch::channel(DownloadProgress::idle());
        Self {
            http,
            source,
            cache,
            config: DownloadConfig::default(),
            event_bus: None,
            active: Mutex::new(None),
            progress,
        }
    }

    pub fn with_config(mut self, config: DownloadConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_event_bus(mut self, event_bus: EventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Latest progress snapshot.
    pub fn progress(&self) -> DownloadProgress {
        self.progress.borrow().clone()
    }

    /// Receiver that sees every progress update, starting from the current one.
    pub fn subscribe_progress(&self) -> watch::Receiver<DownloadProgress> {
        self.progress.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Request cancellation of the running download.
    ///
    /// Returns `false` when nothing is running. The run stops at its next
    /// checkpoint (before a chapter or during any wait) and ends `Paused`.
    pub fn cancel(&self) -> bool {
        match self.active.lock().as_ref() {
            Some(active) => {
                info!(book = active.book, "Cancelling download");
                active.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Download `book` and return `true` iff every chapter ended up cached.
    ///
    /// # Errors
    ///
    /// - [`SyncError::UnknownBook`] if the name is not in the catalog
    /// - [`SyncError::DownloadInProgress`] if another download is running
    pub async fn download_book(&self, book: &str) -> Result<bool> {
        Ok(self.download_book_with_report(book).await?.is_complete())
    }

    /// Like [`download_book`](Self::download_book) but returns the run summary.
    #[instrument(skip(self))]
    pub async fn download_book_with_report(&self, book: &str) -> Result<DownloadReport> {
        let book = find_book(book).ok_or_else(|| SyncError::UnknownBook(book.to_string()))?;
        let (token, _slot) = self.claim(book)?;
        Ok(self.run(book, &token).await)
    }

    fn claim(&self, book: Book) -> Result<(CancellationToken, SlotGuard<'_>)> {
        let mut active = self.active.lock();
        if let Some(running) = active.as_ref() {
            return Err(SyncError::DownloadInProgress {
                active: running.book.to_string(),
                requested: book.name.to_string(),
            });
        }

        let token = CancellationToken::new();
        *active = Some(ActiveDownload {
            book: book.name,
            token: token.clone(),
        });
        Ok((token, SlotGuard { slot: &self.active }))
    }

    async fn run(&self, book: Book, token: &CancellationToken) -> DownloadReport {
        let started = Instant::now();
        let mut progress = DownloadProgress::started(book.name, book.chapters);
        let mut downloaded = 0u32;
        let mut skipped = 0u32;

        info!(book = book.name, chapters = book.chapters, source = self.source.name(), "Starting book download");
        self.emit(DownloadEvent::Started {
            book: book.name.to_string(),
            total: book.chapters,
        });
        self.publish(&progress);

        let mut cancelled = false;
        for chapter in book.chapter_range() {
            if token.is_cancelled() {
                cancelled = true;
                break;
            }

            if self.cache.is_chapter_available(book.name, chapter).await {
                debug!(chapter, "Chapter already cached");
                skipped += 1;
                progress.current = chapter;
                self.publish(&progress);
                continue;
            }

            match self
                .download_chapter(book.name, chapter, &self.config.main_pass, token)
                .await
            {
                ChapterOutcome::Saved => downloaded += 1,
                ChapterOutcome::Failed(reason) => {
                    self.record_failure(book.name, chapter, reason);
                    progress.failed_chapters.insert(chapter);
                }
                ChapterOutcome::Cancelled => {
                    cancelled = true;
                    break;
                }
            }

            progress.current = chapter;
            self.publish(&progress);

            if chapter < book.chapters {
                // A cancelled wait is picked up by the check at the top of the loop
                sleep_or_cancel(self.config.inter_request_delay, token).await;
            }
        }

        if !cancelled && !progress.failed_chapters.is_empty() {
            let (rescued, interrupted) = self.remediate(&mut progress, token).await;
            downloaded += rescued;
            cancelled = interrupted;
        }

        progress.status = if cancelled {
            DownloadStatus::Paused
        } else if progress.failed_chapters.is_empty() {
            DownloadStatus::Completed
        } else {
            DownloadStatus::Error
        };
        self.publish(&progress);

        let report = DownloadReport {
            book: book.name.to_string(),
            status: progress.status,
            downloaded,
            skipped,
            failed: progress.failed_chapters.iter().copied().collect(),
            duration: started.elapsed(),
        };
        self.finish(&progress, &report);
        report
    }

    /// Second sweep over the failed chapters of `progress`. Each rescued
    /// chapter leaves `failed_chapters` and is published before the next
    /// one starts. Returns the rescue count and whether the sweep was cut
    /// short by cancellation.
    async fn remediate(
        &self,
        progress: &mut DownloadProgress,
        token: &CancellationToken,
    ) -> (u32, bool) {
        let book = progress.book.clone();
        let failed: Vec<u32> = progress.failed_chapters.iter().copied().collect();
        info!(book = %book, chapters = ?failed, "Retrying failed chapters");
        self.emit(DownloadEvent::RemediationStarted {
            book: book.clone(),
            chapters: failed.clone(),
        });

        let mut rescued = 0;
        for chapter in failed {
            if !sleep_or_cancel(self.config.settle_delay, token).await {
                return (rescued, true);
            }

            match self
                .download_chapter(&book, chapter, &self.config.remediation, token)
                .await
            {
                ChapterOutcome::Saved => {
                    info!(book = %book, chapter, "Chapter rescued");
                    rescued += 1;
                    progress.failed_chapters.remove(&chapter);
                    self.publish(progress);
                }
                ChapterOutcome::Failed(reason) => self.record_failure(&book, chapter, reason),
                ChapterOutcome::Cancelled => return (rescued, true),
            }
        }
        (rescued, false)
    }

    async fn download_chapter(
        &self,
        book: &str,
        chapter: u32,
        policy: &RetryPolicy,
        token: &CancellationToken,
    ) -> ChapterOutcome {
        let request = HttpRequest::get(self.source.chapter_url(book, chapter))
            .header("Accept", "application/json");

        let response = match fetch_with_retry(self.http.as_ref(), request, policy, token).await {
            FetchOutcome::Response(response) => response,
            FetchOutcome::Exhausted { attempts } => {
                return ChapterOutcome::Failed(format!("no response after {} attempts", attempts))
            }
            FetchOutcome::Cancelled => return ChapterOutcome::Cancelled,
        };

        // A response that lands after cancel is dropped
        if token.is_cancelled() {
            return ChapterOutcome::Cancelled;
        }

        let verses: Vec<Verse> = match self.source.parse_chapter(&response) {
            Ok(verses) => verses
                .into_iter()
                .map(|v| Verse::new(v.number, v.text))
                .collect(),
            Err(e) => return ChapterOutcome::Failed(format!("unreadable response: {}", e)),
        };
        if verses.is_empty() {
            return ChapterOutcome::Failed("empty chapter".to_string());
        }

        match self.cache.save_chapter(book, chapter, verses).await {
            Ok(()) => ChapterOutcome::Saved,
            Err(e) => ChapterOutcome::Failed(format!("cache write failed: {}", e)),
        }
    }

    fn record_failure(&self, book: &str, chapter: u32, reason: String) {
        warn!(book, chapter, reason = %reason, "Chapter failed");
        self.emit(DownloadEvent::ChapterFailed {
            book: book.to_string(),
            chapter,
            reason,
        });
    }

    fn publish(&self, progress: &DownloadProgress) {
        self.progress.send_replace(progress.clone());
        self.emit(DownloadEvent::Progress {
            book: progress.book.clone(),
            current: progress.current,
            total: progress.total,
            failed_chapters: progress.failed_chapters.iter().copied().collect(),
        });
    }

    fn finish(&self, progress: &DownloadProgress, report: &DownloadReport) {
        let duration_ms = report.duration.as_millis() as u64;
        match report.status {
            DownloadStatus::Completed => {
                info!(
                    book = %report.book,
                    downloaded = report.downloaded,
                    skipped = report.skipped,
                    duration_ms,
                    "Book download completed"
                );
                self.emit(DownloadEvent::Completed {
                    book: report.book.clone(),
                    downloaded: report.downloaded,
                    skipped: report.skipped,
                    duration_ms,
                });
            }
            DownloadStatus::Paused => {
                info!(book = %report.book, current = progress.current, total = progress.total, "Book download paused");
                self.emit(DownloadEvent::Paused {
                    book: report.book.clone(),
                    current: progress.current,
                    total: progress.total,
                });
            }
            _ => {
                warn!(
                    book = %report.book,
                    downloaded = report.downloaded,
                    failed = ?report.failed,
                    duration_ms,
                    "Book download finished with missing chapters"
                );
                self.emit(DownloadEvent::Failed {
                    book: report.book.clone(),
                    failed_chapters: report.failed.clone(),
                });
            }
        }
    }

    fn emit(&self, event: DownloadEvent) {
        if let Some(bus) = &self.event_bus {
            bus.emit(CoreEvent::Download(event)).ok();
        }
    }
}
