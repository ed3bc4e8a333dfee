//! Shared state of one crawl run
//!
//! Owned by the orchestrator and handed to every search chain and post task
//! behind an `Arc`. The post store is the only durable piece.

use log::{info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;

use super::client::PlatformClient;
use super::progress::ProgressReporter;
use crate::page_extractor::PageExtractor;
use crate::post_store::{PostRecord, PostStore};

/// Run-level counters, for reporting only
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pub discovered: AtomicUsize,
    pub completed_searches: AtomicUsize,
    pub search_pages: AtomicUsize,
    pub partial: AtomicUsize,
    pub orphaned_comments: AtomicUsize,
}

pub struct CrawlContext {
    pub client: PlatformClient,
    pub extractor: Arc<dyn PageExtractor>,
    pub store: Arc<PostStore>,
    pub progress: Arc<dyn ProgressReporter>,
    pub base_url: String,
    pub scroll_limit: u32,
    pub progress_log_interval: usize,
    pub total_searches: usize,
    pub counters: CrawlCounters,
    records: mpsc::Sender<PostRecord>,
}

impl CrawlContext {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        client: PlatformClient,
        extractor: Arc<dyn PageExtractor>,
        store: Arc<PostStore>,
        progress: Arc<dyn ProgressReporter>,
        base_url: String,
        scroll_limit: u32,
        progress_log_interval: usize,
        total_searches: usize,
        records: mpsc::Sender<PostRecord>,
    ) -> Self {
        Self {
            client,
            extractor,
            store,
            progress,
            base_url,
            scroll_limit,
            progress_log_interval: progress_log_interval.max(1),
            total_searches,
            counters: CrawlCounters::default(),
            records,
        }
    }

    /// Claim a post URL for this run; `false` if already stored or claimed
    pub fn claim_post(&self, url: &str) -> bool {
        if !self.store.claim(url) {
            return false;
        }
        let total = self.counters.discovered.fetch_add(1, Ordering::Relaxed) + 1;
        if total % self.progress_log_interval == 0 {
            info!("Collected {total} posts so far");
            self.progress.report_posts_collected(total);
        }
        true
    }

    pub fn complete_search(&self) {
        let completed = self.counters.completed_searches.fetch_add(1, Ordering::Relaxed) + 1;
        info!("Completed posts search {completed}/{}", self.total_searches);
        self.progress
            .report_search_completed(completed, self.total_searches);
    }

    /// Hand a finished record to the store writer
    pub async fn persist(&self, record: PostRecord) {
        let url = record.url.clone();
        if self.records.send(record).await.is_err() {
            warn!("Store writer has stopped, dropping {url}");
        }
    }
}
