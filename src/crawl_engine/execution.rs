//! Simple async crawling execution
//!
//! This module provides the simple `crawl_impl` async API that executes a crawl
//! with the default collaborators and returns the run summary.

use std::sync::Arc;

use super::crawl_types::{CrawlResult, CrawlSummary};
use super::orchestrator::crawl_threads;
use super::progress::NoOpProgress;
use crate::config::ScrapeConfig;
use crate::page_extractor::ShredditExtractor;
use crate::session::SessionManager;

/// Crawl with the configured login helper and the markup extractor
///
/// This is a thin wrapper around `crawl_threads` that uses `NoOpProgress`;
/// the run still logs through the `log` facade.
pub async fn crawl_impl(config: &ScrapeConfig) -> CrawlResult<CrawlSummary> {
    let sessions = SessionManager::from_config(config);
    let extractor = Arc::new(ShredditExtractor::new(config.base_url()));

    crawl_threads(config, &sessions, extractor, Arc::new(NoOpProgress)).await
}
