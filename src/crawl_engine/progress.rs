//! Progress reporting abstraction for crawl runs
//!
//! Defines the `ProgressReporter` trait for lifecycle event reporting
//! and provides a no-op implementation for simple use cases.

use super::crawl_types::{CrawlState, CrawlSummary};

/// Trait for reporting crawl progress at key lifecycle events
///
/// Called from concurrent tasks, so implementations must be thread-safe.
/// Reporting never influences control flow.
pub trait ProgressReporter: Send + Sync {
    /// A run-level or per-post state was entered
    fn report_state(&self, state: CrawlState);

    /// Running total of posts new to this run
    fn report_posts_collected(&self, total: usize);

    /// One search finished paginating
    fn report_search_completed(&self, completed: usize, total: usize);

    /// A post was persisted with missing fields
    fn report_post_failed(&self, url: &str, error: &str);

    fn report_completed(&self, summary: &CrawlSummary);
}

/// Progress reporter that does nothing
///
/// All methods are no-ops and will be inlined away by the compiler.
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_state(&self, _state: CrawlState) {}

    #[inline(always)]
    fn report_posts_collected(&self, _total: usize) {}

    #[inline(always)]
    fn report_search_completed(&self, _completed: usize, _total: usize) {}

    #[inline(always)]
    fn report_post_failed(&self, _url: &str, _error: &str) {}

    #[inline(always)]
    fn report_completed(&self, _summary: &CrawlSummary) {}
}
