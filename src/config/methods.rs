//! Builder methods available for all states
//!
//! Tuning knobs for pagination depth, concurrency and persistence cadence.

use super::builder::ScrapeConfigBuilder;

impl<State> ScrapeConfigBuilder<State> {
    /// Set the number of follow-up pages requested per search URL
    ///
    /// A limit of 0 requests only the first page of every search.
    #[must_use]
    pub fn scroll_limit(mut self, limit: u32) -> Self {
        self.config.scroll_limit = limit;
        self
    }

    /// Replace the search filter variants appended to every keyword query
    #[must_use]
    pub fn search_filters(mut self, filters: Vec<String>) -> Self {
        self.config.search_filters = filters;
        self
    }

    /// Point the crawler at a different platform origin
    ///
    /// Used by tests to target a local mock server.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the maximum number of in-flight requests across the crawl
    ///
    /// # Arguments
    /// * `max` - Global request limit (default: 20)
    #[must_use]
    pub fn max_concurrent_requests(mut self, max: usize) -> Self {
        self.config.max_concurrent_requests = max;
        self
    }

    /// Set the maximum number of in-flight requests per target host
    ///
    /// # Arguments
    /// * `max` - Per-host request limit (default: 20)
    #[must_use]
    pub fn max_concurrent_per_host(mut self, max: usize) -> Self {
        self.config.max_concurrent_per_host = max;
        self
    }

    #[must_use]
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    /// Set how many completed posts are buffered before each store append
    ///
    /// Smaller values lose less work if the process is killed; larger values
    /// issue fewer writes. Everything left over is flushed when the run ends.
    #[must_use]
    pub fn flush_batch_size(mut self, size: usize) -> Self {
        self.config.flush_batch_size = size;
        self
    }

    #[must_use]
    pub fn progress_log_interval(mut self, interval: usize) -> Self {
        self.config.progress_log_interval = interval;
        self
    }
}
