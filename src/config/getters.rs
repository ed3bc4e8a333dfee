//! Getter methods for `ScrapeConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `ScrapeConfig` instance.

use std::path::PathBuf;
use std::time::Duration;

use super::types::{LoginHelperCommand, ScrapeConfig};
use crate::utils::{build_search_urls, profile_url};

impl ScrapeConfig {
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn session_dir(&self) -> &PathBuf {
        &self.session_dir
    }

    #[must_use]
    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    #[must_use]
    pub fn search_filters(&self) -> &[String] {
        &self.search_filters
    }

    #[must_use]
    pub fn scroll_limit(&self) -> u32 {
        self.scroll_limit
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    #[must_use]
    pub fn max_concurrent_per_host(&self) -> usize {
        self.max_concurrent_per_host
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn flush_batch_size(&self) -> usize {
        self.flush_batch_size
    }

    #[must_use]
    pub fn progress_log_interval(&self) -> usize {
        self.progress_log_interval
    }

    #[must_use]
    pub fn login_helper(&self) -> &LoginHelperCommand {
        &self.login_helper
    }

    #[must_use]
    pub fn profile_url(&self) -> String {
        profile_url(&self.base_url, &self.username)
    }

    /// Full search URL set: keywords × search filters
    #[must_use]
    pub fn search_urls(&self) -> Vec<String> {
        build_search_urls(&self.base_url, &self.keywords, &self.search_filters)
    }
}
