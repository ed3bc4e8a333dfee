//! Core configuration types for crawl runs
//!
//! This module contains the main `ScrapeConfig` struct and its associated types
//! that define the configuration parameters for a crawl run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{
    DEFAULT_BASE_URL, DEFAULT_FLUSH_BATCH_SIZE, DEFAULT_LOGIN_HELPER,
    DEFAULT_MAX_CONCURRENT_PER_HOST, DEFAULT_MAX_CONCURRENT_REQUESTS,
    DEFAULT_PROGRESS_LOG_INTERVAL, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCROLL_LIMIT,
    DEFAULT_SEARCH_FILTERS, STORE_FILE_NAME,
};

/// External login helper invocation
///
/// The helper is run as `<program> [args..] --username U --password P --storage-file PATH`
/// and must write the credential artifact to `PATH` or exit non-zero.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginHelperCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for LoginHelperCommand {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_LOGIN_HELPER),
            args: Vec::new(),
        }
    }
}

/// Main configuration struct for a crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub(crate) username: String,

    /// Never serialized; configs are logged and echoed in summaries.
    #[serde(skip_serializing, default)]
    pub(crate) password: String,

    /// Directory holding one credential artifact per account (`<username>.json`)
    pub(crate) session_dir: PathBuf,

    /// Directory holding the append-only post store
    pub(crate) output_dir: PathBuf,

    pub(crate) keywords: Vec<String>,
    pub(crate) search_filters: Vec<String>,

    /// Follow-up pages requested per search URL
    ///
    /// Default: 40
    pub(crate) scroll_limit: u32,

    /// Platform origin every request URL is derived from
    pub(crate) base_url: String,

    /// Maximum in-flight requests across the crawl
    /// Default: 20
    pub(crate) max_concurrent_requests: usize,

    /// Maximum in-flight requests per target host
    /// Default: 20
    pub(crate) max_concurrent_per_host: usize,

    pub(crate) request_timeout_secs: u64,

    /// Completed posts buffered in memory before they are appended to the store
    ///
    /// Default: 25
    pub(crate) flush_batch_size: usize,

    pub(crate) progress_log_interval: usize,

    pub(crate) login_helper: LoginHelperCommand,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            session_dir: PathBuf::from("./tmp/sessions"),
            output_dir: PathBuf::from("./output"),
            keywords: Vec::new(),
            search_filters: DEFAULT_SEARCH_FILTERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            scroll_limit: DEFAULT_SCROLL_LIMIT,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            max_concurrent_per_host: DEFAULT_MAX_CONCURRENT_PER_HOST,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            flush_batch_size: DEFAULT_FLUSH_BATCH_SIZE,
            progress_log_interval: DEFAULT_PROGRESS_LOG_INTERVAL,
            login_helper: LoginHelperCommand::default(),
        }
    }
}

impl ScrapeConfig {
    /// Credential artifact path for the configured account
    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        self.session_dir.join(format!("{}.json", self.username))
    }

    /// Path of the append-only raw post store
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.output_dir.join(STORE_FILE_NAME)
    }
}
