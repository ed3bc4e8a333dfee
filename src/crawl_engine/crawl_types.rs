//! Core types for crawl runs.
//!
//! Error taxonomy, the run state machine, per-search pagination cursors and the
//! summary handed back when a run finishes.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::post_store::StoreError;
use crate::session::SessionError;
use crate::utils::next_page_url;

/// Custom error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Session could not be established or authentication was exhausted
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Crawl operation was cancelled")]
    Cancelled,

    #[error("Crawl error: {0}")]
    Other(String),
}

impl CrawlError {
    /// Only session failures abort a run; everything else is absorbed per post
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Session(_))
    }

    #[must_use]
    pub fn is_authentication_exhausted(&self) -> bool {
        matches!(self, Self::Session(SessionError::AuthenticationExhausted))
    }
}

impl From<anyhow::Error> for CrawlError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Other(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `CrawlError`
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Crawl run states
///
/// `RetryingLogin` is entered at most once, from `ProbingLogin`. The three
/// fetch states are per post and run concurrently across posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    Unauthenticated,
    ProbingLogin,
    RetryingLogin,
    Searching,
    FetchingPostDetail,
    FetchingComments,
    Completed,
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::ProbingLogin => "probing login",
            Self::RetryingLogin => "retrying login",
            Self::Searching => "searching",
            Self::FetchingPostDetail => "fetching post detail",
            Self::FetchingComments => "fetching comments",
            Self::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// Pagination state for one keyword × filter search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCursor {
    search_url: String,
    page: u32,
    limit: u32,
}

impl SearchCursor {
    #[must_use]
    pub fn new(search_url: impl Into<String>, limit: u32) -> Self {
        Self {
            search_url: search_url.into(),
            page: 0,
            limit,
        }
    }

    #[must_use]
    pub fn search_url(&self) -> &str {
        &self.search_url
    }

    /// Follow-up pages requested so far
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.page >= self.limit
    }

    /// Next page URL for the token read from the current page
    ///
    /// `None` completes the search: either the limit is reached or the page
    /// carried no continuation token.
    pub fn advance(&mut self, token: Option<&str>) -> Option<String> {
        if self.is_exhausted() {
            return None;
        }
        let token = token.filter(|t| !t.is_empty())?;
        self.page += 1;
        Some(next_page_url(&self.search_url, token))
    }
}

/// Totals reported when a crawl run finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub searches: usize,
    /// Searches that reached their page limit, ran out of cursors or failed
    pub completed_searches: usize,
    pub search_pages: usize,
    /// Posts new to this run (not already in the store)
    pub posts_discovered: usize,
    pub posts_written: usize,
    /// Posts persisted with some fields missing
    pub posts_partial: usize,
    pub orphaned_comments: usize,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_at_limit_issues_no_further_pages() {
        let mut cursor = SearchCursor::new("https://x/search/?q=a", 0);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.advance(Some("tok")), None);
        assert_eq!(cursor.page(), 0);
    }

    #[test]
    fn cursor_counts_pages_up_to_limit() {
        let mut cursor = SearchCursor::new("https://x/search/?q=a", 2);
        assert_eq!(
            cursor.advance(Some("t1")).as_deref(),
            Some("https://x/search/?q=a&cursor=t1")
        );
        assert_eq!(
            cursor.advance(Some("t2")).as_deref(),
            Some("https://x/search/?q=a&cursor=t2")
        );
        assert_eq!(cursor.advance(Some("t3")), None);
        assert_eq!(cursor.page(), 2);
    }

    #[test]
    fn missing_token_completes_search_early() {
        let mut cursor = SearchCursor::new("https://x/search/?q=a", 5);
        assert_eq!(cursor.advance(None), None);
        assert_eq!(cursor.advance(Some("")), None);
        assert_eq!(cursor.page(), 0);
    }

    #[test]
    fn only_session_errors_are_fatal() {
        assert!(CrawlError::Session(SessionError::AuthenticationExhausted).is_fatal());
        assert!(CrawlError::from(SessionError::AuthenticationExhausted).is_authentication_exhausted());
        assert!(!CrawlError::Network("reset".into()).is_fatal());
        assert!(!CrawlError::Status { url: "u".into(), status: 500 }.is_fatal());
    }
}
