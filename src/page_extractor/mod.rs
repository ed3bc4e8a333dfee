//! Page extraction contract.
//!
//! The crawl engine only ever talks to `PageExtractor`; the markup details live
//! in `ShredditExtractor`. Every operation is a pure function of the page content.

// Sub-modules
pub mod extractors;
pub mod schema;

use thiserror::Error;

// Re-exports for public API
pub use extractors::ShredditExtractor;
pub use schema::{CommentPage, CommentRecord, PostDetail, PostSummary, RawPostSummary};

/// Per-record extraction failure; recorded as missing fields, never fatal
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Extraction incomplete: {0}")]
    ExtractionIncomplete(String),
}

/// Raw page content → structured records
pub trait PageExtractor: Send + Sync {
    /// Posts on a search results page; records missing any required field are dropped
    fn extract_search_results(&self, content: &str) -> Vec<PostSummary>;

    /// Continuation token for the next search page, if any
    fn extract_cursor_token(&self, content: &str) -> Option<String>;

    /// Vote count, comment count and body from a post page
    fn extract_post_detail(&self, content: &str) -> Result<PostDetail, ExtractionError>;

    /// Declared comment total and the flat comment list, in page order
    fn extract_comment_forest(&self, content: &str) -> CommentPage;
}
