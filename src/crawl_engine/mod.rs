//! Crawl Engine Module
//!
//! This module contains the crawl run state machine: session probing,
//! paginated search traversal, per-post detail/comment fan-out and batched
//! persistence. `crawl_impl` is the simple entry point; `crawl_threads` takes
//! explicit collaborators and a progress reporter.

// Sub-modules
pub mod client;
pub mod context;
pub mod crawl_types;
pub mod execution;
pub mod host_limiter;
pub mod orchestrator;
pub mod post_processor;
pub mod progress;
pub mod search_chain;
pub mod writer;

// Re-exports for public API
pub use execution::crawl_impl;

// Re-export orchestration and progress types for advanced usage
pub use orchestrator::crawl_threads;
pub use progress::{NoOpProgress, ProgressReporter};

pub use client::{PlatformClient, session_headers};
pub use host_limiter::{HostLimiter, RequestPermit};
pub use post_processor::PostOutcome;

// Re-export crawl types
pub use crawl_types::{CrawlError, CrawlResult, CrawlState, CrawlSummary, SearchCursor};
