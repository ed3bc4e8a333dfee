pub mod comment_tree;
pub mod config;
pub mod crawl_engine;
pub mod enrichment;
pub mod page_extractor;
pub mod post_store;
pub mod session;
pub mod utils;

pub use comment_tree::{CommentForest, reconstruct};
pub use config::{EnrichConfig, LoginHelperCommand, ScrapeConfig};
pub use crawl_engine::{
    CrawlError, CrawlResult, CrawlState, CrawlSummary, NoOpProgress, ProgressReporter, crawl_impl,
    crawl_threads,
};
pub use enrichment::{
    EnrichSummary, EnrichedRecord, EnrichmentError, EnrichmentPool, GeminiClient, SummaryTriple,
    TextIntelligence, run_enrichment,
};
pub use page_extractor::schema::*;
pub use page_extractor::{PageExtractor, ShredditExtractor};
pub use post_store::{PostRecord, PostStore, StoreError};
pub use session::{LoginHelper, Session, SessionError, SessionManager};

pub async fn crawl(config: ScrapeConfig) -> Result<CrawlSummary, CrawlError> {
    crawl_impl(&config).await
}
