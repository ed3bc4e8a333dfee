//! Sequential pagination of one search
//!
//! Pages of a search are strictly ordered: each request needs the cursor token
//! of the page before it. Posts found along the way fan out into their own
//! tasks, which the chain joins before it returns.

use log::{debug, error, warn};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::task::JoinSet;

use super::context::CrawlContext;
use super::crawl_types::SearchCursor;
use super::post_processor::{PostOutcome, process_post};

/// Walk one search URL page by page, scheduling a task per new post
///
/// The first page is requested with the page counter at 0. A page that fails
/// to load ends this search; it never affects other searches.
pub async fn run_search_chain(ctx: Arc<CrawlContext>, search_url: String) {
    let mut cursor = SearchCursor::new(search_url.clone(), ctx.scroll_limit);
    let mut posts: JoinSet<PostOutcome> = JoinSet::new();
    let mut next_page = Some(search_url);

    while let Some(page_url) = next_page.take() {
        let content = match ctx.client.fetch(&page_url).await {
            Ok(content) => content,
            Err(e) => {
                warn!("Search page fetch failed for {page_url}: {e}");
                break;
            }
        };
        ctx.counters.search_pages.fetch_add(1, Ordering::Relaxed);

        let results = ctx.extractor.extract_search_results(&content);
        let found = results.len();
        let mut new_posts = 0usize;
        for summary in results {
            if !ctx.claim_post(&summary.url) {
                continue;
            }
            new_posts += 1;
            posts.spawn(process_post(Arc::clone(&ctx), summary));
        }
        debug!(
            "{page_url}: {found} posts, {new_posts} new (page {})",
            cursor.page()
        );

        let token = ctx.extractor.extract_cursor_token(&content);
        next_page = cursor.advance(token.as_deref());
        if next_page.is_none() && token.is_none() && !cursor.is_exhausted() {
            debug!("No cursor on {page_url}, search ends early");
        }
    }

    ctx.complete_search();

    while let Some(joined) = posts.join_next().await {
        if let Err(e) = joined {
            error!("Post task panicked: {e}");
        }
    }
}
