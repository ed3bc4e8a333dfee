//! Single post processing logic
//!
//! Handles the lifecycle of one newly discovered post:
//! - Detail page fetch and merge
//! - Comment endpoint fetch and tree reconstruction
//! - Hand-off to the store writer
//!
//! Failures stay inside the post: whatever was obtained is persisted.

use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::Ordering;

use super::context::CrawlContext;
use super::crawl_types::CrawlState;
use crate::comment_tree::reconstruct;
use crate::page_extractor::PostSummary;
use crate::post_store::PostRecord;
use crate::utils::comment_endpoint_url;

/// How far a post got before it was persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    /// Detail merged and comments attached
    Complete,
    /// Persisted with some fields missing
    Partial,
}

/// Fetch detail and comments for one post, then persist it
pub async fn process_post(ctx: Arc<CrawlContext>, summary: PostSummary) -> PostOutcome {
    let mut record = PostRecord::from(summary);
    let outcome = enrich_record(&ctx, &mut record).await;

    if outcome == PostOutcome::Partial {
        ctx.counters.partial.fetch_add(1, Ordering::Relaxed);
    }
    ctx.persist(record).await;
    outcome
}

async fn enrich_record(ctx: &CrawlContext, record: &mut PostRecord) -> PostOutcome {
    ctx.progress.report_state(CrawlState::FetchingPostDetail);
    let detail_page = match ctx.client.fetch(&record.url).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Post detail fetch failed for {}: {e}", record.url);
            ctx.progress.report_post_failed(&record.url, &e.to_string());
            return PostOutcome::Partial;
        }
    };

    let mut complete = true;
    match ctx.extractor.extract_post_detail(&detail_page) {
        Ok(detail) => record.apply_detail(detail),
        Err(e) => {
            warn!("{e} for {}", record.url);
            ctx.progress.report_post_failed(&record.url, &e.to_string());
            complete = false;
        }
    }

    ctx.progress.report_state(CrawlState::FetchingComments);
    let Some(endpoint) = comment_endpoint_url(&ctx.base_url, &record.url) else {
        warn!("Cannot derive comment endpoint from {}", record.url);
        ctx.progress
            .report_post_failed(&record.url, "post URL has no subreddit/post id segments");
        return PostOutcome::Partial;
    };

    let comments_page = match ctx.client.fetch(&endpoint).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Comment fetch failed for {}: {e}", record.url);
            ctx.progress.report_post_failed(&record.url, &e.to_string());
            return PostOutcome::Partial;
        }
    };

    let page = ctx.extractor.extract_comment_forest(&comments_page);
    let forest = reconstruct(page.comments);
    if forest.orphaned > 0 {
        ctx.counters
            .orphaned_comments
            .fetch_add(forest.orphaned, Ordering::Relaxed);
    }
    debug!(
        "{}: {} root threads, {} comments reachable, {} declared",
        record.url,
        forest.roots.len(),
        forest.reachable_count(),
        page.total_count
    );
    record.attach_comments(forest.roots, page.total_count);

    if complete {
        PostOutcome::Complete
    } else {
        PostOutcome::Partial
    }
}
