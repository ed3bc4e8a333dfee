//! Main crawl orchestration logic
//!
//! Coordinates one account's crawl run:
//! - Store loading (the initial dedup set)
//! - Session establishment and the login probe, with one re-login
//! - One sequential pagination chain per keyword × filter search
//! - Per-post detail/comment fan-out
//! - Batched persistence and the final flush

use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tokio::task::JoinSet;

use super::client::PlatformClient;
use super::context::CrawlContext;
use super::crawl_types::{CrawlError, CrawlResult, CrawlState, CrawlSummary};
use super::progress::ProgressReporter;
use super::search_chain::run_search_chain;
use super::writer::spawn_store_writer;
use crate::config::ScrapeConfig;
use crate::page_extractor::PageExtractor;
use crate::post_store::PostStore;
use crate::session::{SessionError, SessionManager, SessionSource};

/// Establish a session that passes the login probe
///
/// A failed probe triggers exactly one re-login and a second probe. A second
/// failure, or any attempt to log in again after that, is
/// `AuthenticationExhausted`.
async fn authenticate(
    config: &ScrapeConfig,
    sessions: &SessionManager,
    progress: &dyn ProgressReporter,
) -> CrawlResult<PlatformClient> {
    progress.report_state(CrawlState::Unauthenticated);
    let session = sessions.ensure_session().await?;
    match session.source {
        SessionSource::FreshLogin => info!("Logged in as {}", config.username()),
        SessionSource::Reloaded => info!("Using stored session for {}", config.username()),
    }

    let mut client = PlatformClient::new(config, &session)?;
    let profile_url = config.profile_url();

    progress.report_state(CrawlState::ProbingLogin);
    if client.probe_login(&profile_url).await {
        info!("Login probe succeeded for {}", config.username());
        return Ok(client);
    }

    progress.report_state(CrawlState::RetryingLogin);
    let session = sessions.retry_login_once().await?;
    client.set_session(&session);

    progress.report_state(CrawlState::ProbingLogin);
    if client.probe_login(&profile_url).await {
        info!("Login probe succeeded for {} after re-login", config.username());
        return Ok(client);
    }

    error!("Login failed after retry for {}", config.username());
    Err(SessionError::AuthenticationExhausted.into())
}

/// Run a complete crawl for the configured account
///
/// Only session failures abort the run. Individual search pages and posts that
/// fail are logged and absorbed; affected posts are stored with missing fields.
///
/// # Arguments
/// * `config` - Crawl configuration
/// * `sessions` - Session manager for the configured account
/// * `extractor` - Page extractor for search, post and comment pages
/// * `progress` - Progress reporter (`NoOpProgress` when not needed)
pub async fn crawl_threads(
    config: &ScrapeConfig,
    sessions: &SessionManager,
    extractor: Arc<dyn PageExtractor>,
    progress: Arc<dyn ProgressReporter>,
) -> CrawlResult<CrawlSummary> {
    let start_time = Instant::now();

    let store = Arc::new(PostStore::open(config.store_path()).await?);
    let client = authenticate(config, sessions, progress.as_ref()).await?;

    progress.report_state(CrawlState::Searching);
    let search_urls = config.search_urls();
    let total_searches = search_urls.len();
    info!(
        "Starting {total_searches} searches ({} keywords x {} filters)",
        config.keywords().len(),
        config.search_filters().len()
    );

    let (records_tx, writer) = spawn_store_writer(
        Arc::clone(&store),
        config.flush_batch_size(),
        Arc::clone(client.limiter()),
    );

    let ctx = Arc::new(CrawlContext::new(
        client,
        extractor,
        Arc::clone(&store),
        Arc::clone(&progress),
        config.base_url().to_string(),
        config.scroll_limit(),
        config.progress_log_interval(),
        total_searches,
        records_tx,
    ));

    let mut chains = JoinSet::new();
    for search_url in search_urls {
        chains.spawn(run_search_chain(Arc::clone(&ctx), search_url));
    }
    while let Some(joined) = chains.join_next().await {
        if let Err(e) = joined {
            error!("Search chain panicked: {e}");
        }
    }

    let counters = &ctx.counters;
    let mut summary = CrawlSummary {
        searches: total_searches,
        completed_searches: counters.completed_searches.load(Ordering::Relaxed),
        search_pages: counters.search_pages.load(Ordering::Relaxed),
        posts_discovered: counters.discovered.load(Ordering::Relaxed),
        posts_written: 0,
        posts_partial: counters.partial.load(Ordering::Relaxed),
        orphaned_comments: counters.orphaned_comments.load(Ordering::Relaxed),
        elapsed: start_time.elapsed(),
    };

    // Dropping the last context closes the writer's channel
    drop(ctx);
    summary.posts_written = match writer.await {
        Ok(result) => result?,
        Err(e) => {
            error!("Store writer panicked: {e}");
            return Err(CrawlError::Other(format!("store writer panicked: {e}")));
        }
    };
    summary.elapsed = start_time.elapsed();

    progress.report_state(CrawlState::Completed);
    info!(
        "Crawl finished: {} new posts, {} written ({} partial) across {} search pages of {}/{} searches in {:.1}s",
        summary.posts_discovered,
        summary.posts_written,
        summary.posts_partial,
        summary.search_pages,
        summary.completed_searches,
        summary.searches,
        summary.elapsed.as_secs_f64()
    );
    debug!("{} orphaned comments dropped", summary.orphaned_comments);
    progress.report_completed(&summary);

    Ok(summary)
}
