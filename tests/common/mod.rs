//! Test utilities and helper functions for the threadscrape test suite

use async_trait::async_trait;
use kodegen_tools_threadscrape::config::ScrapeConfig;
use kodegen_tools_threadscrape::session::{LoginHelper, SessionError, SessionManager};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[allow(dead_code)]
pub const USERNAME: &str = "tester";
#[allow(dead_code)]
pub const KEYWORD: &str = "rupee";
#[allow(dead_code)]
pub const HOT_FILTER: &str = "&type=posts&sort=hot";

/// Credential artifact as the login helper would write it
#[allow(dead_code)]
pub fn artifact_json(cookie_value: &str) -> String {
    format!(
        r#"{{"cookies":[{{"name":"reddit_session","value":"{cookie_value}"}},{{"name":"csv","value":"2"}}],"headers":{{}}}}"#
    )
}

/// Login helper that writes an artifact with a numbered cookie per call
///
/// The first call writes `cookie_values[0]`, the second `cookie_values[1]`,
/// and so on; the last value repeats once the list runs out.
pub struct ScriptedLogin {
    cookie_values: Vec<&'static str>,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedLogin {
    pub fn new(cookie_values: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            cookie_values,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LoginHelper for ScriptedLogin {
    async fn login(&self, _username: &str, _password: &str, storage_file: &Path) -> Result<(), SessionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let value = self
            .cookie_values
            .get(call)
            .or(self.cookie_values.last())
            .copied()
            .unwrap_or("none");
        if let Some(parent) = storage_file.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(storage_file, artifact_json(value)).await?;
        Ok(())
    }
}

/// Crawl config pointed at a mock server, one search filter, files under `root`
#[allow(dead_code)]
pub fn test_config(base_url: &str, root: &Path, scroll_limit: u32) -> ScrapeConfig {
    ScrapeConfig::builder()
        .credentials(USERNAME, "secret")
        .keywords(vec![KEYWORD.to_string()])
        .search_filters(vec![HOT_FILTER.to_string()])
        .base_url(base_url)
        .scroll_limit(scroll_limit)
        .session_dir(root.join("sessions"))
        .output_dir(root.join("out"))
        .flush_batch_size(2)
        .build()
        .expect("test config is valid")
}

#[allow(dead_code)]
pub fn session_manager(config: &ScrapeConfig, helper: Arc<ScriptedLogin>) -> SessionManager {
    SessionManager::new(config.username(), config.password(), config.session_file(), helper)
}

/// One search result card
#[allow(dead_code)]
pub fn search_card(post_id: &str, title: &str) -> String {
    format!(
        r#"<search-telemetry-tracker data-testid="search-sdui-post">
  <a data-testid="post-title" aria-label="{title}" href="/r/india/comments/{post_id}/slug/">{title}</a>
  <span class="truncate">r/india</span>
  <faceplate-timeago ts="2025-03-01T10:00:00.000Z"></faceplate-timeago>
  <div data-testid="search-counter-row">
    <span><faceplate-number number="12"></faceplate-number> votes</span>
    <span>·</span>
    <span>3 comments</span>
  </div>
</search-telemetry-tracker>"#
    )
}

/// Search results page; `cursor` adds a continuation partial
#[allow(dead_code)]
pub fn search_page(cards: &[String], cursor: Option<&str>) -> String {
    let partial = cursor
        .map(|token| {
            format!(r#"<faceplate-partial src="/svc/shreddit/search?q=x&cursor={token}"></faceplate-partial>"#)
        })
        .unwrap_or_default();
    format!("<html><body>{}{partial}</body></html>", cards.join("\n"))
}

#[allow(dead_code)]
pub fn post_page(body: &str) -> String {
    format!(
        r#"<html><body><shreddit-post score="40" comment-count="3"></shreddit-post>
<div class="text-neutral-content" slot="text-body"><div class="md text-14-scalable"><p>{body}</p></div></div>
</body></html>"#
    )
}

/// Comment partial: two roots, one reply, one orphan
#[allow(dead_code)]
pub fn comments_page() -> String {
    r#"<shreddit-comment-tree totalComments="4">
  <shreddit-comment thingid="t1_a" depth="0" score="5"><div class="scalable-text">first root</div>
    <shreddit-comment thingid="t1_b" parentid="t1_a" depth="1" score="1"><div class="scalable-text">reply</div></shreddit-comment>
  </shreddit-comment>
  <shreddit-comment thingid="t1_c" depth="0" score="2"><div class="scalable-text">second root</div></shreddit-comment>
  <shreddit-comment thingid="t1_z" parentid="t1_gone" depth="2" score="0"><div class="scalable-text">orphan</div></shreddit-comment>
</shreddit-comment-tree>"#
        .to_string()
}

#[allow(dead_code)]
pub fn profile_page() -> &'static str {
    "<html><body><h1>tester</h1><button>Customize your profile</button></body></html>"
}

/// Number of non-empty lines in a JSON Lines file
#[allow(dead_code)]
pub fn line_count(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|raw| raw.lines().filter(|line| !line.trim().is_empty()).count())
        .unwrap_or(0)
}
