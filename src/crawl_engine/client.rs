//! Authenticated HTTP access to the platform

use anyhow::Context;
use log::{debug, warn};
use reqwest::header::{COOKIE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::sync::Arc;

use super::crawl_types::{CrawlError, CrawlResult};
use super::host_limiter::HostLimiter;
use crate::config::ScrapeConfig;
use crate::session::Session;
use crate::utils::{CHROME_USER_AGENT, LOGIN_SUCCESS_MARKER};

/// Build request headers from session state
///
/// Header entries the HTTP layer rejects are skipped. A browser user agent is
/// supplied when the session does not carry one.
#[must_use]
pub fn session_headers(session: &Session) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in &session.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => debug!("Skipping invalid session header '{name}'"),
        }
    }

    if !headers.contains_key(USER_AGENT) {
        headers.insert(USER_AGENT, HeaderValue::from_static(CHROME_USER_AGENT));
    }

    if let Some(cookie) = session.cookie_header() {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                headers.insert(COOKIE, value);
            }
            Err(_) => warn!("Session cookie is not a valid header value, sending none"),
        }
    }
    headers
}

/// Platform client carrying the session and the request limits
pub struct PlatformClient {
    http: reqwest::Client,
    headers: HeaderMap,
    limiter: Arc<HostLimiter>,
}

impl PlatformClient {
    pub fn new(config: &ScrapeConfig, session: &Session) -> CrawlResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            headers: session_headers(session),
            limiter: Arc::new(HostLimiter::new(
                config.max_concurrent_requests(),
                config.max_concurrent_per_host(),
            )),
        })
    }

    /// Swap in credentials after a re-login
    pub fn set_session(&mut self, session: &Session) {
        self.headers = session_headers(session);
    }

    #[must_use]
    pub fn limiter(&self) -> &Arc<HostLimiter> {
        &self.limiter
    }

    /// GET `url` and return the body of a successful response
    pub async fn fetch(&self, url: &str) -> CrawlResult<String> {
        let _permit = self.limiter.acquire(url).await?;

        let response = self
            .http
            .get(url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|e| CrawlError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| CrawlError::Network(format!("{url}: failed to read body: {e}")))
    }

    /// Whether the profile page shows the signed-in marker
    pub async fn probe_login(&self, profile_url: &str) -> bool {
        match self.fetch(profile_url).await {
            Ok(body) if body.contains(LOGIN_SUCCESS_MARKER) => true,
            Ok(_) => {
                warn!("Login probe at {profile_url} did not find the signed-in marker");
                false
            }
            Err(e) => {
                warn!("Login probe at {profile_url} failed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionSource;
    use std::collections::BTreeMap;

    fn session(headers: &[(&str, &str)], cookie: Option<&str>) -> Session {
        Session {
            cookies: cookie
                .map(|value| BTreeMap::from([("reddit_session".to_string(), value.to_string())]))
                .unwrap_or_default(),
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            source: SessionSource::Reloaded,
        }
    }

    #[test]
    fn default_user_agent_and_cookie_are_added() {
        let headers = session_headers(&session(&[], Some("abc")));
        assert_eq!(headers.get(USER_AGENT).unwrap(), CHROME_USER_AGENT);
        assert_eq!(headers.get(COOKIE).unwrap(), "reddit_session=abc");
    }

    #[test]
    fn session_headers_win_and_invalid_ones_are_skipped() {
        let headers = session_headers(&session(
            &[("User-Agent", "custom"), ("bad header", "x"), ("accept-language", "en-US")],
            None,
        ));
        assert_eq!(headers.get(USER_AGENT).unwrap(), "custom");
        assert_eq!(headers.get("accept-language").unwrap(), "en-US");
        assert!(headers.get(COOKIE).is_none());
        assert_eq!(headers.len(), 2);
    }
}
