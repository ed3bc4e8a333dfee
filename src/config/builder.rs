//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! This module provides a fluent builder interface with compile-time validation
//! ensuring that credentials and keywords are set before building a `ScrapeConfig`.

use anyhow::{Result, anyhow};
use std::marker::PhantomData;
use std::path::PathBuf;
use url::Url;

use super::types::{LoginHelperCommand, ScrapeConfig};

// Type states for the builder
pub struct WithCredentials;
pub struct Complete;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) config: ScrapeConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            config: ScrapeConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    ///
    /// # Example
    /// ```rust
    /// # use kodegen_tools_threadscrape::config::ScrapeConfig;
    /// # fn main() -> anyhow::Result<()> {
    /// let config = ScrapeConfig::builder()
    ///     .credentials("someone", "hunter2")
    ///     .keywords(vec!["digital rupee".to_string()])
    ///     .scroll_limit(5)
    ///     .build()?;
    /// assert_eq!(config.search_urls().len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl<State> ScrapeConfigBuilder<State> {
    fn transition<Next>(self) -> ScrapeConfigBuilder<Next> {
        ScrapeConfigBuilder {
            config: self.config,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> ScrapeConfigBuilder<WithCredentials> {
        self.config.username = username.into();
        self.config.password = password.into();
        self.transition()
    }
}

impl ScrapeConfigBuilder<WithCredentials> {
    pub fn keywords(mut self, keywords: Vec<String>) -> ScrapeConfigBuilder<Complete> {
        self.config.keywords = keywords;
        self.transition()
    }
}

impl ScrapeConfigBuilder<Complete> {
    pub fn build(self) -> Result<ScrapeConfig> {
        let mut config = self.config;

        if config.username.trim().is_empty() {
            return Err(anyhow!("username must not be empty"));
        }
        config.keywords.retain(|keyword| !keyword.trim().is_empty());
        if config.keywords.is_empty() {
            return Err(anyhow!("at least one search keyword is required"));
        }
        if config.search_filters.is_empty() {
            return Err(anyhow!("at least one search filter is required"));
        }
        if config.max_concurrent_requests == 0 || config.max_concurrent_per_host == 0 {
            return Err(anyhow!("concurrency limits must be greater than zero"));
        }
        if config.flush_batch_size == 0 {
            return Err(anyhow!("flush_batch_size must be greater than zero"));
        }

        let base = Url::parse(&config.base_url)
            .map_err(|e| anyhow!("Invalid base URL '{}': {e}", config.base_url))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(anyhow!("base URL must be http(s): {}", config.base_url));
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(config)
    }
}

// Builder methods available at any state (all of these are optional)
impl<State> ScrapeConfigBuilder<State> {
    #[must_use]
    pub fn session_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.session_dir = dir.into();
        self
    }

    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn login_helper(mut self, helper: LoginHelperCommand) -> Self {
        self.config.login_helper = helper;
        self
    }
}
