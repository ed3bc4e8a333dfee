//! Configuration for the enrichment stage

use anyhow::{Result, anyhow};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::utils::{
    DEFAULT_MODEL, DEFAULT_MODEL_API_BASE, DEFAULT_MODEL_TIMEOUT_SECS, DEFAULT_RELEVANCE_WORKERS,
    DEFAULT_SUMMARY_WORKERS, MODEL_API_KEY_ENV,
};

/// Settings for relevance filtering and summarization of a raw post store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub keywords: Vec<String>,

    /// Worker pool size for relevance checks
    pub relevance_workers: usize,

    /// Worker pool size for summary tasks
    pub summary_workers: usize,

    pub model: String,
    pub api_base: String,

    #[serde(skip_serializing, default)]
    pub api_key: String,

    /// Best-effort timeout applied to each external call
    pub timeout_secs: u64,
}

impl EnrichConfig {
    #[must_use]
    pub fn new(input_file: impl Into<PathBuf>, output_file: impl Into<PathBuf>, keywords: Vec<String>) -> Self {
        Self {
            input_file: input_file.into(),
            output_file: output_file.into(),
            keywords,
            relevance_workers: DEFAULT_RELEVANCE_WORKERS,
            summary_workers: DEFAULT_SUMMARY_WORKERS,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_MODEL_API_BASE.to_string(),
            api_key: String::new(),
            timeout_secs: DEFAULT_MODEL_TIMEOUT_SECS,
        }
    }

    /// Fill the API key from the environment (after loading `.env` if present)
    pub fn with_api_key_from_env(mut self) -> Result<Self> {
        report_env_file(dotenvy::dotenv());
        self.api_key = std::env::var(MODEL_API_KEY_ENV)
            .map_err(|_| anyhow!("{MODEL_API_KEY_ENV} is not set"))?;
        Ok(self)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            return Err(anyhow!("at least one relevance keyword is required"));
        }
        if self.relevance_workers == 0 || self.summary_workers == 0 {
            return Err(anyhow!("worker pool sizes must be greater than zero"));
        }
        Ok(())
    }
}

/// Log the outcome of loading a `.env` file; a missing file is not an error
fn report_env_file<T>(result: dotenvy::Result<T>) -> bool {
    match result {
        Ok(_) => {
            debug!("Loaded environment from .env");
            true
        }
        Err(e) if e.not_found() => false,
        Err(e) => {
            warn!("Ignoring unreadable .env file: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn env_file_outcomes() {
        let dir = TempDir::new().unwrap();
        assert!(!report_env_file(dotenvy::from_path(dir.path().join("absent.env"))));

        let broken = dir.path().join("broken.env");
        std::fs::write(&broken, "THREADSCRAPE BROKEN LINE\n").unwrap();
        let err = dotenvy::from_path(&broken).unwrap_err();
        assert!(!err.not_found());
        assert!(!report_env_file::<()>(Err(err)));

        let valid = dir.path().join("valid.env");
        std::fs::write(&valid, "THREADSCRAPE_ENV_FILE_TEST=1\n").unwrap();
        assert!(report_env_file(dotenvy::from_path(&valid)));
        assert_eq!(std::env::var("THREADSCRAPE_ENV_FILE_TEST").as_deref(), Ok("1"));
    }
}
