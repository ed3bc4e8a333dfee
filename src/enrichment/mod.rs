//! Enrichment of a raw post store
//!
//! Two phases over the persisted records, each on its own bounded worker pool:
//! a relevance check per post title, then a summary per post body and per
//! populated comment slot. The raw store is only read; results go to a new
//! JSON Lines file.

pub mod client;
pub mod parser;
pub mod pool;
pub mod prompts;
pub mod record;
pub mod relevance;
pub mod summarize;

use anyhow::{Context, Result, anyhow};
use log::info;
use std::time::Instant;
use thiserror::Error;

pub use client::{GeminiClient, TextIntelligence};
pub use parser::{SummaryTriple, parse_summary_response};
pub use pool::{EnrichmentPool, TaskCounter, run_bounded};
pub use record::EnrichedRecord;
pub use relevance::is_affirmative;
pub use summarize::SummaryField;

use crate::config::EnrichConfig;
use crate::post_store::{load_records, write_json_lines};

/// Per-task failure; absorbed as "not relevant" or a sentinel triple
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichmentError {
    #[error("Enrichment task failed: {0}")]
    EnrichmentTaskFailed(String),

    #[error("Text-intelligence request failed: {0}")]
    Http(String),

    #[error("Text-intelligence response had no text")]
    EmptyResponse,
}

/// Totals for one enrichment run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    pub loaded: usize,
    pub relevant: usize,
    pub tasks: usize,
}

/// Filter and summarize `config.input_file` into `config.output_file`
pub async fn run_enrichment(config: &EnrichConfig, pool: &EnrichmentPool) -> Result<EnrichSummary> {
    config.validate()?;
    if !tokio::fs::try_exists(&config.input_file).await.unwrap_or(false) {
        return Err(anyhow!(
            "Input file {} does not exist",
            config.input_file.display()
        ));
    }

    let records = load_records(&config.input_file)
        .await
        .with_context(|| format!("Failed to load {}", config.input_file.display()))?;
    let loaded = records.len();
    info!("Loaded {loaded} posts from {}", config.input_file.display());

    info!("Starting relevance checking for {loaded} posts...");
    let start_time = Instant::now();
    let relevant = pool.run_relevance_filter(records, &config.keywords).await;
    info!(
        "Filtered {loaded} posts to {} relevant posts (Time: {:.2}s)",
        relevant.len(),
        start_time.elapsed().as_secs_f64()
    );

    info!("Starting summary generation for {} posts...", relevant.len());
    let start_time = Instant::now();
    let enriched = pool.run_summarization(relevant).await;
    info!(
        "Completed summary generation for all {} posts! (Total time: {:.2}s)",
        enriched.len(),
        start_time.elapsed().as_secs_f64()
    );

    let summary = EnrichSummary {
        loaded,
        relevant: enriched.len(),
        tasks: pool.completed_tasks(),
    };
    write_json_lines(&config.output_file, enriched)
        .await
        .with_context(|| format!("Failed to write {}", config.output_file.display()))?;
    info!("Wrote enriched posts to {}", config.output_file.display());

    Ok(summary)
}
