//! Text-intelligence collaborator
//!
//! `TextIntelligence` is the seam the pool calls through; `GeminiClient` talks
//! to the Generative Language REST API.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use super::EnrichmentError;
use crate::config::EnrichConfig;

/// Prompt in, free text out
#[async_trait]
pub trait TextIntelligence: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, EnrichmentError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

/// Thinking disabled: answers are short classifications
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &EnrichConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    async fn generate_inner(&self, prompt: &str) -> Result<Option<String>> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.api_base, self.model);
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        debug!("generateContent request to {}", self.model);
        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("generateContent request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("Model API error ({status}): {error_text}"));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .context("Malformed generateContent response")?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Some(text).filter(|t| !t.trim().is_empty()))
    }
}

#[async_trait]
impl TextIntelligence for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, EnrichmentError> {
        match self.generate_inner(prompt).await {
            Ok(Some(text)) => Ok(text),
            Ok(None) => Err(EnrichmentError::EmptyResponse),
            Err(e)
                if e.downcast_ref::<reqwest::Error>()
                    .is_some_and(reqwest::Error::is_decode) =>
            {
                Err(EnrichmentError::EnrichmentTaskFailed(format!("{e:#}")))
            }
            Err(e) => Err(EnrichmentError::Http(format!("{e:#}"))),
        }
    }
}
