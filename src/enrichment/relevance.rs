//! Relevance filtering of post titles

use log::warn;
use std::sync::Arc;

use super::pool::{EnrichmentPool, run_bounded};
use super::prompts::relevance_prompt;
use crate::post_store::PostRecord;
use crate::utils::RELEVANCE_LOG_INTERVAL;

/// A "yes" anywhere in the answer, case-insensitively
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    answer.to_lowercase().contains("yes")
}

impl EnrichmentPool {
    /// Keep the records whose title the model relates to the keywords
    ///
    /// Failed checks count as "not relevant". Output keeps input order.
    pub async fn run_relevance_filter(&self, records: Vec<PostRecord>, keywords: &[String]) -> Vec<PostRecord> {
        let prompts: Vec<(String, String)> = records
            .iter()
            .map(|record| (record.url.clone(), relevance_prompt(&record.title, keywords)))
            .collect();

        let verdicts = run_bounded(
            prompts,
            self.relevance_workers,
            &self.counter,
            "Relevance",
            RELEVANCE_LOG_INTERVAL,
            |(url, prompt)| {
                let client = Arc::clone(&self.client);
                async move {
                    match client.generate(&prompt).await {
                        Ok(answer) => is_affirmative(&answer),
                        Err(e) => {
                            warn!("Relevance check failed for {url}: {e}");
                            false
                        }
                    }
                }
            },
        )
        .await;

        records
            .into_iter()
            .zip(verdicts)
            .filter_map(|(record, relevant)| relevant.then_some(record))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affirmative_is_case_insensitive_substring() {
        assert!(is_affirmative("Yes."));
        assert!(is_affirmative("  YES, it is related"));
        assert!(!is_affirmative("No"));
        assert!(!is_affirmative(""));
    }
}
