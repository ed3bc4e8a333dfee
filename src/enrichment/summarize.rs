//! Summarization fan-out: one task per post body and per populated comment slot

use log::{debug, warn};
use std::sync::Arc;

use super::parser::{SummaryTriple, parse_summary_response};
use super::pool::{EnrichmentPool, run_bounded};
use super::prompts::{comment_summary_prompt, post_summary_prompt};
use super::record::EnrichedRecord;
use crate::post_store::PostRecord;
use crate::utils::{COMMENT_SLOTS, SUMMARY_LOG_INTERVAL};

/// Which text of a record a summary belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Post,
    /// Zero-based comment slot
    Comment(usize),
}

struct SummaryJob {
    record: usize,
    field: SummaryField,
    prompt: String,
}

/// Prompts for every field of `record` that warrants a model call
///
/// Empty slots and comments with a blank body get no job and keep the
/// sentinel.
fn jobs_for(index: usize, record: &PostRecord) -> Vec<SummaryJob> {
    let mut jobs = vec![SummaryJob {
        record: index,
        field: SummaryField::Post,
        prompt: post_summary_prompt(record),
    }];

    for slot in 0..COMMENT_SLOTS {
        if let Some(comment) = record.comments.get(slot)
            && !comment.body.trim().is_empty()
        {
            jobs.push(SummaryJob {
                record: index,
                field: SummaryField::Comment(slot),
                prompt: comment_summary_prompt(&comment.body),
            });
        }
    }
    jobs
}

impl EnrichmentPool {
    /// Summarize every record's post body and comment slots
    ///
    /// Fields are independent tasks; a failed task leaves only its own field at
    /// the sentinel. Output keeps input order.
    pub async fn run_summarization(&self, records: Vec<PostRecord>) -> Vec<EnrichedRecord> {
        let jobs: Vec<SummaryJob> = records
            .iter()
            .enumerate()
            .flat_map(|(index, record)| jobs_for(index, record))
            .collect();
        let targets: Vec<(usize, SummaryField)> = jobs.iter().map(|job| (job.record, job.field)).collect();
        debug!("Dispatching {} summary tasks for {} posts", jobs.len(), records.len());

        let triples = run_bounded(
            jobs,
            self.summary_workers,
            &self.counter,
            "Summaries",
            SUMMARY_LOG_INTERVAL,
            |job| {
                let client = Arc::clone(&self.client);
                async move {
                    match client.generate(&job.prompt).await {
                        Ok(text) => {
                            let triple = parse_summary_response(&text);
                            if triple.is_sentinel() {
                                debug!("Unusable summary response for record {} {:?}", job.record, job.field);
                            }
                            triple
                        }
                        Err(e) => {
                            warn!("Summary task failed for record {} {:?}: {e}", job.record, job.field);
                            SummaryTriple::sentinel()
                        }
                    }
                }
            },
        )
        .await;

        let mut enriched: Vec<EnrichedRecord> = records.into_iter().map(EnrichedRecord::pending).collect();
        for ((record, field), triple) in targets.into_iter().zip(triples) {
            let Some(target) = enriched.get_mut(record) else {
                continue;
            };
            match field {
                SummaryField::Post => target.post_summary = triple,
                SummaryField::Comment(slot) => {
                    if let Some(summary) = target.comment_summary_mut(slot) {
                        *summary = triple;
                    }
                }
            }
        }
        enriched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_extractor::{CommentRecord, PostSummary};
    use crate::post_store::CommentSlots;

    #[test]
    fn blank_and_missing_slots_get_no_job() {
        let mut record = PostRecord::from(PostSummary {
            title: "t".into(),
            url: "u".into(),
            subreddit: "r/a".into(),
            timestamp: "ts".into(),
            vote_count: 1,
            comment_count: 2,
        });
        let comment = |body: &str| CommentRecord {
            id: "c".into(),
            body: body.into(),
            ..CommentRecord::default()
        };
        record.comments = CommentSlots {
            comment_1: Some(comment("first")),
            comment_2: Some(comment("   ")),
            comment_3: None,
            comment_4: Some(comment("fourth")),
            comment_5: None,
        };

        let fields: Vec<SummaryField> = jobs_for(0, &record).into_iter().map(|job| job.field).collect();
        assert_eq!(
            fields,
            vec![SummaryField::Post, SummaryField::Comment(0), SummaryField::Comment(3)]
        );
    }
}
