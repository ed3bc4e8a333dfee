//! Enriched output rows

use serde::{Deserialize, Serialize};

use super::parser::SummaryTriple;
use crate::post_store::PostRecord;

/// A relevant post with one summary per text field
///
/// Every summary field is always present; failures are sentinel triples.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub post: PostRecord,
    pub post_summary: SummaryTriple,
    pub comment_1_summary: SummaryTriple,
    pub comment_2_summary: SummaryTriple,
    pub comment_3_summary: SummaryTriple,
    pub comment_4_summary: SummaryTriple,
    pub comment_5_summary: SummaryTriple,
}

impl EnrichedRecord {
    /// Start with every field at the sentinel
    #[must_use]
    pub fn pending(post: PostRecord) -> Self {
        Self {
            post,
            post_summary: SummaryTriple::sentinel(),
            comment_1_summary: SummaryTriple::sentinel(),
            comment_2_summary: SummaryTriple::sentinel(),
            comment_3_summary: SummaryTriple::sentinel(),
            comment_4_summary: SummaryTriple::sentinel(),
            comment_5_summary: SummaryTriple::sentinel(),
        }
    }

    /// Comment summary by zero-based slot
    #[must_use]
    pub fn comment_summary(&self, slot: usize) -> Option<&SummaryTriple> {
        match slot {
            0 => Some(&self.comment_1_summary),
            1 => Some(&self.comment_2_summary),
            2 => Some(&self.comment_3_summary),
            3 => Some(&self.comment_4_summary),
            4 => Some(&self.comment_5_summary),
            _ => None,
        }
    }

    pub(crate) fn comment_summary_mut(&mut self, slot: usize) -> Option<&mut SummaryTriple> {
        match slot {
            0 => Some(&mut self.comment_1_summary),
            1 => Some(&mut self.comment_2_summary),
            2 => Some(&mut self.comment_3_summary),
            3 => Some(&mut self.comment_4_summary),
            4 => Some(&mut self.comment_5_summary),
            _ => None,
        }
    }
}
