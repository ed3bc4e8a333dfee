//! Persisted row types
//!
//! One `PostRecord` is one row of the raw store. The five comment slots are
//! fixed columns holding a nested comment thread or nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::page_extractor::{CommentRecord, PostDetail, PostSummary};
use crate::utils::COMMENT_SLOTS;

/// Fixed comment-slot columns, filled by encounter order of root threads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSlots {
    #[serde(default)]
    pub comment_1: Option<CommentRecord>,
    #[serde(default)]
    pub comment_2: Option<CommentRecord>,
    #[serde(default)]
    pub comment_3: Option<CommentRecord>,
    #[serde(default)]
    pub comment_4: Option<CommentRecord>,
    #[serde(default)]
    pub comment_5: Option<CommentRecord>,
}

impl CommentSlots {
    /// Take the first five root threads; the rest are discarded
    #[must_use]
    pub fn from_roots(roots: Vec<CommentRecord>) -> Self {
        let mut threads = roots.into_iter().take(COMMENT_SLOTS);
        Self {
            comment_1: threads.next(),
            comment_2: threads.next(),
            comment_3: threads.next(),
            comment_4: threads.next(),
            comment_5: threads.next(),
        }
    }

    /// Slot by zero-based position
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&CommentRecord> {
        match slot {
            0 => self.comment_1.as_ref(),
            1 => self.comment_2.as_ref(),
            2 => self.comment_3.as_ref(),
            3 => self.comment_4.as_ref(),
            4 => self.comment_5.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn populated(&self) -> usize {
        (0..COMMENT_SLOTS).filter(|&slot| self.get(slot).is_some()).count()
    }
}

/// One collected post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Canonical URL, unique across the store
    pub url: String,
    pub title: String,
    pub subreddit: String,
    pub posted_at: String,
    pub vote_count: Option<i64>,
    pub comment_count: Option<i64>,
    pub body: Option<String>,
    #[serde(flatten)]
    pub comments: CommentSlots,
    /// Stamped once comments have been attached
    pub scraped_at: Option<DateTime<Utc>>,
}

impl From<PostSummary> for PostRecord {
    fn from(summary: PostSummary) -> Self {
        Self {
            url: summary.url,
            title: summary.title,
            subreddit: summary.subreddit,
            posted_at: summary.timestamp,
            vote_count: Some(summary.vote_count),
            comment_count: Some(summary.comment_count),
            body: None,
            comments: CommentSlots::default(),
            scraped_at: None,
        }
    }
}

impl PostRecord {
    /// Merge fields read from the post's own page
    ///
    /// Counts only overwrite when the detail page actually carried them.
    pub fn apply_detail(&mut self, detail: PostDetail) {
        if detail.vote_count.is_some() {
            self.vote_count = detail.vote_count;
        }
        if detail.comment_count.is_some() {
            self.comment_count = detail.comment_count;
        }
        self.body = detail.body;
    }

    /// Attach the first five root threads and stamp completion
    ///
    /// `declared_total` backfills the comment count when no page reported one.
    pub fn attach_comments(&mut self, roots: Vec<CommentRecord>, declared_total: u64) {
        if self.comment_count.is_none() {
            self.comment_count = i64::try_from(declared_total).ok();
        }
        self.comments = CommentSlots::from_roots(roots);
        self.scraped_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(id: &str) -> CommentRecord {
        CommentRecord {
            id: id.to_string(),
            body: id.to_string(),
            ..CommentRecord::default()
        }
    }

    #[test]
    fn slots_keep_first_five_roots() {
        let roots = (1..=7).map(|i| root(&format!("c{i}"))).collect();
        let slots = CommentSlots::from_roots(roots);
        assert_eq!(slots.populated(), 5);
        assert_eq!(slots.get(0).map(|c| c.id.as_str()), Some("c1"));
        assert_eq!(slots.get(4).map(|c| c.id.as_str()), Some("c5"));
        assert!(slots.get(5).is_none());
    }

    #[test]
    fn fewer_roots_leave_slots_empty() {
        let slots = CommentSlots::from_roots(vec![root("only")]);
        assert_eq!(slots.populated(), 1);
        assert!(slots.comment_2.is_none());
    }

    #[test]
    fn row_serializes_flat_comment_columns() {
        let mut record = PostRecord::from(PostSummary {
            title: "t".into(),
            url: "https://x/r/a/comments/1/t/".into(),
            subreddit: "r/a".into(),
            timestamp: "2025-01-01".into(),
            vote_count: 3,
            comment_count: 4,
        });
        record.attach_comments(vec![root("c1")], 9);

        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("comment_1").is_some_and(|c| c.is_object()));
        assert!(value.get("comment_5").is_some_and(|c| c.is_null()));

        let back: PostRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn declared_total_only_backfills_missing_count() {
        let mut record = PostRecord::from(PostSummary {
            title: "t".into(),
            url: "u".into(),
            subreddit: "r/a".into(),
            timestamp: "ts".into(),
            vote_count: 1,
            comment_count: 4,
        });
        record.attach_comments(Vec::new(), 12);
        assert_eq!(record.comment_count, Some(4));
        assert!(record.scraped_at.is_some());

        record.comment_count = None;
        record.attach_comments(Vec::new(), 12);
        assert_eq!(record.comment_count, Some(12));
    }
}
