use serde::{Deserialize, Serialize};

/// One post as listed on a search results page, with every required field present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub title: String,
    /// Canonical post URL, the dedup key
    pub url: String,
    pub subreddit: String,
    pub timestamp: String,
    pub vote_count: i64,
    pub comment_count: i64,
}

/// Search result fields as found in the markup, before the completeness check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPostSummary {
    pub title: Option<String>,
    pub url: Option<String>,
    pub subreddit: Option<String>,
    pub timestamp: Option<String>,
    pub vote_count: Option<i64>,
    pub comment_count: Option<i64>,
}

impl RawPostSummary {
    /// Promote to a `PostSummary` only if every required field is present and non-empty
    #[must_use]
    pub fn into_complete(self) -> Option<PostSummary> {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Some(PostSummary {
            title: non_empty(self.title)?,
            url: non_empty(self.url)?,
            subreddit: non_empty(self.subreddit)?,
            timestamp: non_empty(self.timestamp)?,
            vote_count: self.vote_count?,
            comment_count: self.comment_count?,
        })
    }
}

/// Fields read from a post's own page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    pub vote_count: Option<i64>,
    pub comment_count: Option<i64>,
    pub body: Option<String>,
}

/// A single comment, flat as extracted or nested after reconstruction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Unique within a post
    pub id: String,
    /// Empty for root comments
    #[serde(default)]
    pub parent_id: String,
    /// 0 = root
    pub depth: u32,
    pub score: i64,
    #[serde(default)]
    pub permalink: String,
    pub body: String,
    /// Populated only by the comment tree reconstructor
    #[serde(default)]
    pub replies: Vec<CommentRecord>,
}

impl CommentRecord {
    /// Number of records in this subtree, including `self`
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.replies.iter().map(CommentRecord::subtree_len).sum::<usize>()
    }
}

/// Flat comment listing of a post plus the platform's declared total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPage {
    pub total_count: u64,
    pub comments: Vec<CommentRecord>,
}
