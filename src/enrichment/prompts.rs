//! Prompt construction for the text-intelligence service

use crate::post_store::PostRecord;

const TRIPLE_INSTRUCTIONS: &str = "Reply with three items separated by '|' (pipe symbol):\n\
1. The overall sentiment as a single word (e.g. Positive, Negative, Neutral, Angry, Hopeful).\n\
2. Any misinformation, described in at most 15 words, or 'None'.\n\
3. A very short summary in at most 15 words.\n\
Format: sentiment|misinformation|summary";

#[must_use]
pub fn relevance_prompt(title: &str, keywords: &[String]) -> String {
    format!(
        "Is this post title '{title}' related to any of the topics of these keywords: {}? Answer yes or no.",
        keywords.join(", ")
    )
}

#[must_use]
pub fn post_summary_prompt(record: &PostRecord) -> String {
    let count = |value: Option<i64>| value.map_or_else(|| "unknown".to_string(), |v| v.to_string());
    format!(
        "Given the following discussion post:\n\
         Title: {}\n\
         Upvotes: {}\n\
         Total Comments: {}\n\
         Body: {}\n\n\
         {TRIPLE_INSTRUCTIONS}",
        record.title,
        count(record.vote_count),
        count(record.comment_count),
        record.body.as_deref().unwrap_or("None"),
    )
}

#[must_use]
pub fn comment_summary_prompt(body: &str) -> String {
    format!("Given the following comment:\nComment: {body}\n\n{TRIPLE_INSTRUCTIONS}")
}
