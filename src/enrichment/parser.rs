//! Parsing of free-text summary responses
//!
//! Expected shape is `sentiment|misinformation|summary`. A response that does
//! not split into three pipe fields is retried as three lines; anything less
//! is the sentinel triple.

use serde::{Deserialize, Serialize};

/// Sentiment, misinformation note and short synopsis for one text
///
/// All-`None` is the sentinel for a failed or unusable result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTriple {
    pub sentiment: Option<String>,
    pub misinformation: Option<String>,
    pub summary: Option<String>,
}

impl SummaryTriple {
    #[must_use]
    pub fn sentinel() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new(sentiment: impl Into<String>, misinformation: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            sentiment: Some(sentiment.into()),
            misinformation: Some(misinformation.into()),
            summary: Some(summary.into()),
        }
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.sentiment.is_none() && self.misinformation.is_none() && self.summary.is_none()
    }
}

fn is_bullet_char(c: char) -> bool {
    matches!(c, '-' | '•' | ' ' | '\n')
}

/// Parse a model response into a triple
///
/// 1. Split on `|`; three or more fields → the first three, trimmed.
/// 2. Otherwise keep non-blank lines with bullet dashes/dots stripped; three
///    or more → the first three.
/// 3. Otherwise the sentinel.
#[must_use]
pub fn parse_summary_response(response: &str) -> SummaryTriple {
    let text = response.trim();

    let parts: Vec<&str> = text.split('|').collect();
    if parts.len() >= 3 {
        return SummaryTriple::new(parts[0].trim(), parts[1].trim(), parts[2].trim());
    }

    let lines: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_matches(is_bullet_char))
        .collect();
    if lines.len() >= 3 {
        return SummaryTriple::new(lines[0], lines[1], lines[2]);
    }

    SummaryTriple::sentinel()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipe_delimited_response() {
        assert_eq!(
            parse_summary_response("Positive|none|short summary"),
            SummaryTriple::new("Positive", "none", "short summary")
        );
    }

    #[test]
    fn extra_pipe_fields_are_ignored_and_trimmed() {
        assert_eq!(
            parse_summary_response("  Angry | claims X | rant about fees | extra\n"),
            SummaryTriple::new("Angry", "claims X", "rant about fees")
        );
    }

    #[test]
    fn three_lines_without_pipes() {
        assert_eq!(
            parse_summary_response("Neutral\nNone\nAsks about launch dates"),
            SummaryTriple::new("Neutral", "None", "Asks about launch dates")
        );
    }

    #[test]
    fn bulleted_lines_are_stripped() {
        assert_eq!(
            parse_summary_response("- Hopeful\n\n• None\n - Expects adoption to grow\n"),
            SummaryTriple::new("Hopeful", "None", "Expects adoption to grow")
        );
    }

    #[test]
    fn two_pipe_fields_fall_back_to_lines() {
        assert_eq!(
            parse_summary_response("Positive|None\nline two\nline three"),
            SummaryTriple::new("Positive|None", "line two", "line three")
        );
    }

    #[test]
    fn single_usable_line_is_sentinel() {
        assert!(parse_summary_response("Positive").is_sentinel());
        assert!(parse_summary_response("Positive\n\n   \n").is_sentinel());
        assert!(parse_summary_response("").is_sentinel());
    }
}
