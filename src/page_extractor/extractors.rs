//! Markup extraction for the platform's server-rendered pages
//!
//! Selectors are parsed once and cached. Every function here is pure: raw page
//! content in, structured records out.

use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::utils::is_valid_url;

use super::schema::{CommentPage, CommentRecord, PostDetail, PostSummary, RawPostSummary};
use super::{ExtractionError, PageExtractor};

static SEARCH_POST_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"search-telemetry-tracker[data-testid="search-sdui-post"]"#)
        .expect("BUG: hardcoded search post selector is invalid")
});

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[data-testid="post-title"]"#)
        .expect("BUG: hardcoded post title selector is invalid")
});

static TITLE_TEXT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"a[data-testid="post-title-text"]"#)
        .expect("BUG: hardcoded post title text selector is invalid")
});

static SUBREDDIT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span.truncate").expect("BUG: hardcoded CSS selector 'span.truncate' is invalid")
});

static TIMEAGO_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("faceplate-timeago")
        .expect("BUG: hardcoded CSS selector 'faceplate-timeago' is invalid")
});

static SPAN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("span").expect("BUG: hardcoded CSS selector 'span' is invalid")
});

static COUNTER_ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[data-testid="search-counter-row"]"#)
        .expect("BUG: hardcoded counter row selector is invalid")
});

static NUMBER_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("faceplate-number[number]")
        .expect("BUG: hardcoded CSS selector 'faceplate-number[number]' is invalid")
});

static SHREDDIT_POST_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("shreddit-post").expect("BUG: hardcoded CSS selector 'shreddit-post' is invalid")
});

static TEXT_BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div.text-neutral-content[slot="text-body"]"#)
        .expect("BUG: hardcoded text body selector is invalid")
});

static MD_CONTENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.md.text-14-scalable")
        .expect("BUG: hardcoded CSS selector 'div.md.text-14-scalable' is invalid")
});

static COMMENT_TREE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("shreddit-comment-tree")
        .expect("BUG: hardcoded CSS selector 'shreddit-comment-tree' is invalid")
});

static COMMENT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("shreddit-comment").expect("BUG: hardcoded CSS selector 'shreddit-comment' is invalid")
});

static COMMENT_TEXT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.scalable-text").expect("BUG: hardcoded CSS selector 'div.scalable-text' is invalid")
});

static COMMENT_RTJSON_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"div[id*="post-rtjson-content"]"#)
        .expect("BUG: hardcoded rtjson content selector is invalid")
});

static CURSOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"src="[^"]*cursor=([^"&]*)"#).expect("BUG: hardcoded cursor regex is invalid")
});

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d,]*)").expect("BUG: hardcoded digits regex is invalid"));

static AGO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ago$").expect("BUG: hardcoded 'ago' regex is invalid"));

/// Collapse the text nodes of an element into one whitespace-normalised string
fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty_attr(element: &ElementRef, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Count from a counter span: exact `faceplate-number` value, else digits in the text
fn span_count(span: &ElementRef) -> Option<i64> {
    if let Some(number) = span.select(&NUMBER_SELECTOR).next()
        && let Some(value) = number.value().attr("number")
        && let Ok(parsed) = value.trim().replace(',', "").parse::<i64>()
    {
        return Some(parsed);
    }

    let text = element_text(span);
    DIGITS_RE
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse::<i64>().ok())
}

/// Integer attribute that falls back to 0 when present but unparseable
fn lenient_int_attr(element: &ElementRef, name: &str) -> Option<i64> {
    element
        .value()
        .attr(name)
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().parse::<i64>().unwrap_or(0))
}

/// HTML extractor for the platform's `shreddit` server-rendered markup
#[derive(Debug, Clone)]
pub struct ShredditExtractor {
    base_url: String,
}

impl ShredditExtractor {
    /// `base_url` is prefixed to relative post links
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn absolute_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}{href}", self.base_url)
        }
    }

    fn raw_summary(&self, post: &ElementRef) -> RawPostSummary {
        let mut raw = RawPostSummary::default();

        let title_tag = post
            .select(&TITLE_SELECTOR)
            .next()
            .or_else(|| post.select(&TITLE_TEXT_SELECTOR).next());
        if let Some(tag) = title_tag {
            raw.title = non_empty_attr(&tag, "aria-label").or_else(|| Some(element_text(&tag)));
            raw.url = tag
                .value()
                .attr("href")
                .map(|href| self.absolute_url(href))
                .filter(|url| is_valid_url(url));
        }

        raw.subreddit = post.select(&SUBREDDIT_SELECTOR).next().map(|s| element_text(&s));

        raw.timestamp = match post.select(&TIMEAGO_SELECTOR).next() {
            Some(timeago) => {
                non_empty_attr(&timeago, "ts").or_else(|| non_empty_attr(&timeago, "title"))
            }
            None => post
                .select(&SPAN_SELECTOR)
                .map(|span| element_text(&span))
                .find(|text| AGO_RE.is_match(text)),
        };

        if let Some(row) = post.select(&COUNTER_ROW_SELECTOR).next() {
            let spans: Vec<ElementRef> = row.select(&SPAN_SELECTOR).collect();
            raw.vote_count = spans.first().and_then(span_count);
            raw.comment_count = spans.get(2).and_then(span_count);
        }

        raw
    }

    fn comment_record(element: &ElementRef) -> Option<CommentRecord> {
        let attr = |name: &str| element.value().attr(name).unwrap_or_default().to_string();

        let score = match element.value().attr("score") {
            Some(v) => v.trim().parse::<i64>().ok()?,
            None => 0,
        };
        let depth = match element.value().attr("depth") {
            Some(v) => v.trim().parse::<u32>().ok()?,
            None => 0,
        };

        let body = element
            .select(&COMMENT_TEXT_SELECTOR)
            .next()
            .map(|div| element_text(&div))
            .filter(|text| !text.is_empty())
            .or_else(|| {
                element
                    .select(&COMMENT_RTJSON_SELECTOR)
                    .next()
                    .map(|div| element_text(&div))
            })
            .unwrap_or_default();

        Some(CommentRecord {
            id: attr("thingid"),
            parent_id: attr("parentid"),
            depth,
            score,
            permalink: attr("permalink"),
            body,
            replies: Vec::new(),
        })
    }
}

impl PageExtractor for ShredditExtractor {
    fn extract_search_results(&self, content: &str) -> Vec<PostSummary> {
        let document = Html::parse_document(content);
        let mut posts = Vec::new();
        let mut dropped = 0usize;

        for post in document.select(&SEARCH_POST_SELECTOR) {
            match self.raw_summary(&post).into_complete() {
                Some(summary) => posts.push(summary),
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!("Dropped {dropped} search results with missing required fields");
        }
        posts
    }

    fn extract_cursor_token(&self, content: &str) -> Option<String> {
        CURSOR_RE
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|token| !token.is_empty())
    }

    fn extract_post_detail(&self, content: &str) -> Result<PostDetail, ExtractionError> {
        let document = Html::parse_document(content);
        let mut detail = PostDetail::default();

        let post = document.select(&SHREDDIT_POST_SELECTOR).next();
        if let Some(post) = &post {
            detail.vote_count = lenient_int_attr(post, "score");
            detail.comment_count = lenient_int_attr(post, "comment-count");
        }

        detail.body = document
            .select(&TEXT_BODY_SELECTOR)
            .next()
            .and_then(|slot| slot.select(&MD_CONTENT_SELECTOR).next())
            .map(|div| element_text(&div))
            .filter(|body| !body.is_empty());

        if post.is_none() && detail.body.is_none() {
            return Err(ExtractionError::ExtractionIncomplete(
                "no post element or body found".to_string(),
            ));
        }
        Ok(detail)
    }

    fn extract_comment_forest(&self, content: &str) -> CommentPage {
        let document = Html::parse_document(content);
        let Some(tree) = document.select(&COMMENT_TREE_SELECTOR).next() else {
            return CommentPage::default();
        };

        // Attribute names are lower-cased by the HTML parser.
        let total_count = tree
            .value()
            .attr("totalcomments")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(0);

        let comments: Vec<CommentRecord> = tree
            .select(&COMMENT_SELECTOR)
            .filter_map(|element| {
                let record = Self::comment_record(&element);
                if record.is_none() {
                    debug!("Skipping comment with malformed score/depth attributes");
                }
                record
            })
            .collect();

        CommentPage {
            total_count,
            comments,
        }
    }
}
