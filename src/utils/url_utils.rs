//! URL construction utilities.
//!
//! Every request the crawler issues is derived here from the configured
//! platform origin, so the orchestrator never concatenates URLs by hand.

use url::Url;

use super::constants::COMMENT_ENDPOINT_QUERY;

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// Profile page used to probe whether the session is authenticated
#[must_use]
pub fn profile_url(base_url: &str, username: &str) -> String {
    format!("{}/user/{username}/", trim_base(base_url))
}

/// Build the full search URL set as the cartesian product keywords × filters
///
/// Keywords are percent-encoded; filters are appended verbatim. Order is
/// keyword-major, matching the order the searches are scheduled in.
#[must_use]
pub fn build_search_urls(base_url: &str, keywords: &[String], filters: &[String]) -> Vec<String> {
    let base = trim_base(base_url);
    let mut urls = Vec::with_capacity(keywords.len() * filters.len());
    for keyword in keywords {
        let encoded = urlencoding::encode(keyword);
        for filter in filters {
            urls.push(format!("{base}/search/?q={encoded}{filter}"));
        }
    }
    urls
}

/// URL of the next search page
///
/// The cursor is always appended to the original search URL, never to the
/// previous page URL, so exactly one `cursor` parameter is present.
#[must_use]
pub fn next_page_url(search_url: &str, cursor: &str) -> String {
    format!("{search_url}&cursor={cursor}")
}

/// Split a post URL path `/r/<subreddit>/comments/<post_id>/...` into
/// `(subreddit, post_id)`
#[must_use]
pub fn post_path_parts(post_url: &str) -> Option<(String, String)> {
    let parsed = Url::parse(post_url).ok()?;
    let parts: Vec<&str> = parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .collect();

    if parts.len() < 4 {
        return None;
    }

    let subreddit = parts[1];
    let post_id = parts[3];
    if subreddit.is_empty() || post_id.is_empty() {
        return None;
    }
    Some((subreddit.to_string(), post_id.to_string()))
}

/// Derive the comment endpoint for a post from its URL path segments
#[must_use]
pub fn comment_endpoint_url(base_url: &str, post_url: &str) -> Option<String> {
    let (subreddit, post_id) = post_path_parts(post_url)?;
    Some(format!(
        "{}/svc/shreddit/comments/r/{subreddit}/t3_{post_id}?{COMMENT_ENDPOINT_QUERY}",
        trim_base(base_url)
    ))
}

/// Host (with port, if any) of a URL, used as the per-host limiter key
#[must_use]
pub fn extract_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Split a comma-separated keyword list, trimming entries and dropping empties
#[must_use]
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Check if a URL is valid
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_urls_are_keyword_major_product() {
        let keywords = vec!["digital rupee".to_string(), "cbdc".to_string()];
        let filters = vec!["&sort=hot".to_string(), "&sort=new".to_string()];
        let urls = build_search_urls("https://www.reddit.com/", &keywords, &filters);

        assert_eq!(
            urls,
            vec![
                "https://www.reddit.com/search/?q=digital%20rupee&sort=hot",
                "https://www.reddit.com/search/?q=digital%20rupee&sort=new",
                "https://www.reddit.com/search/?q=cbdc&sort=hot",
                "https://www.reddit.com/search/?q=cbdc&sort=new",
            ]
        );
    }

    #[test]
    fn comment_endpoint_from_post_path() {
        let url = comment_endpoint_url(
            "https://www.reddit.com",
            "https://www.reddit.com/r/india/comments/abc123/some_title/",
        );
        assert_eq!(
            url.as_deref(),
            Some(
                "https://www.reddit.com/svc/shreddit/comments/r/india/t3_abc123?render-mode=partial&seeker-session=true&sort=confidence&inline-refresh=true"
            )
        );
    }

    #[test]
    fn comment_endpoint_rejects_short_paths() {
        assert!(comment_endpoint_url("https://www.reddit.com", "https://www.reddit.com/r/india/").is_none());
        assert!(comment_endpoint_url("https://www.reddit.com", "not a url").is_none());
    }

    #[test]
    fn host_includes_port() {
        assert_eq!(extract_host("http://127.0.0.1:1234/x").as_deref(), Some("127.0.0.1:1234"));
        assert_eq!(extract_host("https://www.reddit.com/r/x").as_deref(), Some("www.reddit.com"));
    }

    #[test]
    fn keywords_are_trimmed_and_filtered() {
        assert_eq!(parse_keywords(" a, b ,,c "), vec!["a", "b", "c"]);
        assert!(parse_keywords("").is_empty());
    }

    #[test]
    fn only_http_urls_are_valid() {
        assert!(is_valid_url("https://www.reddit.com/r/india/comments/abc/x/"));
        assert!(!is_valid_url("javascript:void(0)"));
        assert!(!is_valid_url("ftp://host/file"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn next_page_appends_cursor() {
        assert_eq!(next_page_url("https://x/search/?q=a", "tok"), "https://x/search/?q=a&cursor=tok");
    }
}
