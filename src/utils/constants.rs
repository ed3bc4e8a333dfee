//! Shared configuration constants for threadscrape
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default platform origin
///
/// Every request URL (profile probe, search, post, comment endpoint) is built
/// from this origin so tests can point the crawler at a local mock server.
pub const DEFAULT_BASE_URL: &str = "https://www.reddit.com";

/// Default number of follow-up pages requested per search URL
///
/// The first page is requested with page counter 0; a new page is requested
/// while the counter is below this limit, so one search URL issues at most
/// `DEFAULT_SCROLL_LIMIT + 1` page requests.
pub const DEFAULT_SCROLL_LIMIT: u32 = 40;

/// Search filter variants appended to every keyword query
///
/// The crawl builds the cartesian product keywords × filters.
pub const DEFAULT_SEARCH_FILTERS: &[&str] = &[
    "&type=posts&sort=relevance&t=year",
    "&type=posts&sort=hot",
];

/// Maximum concurrent in-flight requests across the whole crawl
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 20;

/// Maximum concurrent in-flight requests per target host
pub const DEFAULT_MAX_CONCURRENT_PER_HOST: usize = 20;

/// Per-request timeout for platform requests
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Completed posts buffered before the store is appended to
pub const DEFAULT_FLUSH_BATCH_SIZE: usize = 25;

/// Newly discovered posts between two "Collected N posts so far" log lines
pub const DEFAULT_PROGRESS_LOG_INTERVAL: usize = 50;

/// Text that only appears on the profile page of an authenticated account
pub const LOGIN_SUCCESS_MARKER: &str = "Customize your profile";

/// Name of the platform's primary session cookie
pub const PRIMARY_SESSION_COOKIE: &str = "reddit_session";

/// Default external login helper executable
pub const DEFAULT_LOGIN_HELPER: &str = "threadscrape-login";

/// Number of root comment threads attached to each post
pub const COMMENT_SLOTS: usize = 5;

/// Deepest reply nesting kept in a stored thread; deeper replies are lifted
/// to this level so every row stays readable by serde_json's recursion limit
pub const MAX_REPLY_NESTING: usize = 32;

/// File name of the append-only raw post store inside the output directory
pub const STORE_FILE_NAME: &str = "output.jsonl";

/// Query string appended to the comment endpoint
pub const COMMENT_ENDPOINT_QUERY: &str =
    "render-mode=partial&seeker-session=true&sort=confidence&inline-refresh=true";

/// Browser user agent sent when the credential artifact carries no headers
///
/// Kept in step with the login helper, which records the same agent.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Default text-intelligence model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default text-intelligence API origin
pub const DEFAULT_MODEL_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the text-intelligence API key
pub const MODEL_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Worker pool size for relevance checks
pub const DEFAULT_RELEVANCE_WORKERS: usize = 10;

/// Worker pool size for summarization
///
/// Each record fans out into up to six tasks, so this pool is usually kept
/// at or below the relevance pool.
pub const DEFAULT_SUMMARY_WORKERS: usize = 10;

/// Best-effort timeout for a single text-intelligence call
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// Completed relevance tasks between two progress log lines
pub const RELEVANCE_LOG_INTERVAL: usize = 50;

/// Completed summary tasks between two progress log lines
pub const SUMMARY_LOG_INTERVAL: usize = 30;
