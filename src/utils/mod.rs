pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{
    build_search_urls, comment_endpoint_url, extract_host, is_valid_url, next_page_url,
    parse_keywords, post_path_parts, profile_url,
};
