//! Tests for the type-safe configuration builder pattern

use kodegen_tools_threadscrape::config::{EnrichConfig, LoginHelperCommand, ScrapeConfig};
use kodegen_tools_threadscrape::utils::{DEFAULT_SEARCH_FILTERS, parse_keywords};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[tokio::test]
async fn test_builder_requires_credentials_and_keywords() {
    // This should not compile if uncommented - keywords before credentials
    // let config = ScrapeConfig::builder().keywords(vec!["x".into()]).build();

    // This should also not compile - missing keywords
    // let config = ScrapeConfig::builder().credentials("u", "p").build();

    // This SHOULD compile - both required steps taken
    let config = ScrapeConfig::builder()
        .credentials("someone", "hunter2")
        .keywords(vec!["digital rupee".to_string()])
        .build()
        .unwrap();

    assert_eq!(config.username(), "someone");
    assert_eq!(config.password(), "hunter2");
    assert_eq!(config.keywords(), ["digital rupee".to_string()]);
}

#[tokio::test]
async fn test_builder_optional_fields_have_defaults() {
    let config = ScrapeConfig::builder()
        .credentials("someone", "hunter2")
        .keywords(vec!["cbdc".to_string()])
        .build()
        .unwrap();

    assert_eq!(config.scroll_limit(), 40);
    assert_eq!(config.base_url(), "https://www.reddit.com");
    assert_eq!(config.max_concurrent_requests(), 20);
    assert_eq!(config.max_concurrent_per_host(), 20);
    assert_eq!(config.flush_batch_size(), 25);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.search_filters().len(), DEFAULT_SEARCH_FILTERS.len());
    assert_eq!(config.login_helper(), &LoginHelperCommand::default());
    assert_eq!(config.profile_url(), "https://www.reddit.com/user/someone/");
}

#[tokio::test]
async fn test_builder_with_all_optional_fields() {
    let temp_dir = TempDir::new().unwrap();
    let helper = LoginHelperCommand {
        program: PathBuf::from("python3"),
        args: vec!["login.py".to_string()],
    };

    let config = ScrapeConfig::builder()
        .credentials("someone", "hunter2")
        .keywords(vec!["upi".to_string(), "e rupee".to_string()])
        .session_dir(temp_dir.path().join("sessions"))
        .output_dir(temp_dir.path().join("out"))
        .scroll_limit(0)
        .search_filters(vec!["&type=posts&sort=new".to_string()])
        .base_url("http://127.0.0.1:8080/")
        .max_concurrent_requests(4)
        .max_concurrent_per_host(2)
        .request_timeout_secs(5)
        .flush_batch_size(1)
        .progress_log_interval(10)
        .login_helper(helper.clone())
        .build()
        .unwrap();

    assert_eq!(config.scroll_limit(), 0);
    assert_eq!(config.base_url(), "http://127.0.0.1:8080");
    assert_eq!(config.max_concurrent_requests(), 4);
    assert_eq!(config.max_concurrent_per_host(), 2);
    assert_eq!(config.progress_log_interval(), 10);
    assert_eq!(config.login_helper(), &helper);
    assert_eq!(
        config.session_file(),
        temp_dir.path().join("sessions").join("someone.json")
    );
    assert_eq!(
        config.store_path(),
        temp_dir.path().join("out").join("output.jsonl")
    );
    assert_eq!(
        config.search_urls(),
        vec![
            "http://127.0.0.1:8080/search/?q=upi&type=posts&sort=new".to_string(),
            "http://127.0.0.1:8080/search/?q=e%20rupee&type=posts&sort=new".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_builder_rejects_invalid_values() {
    let base = || {
        ScrapeConfig::builder()
            .credentials("someone", "hunter2")
            .keywords(vec!["upi".to_string()])
    };

    assert!(base().max_concurrent_requests(0).build().is_err());
    assert!(base().flush_batch_size(0).build().is_err());
    assert!(base().search_filters(Vec::new()).build().is_err());
    assert!(base().base_url("ftp://example.com").build().is_err());
    assert!(base().base_url("not a url").build().is_err());

    let blank_keywords = ScrapeConfig::builder()
        .credentials("someone", "hunter2")
        .keywords(parse_keywords(" , ,"))
        .build();
    assert!(blank_keywords.is_err());

    let blank_user = ScrapeConfig::builder()
        .credentials("  ", "hunter2")
        .keywords(vec!["upi".to_string()])
        .build();
    assert!(blank_user.is_err());
}

#[tokio::test]
async fn test_password_is_never_serialized() {
    let config = ScrapeConfig::builder()
        .credentials("someone", "hunter2")
        .keywords(vec!["upi".to_string()])
        .build()
        .unwrap();

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("someone"));
    assert!(!json.contains("hunter2"));
}

#[tokio::test]
async fn test_enrich_config_validation() {
    let mut config = EnrichConfig::new("in.jsonl", "out.jsonl", vec!["upi".to_string()]);
    assert!(config.validate().is_ok());
    assert_eq!(config.relevance_workers, 10);
    assert_eq!(config.summary_workers, 10);

    config.summary_workers = 0;
    assert!(config.validate().is_err());

    let no_keywords = EnrichConfig::new("in.jsonl", "out.jsonl", Vec::new());
    assert!(no_keywords.validate().is_err());

    let json = serde_json::to_string(&EnrichConfig {
        api_key: "secret-key".to_string(),
        ..EnrichConfig::new("in.jsonl", "out.jsonl", vec!["upi".to_string()])
    })
    .unwrap();
    assert!(!json.contains("secret-key"));
}
