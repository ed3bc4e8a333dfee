// Discussion thread harvesting and enrichment CLI
//
// `crawl` collects posts and comment threads for a set of keywords into an
// append-only store; `enrich` filters a store by relevance and summarizes it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use kodegen_tools_threadscrape::config::{EnrichConfig, LoginHelperCommand, ScrapeConfig};
use kodegen_tools_threadscrape::crawl_engine::crawl_impl;
use kodegen_tools_threadscrape::enrichment::{EnrichmentPool, GeminiClient, run_enrichment};
use kodegen_tools_threadscrape::utils::{
    DEFAULT_LOGIN_HELPER, DEFAULT_MODEL, DEFAULT_RELEVANCE_WORKERS, DEFAULT_SCROLL_LIMIT,
    DEFAULT_SUMMARY_WORKERS, parse_keywords,
};

/// Exit status for authentication exhaustion and unusable sessions
const EXIT_AUTH_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "kodegen-threadscrape")]
#[command(about = "Harvest discussion threads by keyword and enrich them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl search results, posts and comment threads into the post store
    Crawl {
        #[arg(long)]
        username: String,

        #[arg(long, env = "THREADSCRAPE_PASSWORD", hide_env_values = true)]
        password: String,

        /// Directory holding one credential artifact per account
        #[arg(long, alias = "storage_state")]
        storage_state: PathBuf,

        /// Directory of the append-only post store
        #[arg(long)]
        outdir: PathBuf,

        /// Comma-separated search keywords
        #[arg(long)]
        keywords: String,

        /// Follow-up pages per search
        #[arg(long, default_value_t = DEFAULT_SCROLL_LIMIT)]
        scroll_limit: u32,

        /// Login helper executable
        #[arg(long, default_value = DEFAULT_LOGIN_HELPER)]
        login_helper: PathBuf,

        /// Extra argument passed to the login helper before the credentials
        #[arg(long = "login-helper-arg", allow_hyphen_values = true)]
        login_helper_args: Vec<String>,
    },

    /// Filter a post store by relevance and summarize posts and comments
    Enrich {
        #[arg(long, alias = "input_file")]
        input_file: PathBuf,

        #[arg(long, alias = "output_file")]
        output_file: PathBuf,

        /// Comma-separated relevance keywords
        #[arg(long)]
        keywords: String,

        #[arg(long, default_value_t = DEFAULT_RELEVANCE_WORKERS)]
        relevance_workers: usize,

        #[arg(long, default_value_t = DEFAULT_SUMMARY_WORKERS)]
        summary_workers: usize,

        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Crawl {
            username,
            password,
            storage_state,
            outdir,
            keywords,
            scroll_limit,
            login_helper,
            login_helper_args,
        } => {
            let config = match ScrapeConfig::builder()
                .credentials(username, password)
                .keywords(parse_keywords(&keywords))
                .session_dir(storage_state)
                .output_dir(outdir)
                .scroll_limit(scroll_limit)
                .login_helper(LoginHelperCommand {
                    program: login_helper,
                    args: login_helper_args,
                })
                .build()
            {
                Ok(config) => config,
                Err(e) => {
                    error!("Invalid crawl configuration: {e:#}");
                    return ExitCode::from(1);
                }
            };

            match crawl_impl(&config).await {
                Ok(_) => ExitCode::SUCCESS,
                Err(e) if e.is_fatal() => {
                    error!("Crawl aborted: {e}");
                    ExitCode::from(EXIT_AUTH_FAILURE)
                }
                Err(e) => {
                    error!("Crawl failed: {e}");
                    ExitCode::from(1)
                }
            }
        }

        Commands::Enrich {
            input_file,
            output_file,
            keywords,
            relevance_workers,
            summary_workers,
            model,
        } => {
            let mut config = EnrichConfig::new(input_file, output_file, parse_keywords(&keywords));
            config.relevance_workers = relevance_workers;
            config.summary_workers = summary_workers;
            config.model = model;

            match enrich(config).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("Enrichment failed: {e:#}");
                    ExitCode::from(1)
                }
            }
        }
    }
}

async fn enrich(config: EnrichConfig) -> Result<()> {
    let config = config.with_api_key_from_env()?;
    config.validate()?;

    let client = GeminiClient::new(&config)?;
    let pool = EnrichmentPool::from_config(Arc::new(client), &config);
    let summary = run_enrichment(&config, &pool).await?;
    info!(
        "Enriched {} of {} posts with {} model tasks",
        summary.relevant, summary.loaded, summary.tasks
    );
    Ok(())
}
