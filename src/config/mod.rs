//! Configuration module for thread scraping and enrichment
//!
//! This module provides the `ScrapeConfig` struct and its type-safe builder
//! for configuring crawl runs with validation and sensible defaults, plus the
//! `EnrichConfig` used by the enrichment stage.

// Sub-modules
pub mod builder;
pub mod enrich;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, ScrapeConfigBuilder, WithCredentials};
pub use enrich::EnrichConfig;
pub use types::{LoginHelperCommand, ScrapeConfig};
