//! Burrow: a frontier-driven same-site crawler
//!
//! This crate implements a single-site crawler that discovers links from a
//! seed URL, deduplicates and persists pending/visited state across runs,
//! paces its own request rate, and writes each fetched page to durable
//! storage.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod identity;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Burrow operations
#[derive(Debug, Error)]
pub enum BurrowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Identity error: {0}")]
    Identity(#[from] identity::IdentityError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Seed URL must include an explicit http/https scheme: {0}")]
    MissingScheme(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Burrow operations
pub type Result<T> = std::result::Result<T, BurrowError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEnd, CrawlSummary, Engine, FetchOutcome};
pub use frontier::Frontier;
pub use url::{normalize_anchor, HostMatch, LinkVerdict, SiteBase};
