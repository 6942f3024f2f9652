//! Crawl engine, HTTP fetcher, and HTML link extraction

mod engine;
mod fetcher;
mod parser;

pub use engine::{CrawlEnd, CrawlSummary, Engine};
pub use fetcher::{FetchOutcome, Fetcher};
pub use parser::extract_links;

use crate::config::Config;
use crate::storage::SqliteStore;
use crate::Result;
use std::path::Path;
use tokio::sync::watch;

/// Convenience entry point: crawls `seed` with SQLite-backed state
///
/// # Arguments
/// * `config` - The crawl configuration
/// * `seed` - The starting URL; its host defines the site boundary
/// * `fresh` - Clear persisted crawl state and stored pages before starting
/// * `shutdown` - Receiver that ends the crawl cleanly when set to true
pub async fn crawl(
    config: Config,
    seed: &str,
    fresh: bool,
    shutdown: watch::Receiver<bool>,
) -> Result<CrawlSummary> {
    let store = SqliteStore::new(Path::new(&config.storage.database_path))?;
    let mut engine = Engine::new(config, seed, store, fresh, shutdown)?;
    engine.run().await
}
