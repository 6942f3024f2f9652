//! Crawl engine
//!
//! Drives the frontier loop: pop a pending URL (which marks it visited),
//! pace, pick an outbound identity, fetch, store the page, and enqueue
//! the links it contains. A URL gets exactly one fetch attempt; failures
//! are logged and forfeited, never retried.

use crate::config::Config;
use crate::crawler::fetcher::{FetchOutcome, Fetcher};
use crate::crawler::parser::extract_links;
use crate::frontier::Frontier;
use crate::identity::{ProxyList, UserAgentPool};
use crate::storage::{FrontierBackend, PageFiles, PageSink};
use crate::url::{LinkFilter, SiteBase};
use crate::Result;
use rand::Rng;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Why the crawl loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlEnd {
    /// The pending register drained: every reachable URL was attempted
    Done,

    /// The configured page cap was hit with work still pending
    PageCapReached,

    /// A shutdown signal arrived mid-crawl
    Aborted,
}

/// Final accounting for a crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub end: CrawlEnd,
    /// URLs fetched with a 200 response
    pub fetched: u64,
    /// URLs attempted but forfeited (non-200 or transport failure)
    pub skipped: u64,
    /// URLs still pending when the loop stopped
    pub remaining: u64,
}

/// The crawl engine, generic over the frontier/page store backend
pub struct Engine<S: FrontierBackend + PageSink> {
    config: Config,
    site: SiteBase,
    filter: LinkFilter,
    frontier: Frontier<S>,
    fetcher: Fetcher,
    proxies: Option<ProxyList>,
    agents: UserAgentPool,
    page_files: Option<PageFiles>,
    shutdown: watch::Receiver<bool>,
}

impl<S: FrontierBackend + PageSink> Engine<S> {
    /// Prepares an engine for a crawl of `seed`
    ///
    /// With `fresh` set, any persisted crawl state and stored pages are
    /// cleared first; otherwise the previous run's frontier is resumed
    /// and the seed is only enqueued if it was never visited.
    pub fn new(
        config: Config,
        seed: &str,
        store: S,
        fresh: bool,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self> {
        let site = SiteBase::parse(seed, config.crawler.host_match)?;
        let filter = LinkFilter::new(&config.filter.excluded_media_types);
        let fetcher = Fetcher::new(Duration::from_secs(config.crawler.fetch_timeout_secs))?;

        let proxies = if config.identity.use_proxy {
            let list = ProxyList::load(
                Path::new(&config.identity.proxy_list_path),
                config.identity.rotate_every,
            )?;
            tracing::info!("Loaded {} candidate proxies", list.remaining());
            Some(list)
        } else {
            None
        };

        let agents = match &config.identity.user_agent_list_path {
            Some(path) => UserAgentPool::load(Path::new(path))?,
            None => UserAgentPool::default(),
        };

        let page_files = match &config.storage.pages_dir {
            Some(dir) => Some(PageFiles::new(Path::new(dir))?),
            None => None,
        };

        let mut frontier = Frontier::new(store);
        if fresh {
            frontier.start_fresh()?;
            frontier.store_mut().clear_pages()?;
            if let Some(files) = &page_files {
                files.clear()?;
            }
        }
        frontier.seed(seed)?;

        Ok(Self {
            config,
            site,
            filter,
            frontier,
            fetcher,
            proxies,
            agents,
            page_files,
            shutdown,
        })
    }

    /// Runs the crawl loop to completion
    ///
    /// # Returns
    /// A summary of the run; storage failures abort the crawl with an
    /// error, fetch failures merely forfeit the URL they hit.
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        tracing::info!("Starting crawl of {}", self.site.base_url);
        let started = Instant::now();
        let mut processed: u64 = 0;
        let mut fetched: u64 = 0;
        let mut skipped: u64 = 0;

        let end = loop {
            if *self.shutdown.borrow() {
                tracing::info!("Shutdown requested, stopping crawl");
                break CrawlEnd::Aborted;
            }
            if processed >= self.config.crawler.max_pages {
                tracing::warn!(
                    "Page cap of {} reached with {} URLs still pending",
                    self.config.crawler.max_pages,
                    self.frontier.pending_count()?
                );
                break CrawlEnd::PageCapReached;
            }

            // Popping marks the URL visited; from here it is never retried.
            let url = match self.frontier.pop_one()? {
                Some(url) => url,
                None => {
                    tracing::info!("Pending register drained");
                    break CrawlEnd::Done;
                }
            };

            if self.pace(processed).await {
                tracing::info!("Shutdown requested during pause");
                break CrawlEnd::Aborted;
            }

            let request_count = processed;
            processed += 1;

            if let Some(proxies) = &mut self.proxies {
                let proxy = proxies.next(request_count)?;
                self.fetcher.set_proxy(Some(&proxy))?;
            }
            let user_agent = self.agents.pick().to_string();

            tracing::info!("Fetching {}", url);
            match self.fetcher.fetch(&url, &user_agent).await {
                FetchOutcome::Success { status: 200, body } => {
                    self.frontier.store_mut().store_page(&url, &body)?;
                    if let Some(files) = &self.page_files {
                        files.write(&url, &body)?;
                    }
                    fetched += 1;

                    let discovered = extract_links(&body, &self.site);
                    let candidates: Vec<String> = discovered.into_keys().collect();
                    let kept = self.filter.retain(&candidates, &self.site);
                    for link in &kept {
                        self.frontier.enqueue_if_new(link)?;
                    }
                    self.frontier.reconcile(&self.site, &self.filter)?;
                    tracing::debug!("Stored {} ({} candidate links)", url, kept.len());
                }
                FetchOutcome::Success { status, .. } => {
                    skipped += 1;
                    tracing::warn!("HTTP {} for {}, forfeiting", status, url);
                }
                FetchOutcome::Failure { reason } => {
                    skipped += 1;
                    tracing::warn!("Fetch failed for {}: {}", url, reason);
                    if self.fetcher.proxied() {
                        if let Some(proxies) = &mut self.proxies {
                            proxies.discard_current()?;
                            tracing::info!(
                                "Discarded failing proxy, {} remaining",
                                proxies.remaining()
                            );
                        }
                        self.fetcher.set_proxy(None)?;
                    }
                }
            }
        };

        let remaining = self.frontier.pending_count()?;
        tracing::info!(
            "Crawl finished in {:.1?}: {} fetched, {} forfeited, {} pending",
            started.elapsed(),
            fetched,
            skipped,
            remaining
        );

        Ok(CrawlSummary {
            end,
            fetched,
            skipped,
            remaining,
        })
    }

    /// Sleeps the randomized inter-request pause, interruptibly
    ///
    /// Every `break_interval`th processed URL draws from the full
    /// `[floor, ceiling]` window, the rest from `[floor, ceiling/2]`.
    /// Returns true if a shutdown signal cut the pause short.
    async fn pace(&mut self, processed: u64) -> bool {
        let floor = self.config.crawler.pause_floor_secs;
        let ceiling = self.config.crawler.pause_ceiling_secs;
        let upper = if processed % self.config.crawler.break_interval == 0 {
            ceiling.max(floor)
        } else {
            (ceiling / 2).max(floor)
        };

        // ThreadRng is not Send, so draw before awaiting.
        let secs = {
            let mut rng = rand::thread_rng();
            rng.gen_range(floor..=upper)
        };
        if secs == 0 {
            return *self.shutdown.borrow();
        }

        tracing::debug!("Pausing {}s", secs);
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(secs)) => false,
            changed = self.shutdown.changed() => {
                changed.is_ok() && *self.shutdown.borrow()
            }
        }
    }

    /// Read access to the underlying frontier, mainly for tests
    pub fn frontier(&self) -> &Frontier<S> {
        &self.frontier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStore;

    fn quiet_config() -> Config {
        let mut config = Config::default();
        config.crawler.pause_floor_secs = 0;
        config.crawler.pause_ceiling_secs = 0;
        config.storage.pages_dir = None;
        config
    }

    fn shutdown_pair() -> (watch::Sender<bool>, watch::Receiver<bool>) {
        watch::channel(false)
    }

    #[test]
    fn test_new_seeds_frontier() {
        let (_tx, rx) = shutdown_pair();
        let engine = Engine::new(
            quiet_config(),
            "https://example.com/",
            MemoryStore::new(),
            true,
            rx,
        )
        .unwrap();

        assert_eq!(engine.frontier().pending_count().unwrap(), 1);
        assert_eq!(engine.frontier().visited_count().unwrap(), 0);
    }

    #[test]
    fn test_fresh_start_clears_previous_state() {
        let mut store = MemoryStore::new();
        store.insert(crate::storage::Register::Visited, "https://example.com/old").unwrap();
        store.store_page("https://example.com/old", "<html></html>").unwrap();

        let (_tx, rx) = shutdown_pair();
        let engine = Engine::new(quiet_config(), "https://example.com/", store, true, rx).unwrap();

        assert_eq!(engine.frontier().visited_count().unwrap(), 0);
        assert_eq!(engine.frontier().store().page_count().unwrap(), 0);
        assert_eq!(engine.frontier().pending_count().unwrap(), 1);
    }

    #[test]
    fn test_resume_does_not_requeue_visited_seed() {
        let mut store = MemoryStore::new();
        store.insert(crate::storage::Register::Visited, "https://example.com/").unwrap();

        let (_tx, rx) = shutdown_pair();
        let engine = Engine::new(quiet_config(), "https://example.com/", store, false, rx).unwrap();

        assert_eq!(engine.frontier().pending_count().unwrap(), 0);
        assert_eq!(engine.frontier().visited_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_pop() {
        let (tx, rx) = shutdown_pair();
        let mut engine =
            Engine::new(quiet_config(), "https://example.com/", MemoryStore::new(), true, rx)
                .unwrap();

        tx.send(true).unwrap();
        let summary = engine.run().await.unwrap();

        assert_eq!(summary.end, CrawlEnd::Aborted);
        assert_eq!(summary.fetched, 0);
        assert_eq!(summary.remaining, 1);
    }
}
