use crate::url::HostMatch;
use serde::Deserialize;

/// Main configuration structure for Burrow
///
/// Every field has a default, so running without a config file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub identity: IdentityConfig,
    pub storage: StorageConfig,
    pub filter: FilterConfig,
}

/// Crawl loop behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Lower bound of the randomized inter-request pause (seconds)
    #[serde(rename = "pause-floor-secs")]
    pub pause_floor_secs: u64,

    /// Upper bound of the randomized pause; ordinary iterations sleep in
    /// `[floor, ceiling/2]`, break iterations in the full window
    #[serde(rename = "pause-ceiling-secs")]
    pub pause_ceiling_secs: u64,

    /// Every Nth processed URL takes a full-window "break" pause
    #[serde(rename = "break-interval")]
    pub break_interval: u64,

    /// Safety valve: stop after this many processed URLs
    #[serde(rename = "max-pages")]
    pub max_pages: u64,

    /// Per-request timeout handed to the HTTP client (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Same-site host matching strictness
    #[serde(rename = "host-match")]
    pub host_match: HostMatch,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            pause_floor_secs: 5,
            pause_ceiling_secs: 18,
            break_interval: 12,
            max_pages: 10_000,
            fetch_timeout_secs: 20,
            host_match: HostMatch::default(),
        }
    }
}

/// Outbound identity configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Route requests through rotating proxies
    #[serde(rename = "use-proxy")]
    pub use_proxy: bool,

    /// JSON file holding the candidate `host:port` proxy list
    #[serde(rename = "proxy-list-path")]
    pub proxy_list_path: String,

    /// Pick a new proxy every Nth request
    #[serde(rename = "rotate-every")]
    pub rotate_every: u64,

    /// Optional JSON file of User-Agent strings; built-in pool otherwise
    #[serde(rename = "user-agent-list-path")]
    pub user_agent_list_path: Option<String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            use_proxy: false,
            proxy_list_path: "./proxy_list.json".to_string(),
            rotate_every: 10,
            user_agent_list_path: None,
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite crawl state database
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory for the content-addressed page file mirror; omit to
    /// disable file output
    #[serde(rename = "pages-dir")]
    pub pages_dir: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./burrow.db".to_string(),
            pages_dir: Some("./data".to_string()),
        }
    }
}

/// Link filter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// MIME type categories whose extensions are dropped from the crawl
    #[serde(rename = "excluded-media-types")]
    pub excluded_media_types: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_media_types: vec![
                "image".to_string(),
                "audio".to_string(),
                "video".to_string(),
                "font".to_string(),
            ],
        }
    }
}
