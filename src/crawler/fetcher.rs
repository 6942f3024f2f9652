//! HTTP fetcher
//!
//! One fetch attempt per URL, no retries: the crawl engine has already
//! marked the URL visited by the time it is fetched, so a failure simply
//! forfeits it. The outcome is a tagged result; the engine never inspects
//! response objects directly.

use reqwest::{header, Client, Proxy};
use std::time::Duration;

/// Result of a single fetch attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// The server answered; the crawl only advances on a 200 status
    Success { status: u16, body: String },

    /// Transport-level failure (timeout, connect error, proxy error, ...)
    Failure { reason: String },
}

impl FetchOutcome {
    /// True for a 200 response, the only outcome that advances the crawl
    pub fn advances(&self) -> bool {
        matches!(self, Self::Success { status: 200, .. })
    }
}

/// HTTP client wrapper carrying the current outbound identity
///
/// The User-Agent header changes per request; the underlying client is
/// rebuilt only when the proxy identity changes.
pub struct Fetcher {
    client: Client,
    timeout: Duration,
    proxy: Option<String>,
}

impl Fetcher {
    /// Builds a fetcher with no proxy
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout, None)?,
            timeout,
            proxy: None,
        })
    }

    /// Switches the outbound proxy, rebuilding the client if it changed
    pub fn set_proxy(&mut self, proxy: Option<&str>) -> Result<(), reqwest::Error> {
        if self.proxy.as_deref() == proxy {
            return Ok(());
        }
        self.client = build_client(self.timeout, proxy)?;
        self.proxy = proxy.map(|p| p.to_string());
        Ok(())
    }

    /// Whether requests currently go through a proxy
    pub fn proxied(&self) -> bool {
        self.proxy.is_some()
    }

    /// Fetches a URL with the given User-Agent header
    pub async fn fetch(&self, url: &str, user_agent: &str) -> FetchOutcome {
        let request = self
            .client
            .get(url)
            .header(header::USER_AGENT, user_agent);

        match request.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.text().await {
                    Ok(body) => FetchOutcome::Success { status, body },
                    Err(e) => FetchOutcome::Failure {
                        reason: format!("Failed to read body: {}", e),
                    },
                }
            }
            Err(e) => {
                let reason = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    format!("Connection failed: {}", e)
                } else {
                    e.to_string()
                };
                FetchOutcome::Failure { reason }
            }
        }
    }
}

/// Builds the HTTP client for an identity
fn build_client(timeout: Duration, proxy: Option<&str>) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true);

    if let Some(endpoint) = proxy {
        builder = builder.proxy(Proxy::all(format!("http://{}", endpoint))?);
    }

    builder.build()
}
