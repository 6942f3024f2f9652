use crate::{UrlError, UrlResult};
use serde::Deserialize;
use url::Url;

/// Strictness of the same-site host test
///
/// `Substring` is the historical behavior: the site's `www.`-stripped host
/// only has to appear somewhere in the candidate's authority segment, so
/// `evil-example.com` passes for a site `example.com`. `Exact` requires the
/// candidate host to be the site host or a dot-separated subdomain of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostMatch {
    Exact,
    Substring,
}

impl Default for HostMatch {
    fn default() -> Self {
        Self::Exact
    }
}

/// The crawl's view of the seed site
///
/// Split once at startup and passed to the normalizer and filter for every
/// anchor decision.
#[derive(Debug, Clone)]
pub struct SiteBase {
    /// URL scheme of the seed ("http" or "https")
    pub scheme: String,

    /// Full authority of the seed, lowercased
    pub host: String,

    /// Host with a leading "www." removed; the same-site matching key
    pub strip_host: String,

    /// `scheme://host`, used to absolutize root-relative links
    pub base_url: String,

    /// The seed URL up to and including its last path slash, used to
    /// resolve bare-relative links
    pub dir_path: String,

    /// How strictly candidate hosts are compared against `strip_host`
    pub host_match: HostMatch,
}

impl SiteBase {
    /// Parses a seed URL into its crawl-relevant parts
    ///
    /// The seed must carry an explicit `http` or `https` scheme and a host.
    pub fn parse(seed: &str, host_match: HostMatch) -> UrlResult<Self> {
        let parsed = Url::parse(seed).map_err(|e| UrlError::Parse(e.to_string()))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
        }

        let host = match parsed.host_str() {
            Some(h) => {
                let mut authority = h.to_lowercase();
                if let Some(port) = parsed.port() {
                    authority.push(':');
                    authority.push_str(&port.to_string());
                }
                authority
            }
            None => return Err(UrlError::MissingHost),
        };

        let strip_host = host.strip_prefix("www.").unwrap_or(&host).to_string();
        let base_url = format!("{}://{}", parsed.scheme(), host);

        // The seed's path through its last slash; bare-relative anchors
        // are appended to this. The parsed path always starts with '/',
        // so a pathless seed resolves against the site root.
        let path = parsed.path();
        let dir = match path.rfind('/') {
            Some(i) => &path[..=i],
            None => "/",
        };
        let dir_path = format!("{}{}", base_url, dir);

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            host,
            strip_host,
            base_url,
            dir_path,
            host_match,
        })
    }

    /// Tests whether an authority-ish segment belongs to this site
    ///
    /// `segment` is expected lowercased; it may still carry a scheme prefix
    /// (for absolute anchors) or be the text before the first slash (for
    /// scheme-less anchors).
    pub fn host_matches(&self, segment: &str) -> bool {
        match self.host_match {
            HostMatch::Substring => segment.contains(&self.strip_host),
            HostMatch::Exact => {
                let token = match segment.split_once("//") {
                    Some((_, rest)) => rest,
                    None => segment,
                };
                let token = token.split('/').next().unwrap_or("");
                let token = token.strip_prefix("www.").unwrap_or(token);

                token == self.strip_host || token.ends_with(&format!(".{}", self.strip_host))
            }
        }
    }
}
