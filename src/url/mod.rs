//! URL handling module for Burrow
//!
//! This module decides what a raw anchor found on a page means for the
//! crawl: same-site (keep), foreign (drop), or not navigable at all
//! (discard). It also provides the batch link filter that the frontier
//! uses to sweep out media links and cross-host strays.

mod filter;
mod normalize;
mod site;

pub use filter::{media_extensions, LinkFilter};
pub use normalize::normalize_anchor;
pub use site::{HostMatch, SiteBase};

/// Verdict for a single raw anchor string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkVerdict {
    /// Same-site link, normalized to an absolute URL
    Local(String),
    /// Link to another host
    Foreign,
    /// Not a navigable link (empty, script, mailto, fragment, ...)
    Discard,
}

impl LinkVerdict {
    /// Returns the normalized URL if this is a same-site link
    pub fn into_local(self) -> Option<String> {
        match self {
            Self::Local(url) => Some(url),
            _ => None,
        }
    }
}
