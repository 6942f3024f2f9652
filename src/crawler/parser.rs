//! HTML link extraction
//!
//! Pulls anchor hrefs out of a fetched page and normalizes each against
//! the crawl site, keeping only local results. Parsing is synchronous:
//! `scraper::Html` is not `Send`, so the document must never live across
//! an await point.

use crate::url::{normalize_anchor, LinkVerdict, SiteBase};
use scraper::{Html, Selector};
use std::collections::HashMap;

/// Extracts same-site links from an HTML body
///
/// # Arguments
/// * `html` - The raw page body
/// * `site` - The crawl site the links are normalized against
///
/// # Returns
/// A map of normalized local URL to the number of anchors that produced
/// it. Foreign and discarded hrefs are dropped.
pub fn extract_links(html: &str, site: &SiteBase) -> HashMap<String, u32> {
    let document = Html::parse_document(html);
    let mut counts: HashMap<String, u32> = HashMap::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let LinkVerdict::Local(url) = normalize_anchor(href, site) {
                    *counts.entry(url).or_insert(0) += 1;
                }
            }
        }
    }

    counts
}
