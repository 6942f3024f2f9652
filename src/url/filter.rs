//! Batch link filter
//!
//! The normalizer works anchor-by-anchor while a page is being parsed; the
//! filter re-checks whole candidate batches before they reach the frontier
//! and again when the frontier reconciles. It drops media links, fragment
//! links, script links, and cross-host URLs that slipped through loose
//! matching.

use crate::url::normalize::authority_segment;
use crate::url::SiteBase;
use std::collections::HashSet;

/// Extension / MIME-category table for common non-HTML media types
///
/// Stand-in for a system MIME database, restricted to the categories the
/// filter can be configured to exclude.
const MEDIA_TYPES: &[(&str, &str)] = &[
    // image
    (".png", "image"),
    (".jpg", "image"),
    (".jpeg", "image"),
    (".gif", "image"),
    (".bmp", "image"),
    (".ico", "image"),
    (".svg", "image"),
    (".tif", "image"),
    (".tiff", "image"),
    (".webp", "image"),
    (".avif", "image"),
    (".heic", "image"),
    // audio
    (".mp3", "audio"),
    (".wav", "audio"),
    (".ogg", "audio"),
    (".oga", "audio"),
    (".flac", "audio"),
    (".aac", "audio"),
    (".m4a", "audio"),
    (".mid", "audio"),
    (".midi", "audio"),
    (".opus", "audio"),
    // video
    (".mp4", "video"),
    (".m4v", "video"),
    (".mov", "video"),
    (".avi", "video"),
    (".wmv", "video"),
    (".mkv", "video"),
    (".webm", "video"),
    (".mpg", "video"),
    (".mpeg", "video"),
    (".3gp", "video"),
    (".flv", "video"),
    // font
    (".ttf", "font"),
    (".otf", "font"),
    (".woff", "font"),
    (".woff2", "font"),
    (".eot", "font"),
];

/// Returns the set of file extensions belonging to the excluded MIME
/// categories (e.g. `["image", "audio"]` → `{".png", ".mp3", ...}`).
pub fn media_extensions(excluded_categories: &[String]) -> HashSet<String> {
    let excluded: HashSet<&str> = excluded_categories.iter().map(|s| s.as_str()).collect();
    MEDIA_TYPES
        .iter()
        .filter(|(_, category)| excluded.contains(category))
        .map(|(ext, _)| ext.to_string())
        .collect()
}

/// Filters candidate URL batches against the crawl site
#[derive(Debug, Clone)]
pub struct LinkFilter {
    media_exts: HashSet<String>,
}

impl LinkFilter {
    /// Builds a filter excluding the given MIME categories
    pub fn new(excluded_categories: &[String]) -> Self {
        Self {
            media_exts: media_extensions(excluded_categories),
        }
    }

    /// Decides whether a single candidate survives the filter
    ///
    /// Checks, in order: media extension, fragment marker, script
    /// pseudo-protocol, and the same-site host test (on the authority
    /// segment for absolute URLs, on the leading segment otherwise).
    pub fn keeps(&self, candidate: &str, site: &SiteBase) -> bool {
        let lower = candidate.to_lowercase();

        if let Some(i) = lower.rfind('.') {
            let ext = lower[i..].trim_matches('/');
            if self.media_exts.contains(ext) {
                return false;
            }
        }

        if lower.contains('#') {
            return false;
        }

        if lower.contains("javascript:") {
            return false;
        }

        if lower.starts_with("http") {
            site.host_matches(authority_segment(&lower))
        } else {
            let trimmed = lower.trim_matches('/');
            let first_segment = trimmed.split('/').next().unwrap_or("");
            site.host_matches(first_segment)
        }
    }

    /// Applies the filter to a candidate batch; output is a subset of the
    /// input, order not meaningful.
    pub fn retain(&self, candidates: &[String], site: &SiteBase) -> Vec<String> {
        candidates
            .iter()
            .filter(|c| self.keeps(c, site))
            .cloned()
            .collect()
    }
}
