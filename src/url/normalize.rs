//! Anchor normalization
//!
//! Turns a raw `href` value into a crawl decision: a normalized absolute
//! same-site URL, a foreign link, or a discard. The decision order matters
//! and is checked top to bottom:
//!
//! 1. empty → discard
//! 2. `javascript:` → discard
//! 3. contains `#`, or `mailto:`/`tel:` → discard
//! 4. protocol-relative `//…` → strip slashes, fall through
//! 5. root-relative `/…` → prepend the site base
//! 6. absolute `http…` with a same-site authority → keep as-is
//! 7. scheme-less text whose leading segment is same-site → prepend scheme
//! 8. anything else not starting with `http` → resolve against the seed's
//!    directory path
//! 9. otherwise → foreign

use crate::url::{LinkVerdict, SiteBase};

/// Classifies and normalizes one raw anchor against the crawl site
pub fn normalize_anchor(raw: &str, site: &SiteBase) -> LinkVerdict {
    let mut anchor = raw.trim().to_string();
    if anchor.is_empty() {
        return LinkVerdict::Discard;
    }

    let lower = anchor.to_lowercase();
    if lower.starts_with("javascript") {
        return LinkVerdict::Discard;
    }
    if anchor.contains('#') || lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return LinkVerdict::Discard;
    }

    // Protocol-relative: drop the leading slashes, keep one trailing slash
    // if the anchor had one, then let the scheme-less rules classify it.
    if anchor.starts_with("//") {
        let trailing = if anchor.ends_with('/') { "/" } else { "" };
        anchor = format!("{}{}", anchor.trim_matches('/'), trailing);
    }
    let lower = anchor.to_lowercase();

    if anchor.starts_with('/') {
        return LinkVerdict::Local(format!("{}{}", site.base_url, anchor));
    }

    if lower.starts_with("http") && site.host_matches(authority_segment(&lower)) {
        return LinkVerdict::Local(anchor);
    }

    let first_segment = lower.split('/').next().unwrap_or("");
    if site.host_matches(first_segment) {
        return LinkVerdict::Local(format!("{}://{}", site.scheme, anchor));
    }

    if !lower.starts_with("http") {
        return LinkVerdict::Local(format!("{}{}", site.dir_path, anchor));
    }

    LinkVerdict::Foreign
}

/// Returns the authority part of an absolute URL string: everything up to
/// the first slash after the `//`, or the whole string if there is none.
pub(crate) fn authority_segment(url: &str) -> &str {
    match url.find("//") {
        Some(i) => match url[i + 2..].find('/') {
            Some(j) => &url[..i + 2 + j],
            None => url,
        },
        None => url,
    }
}
