// src/analyzer/resolve.rs
// =============================================================================
// Turns an anchor's href into an absolute URL and decides whether it points
// inside the analysed site or somewhere else.
//
// We use the `url` crate to:
// - Parse absolute URLs
// - Resolve relative references (RFC 3986) against the page's host
//
// Hrefs that don't lead to a network resource (fragments, javascript:,
// mailto:) and hrefs that don't parse produce no link at all.
//
// Rust concepts:
// - Option<T>: None means "skip this href", never an error
// - Matching on error variants: RelativeUrlWithoutBase tells us the href
//   is relative rather than broken
// =============================================================================

use url::{ParseError, Url};

// Prefixes of hrefs that never get counted or checked
const SKIPPED_PREFIXES: &[&str] = &["#", "javascript:", "mailto:"];

/// A navigable link found on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    /// Absolute URL handed to the verifier
    pub url: String,
    pub is_internal: bool,
}

// The "host[:port]" of a URL, the form used to compare links with the page
//
// The port only appears when it is explicit and not the scheme's default.
// URLs without a host (data:, tel:, ...) give an empty string.
pub fn host_key(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

// Resolves an href found on a page served from `base_host`
//
// Parameters:
//   href: the raw attribute value
//   base_host: host[:port] of the page being analysed
//
// Returns: None when the href should be ignored
//
// Examples (base_host = "example.com"):
//   "/about"              -> http://example.com/about, internal
//   "https://other.com/x" -> https://other.com/x, external
//   "#top"                -> None
pub fn resolve_href(href: &str, base_host: &str) -> Option<ResolvedLink> {
    let href = href.trim();
    if is_skipped(href) {
        return None;
    }

    // Url::parse only succeeds for absolute URLs (they have a scheme)
    match Url::parse(href) {
        Ok(url) => {
            let host = host_key(&url);
            let is_internal = host.is_empty() || host == base_host;
            Some(ResolvedLink {
                url: url.to_string(),
                is_internal,
            })
        }
        Err(ParseError::RelativeUrlWithoutBase) => {
            // Relative references resolve against a synthetic http base on the page host
            let base = Url::parse(&format!("http://{}/", base_host)).ok()?;
            let url = base.join(href).ok()?;

            // A scheme-relative reference ("//host/path") names its own host
            let is_internal = !href.starts_with("//") || host_key(&url) == base_host;
            Some(ResolvedLink {
                url: url.to_string(),
                is_internal,
            })
        }
        Err(_) => None,
    }
}

fn is_skipped(href: &str) -> bool {
    href.is_empty()
        || SKIPPED_PREFIXES.iter().any(|prefix| {
            href.get(..prefix.len())
                .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
        })
}
