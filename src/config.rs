// src/config.rs
// =============================================================================
// Settings that control how pages are fetched and links are verified.
//
// Everything the analyzer needs to know about timeouts, redirects and the
// user agent lives in one `AnalyzerConfig` value that callers pass in.
// Nothing here is global, so tests can build whatever config they need.
// =============================================================================

use std::time::Duration;

/// Total time budget for a single outbound request (page fetch or link check).
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Redirect hops followed before we stop and evaluate the last response.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; URL-Analyzer/1.0)";

/// Some servers reject HEAD outright, so a HEAD transport failure is retried
/// once with GET.
pub const DEFAULT_HEAD_FALLBACK: bool = true;

/// Link checks in flight at once for a single page.
pub const DEFAULT_LINK_CONCURRENCY: usize = 8;

/// Pages in flight at once for the batch form.
pub const DEFAULT_PAGE_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Total timeout per request, connect through body
    pub timeout: Duration,
    /// Maximum redirect hops to follow
    pub max_redirects: usize,
    pub user_agent: String,
    /// Retry HEAD transport failures with a GET
    pub head_fallback: bool,
    /// When false, links are still counted but never requested
    pub verify_links: bool,
    pub link_concurrency: usize,
    pub page_concurrency: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            head_fallback: DEFAULT_HEAD_FALLBACK,
            verify_links: true,
            link_concurrency: DEFAULT_LINK_CONCURRENCY,
            page_concurrency: DEFAULT_PAGE_CONCURRENCY,
        }
    }
}

impl AnalyzerConfig {
    // Concurrency limits of zero would stall the streams, so clamp to 1
    pub(crate) fn link_slots(&self) -> usize {
        self.link_concurrency.max(1)
    }

    pub(crate) fn page_slots(&self) -> usize {
        self.page_concurrency.max(1)
    }
}
