// src/error.rs
// =============================================================================
// Errors that stop a page analysis.
//
// Only two kinds of failure end an analysis early:
// - Fetch errors: bad URL, network trouble, or an HTTP status >= 400
// - Parse errors: the body can't be turned into text we can parse
//
// Problems with individual links are NOT errors here. They are recorded
// as broken links inside the report and the walk carries on.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The page URL is not absolute or has no host
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level failure while fetching the page
    #[error("failed to fetch URL: {0}")]
    Fetch(String),

    /// The page answered, but with status >= 400
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    #[error("failed to read response: {0}")]
    Body(String),

    #[error("failed to parse HTML: {0}")]
    Parse(String),
}

impl AnalyzeError {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, AnalyzeError::Parse(_))
    }
}

// Turns a reqwest error into a short, human-readable description
//
// reqwest errors can happen for many reasons (timeouts, DNS, TLS, redirect
// loops...). The flags on the error tell us which one, and the Display text
// carries the underlying cause.
pub(crate) fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}
