// src/analyzer/verify.rs
// =============================================================================
// Checks whether a link is alive.
//
// Key functionality:
// - Makes an HTTP HEAD request (lightweight, no body download)
// - Falls back to GET if HEAD fails at the transport level, because some
//   servers refuse HEAD outright
// - Anything answering with status >= 400, or failing on both attempts,
//   is broken
//
// Redirects are followed by the client itself (see fetch::build_client),
// so the status we look at here is the one from the last hop.
//
// Rust concepts:
// - async/await: each check waits on the network without blocking others
// - Match guards: `Err(e) if self.head_fallback` picks the retry branch
// - Option<T>: Some(detail) = broken, None = alive
// =============================================================================

use log::debug;
use reqwest::{Client, StatusCode};

use crate::error::describe_transport_error;
use crate::report::BrokenLinkDetail;

pub struct LinkVerifier {
    client: Client,
    head_fallback: bool,
}

impl LinkVerifier {
    // Client is cheap to clone (it's a reference counter internally)
    pub fn new(client: Client, head_fallback: bool) -> Self {
        Self {
            client,
            head_fallback,
        }
    }

    // Checks a single link
    //
    // Returns: Some(detail) when the link is broken, None when it's alive
    pub async fn verify(&self, url: &str) -> Option<BrokenLinkDetail> {
        // First, try a HEAD request (faster, no body download)
        let response = match self.client.head(url).send().await {
            Ok(response) => response,
            Err(head_error) if self.head_fallback => {
                debug!(
                    "HEAD {} failed ({}), retrying with GET",
                    url,
                    describe_transport_error(&head_error)
                );
                // Same client, so same user agent, timeout and redirect cap
                match self.client.get(url).send().await {
                    Ok(response) => response,
                    Err(get_error) => return Some(transport_failure(url, &get_error)),
                }
            }
            Err(head_error) => return Some(transport_failure(url, &head_error)),
        };

        // Got a response! Only the status matters, the body is never read
        let status = response.status();
        debug!("{} -> {}", url, status.as_u16());
        classify_status(url, status)
    }
}

// Decides whether a completed response means the link is broken
//
// HTTP status codes:
// - 200-399: alive (3xx only shows up here when the redirect cap was hit)
// - 400-599: broken, reported with the code and its reason phrase
pub fn classify_status(url: &str, status: StatusCode) -> Option<BrokenLinkDetail> {
    if status.as_u16() < 400 {
        return None;
    }

    let error_message = match status.canonical_reason() {
        Some(reason) => format!("HTTP error: {} {}", status.as_u16(), reason),
        None => format!("HTTP error: {}", status.as_u16()),
    };

    Some(BrokenLinkDetail {
        url: url.to_string(),
        status_code: status.as_u16(),
        error_message,
    })
}

// No response at all: status 0 plus a description of what went wrong
fn transport_failure(url: &str, error: &reqwest::Error) -> BrokenLinkDetail {
    BrokenLinkDetail {
        url: url.to_string(),
        status_code: 0,
        error_message: format!("Request failed: {}", describe_transport_error(error)),
    }
}
