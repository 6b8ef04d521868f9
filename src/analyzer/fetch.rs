// src/analyzer/fetch.rs
// =============================================================================
// Fetches the page to analyse and turns its body into an HTML document.
//
// Steps:
// 1. GET the page (status >= 400 is a fetch error)
// 2. Decode the body in the charset from Content-Type (UTF-8 by default)
// 3. Parse the text with `scraper`, which is built on html5ever
//
// html5ever accepts any text, so the only parse errors are bodies that
// aren't valid in their declared charset, or charsets we don't know.
//
// Rust concepts:
// - Closures: the redirect policy is a `move` closure capturing the cap
// - map_err: converts reqwest errors into our own AnalyzeError variants
// - Cow<str>: decoding borrows when it can and allocates only when needed
// =============================================================================

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::Client;
use scraper::Html;

use crate::config::AnalyzerConfig;
use crate::error::{describe_transport_error, AnalyzeError};

// The raw result of fetching a page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

// Creates an HTTP client with the timeout, user agent and redirect policy
// from the config
//
// Once `max_redirects` hops have been followed we stop and hand back the
// last response instead of failing.
pub fn build_client(config: &AnalyzerConfig) -> Result<Client, AnalyzeError> {
    let max_redirects = config.max_redirects;

    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str())
        .redirect(Policy::custom(move |attempt| {
            // previous() lists the URLs already visited in this chain
            if attempt.previous().len() > max_redirects {
                attempt.stop()
            } else {
                attempt.follow()
            }
        }))
        .build()
        .map_err(AnalyzeError::Client)
}

// Fetches a web page and returns its body bytes
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, AnalyzeError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AnalyzeError::Fetch(describe_transport_error(&e)))?;

    // A 3xx here (redirect cap hit, or no Location) is still a usable page
    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(AnalyzeError::HttpStatus(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let body = response
        .bytes()
        .await
        .map_err(|e| AnalyzeError::Body(describe_transport_error(&e)))?;

    Ok(FetchedPage {
        content_type,
        body: body.to_vec(),
    })
}

// Decodes and parses a fetched page
pub fn parse_page(page: &FetchedPage) -> Result<Html, AnalyzeError> {
    let text = decode_body(page)?;
    Ok(Html::parse_document(&text))
}

// Decodes the body without replacement characters
//
// A byte-order mark wins over the declared charset, like browsers do.
fn decode_body(page: &FetchedPage) -> Result<Cow<'_, str>, AnalyzeError> {
    let declared = match page.content_type.as_deref().and_then(charset_from_content_type) {
        Some(label) => Encoding::for_label(label.as_bytes())
            .ok_or_else(|| AnalyzeError::Parse(format!("unsupported charset '{}'", label)))?,
        None => UTF_8,
    };

    let (encoding, body) = match Encoding::for_bom(&page.body) {
        Some((encoding, bom_length)) => (encoding, &page.body[bom_length..]),
        None => (declared, page.body.as_slice()),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| AnalyzeError::Parse(format!("body is not valid {}", encoding.name())))
}

// Pulls the charset parameter out of a Content-Type header value
//
// Example: "text/html; charset=\"ISO-8859-1\"" -> Some("ISO-8859-1")
fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|part| {
        let (name, value) = part.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}
