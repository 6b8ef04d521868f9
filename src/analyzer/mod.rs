// src/analyzer/mod.rs
// =============================================================================
// The page analyzer: fetch -> parse -> walk -> verify links -> report.
//
// Submodules:
// - fetch: downloads the page and parses it into an HTML tree
// - walk: visits every node and fills in the report
// - resolve: turns hrefs into absolute URLs, internal or external
// - verify: checks each link with HEAD (falling back to GET)
//
// Failures to fetch or parse the page end the analysis; they are written
// into the report's `error` field instead of being returned as errors.
//
// Rust concepts:
// - Result<T, E> and ?: run_analysis bails out at the first failure
// - Streams: .buffered(n) runs n futures at once but yields in input order
// - Scoped borrows: the HTML tree lives in an inner block so it is gone
//   before the next .await
// =============================================================================

mod fetch;
mod resolve;
mod verify;
mod walk;

pub use fetch::{build_client, fetch_page, parse_page, FetchedPage};
pub use resolve::{host_key, resolve_href, ResolvedLink};
pub use verify::{classify_status, LinkVerifier};
pub use walk::walk_document;

use futures::stream::{self, StreamExt}; // StreamExt gives us .buffered()
use log::{info, warn};
use reqwest::Client;
use url::Url;

use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::report::AnalysisReport;

// Analyzes a single page
//
// Every call builds its own client, report and tree; nothing is shared
// between calls, and nothing is read from or written to storage.
//
// Returns: the finished report. Check `is_complete()` before storing it.
pub async fn analyze(url: &str, config: &AnalyzerConfig) -> AnalysisReport {
    info!("Analyzing {}", url);

    match run_analysis(url, config).await {
        Ok(report) => {
            info!(
                "{}: {} internal, {} external, {} broken link(s)",
                url, report.internal_links, report.external_links, report.broken_link_count
            );
            report
        }
        Err(error) => {
            warn!("Analysis of {} failed: {}", url, error);
            AnalysisReport::failed(url, &error)
        }
    }
}

// Analyzes several pages independently
//
// Up to `page_concurrency` pages are in flight at once. Reports come back
// in the same order as the input URLs, and one page failing doesn't affect
// the others.
pub async fn analyze_batch<S: AsRef<str>>(urls: &[S], config: &AnalyzerConfig) -> Vec<AnalysisReport> {
    stream::iter(urls.iter().map(|url| analyze(url.as_ref(), config)))
        .buffered(config.page_slots())
        .collect()
        .await
}

async fn run_analysis(url: &str, config: &AnalyzerConfig) -> Result<AnalysisReport, AnalyzeError> {
    // Each ? returns early with the error; analyze() turns it into report.error
    let base_host = page_host(url)?;
    // One client per analysis, reused for the page and every link (connection pooling)
    let client = build_client(config)?;
    let page = fetch_page(&client, url).await?;

    let mut report = AnalysisReport::new(url);
    // The parsed tree is dropped here, before any link is requested
    let links = {
        let document = parse_page(&page)?;
        walk_document(&document, &mut report, &base_host)
    };

    if config.verify_links {
        verify_links(&client, config, &links, &mut report).await;
    }

    Ok(report)
}

// Extracts "host[:port]" from the page URL
fn page_host(url: &str) -> Result<String, AnalyzeError> {
    let parsed = Url::parse(url).map_err(|e| AnalyzeError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let host = host_key(&parsed);
    if host.is_empty() {
        return Err(AnalyzeError::InvalidUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    Ok(host)
}

// Checks every link and records the broken ones
//
// Checks run concurrently, but .buffered() (unlike .buffer_unordered())
// yields results in input order, so broken links land in the report in
// document order no matter which request finishes first.
async fn verify_links(
    client: &Client,
    config: &AnalyzerConfig,
    links: &[String],
    report: &mut AnalysisReport,
) {
    let verifier = LinkVerifier::new(client.clone(), config.head_fallback);

    // One future per link; each borrows the verifier and its URL
    let results: Vec<_> = stream::iter(links.iter().map(|url| verifier.verify(url)))
        .buffered(config.link_slots())
        .collect()
        .await;

    // flatten() skips the None entries (live links)
    for detail in results.into_iter().flatten() {
        report.record_broken_link(detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::HtmlVersion;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PAGE: &str = r##"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN" "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">
<html>
<head><title> Test page </title></head>
<body>
  <h1>Welcome</h1>
  <h2>One</h2><h2>Two</h2>
  <a href="/ok">ok</a>
  <a href="#top">top</a>
  <a href="/missing">missing</a>
  <a href="/slow">slow</a>
  <a href="http://127.0.0.1:9/nothing">unreachable</a>
  <a href="mailto:someone@example.com">mail</a>
  <form><div><input type="password"></div></form>
</body>
</html>"##;

    async fn serve_page(body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        // Slow to answer, so it finishes last even though it isn't last on the page
        Mock::given(method("HEAD"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(410).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;
        server
    }

    fn page_url(server: &MockServer) -> String {
        format!("{}/", server.uri())
    }

    #[tokio::test]
    async fn test_full_analysis() {
        let server = serve_page(PAGE).await;
        let url = page_url(&server);

        let report = analyze(&url, &AnalyzerConfig::default()).await;

        assert!(report.is_complete(), "unexpected error: {:?}", report.error);
        assert_eq!(report.url, url);
        assert_eq!(report.html_version, HtmlVersion::Xhtml);
        assert_eq!(report.page_title, "Test page");
        assert_eq!(report.heading_counts.get("H1"), Some(&1));
        assert_eq!(report.heading_counts.get("H2"), Some(&2));
        assert_eq!(report.internal_links, 3);
        assert_eq!(report.external_links, 1);
        assert!(report.has_login_form);

        // Document order, not completion order
        assert_eq!(report.broken_link_count, 3);
        let host = server.uri();
        assert_eq!(report.broken_links[0].url, format!("{}/missing", host));
        assert_eq!(report.broken_links[0].status_code, 404);
        assert_eq!(report.broken_links[0].error_message, "HTTP error: 404 Not Found");
        assert_eq!(report.broken_links[1].url, format!("{}/slow", host));
        assert_eq!(report.broken_links[1].status_code, 410);
        assert_eq!(report.broken_links[2].url, "http://127.0.0.1:9/nothing");
        assert_eq!(report.broken_links[2].status_code, 0);
    }

    #[tokio::test]
    async fn test_analysis_is_repeatable() {
        let server = serve_page(PAGE).await;
        let url = page_url(&server);
        let config = AnalyzerConfig::default();

        let first = analyze(&url, &config).await;
        let second = analyze(&url, &config).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_sequential_verification_gives_same_report() {
        let server = serve_page(PAGE).await;
        let url = page_url(&server);

        let parallel = analyze(&url, &AnalyzerConfig::default()).await;
        let sequential = analyze(
            &url,
            &AnalyzerConfig {
                link_concurrency: 1,
                ..AnalyzerConfig::default()
            },
        )
        .await;
        assert_eq!(parallel, sequential);
    }

    #[tokio::test]
    async fn test_links_counted_but_not_checked_when_verification_is_off() {
        let server = serve_page(PAGE).await;
        let config = AnalyzerConfig {
            verify_links: false,
            ..AnalyzerConfig::default()
        };

        let report = analyze(&page_url(&server), &config).await;
        assert_eq!(report.internal_links, 3);
        assert_eq!(report.external_links, 1);
        assert_eq!(report.broken_link_count, 0);
        assert!(report.broken_links.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_host_sets_error_only() {
        let report = analyze("http://127.0.0.1:9/", &AnalyzerConfig::default()).await;

        let error = report.error.clone().unwrap();
        assert!(error.starts_with("failed to fetch URL: "), "{}", error);
        assert_eq!(
            report,
            AnalysisReport {
                url: "http://127.0.0.1:9/".to_string(),
                error: Some(error),
                ..AnalysisReport::default()
            }
        );
    }

    #[tokio::test]
    async fn test_error_status_on_page_sets_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_raw("<h1>nope</h1>", "text/html"))
            .mount(&server)
            .await;

        let report = analyze(&page_url(&server), &AnalyzerConfig::default()).await;
        assert_eq!(report.error.as_deref(), Some("HTTP error: 404"));
        assert!(report.heading_counts.is_empty());
    }

    #[tokio::test]
    async fn test_undecodable_page_sets_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(b"<h1>\xff\xfe</h1>".to_vec(), "text/html"),
            )
            .mount(&server)
            .await;

        let report = analyze(&page_url(&server), &AnalyzerConfig::default()).await;
        let error = report.error.unwrap();
        assert!(error.starts_with("failed to parse HTML: "), "{}", error);
        assert!(report.heading_counts.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_url_sets_error() {
        let report = analyze("not a url", &AnalyzerConfig::default()).await;
        assert!(report.error.unwrap().starts_with("invalid URL 'not a url'"));

        let report = analyze("data:text/html,<h1>x</h1>", &AnalyzerConfig::default()).await;
        assert!(report.error.unwrap().ends_with("URL has no host"));
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_isolates_failures() {
        let server = serve_page(PAGE).await;
        let good = page_url(&server);
        let urls = vec![
            good.clone(),
            "http://127.0.0.1:9/".to_string(),
            good.clone(),
        ];

        let reports = analyze_batch(&urls, &AnalyzerConfig::default()).await;
        assert_eq!(reports.len(), 3);
        assert!(reports[0].is_complete());
        assert!(!reports[1].is_complete());
        assert_eq!(reports[1].url, "http://127.0.0.1:9/");
        assert!(reports[2].is_complete());
        assert_eq!(reports[0], reports[2]);
    }

    #[tokio::test]
    async fn test_page_fetch_stops_after_five_redirects() {
        let server = MockServer::start().await;
        for i in 0..5 {
            let next = format!("{}/p{}", server.uri(), i + 1);
            Mock::given(method("GET"))
                .and(path(format!("/p{}", i)))
                .respond_with(ResponseTemplate::new(302).insert_header("Location", next.as_str()))
                .mount(&server)
                .await;
        }
        // Fifth hop lands here; its redirect to /p6 would be the sixth
        let last = format!("{}/p6", server.uri());
        Mock::given(method("GET"))
            .and(path("/p5"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("Location", last.as_str())
                    .set_body_raw("<html><head><title>Moved</title></head><body><h1>Moved</h1></body></html>", "text/html"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/p6"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("<h2>Final</h2>", "text/html"))
            .expect(0)
            .mount(&server)
            .await;

        let report = analyze(&format!("{}/p0", server.uri()), &AnalyzerConfig::default()).await;

        assert!(report.is_complete(), "unexpected error: {:?}", report.error);
        assert_eq!(report.page_title, "Moved");
        assert_eq!(report.heading_counts.get("H1"), Some(&1));
        assert_eq!(report.heading_counts.get("H2"), None);
    }

    #[test]
    fn test_page_host_keeps_explicit_port() {
        assert_eq!(page_host("http://example.com:8080/a").unwrap(), "example.com:8080");
        assert_eq!(page_host("https://example.com/").unwrap(), "example.com");
    }
}
