// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::Parser;
use log::LevelFilter;
use std::time::Duration;

use page_inspector::config::{
    AnalyzerConfig, DEFAULT_LINK_CONCURRENCY, DEFAULT_MAX_REDIRECTS, DEFAULT_PAGE_CONCURRENCY,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "page-inspector",
    version = "0.1.0",
    about = "Analyze web pages: HTML version, title, headings, links, broken links and login forms",
    long_about = "page-inspector fetches each URL, parses the HTML and reports its HTML version, \
                  title, heading counts, internal and external links, broken links and whether \
                  the page contains a login form."
)]
pub struct Cli {
    /// One or more page URLs to analyze (e.g., https://example.com)
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Output results in JSON format instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Timeout in seconds for each request (page fetch or link check)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Redirect hops to follow before using the last response as-is
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Don't retry a failed HEAD check with GET
    #[arg(long)]
    pub no_head_fallback: bool,

    /// Count links without checking whether they work
    #[arg(long)]
    pub no_verify: bool,

    /// Link checks to run at once for each page
    #[arg(long, default_value_t = DEFAULT_LINK_CONCURRENCY)]
    pub concurrency: usize,

    /// Pages to analyze at once when several URLs are given
    #[arg(long, default_value_t = DEFAULT_PAGE_CONCURRENCY)]
    pub page_concurrency: usize,

    /// Log level (off, error, warn, info, debug, trace); overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<LevelFilter>,
}

impl Cli {
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            timeout: Duration::from_secs(self.timeout),
            max_redirects: self.max_redirects,
            user_agent: self.user_agent.clone(),
            head_fallback: !self.no_head_fallback,
            verify_links: !self.no_verify,
            link_concurrency: self.concurrency,
            page_concurrency: self.page_concurrency,
        }
    }
}
