// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Analyze every URL given on the command line
// 4. Print the reports (summary or JSON)
// 5. Exit with proper code (0 = all good, 1 = broken links or failed
//    analyses, 2 = error)
// =============================================================================

mod cli;

use clap::Parser;
use cli::Cli;
use log::LevelFilter;

use page_inspector::{analyze, analyze_batch, AnalysisReport};

// anyhow::Result lets us return any error type with the ? operator
use anyhow::Result;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every page analyzed, no broken links
//   Ok(1) = broken links found, or some page couldn't be analyzed
//   Err = unexpected error
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    let config = cli.analyzer_config();

    let reports = if let [url] = cli.urls.as_slice() {
        vec![analyze(url, &config).await]
    } else {
        analyze_batch(&cli.urls, &config).await
    };

    print_reports(&reports, cli.json)?;

    let all_clean = reports
        .iter()
        .all(|report| report.is_complete() && report.broken_link_count == 0);

    Ok(if all_clean { 0 } else { 1 })
}

// RUST_LOG is read first; --log-level overrides it when given
//
// The HTML parser and HTTP stack are chatty at debug level, so they are
// held at warn unless RUST_LOG asks for them by name.
fn init_logger(level: Option<LevelFilter>) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    for noisy in ["html5ever", "selectors", "hyper", "reqwest"] {
        builder.filter_module(noisy, LevelFilter::Warn);
    }
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if let Some(level) = level {
        builder.filter_module("page_inspector", level);
    }
    builder.init();
}

fn print_reports(reports: &[AnalysisReport], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(reports)?;
        println!("{}", json_output);
    } else {
        for report in reports {
            print_summary(report);
        }
    }
    Ok(())
}

// Prints one report in a human-readable form
fn print_summary(report: &AnalysisReport) {
    println!("🔍 {}", report.url);

    if let Some(error) = &report.error {
        println!("   ⚠️  {}", error);
        println!();
        return;
    }

    let title = if report.page_title.is_empty() {
        "(none)"
    } else {
        report.page_title.as_str()
    };

    println!("   HTML version:   {}", report.html_version);
    println!("   Title:          {}", title);
    println!("   Internal links: {}", report.internal_links);
    println!("   External links: {}", report.external_links);
    println!("   Login form:     {}", if report.has_login_form { "yes" } else { "no" });

    if !report.heading_counts.is_empty() {
        let headings: Vec<String> = report
            .heading_counts
            .iter()
            .map(|(level, count)| format!("{}: {}", level, count))
            .collect();
        println!("   Headings:       {}", headings.join(", "));
    }

    if report.broken_links.is_empty() {
        println!("   ✅ No broken links");
    } else {
        println!("   ❌ Broken links: {}", report.broken_link_count);
        println!();
        print_broken_table(report);
    }
    println!();
}

fn print_broken_table(report: &AnalysisReport) {
    println!("   {:<60} {:<8} {:<30}", "URL", "STATUS", "ERROR");
    println!("   {}", "=".repeat(100));

    for link in &report.broken_links {
        // Truncate URL if too long for display
        let url_display = if link.url.chars().count() > 57 {
            format!("{}...", link.url.chars().take(57).collect::<String>())
        } else {
            link.url.clone()
        };

        println!(
            "   {:<60} {:<8} {:<30}",
            url_display, link.status_code, link.error_message
        );
    }
}
