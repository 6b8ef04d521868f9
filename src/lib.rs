// src/lib.rs
// =============================================================================
// page-inspector: fetch one web page and report on it.
//
// The report covers:
// - the HTML version from the DOCTYPE
// - the page title
// - how many <h1>..<h6> headings there are
// - internal vs external links, and which links are broken
// - whether the page has a login form
//
// Entry points: `analyze` for one URL, `analyze_batch` for several.
// =============================================================================

pub mod analyzer;
pub mod config;
pub mod error;
pub mod record;
pub mod report;

pub use analyzer::{analyze, analyze_batch};
pub use config::AnalyzerConfig;
pub use error::AnalyzeError;
pub use record::{AnalysisRecord, BrokenLinkRow, HeadingCountRow};
pub use report::{AnalysisReport, BrokenLinkDetail, HtmlVersion};
