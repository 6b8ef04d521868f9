// src/report.rs
// =============================================================================
// The report produced for one analysed page.
//
// A report is created once per analysis, filled in during the walk over the
// HTML tree, then handed back to the caller and never touched again.
//
// If the page couldn't be fetched or parsed, `error` is set and every other
// field keeps its default value.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::AnalyzeError;

// The HTML flavour announced by the page's DOCTYPE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HtmlVersion {
    #[default]
    #[serde(rename = "HTML5")]
    Html5,
    #[serde(rename = "HTML 4.01")]
    Html401,
    #[serde(rename = "XHTML")]
    Xhtml,
}

impl HtmlVersion {
    // Maps DOCTYPE text to a version
    //
    // Case-insensitive substring search, "4.01" checked before "xhtml" so
    // an XHTML-looking HTML 4.01 doctype still reports HTML 4.01.
    pub fn from_doctype(doctype: &str) -> Self {
        let doctype = doctype.to_ascii_lowercase();
        if doctype.contains("4.01") {
            HtmlVersion::Html401
        } else if doctype.contains("xhtml") {
            HtmlVersion::Xhtml
        } else {
            HtmlVersion::Html5
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HtmlVersion::Html5 => "HTML5",
            HtmlVersion::Html401 => "HTML 4.01",
            HtmlVersion::Xhtml => "XHTML",
        }
    }
}

impl fmt::Display for HtmlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound link that failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLinkDetail {
    /// The absolute URL that was checked
    pub url: String,
    /// HTTP status, or 0 when no response was received
    pub status_code: u16,
    #[serde(rename = "error")]
    pub error_message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// The page URL exactly as requested
    pub url: String,
    pub html_version: HtmlVersion,
    /// Empty when the page has no title inside <head>
    pub page_title: String,
    pub internal_links: usize,
    pub external_links: usize,
    #[serde(rename = "brokenLinks")]
    pub broken_link_count: usize,
    pub has_login_form: bool,
    /// Keyed "H1".."H6"; only levels that occur are present
    pub heading_counts: BTreeMap<String, usize>,
    /// In document order
    #[serde(rename = "brokenLinkDetails")]
    pub broken_links: Vec<BrokenLinkDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisReport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    // A report for an analysis that ended early: only url and error are set
    pub fn failed(url: impl Into<String>, error: &AnalyzeError) -> Self {
        Self {
            url: url.into(),
            error: Some(error.to_string()),
            ..Self::default()
        }
    }

    /// True when the analysis ran to the end. Only complete reports should
    /// be persisted.
    pub fn is_complete(&self) -> bool {
        self.error.as_deref().map_or(true, str::is_empty)
    }

    pub fn record_broken_link(&mut self, detail: BrokenLinkDetail) {
        self.broken_links.push(detail);
        self.broken_link_count += 1;
    }

    pub(crate) fn count_heading(&mut self, level: String) {
        *self.heading_counts.entry(level).or_insert(0) += 1;
    }
}
