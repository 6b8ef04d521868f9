// src/record.rs
// =============================================================================
// The row shape a storage layer keeps for a report.
//
// One parent record holds the scalar fields; heading counts and broken links
// become two child collections that belong to it. This module only converts
// between that shape and `AnalysisReport`; it does no I/O.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::report::{AnalysisReport, BrokenLinkDetail, HtmlVersion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingCountRow {
    pub level: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenLinkRow {
    pub url: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub url: String,
    pub html_version: HtmlVersion,
    pub page_title: String,
    pub internal_links: usize,
    pub external_links: usize,
    pub broken_links: usize,
    pub has_login_form: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// Child rows, ordered by level
    pub heading_counts: Vec<HeadingCountRow>,
    /// Child rows, in document order
    pub broken_link_rows: Vec<BrokenLinkRow>,
}

impl From<&AnalysisReport> for AnalysisRecord {
    fn from(report: &AnalysisReport) -> Self {
        Self {
            url: report.url.clone(),
            html_version: report.html_version,
            page_title: report.page_title.clone(),
            internal_links: report.internal_links,
            external_links: report.external_links,
            broken_links: report.broken_link_count,
            has_login_form: report.has_login_form,
            error: report.error.clone().unwrap_or_default(),
            heading_counts: report
                .heading_counts
                .iter()
                .map(|(level, count)| HeadingCountRow {
                    level: level.clone(),
                    count: *count,
                })
                .collect(),
            broken_link_rows: report
                .broken_links
                .iter()
                .map(|link| BrokenLinkRow {
                    url: link.url.clone(),
                    status_code: link.status_code,
                    error: link.error_message.clone(),
                })
                .collect(),
        }
    }
}

impl From<AnalysisRecord> for AnalysisReport {
    fn from(record: AnalysisRecord) -> Self {
        Self {
            url: record.url,
            html_version: record.html_version,
            page_title: record.page_title,
            internal_links: record.internal_links,
            external_links: record.external_links,
            broken_link_count: record.broken_links,
            has_login_form: record.has_login_form,
            heading_counts: record
                .heading_counts
                .into_iter()
                .map(|row| (row.level, row.count))
                .collect(),
            broken_links: record
                .broken_link_rows
                .into_iter()
                .map(|row| BrokenLinkDetail {
                    url: row.url,
                    status_code: row.status_code,
                    error_message: row.error,
                })
                .collect(),
            error: Some(record.error).filter(|e| !e.is_empty()),
        }
    }
}
