//! JSON output format for detection results
//!
//! `--format json`: one document holding the summary and either the
//! result rows or the paradox views. Undefined trend values serialize as
//! `null`.

use crate::error::Result;
use crate::results::{ResultTable, View};
use serde::Serialize;

/// Run summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JsonSummary {
    /// Rows produced by the engine before any filtering
    pub total_rows: usize,
    /// Rows flagged by the paradox policy
    pub flagged_rows: usize,
    /// Distinct views among the flagged rows
    pub views: usize,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Crate version that produced the document
    pub version: String,
    /// Format name
    pub format: String,
    /// Name of the paradox policy used for flagging
    pub policy: String,
    pub summary: JsonSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<ResultTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<Vec<View>>,
}

impl JsonOutput {
    pub fn new(policy: impl Into<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "detect-sp-json-v1".to_string(),
            policy: policy.into(),
            summary: JsonSummary::default(),
            rows: None,
            views: None,
        }
    }

    pub fn set_summary(&mut self, summary: JsonSummary) {
        self.summary = summary;
    }

    pub fn set_rows(&mut self, rows: ResultTable) {
        self.rows = Some(rows);
    }

    pub fn set_views(&mut self, views: Vec<View>) {
        self.views = Some(views);
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
