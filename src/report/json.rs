//! JSON report.

use crate::types::{CheckOutcome, Severity};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub host: &'a str,
    pub nodes: &'a [String],
    pub state: Severity,
    pub outcomes: &'a [CheckOutcome],
}

pub fn generate(host: &str, nodes: &[String], outcomes: &[CheckOutcome]) -> serde_json::Result<String> {
    let report = Report {
        host,
        nodes,
        state: Severity::worst(outcomes.iter().map(CheckOutcome::state)),
        outcomes,
    };
    serde_json::to_string_pretty(&report)
}
