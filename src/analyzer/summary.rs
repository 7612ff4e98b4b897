//! Fleet-wide started/stopped counts, independent of per-item rules.

use crate::analyzer::matcher::Matcher;
use crate::types::{CheckResult, Section, Severity};
use serde::{Deserialize, Serialize};

/// Settings of the "Service Summary" check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryParams {
    /// Stopped services matching one of these prefix patterns are only counted.
    #[serde(default)]
    pub ignored: Vec<String>,
    #[serde(default = "default_state_if_stopped")]
    pub state_if_stopped: Severity,
    /// Also run the legacy "Services" overview check.
    #[serde(default)]
    pub legacy_overview: bool,
}

fn default_state_if_stopped() -> Severity {
    Severity::Ok
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub started: usize,
    pub stopped: Vec<String>,
    pub ignored: usize,
}

/// Classify every record as started, stopped or stopped-but-ignored.
/// Records in any other state are only part of the total.
pub fn summarize(section: &Section, ignored: &[Matcher]) -> Summary {
    let mut summary = Summary {
        total: section.len(),
        ..Summary::default()
    };

    for service in section {
        if service.state_is("started") {
            summary.started += 1;
        } else if service.state_is("stopped") {
            if ignored.iter().any(|m| m.matches(&service.name)) {
                summary.ignored += 1;
            } else {
                summary.stopped.push(service.name.clone());
            }
        }
    }

    summary
}

impl Summary {
    pub fn results(&self, severity_if_stopped: Severity) -> Vec<CheckResult> {
        let mut results = vec![CheckResult::summary(
            Severity::Ok,
            format!("Started services: {}", self.started),
        )
        .with_details(format!(
            "Started services: {}\nServices found in total: {}",
            self.started, self.total
        ))];

        let stopped = CheckResult::summary(
            if self.stopped.is_empty() {
                Severity::Ok
            } else {
                severity_if_stopped
            },
            format!("Stopped services: {}", self.stopped.len()),
        );
        results.push(if self.stopped.is_empty() {
            stopped
        } else {
            stopped.with_details(format!("Stopped services: {}", self.stopped.join(", ")))
        });

        if self.ignored > 0 {
            results.push(CheckResult::notice(
                Severity::Ok,
                format!("Stopped but ignored: {}", self.ignored),
            ));
        }

        results
    }
}
