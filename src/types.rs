//! Shared data types for service records, severities and check results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Monitoring state. Lower is better; `best` is the minimum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Severity {
    #[default]
    Ok = 0,
    Warn = 1,
    Crit = 2,
    Unknown = 3,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Warn => "WARN",
            Severity::Crit => "CRIT",
            Severity::Unknown => "UNKNOWN",
        }
    }

    /// Best (minimum) severity of the given states, `None` for an empty input.
    pub fn best<I: IntoIterator<Item = Severity>>(states: I) -> Option<Severity> {
        states.into_iter().min()
    }

    /// Worst (maximum) severity of the given states, `Ok` for an empty input.
    pub fn worst<I: IntoIterator<Item = Severity>>(states: I) -> Severity {
        states.into_iter().max().unwrap_or(Severity::Ok)
    }

    /// Process exit code for this state.
    pub fn exit_code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<u8> for Severity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Severity::Ok),
            1 => Ok(Severity::Warn),
            2 => Ok(Severity::Crit),
            3 => Ok(Severity::Unknown),
            other => Err(format!("invalid monitoring state {} (expected 0-3)", other)),
        }
    }
}

impl From<Severity> for u8 {
    fn from(value: Severity) -> Self {
        value as u8
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One service as reported by the Control Center Services API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub name: String,
    pub state: String,
    pub reason_code: i64,
    pub reason_text: String,
}

impl ServiceRecord {
    pub fn new(name: &str, state: &str, reason_code: i64, reason_text: &str) -> Self {
        Self {
            name: name.to_string(),
            state: state.to_string(),
            reason_code,
            reason_text: reason_text.to_string(),
        }
    }

    /// Case-insensitive comparison of the current state.
    pub fn state_is(&self, expected: &str) -> bool {
        self.state.eq_ignore_ascii_case(expected)
    }
}

/// All records of one polling cycle, in the order they were fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    records: Vec<ServiceRecord>,
}

impl Section {
    pub fn new(records: Vec<ServiceRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ServiceRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ServiceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Section {
    type Item = &'a ServiceRecord;
    type IntoIter = std::slice::Iter<'a, ServiceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Severity computed for one item, optionally attributed to a cluster node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_node: Option<String>,
}

impl EvaluationResult {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            source_node: None,
        }
    }

    pub fn not_found(default: Severity) -> Self {
        Self::new(default, "service not found")
    }

    pub fn on_node(mut self, node: &str) -> Self {
        self.source_node = Some(node.to_string());
        self
    }
}

/// One line of check output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub severity: Severity,
    pub text: String,
    /// Notices only show up in the long output, not in the summary line.
    #[serde(default)]
    pub notice: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CheckResult {
    pub fn summary(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
            notice: false,
            details: None,
        }
    }

    pub fn notice(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            notice: true,
            ..Self::summary(severity, text)
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<EvaluationResult> for CheckResult {
    fn from(result: EvaluationResult) -> Self {
        CheckResult::summary(result.severity, result.message)
    }
}

/// All results of one monitored service ("Service CallManager", "Service Summary", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub service: String,
    pub results: Vec<CheckResult>,
}

impl CheckOutcome {
    pub fn new(service: impl Into<String>, results: Vec<CheckResult>) -> Self {
        Self {
            service: service.into(),
            results,
        }
    }

    pub fn state(&self) -> Severity {
        Severity::worst(self.results.iter().map(|r| r.severity))
    }
}
