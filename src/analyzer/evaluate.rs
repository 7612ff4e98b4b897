//! State evaluation of a single discovered item.

use crate::analyzer::cluster;
use crate::types::{EvaluationResult, Section, ServiceRecord, Severity};
use serde::{Deserialize, Serialize};

/// Maps an expected service state to a monitoring state. A missing
/// expected state matches any service state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRule {
    #[serde(default)]
    pub state: Option<String>,
    pub severity: Severity,
}

impl StateRule {
    pub fn new(state: Option<&str>, severity: Severity) -> Self {
        Self {
            state: state.map(str::to_string),
            severity,
        }
    }

    pub fn matches(&self, service: &ServiceRecord) -> bool {
        match &self.state {
            Some(expected) => service.state_is(expected),
            None => true,
        }
    }
}

/// Check parameters of one item. `states` is a priority list: the first
/// matching entry decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchParameters {
    #[serde(default = "default_states")]
    pub states: Vec<StateRule>,
    #[serde(rename = "else", default = "default_else")]
    pub default_severity: Severity,
    #[serde(default)]
    pub additional_service_names: Vec<String>,
}

fn default_states() -> Vec<StateRule> {
    vec![StateRule::new(Some("Started"), Severity::Ok)]
}

fn default_else() -> Severity {
    Severity::Crit
}

impl Default for MatchParameters {
    fn default() -> Self {
        Self {
            states: default_states(),
            default_severity: default_else(),
            additional_service_names: Vec::new(),
        }
    }
}

impl MatchParameters {
    /// Whether a record belongs to `item`, directly or via an alternative name.
    pub fn selects(&self, item: &str, service: &ServiceRecord) -> bool {
        service.name == item || self.additional_service_names.iter().any(|n| *n == service.name)
    }

    pub fn severity_for(&self, service: &ServiceRecord) -> Severity {
        self.states
            .iter()
            .find(|rule| rule.matches(service))
            .map(|rule| rule.severity)
            .unwrap_or(self.default_severity)
    }
}

/// `"{name}: {state}"`, with `" {code}: {text}"` appended for positive reason codes.
pub fn describe(service: &ServiceRecord) -> String {
    let mut message = format!("{}: {}", service.name, service.state);
    if service.reason_code > 0 {
        message.push_str(&format!(" {}: {}", service.reason_code, service.reason_text));
    }
    message
}

pub fn evaluate_record(service: &ServiceRecord, params: &MatchParameters) -> EvaluationResult {
    EvaluationResult::new(params.severity_for(service), describe(service))
}

/// One result per record selected for `item`, in section order.
pub fn matching_results(
    item: &str,
    params: &MatchParameters,
    section: &Section,
) -> Vec<EvaluationResult> {
    section
        .iter()
        .filter(|service| params.selects(item, service))
        .map(|service| evaluate_record(service, params))
        .collect()
}

/// Evaluate `item` against the live section.
///
/// A missing item is not an error: it yields the default severity with
/// "service not found". Several matching records are resolved like cluster
/// nodes, best state wins.
pub fn evaluate(item: &str, params: &MatchParameters, section: Option<&Section>) -> EvaluationResult {
    let results = section
        .map(|s| matching_results(item, params, s))
        .unwrap_or_default();

    cluster::pick_best(results).unwrap_or_else(|| EvaluationResult::not_found(params.default_severity))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, state: &str) -> ServiceRecord {
        ServiceRecord::new(name, state, 0, "")
    }

    #[test]
    fn test_started_is_ok_by_default() {
        let section = Section::new(vec![record("A", "Started")]);
        let result = evaluate("A", &MatchParameters::default(), Some(&section));
        assert_eq!(result.severity, Severity::Ok);
        assert_eq!(result.message, "A: Started");
        assert!(result.source_node.is_none());
    }

    #[test]
    fn test_any_other_state_is_crit_by_default() {
        for state in ["Stopped", "Starting", "Unknown", ""] {
            let section = Section::new(vec![record("A", state)]);
            let result = evaluate("A", &MatchParameters::default(), Some(&section));
            assert_eq!(result.severity, Severity::Crit, "state {:?}", state);
        }
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let params = MatchParameters {
            states: vec![
                StateRule::new(Some("stopped"), Severity::Warn),
                StateRule::new(None, Severity::Unknown),
                StateRule::new(Some("stopped"), Severity::Crit),
            ],
            default_severity: Severity::Crit,
            additional_service_names: Vec::new(),
        };
        let section = Section::new(vec![record("A", "Stopped"), record("B", "Started")]);
        assert_eq!(evaluate("A", &params, Some(&section)).severity, Severity::Warn);
        assert_eq!(evaluate("B", &params, Some(&section)).severity, Severity::Unknown);
    }

    #[test]
    fn test_no_rule_matches_uses_else() {
        let params = MatchParameters {
            states: vec![StateRule::new(Some("started"), Severity::Ok)],
            default_severity: Severity::Warn,
            additional_service_names: Vec::new(),
        };
        let section = Section::new(vec![record("A", "Stopped")]);
        assert_eq!(evaluate("A", &params, Some(&section)).severity, Severity::Warn);
    }

    #[test]
    fn test_missing_item() {
        let params = MatchParameters {
            default_severity: Severity::Unknown,
            ..MatchParameters::default()
        };
        let section = Section::new(vec![record("A", "Started")]);
        let result = evaluate("B", &params, Some(&section));
        assert_eq!(result, EvaluationResult::not_found(Severity::Unknown));
        assert_eq!(result.message, "service not found");
        assert_eq!(evaluate("B", &params, None), result);
    }

    #[test]
    fn test_reason_only_for_positive_codes() {
        let positive = ServiceRecord::new("A", "Stopped", 5, "Commanded Out of Service");
        assert_eq!(describe(&positive), "A: Stopped 5: Commanded Out of Service");

        let zero = ServiceRecord::new("A", "Stopped", 0, "ignored");
        assert_eq!(describe(&zero), "A: Stopped");

        let negative = ServiceRecord::new("A", "Stopped", -1068, "Service Not Activated");
        assert_eq!(describe(&negative), "A: Stopped");
    }

    #[test]
    fn test_additional_names_fan_in() {
        let params = MatchParameters {
            additional_service_names: vec!["Cisco CallManager Old".to_string()],
            ..MatchParameters::default()
        };
        let section = Section::new(vec![
            record("Cisco CallManager", "Stopped"),
            record("Cisco CallManager Old", "Started"),
        ]);
        let result = evaluate("Cisco CallManager", &params, Some(&section));
        assert_eq!(result.severity, Severity::Ok);
        assert_eq!(result.message, "Cisco CallManager Old: Started");
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let params = MatchParameters::default();
        let section = Section::new(vec![record("A", "Stopped"), record("A", "Started")]);
        let first = evaluate("A", &params, Some(&section));
        let second = evaluate("A", &params, Some(&section));
        assert_eq!(first, second);
    }
}
