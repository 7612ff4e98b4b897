//! Discovery: decides which services become monitored items.

use crate::analyzer::matcher::Matcher;
use crate::types::{Section, ServiceRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Service states a discovery rule can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Started,
    Stopped,
}

impl ServiceState {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceState::Started => "Started",
            ServiceState::Stopped => "Stopped",
        }
    }
}

/// State filter of the implicit rule used when no groups are configured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultState {
    Any,
    #[default]
    Started,
    Stopped,
}

impl DefaultState {
    pub fn expected(self) -> Option<&'static str> {
        match self {
            DefaultState::Any => None,
            DefaultState::Started => Some(ServiceState::Started.as_str()),
            DefaultState::Stopped => Some(ServiceState::Stopped.as_str()),
        }
    }
}

/// One configured discovery rule group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryRuleGroup {
    /// Regex bodies matched against the beginning of the service name.
    #[serde(default)]
    pub service_patterns: Vec<String>,
    /// Only discover services currently in this state.
    #[serde(default)]
    pub state: Option<ServiceState>,
}

/// Discovery settings of one host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryParams {
    #[serde(default)]
    pub rules: Vec<DiscoveryRuleGroup>,
    #[serde(default)]
    pub default_state: DefaultState,
}

impl DiscoveryParams {
    /// Expand the configured groups into individual rules.
    pub fn compile(&self) -> Result<Vec<DiscoveryRule>, regex::Error> {
        if self.rules.is_empty() {
            return Ok(vec![DiscoveryRule {
                matcher: Matcher::Wildcard,
                expected_state: self.default_state.expected().map(str::to_string),
            }]);
        }
        expand(&self.rules)
    }
}

/// A single `(name matcher, expected state)` pair.
#[derive(Debug, Clone)]
pub struct DiscoveryRule {
    pub matcher: Matcher,
    pub expected_state: Option<String>,
}

impl DiscoveryRule {
    pub fn matches(&self, service: &ServiceRecord) -> bool {
        if !self.matcher.matches(&service.name) {
            return false;
        }
        match &self.expected_state {
            Some(state) => service.state_is(state),
            None => true,
        }
    }
}

/// One rule per name pattern, all sharing the group's state; a group
/// without patterns becomes a single wildcard rule.
pub fn expand(groups: &[DiscoveryRuleGroup]) -> Result<Vec<DiscoveryRule>, regex::Error> {
    let mut rules = Vec::new();

    for group in groups {
        let expected_state = group.state.map(|s| s.as_str().to_string());
        if group.service_patterns.is_empty() {
            rules.push(DiscoveryRule {
                matcher: Matcher::Wildcard,
                expected_state,
            });
            continue;
        }
        for pattern in &group.service_patterns {
            rules.push(DiscoveryRule {
                matcher: Matcher::prefix(pattern)?,
                expected_state: expected_state.clone(),
            });
        }
    }

    Ok(rules)
}

/// Names of all services matched by at least one rule, in section order and
/// without duplicates. No section means nothing to discover.
pub fn discover(rules: &[DiscoveryRule], section: Option<&Section>) -> Vec<String> {
    let Some(section) = section else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for service in section {
        for rule in rules {
            if rule.matches(service) && seen.insert(service.name.as_str()) {
                items.push(service.name.clone());
            }
        }
    }

    debug!("Discovered {} of {} services", items.len(), section.len());
    items
}

/// The summary service exists whenever the host reported any service.
pub fn discover_summary(section: Option<&Section>) -> bool {
    section.is_some_and(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(rows: &[(&str, &str)]) -> Section {
        Section::new(
            rows.iter()
                .map(|(name, state)| ServiceRecord::new(name, state, 0, ""))
                .collect(),
        )
    }

    #[test]
    fn test_default_discovers_started_services() {
        let s = section(&[("A", "Started"), ("B", "Stopped"), ("C", "STARTED")]);
        let rules = DiscoveryParams::default().compile().unwrap();
        assert_eq!(discover(&rules, Some(&s)), vec!["A", "C"]);
    }

    #[test]
    fn test_default_without_state_discovers_everything() {
        let s = section(&[("A", "Started"), ("B", "Stopped")]);
        let params = DiscoveryParams {
            rules: Vec::new(),
            default_state: DefaultState::Any,
        };
        assert_eq!(discover(&params.compile().unwrap(), Some(&s)), vec!["A", "B"]);
    }

    #[test]
    fn test_case_insensitive_pattern_any_order() {
        let groups = vec![DiscoveryRuleGroup {
            service_patterns: vec!["(?i).*callmanager".to_string()],
            state: None,
        }];
        let rules = expand(&groups).unwrap();

        let forward = section(&[("CallManager", "Started"), ("Tftp", "Started")]);
        let reverse = section(&[("Tftp", "Started"), ("CallManager", "Started")]);
        assert_eq!(discover(&rules, Some(&forward)), vec!["CallManager"]);
        assert_eq!(discover(&rules, Some(&reverse)), vec!["CallManager"]);
    }

    #[test]
    fn test_group_expansion_shares_state() {
        let groups = vec![
            DiscoveryRuleGroup {
                service_patterns: vec!["A".to_string(), "B".to_string()],
                state: Some(ServiceState::Stopped),
            },
            DiscoveryRuleGroup::default(),
        ];
        let rules = expand(&groups).unwrap();
        assert_eq!(rules.len(), 3);
        assert_eq!(rules[1].expected_state.as_deref(), Some("Stopped"));
        assert!(matches!(rules[2].matcher, Matcher::Wildcard));
        assert!(rules[2].expected_state.is_none());
    }

    #[test]
    fn test_state_filter_is_case_insensitive() {
        let groups = vec![DiscoveryRuleGroup {
            service_patterns: vec!["Cisco".to_string()],
            state: Some(ServiceState::Stopped),
        }];
        let rules = expand(&groups).unwrap();
        let s = section(&[("Cisco Tftp", "stopped"), ("Cisco DRF", "Started")]);
        assert_eq!(discover(&rules, Some(&s)), vec!["Cisco Tftp"]);
    }

    #[test]
    fn test_multiple_matching_rules_yield_one_item() {
        let groups = vec![DiscoveryRuleGroup {
            service_patterns: vec!["Cisco".to_string(), "(?i)cisco".to_string()],
            state: None,
        }];
        let rules = expand(&groups).unwrap();
        let s = section(&[("Cisco Tftp", "Started")]);
        assert_eq!(discover(&rules, Some(&s)), vec!["Cisco Tftp"]);
    }

    #[test]
    fn test_no_section_discovers_nothing() {
        let rules = DiscoveryParams::default().compile().unwrap();
        assert!(discover(&rules, None).is_empty());
        assert!(!discover_summary(None));
        assert!(discover_summary(Some(&section(&[("A", "Stopped")]))));
    }
}
