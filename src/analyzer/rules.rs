//! Rule engine: compiles the configured rules and runs discovery plus every
//! check against the sections of one host or cluster.

use crate::analyzer::cluster;
use crate::analyzer::discovery::{self, DiscoveryRule};
use crate::analyzer::evaluate::{self, MatchParameters};
use crate::analyzer::legacy;
use crate::analyzer::matcher::{self, Matcher};
use crate::analyzer::summary;
use crate::config::Config;
use crate::error::ConfigError;
use crate::types::{CheckOutcome, CheckResult, Section, Severity};
use std::collections::HashSet;
use tracing::{debug, info};

pub const SUMMARY_SERVICE: &str = "Service Summary";
pub const OVERVIEW_SERVICE: &str = "Services";

/// Name of the monitoring service of a discovered item.
pub fn service_name(item: &str) -> String {
    format!("Service {}", item)
}

/// Sections keyed by node name. A plain host is a single entry.
pub type NodeSections = [(String, Option<Section>)];

/// Configuration with all patterns compiled.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    pub discovery: Vec<DiscoveryRule>,
    pub check: MatchParameters,
    pub ignored: Vec<Matcher>,
    pub state_if_stopped: Severity,
    pub legacy_overview: bool,
}

impl CompiledRules {
    pub fn compile(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            discovery: config.discovery.compile()?,
            check: config.check.clone(),
            ignored: matcher::compile_all(&config.summary.ignored)?,
            state_if_stopped: config.summary.state_if_stopped,
            legacy_overview: config.summary.legacy_overview,
        })
    }
}

/// Items discovered on any node, first occurrence first.
pub fn discover_items(rules: &CompiledRules, nodes: &NodeSections) -> Vec<String> {
    let mut seen = HashSet::new();
    nodes
        .iter()
        .flat_map(|(_, section)| discovery::discover(&rules.discovery, section.as_ref()))
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Run discovery and all checks.
pub fn analyze(rules: &CompiledRules, nodes: &NodeSections) -> Vec<CheckOutcome> {
    let clustered = nodes.len() > 1;
    let mut outcomes = Vec::new();

    for item in discover_items(rules, nodes) {
        let results = if clustered {
            cluster::evaluate_cluster(&item, &rules.check, nodes).into_check_results()
        } else {
            let section = nodes.first().and_then(|(_, s)| s.as_ref());
            vec![CheckResult::from(evaluate::evaluate(&item, &rules.check, section))]
        };
        outcomes.push(CheckOutcome::new(service_name(&item), results));
    }

    for (node, section) in nodes {
        let Some(section) = section else {
            debug!("No data from {}", node);
            continue;
        };
        let suffix = if clustered {
            format!(" ({})", node)
        } else {
            String::new()
        };

        if discovery::discover_summary(Some(section)) {
            let results = summary::summarize(section, &rules.ignored).results(rules.state_if_stopped);
            outcomes.push(CheckOutcome::new(format!("{}{}", SUMMARY_SERVICE, suffix), results));
        }
        if rules.legacy_overview && legacy::discover_overview(Some(section)) {
            outcomes.push(CheckOutcome::new(
                format!("{}{}", OVERVIEW_SERVICE, suffix),
                legacy::check_overview(section),
            ));
        }
    }

    info!("Produced {} check outcomes from {} node(s)", outcomes.len(), nodes.len());
    outcomes
}
