//! Cross-node resolution for items monitored on a cluster.

use crate::analyzer::evaluate::{self, MatchParameters};
use crate::types::{CheckResult, EvaluationResult, Section, Severity};
use serde::Serialize;
use tracing::debug;

/// Outcome of reconciling per-node results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregated {
    pub result: EvaluationResult,
    /// "Running on: {node}", absent for critical results.
    pub provenance: Option<String>,
}

impl Aggregated {
    pub fn into_check_results(self) -> Vec<CheckResult> {
        let severity = self.result.severity;
        let mut results = vec![CheckResult::from(self.result)];
        if let Some(note) = self.provenance {
            results.push(CheckResult::summary(severity, note));
        }
        results
    }
}

/// Best (lowest) severity wins; among equally good results the last one
/// in input order is taken.
pub fn pick_best(results: Vec<EvaluationResult>) -> Option<EvaluationResult> {
    let best = Severity::best(results.iter().map(|r| r.severity))?;
    results.into_iter().rev().find(|r| r.severity == best)
}

/// Resolve one authoritative result from `(node, result)` pairs.
pub fn aggregate(per_node: Vec<(String, EvaluationResult)>, default: Severity) -> Aggregated {
    let stamped = per_node
        .into_iter()
        .map(|(node, result)| result.on_node(&node))
        .collect();

    let Some(result) = pick_best(stamped) else {
        return Aggregated {
            result: EvaluationResult::not_found(default),
            provenance: None,
        };
    };

    let provenance = match (&result.source_node, result.severity) {
        (_, Severity::Crit) => None,
        (Some(node), _) if !node.is_empty() => Some(format!("Running on: {}", node)),
        _ => None,
    };

    Aggregated { result, provenance }
}

/// Evaluate `item` on every node and reconcile. Nodes without data or
/// without the item do not take part.
pub fn evaluate_cluster(
    item: &str,
    params: &MatchParameters,
    nodes: &[(String, Option<Section>)],
) -> Aggregated {
    let mut found = Vec::new();

    for (node, section) in nodes {
        let Some(section) = section else {
            debug!("Node {} has no data", node);
            continue;
        };
        let results = evaluate::matching_results(item, params, section);
        if let Some(result) = pick_best(results) {
            found.push((node.clone(), result));
        }
    }

    aggregate(found, params.default_severity)
}
