//! Text report generator.

use crate::types::{CheckOutcome, Severity};

pub fn generate(host: &str, nodes: &[String], outcomes: &[CheckOutcome], runtime_secs: f64) -> String {
    let mut out = String::new();
    let line = "─".repeat(72);

    out.push_str(&line);
    out.push('\n');
    out.push_str("  Cisco UCM Services\n");
    out.push_str(&line);
    out.push('\n');
    out.push_str(&format!("  Host:      {}\n", host));
    if nodes.len() > 1 {
        out.push_str(&format!("  Nodes:     {}\n", nodes.join(", ")));
    }
    out.push_str(&format!("  Runtime:   {:.1}s\n", runtime_secs));
    out.push_str(&line);
    out.push('\n');

    out.push_str("\n== CHECKS ==\n\n");
    if outcomes.is_empty() {
        out.push_str("  No services discovered.\n");
    } else {
        let count = |s: Severity| outcomes.iter().filter(|o| o.state() == s).count();
        out.push_str(&format!(
            "  Total: {} OK, {} WARNING, {} CRITICAL, {} UNKNOWN\n\n",
            count(Severity::Ok),
            count(Severity::Warn),
            count(Severity::Crit),
            count(Severity::Unknown)
        ));

        for outcome in outcomes {
            out.push_str(&format!("  [{}] {}\n", outcome.state(), outcome.service));
            for result in &outcome.results {
                let marker = if result.notice { "    notice: " } else { "    " };
                out.push_str(&format!("{}{} ({})\n", marker, result.text, result.severity));
                if let Some(details) = &result.details {
                    for detail in details.lines() {
                        out.push_str(&format!("      {}\n", detail));
                    }
                }
            }
            out.push('\n');
        }
    }
    out.push_str(&line);
    out.push('\n');

    out
}

/// One line per service in `STATE - Service: summary` form.
pub fn summary_lines(outcomes: &[CheckOutcome]) -> Vec<String> {
    outcomes
        .iter()
        .map(|outcome| {
            let summary: Vec<&str> = outcome
                .results
                .iter()
                .filter(|r| !r.notice)
                .map(|r| r.text.as_str())
                .collect();
            format!("{} - {}: {}", outcome.state(), outcome.service, summary.join(", "))
        })
        .collect()
}
