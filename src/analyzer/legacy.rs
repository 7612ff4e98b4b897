//! The older single "Services" check: every service must be started unless
//! it is not activated on this node.

use crate::types::{CheckResult, Section, ServiceRecord, Severity};

/// Reason text of services that are installed but deliberately not running.
pub const NOT_ACTIVATED: &str = "Service Not Activated";

/// The overview check exists once at least one service is started.
pub fn discover_overview(section: Option<&Section>) -> bool {
    section.is_some_and(|s| s.iter().any(|svc| svc.state_is("started")))
}

fn is_healthy(service: &ServiceRecord) -> bool {
    service.state_is("started") || service.reason_text == NOT_ACTIVATED
}

pub fn check_overview(section: &Section) -> Vec<CheckResult> {
    let mut notices = Vec::with_capacity(section.len());
    let mut all_ok = true;

    for service in section {
        let mut text = format!("{}: {}", service.name, service.state);
        if !service.reason_text.is_empty() {
            text.push_str(&format!(" ({})", service.reason_text));
        }
        let severity = if is_healthy(service) {
            Severity::Ok
        } else {
            all_ok = false;
            Severity::Crit
        };
        notices.push(CheckResult::notice(severity, text));
    }

    let headline = if all_ok {
        CheckResult::summary(Severity::Ok, "All services are OK")
    } else {
        CheckResult::summary(Severity::Crit, "Some services are in bad state")
    };

    std::iter::once(headline).chain(notices).collect()
}
