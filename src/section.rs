//! Service catalog: turns agent output into a [`Section`].

use crate::types::{Section, ServiceRecord};
use tracing::{debug, warn};

/// Name of the agent section carrying the service table.
pub const SECTION_NAME: &str = "cisco_ucm_services";

/// Field separator of the service table (`sep(124)`).
pub const SEPARATOR: char = '|';

/// Build a section from raw `(name, state, reason code, reason text)` rows.
///
/// Returns `None` for an empty input: "no data yet" is a valid state and
/// callers treat it as zero discovered items.
pub fn build<I, S>(rows: I) -> Option<Section>
where
    I: IntoIterator<Item = [S; 4]>,
    S: AsRef<str>,
{
    let records: Vec<ServiceRecord> = rows
        .into_iter()
        .map(|[name, state, code, text]| {
            ServiceRecord::new(
                name.as_ref(),
                state.as_ref(),
                parse_reason_code(code.as_ref()),
                text.as_ref(),
            )
        })
        .collect();

    if records.is_empty() {
        None
    } else {
        Some(Section::new(records))
    }
}

/// Parse the agent output of one host.
///
/// Accepts the bare `name|state|code|text` table as well as the full agent
/// output with `<<<section>>>` headers, in which case only lines of the
/// service section are read.
pub fn parse_agent_output(output: &str) -> Option<Section> {
    let mut rows = Vec::new();
    let mut in_section = true;

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(header) = line.strip_prefix("<<<") {
            in_section = section_name(header) == SECTION_NAME;
            continue;
        }
        if !in_section || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.splitn(4, SEPARATOR).collect();
        match fields.as_slice() {
            [name, state, code, text] => rows.push([*name, *state, *code, *text]),
            _ => warn!("Skipping malformed service line: {:?}", line),
        }
    }

    debug!("Parsed {} service rows", rows.len());
    build(rows)
}

/// Name part of a header body such as `cisco_ucm_services:sep(124)>>>`.
fn section_name(header: &str) -> &str {
    let end = header.find([':', '>']).unwrap_or(header.len());
    &header[..end]
}

/// Reason codes are numeric; anything else counts as "no reason".
fn parse_reason_code(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}
