//! Service status query: request payload, response scraping and agent output.

use crate::collector::soap::SoapTransport;
use crate::error::FetchError;
use crate::section::{SECTION_NAME, SEPARATOR};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

/// Request body of `soapGetServiceStatus` asking for every service.
pub const GET_SERVICE_STATUS: &str = concat!(
    "<ns1:soapGetServiceStatus>",
    "  <ns1:ServiceStatus></ns1:ServiceStatus>",
    "</ns1:soapGetServiceStatus>"
);

static SERVICE_INFO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)<ns1:ServiceName>(.*?)</ns1:ServiceName>",
        r"<ns1:ServiceStatus>(.*?)</ns1:ServiceStatus>",
        r"<ns1:ReasonCode>(.*?)</ns1:ReasonCode>",
        r"<ns1:ReasonCodeString>(.*?)</ns1:ReasonCodeString>",
    ))
    .expect("Failed to compile service status pattern")
});

/// One service exactly as reported, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawServiceStatus {
    pub name: String,
    pub state: String,
    pub reason_code: String,
    pub reason_text: String,
}

impl RawServiceStatus {
    pub fn to_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}{sep}{}",
            self.name,
            self.state,
            self.reason_code,
            self.reason_text,
            sep = SEPARATOR
        )
    }
}

/// Extract all service entries of a `soapGetServiceStatus` response.
pub fn scrape(response: &str) -> Vec<RawServiceStatus> {
    SERVICE_INFO
        .captures_iter(response)
        .map(|caps| RawServiceStatus {
            name: caps[1].to_string(),
            state: caps[2].to_string(),
            reason_code: caps[3].to_string(),
            reason_text: caps[4].to_string(),
        })
        .collect()
}

pub fn fetch_service_status(transport: &dyn SoapTransport) -> Result<Vec<RawServiceStatus>, FetchError> {
    let response = transport.post(GET_SERVICE_STATUS)?;
    let services = scrape(&response);
    if services.is_empty() {
        debug!("No service entries in response: {} bytes", response.len());
    }
    info!("Fetched {} service entries", services.len());
    Ok(services)
}

/// Agent output: section header followed by one line per service.
pub fn agent_output(services: &[RawServiceStatus]) -> Vec<String> {
    let mut lines = Vec::with_capacity(services.len() + 1);
    lines.push(format!("<<<{}:sep({})>>>", SECTION_NAME, SEPARATOR as u32));
    lines.extend(services.iter().map(RawServiceStatus::to_line));
    lines
}
