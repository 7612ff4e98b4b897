//! SOAP transport to the Control Center Services API.

use crate::credentials::Secret;
use crate::error::FetchError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const SERVICE_PATH: &str = "controlcenterservice2/services/ControlCenterServices?wsdl";
const SOAP_ACTION: &str = "urn:vim25/5.0";
const AGENT_USER_AGENT: &str = "Checkmk special agent Cisco UCM";

/// How the server certificate is checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsVerification {
    /// Accept any certificate.
    Deactivated,
    /// Verify against the host name.
    #[default]
    Hostname,
    /// Connect to and verify against another name for the same address.
    CustomHostname(String),
}

#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub secret: Option<Secret>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ConnectionSettings {
    /// Name used in the URL and for certificate validation.
    pub fn target_host(&self) -> &str {
        match &self.tls {
            TlsVerification::CustomHostname(name) => name,
            _ => &self.host,
        }
    }

    pub fn url(&self) -> String {
        format!("https://{}:{}/{}", self.target_host(), self.port, SERVICE_PATH)
    }
}

/// Posts a SOAP body and returns the response text.
pub trait SoapTransport {
    fn post(&self, request: &str) -> Result<String, FetchError>;
}

/// Wrap a request payload into the SOAP envelope.
pub fn envelope(request: &str) -> String {
    format!(
        concat!(
            "<SOAP-ENV:Envelope",
            " xmlns:SOAP-ENV=\"http://schemas.xmlsoap.org/soap/envelope/\"",
            " xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\"",
            " xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\">",
            "<SOAP-ENV:Header></SOAP-ENV:Header>",
            "<SOAP-ENV:Body xmlns:ns1=\"http://schemas.cisco.com/ast/soap\">{}</SOAP-ENV:Body>",
            "</SOAP-ENV:Envelope>"
        ),
        request
    )
}

/// Map an HTTP status to the response body or a fetch error.
pub fn classify_response(status: u16, body: String) -> Result<String, FetchError> {
    match status {
        200 => Ok(body),
        401 => Err(FetchError::AuthenticationFailure),
        403 => Err(FetchError::AuthorizationFailure),
        other => Err(FetchError::ProtocolFailure(other)),
    }
}

/// HTTPS session against one UCM node.
pub struct UcmSession {
    client: reqwest::blocking::Client,
    url: String,
    auth: Option<(String, Secret)>,
}

impl UcmSession {
    pub fn new(settings: &ConnectionSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/xml; charset=\"utf-8\""),
        );
        headers.insert(
            HeaderName::from_static("soapaction"),
            HeaderValue::from_static(SOAP_ACTION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(AGENT_USER_AGENT));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .connect_timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.tls == TlsVerification::Deactivated)
            .build()?;

        let auth = match (&settings.user, &settings.secret) {
            (Some(user), Some(secret)) => Some((user.clone(), secret.clone())),
            _ => None,
        };

        Ok(Self {
            client,
            url: settings.url(),
            auth,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl SoapTransport for UcmSession {
    fn post(&self, request: &str) -> Result<String, FetchError> {
        debug!("POST {}", self.url);
        let mut builder = self.client.post(&self.url).body(envelope(request));
        if let Some((user, secret)) = &self.auth {
            builder = builder.basic_auth(user, Some(secret.expose()));
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!("Response {} ({} bytes)", status, body.len());
        classify_response(status, body)
    }
}
