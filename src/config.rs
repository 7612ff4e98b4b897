//! Configuration loaded from a TOML file.
//!
//! Every table is optional; missing settings fall back to the plugin defaults
//! (discover started services, started is OK, everything else CRIT).

use crate::analyzer::discovery::DiscoveryParams;
use crate::analyzer::evaluate::MatchParameters;
use crate::analyzer::rules::CompiledRules;
use crate::analyzer::summary::SummaryParams;
use crate::collector::soap::{ConnectionSettings, TlsVerification};
use crate::credentials::{CredentialResolver, SecretRef};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_PORT: u16 = 8443;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryParams,
    #[serde(default)]
    pub check: MatchParameters,
    #[serde(default)]
    pub summary: SummaryParams,
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Special agent connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub secret: Option<SecretRef>,
    #[serde(default = "default_port")]
    pub tcp_port: u16,
    #[serde(default)]
    pub ssl: TlsVerification,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            user: None,
            secret: None,
            tcp_port: DEFAULT_PORT,
            ssl: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ConnectionConfig {
    /// A timeout of 0 counts as unset.
    pub fn timeout_secs(&self) -> u64 {
        if self.timeout == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            self.timeout
        }
    }

    /// Resolve the secret and build the settings for `host`.
    pub fn settings(
        &self,
        host: &str,
        resolver: &dyn CredentialResolver,
    ) -> Result<ConnectionSettings, ConfigError> {
        if host.is_empty() {
            return Err(ConfigError::Missing("host"));
        }
        let secret = self
            .secret
            .as_ref()
            .map(|s| resolver.resolve(s))
            .transpose()?;

        Ok(ConnectionSettings {
            host: host.to_string(),
            port: self.tcp_port,
            user: self.user.clone(),
            secret,
            tls: self.ssl.clone(),
            timeout: Duration::from_secs(self.timeout_secs()),
        })
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a config and make sure all patterns compile.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.compile()?;
        Ok(config)
    }

    pub fn compile(&self) -> Result<CompiledRules, ConfigError> {
        CompiledRules::compile(self)
    }
}
