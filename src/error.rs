//! Error types for fetching and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the Control Center Services API.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Credentials were rejected.
    #[error("401 Unauthorized")]
    AuthenticationFailure,

    /// Credentials are valid but lack the required role.
    #[error("403 Forbidden")]
    AuthorizationFailure,

    #[error("{0} Undecoded status code")]
    ProtocolFailure(u16),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid service pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Secret error: {0}")]
    Secret(String),

    #[error("Missing setting: {0}")]
    Missing(&'static str),
}
