//! Secret resolution for the API user.
//!
//! Secrets are never read from a process-wide store; callers hand a
//! [`CredentialResolver`] to whatever needs one.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Opaque secret. Its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Where a secret comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretRef {
    /// Stored inline in the configuration.
    Password(String),
    /// Read from an environment variable.
    Env(String),
    /// First line of a file.
    File(PathBuf),
}

pub trait CredentialResolver {
    fn resolve(&self, secret: &SecretRef) -> Result<Secret, ConfigError>;
}

/// Resolves inline, environment and file secrets.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultResolver;

impl CredentialResolver for DefaultResolver {
    fn resolve(&self, secret: &SecretRef) -> Result<Secret, ConfigError> {
        match secret {
            SecretRef::Password(value) => Ok(Secret::new(value.clone())),
            SecretRef::Env(var) => std::env::var(var)
                .map(Secret::new)
                .map_err(|e| ConfigError::Secret(format!("{}: {}", var, e))),
            SecretRef::File(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let line = content.lines().next().unwrap_or("").trim_end();
                if line.is_empty() {
                    return Err(ConfigError::Secret(format!("{:?} is empty", path)));
                }
                Ok(Secret::new(line))
            }
        }
    }
}
