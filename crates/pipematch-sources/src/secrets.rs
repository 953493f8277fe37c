//! Secure credential handling for CI platform adapters.
//!
//! Both adapters authenticate against remote APIs (Jenkins with a user/API
//! token pair, GitHub with a bearer token). Credentials are wrapped so that:
//!
//! - They cannot appear in Debug output (shows `[REDACTED]`)
//! - Memory is zeroed on drop via the `secrecy` crate
//! - Exposure is explicit, via `.expose()` at the point of use
//! - The load source is tracked for diagnosing configuration issues

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::SourceError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed on the command line.
    CommandLine,
    /// Loaded from an environment variable.
    Environment,
    /// Provided programmatically (tests, embedding).
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::CommandLine => write!(f, "command line"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    /// Wrap a credential value. After this point it cannot be accidentally
    /// logged.
    pub fn new(
        value: impl Into<String>,
        source: CredentialSource,
        name: &'static str,
    ) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load a credential from an environment variable.
    ///
    /// `name` is the human-readable label for error messages, e.g.
    /// "Jenkins API token".
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, SourceError> {
        std::env::var(env_var)
            .map(|v| Self::new(v, CredentialSource::Environment, name))
            .map_err(|_| {
                SourceError::NotConfigured(format!(
                    "{} not set: configure '{}' environment variable",
                    name, env_var
                ))
            })
    }

    /// Explicitly expose the credential value for use in a request header.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// Whether the stored value is empty.
    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    /// Where this credential came from.
    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}
