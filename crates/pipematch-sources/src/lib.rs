//! # pipematch-sources
//!
//! Data-source adapters and the validation orchestrator for pipematch.
//!
//! Each CI platform is wrapped in a [`BuildSource`] implementation that
//! fetches raw API responses, parses them through typed structs, and hands
//! `pipematch-core` a fully normalized model. The comparator never sees a
//! raw response: a response that does not match the expected shape fails
//! with [`SourceError::Malformed`] before comparison starts.
//!
//! ## Error semantics
//!
//! - [`SourceError::NotFound`] from `fetch_test_results` is the one
//!   non-fatal case: the orchestrator coerces it to an all-zero
//!   [`TestResults`](pipematch_core::TestResults)
//! - Every other error aborts the validation; no partial result is produced
//! - No retries here. If a platform needs backoff, that belongs in front of
//!   the adapter, not inside it.

use sha2::{Digest, Sha256};
use thiserror::Error;

pub mod github;
pub mod jenkins;
pub mod secrets;
pub mod source;
pub mod validator;

pub use github::GitHubActionsSource;
pub use jenkins::JenkinsSource;
pub use secrets::{ApiCredential, CredentialSource};
pub use source::{BuildSource, RunRef};
pub use validator::MigrationValidator;

/// Errors from a CI platform data source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The requested data does not exist on the platform. Non-fatal only
    /// for test reports; the orchestrator treats it as an empty result.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network, auth, or protocol failure reaching the platform. Fatal.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The response arrived but does not match the expected shape. Fatal.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Missing credential or parameter at construction time.
    #[error("Source not configured: {0}")]
    NotConfigured(String),

    /// A run reference of the wrong kind was passed to an adapter.
    #[error("Invalid run reference for {source_name}: {reference}")]
    InvalidReference { source_name: &'static str, reference: String },
}

/// SHA-256 over exact bytes, hex-encoded. Artifact checksums on both
/// platforms go through this so the digests are directly comparable.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Shared HTTP client with a connect-level timeout. Per-request deadlines
/// are the platform adapters' business.
pub(crate) fn http_client() -> &'static reqwest::Client {
    static CLIENT: std::sync::OnceLock<reqwest::Client> = std::sync::OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_known_vector() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_error_display_includes_detail() {
        let err = SourceError::Transport("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));

        let err = SourceError::InvalidReference {
            source_name: "jenkins",
            reference: "12345".to_string(),
        };
        assert!(err.to_string().contains("jenkins"));
    }
}
