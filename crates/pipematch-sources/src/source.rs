//! The data-source abstraction the orchestrator runs against.

use std::fmt;

use async_trait::async_trait;
use pipematch_core::{BuildArtifact, TestResults};

use crate::SourceError;

/// Platform-specific identifier for one pipeline execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunRef {
    /// A Jenkins build, addressed by job name and build number.
    Jenkins { job: String, build: u64 },

    /// A GitHub Actions workflow run, addressed by run id.
    GitHubActions { run_id: u64 },
}

impl RunRef {
    pub fn jenkins(job: impl Into<String>, build: u64) -> Self {
        RunRef::Jenkins {
            job: job.into(),
            build,
        }
    }

    pub fn gha(run_id: u64) -> Self {
        RunRef::GitHubActions { run_id }
    }
}

impl fmt::Display for RunRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunRef::Jenkins { job, build } => write!(f, "{}#{}", job, build),
            RunRef::GitHubActions { run_id } => write!(f, "{}", run_id),
        }
    }
}

/// One CI platform's view of a pipeline run.
///
/// Implementations normalize everything: raw API responses are parsed into
/// the `pipematch-core` model here, and platform outcome vocabularies
/// (Jenkins `SUCCESS`, GHA `success`) are reduced to a plain boolean before
/// the orchestrator ever sees them.
#[async_trait]
pub trait BuildSource: Send + Sync {
    /// Fetch normalized test results for the run.
    ///
    /// Fails with [`SourceError::NotFound`] when the platform has no test
    /// report for this run; the caller decides whether that is fatal.
    async fn fetch_test_results(&self, run: &RunRef) -> Result<TestResults, SourceError>;

    /// Fetch the run's artifact list, with SHA-256 checksums computed over
    /// the exact artifact bytes.
    async fn fetch_artifacts(&self, run: &RunRef) -> Result<Vec<BuildArtifact>, SourceError>;

    /// Fetch whether the run succeeded, per the platform's own semantics.
    async fn fetch_outcome(&self, run: &RunRef) -> Result<bool, SourceError>;

    /// Platform label used in log events.
    fn name(&self) -> &str;
}
