//! Jenkins REST API adapter.
//!
//! Talks to the classic Jenkins JSON API:
//! - `/job/{job}/{build}/api/json` for build info and the artifact index
//! - `/job/{job}/{build}/testReport/api/json` for JUnit results
//! - `/job/{job}/{build}/artifact/{path}` for artifact bytes
//!
//! Responses are parsed through typed structs; anything that does not match
//! the expected shape fails with [`SourceError::Malformed`]. A Jenkins build
//! is considered successful iff its `result` field is `SUCCESS`.

use async_trait::async_trait;
use serde::Deserialize;

use pipematch_core::{BuildArtifact, TestCase, TestResults, TestStatus};

use crate::secrets::{ApiCredential, CredentialSource};
use crate::source::{BuildSource, RunRef};
use crate::{http_client, sha256_hex, SourceError};

/// Environment variable holding the Jenkins API token.
pub const JENKINS_API_TOKEN_ENV: &str = "JENKINS_API_TOKEN";

/// Adapter for one Jenkins instance.
pub struct JenkinsSource {
    base_url: String,
    username: String,
    credential: ApiCredential,
}

impl std::fmt::Debug for JenkinsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JenkinsSource")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("credential", &self.credential)
            .finish()
    }
}

impl JenkinsSource {
    /// Create an adapter with an explicit API token.
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            credential: ApiCredential::new(token, CredentialSource::CommandLine, "Jenkins API token"),
        }
    }

    /// Create an adapter reading the token from `JENKINS_API_TOKEN`.
    pub fn from_env(
        base_url: impl Into<String>,
        username: impl Into<String>,
    ) -> Result<Self, SourceError> {
        let credential = ApiCredential::from_env(JENKINS_API_TOKEN_ENV, "Jenkins API token")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            credential,
        })
    }

    fn expect_jenkins_ref<'a>(&self, run: &'a RunRef) -> Result<(&'a str, u64), SourceError> {
        match run {
            RunRef::Jenkins { job, build } => Ok((job.as_str(), *build)),
            other => Err(SourceError::InvalidReference {
                source_name: "jenkins",
                reference: other.to_string(),
            }),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, SourceError> {
        // Credential is exposed only here, at the point of use.
        http_client()
            .get(url)
            .basic_auth(&self.username, Some(self.credential.expose()))
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("GET {}: {}", url, e)))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let response = self.get(url).await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            return Err(SourceError::Transport(format!(
                "GET {}: HTTP {}",
                url, status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::Malformed(format!("{}: {}", url, e)))
    }

    async fn get_build_info(&self, job: &str, build: u64) -> Result<BuildInfo, SourceError> {
        let url = format!("{}/job/{}/{}/api/json", self.base_url, job, build);
        self.get_json(&url).await
    }

    async fn download_artifact(
        &self,
        job: &str,
        build: u64,
        artifact: &ArtifactRef,
    ) -> Result<BuildArtifact, SourceError> {
        let url = format!(
            "{}/job/{}/{}/artifact/{}",
            self.base_url, job, build, artifact.relative_path
        );

        let response = self.get(&url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Transport(format!(
                "GET {}: HTTP {}",
                url, status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Transport(format!("GET {}: {}", url, e)))?;

        Ok(BuildArtifact {
            name: artifact.file_name.clone(),
            size: bytes.len() as u64,
            checksum: sha256_hex(&bytes),
            path: artifact.relative_path.clone(),
        })
    }
}

#[async_trait]
impl BuildSource for JenkinsSource {
    async fn fetch_test_results(&self, run: &RunRef) -> Result<TestResults, SourceError> {
        let (job, build) = self.expect_jenkins_ref(run)?;
        let url = format!("{}/job/{}/{}/testReport/api/json", self.base_url, job, build);

        let report: TestReport = self.get_json(&url).await?;
        Ok(normalize_report(report))
    }

    async fn fetch_artifacts(&self, run: &RunRef) -> Result<Vec<BuildArtifact>, SourceError> {
        let (job, build) = self.expect_jenkins_ref(run)?;
        let info = self.get_build_info(job, build).await?;

        let mut artifacts = Vec::with_capacity(info.artifacts.len());
        for artifact_ref in &info.artifacts {
            artifacts.push(self.download_artifact(job, build, artifact_ref).await?);
        }

        tracing::debug!(
            job,
            build,
            count = artifacts.len(),
            "Fetched Jenkins artifacts"
        );
        Ok(artifacts)
    }

    async fn fetch_outcome(&self, run: &RunRef) -> Result<bool, SourceError> {
        let (job, build) = self.expect_jenkins_ref(run)?;
        let info = self.get_build_info(job, build).await?;
        Ok(info.result.as_deref() == Some("SUCCESS"))
    }

    fn name(&self) -> &str {
        "jenkins"
    }
}

/// `/api/json` build info, reduced to the fields we read.
#[derive(Debug, Deserialize)]
struct BuildInfo {
    /// `SUCCESS`, `FAILURE`, `UNSTABLE`, `ABORTED`, or null while running.
    result: Option<String>,

    #[serde(default)]
    artifacts: Vec<ArtifactRef>,
}

#[derive(Debug, Deserialize)]
struct ArtifactRef {
    #[serde(rename = "fileName")]
    file_name: String,

    #[serde(rename = "relativePath")]
    relative_path: String,
}

/// `/testReport/api/json` response, reduced to the fields we read.
#[derive(Debug, Deserialize)]
struct TestReport {
    #[serde(rename = "totalCount", default)]
    total_count: u64,

    #[serde(rename = "passCount", default)]
    pass_count: u64,

    #[serde(rename = "failCount", default)]
    fail_count: u64,

    #[serde(rename = "skipCount", default)]
    skip_count: u64,

    #[serde(default)]
    duration: f64,

    #[serde(default)]
    suites: Vec<TestSuite>,
}

#[derive(Debug, Deserialize)]
struct TestSuite {
    #[serde(default)]
    cases: Vec<TestCaseRaw>,
}

#[derive(Debug, Deserialize)]
struct TestCaseRaw {
    name: String,

    #[serde(rename = "className")]
    class_name: String,

    status: String,

    #[serde(default)]
    duration: f64,
}

fn normalize_report(report: TestReport) -> TestResults {
    let test_cases = report
        .suites
        .into_iter()
        .flat_map(|suite| suite.cases)
        .map(|case| TestCase {
            name: case.name,
            class_name: case.class_name,
            status: TestStatus::parse(&case.status),
            duration: case.duration,
        })
        .collect();

    TestResults {
        total: report.total_count,
        passed: report.pass_count,
        failed: report.fail_count,
        skipped: report.skip_count,
        execution_time: report.duration,
        test_cases,
    }
}
