//! GitHub Actions REST API adapter.
//!
//! Talks to the GitHub REST API v3:
//! - `/repos/{repo}/actions/runs/{id}` for the run conclusion
//! - `/repos/{repo}/actions/runs/{id}/artifacts` for the artifact index
//! - each artifact's `archive_download_url` for its bytes
//!
//! A run is considered successful iff its `conclusion` is `success`. Test
//! results are read from an uploaded artifact named `test-results` holding a
//! JSON summary in the normalized [`TestResults`] shape; when no such
//! artifact exists the fetch fails with [`SourceError::NotFound`], which the
//! orchestrator downgrades to an empty result.
//!
//! The download endpoint always serves a ZIP archive wrapping the uploaded
//! files, so artifact checksums are over the archive bytes and the test
//! summary is extracted from inside its archive before parsing. The summary
//! artifact itself is validation plumbing, not a build output, and is left
//! out of the artifact comparison.

use async_trait::async_trait;
use serde::Deserialize;

use pipematch_core::{BuildArtifact, TestResults};

use crate::secrets::{ApiCredential, CredentialSource};
use crate::source::{BuildSource, RunRef};
use crate::{http_client, sha256_hex, SourceError};

/// Environment variable holding the GitHub token.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Name of the uploaded artifact carrying the JSON test summary.
pub const TEST_RESULTS_ARTIFACT: &str = "test-results";

const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Adapter for one GitHub repository's Actions runs.
pub struct GitHubActionsSource {
    api_base: String,
    /// `owner/repo`.
    repo: String,
    credential: ApiCredential,
}

impl std::fmt::Debug for GitHubActionsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubActionsSource")
            .field("api_base", &self.api_base)
            .field("repo", &self.repo)
            .field("credential", &self.credential)
            .finish()
    }
}

impl GitHubActionsSource {
    /// Create an adapter with an explicit token.
    pub fn new(repo: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            repo: repo.into(),
            credential: ApiCredential::new(token, CredentialSource::CommandLine, "GitHub token"),
        }
    }

    /// Create an adapter reading the token from `GITHUB_TOKEN`.
    pub fn from_env(repo: impl Into<String>) -> Result<Self, SourceError> {
        let credential = ApiCredential::from_env(GITHUB_TOKEN_ENV, "GitHub token")?;
        Ok(Self {
            api_base: DEFAULT_API_BASE.to_string(),
            repo: repo.into(),
            credential,
        })
    }

    /// Point at a GitHub Enterprise API endpoint.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn expect_gha_ref(&self, run: &RunRef) -> Result<u64, SourceError> {
        match run {
            RunRef::GitHubActions { run_id } => Ok(*run_id),
            other => Err(SourceError::InvalidReference {
                source_name: "github-actions",
                reference: other.to_string(),
            }),
        }
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, SourceError> {
        // Credential is exposed only here, at the point of use.
        http_client()
            .get(url)
            .bearer_auth(self.credential.expose())
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "pipematch")
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

    async fn list_artifacts(&self, run_id: u64) -> Result<ArtifactList, SourceError> {
        let url = format!(
            "{}/repos/{}/actions/runs/{}/artifacts",
            self.api_base, self.repo, run_id
        );
        self.get_json(&url).await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self.get(url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Transport(format!(
                "GET {}: HTTP {}",
                url, status
            )));
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| SourceError::Transport(format!("GET {}: {}", url, e)))
    }
}

#[async_trait]
impl BuildSource for GitHubActionsSource {
    async fn fetch_test_results(&self, run: &RunRef) -> Result<TestResults, SourceError> {
        let run_id = self.expect_gha_ref(run)?;
        let list = self.list_artifacts(run_id).await?;

        let summary = list
            .artifacts
            .iter()
            .find(|a| a.name == TEST_RESULTS_ARTIFACT)
            .ok_or_else(|| {
                SourceError::NotFound(format!(
                    "run {} has no '{}' artifact",
                    run_id, TEST_RESULTS_ARTIFACT
                ))
            })?;

        let bytes = self.download(&summary.archive_download_url).await?;
        parse_summary_archive(&bytes)
    }

    async fn fetch_artifacts(&self, run: &RunRef) -> Result<Vec<BuildArtifact>, SourceError> {
        let run_id = self.expect_gha_ref(run)?;
        let list = self.list_artifacts(run_id).await?;

        let mut artifacts = Vec::new();
        for entry in list.comparable() {
            let bytes = self.download(&entry.archive_download_url).await?;
            artifacts.push(BuildArtifact {
                name: entry.name.clone(),
                size: entry.size_in_bytes,
                checksum: sha256_hex(&bytes),
                path: entry.name.clone(),
            });
        }

        tracing::debug!(run_id, count = artifacts.len(), "Fetched GHA artifacts");
        Ok(artifacts)
    }

    async fn fetch_outcome(&self, run: &RunRef) -> Result<bool, SourceError> {
        let run_id = self.expect_gha_ref(run)?;
        let url = format!("{}/repos/{}/actions/runs/{}", self.api_base, self.repo, run_id);

        let workflow_run: WorkflowRun = self.get_json(&url).await?;
        Ok(workflow_run.conclusion.as_deref() == Some("success"))
    }

    fn name(&self) -> &str {
        "github-actions"
    }
}

/// `/actions/runs/{id}` response, reduced to the fields we read.
#[derive(Debug, Deserialize)]
struct WorkflowRun {
    /// `success`, `failure`, `cancelled`, ..., or null while running.
    conclusion: Option<String>,
}

/// Extract the JSON test summary from an artifact archive.
///
/// GitHub wraps every uploaded artifact in a ZIP, even single files, so the
/// summary has to be pulled out of the archive before it can be parsed. Any
/// failure here is a shape problem, not a transport problem.
fn parse_summary_archive(bytes: &[u8]) -> Result<TestResults, SourceError> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|e| {
        SourceError::Malformed(format!(
            "'{}' artifact is not a valid archive: {}",
            TEST_RESULTS_ARTIFACT, e
        ))
    })?;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(|e| {
            SourceError::Malformed(format!("'{}' artifact archive: {}", TEST_RESULTS_ARTIFACT, e))
        })?;

        if !file.name().ends_with(".json") {
            continue;
        }
        let entry_name = file.name().to_string();

        let mut contents = Vec::with_capacity(file.size() as usize);
        std::io::Read::read_to_end(&mut file, &mut contents).map_err(|e| {
            SourceError::Malformed(format!("'{}' in archive: {}", entry_name, e))
        })?;

        return serde_json::from_slice(&contents)
            .map_err(|e| SourceError::Malformed(format!("'{}' in archive: {}", entry_name, e)));
    }

    Err(SourceError::Malformed(format!(
        "'{}' artifact archive contains no JSON file",
        TEST_RESULTS_ARTIFACT
    )))
}

/// `/actions/runs/{id}/artifacts` response.
#[derive(Debug, Deserialize)]
struct ArtifactList {
    #[serde(default)]
    artifacts: Vec<ArtifactEntry>,
}

impl ArtifactList {
    /// Entries that take part in the artifact comparison. The test summary
    /// artifact only exists to carry data for this tool and would otherwise
    /// show up as a spurious GHA-only difference on every run.
    fn comparable(&self) -> impl Iterator<Item = &ArtifactEntry> {
        self.artifacts
            .iter()
            .filter(|entry| entry.name != TEST_RESULTS_ARTIFACT)
    }
}

#[derive(Debug, Deserialize)]
struct ArtifactEntry {
    name: String,

    size_in_bytes: u64,

    archive_download_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_jenkins_reference() {
        let source = GitHubActionsSource::new("octocat/hello", "token");
        let result = source.expect_gha_ref(&RunRef::jenkins("job", 1));
        assert!(matches!(
            result,
            Err(SourceError::InvalidReference { source_name: "github-actions", .. })
        ));
    }

    #[test]
    fn test_token_not_in_debug_output() {
        let source = GitHubActionsSource::new("octocat/hello", "ghp_secret123");
        let debug = format!("{:?}", source);
        assert!(!debug.contains("ghp_secret123"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_enterprise_api_base() {
        let source = GitHubActionsSource::new("octocat/hello", "token")
            .with_api_base("https://ghe.example.com/api/v3/");
        assert_eq!(source.api_base, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_workflow_run_parse() {
        let run: WorkflowRun =
            serde_json::from_str(r#"{"conclusion": "success", "status": "completed"}"#).unwrap();
        assert_eq!(run.conclusion.as_deref(), Some("success"));

        let running: WorkflowRun = serde_json::from_str(r#"{"conclusion": null}"#).unwrap();
        assert_ne!(running.conclusion.as_deref(), Some("success"));
    }

    #[test]
    fn test_artifact_list_parse() {
        let raw = r#"{
            "total_count": 2,
            "artifacts": [
                {
                    "name": "app.jar",
                    "size_in_bytes": 1024,
                    "archive_download_url": "https://api.github.com/x/1/zip"
                },
                {
                    "name": "test-results",
                    "size_in_bytes": 512,
                    "archive_download_url": "https://api.github.com/x/2/zip"
                }
            ]
        }"#;

        let list: ArtifactList = serde_json::from_str(raw).unwrap();
        assert_eq!(list.artifacts.len(), 2);
        assert_eq!(list.artifacts[1].name, TEST_RESULTS_ARTIFACT);
        assert_eq!(list.artifacts[0].size_in_bytes, 1024);
    }

    const SUMMARY_JSON: &str = r#"{
        "total": 2,
        "passed": 2,
        "failed": 0,
        "skipped": 0,
        "execution_time": 1.5,
        "test_cases": [
            {"name": "testAdd", "class_name": "MathTest", "status": "passed", "duration": 0.1},
            {"name": "testSub", "class_name": "MathTest", "status": "passed", "duration": 0.2}
        ]
    }"#;

    fn zip_with_file(name: &str, contents: &[u8]) -> Vec<u8> {
        use std::io::Write;

        let mut buf = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut buf));
            writer
                .start_file(name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(contents).unwrap();
            writer.finish().unwrap();
        }
        buf
    }

    #[test]
    fn test_summary_parsed_from_inside_archive() {
        // The download endpoint serves a ZIP wrapping the uploaded file.
        let archive = zip_with_file("test-results.json", SUMMARY_JSON.as_bytes());

        let results = parse_summary_archive(&archive).unwrap();
        assert_eq!(results.total, 2);
        assert_eq!(results.test_cases.len(), 2);
        assert_eq!(results.test_cases[0].name, "testAdd");
    }

    #[test]
    fn test_raw_json_bytes_are_not_a_valid_archive() {
        let result = parse_summary_archive(SUMMARY_JSON.as_bytes());
        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }

    #[test]
    fn test_archive_without_json_entry_is_malformed() {
        let archive = zip_with_file("junit.xml", b"<testsuite/>");

        let result = parse_summary_archive(&archive);
        match result {
            Err(SourceError::Malformed(detail)) => assert!(detail.contains("no JSON file")),
            other => panic!("expected Malformed, got {:?}", other.map(|r| r.total)),
        }
    }

    #[test]
    fn test_archive_with_bad_summary_is_malformed() {
        let archive = zip_with_file("test-results.json", b"{\"total\": \"not a number\"}");

        let result = parse_summary_archive(&archive);
        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }

    #[test]
    fn test_summary_artifact_excluded_from_comparison() {
        let raw = r#"{
            "artifacts": [
                {"name": "app.jar", "size_in_bytes": 1024, "archive_download_url": "https://api.github.com/x/1/zip"},
                {"name": "test-results", "size_in_bytes": 512, "archive_download_url": "https://api.github.com/x/2/zip"}
            ]
        }"#;

        let list: ArtifactList = serde_json::from_str(raw).unwrap();
        let names: Vec<&str> = list.comparable().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["app.jar"]);
    }
}
