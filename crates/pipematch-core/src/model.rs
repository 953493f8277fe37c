//! Normalized result model shared by both CI platforms.
//!
//! Adapters translate platform-specific API responses into these types
//! before any comparison happens. The comparator never sees raw responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compare::Comparison;
use crate::score::{confidence_score, Verdict};

/// Outcome of a single test case as reported by a CI platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
    /// Jenkins-specific: passed before, fails now.
    Regression,
    /// Jenkins-specific: failed before, passes now.
    Fixed,
    /// Any status string the platform reports that we do not recognize.
    Other(String),
}

impl TestStatus {
    /// Parse a platform status string, case-insensitively.
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "passed" | "success" => TestStatus::Passed,
            "failed" | "failure" => TestStatus::Failed,
            "skipped" => TestStatus::Skipped,
            "regression" => TestStatus::Regression,
            "fixed" => TestStatus::Fixed,
            _ => TestStatus::Other(raw.to_string()),
        }
    }
}

/// A single executed test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Test name (the identity used for cross-platform matching).
    pub name: String,

    /// Containing class or suite name.
    pub class_name: String,

    /// Reported outcome.
    pub status: TestStatus,

    /// Duration in seconds.
    pub duration: f64,
}

/// Test execution results for one pipeline run.
///
/// `passed + failed + skipped <= total` is expected but deliberately not
/// enforced: upstream data can violate it, and a count mismatch is a
/// discrepancy for the comparator to surface, not a reason to fail parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResults {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub skipped: u64,

    /// Wall-clock execution time in seconds.
    pub execution_time: f64,

    /// Individual test cases, in report order.
    pub test_cases: Vec<TestCase>,
}

impl TestResults {
    /// The all-zero result used when a platform has no test report.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Metadata for one build artifact.
///
/// Identity across platforms is `name`: two artifacts are "the same
/// artifact" iff their names match. Equality of content is judged by
/// `checksum` alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildArtifact {
    /// File name, unique within one run's artifact list.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// SHA-256 of the artifact bytes, hex-encoded.
    pub checksum: String,

    /// Source-relative path on the originating platform.
    pub path: String,
}

/// Final outcome of one migration validation.
///
/// Immutable once assembled: the confidence score and verdict are computed
/// inside [`ValidationResult::assemble`], never set after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// When the result was assembled.
    pub timestamp: DateTime<Utc>,

    /// Jenkins reference, "job#build".
    pub jenkins_build: String,

    /// GitHub Actions run id.
    pub gha_run: String,

    pub tests_match: bool,
    pub artifacts_match: bool,
    pub exit_codes_match: bool,

    /// Human-readable discrepancies, in stage order
    /// (tests, then artifacts, then outcome).
    pub differences: Vec<String>,

    /// Confidence score in [0, 100].
    pub confidence_score: f64,

    /// Discrete reading of the score.
    pub verdict: Verdict,
}

impl ValidationResult {
    /// Assemble the final result from the three stage comparisons.
    ///
    /// Differences are concatenated in stage order, the confidence score is
    /// derived from the three match flags, and the timestamp is captured
    /// here. Re-assembling from the same comparisons yields the same score.
    pub fn assemble(
        jenkins_build: impl Into<String>,
        gha_run: impl Into<String>,
        tests: Comparison,
        artifacts: Comparison,
        outcome: Comparison,
    ) -> Self {
        let tests_match = tests.matched;
        let artifacts_match = artifacts.matched;
        let exit_codes_match = outcome.matched;

        let mut differences = tests.differences;
        differences.extend(artifacts.differences);
        differences.extend(outcome.differences);

        let confidence_score = confidence_score(tests_match, artifacts_match, exit_codes_match);

        Self {
            timestamp: Utc::now(),
            jenkins_build: jenkins_build.into(),
            gha_run: gha_run.into(),
            tests_match,
            artifacts_match,
            exit_codes_match,
            differences,
            confidence_score,
            verdict: Verdict::from_score(confidence_score),
        }
    }

    /// Whether this result clears the auto-migration bar (score >= 95).
    pub fn is_success(&self) -> bool {
        matches!(self.verdict, Verdict::AutoMigrate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_values() {
        assert_eq!(TestStatus::parse("PASSED"), TestStatus::Passed);
        assert_eq!(TestStatus::parse("success"), TestStatus::Passed);
        assert_eq!(TestStatus::parse("FAILED"), TestStatus::Failed);
        assert_eq!(TestStatus::parse("REGRESSION"), TestStatus::Regression);
        assert_eq!(TestStatus::parse("FIXED"), TestStatus::Fixed);
        assert_eq!(TestStatus::parse("skipped"), TestStatus::Skipped);
    }

    #[test]
    fn test_status_parse_unknown_preserved() {
        assert_eq!(
            TestStatus::parse("ABORTED"),
            TestStatus::Other("ABORTED".to_string())
        );
    }

    #[test]
    fn test_empty_results_are_all_zero() {
        let results = TestResults::empty();
        assert_eq!(results.total, 0);
        assert_eq!(results.passed, 0);
        assert_eq!(results.failed, 0);
        assert_eq!(results.skipped, 0);
        assert!(results.test_cases.is_empty());
    }

    #[test]
    fn test_assemble_concatenates_in_stage_order() {
        let tests = Comparison::from_differences(vec!["t1".to_string()]);
        let artifacts = Comparison::from_differences(vec!["a1".to_string(), "a2".to_string()]);
        let outcome = Comparison::from_differences(vec!["o1".to_string()]);

        let result = ValidationResult::assemble("job#1", "42", tests, artifacts, outcome);

        assert_eq!(result.differences, vec!["t1", "a1", "a2", "o1"]);
        assert!(!result.tests_match);
        assert!(!result.artifacts_match);
        assert!(!result.exit_codes_match);
        assert_eq!(result.confidence_score, 0.0);
    }

    #[test]
    fn test_result_serializes_with_stable_field_names() {
        // The JSON emitted by the CLI's --json flag is consumed by external
        // tooling; field names are part of the contract.
        let result = ValidationResult::assemble(
            "job#1",
            "42",
            Comparison::matched(),
            Comparison::matched(),
            Comparison::matched(),
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["jenkins_build"], "job#1");
        assert_eq!(json["gha_run"], "42");
        assert_eq!(json["tests_match"], true);
        assert_eq!(json["confidence_score"], 100.0);
        assert_eq!(json["verdict"], "auto_migrate");
    }

    #[test]
    fn test_assemble_all_matched_scores_100() {
        let result = ValidationResult::assemble(
            "job#1",
            "42",
            Comparison::matched(),
            Comparison::matched(),
            Comparison::matched(),
        );

        assert_eq!(result.confidence_score, 100.0);
        assert_eq!(result.verdict, Verdict::AutoMigrate);
        assert!(result.is_success());
        assert!(result.differences.is_empty());
    }
}
