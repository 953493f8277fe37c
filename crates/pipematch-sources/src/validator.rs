//! The validation orchestrator: fetch, compare, score, assemble.
//!
//! Three sequential stages (tests, artifacts, outcome), each fetching from
//! both platforms concurrently via `tokio::join!` since the two reads are
//! independent. Any fatal [`SourceError`] aborts the whole validation; no
//! partial [`ValidationResult`] is ever produced. The one non-fatal case is
//! a missing test report, which becomes an all-zero [`TestResults`].

use std::sync::Arc;

use pipematch_core::{
    compare_artifacts, compare_outcomes, compare_test_results, TestResults, ValidationResult,
};

use crate::source::{BuildSource, RunRef};
use crate::SourceError;

/// Compares one Jenkins build against one GitHub Actions run.
///
/// Holds no per-validation state: a single validator can serve concurrent
/// `validate` calls against different build/run pairs.
pub struct MigrationValidator {
    jenkins: Arc<dyn BuildSource>,
    gha: Arc<dyn BuildSource>,
}

impl MigrationValidator {
    pub fn new(jenkins: Arc<dyn BuildSource>, gha: Arc<dyn BuildSource>) -> Self {
        Self { jenkins, gha }
    }

    /// Run the full validation for one build/run pair.
    ///
    /// # Execution Flow
    /// 1. Fetch test results from both platforms, compare
    /// 2. Fetch artifact lists from both platforms, compare
    /// 3. Fetch outcomes from both platforms, compare
    /// 4. Assemble the scored, immutable result
    pub async fn validate(
        &self,
        jenkins_ref: &RunRef,
        gha_ref: &RunRef,
    ) -> Result<ValidationResult, SourceError> {
        tracing::info!(jenkins = %jenkins_ref, gha = %gha_ref, "Validating migration");

        tracing::info!("Comparing test results");
        let (jenkins_tests, gha_tests) = tokio::join!(
            fetch_tests_or_empty(self.jenkins.as_ref(), jenkins_ref),
            fetch_tests_or_empty(self.gha.as_ref(), gha_ref),
        );
        let tests = compare_test_results(&jenkins_tests?, &gha_tests?);

        tracing::info!("Comparing artifacts");
        let (jenkins_artifacts, gha_artifacts) = tokio::join!(
            self.jenkins.fetch_artifacts(jenkins_ref),
            self.gha.fetch_artifacts(gha_ref),
        );
        let artifacts = compare_artifacts(&jenkins_artifacts?, &gha_artifacts?);

        tracing::info!("Comparing exit codes");
        let (jenkins_success, gha_success) = tokio::join!(
            self.jenkins.fetch_outcome(jenkins_ref),
            self.gha.fetch_outcome(gha_ref),
        );
        let outcome = compare_outcomes(jenkins_success?, gha_success?);

        let result = ValidationResult::assemble(
            jenkins_ref.to_string(),
            gha_ref.to_string(),
            tests,
            artifacts,
            outcome,
        );

        tracing::info!(
            score = result.confidence_score,
            verdict = %result.verdict,
            differences = result.differences.len(),
            "Validation complete"
        );

        Ok(result)
    }
}

/// Fetch test results, downgrading a missing report to the empty result.
///
/// Only `NotFound` is downgraded; transport and shape failures stay fatal.
async fn fetch_tests_or_empty(
    source: &dyn BuildSource,
    run: &RunRef,
) -> Result<TestResults, SourceError> {
    match source.fetch_test_results(run).await {
        Err(SourceError::NotFound(detail)) => {
            tracing::warn!(
                source = source.name(),
                run = %run,
                detail,
                "No test report, treating as empty"
            );
            Ok(TestResults::empty())
        }
        other => other,
    }
}
