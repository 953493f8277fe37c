//! Field-by-field and set-by-set comparison of normalized results.
//!
//! Every function here is pure and deterministic: identical inputs produce
//! byte-identical difference lists. Name sets are sorted before they are
//! formatted into messages, so output never depends on hash iteration order.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{BuildArtifact, TestResults};

/// Outcome of comparing one category between the two platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    /// True iff no differences were detected.
    pub matched: bool,

    /// Human-readable discrepancy descriptions.
    pub differences: Vec<String>,
}

impl Comparison {
    /// A comparison that found nothing to report.
    pub fn matched() -> Self {
        Self {
            matched: true,
            differences: Vec::new(),
        }
    }

    /// Derive the match flag from the difference list.
    pub fn from_differences(differences: Vec<String>) -> Self {
        Self {
            matched: differences.is_empty(),
            differences,
        }
    }
}

/// Compare test results between Jenkins and GitHub Actions.
///
/// Counts for total, passed, and failed are compared pairwise; test-case
/// name sets are diffed in both directions. Skipped counts and per-case
/// durations are acceptable drift and are not compared.
pub fn compare_test_results(jenkins: &TestResults, gha: &TestResults) -> Comparison {
    let mut differences = Vec::new();

    if jenkins.total != gha.total {
        differences.push(format!(
            "Test count mismatch: Jenkins={}, GHA={}",
            jenkins.total, gha.total
        ));
    }

    if jenkins.passed != gha.passed {
        differences.push(format!(
            "Passed tests mismatch: Jenkins={}, GHA={}",
            jenkins.passed, gha.passed
        ));
    }

    if jenkins.failed != gha.failed {
        differences.push(format!(
            "Failed tests mismatch: Jenkins={}, GHA={}",
            jenkins.failed, gha.failed
        ));
    }

    let jenkins_names: BTreeSet<&str> =
        jenkins.test_cases.iter().map(|tc| tc.name.as_str()).collect();
    let gha_names: BTreeSet<&str> = gha.test_cases.iter().map(|tc| tc.name.as_str()).collect();

    let missing_in_gha: Vec<&str> = jenkins_names.difference(&gha_names).copied().collect();
    let missing_in_jenkins: Vec<&str> = gha_names.difference(&jenkins_names).copied().collect();

    // BTreeSet difference iterates in sorted order already.
    if !missing_in_gha.is_empty() {
        differences.push(format!("Tests missing in GHA: {}", missing_in_gha.join(", ")));
    }

    if !missing_in_jenkins.is_empty() {
        differences.push(format!(
            "Tests missing in Jenkins: {}",
            missing_in_jenkins.join(", ")
        ));
    }

    tracing::debug!(differences = differences.len(), "Compared test results");
    Comparison::from_differences(differences)
}

/// Compare build artifact lists using name identity and checksum equality.
///
/// For each name in the union of both lists: absence on one side is one
/// difference; for names present on both sides, checksum and size are
/// compared independently, so a single artifact can contribute two entries.
/// A duplicate name within one side's list is itself reported as an anomaly;
/// comparison then proceeds with the last occurrence.
pub fn compare_artifacts(jenkins: &[BuildArtifact], gha: &[BuildArtifact]) -> Comparison {
    let mut differences = Vec::new();

    let jenkins_by_name = index_by_name(jenkins, "Jenkins", &mut differences);
    let gha_by_name = index_by_name(gha, "GHA", &mut differences);

    let all_names: BTreeSet<&str> = jenkins_by_name
        .keys()
        .chain(gha_by_name.keys())
        .copied()
        .collect();

    for name in all_names {
        match (jenkins_by_name.get(name), gha_by_name.get(name)) {
            (None, Some(_)) => {
                differences.push(format!("Artifact '{}' only in GHA", name));
            }
            (Some(_), None) => {
                differences.push(format!("Artifact '{}' only in Jenkins", name));
            }
            (Some(jenkins_artifact), Some(gha_artifact)) => {
                if jenkins_artifact.checksum != gha_artifact.checksum {
                    differences.push(format!(
                        "Artifact '{}' checksum mismatch: Jenkins={}, GHA={}",
                        name, jenkins_artifact.checksum, gha_artifact.checksum
                    ));
                }

                if jenkins_artifact.size != gha_artifact.size {
                    differences.push(format!(
                        "Artifact '{}' size mismatch: Jenkins={}, GHA={}",
                        name, jenkins_artifact.size, gha_artifact.size
                    ));
                }
            }
            (None, None) => unreachable!("name came from the union of both maps"),
        }
    }

    tracing::debug!(differences = differences.len(), "Compared artifacts");
    Comparison::from_differences(differences)
}

/// Compare the normalized success flags of both runs.
///
/// Each adapter has already reduced its platform's outcome vocabulary to a
/// boolean, so the only question left is whether the two booleans agree.
pub fn compare_outcomes(jenkins_success: bool, gha_success: bool) -> Comparison {
    if jenkins_success == gha_success {
        return Comparison::matched();
    }

    Comparison::from_differences(vec![format!(
        "Exit code mismatch: Jenkins={}, GHA={}",
        if jenkins_success { "SUCCESS" } else { "FAILURE" },
        if gha_success { "success" } else { "failure" },
    )])
}

/// Index artifacts by name, reporting duplicates as anomalies.
///
/// Last occurrence wins, matching how a keyed collection would behave, but
/// the duplicate is surfaced rather than silently dropped.
fn index_by_name<'a>(
    artifacts: &'a [BuildArtifact],
    side: &str,
    differences: &mut Vec<String>,
) -> BTreeMap<&'a str, &'a BuildArtifact> {
    let mut by_name = BTreeMap::new();

    for artifact in artifacts {
        if by_name.insert(artifact.name.as_str(), artifact).is_some() {
            differences.push(format!(
                "Duplicate artifact name '{}' in {} artifact list",
                artifact.name, side
            ));
        }
    }

    by_name
}
