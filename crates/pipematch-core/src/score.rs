//! Confidence scoring and verdict mapping.
//!
//! Scoring applies strict, non-configurable penalties:
//! - tests mismatch costs 40 points
//! - artifacts mismatch costs 30 points
//! - exit-code mismatch costs 30 points
//!
//! Each penalty applies at most once, no matter how many individual
//! differences fed the category. Tests carry the largest weight since they
//! directly validate migrated behavior; artifacts and outcome are indirect
//! evidence of equal strength.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Penalty for a test-results mismatch.
pub const TESTS_PENALTY: f64 = 40.0;

/// Penalty for an artifact mismatch.
pub const ARTIFACTS_PENALTY: f64 = 30.0;

/// Penalty for an exit-code mismatch.
pub const EXIT_CODES_PENALTY: f64 = 30.0;

/// Minimum score for the auto-migrate verdict (also process-level success).
pub const AUTO_MIGRATE_THRESHOLD: f64 = 95.0;

/// Minimum score for the review-required verdict.
pub const REVIEW_THRESHOLD: f64 = 80.0;

/// Compute the migration confidence score in [0, 100].
///
/// Additive, order-independent, and idempotent: the score is a pure
/// function of the three flags.
pub fn confidence_score(tests_match: bool, artifacts_match: bool, exit_codes_match: bool) -> f64 {
    let mut score = 100.0;

    if !tests_match {
        score -= TESTS_PENALTY;
    }
    if !artifacts_match {
        score -= ARTIFACTS_PENALTY;
    }
    if !exit_codes_match {
        score -= EXIT_CODES_PENALTY;
    }

    score.max(0.0)
}

/// Discrete reading of a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Score >= 95: the migration can proceed without human review.
    AutoMigrate,

    /// Score in [80, 95): a human should look before migrating.
    ReviewRequired,

    /// Score < 80: the pipelines diverge too much to migrate as-is.
    ManualIntervention,
}

impl Verdict {
    /// Map a confidence score onto a verdict.
    pub fn from_score(score: f64) -> Self {
        if score >= AUTO_MIGRATE_THRESHOLD {
            Verdict::AutoMigrate
        } else if score >= REVIEW_THRESHOLD {
            Verdict::ReviewRequired
        } else {
            Verdict::ManualIntervention
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::AutoMigrate => write!(f, "ready to auto-migrate"),
            Verdict::ReviewRequired => write!(f, "review required"),
            Verdict::ManualIntervention => write!(f, "manual intervention needed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_all_match_scores_100() {
        assert_eq!(confidence_score(true, true, true), 100.0);
        assert_eq!(Verdict::from_score(100.0), Verdict::AutoMigrate);
    }

    #[test]
    fn test_tests_mismatch_scores_60() {
        let score = confidence_score(false, true, true);
        assert_eq!(score, 60.0);
        assert_eq!(Verdict::from_score(score), Verdict::ManualIntervention);
    }

    #[test]
    fn test_artifacts_mismatch_scores_70() {
        let score = confidence_score(true, false, true);
        assert_eq!(score, 70.0);
        assert_eq!(Verdict::from_score(score), Verdict::ManualIntervention);
    }

    #[test]
    fn test_exit_codes_mismatch_scores_70() {
        assert_eq!(confidence_score(true, true, false), 70.0);
    }

    #[test]
    fn test_all_mismatch_floors_at_zero() {
        assert_eq!(confidence_score(false, false, false), 0.0);
    }

    #[test]
    fn test_verdict_boundaries() {
        assert_eq!(Verdict::from_score(95.0), Verdict::AutoMigrate);
        assert_eq!(Verdict::from_score(94.9), Verdict::ReviewRequired);
        assert_eq!(Verdict::from_score(80.0), Verdict::ReviewRequired);
        assert_eq!(Verdict::from_score(79.9), Verdict::ManualIntervention);
        assert_eq!(Verdict::from_score(0.0), Verdict::ManualIntervention);
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::AutoMigrate.to_string(), "ready to auto-migrate");
        assert_eq!(Verdict::ReviewRequired.to_string(), "review required");
        assert_eq!(
            Verdict::ManualIntervention.to_string(),
            "manual intervention needed"
        );
    }

    proptest! {
        #[test]
        fn prop_score_always_in_range(t in any::<bool>(), a in any::<bool>(), e in any::<bool>()) {
            let score = confidence_score(t, a, e);
            prop_assert!((0.0..=100.0).contains(&score));
        }

        #[test]
        fn prop_score_is_idempotent(t in any::<bool>(), a in any::<bool>(), e in any::<bool>()) {
            prop_assert_eq!(confidence_score(t, a, e), confidence_score(t, a, e));
        }

        #[test]
        fn prop_flipping_a_flag_costs_exactly_its_weight(
            a in any::<bool>(),
            e in any::<bool>(),
        ) {
            // The penalties sum to exactly 100, so the floor never clips a
            // single-flag delta.
            let tests_delta = confidence_score(true, a, e) - confidence_score(false, a, e);
            prop_assert_eq!(tests_delta, TESTS_PENALTY);

            let artifacts_delta = confidence_score(a, true, e) - confidence_score(a, false, e);
            prop_assert_eq!(artifacts_delta, ARTIFACTS_PENALTY);

            let exit_delta = confidence_score(a, e, true) - confidence_score(a, e, false);
            prop_assert_eq!(exit_delta, EXIT_CODES_PENALTY);
        }

        #[test]
        fn prop_flipping_any_flag_strictly_decreases(
            a in any::<bool>(),
            e in any::<bool>(),
        ) {
            prop_assert!(confidence_score(false, a, e) < confidence_score(true, a, e));
            prop_assert!(confidence_score(a, false, e) < confidence_score(a, true, e));
            prop_assert!(confidence_score(a, e, false) < confidence_score(a, e, true));
        }
    }
}
