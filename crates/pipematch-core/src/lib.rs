//! # pipematch-core
//!
//! Deterministic comparison and scoring engine for CI migration validation.
//!
//! Given normalized results from two pipeline runs (one Jenkins build, one
//! GitHub Actions run), this crate answers:
//! - Do the test results agree?
//! - Do the build artifacts agree, byte for byte?
//! - Did both runs succeed or both fail?
//! - How confident are we that the migration is equivalent?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same inputs always produce the same differences,
//!    in the same order (name sets are sorted before formatting)
//! 2. **Pure**: no I/O, no async, no shared state; fetching lives in
//!    `pipematch-sources`
//! 3. **Immutable results**: the confidence score and verdict are computed
//!    inside [`ValidationResult::assemble`], never mutated afterwards
//!
//! ## Example
//!
//! ```rust,ignore
//! use pipematch_core::{compare_test_results, ValidationResult, Comparison};
//!
//! let tests = compare_test_results(&jenkins_tests, &gha_tests);
//! let artifacts = compare_artifacts(&jenkins_artifacts, &gha_artifacts);
//! let outcome = compare_outcomes(jenkins_success, gha_success);
//!
//! let result = ValidationResult::assemble("app#42", "12345", tests, artifacts, outcome);
//! println!("{:.1}% - {}", result.confidence_score, result.verdict);
//! ```

pub mod compare;
pub mod model;
pub mod report;
pub mod score;

// Re-export main types at crate root
pub use compare::{compare_artifacts, compare_outcomes, compare_test_results, Comparison};
pub use model::{BuildArtifact, TestCase, TestResults, TestStatus, ValidationResult};
pub use report::{render_html, render_summary};
pub use score::{confidence_score, Verdict};
