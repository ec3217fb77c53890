//! Test-case structural validation.
//!
//! A test case pairs a detector with labeled sample projects: a `vulnerable`
//! side the detector must fire on and a `remediated` side it must stay silent
//! on. This module checks the shape only — exactly those two subdirectories,
//! each satisfying the naming/sequence contract with its own label as prefix.
//!
//! When an expected subdirectory is missing but a near-miss name exists
//! (`vulnerabel`, `Remediated`, ...), the violation message carries a
//! suggested rename. The hint never changes pass/fail, only diagnostic
//! quality.

use crate::error::{Violation, ViolationKind};
use crate::naming;
use crate::project;
use std::path::Path;

/// The two required test-case sides, in reporting order.
pub const SIDES: [&str; 2] = ["vulnerable", "remediated"];

/// Similarity score below which a near-miss name is not worth suggesting.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Finds the best fuzzy match for a missing directory name.
///
/// Any edit-distance or token-overlap scoring satisfies this contract; the
/// default implementation uses normalized Levenshtein similarity.
pub trait SimilarityMatcher: Send + Sync {
    /// Returns the candidate scoring highest against `target`, if any
    /// candidate reaches `threshold` (0.0–1.0).
    fn best_match(&self, target: &str, candidates: &[String], threshold: f64) -> Option<String>;
}

/// Default [`SimilarityMatcher`] backed by normalized Levenshtein distance.
pub struct LevenshteinMatcher;

impl SimilarityMatcher for LevenshteinMatcher {
    fn best_match(&self, target: &str, candidates: &[String], threshold: f64) -> Option<String> {
        candidates
            .iter()
            .map(|c| (strsim::normalized_levenshtein(target, c), c))
            .filter(|(score, _)| *score >= threshold)
            .max_by(|(a, _), (b, _)| a.total_cmp(b))
            .map(|(_, c)| c.clone())
    }
}

/// Validates the structure of one test-case directory.
///
/// - Both [`SIDES`] must exist as subdirectories; a missing one is a
///   [`MissingSubdirectory`](ViolationKind::MissingSubdirectory), with a
///   rename hint when `matcher` finds a near-miss among the actual children.
/// - Each present side is validated by
///   [`naming::validate_sequence`] with its own label as prefix.
/// - Any other child is an [`UnexpectedItem`](ViolationKind::UnexpectedItem).
/// - A skip marker at `path` skips the whole check: an explicit, auditable
///   exemption, not a silent pass.
pub fn validate_test_case(path: &Path, matcher: &dyn SimilarityMatcher) -> Vec<Violation> {
    if project::should_skip(path) {
        return vec![];
    }

    let mut violations = Vec::new();
    let children = project::sorted_child_names(path);

    for side in SIDES {
        let side_path = path.join(side);
        if side_path.is_dir() {
            violations.extend(naming::validate_sequence(&side_path, side));
        } else {
            let mut message = format!("Missing '{}' directory in {}", side, path.display());
            if let Some(near_miss) = matcher.best_match(side, &children, SUGGESTION_THRESHOLD) {
                message.push_str(&format!(" (did you mean to rename '{}'?)", near_miss));
            }
            violations.push(Violation::new(
                ViolationKind::MissingSubdirectory {
                    name: side.to_string(),
                },
                message,
            ));
        }
    }

    for item in &children {
        if !SIDES.contains(&item.as_str()) {
            violations.push(Violation::new(
                ViolationKind::UnexpectedItem { item: item.clone() },
                format!(
                    "Unexpected item in test case directory {}: {}",
                    path.display(),
                    item
                ),
            ));
        }
    }

    violations
}
