//! Suite reconciliation.
//!
//! Compares the detector set against the test-case set for every namespace:
//! a detector with no test case and a test case with no detector are both
//! reconciliation errors, except for test cases backed by the shared
//! cross-namespace detector pool. Matched pairs recurse into the project
//! probe (detector side) and the test-case structural validator.
//!
//! The expected layout is
//! `detectors/<namespace>/<detector>/` and
//! `test-cases/<namespace>/<detector>/{vulnerable,remediated}/`.
//!
//! Pure, synchronous traversal. Errors accumulate in insertion order and are
//! never raised; the only terminal condition is a namespace-level directory
//! that does not exist at all, which yields one error and skips everything
//! below that root.

use crate::config::Config;
use crate::error::{ErrorKind, ValidationError};
use crate::project;
use crate::testcase::{self, SimilarityMatcher};
use std::collections::BTreeSet;
use std::path::Path;

/// Top-level directory holding one subdirectory per namespace of detectors.
pub const DETECTORS_DIR: &str = "detectors";
/// Top-level directory holding one subdirectory per namespace of test cases.
pub const TEST_CASES_DIR: &str = "test-cases";

/// Validates every namespace under `base`.
///
/// A missing `detectors/` or `test-cases/` root is a single terminal error;
/// no partial validation is attempted below a root that does not exist.
pub fn validate_all(
    base: &Path,
    config: &Config,
    matcher: &dyn SimilarityMatcher,
) -> Vec<ValidationError> {
    let detectors_root = base.join(DETECTORS_DIR);
    if !detectors_root.is_dir() {
        return vec![ValidationError::namespace_level(
            "",
            ErrorKind::Reconciliation,
            format!("Missing detectors directory at {}", detectors_root.display()),
        )];
    }

    let test_cases_root = base.join(TEST_CASES_DIR);
    if !test_cases_root.is_dir() {
        return vec![ValidationError::namespace_level(
            "",
            ErrorKind::Reconciliation,
            format!(
                "Missing test-cases directory at {}",
                test_cases_root.display()
            ),
        )];
    }

    let mut errors = Vec::new();
    for namespace in list_namespaces(base, config) {
        errors.extend(validate_namespace(base, &namespace, config, matcher));
    }
    errors
}

/// Validates one namespace: set reconciliation plus per-pair structure.
pub fn validate_namespace(
    base: &Path,
    namespace: &str,
    config: &Config,
    matcher: &dyn SimilarityMatcher,
) -> Vec<ValidationError> {
    let detectors_path = base.join(DETECTORS_DIR).join(namespace);
    let test_cases_path = base.join(TEST_CASES_DIR).join(namespace);

    if !test_cases_path.is_dir() {
        return vec![ValidationError::namespace_level(
            namespace,
            ErrorKind::Reconciliation,
            format!(
                "Missing test-cases directory for {}",
                test_cases_path.display()
            ),
        )];
    }

    let detectors = subdir_names(&detectors_path, config);
    let test_cases = subdir_names(&test_cases_path, config);

    let mut errors = Vec::new();

    for detector in detectors.difference(&test_cases) {
        errors.push(ValidationError::for_detector(
            namespace,
            detector,
            ErrorKind::Reconciliation,
            format!("Detector '{}' has no corresponding test case", detector),
        ));
    }

    // Test cases may target a detector defined once in the shared pool and
    // tested per namespace; those are not orphans.
    let shared_pool = subdir_names(
        &base.join(DETECTORS_DIR).join(&config.layout.shared_pool),
        config,
    );
    for test_case in test_cases.difference(&detectors) {
        if !shared_pool.contains(test_case) {
            errors.push(ValidationError::for_detector(
                namespace,
                test_case,
                ErrorKind::Reconciliation,
                format!("Test case '{}' has no corresponding detector", test_case),
            ));
        }
    }

    for detector in detectors.intersection(&test_cases) {
        for violation in project::probe(&detectors_path.join(detector)) {
            errors.push(ValidationError::for_detector(
                namespace,
                detector,
                ErrorKind::Structural,
                violation.message,
            ));
        }
        for violation in testcase::validate_test_case(&test_cases_path.join(detector), matcher) {
            errors.push(ValidationError::for_detector(
                namespace,
                detector,
                ErrorKind::Structural,
                violation.message,
            ));
        }
    }

    errors
}

/// Lists namespaces under `detectors/`, excluding the shared pool, build
/// directories, and hidden entries. Sorted for deterministic traversal.
pub fn list_namespaces(base: &Path, config: &Config) -> Vec<String> {
    let detectors_root = base.join(DETECTORS_DIR);
    subdir_names(&detectors_root, config)
        .into_iter()
        .filter(|ns| *ns != config.layout.shared_pool)
        .collect()
}

/// Lists every `namespace/detector` test-case identifier under `base`,
/// sorted. Build directories and hidden entries are skipped at both levels.
pub fn list_test_cases(base: &Path, config: &Config) -> Vec<String> {
    let test_cases_root = base.join(TEST_CASES_DIR);
    let mut cases = Vec::new();
    for namespace in subdir_names(&test_cases_root, config) {
        for test_case in subdir_names(&test_cases_root.join(&namespace), config) {
            cases.push(format!("{}/{}", namespace, test_case));
        }
    }
    cases
}

/// Direct subdirectory names of `dir`, minus ignored and hidden entries.
///
/// A `BTreeSet` keeps iteration ordered, so reruns over an unchanged tree
/// produce byte-identical error lists.
fn subdir_names(dir: &Path, config: &Config) -> BTreeSet<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return BTreeSet::new();
    };

    entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| !config.is_ignored_dir(name))
        .collect()
}
