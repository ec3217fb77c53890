use std::fs;
use std::path::Path;

use detector_conformance::error::ViolationKind;
use detector_conformance::testcase::{self, LevenshteinMatcher, SimilarityMatcher};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_project(dir: &Path) {
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("Cargo.toml"), "[package]\nname = \"sample\"\n").unwrap();
    fs::write(dir.join("src/lib.rs"), "").unwrap();
}

fn make_side(test_case: &Path, label: &str, count: u32) {
    for n in 1..=count {
        make_project(&test_case.join(label).join(format!("{label}-{n}")));
    }
}

fn validate(path: &Path) -> Vec<detector_conformance::error::Violation> {
    testcase::validate_test_case(path, &LevenshteinMatcher)
}

// --- Well-formed test cases ---

#[test]
fn valid_test_case_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    make_side(dir.path(), "vulnerable", 2);
    make_side(dir.path(), "remediated", 1);

    assert!(validate(dir.path()).is_empty());
}

// --- Missing sides ---

#[test]
fn missing_remediated_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    make_side(dir.path(), "vulnerable", 1);

    let violations = validate(dir.path());
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        ViolationKind::MissingSubdirectory {
            name: "remediated".to_string()
        }
    );
}

#[test]
fn misspelled_side_gets_a_rename_hint() {
    let dir = tempfile::tempdir().unwrap();
    make_side(dir.path(), "vulnerabel", 1);
    make_side(dir.path(), "remediated", 1);

    let violations = validate(dir.path());
    let missing = violations
        .iter()
        .find(|v| {
            v.kind
                == ViolationKind::MissingSubdirectory {
                    name: "vulnerable".to_string(),
                }
        })
        .expect("expected a missing-subdirectory violation");
    assert!(
        missing.message.contains("vulnerabel"),
        "hint should name the near-miss directory: {}",
        missing.message
    );
}

#[test]
fn rename_hint_never_changes_pass_fail() {
    // The hinted variant must report the same violation kinds as an outright
    // missing side (plus the unexpected near-miss itself).
    let dir = tempfile::tempdir().unwrap();
    make_side(dir.path(), "vulnerabel", 1);
    make_side(dir.path(), "remediated", 1);

    let violations = validate(dir.path());
    assert!(violations.iter().any(|v| matches!(
        v.kind,
        ViolationKind::MissingSubdirectory { .. }
    )));
}

// --- Unexpected items ---

#[test]
fn unexpected_item_in_test_case_root_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    make_side(dir.path(), "vulnerable", 1);
    make_side(dir.path(), "remediated", 1);
    fs::write(dir.path().join("README.md"), "").unwrap();

    let violations = validate(dir.path());
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].kind,
        ViolationKind::UnexpectedItem {
            item: "README.md".to_string()
        }
    );
}

// --- Skip marker ---

#[test]
fn skip_marker_skips_the_entire_check() {
    let dir = tempfile::tempdir().unwrap();
    // A wildly malformed test case, exempted by the marker.
    fs::write(dir.path().join("Cargo.toml.skip"), "").unwrap();
    fs::write(dir.path().join("stray.txt"), "").unwrap();

    assert!(validate(dir.path()).is_empty());
}

// --- SimilarityMatcher contract ---

#[test]
fn matcher_finds_close_candidate() {
    let candidates = vec!["vulnerabel".to_string(), "unrelated".to_string()];
    let best = LevenshteinMatcher.best_match("vulnerable", &candidates, 0.8);
    assert_eq!(best.as_deref(), Some("vulnerabel"));
}

#[test]
fn matcher_rejects_candidates_below_threshold() {
    let candidates = vec!["unrelated".to_string()];
    assert!(LevenshteinMatcher
        .best_match("vulnerable", &candidates, 0.8)
        .is_none());
}

#[test]
fn matcher_handles_no_candidates() {
    assert!(LevenshteinMatcher.best_match("vulnerable", &[], 0.8).is_none());
}
