use std::fs;
use std::path::Path;

use detector_conformance::error::ViolationKind;
use detector_conformance::naming;
use detector_conformance::project;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_project(dir: &Path) {
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("Cargo.toml"), "[package]\nname = \"sample\"\n").unwrap();
    fs::write(dir.join("src/lib.rs"), "").unwrap();
}

fn make_examples(dir: &Path, prefix: &str, numbers: &[u32]) {
    for n in numbers {
        make_project(&dir.join(format!("{prefix}-{n}")));
    }
}

// --- Dense sequences ---

#[test]
fn dense_sequence_of_valid_projects_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    make_examples(dir.path(), "vulnerable", &[1, 2, 3]);

    assert!(naming::validate_sequence(dir.path(), "vulnerable").is_empty());
}

#[test]
fn dense_sequence_contributes_nothing_beyond_per_example_probes() {
    // With a gap-free sequence the validator must report exactly what probing
    // each example independently would report.
    let dir = tempfile::tempdir().unwrap();
    for n in 1..=2 {
        // Examples missing their entry point.
        let example = dir.path().join(format!("remediated-{n}"));
        fs::create_dir_all(&example).unwrap();
        fs::write(example.join("Cargo.toml"), "").unwrap();
    }

    let violations = naming::validate_sequence(dir.path(), "remediated");

    let mut independent = Vec::new();
    for n in 1..=2 {
        independent.extend(project::probe(&dir.path().join(format!("remediated-{n}"))));
    }
    assert_eq!(violations, independent);
}

// --- Numbering ---

#[test]
fn gap_in_numbering_reports_found_and_expected() {
    let dir = tempfile::tempdir().unwrap();
    make_examples(dir.path(), "vulnerable", &[1, 3]);

    let violations = naming::validate_sequence(dir.path(), "vulnerable");
    assert!(violations.iter().any(|v| v.kind
        == ViolationKind::NonSequentialNumbering {
            found: vec![1, 3],
            expected: vec![1, 2],
        }));
}

#[test]
fn numbering_must_start_at_one() {
    let dir = tempfile::tempdir().unwrap();
    make_examples(dir.path(), "vulnerable", &[2, 3]);

    let violations = naming::validate_sequence(dir.path(), "vulnerable");
    assert!(violations.iter().any(|v| v.kind
        == ViolationKind::NonSequentialNumbering {
            found: vec![2, 3],
            expected: vec![1, 2],
        }));
}

// --- Empty and invalid sides ---

#[test]
fn empty_directory_reports_exactly_no_examples_found() {
    let dir = tempfile::tempdir().unwrap();

    let violations = naming::validate_sequence(dir.path(), "vulnerable");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].kind, ViolationKind::NoExamplesFound);
    // Specifically: no numbering complaint about an empty side.
    assert!(!violations
        .iter()
        .any(|v| matches!(v.kind, ViolationKind::NonSequentialNumbering { .. })));
}

#[test]
fn out_of_pattern_child_reports_invalid_item() {
    let dir = tempfile::tempdir().unwrap();
    make_examples(dir.path(), "vulnerable", &[1]);
    fs::create_dir(dir.path().join("vulnerable-extra")).unwrap();

    let violations = naming::validate_sequence(dir.path(), "vulnerable");
    assert!(violations.iter().any(|v| v.kind
        == ViolationKind::InvalidItem {
            item: "vulnerable-extra".to_string()
        }));
}

#[test]
fn wrong_prefix_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    make_examples(dir.path(), "vulnerable", &[1]);
    make_project(&dir.path().join("remediated-1"));

    let violations = naming::validate_sequence(dir.path(), "vulnerable");
    assert!(violations.iter().any(|v| v.kind
        == ViolationKind::InvalidItem {
            item: "remediated-1".to_string()
        }));
}

#[test]
fn only_invalid_children_reports_both_invalid_and_no_examples() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sample")).unwrap();

    let violations = naming::validate_sequence(dir.path(), "vulnerable");
    assert!(violations.iter().any(|v| matches!(v.kind, ViolationKind::InvalidItem { .. })));
    assert!(violations
        .iter()
        .any(|v| v.kind == ViolationKind::NoExamplesFound));
    // The sequence check is not attempted on an unusable side.
    assert!(!violations
        .iter()
        .any(|v| matches!(v.kind, ViolationKind::NonSequentialNumbering { .. })));
}

#[test]
fn prefix_is_matched_exactly_not_as_regex() {
    // A prefix containing regex metacharacters must be treated literally.
    let dir = tempfile::tempdir().unwrap();
    make_project(&dir.path().join("a.b-1"));
    make_project(&dir.path().join("axb-1"));

    let violations = naming::validate_sequence(dir.path(), "a.b");
    assert!(violations.iter().any(|v| v.kind
        == ViolationKind::InvalidItem {
            item: "axb-1".to_string()
        }));
}
