use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use detector_conformance::oracle;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn finding_line(code: &str) -> String {
    format!(r#"{{"message":{{"code":{{"code":"{code}"}},"level":"warning"}}}}"#)
}

fn write_findings(lines: &[String]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn triggered(codes: &[&str]) -> HashSet<String> {
    codes.iter().map(|c| oracle::normalize_rule_code(c)).collect()
}

// --- Normalization ---

#[test]
fn normalize_maps_underscores_to_hyphens() {
    assert_eq!(oracle::normalize_rule_code("unsafe_unwrap"), "unsafe-unwrap");
    assert_eq!(oracle::normalize_rule_code("already-hyphenated"), "already-hyphenated");
}

// --- Findings stream parsing ---

#[test]
fn parse_findings_collects_normalized_codes() {
    let file = write_findings(&[
        finding_line("detector_one"),
        finding_line("other_rule"),
    ]);

    let triggered = oracle::parse_findings(file.path()).unwrap();
    assert_eq!(
        triggered,
        ["detector-one", "other-rule"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    );
}

#[test]
fn parse_findings_collapses_duplicates() {
    let file = write_findings(&[
        finding_line("detector_one"),
        finding_line("detector_one"),
    ]);

    let triggered = oracle::parse_findings(file.path()).unwrap();
    assert_eq!(triggered.len(), 1);
}

#[test]
fn parse_findings_tolerates_blank_lines() {
    let file = write_findings(&[
        finding_line("detector_one"),
        String::new(),
    ]);

    assert_eq!(oracle::parse_findings(file.path()).unwrap().len(), 1);
}

#[test]
fn unparseable_line_is_a_hard_failure() {
    let file = write_findings(&[
        finding_line("detector_one"),
        "this is not json".to_string(),
    ]);

    assert!(oracle::parse_findings(file.path()).is_err());
}

#[test]
fn finding_without_a_rule_code_is_a_hard_failure() {
    let file = write_findings(&[r#"{"message":{"spans":[]}}"#.to_string()]);

    assert!(oracle::parse_findings(file.path()).is_err());
}

#[test]
fn unreadable_findings_file_is_a_hard_failure() {
    assert!(oracle::parse_findings(Path::new("/nonexistent/findings.json")).is_err());
}

// --- Verdicts ---

#[test]
fn vulnerable_example_with_triggered_detector_passes() {
    let verdict = oracle::verify(
        Path::new("test-cases/ink/detector-one/vulnerable/vulnerable-1"),
        "detector-one",
        &triggered(&["detector_one", "other_rule"]),
    );
    assert!(verdict.expected);
    assert!(verdict.observed);
    assert!(verdict.passed);
    assert_eq!(verdict.explanation, None);
}

#[test]
fn remediated_example_with_triggered_detector_fails() {
    let verdict = oracle::verify(
        Path::new("test-cases/ink/detector-one/remediated/remediated-1"),
        "detector-one",
        &triggered(&["detector_one", "other_rule"]),
    );
    assert!(!verdict.expected);
    assert!(verdict.observed);
    assert!(!verdict.passed);
    assert_eq!(
        verdict.explanation,
        Some("it failed when it shouldn't have")
    );
}

#[test]
fn vulnerable_example_with_silent_detector_fails() {
    let verdict = oracle::verify(
        Path::new("test-cases/ink/detector-one/vulnerable/vulnerable-2"),
        "detector-one",
        &triggered(&["other_rule"]),
    );
    assert!(verdict.expected);
    assert!(!verdict.observed);
    assert!(!verdict.passed);
    assert_eq!(
        verdict.explanation,
        Some("it didn't fail when it should have")
    );
}

#[test]
fn remediated_example_with_silent_detector_passes() {
    let verdict = oracle::verify(
        Path::new("test-cases/ink/detector-one/remediated/remediated-2"),
        "detector-one",
        &triggered(&[]),
    );
    assert!(verdict.passed);
}

#[test]
fn expected_requires_a_whole_path_segment() {
    // A directory merely containing the word must not count as labeled.
    let verdict = oracle::verify(
        Path::new("test-cases/ink/vulnerable-patterns-check/remediated/remediated-1"),
        "vulnerable-patterns-check",
        &triggered(&[]),
    );
    assert!(!verdict.expected);
}
