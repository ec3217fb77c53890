//! JSON output formatter.
//!
//! Serializes reports as pretty-printed JSON with a severity/kind summary,
//! for automation and CI consumption.

use crate::error::ValidationReport;
use crate::runner::VerifyReport;

#[derive(serde::Serialize)]
struct ValidationJson<'a> {
    base_path: &'a str,
    timestamp: &'a str,
    passed: bool,
    summary: ValidationSummary,
    errors: &'a [crate::error::ValidationError],
}

#[derive(serde::Serialize)]
struct ValidationSummary {
    total: usize,
    structural: usize,
    reconciliation: usize,
}

/// Formats a [`ValidationReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid
/// data).
pub fn format_validation(report: &ValidationReport) -> String {
    let (structural, reconciliation, _, _) = report.count_by_kind();
    let output = ValidationJson {
        base_path: &report.base_path,
        timestamp: &report.timestamp,
        passed: report.passed,
        summary: ValidationSummary {
            total: report.errors.len(),
            structural,
            reconciliation,
        },
        errors: &report.errors,
    };
    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}

#[derive(serde::Serialize)]
struct VerifyJson<'a> {
    #[serde(flatten)]
    report: &'a VerifyReport,
    /// Failures flattened into the shared error taxonomy.
    errors: Vec<crate::error::ValidationError>,
}

/// Formats a [`VerifyReport`] as pretty-printed JSON.
///
/// # Panics
///
/// Panics if the report cannot be serialized (should not happen with valid
/// data).
pub fn format_verify(report: &VerifyReport) -> String {
    let output = VerifyJson {
        report,
        errors: report.errors(),
    };
    serde_json::to_string_pretty(&output).expect("JSON serialization failed")
}
