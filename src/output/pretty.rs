//! Human-readable colored text formatter.

use crate::error::ValidationReport;
use crate::runner::{ExampleOutcome, VerifyReport};
use colored::Colorize;

/// Formats a [`ValidationReport`] as ANSI-colored text, errors grouped by
/// namespace and detector, ending with a one-line summary.
pub fn format_validation(report: &ValidationReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}\n",
        format!("  Suite Validation: {}  ", report.base_path)
            .bold()
            .on_blue()
            .white()
    ));
    out.push_str(&format!("  Timestamp: {}\n\n", report.timestamp));

    if report.errors.is_empty() {
        out.push_str(&format!(
            "{}\n",
            "All detectors and test cases are valid!".green().bold()
        ));
        return out;
    }

    out.push_str(&format!("{}\n", "Validation errors found:".red().bold()));

    // Errors arrive ordered by traversal, so equal (namespace, detector)
    // tags are already adjacent; group headers track the change points.
    let mut current_group: Option<(&str, &str)> = None;
    for error in &report.errors {
        let group = (error.namespace.as_str(), error.detector.as_str());
        if current_group != Some(group) {
            current_group = Some(group);
            let heading = match group {
                ("", _) => "(suite root)".to_string(),
                (ns, "") => ns.to_string(),
                (ns, detector) => format!("{}/{}", ns, detector),
            };
            out.push_str(&format!("\n  {}\n", heading.bold()));
        }
        out.push_str(&format!(
            "    [{}] {}\n",
            error.kind.to_string().red(),
            error.message
        ));
    }

    let (structural, reconciliation, _, _) = report.count_by_kind();
    out.push_str(&format!(
        "\nResult: {}  |  {} errors ({} structural, {} reconciliation)\n",
        "FAILED".red().bold(),
        report.errors.len(),
        structural,
        reconciliation,
    ));

    out
}

/// Formats a [`VerifyReport`] as ANSI-colored text: one line per example,
/// failing directories bulleted at the end, and a one-line summary.
pub fn format_verify(report: &VerifyReport) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "\n{}\n",
        "  Detector Verification  ".bold().on_blue().white()
    ));
    if let Some(ref version) = report.engine_version {
        out.push_str(&format!("  Engine: {}\n", version));
    }
    out.push_str(&format!("  Timestamp: {}\n", report.timestamp));

    let mut total = 0usize;
    let mut passed = 0usize;

    for tc in &report.results {
        out.push_str(&format!(
            "\n{}\n",
            format!("Performing tests in {}/{}", tc.namespace, tc.detector)
                .bold()
                .underline()
        ));
        if let Some(ref description) = tc.description {
            out.push_str(&format!("  {}\n", description.dimmed()));
        }
        if let Some(ref error) = tc.error {
            out.push_str(&format!("  [{}] {}\n", "ERR ".red().bold(), error));
            continue;
        }

        for example in &tc.examples {
            total += 1;
            let elapsed = format!("{:.2} sec", example.duration_ms as f64 / 1000.0);
            match &example.outcome {
                ExampleOutcome::Verdict(v) if v.passed => {
                    passed += 1;
                    out.push_str(&format!(
                        "  [{}] [> {}] {}\n",
                        "PASS".green().bold(),
                        elapsed,
                        example.example.display()
                    ));
                }
                ExampleOutcome::Verdict(v) => {
                    let explanation = v.explanation.unwrap_or("expected and observed disagree");
                    out.push_str(&format!(
                        "  [{}] [> {}] {}\n         {}\n",
                        "FAIL".red().bold(),
                        elapsed,
                        example.example.display(),
                        format!("didn't pass because {}", explanation).red()
                    ));
                }
                ExampleOutcome::EngineFailure { message } => {
                    out.push_str(&format!(
                        "  [{}] [> {}] {}\n         {}\n",
                        "ERR ".red().bold(),
                        elapsed,
                        example.example.display(),
                        message.red()
                    ));
                }
                ExampleOutcome::Skipped => {
                    out.push_str(&format!(
                        "  [{}] {}\n",
                        "SKIP".dimmed(),
                        example.example.display()
                    ));
                }
            }
        }
    }

    let failing = report.failing_examples();
    if failing.is_empty() {
        out.push_str(&format!(
            "\n{}\n",
            "No errors found in the specified test cases.".green()
        ));
    } else {
        out.push_str(&format!(
            "\n{}\n",
            "Errors detected in the following directories:".red()
        ));
        for dir in &failing {
            out.push_str(&format!("• {}\n", dir.display()));
        }
    }

    let status = if report.passed {
        "PASSED".green().bold().to_string()
    } else {
        "FAILED".red().bold().to_string()
    };
    out.push_str(&format!(
        "\nResult: {}  |  {} of {} examples passed\n",
        status, passed, total,
    ));

    out
}
