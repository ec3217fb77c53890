//! Output formatting for validation and verification reports.
//!
//! Rendering is a separate presentation layer: the checks return structured
//! values and this module turns them into terminal text or JSON. Two formats:
//!
//! | Format | Module | Use case |
//! |--------|--------|----------|
//! | [`Pretty`](OutputFormat::Pretty) | [`pretty`] | Terminal / human review |
//! | [`Json`](OutputFormat::Json)     | [`json`]   | Automation / CI         |

pub mod json;
pub mod pretty;

use crate::error::ValidationReport;
use crate::runner::VerifyReport;

/// Supported output formats.
#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text grouped by namespace and detector.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

/// Formats a [`ValidationReport`] in the requested [`OutputFormat`].
pub fn format_validation(report: &ValidationReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format_validation(report),
        OutputFormat::Json => json::format_validation(report),
    }
}

/// Formats a [`VerifyReport`] in the requested [`OutputFormat`].
pub fn format_verify(report: &VerifyReport, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Pretty => pretty::format_verify(report),
        OutputFormat::Json => json::format_verify(report),
    }
}
