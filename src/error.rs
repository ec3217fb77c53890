//! Core error and report types.
//!
//! Every check in this crate returns structured values instead of printing or
//! raising: the low-level validators produce [`Violation`]s, the reconciler
//! tags them into [`ValidationError`]s, and a whole validation pass is
//! assembled into a [`ValidationReport`]. Rendering lives in
//! [`output`](crate::output); nothing here touches the terminal.

use std::fmt;

/// What a single structural check found wrong with one directory entry.
///
/// Data-carrying variants keep the raw material (offending name, observed and
/// expected numbering) available to callers that want more than the rendered
/// message — the message in [`Violation`] is already human-ready.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ViolationKind {
    MissingManifest,
    MissingEntryPoint,
    UnexpectedItem { item: String },
    InvalidItem { item: String },
    NoExamplesFound,
    NonSequentialNumbering { found: Vec<u32>, expected: Vec<u32> },
    MissingSubdirectory { name: String },
}

/// One structural problem found by the project probe, the sequence validator,
/// or the test-case validator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Human-readable description, already carrying the offending path.
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Violation {
            kind,
            message: message.into(),
        }
    }
}

/// Failure taxonomy for the whole tool.
///
/// `Structural` and `Reconciliation` come from the validation pass,
/// `Engine` and `Oracle` from the verification pass. All four accumulate;
/// none aborts the traversal that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Structural,
    Reconciliation,
    Engine,
    Oracle,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Structural => write!(f, "structural"),
            ErrorKind::Reconciliation => write!(f, "reconciliation"),
            ErrorKind::Engine => write!(f, "engine"),
            ErrorKind::Oracle => write!(f, "oracle"),
        }
    }
}

/// One validation failure, tagged with where it was found.
///
/// Immutable once produced. `detector` is empty for namespace-level errors
/// (e.g. a missing `test-cases/<ns>` directory).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValidationError {
    pub namespace: String,
    pub detector: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn namespace_level(namespace: &str, kind: ErrorKind, message: impl Into<String>) -> Self {
        ValidationError {
            namespace: namespace.to_string(),
            detector: String::new(),
            kind,
            message: message.into(),
        }
    }

    pub fn for_detector(
        namespace: &str,
        detector: &str,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        ValidationError {
            namespace: namespace.to_string(),
            detector: detector.to_string(),
            kind,
            message: message.into(),
        }
    }
}

/// Result of one full validation pass over the suite.
///
/// The error list preserves insertion order so that two passes over an
/// unchanged tree render byte-identically.
#[derive(Debug, serde::Serialize)]
pub struct ValidationReport {
    pub base_path: String,
    pub timestamp: String,
    pub errors: Vec<ValidationError>,
    pub passed: bool,
}

impl ValidationReport {
    pub fn from_errors(base_path: &str, errors: Vec<ValidationError>) -> Self {
        let passed = errors.is_empty();
        ValidationReport {
            base_path: base_path.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            errors,
            passed,
        }
    }

    /// Count structural, reconciliation, engine, and oracle errors in a
    /// single pass. Returns `(structural, reconciliation, engine, oracle)`.
    pub fn count_by_kind(&self) -> (usize, usize, usize, usize) {
        self.errors
            .iter()
            .fold((0, 0, 0, 0), |(s, r, e, o), err| match err.kind {
                ErrorKind::Structural => (s + 1, r, e, o),
                ErrorKind::Reconciliation => (s, r + 1, e, o),
                ErrorKind::Engine => (s, r, e + 1, o),
                ErrorKind::Oracle => (s, r, e, o + 1),
            })
    }
}
