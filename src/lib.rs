//! # detector-conformance
//!
//! Conformance checking and behavioral verification for a plugin-style
//! static-analysis detector suite: security lint rules for smart-contract
//! source, organized per target ecosystem namespace.
//!
//! Two responsibilities:
//!
//! 1. **Validation** — every detector and its paired test-case corpus must
//!    satisfy a fixed structural contract: required project files, exact
//!    `vulnerable`/`remediated` pairing, dense `<label>-<n>` numbering, no
//!    stray files.
//! 2. **Verification** — each detector must actually fire on its vulnerable
//!    samples and stay silent on its remediated samples, confirmed by running
//!    the external analysis engine against every example project.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use detector_conformance::{config::Config, error::ValidationReport, reconcile};
//! use detector_conformance::testcase::LevenshteinMatcher;
//!
//! let config = Config::load(None).expect("failed to load config");
//! let errors = reconcile::validate_all(Path::new("."), &config, &LevenshteinMatcher);
//! let report = ValidationReport::from_errors(".", errors);
//!
//! std::process::exit(if report.passed { 0 } else { 1 });
//! ```
//!
//! ## Architecture
//!
//! Validation is a pure, synchronous pipeline; verification drives external
//! processes on a bounded worker pool:
//!
//! 1. **[`config`]** — TOML configuration with defaults.
//! 2. **[`project`]** — is a directory a well-formed detector/example project?
//! 3. **[`naming`]** — `<prefix>-<n>` naming and dense numbering.
//! 4. **[`testcase`]** — `vulnerable`/`remediated` pairing, rename hints.
//! 5. **[`reconcile`]** — detector set vs test-case set, per namespace.
//! 6. **[`engine`]** — the external analysis engine behind the
//!    [`engine::AnalysisEngine`] trait.
//! 7. **[`oracle`]** — findings stream → triggered set → [`oracle::Verdict`].
//! 8. **[`runner`]** — concurrent verification scheduling.
//! 9. **[`error`]** / **[`output`]** — accumulated errors and their rendering.

pub mod config;
pub mod engine;
pub mod error;
pub mod naming;
pub mod oracle;
pub mod output;
pub mod project;
pub mod reconcile;
pub mod runner;
pub mod testcase;
