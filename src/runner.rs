//! Verification driver.
//!
//! Walks the example projects of each requested test case, drives the
//! [`AnalysisEngine`] against every one, and feeds the findings stream into
//! the [`oracle`](crate::oracle). Runs are scheduled on a bounded rayon pool:
//! examples sharing a working directory execute serially (the engine mutates
//! build-cache state in its working directory), independent working
//! directories execute concurrently. Each invocation writes findings to its
//! own unique temporary file.
//!
//! A fail-fast threshold stops *scheduling* new work once enough failures
//! have been seen; in-flight invocations always complete and report.

use crate::config::Config;
use crate::engine::AnalysisEngine;
use crate::error::{ErrorKind, ValidationError};
use crate::oracle::{self, Verdict};
use crate::project;
use crate::reconcile::{DETECTORS_DIR, TEST_CASES_DIR};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use walkdir::WalkDir;

/// Outcome of one example run.
#[derive(Debug, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum ExampleOutcome {
    /// The engine ran and the oracle produced a verdict.
    Verdict(Verdict),
    /// The engine invocation itself failed (spawn, timeout, non-zero exit,
    /// empty metadata, unreadable or unparseable findings).
    EngineFailure { message: String },
    /// Not run: the fail-fast threshold was reached before scheduling.
    Skipped,
}

impl ExampleOutcome {
    /// `true` for failed verdicts and engine failures; skipped runs are not
    /// themselves failures.
    pub fn is_failure(&self) -> bool {
        match self {
            ExampleOutcome::Verdict(v) => !v.passed,
            ExampleOutcome::EngineFailure { .. } => true,
            ExampleOutcome::Skipped => false,
        }
    }
}

/// One example run with its timing.
#[derive(Debug, serde::Serialize)]
pub struct ExampleResult {
    pub example: PathBuf,
    pub duration_ms: u64,
    #[serde(flatten)]
    pub outcome: ExampleOutcome,
}

/// All example runs for one `namespace/detector` test case.
#[derive(Debug, serde::Serialize)]
pub struct TestCaseResult {
    pub namespace: String,
    pub detector: String,
    /// Detector description from the engine's metadata, when available.
    pub description: Option<String>,
    /// Set when the test-case directory itself was absent.
    pub error: Option<String>,
    pub examples: Vec<ExampleResult>,
}

/// Result of one verification batch.
#[derive(Debug, serde::Serialize)]
pub struct VerifyReport {
    pub engine_version: Option<String>,
    pub timestamp: String,
    pub results: Vec<TestCaseResult>,
    pub passed: bool,
}

impl VerifyReport {
    /// Flattens every failure into the shared error taxonomy, so verification
    /// results aggregate alongside validation errors.
    ///
    /// Engine invocation failures map to [`ErrorKind::Engine`], oracle
    /// mismatches to [`ErrorKind::Oracle`]. Order follows the (sorted)
    /// report, so reruns over unchanged outcomes render identically.
    pub fn errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for tc in &self.results {
            if let Some(ref message) = tc.error {
                errors.push(ValidationError::for_detector(
                    &tc.namespace,
                    &tc.detector,
                    ErrorKind::Engine,
                    message.clone(),
                ));
            }
            for example in &tc.examples {
                match &example.outcome {
                    ExampleOutcome::Verdict(v) if !v.passed => {
                        errors.push(ValidationError::for_detector(
                            &tc.namespace,
                            &tc.detector,
                            ErrorKind::Oracle,
                            format!(
                                "Test case {} didn't pass because {}",
                                example.example.display(),
                                v.explanation.unwrap_or("expected and observed disagree"),
                            ),
                        ));
                    }
                    ExampleOutcome::EngineFailure { message } => {
                        errors.push(ValidationError::for_detector(
                            &tc.namespace,
                            &tc.detector,
                            ErrorKind::Engine,
                            format!("{}: {}", example.example.display(), message),
                        ));
                    }
                    _ => {}
                }
            }
        }
        errors
    }

    /// Directories of every failing example, sorted — the batch's headline
    /// answer to "what do I need to look at".
    pub fn failing_examples(&self) -> Vec<&Path> {
        let mut failing: Vec<&Path> = self
            .results
            .iter()
            .flat_map(|tc| &tc.examples)
            .filter(|e| e.outcome.is_failure())
            .map(|e| e.example.as_path())
            .collect();
        failing.sort();
        failing
    }
}

/// One schedulable engine run.
struct Unit {
    namespace: String,
    detector: String,
    example: PathBuf,
    detector_src: PathBuf,
    filtered: bool,
}

/// Runs the behavioral oracle for every `namespace/detector` in `test_cases`.
///
/// `engine_version` is recorded on the report as-is; querying it is the
/// caller's concern so a fake engine needs no version story.
pub fn run_verification(
    base: &Path,
    test_cases: &[String],
    engine: &dyn AnalysisEngine,
    config: &Config,
    engine_version: Option<String>,
) -> VerifyReport {
    let mut results: BTreeMap<(String, String), TestCaseResult> = BTreeMap::new();
    let mut units: Vec<Unit> = Vec::new();

    for case in test_cases {
        let Some((namespace, detector)) = case.split_once('/') else {
            results.insert(
                (case.clone(), String::new()),
                TestCaseResult {
                    namespace: case.clone(),
                    detector: String::new(),
                    description: None,
                    error: Some(format!(
                        "Invalid test case '{}': expected namespace/detector",
                        case
                    )),
                    examples: vec![],
                },
            );
            continue;
        };

        let key = (namespace.to_string(), detector.to_string());
        let directory = base.join(TEST_CASES_DIR).join(namespace).join(detector);
        if !directory.is_dir() {
            results.insert(
                key,
                TestCaseResult {
                    namespace: namespace.to_string(),
                    detector: detector.to_string(),
                    description: None,
                    error: Some(format!(
                        "Test case directory does not exist: {}",
                        directory.display()
                    )),
                    examples: vec![],
                },
            );
            continue;
        }

        results.insert(
            key,
            TestCaseResult {
                namespace: namespace.to_string(),
                detector: detector.to_string(),
                description: None,
                error: None,
                examples: vec![],
            },
        );

        let detector_src = resolve_detector_src(base, namespace, detector, config);
        let filtered = !config
            .verify
            .unfiltered_detectors
            .iter()
            .any(|d| d == detector);

        for example in find_example_projects(&directory) {
            units.push(Unit {
                namespace: namespace.to_string(),
                detector: detector.to_string(),
                example,
                detector_src: detector_src.clone(),
                filtered,
            });
        }
    }

    // The engine mutates build-cache state in its working directory, so runs
    // sharing one must never overlap. Group by working directory; groups run
    // concurrently, members of a group back to back.
    let mut groups: BTreeMap<PathBuf, Vec<Unit>> = BTreeMap::new();
    for unit in units {
        groups.entry(unit.example.clone()).or_default().push(unit);
    }
    let groups: Vec<Vec<Unit>> = groups.into_values().collect();

    let failures = AtomicUsize::new(0);
    let threshold = config.verify.fail_fast;

    let run_groups = || -> Vec<(String, String, ExampleResult, Option<String>)> {
        groups
            .par_iter()
            .flat_map(|group| {
                group
                    .iter()
                    .map(|unit| {
                        if threshold > 0 && failures.load(Ordering::Relaxed) >= threshold {
                            return (
                                unit.namespace.clone(),
                                unit.detector.clone(),
                                ExampleResult {
                                    example: unit.example.clone(),
                                    duration_ms: 0,
                                    outcome: ExampleOutcome::Skipped,
                                },
                                None,
                            );
                        }

                        let (result, description) = run_unit(unit, engine);
                        if result.outcome.is_failure() {
                            failures.fetch_add(1, Ordering::Relaxed);
                        }
                        (
                            unit.namespace.clone(),
                            unit.detector.clone(),
                            result,
                            description,
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    };

    let ran = match config.verify.workers {
        0 => run_groups(),
        workers => match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
            Ok(pool) => pool.install(run_groups),
            Err(_) => run_groups(),
        },
    };

    for (namespace, detector, result, description) in ran {
        if let Some(tc) = results.get_mut(&(namespace, detector)) {
            if tc.description.is_none() {
                tc.description = description;
            }
            tc.examples.push(result);
        }
    }

    let mut results: Vec<TestCaseResult> = results.into_values().collect();
    for tc in &mut results {
        tc.examples.sort_by(|a, b| a.example.cmp(&b.example));
    }

    let passed = results.iter().all(|tc| {
        tc.error.is_none()
            && tc.examples.iter().all(|e| {
                matches!(&e.outcome, ExampleOutcome::Verdict(v) if v.passed)
            })
    });

    VerifyReport {
        engine_version,
        timestamp: chrono::Utc::now().to_rfc3339(),
        results,
        passed,
    }
}

/// Runs one example through metadata query, scan, and oracle.
fn run_unit(unit: &Unit, engine: &dyn AnalysisEngine) -> (ExampleResult, Option<String>) {
    let start = Instant::now();

    let metadata = match engine.query_metadata(&unit.detector, &unit.detector_src, &unit.example) {
        Ok(Some(metadata)) => metadata,
        Ok(None) => {
            return (
                engine_failure(unit, start, "metadata query returned empty".to_string()),
                None,
            );
        }
        Err(e) => return (engine_failure(unit, start, e.to_string()), None),
    };

    // The metadata object is keyed by the engine's internal rule code.
    let description = metadata[unit.detector.replace('-', "_").as_str()]
        .as_str()
        .map(|s| s.to_string());

    let output_file = match tempfile::Builder::new()
        .prefix(&format!("scout_{}_", std::process::id()))
        .suffix(".json")
        .tempfile()
    {
        Ok(f) => f,
        Err(e) => {
            return (
                engine_failure(unit, start, format!("failed to create output file: {}", e)),
                description,
            );
        }
    };

    let filter = unit.filtered.then_some(unit.detector.as_str());
    if let Err(e) = engine.scan(&unit.detector_src, &unit.example, filter, output_file.path()) {
        return (engine_failure(unit, start, e.to_string()), description);
    }

    let triggered = match oracle::parse_findings(output_file.path()) {
        Ok(t) => t,
        Err(e) => return (engine_failure(unit, start, e), description),
    };

    let verdict = oracle::verify(&unit.example, &unit.detector, &triggered);
    (
        ExampleResult {
            example: unit.example.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
            outcome: ExampleOutcome::Verdict(verdict),
        },
        description,
    )
}

fn engine_failure(unit: &Unit, start: Instant, message: String) -> ExampleResult {
    ExampleResult {
        example: unit.example.clone(),
        duration_ms: start.elapsed().as_millis() as u64,
        outcome: ExampleOutcome::EngineFailure { message },
    }
}

/// Detector source directory passed to the engine via `--local-detectors`.
///
/// A test case whose detector lives in the shared pool is scanned with the
/// pool as the detector source.
fn resolve_detector_src(base: &Path, namespace: &str, detector: &str, config: &Config) -> PathBuf {
    let namespaced = base.join(DETECTORS_DIR).join(namespace);
    if namespaced.join(detector).is_dir() {
        namespaced
    } else {
        base.join(DETECTORS_DIR).join(&config.layout.shared_pool)
    }
}

/// Every project directory under `test_case_dir`, sorted.
///
/// Walks the whole tree rather than assuming `side/example` nesting so a
/// structurally invalid corpus still gets its valid projects verified.
fn find_example_projects(test_case_dir: &Path) -> Vec<PathBuf> {
    let mut projects: Vec<PathBuf> = WalkDir::new(test_case_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.path().to_path_buf())
        .filter(|p| project::is_project(p))
        .collect();

    projects.sort();
    projects
}
