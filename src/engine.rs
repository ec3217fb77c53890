//! External analysis engine invocation.
//!
//! The verification pass drives `cargo scout-audit` as a subprocess. The
//! engine is modeled as the [`AnalysisEngine`] trait so the runner and oracle
//! can be exercised against a fake in tests instead of spawning real
//! processes.
//!
//! Two call shapes are consumed:
//!
//! 1. **Metadata query** — `cargo scout-audit --filter <detector> --metadata
//!    --local-detectors <dir>`: confirms the detector is recognized and
//!    fetches its descriptive text. An empty or unparseable result is a soft
//!    failure (reported for the example, never aborts the batch).
//! 2. **Scan** — `cargo scout-audit [--filter <detector>] --local-detectors
//!    <dir> --output-format raw-json --output-path <file>`: runs the full
//!    analysis and writes one JSON finding per line. A non-zero exit is a
//!    hard failure for the example.
//!
//! Invocations can take seconds to minutes (they drive a real toolchain), so
//! every call polls the child with a hard deadline rather than blocking
//! indefinitely. An overdue child is killed and reported as
//! [`EngineError::Timeout`].

use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Failure modes of one engine invocation.
#[derive(Debug)]
pub enum EngineError {
    /// The engine process could not be spawned or waited on.
    Io(String),
    /// The engine was still running at the deadline and was killed.
    Timeout(Duration),
    /// The engine exited non-zero.
    NonZeroExit { code: Option<i32>, stderr: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io(e) => write!(f, "failed to run engine: {}", e),
            EngineError::Timeout(limit) => {
                write!(f, "engine timed out after {}s", limit.as_secs())
            }
            EngineError::NonZeroExit { code, stderr } => match code {
                Some(code) => write!(f, "engine exited with status {}: {}", code, stderr.trim()),
                None => write!(f, "engine killed by signal: {}", stderr.trim()),
            },
        }
    }
}

/// Capability interface over the external analysis engine.
///
/// Implementers **must** be [`Send`] + [`Sync`]: the verification runner
/// shares one engine across its rayon workers.
pub trait AnalysisEngine: Send + Sync {
    /// Queries descriptive metadata for `detector`.
    ///
    /// Returns `Ok(None)` when the engine produced empty or unparseable
    /// metadata — callers treat that as a soft failure for the example.
    fn query_metadata(
        &self,
        detector: &str,
        detector_src: &Path,
        work_dir: &Path,
    ) -> Result<Option<serde_json::Value>, EngineError>;

    /// Runs a full scan of `work_dir`, restricted to one detector when
    /// `filter` is set, writing newline-delimited JSON findings to
    /// `output_path`.
    fn scan(
        &self,
        detector_src: &Path,
        work_dir: &Path,
        filter: Option<&str>,
        output_path: &Path,
    ) -> Result<(), EngineError>;
}

/// The real engine: `cargo scout-audit` as a subprocess.
pub struct ScoutEngine {
    timeout: Duration,
}

impl ScoutEngine {
    pub fn new(timeout: Duration) -> Self {
        ScoutEngine { timeout }
    }

    /// Returns the engine's version string, e.g. `cargo-scout-audit 0.9.0`.
    pub fn version(&self) -> Result<String, EngineError> {
        let output = run_with_deadline(
            Command::new("cargo").arg("scout-audit").arg("--version"),
            self.timeout,
        )?;
        if !output.status.success() {
            return Err(EngineError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Returns `true` if the engine responds to a version query.
    pub fn is_available(&self) -> bool {
        self.version().is_ok()
    }
}

impl AnalysisEngine for ScoutEngine {
    fn query_metadata(
        &self,
        detector: &str,
        detector_src: &Path,
        work_dir: &Path,
    ) -> Result<Option<serde_json::Value>, EngineError> {
        let output = run_with_deadline(
            Command::new("cargo")
                .arg("scout-audit")
                .arg("--filter")
                .arg(detector)
                .arg("--metadata")
                .arg("--local-detectors")
                .arg(detector_src)
                .current_dir(work_dir),
            self.timeout,
        )?;

        // The exit status is not meaningful for metadata queries; only a
        // parseable JSON object on stdout counts as a recognized detector.
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(None);
        }
        match serde_json::from_str::<serde_json::Value>(stdout.trim()) {
            Ok(value) if value.is_object() => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    fn scan(
        &self,
        detector_src: &Path,
        work_dir: &Path,
        filter: Option<&str>,
        output_path: &Path,
    ) -> Result<(), EngineError> {
        let mut command = Command::new("cargo");
        command.arg("scout-audit");
        if let Some(detector) = filter {
            command.arg("--filter").arg(detector);
        }
        command
            .arg("--local-detectors")
            .arg(detector_src)
            .arg("--output-format")
            .arg("raw-json")
            .arg("--output-path")
            .arg(output_path)
            .current_dir(work_dir);

        let output = run_with_deadline(&mut command, self.timeout)?;
        if !output.status.success() {
            return Err(EngineError::NonZeroExit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }
        Ok(())
    }
}

/// Spawns `command` and polls it to completion or the deadline.
///
/// Polling in small increments instead of a blocking `wait` lets an engine
/// that never returns (wedged toolchain, dead network mount) be killed and
/// reported instead of hanging the whole batch.
fn run_with_deadline(
    command: &mut Command,
    deadline: Duration,
) -> Result<std::process::Output, EngineError> {
    let start = Instant::now();
    let mut child = command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| EngineError::Io(e.to_string()))?;

    let poll_interval = Duration::from_millis(100);
    loop {
        match child.try_wait() {
            Ok(Some(_)) => break,
            Ok(None) => {
                if start.elapsed() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(EngineError::Timeout(deadline));
                }
                std::thread::sleep(poll_interval);
            }
            Err(e) => return Err(EngineError::Io(e.to_string())),
        }
    }

    child
        .wait_with_output()
        .map_err(|e| EngineError::Io(e.to_string()))
}
