//! Result oracle: expected vs observed detector behavior.
//!
//! After a scan, the engine has written one JSON finding per line. The oracle
//! reduces that stream to the set of triggered rule codes, derives the
//! expected outcome from the example's path label, and produces a
//! [`Verdict`].
//!
//! Engine rule codes use underscores (`unsafe_unwrap`) while detector
//! directories use hyphens (`unsafe-unwrap`); [`normalize_rule_code`]
//! reconciles the two before membership testing. Skipping that normalization
//! makes every vulnerable example look silent.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Path label marking samples the detector must fire on.
pub const VULNERABLE_LABEL: &str = "vulnerable";

/// Key path of the rule code inside one finding record.
const RULE_CODE_PATH: [&str; 3] = ["message", "code", "code"];

/// Pass/fail outcome for one example.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Verdict {
    pub example: PathBuf,
    /// Whether the detector was expected to fire (path is under a
    /// `vulnerable` segment).
    pub expected: bool,
    /// Whether the detector actually fired.
    pub observed: bool,
    pub passed: bool,
    /// Mismatch explanation; `None` when the verdict passed.
    pub explanation: Option<&'static str>,
}

/// Maps the engine's internal separator convention to the detector naming
/// convention: underscores become hyphens.
pub fn normalize_rule_code(code: &str) -> String {
    code.replace('_', "-")
}

/// Parses a newline-delimited JSON findings file into the set of triggered
/// rule codes, normalized to detector naming.
///
/// Duplicates collapse; order is irrelevant. An unreadable file or an
/// unparseable line is a hard failure for the run — a half-read stream must
/// not masquerade as a silent detector.
pub fn parse_findings(output_path: &Path) -> Result<HashSet<String>, String> {
    let content = std::fs::read_to_string(output_path)
        .map_err(|e| format!("unreadable findings file {}: {}", output_path.display(), e))?;

    let mut triggered = HashSet::new();
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let record: serde_json::Value = serde_json::from_str(line)
            .map_err(|e| format!("unparseable finding line: {} ({})", line.trim(), e))?;

        let code = RULE_CODE_PATH
            .iter()
            .fold(&record, |value, key| &value[key])
            .as_str()
            .ok_or_else(|| format!("finding without a rule code: {}", line.trim()))?;

        triggered.insert(normalize_rule_code(code));
    }
    Ok(triggered)
}

/// Compares the triggered-rule set against the outcome the example's label
/// demands.
///
/// `expected` is true iff `example` contains a path segment literally equal
/// to `vulnerable`; `observed` is true iff `detector` appears in `triggered`.
pub fn verify(example: &Path, detector: &str, triggered: &HashSet<String>) -> Verdict {
    let expected = example
        .components()
        .any(|c| c.as_os_str() == VULNERABLE_LABEL);
    let observed = triggered.contains(detector);
    let passed = expected == observed;

    let explanation = match (passed, observed) {
        (true, _) => None,
        (false, true) => Some("it failed when it shouldn't have"),
        (false, false) => Some("it didn't fail when it should have"),
    };

    Verdict {
        example: example.to_path_buf(),
        expected,
        observed,
        passed,
        explanation,
    }
}
