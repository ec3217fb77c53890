//! Configuration loading and management.
//!
//! Configuration comes from a TOML file (`conformance.toml` in the working
//! directory by default). Every field has a default so the file can be
//! omitted entirely.
//!
//! ```rust,no_run
//! use detector_conformance::config::Config;
//!
//! let config = Config::load(None).expect("failed to load config");
//! assert_eq!(config.layout.shared_pool, "rust");
//! ```

use std::path::Path;

/// Main configuration for validation and verification runs.
#[derive(Debug, Clone, Default, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    /// Directory-layout conventions of the suite under check.
    pub layout: LayoutConfig,
    /// External analysis engine invocation settings.
    pub engine: EngineConfig,
    /// Verification scheduling settings.
    pub verify: VerifyConfig,
}

/// Directory-layout conventions.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Namespace holding detectors defined once and tested per namespace.
    /// A test case with no same-namespace detector is not an error when a
    /// detector of that name exists in this pool.
    pub shared_pool: String,
    /// Directory names excluded from detector/test-case enumeration, in
    /// addition to hidden entries.
    pub ignore_dirs: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            shared_pool: "rust".to_string(),
            ignore_dirs: vec!["target".to_string(), ".cargo".to_string()],
        }
    }
}

/// External engine invocation settings.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Hard deadline for one engine invocation, in seconds. An invocation
    /// still running at the deadline is killed and reported as a failure.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig { timeout_secs: 600 }
    }
}

/// Verification scheduling settings.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Worker threads for concurrent engine runs. `0` uses the rayon default.
    pub workers: usize,
    /// Stop scheduling new work after this many failures. `0` disables
    /// fail-fast; in-flight runs always complete and report.
    pub fail_fast: usize,
    /// Detectors that must be scanned without a `--filter` flag. Filtering
    /// suppresses co-resident detectors, and for these detectors that
    /// interaction is exactly what the test cases exercise.
    pub unfiltered_detectors: Vec<String>,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        VerifyConfig {
            workers: 0,
            fail_fast: 0,
            unfiltered_detectors: vec!["unnecessary-lint-allow".to_string()],
        }
    }
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Resolution order:
    /// 1. If `path` is `Some`, load from that file (error if missing).
    /// 2. If `path` is `None`, try `conformance.toml` in the current directory.
    /// 3. If that file does not exist either, return [`Config::default()`].
    ///
    /// # Errors
    ///
    /// Returns `Err(String)` when the explicit path does not exist, the file
    /// cannot be read, or the TOML content fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Config, String> {
        let config_path = if let Some(p) = path {
            if p.exists() {
                Some(p.to_path_buf())
            } else {
                return Err(format!("Config file not found: {}", p.display()));
            }
        } else {
            let default_path = Path::new("conformance.toml");
            if default_path.exists() {
                Some(default_path.to_path_buf())
            } else {
                None
            }
        };

        match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
                toml::from_str(&content)
                    .map_err(|e| format!("Failed to parse config {}: {}", path.display(), e))
            }
            None => Ok(Config::default()),
        }
    }

    /// Returns `true` if `name` is excluded from directory enumeration.
    ///
    /// Hidden entries (leading `.`) are always excluded.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        name.starts_with('.') || self.layout.ignore_dirs.iter().any(|d| d == name)
    }
}
