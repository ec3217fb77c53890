use clap::{Parser, Subcommand, ValueEnum};
use detector_conformance::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "detector-conformance",
    version,
    about = "Conformance checking and behavioral verification for detector suites"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate detector and test-case structure for every namespace
    Validate {
        /// Root of the detector suite (contains detectors/ and test-cases/)
        #[arg(long, default_value = ".")]
        base_path: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run each detector against its labeled sample projects
    Verify {
        /// Test cases to verify as namespace/detector (all when omitted)
        test_cases: Vec<String>,

        /// Root of the detector suite (contains detectors/ and test-cases/)
        #[arg(long, default_value = ".")]
        base_path: PathBuf,

        /// Stop scheduling new runs after this many failures
        #[arg(long)]
        fail_fast: Option<usize>,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List test cases as namespace/detector identifiers
    #[command(name = "list-test-cases")]
    ListTestCases {
        /// Root of the detector suite (contains detectors/ and test-cases/)
        #[arg(long, default_value = ".")]
        base_path: PathBuf,

        /// Only list test cases for this namespace
        #[arg(long, short)]
        namespace: Option<String>,

        /// Output format
        #[arg(long, short, default_value = "json", value_enum)]
        format: ListFormat,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check whether the external analysis engine is installed
    CheckEngine,
}

/// Output formats for `list-test-cases`.
#[derive(Debug, Clone, ValueEnum)]
pub enum ListFormat {
    /// A single JSON array.
    Json,
    /// One identifier per line.
    List,
}
