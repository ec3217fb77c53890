mod cli;

use clap::Parser;
use cli::{Cli, Commands, ListFormat};
use colored::Colorize;
use detector_conformance::{
    config::Config,
    engine::ScoutEngine,
    error::ValidationReport,
    output, reconcile, runner,
    testcase::LevenshteinMatcher,
};
use std::time::Duration;

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            base_path,
            format,
            config: config_path,
        } => {
            if !base_path.exists() {
                eprintln!("Error: path does not exist: {}", base_path.display());
                std::process::exit(2);
            }

            let config = load_config(config_path.as_deref());
            let errors = reconcile::validate_all(&base_path, &config, &LevenshteinMatcher);
            let report = ValidationReport::from_errors(&base_path.display().to_string(), errors);

            print!("{}", output::format_validation(&report, &format));
            std::process::exit(if report.passed { 0 } else { 1 });
        }

        Commands::Verify {
            test_cases,
            base_path,
            fail_fast,
            format,
            config: config_path,
        } => {
            if !base_path.exists() {
                eprintln!("Error: path does not exist: {}", base_path.display());
                std::process::exit(2);
            }

            let mut config = load_config(config_path.as_deref());
            if let Some(threshold) = fail_fast {
                config.verify.fail_fast = threshold;
            }

            let engine = ScoutEngine::new(Duration::from_secs(config.engine.timeout_secs));
            let version = match engine.version() {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Error: analysis engine is not available: {e}");
                    eprintln!("Install it with: cargo install cargo-scout-audit");
                    std::process::exit(2);
                }
            };

            let test_cases = if test_cases.is_empty() {
                reconcile::list_test_cases(&base_path, &config)
            } else {
                test_cases
            };
            if test_cases.is_empty() {
                eprintln!(
                    "Error: no test cases found under '{}'",
                    base_path.display()
                );
                std::process::exit(2);
            }

            let report =
                runner::run_verification(&base_path, &test_cases, &engine, &config, Some(version));

            print!("{}", output::format_verify(&report, &format));
            std::process::exit(if report.passed { 0 } else { 1 });
        }

        Commands::ListTestCases {
            base_path,
            namespace,
            format,
            config: config_path,
        } => {
            let config = load_config(config_path.as_deref());
            let mut test_cases = reconcile::list_test_cases(&base_path, &config);
            if let Some(ref ns) = namespace {
                let prefix = format!("{}/", ns);
                test_cases.retain(|tc| tc.starts_with(&prefix));
            }

            match format {
                ListFormat::Json => match serde_json::to_string(&test_cases) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("Error: {e}");
                        std::process::exit(2);
                    }
                },
                ListFormat::List => {
                    for tc in &test_cases {
                        println!("{tc}");
                    }
                }
            }
        }

        Commands::CheckEngine => {
            let config = load_config(None);
            let engine = ScoutEngine::new(Duration::from_secs(config.engine.timeout_secs));
            println!("{}", "Engine Availability".bold().underline());
            println!();
            match engine.version() {
                Ok(version) => {
                    println!("  [{}] {}", "READY".green().bold(), version);
                }
                Err(e) => {
                    println!("  [{}] cargo scout-audit: {}", "NOT AVAILABLE".red(), e);
                    println!();
                    println!("Install it with: cargo install cargo-scout-audit");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}
