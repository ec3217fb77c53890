//! Example naming and sequence validation.
//!
//! Every child of a test-case side must be named `<prefix>-<n>` and the `n`
//! values must form the dense sequence `1..=count` — no gaps, no duplicates,
//! no other start. Each matching child must itself be a well-formed project
//! (see [`project`](crate::project)).
//!
//! Naming and sequencing are checked before recursing into per-example
//! checks, so a single renamed directory produces one clear diagnostic
//! instead of cascading false positives.

use crate::error::{Violation, ViolationKind};
use crate::project;
use std::path::Path;

/// Validates the children of `dir` against the `<prefix>-<n>` convention.
///
/// 1. Every child name must match `^<prefix>-\d+$` exactly; anything else is
///    an [`InvalidItem`](ViolationKind::InvalidItem).
/// 2. With zero matching children the side is unusable: a single
///    [`NoExamplesFound`](ViolationKind::NoExamplesFound) is appended and the
///    sequence and per-example checks are not attempted.
/// 3. The numeric suffixes, sorted ascending, must equal `[1, ..., count]`;
///    any deviation is one
///    [`NonSequentialNumbering`](ViolationKind::NonSequentialNumbering)
///    carrying both sequences.
/// 4. Every matching child is probed as a project and its violations folded
///    in.
pub fn validate_sequence(dir: &Path, prefix: &str) -> Vec<Violation> {
    let pattern = regex::Regex::new(&format!(r"^{}-(\d+)$", regex::escape(prefix)))
        .expect("escaped prefix always forms a valid pattern");

    let mut violations = Vec::new();
    let mut examples: Vec<(u32, String)> = Vec::new();

    for item in project::sorted_child_names(dir) {
        match pattern.captures(&item) {
            Some(caps) => {
                // Suffixes longer than a u32 (e.g. "vulnerable-99999999999")
                // are out-of-pattern for any realistic corpus.
                match caps[1].parse::<u32>() {
                    Ok(n) => examples.push((n, item)),
                    Err(_) => violations.push(invalid_item(dir, prefix, &item)),
                }
            }
            None => violations.push(invalid_item(dir, prefix, &item)),
        }
    }

    if examples.is_empty() {
        violations.push(Violation::new(
            ViolationKind::NoExamplesFound,
            format!("No {} examples found in {}", prefix, dir.display()),
        ));
        return violations;
    }

    examples.sort();

    let found: Vec<u32> = examples.iter().map(|(n, _)| *n).collect();
    let expected: Vec<u32> = (1..=found.len() as u32).collect();
    if found != expected {
        violations.push(Violation::new(
            ViolationKind::NonSequentialNumbering {
                found: found.clone(),
                expected: expected.clone(),
            },
            format!(
                "Non-sequential or missing numbers in {} examples. Found: {:?}, Expected: {:?}",
                prefix, found, expected
            ),
        ));
    }

    for (_, example) in &examples {
        violations.extend(project::probe(&dir.join(example)));
    }

    violations
}

fn invalid_item(dir: &Path, prefix: &str, item: &str) -> Violation {
    Violation::new(
        ViolationKind::InvalidItem {
            item: item.to_string(),
        },
        format!(
            "Invalid item found in {}: {}. Must match pattern '{}-n'",
            dir.display(),
            item,
            prefix
        ),
    )
}
