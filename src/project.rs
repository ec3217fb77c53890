//! Filesystem project probe.
//!
//! Decides whether a directory is a well-formed detector or example project:
//! a `Cargo.toml` manifest, a `src/lib.rs` entry point, and nothing outside a
//! small allow-list of expected children. A `Cargo.toml.skip` marker exempts
//! the manifest requirement (an auditable escape hatch for projects whose
//! manifest is generated elsewhere); the entry point stays required.
//!
//! Pure filesystem reads, no side effects. All checks are independent: every
//! violation is reported, never just the first.

use crate::error::{Violation, ViolationKind};
use std::path::Path;

/// Required manifest file name.
pub const MANIFEST: &str = "Cargo.toml";
/// Required entry-point file, relative to the project root.
pub const ENTRY_POINT: &str = "src/lib.rs";
/// Marker file exempting a directory from the manifest requirement (when
/// placed inside a project) or from structural validation entirely (when
/// placed at a test-case root).
pub const SKIP_MARKER: &str = "Cargo.toml.skip";

/// Direct children a project directory may contain.
const ALLOWED_ITEMS: &[&str] = &[
    "Cargo.toml",
    "Cargo.lock",
    "Cargo.toml.skip",
    "src",
    "target",
    ".cargo",
];

/// Returns `true` if `dir` carries the skip marker.
pub fn should_skip(dir: &Path) -> bool {
    dir.join(SKIP_MARKER).is_file()
}

/// Quick boolean form of the probe: manifest and entry point both present.
///
/// Used by the verification runner to locate example projects under a
/// test-case tree without producing violations.
pub fn is_project(dir: &Path) -> bool {
    dir.join(MANIFEST).is_file() && dir.join(ENTRY_POINT).is_file()
}

/// Checks that `dir` is a well-formed project.
///
/// Violations reported:
/// - [`MissingManifest`](ViolationKind::MissingManifest) — no `Cargo.toml`
///   and no skip marker.
/// - [`MissingEntryPoint`](ViolationKind::MissingEntryPoint) — no
///   `src/lib.rs`, required even when the skip marker is present.
/// - [`UnexpectedItem`](ViolationKind::UnexpectedItem) — a direct child
///   outside the allow-list.
///
/// Returns an empty list iff the directory is well-formed.
pub fn probe(dir: &Path) -> Vec<Violation> {
    let mut violations = Vec::new();

    if !dir.join(MANIFEST).is_file() && !should_skip(dir) {
        violations.push(Violation::new(
            ViolationKind::MissingManifest,
            format!("Missing {} in {}", MANIFEST, dir.display()),
        ));
    }

    if !dir.join(ENTRY_POINT).is_file() {
        violations.push(Violation::new(
            ViolationKind::MissingEntryPoint,
            format!("Missing {} in {}", ENTRY_POINT, dir.display()),
        ));
    }

    for item in sorted_child_names(dir) {
        if !ALLOWED_ITEMS.contains(&item.as_str()) {
            violations.push(Violation::new(
                ViolationKind::UnexpectedItem { item: item.clone() },
                format!("Unexpected item found in {}: {}", dir.display(), item),
            ));
        }
    }

    violations
}

/// Lists direct child names of `dir`, sorted for deterministic reporting.
///
/// An unreadable directory yields an empty list; the missing-file checks
/// above already cover that case.
pub fn sorted_child_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return vec![];
    };

    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();

    names.sort();
    names
}
