//! Integration Test: Headless Core
//!
//! **Policy**: `matrix/core` is a pure engine. It never talks to a terminal
//! and never owns an async runtime; hosts such as `tui` do that.

use std::fs;

use architectural_enforcement::{find_in_code, rust_files, workspace_root};

const FORBIDDEN_CRATES: [&str; 4] = ["ratatui", "crossterm", "tokio", "futures"];

#[test]
fn test_core_manifest_has_no_host_crates() {
    let manifest = workspace_root().join("matrix/core/Cargo.toml");
    let content = fs::read_to_string(&manifest).unwrap_or_default();
    assert!(!content.is_empty(), "missing {}", manifest.display());

    let violations: Vec<&str> = FORBIDDEN_CRATES
        .iter()
        .copied()
        .filter(|name| {
            content
                .lines()
                .any(|line| line.trim_start().starts_with(&format!("{name} ")))
        })
        .collect();

    assert!(
        violations.is_empty(),
        "matrix/core depends on host crates: {violations:?}"
    );
}

#[test]
fn test_core_sources_do_not_import_host_crates() {
    let files = rust_files("matrix/core/src");
    assert!(!files.is_empty(), "no sources found under matrix/core/src");

    let mut violations = Vec::new();
    for file in &files {
        for name in FORBIDDEN_CRATES {
            violations.extend(find_in_code(file, &format!("{name}::")));
        }
    }

    if !violations.is_empty() {
        for violation in &violations {
            eprintln!("  {violation}");
        }
        panic!(
            "Found {} host crate reference(s) in matrix/core",
            violations.len()
        );
    }
}
