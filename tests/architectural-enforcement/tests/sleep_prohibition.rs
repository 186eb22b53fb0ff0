//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code never sleeps. Frames and physics steps are
//! paced by `tokio::time::interval`, and the engine is driven by its host.

use architectural_enforcement::{find_in_code, rust_files};

const PRODUCTION_DIRS: [&str; 2] = ["matrix/core/src", "tui/src"];

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();
    for dir in PRODUCTION_DIRS {
        for file in rust_files(dir) {
            violations.extend(find_in_code(&file, "::sleep("));
            violations.extend(find_in_code(&file, ".sleep("));
        }
    }

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nUse tokio::time::interval for periodic work instead.");
        panic!("Found {} sleep violation(s)", violations.len());
    }
}

#[test]
fn test_production_dirs_exist() {
    for dir in PRODUCTION_DIRS {
        assert!(!rust_files(dir).is_empty(), "no sources found under {dir}");
    }
}
