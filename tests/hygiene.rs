//! Hygiene: source-level budgets checked at test time.
//!
//! Scans `src/` (minus `*_test.rs`) for patterns that crash the process or
//! drop errors on the floor. Budgets only ever go down.

use std::fs;
use std::path::{Path, PathBuf};

// Environment lookups where absence means "use the default".
const MAX_DOT_OK: usize = 3;

fn source_files() -> Vec<(PathBuf, String)> {
    let mut files = Vec::new();
    collect(Path::new(env!("CARGO_MANIFEST_DIR")).join("src").as_path(), &mut files);
    files
}

fn collect(dir: &Path, out: &mut Vec<(PathBuf, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let is_test = path.to_string_lossy().ends_with("_test.rs");
        if path.extension().is_some_and(|e| e == "rs") && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push((path, content));
            }
        }
    }
}

/// Fail if more than `max` source lines contain `pattern`.
fn within_budget(pattern: &str, max: usize) {
    let files = source_files();
    assert!(!files.is_empty(), "no sources found");

    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|(path, content)| (path.display().to_string(), content.lines().filter(|l| l.contains(pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    let found: usize = hits.iter().map(|(_, n)| n).sum();
    let listing = hits.iter().map(|(p, n)| format!("  {p}: {n}")).collect::<Vec<_>>().join("\n");

    assert!(found <= max, "`{pattern}` budget exceeded: found {found}, max {max}.\n{listing}");
}

#[test]
fn no_unwrap() {
    within_budget(".unwrap()", 0);
}

#[test]
fn no_expect() {
    within_budget(".expect(", 0);
}

#[test]
fn no_panicking_macros() {
    for pattern in ["panic!(", "unreachable!(", "todo!(", "unimplemented!("] {
        within_budget(pattern, 0);
    }
}

#[test]
fn no_silent_discard() {
    within_budget("let _ =", 0);
}

#[test]
fn dot_ok_budget() {
    within_budget(".ok()", MAX_DOT_OK);
}

#[test]
fn no_allow_dead_code() {
    within_budget("#[allow(dead_code)]", 0);
}
