//! Source hygiene for the canvas crate.
//!
//! Scans non-test sources under `src/` for patterns that either abort the
//! process or throw an error away unseen. Every pattern has a budget of zero;
//! a new hit fails the build and lists where it is.

use std::fs;
use std::path::{Path, PathBuf};

struct Rule {
    pattern: &'static str,
    budget: usize,
    what: &'static str,
}

const RULES: &[Rule] = &[
    Rule { pattern: ".unwrap()", budget: 0, what: "panics on Err/None" },
    Rule { pattern: ".expect(", budget: 0, what: "panics on Err/None" },
    Rule { pattern: "panic!(", budget: 0, what: "aborts the caller" },
    Rule { pattern: "unreachable!(", budget: 0, what: "aborts the caller" },
    Rule { pattern: "todo!(", budget: 0, what: "unfinished code path" },
    Rule { pattern: "unimplemented!(", budget: 0, what: "unfinished code path" },
    Rule { pattern: "let _ =", budget: 0, what: "drops a result unseen" },
    Rule { pattern: ".ok()", budget: 0, what: "turns an error into None unseen" },
    Rule { pattern: "#[allow(dead_code)]", budget: 0, what: "hides unused code" },
];

fn sources(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            sources(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs")
            && !path.to_string_lossy().ends_with("_test.rs")
        {
            out.push(path);
        }
    }
}

fn hits(files: &[(PathBuf, String)], pattern: &str) -> Vec<String> {
    let mut found = Vec::new();
    for (path, content) in files {
        for (n, line) in content.lines().enumerate() {
            if line.contains(pattern) {
                found.push(format!("  {}:{}", path.display(), n + 1));
            }
        }
    }
    found
}

#[test]
fn source_patterns_within_budget() {
    let mut paths = Vec::new();
    sources(Path::new("src"), &mut paths);
    assert!(!paths.is_empty(), "no sources found under src/");

    let files: Vec<(PathBuf, String)> = paths
        .into_iter()
        .filter_map(|p| match fs::read_to_string(&p) {
            Ok(content) => Some((p, content)),
            Err(_) => None,
        })
        .collect();

    let mut failures = Vec::new();
    for rule in RULES {
        let found = hits(&files, rule.pattern);
        if found.len() > rule.budget {
            failures.push(format!(
                "`{}` ({}): {} found, budget {}\n{}",
                rule.pattern,
                rule.what,
                found.len(),
                rule.budget,
                found.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "hygiene budget exceeded:\n{}", failures.join("\n"));
}
