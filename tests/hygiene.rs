//! Hygiene: source-level coding standards, checked at test time.
//!
//! Scans production `.rs` files under `src/` (sibling `*_test.rs` files are
//! exempt) for patterns the engine must not contain. Every budget is zero;
//! the engine reports failure through return values and `tracing`, never by
//! crashing the host or writing to stdio.

use std::fs;
use std::path::Path;

struct Rule {
    pattern: &'static str,
    budget: usize,
    why: &'static str,
}

// Panics.
const UNWRAP: Rule = Rule { pattern: ".unwrap()", budget: 0, why: "propagate or handle the None/Err" };
const EXPECT: Rule = Rule { pattern: ".expect(", budget: 0, why: "propagate or handle the None/Err" };
const PANIC: Rule = Rule { pattern: "panic!(", budget: 0, why: "return a no-op or a typed error" };
const UNREACHABLE: Rule = Rule { pattern: "unreachable!(", budget: 0, why: "make the match exhaustive" };
const TODO: Rule = Rule { pattern: "todo!(", budget: 0, why: "finish the stub" };
const UNIMPLEMENTED: Rule = Rule { pattern: "unimplemented!(", budget: 0, why: "finish the stub" };

// Silent loss.
const SILENT_DISCARD: Rule = Rule { pattern: "let _ =", budget: 0, why: "inspect the value" };
const DOT_OK: Rule = Rule { pattern: ".ok()", budget: 0, why: "inspect the error" };

// Output and structure.
const PRINTLN: Rule = Rule { pattern: "println!(", budget: 0, why: "log with tracing" };
const EPRINTLN: Rule = Rule { pattern: "eprintln!(", budget: 0, why: "log with tracing" };
const DBG: Rule = Rule { pattern: "dbg!(", budget: 0, why: "remove debugging output" };
const ALLOW_DEAD_CODE: Rule = Rule { pattern: "#[allow(dead_code)]", budget: 0, why: "delete the dead code" };

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(Path::new(env!("CARGO_MANIFEST_DIR")).join("src").as_path(), &mut files);
    files
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

fn check(rule: &Rule) {
    let files = source_files();
    assert!(!files.is_empty(), "no source files found under src/");
    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|f| (f.path.clone(), f.content.lines().filter(|l| l.contains(rule.pattern)).count()))
        .filter(|(_, n)| *n > 0)
        .collect();
    let count: usize = hits.iter().map(|(_, n)| n).sum();
    let report = hits.iter().map(|(p, n)| format!("  {p}: {n}")).collect::<Vec<_>>().join("\n");
    assert!(
        count <= rule.budget,
        "`{}` budget exceeded: found {count}, max {} ({}).\n{report}",
        rule.pattern,
        rule.budget,
        rule.why
    );
}

#[test]
fn unwrap_budget() {
    check(&UNWRAP);
}

#[test]
fn expect_budget() {
    check(&EXPECT);
}

#[test]
fn panic_budget() {
    check(&PANIC);
}

#[test]
fn unreachable_budget() {
    check(&UNREACHABLE);
}

#[test]
fn todo_budget() {
    check(&TODO);
}

#[test]
fn unimplemented_budget() {
    check(&UNIMPLEMENTED);
}

#[test]
fn silent_discard_budget() {
    check(&SILENT_DISCARD);
}

#[test]
fn dot_ok_budget() {
    check(&DOT_OK);
}

#[test]
fn stdio_budget() {
    check(&PRINTLN);
    check(&EPRINTLN);
    check(&DBG);
}

#[test]
fn allow_dead_code_budget() {
    check(&ALLOW_DEAD_CODE);
}
