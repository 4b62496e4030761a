//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Async code in the TUI and conductor MUST NOT use blocking I/O.
//! **Required**: `tokio::fs`, `tokio::net`, and async `reqwest`.
//!
//! Blocking calls are acceptable in non-async functions (configuration is
//! loaded before the event loop starts) and in test code.

use architectural_enforcement::{code_part, enclosing_fn, is_test_code, rust_sources};

const PRODUCTION_DIRS: [&str; 2] = ["conductor/core/src", "tui/src"];

#[test]
fn test_no_blocking_io_in_async_code() {
    let violations = find_blocking_io_violations();

    if !violations.is_empty() {
        eprintln!("\nBlocking I/O found in async code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nForbidden inside async fn:");
        eprintln!("  - std::fs::*, std::net::*");
        eprintln!("  - std::process::Command");
        eprintln!("  - reqwest::blocking::*");
        eprintln!("  - std::io::stdin() / std::io::stdout()");

        panic!(
            "\nFound {} blocking I/O violation(s) in production code.",
            violations.len()
        );
    }
}

fn find_blocking_io_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for dir in PRODUCTION_DIRS {
        for file in rust_sources(dir) {
            let lines = file.lines();
            for (idx, line) in lines.iter().enumerate() {
                let code = code_part(line);
                let Some(kind) = blocking_call(code) else {
                    continue;
                };
                if is_test_code(&lines, idx) {
                    continue;
                }
                // Plain functions run before the runtime or off the async path
                let in_async = enclosing_fn(&lines, idx).is_some_and(|f| f.is_async);
                if !in_async && !code.trim_start().starts_with("use ") {
                    continue;
                }
                violations.push(format!(
                    "{}:{} - {kind}: {}",
                    file.path.display(),
                    idx + 1,
                    line.trim()
                ));
            }
        }
    }

    violations
}

/// Classify a line that performs blocking I/O
fn blocking_call(code: &str) -> Option<&'static str> {
    if code.contains("reqwest::blocking") {
        Some("Blocking HTTP client")
    } else if code.contains("std::net::") || code.contains("use std::net") {
        Some("Blocking network I/O")
    } else if code.contains("std::fs::") || code.contains("use std::fs") {
        Some("Blocking file I/O")
    } else if code.contains("std::process::Command") {
        Some("Blocking process I/O")
    } else if code.contains("std::io::stdin()") || code.contains("std::io::stdout()") {
        Some("Blocking stdin/stdout")
    } else {
        None
    }
}

#[test]
fn test_blocking_call_classification() {
    assert_eq!(
        blocking_call("let s = std::fs::read_to_string(p)?;"),
        Some("Blocking file I/O")
    );
    assert_eq!(
        blocking_call("use std::net::TcpStream;"),
        Some("Blocking network I/O")
    );
    assert_eq!(blocking_call("let s = tokio::fs::read(p).await?;"), None);
}
