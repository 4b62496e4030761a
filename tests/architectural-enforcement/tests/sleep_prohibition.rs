//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code MUST NOT sleep to wait for work. Replies
//! arrive on channels and the controller reacts to them.
//! **Exception**: frame pacing in the TUI event loop (`App::run`).

use architectural_enforcement::{code_part, enclosing_fn, is_test_code, rust_sources};

struct SleepPolicy {
    dir: &'static str,
    /// Functions allowed to sleep for frame pacing
    frame_loops: &'static [&'static str],
}

const POLICIES: [SleepPolicy; 2] = [
    SleepPolicy {
        dir: "conductor/core/src",
        frame_loops: &[],
    },
    SleepPolicy {
        dir: "tui/src",
        frame_loops: &["run"],
    },
];

#[test]
fn test_no_sleep_in_production_code() {
    let mut violations = Vec::new();

    for policy in &POLICIES {
        for file in rust_sources(policy.dir) {
            let lines = file.lines();
            for (idx, line) in lines.iter().enumerate() {
                let code = code_part(line);
                if !(code.contains("sleep(") || code.contains("thread::sleep")) {
                    continue;
                }
                if is_test_code(&lines, idx) {
                    continue;
                }
                let allowed = enclosing_fn(&lines, idx)
                    .is_some_and(|f| policy.frame_loops.contains(&f.name.as_str()));
                if !allowed {
                    violations.push(format!(
                        "{}:{} - {}",
                        file.path.display(),
                        idx + 1,
                        line.trim()
                    ));
                }
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\nSleep calls found in production code:\n");
        for violation in &violations {
            eprintln!("  {violation}");
        }
        eprintln!("\nWait on channels or I/O instead; only the TUI frame loop may sleep.");
        panic!("\nFound {} sleep violation(s).", violations.len());
    }
}

#[test]
fn test_no_std_thread_sleep_anywhere() {
    let offenders: Vec<String> = POLICIES
        .iter()
        .flat_map(|p| rust_sources(p.dir))
        .filter(|f| f.content.contains("std::thread::sleep"))
        .map(|f| f.path.display().to_string())
        .collect();
    assert!(offenders.is_empty(), "std::thread::sleep in {offenders:?}");
}
