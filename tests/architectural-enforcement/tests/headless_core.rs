//! Integration Test: Headless Conductor
//!
//! **Policy**: `assistant-conductor` owns conversation state and never
//! renders. Terminal crates belong to the TUI only, so another surface can
//! embed the core without pulling them in.

use architectural_enforcement::{code_part, is_test_code, read_workspace_file, rust_sources};

const UI_CRATES: [&str; 3] = ["ratatui", "crossterm", "tui-textarea"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest =
        read_workspace_file("conductor/core/Cargo.toml").expect("core manifest is readable");

    let offenders: Vec<&str> = UI_CRATES
        .iter()
        .copied()
        .filter(|name| {
            manifest.lines().map(str::trim_start).any(|line| {
                line.starts_with(&format!("{name} ")) || line.starts_with(&format!("{name}="))
            })
        })
        .collect();

    assert!(
        offenders.is_empty(),
        "conductor core depends on UI crates: {offenders:?}"
    );
}

#[test]
fn test_core_sources_do_not_reference_ui_crates() {
    let mut violations = Vec::new();

    for file in rust_sources("conductor/core/src") {
        let lines = file.lines();
        for (idx, line) in lines.iter().enumerate() {
            let code = code_part(line);
            if UI_CRATES
                .iter()
                .any(|name| code.contains(&format!("{}::", name.replace('-', "_"))))
                && !is_test_code(&lines, idx)
            {
                violations.push(format!(
                    "{}:{} - {}",
                    file.path.display(),
                    idx + 1,
                    line.trim()
                ));
            }
        }
    }

    assert!(violations.is_empty(), "UI code in core: {violations:#?}");
}

#[test]
fn test_tui_depends_on_core() {
    let manifest = read_workspace_file("tui/Cargo.toml").expect("tui manifest is readable");
    assert!(manifest.contains("assistant-conductor"));
}
