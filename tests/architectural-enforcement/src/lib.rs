//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No blocking I/O inside async code
//! - No sleep outside the TUI frame loop
//! - The conductor core stays headless (no terminal UI crates)
//!
//! The helpers here do a line-based scan of the workspace sources. They are
//! heuristics, tuned to the way this workspace formats its code.

use std::fs;
use std::path::{Path, PathBuf};

/// Root of the workspace, resolved from this crate's manifest directory
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// A source file loaded for scanning
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// File contents
    pub content: String,
}

impl SourceFile {
    /// Lines of the file
    pub fn lines(&self) -> Vec<&str> {
        self.content.lines().collect()
    }
}

/// All `.rs` files under `dir` (relative to the workspace root)
pub fn rust_sources(dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let base = root.join(dir);
    if !base.exists() {
        return Vec::new();
    }

    let mut files: Vec<SourceFile> = walkdir::WalkDir::new(&base)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|e| {
            let content = fs::read_to_string(e.path()).ok()?;
            let path = e
                .path()
                .strip_prefix(&root)
                .unwrap_or(e.path())
                .to_path_buf();
            Some(SourceFile { path, content })
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// Read a file relative to the workspace root
pub fn read_workspace_file(relative: &str) -> Option<String> {
    fs::read_to_string(workspace_root().join(relative)).ok()
}

/// Strip a trailing `//` comment from a line of code
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// The function a line sits in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnContext {
    /// Function name
    pub name: String,
    /// Declared `async`
    pub is_async: bool,
}

/// Parse a function signature line, if it is one
///
/// Recognises `fn`, `async fn`, and any `pub`/`pub(crate)` prefix.
pub fn parse_fn_signature(line: &str) -> Option<FnContext> {
    let mut rest = line.trim();
    for prefix in ["pub(crate) ", "pub(super) ", "pub "] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    let is_async = if let Some(stripped) = rest.strip_prefix("async ") {
        rest = stripped;
        true
    } else {
        false
    };
    let after_fn = rest.strip_prefix("fn ")?;
    let name: String = after_fn
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if name.is_empty() {
        return None;
    }
    Some(FnContext { name, is_async })
}

/// Find the nearest function signature above `current_idx`
pub fn enclosing_fn(lines: &[&str], current_idx: usize) -> Option<FnContext> {
    lines[..current_idx]
        .iter()
        .rev()
        .find_map(|line| parse_fn_signature(line))
}

/// Whether the line is inside a `#[cfg(test)]` module or a test function
pub fn is_test_code(lines: &[&str], current_idx: usize) -> bool {
    let in_test_module = lines[..current_idx]
        .iter()
        .any(|line| line.trim().starts_with("#[cfg(test)]"));
    if in_test_module {
        return true;
    }

    // Attribute directly above the enclosing function
    let Some(fn_idx) = (0..current_idx)
        .rev()
        .find(|&i| parse_fn_signature(lines[i]).is_some())
    else {
        return false;
    };
    lines[..fn_idx]
        .iter()
        .rev()
        .take_while(|line| line.trim().starts_with("#[") || line.trim().starts_with("///"))
        .any(|line| {
            let line = line.trim();
            line.starts_with("#[test]") || line.starts_with("#[tokio::test")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fn_signature_variants() {
        assert_eq!(
            parse_fn_signature("    pub async fn submit(&mut self) {"),
            Some(FnContext {
                name: "submit".to_string(),
                is_async: true
            })
        );
        assert_eq!(
            parse_fn_signature("pub(crate) fn wrap(text: &str) -> Vec<String> {"),
            Some(FnContext {
                name: "wrap".to_string(),
                is_async: false
            })
        );
        assert_eq!(parse_fn_signature("let f = move |x| x + 1;"), None);
    }

    #[test]
    fn test_enclosing_fn_finds_nearest() {
        let code = vec![
            "fn load() {",
            "}",
            "async fn run() {",
            "    work().await;",
            "}",
        ];
        assert_eq!(enclosing_fn(&code, 3).map(|f| f.name), Some("run".to_string()));
        assert_eq!(enclosing_fn(&code, 0), None);
    }

    #[test]
    fn test_test_code_detection() {
        let code = vec![
            "fn production() {}",
            "#[cfg(test)]",
            "mod tests {",
            "    fn helper() {",
            "        std::fs::read(\"x\");",
            "    }",
            "}",
        ];
        assert!(!is_test_code(&code, 0));
        assert!(is_test_code(&code, 4));

        let code = vec!["#[tokio::test]", "async fn test_x() {", "    x();", "}"];
        assert!(is_test_code(&code, 2));
    }

    #[test]
    fn test_workspace_root_contains_members() {
        assert!(workspace_root().join("conductor/core/Cargo.toml").exists());
        assert!(workspace_root().join("tui/Cargo.toml").exists());
    }
}
