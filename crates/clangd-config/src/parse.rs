//! Extraction of the `Remove` list from an existing `.clangd` file.
//!
//! A structured YAML parse is tried first. If the file is not valid YAML
//! (hand edits, tabs, stray text) a line-based scan picks up the entries
//! that follow the `Remove:` marker. Neither path ever fails: anything
//! unusable yields an empty list.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct ClangdDocument {
    #[serde(rename = "CompileFlags", default)]
    compile_flags: Option<CompileFlagsSection>,
}

#[derive(Debug, Deserialize)]
struct CompileFlagsSection {
    #[serde(rename = "Remove", default)]
    remove: Option<FlagList>,
}

/// clangd accepts either a single flag or a list of flags.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlagList {
    One(String),
    Many(Vec<String>),
}

impl FlagList {
    fn into_vec(self) -> Vec<String> {
        match self {
            FlagList::One(flag) => vec![flag],
            FlagList::Many(flags) => flags,
        }
    }
}

/// Read the `Remove` flags from the file at `path`.
///
/// A missing file is the common case and returns an empty list quietly.
pub fn read_remove_flags(path: &Path) -> Vec<String> {
    match fs::read(path) {
        Ok(bytes) => extract_remove(&String::from_utf8_lossy(&bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Extract `CompileFlags.Remove` from `.clangd` contents.
pub fn extract_remove(contents: &str) -> Vec<String> {
    if contents.trim().is_empty() {
        return Vec::new();
    }

    match extract_remove_structured(contents) {
        Ok(flags) => flags,
        Err(e) => {
            debug!("Existing .clangd is not valid YAML ({}), scanning lines", e);
            extract_remove_textual(contents)
        }
    }
}

/// Parse every YAML document and concatenate their `Remove` lists in file order.
fn extract_remove_structured(contents: &str) -> Result<Vec<String>, serde_yaml::Error> {
    let mut flags = Vec::new();

    for document in serde_yaml::Deserializer::from_str(contents) {
        let parsed = Option::<ClangdDocument>::deserialize(document)?;
        let remove = parsed
            .and_then(|doc| doc.compile_flags)
            .and_then(|section| section.remove);

        if let Some(list) = remove {
            flags.extend(list.into_vec());
        }
    }

    Ok(flags)
}

/// Line-based extraction of the entries under every `Remove:` marker.
///
/// List entries must be indented at least as deep as their marker. A block
/// ends at the first non-entry line indented no deeper than the marker; a
/// later `Remove:` line starts a new block.
pub fn extract_remove_textual(contents: &str) -> Vec<String> {
    let mut flags = Vec::new();
    let mut marker_indent: Option<usize> = None;

    for line in contents.lines() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();
        let content = trimmed.trim_end();

        if let Some(rest) = content.strip_prefix("Remove:") {
            let inline = rest.trim();
            if inline.is_empty() {
                marker_indent = Some(indent);
            } else {
                flags.extend(parse_inline(inline));
                marker_indent = None;
            }
            continue;
        }

        let Some(marker) = marker_indent else {
            continue;
        };

        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        if let Some(value) = list_entry(content) {
            if indent >= marker {
                if !value.is_empty() {
                    flags.push(unquote(value));
                }
                continue;
            }
        }

        if indent <= marker {
            marker_indent = None;
        }
    }

    flags
}

fn list_entry(content: &str) -> Option<&str> {
    if content == "-" {
        return Some("");
    }
    content.strip_prefix("- ").map(str::trim)
}

/// Values written on the marker line itself: `[a, b]` or a bare scalar.
fn parse_inline(value: &str) -> Vec<String> {
    match value
        .strip_prefix('[')
        .and_then(|inner| inner.strip_suffix(']'))
    {
        Some(inner) => inner
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(unquote)
            .collect(),
        None => vec![unquote(value)],
    }
}

fn unquote(value: &str) -> String {
    if value.len() >= 2 {
        if let Some(inner) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
            return inner.replace("\\\"", "\"").replace("\\\\", "\\");
        }
        if let Some(inner) = value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')) {
            return inner.replace("''", "'");
        }
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_structured_list() {
        let contents = "CompileFlags:\n  Add:\n    - \"-I/usr/include\"\n  Remove:\n    - \"-Wno-foo\"\n    - -mno-red-zone\n";
        assert_eq!(extract_remove(contents), vec!["-Wno-foo", "-mno-red-zone"]);
    }

    #[test]
    fn test_structured_single_scalar() {
        let contents = "CompileFlags:\n  Remove: -W*\n";
        assert_eq!(extract_remove(contents), vec!["-W*"]);
    }

    #[test]
    fn test_structured_flow_list() {
        let contents = "CompileFlags: {Remove: [\"-Wno-foo\", -fno-bar]}\n";
        assert_eq!(extract_remove(contents), vec!["-Wno-foo", "-fno-bar"]);
    }

    #[test]
    fn test_structured_ignores_other_sections() {
        let contents = "Diagnostics:\n  Remove: [unused-includes]\nCompileFlags:\n  Add: [-I/x]\n";
        assert!(extract_remove(contents).is_empty());
    }

    #[test]
    fn test_structured_multiple_documents() {
        let contents = "If:\n  PathMatch: .*\\.h\n---\nCompileFlags:\n  Remove:\n    - -Wfirst\n---\nCompileFlags:\n  Remove:\n    - -Wsecond\n";
        assert_eq!(extract_remove(contents), vec!["-Wfirst", "-Wsecond"]);
    }

    #[test]
    fn test_structured_keeps_every_document_in_order() {
        let contents = "CompileFlags:\n  Remove: [-Wfirst]\n---\nIf:\n  PathMatch: .*\\.c\nCompileFlags:\n  Remove: [-Wsecond, -Wthird]\n---\nCompileFlags:\n  Remove: -Wfourth\n";
        assert_eq!(
            extract_remove(contents),
            vec!["-Wfirst", "-Wsecond", "-Wthird", "-Wfourth"]
        );
    }

    #[test]
    fn test_empty_and_absent() {
        assert!(extract_remove("").is_empty());
        assert!(extract_remove("   \n\n").is_empty());
        assert!(extract_remove("CompileFlags:\n  Add:\n    - -I/x\n").is_empty());
    }

    #[test]
    fn test_malformed_falls_back_to_lines() {
        // Tab indentation is not valid YAML.
        let contents = "CompileFlags:\n\tAdd: [\n  Remove:\n    - \"-Wno-foo\"\n    - '-Wno-bar'\nIndex:\n  Background: Skip\n";
        assert_eq!(extract_remove(contents), vec!["-Wno-foo", "-Wno-bar"]);
    }

    #[test]
    fn test_malformed_without_remove() {
        assert!(extract_remove(": : :\n\t- [[[").is_empty());
    }

    #[test]
    fn test_textual_stops_at_dedent() {
        let contents = "  Remove:\n    - -a\n\n    - -b\n  Add:\n    - -I/x\n";
        assert_eq!(extract_remove_textual(contents), vec!["-a", "-b"]);
    }

    #[test]
    fn test_textual_same_indent_entries() {
        let contents = "Remove:\n- -a\n- \"-b\"\nNext: 1\n";
        assert_eq!(extract_remove_textual(contents), vec!["-a", "-b"]);
    }

    #[test]
    fn test_textual_inline_values() {
        assert_eq!(
            extract_remove_textual("  Remove: [\"-a\", '-b', -c]\n"),
            vec!["-a", "-b", "-c"]
        );
        assert_eq!(extract_remove_textual("  Remove: -W*\n"), vec!["-W*"]);
    }

    #[test]
    fn test_textual_collects_every_block() {
        let contents = "CompileFlags:\n  Remove:\n    - -Wfirst\n  Add:\n    - -I/x\n---\nCompileFlags:\n  Remove:\n    - \"-Wsecond\"\n  Remove: [-Wthird]\n";
        assert_eq!(
            extract_remove_textual(contents),
            vec!["-Wfirst", "-Wsecond", "-Wthird"]
        );
    }

    #[test]
    fn test_malformed_keeps_every_remove_block() {
        // Tab indentation forces the line-based path.
        let contents = "CompileFlags:\n\tAdd: [\n  Remove:\n    - -Wfirst\nIndex:\n  Background: Skip\nCompileFlags:\n  Remove:\n    - -Wsecond\n";
        assert_eq!(extract_remove(contents), vec!["-Wfirst", "-Wsecond"]);
    }

    #[test]
    fn test_textual_skips_comments() {
        let contents = "  Remove:\n    # keep these\n    - -a\n";
        assert_eq!(extract_remove_textual(contents), vec!["-a"]);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"-DX=\\\"y\\\"\""), "-DX=\"y\"");
        assert_eq!(unquote("'it''s'"), "it's");
        assert_eq!(unquote("\""), "\"");
        assert_eq!(unquote("bare"), "bare");
    }

    #[test]
    fn test_read_remove_flags_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_remove_flags(&dir.path().join(".clangd")).is_empty());
    }

    #[test]
    fn test_read_remove_flags_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".clangd");
        std::fs::write(&path, "CompileFlags:\n  Remove:\n    - \"-Wno-foo\"\n").unwrap();
        assert_eq!(read_remove_flags(&path), vec!["-Wno-foo"]);
    }

    #[test]
    fn test_read_remove_flags_directory_degrades() {
        let dir = TempDir::new().unwrap();
        assert!(read_remove_flags(dir.path()).is_empty());
    }
}
