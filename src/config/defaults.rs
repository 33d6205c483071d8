//! Built-in defaults (layer 1)
//!
//! Hardcoded defaults for all configuration values.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the candidate library name in known prefixes.
pub const LIB_PLACEHOLDER: &str = "{lib}";

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Source file extensions to scan (default: c, h)
    pub extensions: Vec<String>,

    /// Globs, relative to the project root, skipped while scanning
    pub exclude: Vec<String>,

    /// Package metadata command (default: "pkg-config")
    pub pkg_config_command: String,

    /// Package metadata timeout in seconds (default: 5)
    pub pkg_config_timeout_seconds: u64,

    /// Per-library installation prefixes, `{lib}` expanded
    pub known_prefixes: Vec<String>,

    /// Generic include roots checked last
    pub standard_dirs: Vec<String>,

    /// Output file name at the project root (default: ".clangd")
    pub output_file_name: String,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            extensions: vec!["c".to_string(), "h".to_string()],
            exclude: vec![".git".to_string(), ".git/**".to_string()],
            pkg_config_command: "pkg-config".to_string(),
            pkg_config_timeout_seconds: 5,
            known_prefixes: vec![
                "/opt/homebrew/opt/{lib}/include".to_string(),
                "/usr/local/opt/{lib}/include".to_string(),
            ],
            standard_dirs: vec![
                "/usr/include".to_string(),
                "/usr/local/include".to_string(),
                "/opt/homebrew/include".to_string(),
            ],
            output_file_name: clangd_config::CLANGD_FILE_NAME.to_string(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "scan": {
                "extensions": self.extensions,
                "exclude": self.exclude
            },
            "pkg_config": {
                "command": self.pkg_config_command,
                "timeout_seconds": self.pkg_config_timeout_seconds
            },
            "search": {
                "known_prefixes": self.known_prefixes,
                "standard_dirs": self.standard_dirs
            },
            "output": {
                "file_name": self.output_file_name
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.extensions, vec!["c", "h"]);
        assert_eq!(defaults.pkg_config_command, "pkg-config");
        assert_eq!(defaults.pkg_config_timeout_seconds, 5);
        assert_eq!(defaults.output_file_name, ".clangd");
        assert!(defaults
            .known_prefixes
            .iter()
            .all(|p| p.contains(LIB_PLACEHOLDER)));
        assert_eq!(defaults.standard_dirs[0], "/usr/include");
    }

    #[test]
    fn test_to_value() {
        let defaults = BuiltinDefaults::default();
        let value = defaults.to_value();

        assert_eq!(value["pkg_config"]["timeout_seconds"], 5);
        assert_eq!(value["scan"]["extensions"][1], "h");
        assert_eq!(value["output"]["file_name"], ".clangd");
        assert_eq!(value["search"]["standard_dirs"][2], "/opt/homebrew/include");
    }
}
