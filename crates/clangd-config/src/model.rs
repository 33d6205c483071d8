//! The `CompileFlags` section owned by this tool.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::emit::render;
use crate::error::ClangdConfigError;

/// Flags written under the `CompileFlags` root key.
///
/// `add` is regenerated on every run. `remove` is carried over verbatim
/// from the previous file and never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Include flags (`-I<dir>`) to add to every compile command.
    #[serde(rename = "Add", default, skip_serializing_if = "Vec::is_empty")]
    pub add: Vec<String>,

    /// Flags clangd should strip from compile commands.
    #[serde(rename = "Remove", default, skip_serializing_if = "Vec::is_empty")]
    pub remove: Vec<String>,
}

impl ProjectConfig {
    /// Build a config from freshly resolved `Add` flags and preserved `Remove` flags.
    pub fn new<I>(add: I, remove: Vec<String>) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            add: add.into_iter().collect(),
            remove,
        }
    }

    /// True when neither list carries any flags.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Serialize to the `.clangd` YAML layout.
    pub fn to_yaml(&self) -> String {
        render(self)
    }

    /// Overwrite `path` with this config.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ClangdConfigError> {
        fs::write(path, self.to_yaml()).map_err(|source| ClangdConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
