//! Error types for `.clangd` file handling.

use std::io;
use std::path::PathBuf;

/// Errors raised while writing a `.clangd` file.
///
/// Reading never fails: an unreadable or malformed file degrades to an
/// empty `Remove` list.
#[derive(Debug, thiserror::Error)]
pub enum ClangdConfigError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
